// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Generator configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ZoneError};
use crate::types::DEFAULT_IPP_PORT;

/// Settings for one generator run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Print server hostname.  Also published as the SRV target for every
    /// printer when set; otherwise the first printer URI's host is used.
    pub host: Option<String>,
    /// Print server port.  Used for printers whose URI carries no port.
    pub port: Option<u16>,
    /// User to authenticate as against the print server.
    pub user: Option<String>,
    /// Include the printer-specified URI as the admin URL.  `adminurl` is
    /// currently emitted for every printer regardless.
    pub admin_url: bool,
    /// Domain for an optional leading `$ORIGIN` directive.
    pub origin: Option<String>,
}

impl GeneratorConfig {
    /// Host to connect to: the configured host or the local server.
    pub fn server_host(&self) -> &str {
        self.host.as_deref().unwrap_or("localhost")
    }

    /// Port to connect to.
    pub fn server_port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_IPP_PORT)
    }

    /// Split a `host:port` server name, as `CUPS_SERVER` allows, into `host`
    /// and `port`.
    ///
    /// The embedded port fills `port` when none was given.  A port that does
    /// not parse, or one that disagrees with an explicit `port`, is a config
    /// error.  Bracketed IPv6 addresses keep their brackets.
    pub fn split_host_port(mut self) -> Result<Self> {
        let Some(host) = self.host.clone() else {
            return Ok(self);
        };

        let split = if host.starts_with('[') {
            host.rsplit_once("]:").map(|(name, port)| (format!("{name}]"), port))
        } else if host.matches(':').count() == 1 {
            host.split_once(':').map(|(name, port)| (name.to_string(), port))
        } else {
            None
        };
        let Some((name, port)) = split else {
            return Ok(self);
        };

        let port: u16 = port.parse().map_err(|_| {
            ZoneError::Config(format!("'{host}' does not end in a valid port number"))
        })?;
        if let Some(configured) = self.port
            && configured != port
        {
            return Err(ZoneError::Config(format!(
                "server '{host}' names port {port} but port {configured} was also given"
            )));
        }

        self.host = Some(name);
        self.port = Some(port);
        Ok(self)
    }

    /// Check values that clap cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        if let Some(host) = &self.host
            && host.trim().is_empty()
        {
            return Err(ZoneError::Config("host must not be empty".into()));
        }
        if let Some(host) = &self.host
            && host.starts_with('/')
        {
            return Err(ZoneError::Config(format!(
                "'{host}' is a local socket; only network servers are supported"
            )));
        }
        if self.port == Some(0) {
            return Err(ZoneError::Config("port must be between 1 and 65535".into()));
        }
        if let Some(origin) = &self.origin
            && origin.trim_end_matches('.').is_empty()
        {
            return Err(ZoneError::Config("origin must name a domain".into()));
        }
        Ok(())
    }

    /// The `$ORIGIN` line to emit first, if an origin was configured.
    ///
    /// The domain is made fully qualified.
    pub fn origin_directive(&self) -> Option<String> {
        self.origin.as_ref().map(|origin| {
            let origin = origin.trim();
            if origin.ends_with('.') {
                format!("$ORIGIN {origin}")
            } else {
                format!("$ORIGIN {origin}.")
            }
        })
    }
}
