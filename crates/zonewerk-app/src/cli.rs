// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments.

use clap::{ArgAction, Parser};

use zonewerk_core::GeneratorConfig;

/// Generate a Wide Area Bonjour DNS zone file fragment for the shared
/// printers of a CUPS server.
///
/// The output assumes the zone file contains an `$ORIGIN` line similar to
/// `$ORIGIN _tcp.example.com.`
#[derive(Debug, Parser)]
#[command(name = "zonewerk", version)]
pub struct Args {
    /// Hostname of the CUPS server (optional).
    #[arg(short = 'H', long = "host", value_name = "HOSTNAME", env = "CUPS_SERVER")]
    pub hostname: Option<String>,

    /// Port number of the CUPS server.
    #[arg(short = 'P', long, value_name = "PORT", env = "IPP_PORT")]
    pub port: Option<u16>,

    /// Username to authenticate with against CUPS (prompts for a password).
    #[arg(short = 'u', long = "user", value_name = "USER")]
    pub username: Option<String>,

    /// Include the printer specified URI as the adminurl.
    #[arg(short = 'a', long = "admin")]
    pub adminurl: bool,

    /// Emit a leading `$ORIGIN` directive for this domain.
    #[arg(long, value_name = "DOMAIN")]
    pub origin: Option<String>,

    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn config(&self) -> GeneratorConfig {
        GeneratorConfig {
            host: self.hostname.clone(),
            port: self.port,
            user: self.username.clone(),
            admin_url: self.adminurl,
            origin: self.origin.clone(),
        }
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
