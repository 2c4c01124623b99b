// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PTR/SRV/TXT record emission for one printer.
//
// Each shared printer yields a block per service type:
//
//   _ipp                    PTR  <name>._ipp
//   _cups._sub._ipp         PTR  <name>._ipp
//   _universal._sub._ipp    PTR  <name>._ipp
//   <name>._ipp             SRV  0 0 <port> <host>.
//   <name>._ipp             TXT  "txtvers=1" "qtotal=1" ...
//
// followed by a blank line.  Owners are relative to a `$ORIGIN` of
// `_tcp.<domain>.`.

use std::fmt;
use std::io::Write;

use tracing::{debug, instrument};

use zonewerk_core::GeneratorConfig;
use zonewerk_core::error::{Result, ZoneError};
use zonewerk_core::escape::escape;
use zonewerk_core::types::{DEFAULT_IPP_PORT, PrinterDescription, PrinterUri, ServiceType};

use crate::txt::{TxtField, txt_fields};

/// Column the record type of a service-level owner is aligned to, assuming
/// 8-column tab stops.
const OWNER_COLUMN: usize = 24;

/// Tabs between an instance owner (`<name>._ipp`) and its record type.
const INSTANCE_OWNER_TABS: usize = 2;

/// Subtypes every printer is also browsable under.
const SUBTYPES: [&str; 2] = ["_cups", "_universal"];

/// Leading TXT strings required by the Bonjour printing spec.
const TXT_PREAMBLE: &str = "\"txtvers=1\" \"qtotal=1\"";

/// Resource record types emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    Ptr,
    Srv,
    Txt,
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ptr => "PTR",
            Self::Srv => "SRV",
            Self::Txt => "TXT",
        })
    }
}

/// One zone-file line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneLine {
    Record {
        owner: String,
        tabs: usize,
        record_type: RecordType,
        rdata: String,
    },
    Blank,
}

impl ZoneLine {
    fn service_owned(owner: String, record_type: RecordType, rdata: String) -> Self {
        let tabs = OWNER_COLUMN.saturating_sub(owner.len()).div_ceil(8).max(1);
        Self::Record {
            owner,
            tabs,
            record_type,
            rdata,
        }
    }

    fn instance_owned(owner: String, record_type: RecordType, rdata: String) -> Self {
        Self::Record {
            owner,
            tabs: INSTANCE_OWNER_TABS,
            record_type,
            rdata,
        }
    }

    pub fn record_type(&self) -> Option<RecordType> {
        match self {
            Self::Record { record_type, .. } => Some(*record_type),
            Self::Blank => None,
        }
    }
}

impl fmt::Display for ZoneLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record {
                owner,
                tabs,
                record_type,
                rdata,
            } => write!(f, "{owner}{}{record_type}\t{rdata}", "\t".repeat(*tabs)),
            Self::Blank => Ok(()),
        }
    }
}

/// The ordered lines published for one printer.  Empty for unshared
/// printers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneRecordSet {
    pub lines: Vec<ZoneLine>,
}

impl ZoneRecordSet {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Write every line, newline-terminated.
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<()> {
        for line in &self.lines {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ZoneRecordSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// SRV target resolution carried from one printer to the next.
///
/// A configured host always wins.  Without one, the host of the first
/// printer URI that names a host is adopted and reused for the rest of the
/// run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostResolution {
    Configured(String),
    Adopted(String),
    Unresolved,
}

impl HostResolution {
    pub fn new(configured: Option<&str>) -> Self {
        match configured {
            Some(host) => Self::Configured(host.to_string()),
            None => Self::Unresolved,
        }
    }

    /// The host to publish for a printer with this URI, and the state to
    /// carry to the next printer.
    pub fn resolve(self, uri: &PrinterUri) -> Result<(String, Self)> {
        match self {
            Self::Configured(host) => Ok((host.clone(), Self::Configured(host))),
            Self::Adopted(host) => Ok((host.clone(), Self::Adopted(host))),
            Self::Unresolved => {
                let host = uri.host.clone().ok_or_else(|| ZoneError::MalformedUri {
                    uri: uri.to_string(),
                    reason: "no host to publish as the SRV target".into(),
                })?;
                debug!(host = %host, "adopting printer URI host as SRV target");
                Ok((host.clone(), Self::Adopted(host)))
            }
        }
    }
}

/// URI port, then configured port, then the IPP default.
pub fn resolve_port(uri: &PrinterUri, configured: Option<u16>) -> u16 {
    uri.port.or(configured).unwrap_or(DEFAULT_IPP_PORT)
}

/// Builds the zone records for printer descriptions.
#[derive(Debug, Clone)]
pub struct ZoneRecordBuilder {
    configured_port: Option<u16>,
    escaper: fn(&str) -> String,
}

impl ZoneRecordBuilder {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            configured_port: config.port,
            escaper: escape,
        }
    }

    /// Replace the text escaper applied to instance labels.
    pub fn with_escaper(mut self, escaper: fn(&str) -> String) -> Self {
        self.escaper = escaper;
        self
    }

    /// Records for one printer.  Unshared printers yield an empty set and
    /// leave the host state untouched.
    #[instrument(skip(self, desc, hosts), fields(printer = %desc.name))]
    pub fn build(
        &self,
        desc: &PrinterDescription,
        hosts: HostResolution,
    ) -> Result<(ZoneRecordSet, HostResolution)> {
        if !desc.shared {
            debug!("printer not shared, skipping");
            return Ok((ZoneRecordSet::default(), hosts));
        }

        let port = resolve_port(&desc.uri, self.configured_port);
        let (host, hosts) = hosts.resolve(&desc.uri)?;
        let fields = txt_fields(desc, &host, port);
        let label = (self.escaper)(&desc.name);

        let mut lines = Vec::with_capacity(ServiceType::ALL.len() * 6);
        for service in ServiceType::ALL {
            self.push_service_block(&mut lines, service, &label, &host, port, &fields);
        }

        debug!(host = %host, port, lines = lines.len(), "built printer records");
        Ok((ZoneRecordSet { lines }, hosts))
    }

    /// Records for every description, in name order.
    pub fn build_all(
        &self,
        descriptions: &[PrinterDescription],
        mut hosts: HostResolution,
    ) -> Result<Vec<ZoneRecordSet>> {
        let mut sorted: Vec<&PrinterDescription> = descriptions.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));

        let mut sets = Vec::with_capacity(sorted.len());
        for desc in sorted {
            let (set, next) = self.build(desc, hosts)?;
            hosts = next;
            if !set.is_empty() {
                sets.push(set);
            }
        }
        Ok(sets)
    }

    fn push_service_block(
        &self,
        lines: &mut Vec<ZoneLine>,
        service: ServiceType,
        label: &str,
        host: &str,
        port: u16,
        fields: &[TxtField],
    ) {
        let instance = format!("{label}.{service}");

        lines.push(ZoneLine::service_owned(
            service.label().to_string(),
            RecordType::Ptr,
            instance.clone(),
        ));
        for subtype in SUBTYPES {
            lines.push(ZoneLine::service_owned(
                format!("{subtype}._sub.{service}"),
                RecordType::Ptr,
                instance.clone(),
            ));
        }

        lines.push(ZoneLine::instance_owned(
            instance.clone(),
            RecordType::Srv,
            format!("0 0 {port} {host}."),
        ));

        let mut txt = String::from(TXT_PREAMBLE);
        for field in fields {
            txt.push(' ');
            txt.push_str(&field.render());
        }
        lines.push(ZoneLine::instance_owned(instance, RecordType::Txt, txt));

        lines.push(ZoneLine::Blank);
    }
}
