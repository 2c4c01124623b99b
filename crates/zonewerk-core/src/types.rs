// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the zonewerk zone generator.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, ZoneError};

/// IANA-registered IPP port, used when neither the printer URI nor the
/// configuration names one.
pub const DEFAULT_IPP_PORT: u16 = 631;

/// Document formats that may be advertised in the `pdl` TXT key, in the
/// order they are emitted.  `application/pdf` is always advertised first and
/// is not part of this list.
pub const ADVERTISED_DOCUMENT_FORMATS: &[&str] = &[
    "application/postscript",
    "application/vnd.cups-raster",
    "image/png",
    "image/jpeg",
    "image/pwg-raster",
    "image/urf",
];

/// CUPS printer-type bits (`cups_ptype_e`).
pub mod printer_type {
    pub const COLOR: u32 = 0x0000_0004;
    pub const DUPLEX: u32 = 0x0000_0008;
    pub const STAPLE: u32 = 0x0000_0010;
    pub const COPIES: u32 = 0x0000_0020;
    pub const COLLATE: u32 = 0x0000_0040;
    pub const PUNCH: u32 = 0x0000_0080;
    pub const BIND: u32 = 0x0000_0200;
    pub const SORT: u32 = 0x0000_0400;
    pub const FAX: u32 = 0x0004_0000;
    /// `CUPS_PRINTER_MFP`, advertised as the Bonjour `Scan` key.
    pub const SCAN: u32 = 0x0400_0000;
}

/// Bonjour capability keys and the printer-type bit each one reflects, in TXT
/// record order.
pub const CAPABILITY_FLAGS: &[(&str, u32)] = &[
    ("Fax", printer_type::FAX),
    ("Color", printer_type::COLOR),
    ("Duplex", printer_type::DUPLEX),
    ("Staple", printer_type::STAPLE),
    ("Copies", printer_type::COPIES),
    ("Collate", printer_type::COLLATE),
    ("Punch", printer_type::PUNCH),
    ("Bind", printer_type::BIND),
    ("Sort", printer_type::SORT),
    ("Scan", printer_type::SCAN),
];

/// DNS-SD service types a shared printer is published under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceType {
    /// Plain IPP (`_ipp._tcp`).
    Ipp,
    /// IPP over TLS (`_ipps._tcp`).
    Ipps,
}

impl ServiceType {
    /// Both service types in emission order.
    pub const ALL: [ServiceType; 2] = [ServiceType::Ipp, ServiceType::Ipps];

    /// Owner label relative to a `$ORIGIN` of `_tcp.<domain>.`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ipp => "_ipp",
            Self::Ipps => "_ipps",
        }
    }
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A printer's advertised URI split into the parts the zone records need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterUri {
    pub scheme: String,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub path: String,
}

impl PrinterUri {
    /// Parse an `ipp://`, `ipps://`, or `http(s)://` printer URI.
    pub fn parse(uri: &str) -> Result<Self> {
        let parsed = Url::parse(uri).map_err(|e| ZoneError::MalformedUri {
            uri: uri.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            scheme: parsed.scheme().to_string(),
            host: parsed.host_str().map(str::to_string),
            port: parsed.port(),
            path: parsed.path().to_string(),
        })
    }

    /// Resource path without its leading `/` (the Bonjour `rp` key).
    pub fn resource_path(&self) -> &str {
        self.path.strip_prefix('/').unwrap_or(&self.path)
    }
}

impl std::fmt::Display for PrinterUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:", self.scheme)?;
        if let Some(host) = &self.host {
            write!(f, "//{host}")?;
            if let Some(port) = self.port {
                write!(f, ":{port}")?;
            }
        }
        f.write_str(&self.path)
    }
}

/// Attributes returned for every queue when the print server enumerates its
/// printers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterListing {
    /// Queue name (`printer-name`), also the DNS-SD instance label.
    pub name: String,
    /// `printer-is-shared`.
    pub shared: bool,
    /// `printer-make-and-model`.
    pub make_and_model: String,
    /// `printer-location`.
    pub location: String,
    /// `printer-uri-supported` (first value).
    pub uri: String,
    /// Raw CUPS `printer-type` bitmask.
    pub printer_type: u32,
}

/// Everything needed to publish one printer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterDescription {
    pub name: String,
    pub shared: bool,
    pub uri: PrinterUri,
    pub make_and_model: String,
    pub location: String,
    /// `printer-uuid`, usually with its `urn:uuid:` prefix.
    pub uuid: String,
    /// `document-format-supported`, as reported.
    pub document_formats: Vec<String>,
    /// Raw CUPS `printer-type` bitmask.
    pub printer_type: u32,
    /// PPD `*Product` value.
    pub product: String,
}

impl PrinterDescription {
    /// Combine an enumeration entry with the extended attributes fetched for
    /// it.
    pub fn from_listing(
        listing: PrinterListing,
        uuid: String,
        document_formats: Vec<String>,
        product: String,
    ) -> Result<Self> {
        let uri = PrinterUri::parse(&listing.uri)?;
        Ok(Self {
            name: listing.name,
            shared: listing.shared,
            uri,
            make_and_model: listing.make_and_model,
            location: listing.location,
            uuid,
            document_formats,
            printer_type: listing.printer_type,
            product,
        })
    }
}
