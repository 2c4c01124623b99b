// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bonjour printing TXT record keys.
//
// Field order and fixed values follow what AirPrint/Bonjour clients expect
// from a CUPS-shared queue: resource path and model first, then the document
// formats, then one T/F key per printer-type capability bit.

use serde::Serialize;

use zonewerk_core::escape::escape_txt;
use zonewerk_core::types::{ADVERTISED_DOCUMENT_FORMATS, CAPABILITY_FLAGS, PrinterDescription};

/// Always advertised first in `pdl`.
const BASE_DOCUMENT_FORMAT: &str = "application/pdf";

const UUID_URN_PREFIX: &str = "urn:uuid:";

/// One `key=value` string of a TXT record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxtField {
    pub key: &'static str,
    pub value: String,
}

impl TxtField {
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }

    /// Render as a quoted character-string.  Only `"` and `\` in the value
    /// are escaped.
    pub fn render(&self) -> String {
        format!("\"{}={}\"", self.key, escape_txt(&self.value))
    }
}

/// Build the ordered TXT fields for one printer.
///
/// `host` and `port` are the already-resolved SRV target, reused for the
/// `adminurl` key.
pub fn txt_fields(desc: &PrinterDescription, host: &str, port: u16) -> Vec<TxtField> {
    let rp = desc.uri.resource_path();

    let mut fields = vec![
        TxtField::new("rp", rp),
        TxtField::new("ty", desc.make_and_model.as_str()),
        TxtField::new("adminurl", format!("https://{host}:{port}/{rp}")),
        TxtField::new("priority", "0"),
        TxtField::new("product", desc.product.as_str()),
        TxtField::new("note", desc.location.as_str()),
        TxtField::new("pdl", pdl(&desc.document_formats)),
        TxtField::new("air", "username,password"),
        TxtField::new("UUID", strip_uuid_prefix(&desc.uuid)),
        TxtField::new("TLS", "1.2"),
        TxtField::new("Transparent", "F"),
        TxtField::new("Binary", "F"),
    ];

    fields.extend(capability_fields(desc.printer_type));

    fields.push(TxtField::new("printer-state", "3"));
    fields.push(TxtField::new("printer-type", format!("{:#x}", desc.printer_type)));
    fields.push(TxtField::new("URF", "DM3"));

    fields
}

/// One `T`/`F` field per capability bit, in table order.
pub fn capability_fields(printer_type: u32) -> impl Iterator<Item = TxtField> {
    CAPABILITY_FLAGS.iter().map(move |&(key, bit)| {
        let value = if printer_type & bit != 0 { "T" } else { "F" };
        TxtField::new(key, value)
    })
}

/// `application/pdf` followed by the supported formats that Bonjour clients
/// understand, in advertisement order.
pub fn pdl(supported: &[String]) -> String {
    let mut formats = vec![BASE_DOCUMENT_FORMAT];
    formats.extend(
        ADVERTISED_DOCUMENT_FORMATS
            .iter()
            .copied()
            .filter(|format| supported.iter().any(|s| s == format)),
    );
    formats.join(",")
}

/// `urn:uuid:1234` → `1234`.
pub fn strip_uuid_prefix(uuid: &str) -> &str {
    uuid.strip_prefix(UUID_URN_PREFIX).unwrap_or(uuid)
}
