// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Async CUPS client supplying printer descriptions to the zone generator.
//
// Uses the `ipp` crate for:
//   - CUPS-Get-Printers       (CUPS IPP extension, operation 0x4002)
//   - Get-Printer-Attributes  (RFC 8011 §4.2.5)
// and a plain HTTP GET of `/printers/<name>.ppd` for the PPD, which is how
// cupsd serves the PPD of a queue.

use std::collections::HashMap;

use ipp::operation::IppOperation;
use ipp::prelude::*;
use tracing::{debug, error, info, instrument};
use url::Url;

use zonewerk_core::GeneratorConfig;
use zonewerk_core::error::{Result, ZoneError};
use zonewerk_core::source::PrinterSource;
use zonewerk_core::types::{PrinterDescription, PrinterListing};

use crate::ppd;

/// Login for servers that require authentication.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Attributes of one IPP attribute group, keyed by name.
type AttributeMap = HashMap<String, IppAttribute>;

/// Client for one CUPS server.
pub struct CupsClient {
    /// `ipp://host:port/`, the base for every request.
    base: Url,
    credentials: Option<Credentials>,
    http: reqwest::Client,
}

impl CupsClient {
    /// Create a client for the server named by `config` (the local server
    /// when no host is configured).
    pub fn new(config: &GeneratorConfig, credentials: Option<Credentials>) -> Result<Self> {
        let host = config.server_host();
        let port = config.server_port();

        let mut base = Url::parse("ipp://localhost/")
            .map_err(|e| ZoneError::Config(format!("base URL: {e}")))?;
        base.set_host(Some(host))
            .map_err(|e| ZoneError::Config(format!("invalid host '{host}': {e}")))?;
        base.set_port(Some(port))
            .map_err(|()| ZoneError::Config(format!("cannot use port {port}")))?;

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ZoneError::Connection(format!("HTTP client: {e}")))?;

        debug!(
            server = %base,
            user = credentials.as_ref().map(|c| c.username.as_str()),
            "CUPS client ready"
        );
        Ok(Self {
            base,
            credentials,
            http,
        })
    }

    /// The `ipp://` URI requests are sent to.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// `ipp://host:port/printers/<name>`, with the name percent-encoded.
    pub fn printer_url(&self, name: &str) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ZoneError::Config(format!("'{}' cannot carry a path", self.base)))?
            .clear()
            .push("printers")
            .push(name);
        Ok(url)
    }

    /// `http://host:port/printers/<name>.ppd`.
    pub fn ppd_url(&self, name: &str) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ZoneError::Config(format!("'{}' cannot carry a path", self.base)))?
            .clear()
            .push("printers")
            .push(&format!("{name}.ppd"));
        let http = url.as_str().replacen("ipp://", "http://", 1);
        Url::parse(&http).map_err(|e| ZoneError::Config(format!("PPD URL '{http}': {e}")))
    }

    fn ipp_client(&self, uri: Uri) -> AsyncIppClient {
        match &self.credentials {
            Some(creds) => AsyncIppClient::builder(uri)
                .basic_auth(&creds.username, &creds.password)
                .build(),
            None => AsyncIppClient::new(uri),
        }
    }

    /// Send an operation and fail unless the server reports success.
    async fn send<O: IppOperation>(
        &self,
        target: &Url,
        operation_name: &str,
        build: impl FnOnce(Uri) -> O,
    ) -> Result<IppRequestResponse> {
        let uri: Uri = target
            .as_str()
            .parse()
            .map_err(|e| ZoneError::Config(format!("invalid URI '{target}': {e}")))?;
        let client = self.ipp_client(uri.clone());

        debug!(operation = operation_name, uri = %uri, "sending IPP request");
        let response = client
            .send(build(uri))
            .await
            .map_err(|e| transport_error(operation_name, &e.to_string()))?;

        let code = response.header().status_code();
        if !code.is_success() {
            error!(status = ?code, operation = operation_name, "IPP request failed");
            return Err(status_error(operation_name, &format!("{code:?}")));
        }

        Ok(response)
    }

    /// Download the PPD for a queue.
    #[instrument(skip(self))]
    pub async fn fetch_ppd(&self, name: &str) -> Result<String> {
        let url = self.ppd_url(name)?;
        let mut request = self.http.get(url.clone());
        if let Some(creds) = &self.credentials {
            request = request.basic_auth(&creds.username, Some(&creds.password));
        }

        let response = request
            .send()
            .await
            .map_err(|e| ZoneError::Connection(format!("GET {url}: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ZoneError::Authentication(format!("GET {url}: {status}")));
        }
        if !status.is_success() {
            return Err(ZoneError::Ppd {
                printer: name.to_string(),
                reason: format!("GET {url} returned {status}"),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ZoneError::Connection(format!("reading {url}: {e}")))?;
        debug!(bytes = body.len(), "PPD downloaded");
        Ok(body)
    }
}

impl PrinterSource for CupsClient {
    #[instrument(skip(self), fields(server = %self.base))]
    async fn list_printers(&self) -> Result<Vec<PrinterListing>> {
        let response = self
            .send(&self.base, "CUPS-Get-Printers", |_| {
                IppOperationBuilder::cups().get_printers()
            })
            .await?;

        let mut listings = Vec::new();
        for group in response.attributes().groups_of(DelimiterTag::PrinterAttributes) {
            listings.push(parse_listing(group.attributes())?);
        }

        info!(count = listings.len(), "printers listed");
        Ok(listings)
    }

    #[instrument(skip(self, listing), fields(printer = %listing.name))]
    async fn describe(&self, listing: &PrinterListing) -> Result<PrinterDescription> {
        let target = self.printer_url(&listing.name)?;
        let response = self
            .send(&target, "Get-Printer-Attributes", |uri| {
                IppOperationBuilder::get_printer_attributes(uri).build()
            })
            .await?;

        let attrs = merged_printer_attributes(response.attributes());
        let uuid = required(&attrs, &listing.name, "printer-uuid").map(text_value)?;
        let formats = required(&attrs, &listing.name, "document-format-supported")
            .map(text_values)?;

        let ppd_text = self.fetch_ppd(&listing.name).await?;
        let product = ppd::product(&listing.name, &ppd_text)?;

        debug!(uuid = %uuid, formats = formats.len(), product = %product, "printer described");
        PrinterDescription::from_listing(listing.clone(), uuid, formats, product)
    }
}

// ---------------------------------------------------------------------------
// Helper functions for parsing IPP responses
// ---------------------------------------------------------------------------

/// Build a listing from one printer-attributes group of a CUPS-Get-Printers
/// response.
fn parse_listing(attrs: &AttributeMap) -> Result<PrinterListing> {
    let name = required(attrs, "<unnamed>", "printer-name").map(text_value)?;

    let shared = attrs
        .get("printer-is-shared")
        .and_then(|a| bool_value(a.value()))
        .unwrap_or(false);

    let uri = required(attrs, &name, "printer-uri-supported").map(text_value)?;

    let printer_type = attrs
        .get("printer-type")
        .and_then(|a| int_value(a.value()))
        .ok_or_else(|| missing(&name, "printer-type"))?;

    Ok(PrinterListing {
        shared,
        make_and_model: optional_text(attrs, "printer-make-and-model"),
        location: optional_text(attrs, "printer-location"),
        uri,
        printer_type: printer_type as u32,
        name,
    })
}

/// Collapse every printer-attributes group into one map.
fn merged_printer_attributes(attrs: &IppAttributes) -> AttributeMap {
    let mut map = HashMap::new();
    for group in attrs.groups_of(DelimiterTag::PrinterAttributes) {
        for (name, attr) in group.attributes() {
            map.insert(name.clone(), attr.clone());
        }
    }
    map
}

fn required<'a>(attrs: &'a AttributeMap, printer: &str, name: &str) -> Result<&'a IppValue> {
    attrs
        .get(name)
        .map(|a| a.value())
        .ok_or_else(|| missing(printer, name))
}

fn missing(printer: &str, attribute: &str) -> ZoneError {
    ZoneError::MissingAttribute {
        printer: printer.to_string(),
        attribute: attribute.to_string(),
    }
}

fn optional_text(attrs: &AttributeMap, name: &str) -> String {
    attrs
        .get(name)
        .map(|a| text_value(a.value()))
        .unwrap_or_default()
}

/// String form of a single value, or of the first value of a set.
fn text_value(value: &IppValue) -> String {
    match value {
        IppValue::Array(values) => values.first().map(text_value).unwrap_or_default(),
        other => other.to_string(),
    }
}

/// String forms of every value of a (possibly single-valued) attribute.
fn text_values(value: &IppValue) -> Vec<String> {
    match value {
        IppValue::Array(values) => values.iter().map(|v| v.to_string()).collect(),
        other => vec![other.to_string()],
    }
}

fn int_value(value: &IppValue) -> Option<i32> {
    match value {
        IppValue::Integer(n) | IppValue::Enum(n) => Some(*n),
        IppValue::Array(values) => values.first().and_then(int_value),
        _ => None,
    }
}

fn bool_value(value: &IppValue) -> Option<bool> {
    match value {
        IppValue::Boolean(b) => Some(*b),
        IppValue::Array(values) => values.first().and_then(bool_value),
        _ => None,
    }
}

/// Classify a failure to get any IPP response at all.
fn transport_error(operation: &str, detail: &str) -> ZoneError {
    if detail.contains("401") || detail.to_lowercase().contains("unauthorized") {
        ZoneError::Authentication(format!("{operation}: {detail}"))
    } else {
        ZoneError::Connection(format!("{operation}: {detail}"))
    }
}

/// Classify an unsuccessful IPP status.
fn status_error(operation: &str, status: &str) -> ZoneError {
    if status.contains("NotAuthenticated") {
        ZoneError::Authentication(format!("{operation} returned status {status}"))
    } else {
        ZoneError::IppRequest(format!("{operation} returned status {status}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(name: &str, value: IppValue) -> (String, IppAttribute) {
        (name.to_string(), IppAttribute::new(name, value))
    }

    fn listing_attrs() -> AttributeMap {
        [
            attr(
                "printer-name",
                IppValue::NameWithoutLanguage("Color-Printer".into()),
            ),
            attr("printer-is-shared", IppValue::Boolean(true)),
            attr(
                "printer-uri-supported",
                IppValue::Array(vec![
                    IppValue::Uri("ipp://printhost.example.com:631/printers/Color-Printer".into()),
                    IppValue::Uri("ipps://printhost.example.com:631/printers/Color-Printer".into()),
                ]),
            ),
            attr("printer-type", IppValue::Enum(0x801c)),
            attr(
                "printer-make-and-model",
                IppValue::TextWithoutLanguage("HP Color LaserJet".into()),
            ),
            attr(
                "printer-location",
                IppValue::TextWithoutLanguage("Room 101".into()),
            ),
        ]
        .into_iter()
        .collect()
    }

    fn client() -> CupsClient {
        let config = GeneratorConfig {
            host: Some("cups.example.com".into()),
            port: Some(8631),
            ..Default::default()
        };
        CupsClient::new(&config, None).unwrap()
    }

    #[test]
    fn parses_listing_group() {
        let listing = parse_listing(&listing_attrs()).unwrap();
        assert_eq!(listing.name, "Color-Printer");
        assert!(listing.shared);
        assert_eq!(
            listing.uri,
            "ipp://printhost.example.com:631/printers/Color-Printer"
        );
        assert_eq!(listing.printer_type, 0x801c);
        assert_eq!(listing.make_and_model, "HP Color LaserJet");
        assert_eq!(listing.location, "Room 101");
    }

    #[test]
    fn absent_shared_flag_means_unshared() {
        let mut attrs = listing_attrs();
        attrs.remove("printer-is-shared");
        assert!(!parse_listing(&attrs).unwrap().shared);
    }

    #[test]
    fn listing_without_uri_is_rejected() {
        let mut attrs = listing_attrs();
        attrs.remove("printer-uri-supported");
        let err = parse_listing(&attrs).unwrap_err();
        assert!(
            matches!(err, ZoneError::MissingAttribute { ref attribute, .. } if attribute == "printer-uri-supported")
        );
    }

    #[test]
    fn multi_valued_formats() {
        let formats = text_values(&IppValue::Array(vec![
            IppValue::MimeMediaType("application/pdf".into()),
            IppValue::MimeMediaType("image/urf".into()),
        ]));
        assert_eq!(formats, vec!["application/pdf", "image/urf"]);
        assert_eq!(
            text_values(&IppValue::MimeMediaType("image/png".into())),
            vec!["image/png"]
        );
    }

    #[test]
    fn urls_are_built_from_config() {
        let client = client();
        assert_eq!(client.base().as_str(), "ipp://cups.example.com:8631/");
        assert_eq!(
            client.printer_url("Front Desk").unwrap().as_str(),
            "ipp://cups.example.com:8631/printers/Front%20Desk"
        );
        assert_eq!(
            client.ppd_url("office").unwrap().as_str(),
            "http://cups.example.com:8631/printers/office.ppd"
        );
    }

    #[test]
    fn server_with_port_connects_to_that_port() {
        let config = GeneratorConfig {
            host: Some("cups.example.com:8631".into()),
            ..Default::default()
        }
        .split_host_port()
        .unwrap();
        let client = CupsClient::new(&config, None).unwrap();
        assert_eq!(client.base().as_str(), "ipp://cups.example.com:8631/");
    }

    #[test]
    fn local_default_server() {
        let client = CupsClient::new(&GeneratorConfig::default(), None).unwrap();
        assert_eq!(client.base().as_str(), "ipp://localhost:631/");
    }

    #[test]
    fn credentials_are_redacted() {
        let creds = Credentials {
            username: "admin".into(),
            password: "hunter2".into(),
        };
        let shown = format!("{creds:?}");
        assert!(shown.contains("admin"));
        assert!(!shown.contains("hunter2"));
    }

    #[test]
    fn error_classification() {
        assert!(matches!(
            transport_error("CUPS-Get-Printers", "HTTP error: 401 Unauthorized"),
            ZoneError::Authentication(_)
        ));
        assert!(matches!(
            transport_error("CUPS-Get-Printers", "connection refused"),
            ZoneError::Connection(_)
        ));
        assert!(matches!(
            status_error("Get-Printer-Attributes", "ClientErrorNotAuthenticated"),
            ZoneError::Authentication(_)
        ));
        assert!(matches!(
            status_error("Get-Printer-Attributes", "ClientErrorNotFound"),
            ZoneError::IppRequest(_)
        ));
    }
}
