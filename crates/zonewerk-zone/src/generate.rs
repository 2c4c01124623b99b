// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// One generator run: enumerate, describe, and write each shared printer in
// name order.
//
// Printers are awaited one at a time and each printer's records are written
// before the next printer is fetched, so a failure part-way through leaves
// the records already written on the output.

use std::io::Write;

use tracing::{debug, info, instrument};

use zonewerk_core::GeneratorConfig;
use zonewerk_core::error::Result;
use zonewerk_core::source::PrinterSource;

use crate::records::{HostResolution, ZoneRecordBuilder};

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    /// Printers whose records were written.
    pub published: usize,
    /// Printers skipped because they are not shared.
    pub skipped: usize,
}

/// Drives a [`PrinterSource`] through a [`ZoneRecordBuilder`].
pub struct ZoneGenerator<S> {
    source: S,
    builder: ZoneRecordBuilder,
    config: GeneratorConfig,
}

impl<S: PrinterSource> ZoneGenerator<S> {
    pub fn new(source: S, config: GeneratorConfig) -> Self {
        let builder = ZoneRecordBuilder::new(&config);
        Self {
            source,
            builder,
            config,
        }
    }

    /// Use a different builder, e.g. one with a custom escaper.
    pub fn with_builder(mut self, builder: ZoneRecordBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Write the zone fragment for every shared printer to `out`.
    #[instrument(skip(self, out), fields(host = self.config.server_host()))]
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<GenerationSummary> {
        if let Some(origin) = self.config.origin_directive() {
            writeln!(out, "{origin}")?;
        }

        let mut printers = self.source.list_printers().await?;
        printers.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(count = printers.len(), "printers listed");

        let mut hosts = HostResolution::new(self.config.host.as_deref());
        let mut summary = GenerationSummary::default();

        for listing in &printers {
            if !listing.shared {
                debug!(printer = %listing.name, "not shared, skipping");
                summary.skipped += 1;
                continue;
            }

            let description = self.source.describe(listing).await?;
            let (records, next) = self.builder.build(&description, hosts)?;
            hosts = next;

            if records.is_empty() {
                summary.skipped += 1;
                continue;
            }
            records.write_to(out)?;
            summary.published += 1;
        }

        out.flush()?;
        info!(
            published = summary.published,
            skipped = summary.skipped,
            "zone fragment written"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    use zonewerk_core::error::ZoneError;
    use zonewerk_core::types::{PrinterDescription, PrinterListing, printer_type};

    /// In-memory print server.
    #[derive(Default)]
    struct FakeSource {
        listings: Vec<PrinterListing>,
        uuids: HashMap<String, String>,
        described: RefCell<Vec<String>>,
    }

    impl FakeSource {
        fn with_printer(mut self, name: &str, shared: bool, uri: &str, bits: u32) -> Self {
            self.listings.push(PrinterListing {
                name: name.into(),
                shared,
                make_and_model: format!("{name} model"),
                location: "Lab".into(),
                uri: uri.into(),
                printer_type: bits,
            });
            self.uuids
                .insert(name.into(), format!("urn:uuid:{name}-uuid"));
            self
        }
    }

    impl PrinterSource for FakeSource {
        async fn list_printers(&self) -> Result<Vec<PrinterListing>> {
            Ok(self.listings.clone())
        }

        async fn describe(&self, listing: &PrinterListing) -> Result<PrinterDescription> {
            self.described.borrow_mut().push(listing.name.clone());
            let uuid = self.uuids.get(&listing.name).cloned().ok_or_else(|| {
                ZoneError::MissingAttribute {
                    printer: listing.name.clone(),
                    attribute: "printer-uuid".into(),
                }
            })?;
            PrinterDescription::from_listing(
                listing.clone(),
                uuid,
                vec!["application/postscript".into()],
                "(Fake)".into(),
            )
        }
    }

    async fn generate(source: FakeSource, config: GeneratorConfig) -> (String, GenerationSummary) {
        let generator = ZoneGenerator::new(source, config);
        let mut out = Vec::new();
        let summary = generator.run(&mut out).await.unwrap();
        (String::from_utf8(out).unwrap(), summary)
    }

    #[tokio::test]
    async fn writes_shared_printers_in_name_order() {
        let source = FakeSource::default()
            .with_printer("zeta", true, "ipp://cups.lan:631/printers/zeta", 0)
            .with_printer("alpha", true, "ipp://cups.lan:631/printers/alpha", 0);

        let (text, summary) = generate(source, GeneratorConfig::default()).await;

        assert_eq!(summary.published, 2);
        let alpha = text.find("alpha._ipp").unwrap();
        let zeta = text.find("zeta._ipp").unwrap();
        assert!(alpha < zeta);
        // Blank line after each service block.
        assert_eq!(text.matches("\n\n").count(), 4);
    }

    #[tokio::test]
    async fn unshared_printers_are_not_described_or_written() {
        let source = FakeSource::default()
            .with_printer("private", false, "ipp://cups.lan/printers/private", 0)
            .with_printer("public", true, "ipp://cups.lan/printers/public", 0);
        let generator = ZoneGenerator::new(source, GeneratorConfig::default());
        let mut out = Vec::new();
        let summary = generator.run(&mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(summary, GenerationSummary { published: 1, skipped: 1 });
        assert!(!text.contains("private"));
        assert_eq!(*generator.source.described.borrow(), vec!["public".to_string()]);
    }

    #[tokio::test]
    async fn color_printer_scenario() {
        let mut source = FakeSource::default().with_printer(
            "Color-Printer",
            true,
            "ipp://printhost.example.com:631/printers/Color-Printer",
            printer_type::COLOR,
        );
        source
            .uuids
            .insert("Color-Printer".into(), "urn:uuid:1234-5678".into());

        let (text, _) = generate(source, GeneratorConfig::default()).await;

        assert!(text.contains("\"Color=T\""));
        assert!(text.contains("\"Fax=F\""));
        assert!(text.contains("\"Scan=F\""));
        assert!(text.contains("\"rp=printers/Color-Printer\""));
        assert!(text.contains("\"UUID=1234-5678\""));
        assert!(text.contains("Color-Printer._ipp\t\tSRV\t0 0 631 printhost.example.com.\n"));
        assert!(text.contains("Color-Printer._ipps\t\tSRV\t0 0 631 printhost.example.com.\n"));
    }

    #[tokio::test]
    async fn configured_port_applies_when_uri_has_none() {
        let source = FakeSource::default()
            .with_printer("a", true, "ipp://cups.lan/printers/a", 0)
            .with_printer("b", true, "ipp://cups.lan:9100/printers/b", 0);
        let config = GeneratorConfig {
            port: Some(8631),
            ..Default::default()
        };

        let (text, _) = generate(source, config).await;

        assert!(text.contains("a._ipp\t\tSRV\t0 0 8631 cups.lan.\n"));
        assert!(text.contains("b._ipp\t\tSRV\t0 0 9100 cups.lan.\n"));
    }

    #[tokio::test]
    async fn configured_host_is_published() {
        let source =
            FakeSource::default().with_printer("a", true, "ipp://localhost:631/printers/a", 0);
        let config = GeneratorConfig {
            host: Some("print.example.com".into()),
            ..Default::default()
        };

        let (text, _) = generate(source, config).await;

        assert!(text.contains("SRV\t0 0 631 print.example.com.\n"));
        assert!(text.contains("adminurl=https://print.example.com:631/printers/a"));
    }

    #[tokio::test]
    async fn origin_directive_comes_first() {
        let source = FakeSource::default().with_printer("a", true, "ipp://h/printers/a", 0);
        let config = GeneratorConfig {
            origin: Some("_tcp.example.com".into()),
            ..Default::default()
        };

        let (text, _) = generate(source, config).await;

        assert!(text.starts_with("$ORIGIN _tcp.example.com.\n_ipp\t\t\tPTR\ta._ipp\n"));
    }

    #[tokio::test]
    async fn describe_failure_aborts_the_run() {
        let mut source = FakeSource::default()
            .with_printer("a", true, "ipp://h/printers/a", 0)
            .with_printer("b", true, "ipp://h/printers/b", 0);
        source.uuids.remove("b");

        let generator = ZoneGenerator::new(source, GeneratorConfig::default());
        let mut out = Vec::new();
        let err = generator.run(&mut out).await.unwrap_err();

        assert!(matches!(err, ZoneError::MissingAttribute { .. }));
        // "a" was already written before "b" failed.
        assert!(String::from_utf8(out).unwrap().contains("a._ipps"));
    }

    #[tokio::test]
    async fn malformed_uri_is_fatal() {
        let source = FakeSource::default().with_printer("a", true, "::not a uri::", 0);
        let generator = ZoneGenerator::new(source, GeneratorConfig::default());
        let err = generator.run(&mut Vec::new()).await.unwrap_err();
        assert!(matches!(err, ZoneError::MalformedUri { .. }));
    }

    #[tokio::test]
    async fn custom_builder_is_used() {
        fn shout(text: &str) -> String {
            text.to_uppercase()
        }
        let source = FakeSource::default().with_printer("quiet", true, "ipp://h/printers/q", 0);
        let config = GeneratorConfig::default();
        let builder = ZoneRecordBuilder::new(&config).with_escaper(shout);
        let generator = ZoneGenerator::new(source, config).with_builder(builder);

        let mut out = Vec::new();
        generator.run(&mut out).await.unwrap();

        assert!(String::from_utf8(out).unwrap().contains("QUIET._ipp\t\tSRV"));
    }

    #[tokio::test]
    async fn repeated_runs_are_identical() {
        let build = || {
            FakeSource::default()
                .with_printer("b", true, "ipp://h/printers/b", printer_type::DUPLEX)
                .with_printer("a", true, "ipp://h/printers/a", printer_type::FAX)
        };
        let (first, _) = generate(build(), GeneratorConfig::default()).await;
        let (second, _) = generate(build(), GeneratorConfig::default()).await;
        assert_eq!(first, second);
    }
}
