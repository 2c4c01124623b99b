// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The seam between zone generation and the print server.

use crate::error::Result;
use crate::types::{PrinterDescription, PrinterListing};

/// Supplies printer descriptions to the zone generator.
///
/// The generator lists every queue, then calls [`describe`] once per shared
/// queue in name order.  Any error aborts the run.
///
/// [`describe`]: PrinterSource::describe
#[allow(async_fn_in_trait)]
pub trait PrinterSource {
    /// Enumerate the queues known to the print server.
    async fn list_printers(&self) -> Result<Vec<PrinterListing>>;

    /// Fetch the extended attributes and PPD metadata for one queue and
    /// return its complete description.
    async fn describe(&self, listing: &PrinterListing) -> Result<PrinterDescription>;
}
