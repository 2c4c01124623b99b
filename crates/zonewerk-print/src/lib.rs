// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// zonewerk Print — the CUPS side: printer enumeration and extended
// attributes over IPP, plus the PPD `*Product` lookup.

pub mod cups_client;
pub mod ppd;

pub use cups_client::{CupsClient, Credentials};
