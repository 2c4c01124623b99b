// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// zonewerk Zone — builds the Bonjour TXT keys and the PTR/SRV/TXT lines that
// publish each shared printer in a Wide-Area DNS-SD zone.

pub mod generate;
pub mod records;
pub mod txt;

pub use generate::{GenerationSummary, ZoneGenerator};
pub use records::{HostResolution, ZoneRecordBuilder, ZoneRecordSet};
pub use txt::TxtField;
