// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// zonewerk — Core types, errors, and DNS text escaping shared across all crates.

pub mod config;
pub mod error;
pub mod escape;
pub mod human_errors;
pub mod source;
pub mod types;

pub use config::GeneratorConfig;
pub use error::ZoneError;
pub use escape::{escape, escape_txt, unescape};
pub use source::PrinterSource;
pub use types::*;
