// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for zonewerk.

use thiserror::Error;

/// Top-level error type for all zonewerk operations.
///
/// Every variant is fatal: a run either produces the complete zone fragment
/// or stops at the first failure.
#[derive(Debug, Error)]
pub enum ZoneError {
    // -- Print server errors --
    #[error("cannot reach print server: {0}")]
    Connection(String),

    #[error("print server rejected credentials: {0}")]
    Authentication(String),

    #[error("IPP request failed: {0}")]
    IppRequest(String),

    #[error("printer '{printer}' is missing attribute '{attribute}'")]
    MissingAttribute { printer: String, attribute: String },

    // -- Printer metadata --
    #[error("PPD for printer '{printer}': {reason}")]
    Ppd { printer: String, reason: String },

    #[error("malformed printer URI '{uri}': {reason}")]
    MalformedUri { uri: String, reason: String },

    // -- Text --
    #[error("invalid escaped text: {0}")]
    Escape(String),

    // -- Output / setup --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ZoneError>;
