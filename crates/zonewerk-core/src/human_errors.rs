// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable explanations for fatal errors.
//
// The binary prints the technical error first and the suggestion underneath,
// so the suggestion never repeats the detail.

use crate::error::ZoneError;

/// A plain-language summary of an error with something to try next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HumanError {
    /// One-line summary.
    pub message: String,
    /// What the operator should check.
    pub suggestion: String,
}

/// Convert a `ZoneError` into a `HumanError`.
pub fn humanize_error(err: &ZoneError) -> HumanError {
    match err {
        ZoneError::Connection(_) => HumanError {
            message: "Could not talk to the print server.".into(),
            suggestion: "Check that CUPS is running and reachable, or pass --host and --port."
                .into(),
        },

        ZoneError::Authentication(_) => HumanError {
            message: "The print server refused the login.".into(),
            suggestion: "Re-run with --user and enter the correct password.".into(),
        },

        ZoneError::IppRequest(detail) => humanize_ipp_error(detail),

        ZoneError::MissingAttribute { attribute, .. } => HumanError {
            message: format!("The print server did not report '{attribute}'."),
            suggestion: "Make sure the queue is fully configured in CUPS.".into(),
        },

        ZoneError::Ppd { .. } => HumanError {
            message: "The printer's PPD could not be used.".into(),
            suggestion: "Driverless and raw queues have no *Product entry; reinstall the queue with a PPD that declares one.".into(),
        },

        ZoneError::MalformedUri { .. } => HumanError {
            message: "A printer advertises an address that cannot be parsed.".into(),
            suggestion: "Fix the queue's device or printer URI in CUPS.".into(),
        },

        ZoneError::Escape(_) => HumanError {
            message: "Some zone text is not validly escaped.".into(),
            suggestion: "Use \\\" and \\\\ for quotes and backslashes, and \\DDD with three digits."
                .into(),
        },

        ZoneError::Io(_) => HumanError {
            message: "Writing the zone fragment failed.".into(),
            suggestion: "Check that standard output is writable (pipe or disk not full).".into(),
        },

        ZoneError::Config(_) => HumanError {
            message: "The command-line options are inconsistent.".into(),
            suggestion: "Run with --help to see the accepted values.".into(),
        },
    }
}

/// Refine IPP failures by the status the server sent back.
fn humanize_ipp_error(detail: &str) -> HumanError {
    let lower = detail.to_lowercase();

    if lower.contains("forbidden") || lower.contains("notauthorized") {
        HumanError {
            message: "The print server does not allow this query.".into(),
            suggestion: "Authenticate with --user, or allow remote administration in cupsd.conf."
                .into(),
        }
    } else if lower.contains("notfound") || lower.contains("not found") {
        HumanError {
            message: "The print server does not know that printer.".into(),
            suggestion: "The queue may have been deleted while generating; run again.".into(),
        }
    } else {
        HumanError {
            message: "The print server returned an error.".into(),
            suggestion: "Check the CUPS error_log for details.".into(),
        }
    }
}
