// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// RFC 1035 character-string escaping for zone-file labels and TXT payloads.
//
// Labels: `"` and `\` are backslash-prefixed, printable ASCII passes through,
// and everything else becomes `\DDD` (decimal code point, zero padded to
// three digits).  Code points above 999 are written with all of their digits,
// so the field is wider than three in that case.
//
// TXT values only get `"` and `\` prefixed.  Any other character, UTF-8
// included, is written as is so DNS-SD clients read back the original text.

use std::fmt::Write;

use crate::error::{Result, ZoneError};

/// Escape `text` so it can be placed inside a zone-file label.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            _ => {
                // Writing to a String cannot fail.
                let _ = write!(out, "\\{:03}", c as u32);
            }
        }
    }
    out
}

/// Escape `text` for a quoted TXT character-string.
pub fn escape_txt(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Reverse [`escape`] or [`escape_txt`].
///
/// `\X` yields `X` and `\DDD` (exactly three decimal digits) yields the
/// character with that code point.  A trailing lone backslash, a short digit
/// run, or a value that is not a valid `char` is an error.
pub fn unescape(text: &str) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next() {
            None => return Err(ZoneError::Escape(format!("dangling backslash in '{text}'"))),
            Some(d) if d.is_ascii_digit() => {
                let mut value = d.to_digit(10).unwrap_or_default();
                for _ in 0..2 {
                    let digit = chars
                        .next()
                        .and_then(|n| n.to_digit(10))
                        .ok_or_else(|| {
                            ZoneError::Escape(format!("short \\DDD sequence in '{text}'"))
                        })?;
                    value = value * 10 + digit;
                }
                let decoded = char::from_u32(value).ok_or_else(|| {
                    ZoneError::Escape(format!("\\{value:03} is not a valid character"))
                })?;
                out.push(decoded);
            }
            Some(literal) => out.push(literal),
        }
    }

    Ok(out)
}
