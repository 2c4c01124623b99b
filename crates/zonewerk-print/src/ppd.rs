// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Minimal PPD (PostScript Printer Description) main-keyword lookup.
//
// Only what the zone needs: `*Keyword: value` and `*Keyword: "quoted value"`
// entries, where a quoted value may continue over several lines.  Option
// keywords (`*Keyword Option/Text: value`) are skipped.

use zonewerk_core::error::{Result, ZoneError};

/// Value of the first `*{keyword}:` main entry, with surrounding quotes
/// removed.
pub fn find_attribute(ppd: &str, keyword: &str) -> Option<String> {
    let prefix = format!("*{keyword}:");
    let mut lines = ppd.lines();

    while let Some(line) = lines.next() {
        let Some(rest) = line.strip_prefix(&prefix) else {
            continue;
        };
        let rest = rest.trim();

        let Some(quoted) = rest.strip_prefix('"') else {
            return Some(rest.to_string());
        };
        if let Some(end) = quoted.find('"') {
            return Some(quoted[..end].to_string());
        }

        // Quoted value continues until a line containing the closing quote.
        let mut value = quoted.to_string();
        for next in lines.by_ref() {
            value.push('\n');
            if let Some(end) = next.find('"') {
                value.push_str(&next[..end]);
                return Some(value);
            }
            value.push_str(next);
        }
        return None;
    }

    None
}

/// The `*Product` string advertised as the Bonjour `product` key.
pub fn product(printer: &str, ppd: &str) -> Result<String> {
    find_attribute(ppd, "Product").ok_or_else(|| ZoneError::Ppd {
        printer: printer.to_string(),
        reason: "no *Product entry".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "*PPD-Adobe: \"4.3\"\n\
*FormatVersion: \"4.3\"\n\
*Manufacturer: \"HP\"\n\
*Product: \"(HP Color LaserJet CP2025)\"\n\
*Product: \"(HP Color LaserJet CP2020)\"\n\
*ModelName: \"HP Color LaserJet CP2025\"\n\
*ColorDevice: True\n\
*PageSize Letter/US Letter: \"<</PageSize[612 792]>>setpagedevice\"\n";

    #[test]
    fn first_product_wins() {
        assert_eq!(
            product("office", SAMPLE).unwrap(),
            "(HP Color LaserJet CP2025)"
        );
    }

    #[test]
    fn unquoted_values() {
        assert_eq!(find_attribute(SAMPLE, "ColorDevice").as_deref(), Some("True"));
    }

    #[test]
    fn option_entries_are_not_main_keywords() {
        assert_eq!(find_attribute(SAMPLE, "PageSize"), None);
    }

    #[test]
    fn multi_line_quoted_value() {
        let ppd = "*Product: \"(Long\nName)\"\n*ModelName: \"x\"\n";
        assert_eq!(find_attribute(ppd, "Product").as_deref(), Some("(Long\nName)"));
    }

    #[test]
    fn unterminated_quote_is_missing() {
        assert_eq!(find_attribute("*Product: \"(never closed\n", "Product"), None);
    }

    #[test]
    fn missing_product_is_an_error() {
        let err = product("raw-queue", "*PPD-Adobe: \"4.3\"\n").unwrap_err();
        assert!(matches!(err, ZoneError::Ppd { ref printer, .. } if printer == "raw-queue"));
    }
}
