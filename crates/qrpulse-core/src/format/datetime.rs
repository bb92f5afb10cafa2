//! Event date-time forms.
//!
//! Forms hold the extended layout (`2024-05-01T10:00`); payloads hold the
//! compact iCalendar basic layout (`20240501T1000`). Unrecognized values
//! pass through untouched in both directions.

use chrono::{NaiveDate, NaiveDateTime};

/// Compact layouts accepted by [`expand`], with the extended layout each maps to.
const DATE_TIME_LAYOUTS: &[(&str, &str)] = &[
    ("%Y%m%dT%H%M%S", "%Y-%m-%dT%H:%M:%S"),
    ("%Y%m%dT%H%M", "%Y-%m-%dT%H:%M"),
];

/// Strip `-` and `:` separators.
pub fn compact(value: &str) -> String {
    value.chars().filter(|c| *c != '-' && *c != ':').collect()
}

/// Expand a compact iCalendar date or date-time back to the extended layout.
///
/// Accepts `YYYYMMDD`, `YYYYMMDDTHHMM` and `YYYYMMDDTHHMMSS`, each with an
/// optional trailing `Z`. Invalid calendar values are returned verbatim.
pub fn expand(value: &str) -> String {
    let (body, zulu) = match value.strip_suffix('Z') {
        Some(body) => (body, "Z"),
        None => (value, ""),
    };
    if !starts_with_date_digits(body) {
        return value.to_string();
    }

    let expanded = if body.len() == 8 {
        NaiveDate::parse_from_str(body, "%Y%m%d")
            .ok()
            .map(|date| date.format("%Y-%m-%d").to_string())
    } else {
        DATE_TIME_LAYOUTS.iter().find_map(|(from, to)| {
            NaiveDateTime::parse_from_str(body, from)
                .ok()
                .map(|dt| dt.format(to).to_string())
        })
    };

    match expanded {
        Some(out) => format!("{}{}", out, zulu),
        None => value.to_string(),
    }
}

/// Eight leading ASCII digits; keeps chrono's signed-year and whitespace
/// leniency out of the accepted forms.
fn starts_with_date_digits(body: &str) -> bool {
    body.len() >= 8 && body.as_bytes()[..8].iter().all(u8::is_ascii_digit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_strips_separators() {
        assert_eq!(compact("2024-05-01T10:00"), "20240501T1000");
        assert_eq!(compact("2024-05-01T10:00:30Z"), "20240501T100030Z");
    }

    #[test]
    fn expand_reverses_compact_forms() {
        for form in [
            "2024-05-01",
            "2024-05-01T10:00",
            "2024-05-01T10:00:30",
            "2024-05-01T23:59:59Z",
        ] {
            assert_eq!(expand(&compact(form)), form);
        }
    }

    #[test]
    fn expand_passes_through_unrecognized() {
        assert_eq!(expand("tomorrow"), "tomorrow");
        assert_eq!(expand("20241301T1000"), "20241301T1000");
        assert_eq!(expand("20240501T2561"), "20240501T2561");
        assert_eq!(expand(""), "");
    }

    #[test]
    fn expand_rewrites_compact_stamps_typed_into_forms() {
        assert_eq!(expand("20240501T100000Z"), "2024-05-01T10:00:00Z");
        assert_eq!(expand("20240501"), "2024-05-01");
    }

    #[test]
    fn expand_leaves_extended_values_alone() {
        assert_eq!(expand("2024-05-01T10:00"), "2024-05-01T10:00");
        assert_eq!(expand("2024-05-01"), "2024-05-01");
    }
}
