//! Field bag accessors: thin helpers over the string-keyed form data.
//!
//! Forms, the FFI and the CLI speak in flat `name -> value` maps. These
//! lenses read them with the format model's default: absent is empty.

use std::collections::BTreeMap;

/// String-keyed view of an intent's fields, as edited in a form.
pub type FieldBag = BTreeMap<String, String>;

/// Extension trait for reading fields out of a [`FieldBag`].
pub trait BagExt {
    fn str_field(&self, key: &str) -> &str;
    fn field(&self, key: &str) -> String;
}

impl BagExt for FieldBag {
    fn str_field(&self, key: &str) -> &str {
        self.get(key).map(String::as_str).unwrap_or("")
    }

    fn field(&self, key: &str) -> String {
        self.str_field(key).to_string()
    }
}

/// Parse `key=value` pairs (CLI style) into a bag. Pairs without `=` are skipped.
pub fn bag_from_pairs<S: AsRef<str>>(pairs: &[S]) -> FieldBag {
    pairs
        .iter()
        .filter_map(|pair| {
            let (k, v) = pair.as_ref().split_once('=')?;
            Some((k.trim().to_string(), v.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_reads_empty() {
        let bag = FieldBag::new();
        assert_eq!(bag.str_field("ssid"), "");
        assert_eq!(bag.field("ssid"), String::new());
    }

    #[test]
    fn blank_value_is_kept_verbatim() {
        let bag = bag_from_pairs(&["subject=   "]);
        assert_eq!(bag.str_field("subject"), "   ");
    }

    #[test]
    fn pairs_split_on_first_equals() {
        let bag = bag_from_pairs(&["url=https://x.io/?a=b", "junk", "name=Ada"]);
        assert_eq!(bag.len(), 2);
        assert_eq!(bag.str_field("url"), "https://x.io/?a=b");
        assert_eq!(bag.str_field("name"), "Ada");
    }
}
