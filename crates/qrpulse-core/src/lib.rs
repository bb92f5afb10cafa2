//! qrpulse-core — payload kernel for structured QR codes.
//!
//! Payload strings are the data. The format model is pure functions.
//!
//! # Architecture
//!
//! ```text
//! Layer 0: Format model (encode / classify / parse over payload strings)
//! Layer 1: Effects (pixel codec, history store)
//! Layer 2: Studio (generate, scan, history workflows)
//! Layer 3: Hosts (CLI, FFI, UI: fill forms, show images)
//! ```

pub mod effects;
pub mod error;
pub mod format;
pub mod models;
pub mod paths;
pub mod studio;

pub use error::{CodecError, Error, Result};
pub use format::{classify, detect, encode, encode_bag, parse};
pub use models::*;
pub use studio::{Selection, Studio};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{FileHistory, HistoryStore, HISTORY_CAPACITY};
    use once_cell::sync::Lazy;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// Serializes tests that touch process environment variables.
    pub(crate) static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    fn temp_studio() -> (TempDir, Studio, Arc<FileHistory>) {
        let dir = TempDir::new().expect("tempdir");
        let history = Arc::new(FileHistory::open(dir.path().join(paths::HISTORY_FILE)));
        let studio = Studio::headless(history.clone());
        (dir, studio, history)
    }

    fn bag(pairs: &[(&str, &str)]) -> FieldBag {
        bag_from_pairs(
            &pairs
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>(),
        )
    }

    // -------------------------------------------------------------------
    // Form → payload → history
    // -------------------------------------------------------------------

    #[test]
    fn generate_from_form_bag_persists() {
        let (dir, studio, _history) = temp_studio();
        let fields = Fields::from_bag(
            Intent::Sms,
            &bag(&[("phone", "+15550100"), ("message", "hi there")]),
        );
        let record = studio.generate(&fields).unwrap();
        assert_eq!(record.content, "sms:+15550100?body=hi%20there");

        let reopened = FileHistory::open(dir.path().join(paths::HISTORY_FILE));
        let list = reopened.list();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].intent, Intent::Sms);
        assert_eq!(list[0].fields["message"], "hi there");
    }

    #[test]
    fn history_caps_at_capacity_on_disk() {
        let (dir, studio, _history) = temp_studio();
        for i in 0..(HISTORY_CAPACITY + 3) {
            studio.scan_payload(&format!("note {i}")).unwrap();
        }
        let reopened = FileHistory::open(dir.path().join(paths::HISTORY_FILE));
        let list = reopened.list();
        assert_eq!(list.len(), HISTORY_CAPACITY);
        assert_eq!(list[0].content, format!("note {}", HISTORY_CAPACITY + 2));
        assert_eq!(list.last().unwrap().content, "note 3");
    }

    // -------------------------------------------------------------------
    // Scan → classify → parse → form pre-fill
    // -------------------------------------------------------------------

    #[test]
    fn scanned_payment_prefills_payment_form() {
        let (_dir, studio, _history) = temp_studio();
        let record = studio
            .scan_payload("https://www.paypal.com/paypalme/alice/10")
            .unwrap();
        assert_eq!(record.intent, Intent::Payment);
        assert_eq!(record.fields["paymentKind"], "paypal");
        assert_eq!(record.fields["recipient"], "alice");
        assert_eq!(record.fields["amount"], "10");
    }

    #[test]
    fn scanned_foreign_vcard_partially_understood() {
        let (_dir, studio, _history) = temp_studio();
        let record = studio
            .scan_payload("BEGIN:VCARD\nVERSION:2.1\nN:Doe;Jane\nX-CUSTOM:whatever\nEND:VCARD")
            .unwrap();
        assert_eq!(record.intent, Intent::Vcard);
        assert_eq!(record.fields["name"], "Jane Doe");
        assert_eq!(record.fields["phone"], "");
    }

    #[test]
    fn select_after_reopen_restores_fields() {
        let (dir, studio, _history) = temp_studio();
        let event = Fields::from_bag(
            Intent::Event,
            &bag(&[
                ("title", "Review"),
                ("start", "2025-01-02T09:00"),
                ("end", "2025-01-02T10:00"),
            ]),
        );
        let record = studio.generate(&event).unwrap();

        let studio =
            Studio::headless(Arc::new(FileHistory::open(dir.path().join(paths::HISTORY_FILE))));
        let selection = studio.select(&record.id).unwrap();
        assert_eq!(selection.fields, event);
    }

    #[test]
    fn history_json_layout_on_disk() {
        let (dir, studio, _history) = temp_studio();
        studio.scan_payload("tel:+15550100").unwrap();
        let text = std::fs::read_to_string(dir.path().join(paths::HISTORY_FILE)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        let first = &json[0];
        assert_eq!(first["type"], "call");
        assert_eq!(first["content"], "tel:+15550100");
        assert_eq!(first["options"]["errorCorrectionLevel"], "M");
        assert!(first["timestamp"].as_i64().unwrap() > 0);
    }
}
