//! qrpulse studio — the generate / scan / history workflows.
//!
//! Owns a pixel codec, a history store and the current render options.
//! The format model does the thinking; the studio wires it to the
//! collaborators and keeps the history in step.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::effects::{HistoryStore, NoopCodec, PixelCodec};
use crate::error::{Error, Result};
use crate::format::{classify, encode, parse};
use crate::models::record::{new_record_id, now_ms};
use crate::models::{Fields, HistoryRecord, Intent, RenderOptions};

/// A record fetched back from history, with its fields re-parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub record: HistoryRecord,
    pub fields: Fields,
}

pub struct Studio {
    codec: Arc<dyn PixelCodec>,
    history: Arc<dyn HistoryStore>,
    /// Options used for the next render.
    options: Mutex<RenderOptions>,
}

impl Studio {
    pub fn new(codec: Arc<dyn PixelCodec>, history: Arc<dyn HistoryStore>) -> Self {
        Self {
            codec,
            history,
            options: Mutex::new(RenderOptions::default()),
        }
    }

    /// Studio without pixels: payloads and history only.
    pub fn headless(history: Arc<dyn HistoryStore>) -> Self {
        Self::new(Arc::new(NoopCodec), history)
    }

    pub fn history_store(&self) -> &dyn HistoryStore {
        &*self.history
    }

    pub fn options(&self) -> RenderOptions {
        self.options.lock().clone()
    }

    pub fn set_options(&self, options: RenderOptions) {
        *self.options.lock() = options;
    }

    // -----------------------------------------------------------------------
    // Generate / scan
    // -----------------------------------------------------------------------

    /// Encode `fields`, render with the current options and record it.
    pub fn generate(&self, fields: &Fields) -> Result<HistoryRecord> {
        self.generate_using(fields, self.options())
    }

    /// Like [`generate`](Self::generate); on success `options` become the
    /// current options.
    pub fn generate_with(&self, fields: &Fields, options: RenderOptions) -> Result<HistoryRecord> {
        let record = self.generate_using(fields, options.clone())?;
        self.set_options(options);
        Ok(record)
    }

    fn generate_using(&self, fields: &Fields, options: RenderOptions) -> Result<HistoryRecord> {
        let payload = encode(fields);
        if payload.trim().is_empty() {
            return Err(Error::InputRequired);
        }
        let record = self.render_record(fields.intent(), payload, fields, options)?;
        log::info!("qrpulse: generated {} code {}", record.intent, record.id);
        Ok(record)
    }

    /// Decode an image, work out what it holds and record it.
    pub fn scan(&self, image: &[u8]) -> Result<HistoryRecord> {
        let payload = self.codec.decode(image)?;
        self.scan_payload(&payload)
    }

    /// The scan path for a payload typed in or decoded elsewhere.
    pub fn scan_payload(&self, payload: &str) -> Result<HistoryRecord> {
        if payload.trim().is_empty() {
            return Err(Error::InputRequired);
        }
        let intent = classify(payload);
        let fields = parse(payload, intent);
        let record = self.render_record(intent, payload.to_string(), &fields, self.options())?;
        log::info!("qrpulse: scanned {} code {}", record.intent, record.id);
        Ok(record)
    }

    fn render_record(
        &self,
        intent: Intent,
        payload: String,
        fields: &Fields,
        options: RenderOptions,
    ) -> Result<HistoryRecord> {
        let image = self.codec.render(&payload, &options)?;
        let record = HistoryRecord {
            id: new_record_id(),
            intent,
            content: payload,
            fields: fields.to_bag(),
            options,
            data_url: image.data_url(),
            timestamp: now_ms(),
        };
        self.history.append(record.clone())?;
        Ok(record)
    }

    // -----------------------------------------------------------------------
    // History
    // -----------------------------------------------------------------------

    pub fn history(&self) -> Vec<HistoryRecord> {
        self.history.list()
    }

    /// Re-open a past record: its fields are parsed again from the stored
    /// payload and its options become current.
    pub fn select(&self, id: &str) -> Result<Selection> {
        let record = self
            .history
            .get(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        let fields = parse(&record.content, record.intent);
        self.set_options(record.options.clone());
        Ok(Selection { record, fields })
    }

    pub fn remove(&self, id: &str) -> Result<()> {
        if self.history.remove_by_id(id)? {
            Ok(())
        } else {
            Err(Error::NotFound(id.to_string()))
        }
    }

    pub fn clear_history(&self) -> Result<()> {
        self.history.clear()
    }
}
