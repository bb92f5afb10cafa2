//! History records.

use serde::{Deserialize, Serialize};

use crate::models::bag_ext::FieldBag;
use crate::models::intent::Intent;
use crate::models::render::RenderOptions;

/// One generated or scanned code, as kept in history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub intent: Intent,
    /// The payload string.
    pub content: String,
    #[serde(default)]
    pub fields: FieldBag,
    #[serde(default)]
    pub options: RenderOptions,
    #[serde(default)]
    pub data_url: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// Random RFC 4122 version-4 id.
pub fn new_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
