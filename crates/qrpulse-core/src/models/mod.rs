//! qrpulse data models.
//!
//! Typed where the format model dispatches (intents, per-intent field
//! structs); flat string bags where forms and bindings exchange data.

pub mod bag_ext;
pub mod fields;
pub mod intent;
pub mod record;
pub mod render;

pub use bag_ext::{bag_from_pairs, BagExt, FieldBag};
pub use fields::{
    CallFields, ContactFields, EmailFields, EventFields, Fields, LocationFields, PaymentFields,
    PaymentKind, SmsFields, TextFields, UrlFields, WifiFields,
};
pub use intent::{Intent, UnknownIntent};
pub use record::HistoryRecord;
pub use render::{download_filename, ErrorCorrection, ImageFormat, RenderOptions, RenderedImage};
