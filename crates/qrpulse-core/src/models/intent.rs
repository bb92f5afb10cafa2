//! Intent classification type.
//!
//! A string enum. It exists for exhaustive matching in Rust, but
//! serializes to the plain lowercase tag the UI and history use.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What a payload means: the closed set of barcode intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    #[default]
    Text,
    Url,
    Email,
    Wifi,
    Vcard,
    Location,
    Sms,
    Call,
    Event,
    Payment,
}

impl Intent {
    /// Every intent, in classifier-independent declaration order.
    pub const ALL: [Intent; 10] = [
        Intent::Text,
        Intent::Url,
        Intent::Email,
        Intent::Wifi,
        Intent::Vcard,
        Intent::Location,
        Intent::Sms,
        Intent::Call,
        Intent::Event,
        Intent::Payment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Intent::Text => "text",
            Intent::Url => "url",
            Intent::Email => "email",
            Intent::Wifi => "wifi",
            Intent::Vcard => "vcard",
            Intent::Location => "location",
            Intent::Sms => "sms",
            Intent::Call => "call",
            Intent::Event => "event",
            Intent::Payment => "payment",
        }
    }

    /// Field names this intent's bag carries, in form order.
    pub fn field_names(self) -> &'static [&'static str] {
        match self {
            Intent::Text => &["text"],
            Intent::Url => &["url"],
            Intent::Email => &["email", "subject", "body"],
            Intent::Wifi => &["ssid", "password", "security"],
            Intent::Vcard => &[
                "name",
                "phone",
                "email",
                "organization",
                "title",
                "url",
                "address",
            ],
            Intent::Location => &["address"],
            Intent::Sms => &["phone", "message"],
            Intent::Call => &["phone"],
            Intent::Event => &["title", "start", "end", "location", "description"],
            Intent::Payment => &["type", "paymentKind", "recipient", "amount", "note"],
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Returned when a tag names no known intent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown intent: {0}")]
pub struct UnknownIntent(pub String);

impl FromStr for Intent {
    type Err = UnknownIntent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        Intent::ALL
            .iter()
            .copied()
            .find(|i| i.as_str() == tag)
            .ok_or(UnknownIntent(s.to_string()))
    }
}
