//! Typed field structs, one per intent.
//!
//! `Fields` is the tagged union the format model dispatches on. Every
//! field is a plain `String`; empty means absent, so a missing marker in
//! a scanned payload is simply the `Default` value.

use serde::{Deserialize, Serialize};

use crate::models::bag_ext::{BagExt, FieldBag};
use crate::models::intent::Intent;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextFields {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlFields {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailFields {
    pub email: String,
    pub subject: String,
    pub body: String,
}

/// Wi-Fi credentials. `security` is informational: the encoder always writes `WPA`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WifiFields {
    pub ssid: String,
    pub password: String,
    pub security: String,
}

impl Default for WifiFields {
    fn default() -> Self {
        Self {
            ssid: String::new(),
            password: String::new(),
            security: WIFI_DEFAULT_SECURITY.to_string(),
        }
    }
}

pub const WIFI_DEFAULT_SECURITY: &str = "WPA";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactFields {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub organization: String,
    pub title: String,
    pub url: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationFields {
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SmsFields {
    pub phone: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CallFields {
    pub phone: String,
}

/// Calendar event. `start`/`end` use the form's extended date-time layout
/// (`2024-05-01T10:00`); the payload carries the compact iCalendar form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventFields {
    pub title: String,
    pub start: String,
    pub end: String,
    pub location: String,
    pub description: String,
}

/// Which payment network a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    Paypal,
    Bitcoin,
    /// Parser sentinel: neither a PayPal.me link nor a `bitcoin:` URI.
    #[default]
    Unknown,
}

impl PaymentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentKind::Paypal => "paypal",
            PaymentKind::Bitcoin => "bitcoin",
            PaymentKind::Unknown => "unknown",
        }
    }

    fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "paypal" => PaymentKind::Paypal,
            "bitcoin" => PaymentKind::Bitcoin,
            _ => PaymentKind::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaymentFields {
    pub payment_kind: PaymentKind,
    pub recipient: String,
    pub amount: String,
    pub note: String,
}

impl PaymentFields {
    /// The sentinel returned when a payload carries no recognizable payment marker.
    pub fn unknown() -> Self {
        Self::default()
    }
}

/// Structured data for one intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Fields {
    Text(TextFields),
    Url(UrlFields),
    Email(EmailFields),
    Wifi(WifiFields),
    Vcard(ContactFields),
    Location(LocationFields),
    Sms(SmsFields),
    Call(CallFields),
    Event(EventFields),
    Payment(PaymentFields),
}

impl Fields {
    pub fn intent(&self) -> Intent {
        match self {
            Fields::Text(_) => Intent::Text,
            Fields::Url(_) => Intent::Url,
            Fields::Email(_) => Intent::Email,
            Fields::Wifi(_) => Intent::Wifi,
            Fields::Vcard(_) => Intent::Vcard,
            Fields::Location(_) => Intent::Location,
            Fields::Sms(_) => Intent::Sms,
            Fields::Call(_) => Intent::Call,
            Fields::Event(_) => Intent::Event,
            Fields::Payment(_) => Intent::Payment,
        }
    }

    /// All-empty fields for `intent` (what a blank form holds).
    pub fn empty(intent: Intent) -> Self {
        Self::from_bag(intent, &FieldBag::new())
    }

    /// Build typed fields from a string-keyed bag. Unknown keys are ignored,
    /// missing keys become empty strings.
    pub fn from_bag(intent: Intent, bag: &FieldBag) -> Self {
        match intent {
            Intent::Text => Fields::Text(TextFields {
                text: bag.field("text"),
            }),
            Intent::Url => Fields::Url(UrlFields {
                url: bag.field("url"),
            }),
            Intent::Email => Fields::Email(EmailFields {
                email: bag.field("email"),
                subject: bag.field("subject"),
                body: bag.field("body"),
            }),
            Intent::Wifi => {
                let security = bag.field("security");
                Fields::Wifi(WifiFields {
                    ssid: bag.field("ssid"),
                    password: bag.field("password"),
                    security: if security.is_empty() {
                        WIFI_DEFAULT_SECURITY.to_string()
                    } else {
                        security
                    },
                })
            }
            Intent::Vcard => Fields::Vcard(ContactFields {
                name: bag.field("name"),
                phone: bag.field("phone"),
                email: bag.field("email"),
                organization: bag.field("organization"),
                title: bag.field("title"),
                url: bag.field("url"),
                address: bag.field("address"),
            }),
            Intent::Location => Fields::Location(LocationFields {
                address: bag.field("address"),
            }),
            Intent::Sms => Fields::Sms(SmsFields {
                phone: bag.field("phone"),
                message: bag.field("message"),
            }),
            Intent::Call => Fields::Call(CallFields {
                phone: bag.field("phone"),
            }),
            Intent::Event => Fields::Event(EventFields {
                title: bag.field("title"),
                start: bag.field("start"),
                end: bag.field("end"),
                location: bag.field("location"),
                description: bag.field("description"),
            }),
            Intent::Payment => Fields::Payment(PaymentFields {
                payment_kind: PaymentKind::from_tag(payment_tag(bag)),
                recipient: bag.field("recipient"),
                amount: bag.field("amount"),
                note: bag.field("note"),
            }),
        }
    }

    /// Flatten into a string-keyed bag holding every key of the intent.
    pub fn to_bag(&self) -> FieldBag {
        let pairs: Vec<(&str, &str)> = match self {
            Fields::Text(f) => vec![("text", f.text.as_str())],
            Fields::Url(f) => vec![("url", f.url.as_str())],
            Fields::Email(f) => vec![
                ("email", f.email.as_str()),
                ("subject", f.subject.as_str()),
                ("body", f.body.as_str()),
            ],
            Fields::Wifi(f) => vec![
                ("ssid", f.ssid.as_str()),
                ("password", f.password.as_str()),
                ("security", f.security.as_str()),
            ],
            Fields::Vcard(f) => vec![
                ("name", f.name.as_str()),
                ("phone", f.phone.as_str()),
                ("email", f.email.as_str()),
                ("organization", f.organization.as_str()),
                ("title", f.title.as_str()),
                ("url", f.url.as_str()),
                ("address", f.address.as_str()),
            ],
            Fields::Location(f) => vec![("address", f.address.as_str())],
            Fields::Sms(f) => vec![("phone", f.phone.as_str()), ("message", f.message.as_str())],
            Fields::Call(f) => vec![("phone", f.phone.as_str())],
            Fields::Event(f) => vec![
                ("title", f.title.as_str()),
                ("start", f.start.as_str()),
                ("end", f.end.as_str()),
                ("location", f.location.as_str()),
                ("description", f.description.as_str()),
            ],
            Fields::Payment(f) => vec![
                ("type", f.payment_kind.as_str()),
                ("paymentKind", f.payment_kind.as_str()),
                ("recipient", f.recipient.as_str()),
                ("amount", f.amount.as_str()),
                ("note", f.note.as_str()),
            ],
        };
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

/// Payment kind tag from a bag: `type`, falling back to `paymentKind`.
fn payment_tag(bag: &FieldBag) -> &str {
    match bag.str_field("type") {
        "" => bag.str_field("paymentKind"),
        tag => tag,
    }
}
