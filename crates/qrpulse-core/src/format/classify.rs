//! Classifier — which intent does an arbitrary payload most likely carry?
//!
//! Case-insensitive prefix/substring rules, first match wins. Order matters:
//! a PayPal.me link is also a URL, so the web rule checks for it first.

use crate::models::Intent;

pub const PAYPAL_ME_MARKER: &str = "paypal.com/paypalme/";

const WEB_PREFIXES: &[&str] = &["http://", "https://", "www."];

/// Classify `payload`. Total: anything unrecognized (including `""`) is text.
pub fn classify(payload: &str) -> Intent {
    let p = payload.to_lowercase();

    let intent = if WEB_PREFIXES.iter().any(|prefix| p.starts_with(prefix)) {
        if p.contains(PAYPAL_ME_MARKER) {
            Intent::Payment
        } else {
            Intent::Url
        }
    } else if p.starts_with("wifi:") {
        Intent::Wifi
    } else if p.starts_with("mailto:") {
        Intent::Email
    } else if p.contains("begin:vcard") {
        Intent::Vcard
    } else if p.starts_with("geo:") {
        Intent::Location
    } else if p.starts_with("sms:") {
        Intent::Sms
    } else if p.starts_with("tel:") {
        Intent::Call
    } else if p.contains("begin:vevent") {
        Intent::Event
    } else if p.starts_with("bitcoin:") {
        Intent::Payment
    } else {
        Intent::Text
    };

    log::debug!("qrpulse: classified {} byte payload as {}", payload.len(), intent);
    intent
}
