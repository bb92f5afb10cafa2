//! Encoder — structured fields to canonical payload strings.
//!
//! Total over its input: an empty field is an absent field and is simply
//! left out of the payload.

use crate::format::datetime;
use crate::format::escape::{escape_text, escape_wifi};
use crate::format::pct::QueryWriter;
use crate::models::{
    ContactFields, EmailFields, EventFields, FieldBag, Fields, Intent, LocationFields,
    PaymentFields, PaymentKind, SmsFields, WifiFields,
};

pub const PAYPAL_ME_BASE: &str = "https://www.paypal.com/paypalme/";

/// Produce the payload string for `fields`.
pub fn encode(fields: &Fields) -> String {
    match fields {
        Fields::Text(f) => f.text.clone(),
        Fields::Url(f) => f.url.clone(),
        Fields::Email(f) => encode_email(f),
        Fields::Wifi(f) => encode_wifi(f),
        Fields::Vcard(f) => encode_vcard(f),
        Fields::Location(f) => encode_location(f),
        Fields::Sms(f) => encode_sms(f),
        Fields::Call(f) => format!("tel:{}", f.phone),
        Fields::Event(f) => encode_event(f),
        Fields::Payment(f) => encode_payment(f),
    }
}

/// Encode a string-keyed bag as `intent`.
pub fn encode_bag(intent: Intent, bag: &FieldBag) -> String {
    encode(&Fields::from_bag(intent, bag))
}

/// `WIFI:S:<ssid>;T:WPA;P:<password>;;`. Security is always written as WPA.
pub fn encode_wifi(f: &WifiFields) -> String {
    format!(
        "WIFI:S:{};T:WPA;P:{};;",
        escape_wifi(&f.ssid),
        escape_wifi(&f.password)
    )
}

pub fn encode_email(f: &EmailFields) -> String {
    let mut out = format!("mailto:{}", f.email);
    QueryWriter::new(&mut out)
        .param("subject", &f.subject)
        .param("body", &f.body);
    out
}

pub fn encode_vcard(f: &ContactFields) -> String {
    let name = escape_text(&f.name);
    let mut lines = vec![
        "BEGIN:VCARD".to_string(),
        "VERSION:3.0".to_string(),
        format!("N:{};;;", name),
        format!("FN:{}", name),
    ];
    for (marker, value) in [
        ("TEL", &f.phone),
        ("EMAIL", &f.email),
        ("ORG", &f.organization),
        ("TITLE", &f.title),
        ("URL", &f.url),
    ] {
        if !value.is_empty() {
            lines.push(format!("{}:{}", marker, escape_text(value)));
        }
    }
    if !f.address.is_empty() {
        lines.push(format!("ADR:;;{};;;", escape_text(&f.address)));
    }
    lines.push("END:VCARD".to_string());
    lines.join("\n")
}

/// `geo:0,0?q=<address>`. Only the free-text address is carried.
pub fn encode_location(f: &LocationFields) -> String {
    let mut out = String::from("geo:0,0");
    QueryWriter::new(&mut out).always("q", &f.address);
    out
}

pub fn encode_sms(f: &SmsFields) -> String {
    let mut out = format!("sms:{}", f.phone);
    QueryWriter::new(&mut out).param("body", &f.message);
    out
}

pub fn encode_event(f: &EventFields) -> String {
    let mut lines = vec![
        "BEGIN:VEVENT".to_string(),
        format!("SUMMARY:{}", escape_text(&f.title)),
        format!("DTSTART:{}", datetime::compact(&f.start)),
        format!("DTEND:{}", datetime::compact(&f.end)),
    ];
    if !f.location.is_empty() {
        lines.push(format!("LOCATION:{}", escape_text(&f.location)));
    }
    if !f.description.is_empty() {
        lines.push(format!("DESCRIPTION:{}", escape_text(&f.description)));
    }
    lines.push("END:VEVENT".to_string());
    lines.join("\n")
}

/// PayPal.me link or BIP21 `bitcoin:` URI. The unknown sentinel encodes to
/// an empty payload.
pub fn encode_payment(f: &PaymentFields) -> String {
    match f.payment_kind {
        PaymentKind::Paypal => {
            let mut out = format!("{}{}", PAYPAL_ME_BASE, f.recipient);
            if !f.amount.is_empty() {
                out.push('/');
                out.push_str(&f.amount);
            }
            out
        }
        PaymentKind::Bitcoin => {
            let mut out = format!("bitcoin:{}", f.recipient);
            QueryWriter::new(&mut out)
                .param("amount", &f.amount)
                .param("message", &f.note);
            out
        }
        PaymentKind::Unknown => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CallFields, TextFields, UrlFields};

    #[test]
    fn text_and_url_are_verbatim() {
        let text = Fields::Text(TextFields {
            text: "  hello & bye ".into(),
        });
        assert_eq!(encode(&text), "  hello & bye ");
        let url = Fields::Url(UrlFields {
            url: "https://example.com/a?b=c d".into(),
        });
        assert_eq!(encode(&url), "https://example.com/a?b=c d");
    }

    #[test]
    fn wifi_hard_codes_wpa() {
        let wifi = WifiFields {
            ssid: "HomeNet".into(),
            password: "hunter22".into(),
            security: "WEP".into(),
        };
        assert_eq!(encode_wifi(&wifi), "WIFI:S:HomeNet;T:WPA;P:hunter22;;");
    }

    #[test]
    fn email_subject_is_percent_encoded() {
        let email = EmailFields {
            email: "a@b.com".into(),
            subject: "Hi there".into(),
            body: String::new(),
        };
        assert_eq!(encode_email(&email), "mailto:a@b.com?subject=Hi%20there");
    }

    #[test]
    fn email_body_without_subject_uses_question_mark() {
        let email = EmailFields {
            email: "a@b.com".into(),
            subject: String::new(),
            body: "x&y".into(),
        };
        assert_eq!(encode_email(&email), "mailto:a@b.com?body=x%26y");
    }

    #[test]
    fn email_with_both_params() {
        let email = EmailFields {
            email: "a@b.com".into(),
            subject: "s".into(),
            body: "b".into(),
        };
        assert_eq!(encode_email(&email), "mailto:a@b.com?subject=s&body=b");
    }

    #[test]
    fn vcard_omits_empty_lines() {
        let card = ContactFields {
            name: "John Doe".into(),
            phone: "+123".into(),
            organization: "Acme".into(),
            ..Default::default()
        };
        assert_eq!(
            encode_vcard(&card),
            "BEGIN:VCARD\nVERSION:3.0\nN:John Doe;;;\nFN:John Doe\nTEL:+123\nORG:Acme\nEND:VCARD"
        );
    }

    #[test]
    fn vcard_address_line() {
        let card = ContactFields {
            name: "A".into(),
            address: "1 Main St".into(),
            ..Default::default()
        };
        assert!(encode_vcard(&card).contains("\nADR:;;1 Main St;;;\nEND:VCARD"));
    }

    #[test]
    fn location_keeps_zero_coordinates() {
        let loc = LocationFields {
            address: "10 Downing St, London".into(),
        };
        assert_eq!(
            encode_location(&loc),
            "geo:0,0?q=10%20Downing%20St%2C%20London"
        );
    }

    #[test]
    fn sms_and_call() {
        let sms = SmsFields {
            phone: "+15550100".into(),
            message: "on my way".into(),
        };
        assert_eq!(encode_sms(&sms), "sms:+15550100?body=on%20my%20way");
        let bare = SmsFields {
            phone: "+15550100".into(),
            message: String::new(),
        };
        assert_eq!(encode_sms(&bare), "sms:+15550100");
        let call = Fields::Call(CallFields {
            phone: "+15550100".into(),
        });
        assert_eq!(encode(&call), "tel:+15550100");
    }

    #[test]
    fn event_strips_date_separators() {
        let event = EventFields {
            title: "Launch".into(),
            start: "2024-05-01T10:00".into(),
            end: "2024-05-01T11:30".into(),
            location: String::new(),
            description: "Bring snacks".into(),
        };
        assert_eq!(
            encode_event(&event),
            "BEGIN:VEVENT\nSUMMARY:Launch\nDTSTART:20240501T1000\nDTEND:20240501T1130\nDESCRIPTION:Bring snacks\nEND:VEVENT"
        );
    }

    #[test]
    fn paypal_link_with_optional_amount() {
        let mut pay = PaymentFields {
            payment_kind: PaymentKind::Paypal,
            recipient: "alice".into(),
            amount: "10".into(),
            note: "ignored".into(),
        };
        assert_eq!(encode_payment(&pay), "https://www.paypal.com/paypalme/alice/10");
        pay.amount.clear();
        assert_eq!(encode_payment(&pay), "https://www.paypal.com/paypalme/alice");
    }

    #[test]
    fn bitcoin_uri() {
        let pay = PaymentFields {
            payment_kind: PaymentKind::Bitcoin,
            recipient: "1A1z...".into(),
            amount: "0.5".into(),
            note: "thanks".into(),
        };
        assert_eq!(encode_payment(&pay), "bitcoin:1A1z...?amount=0.5&message=thanks");
    }

    #[test]
    fn bitcoin_note_without_amount() {
        let pay = PaymentFields {
            payment_kind: PaymentKind::Bitcoin,
            recipient: "1A1z".into(),
            amount: String::new(),
            note: "for pizza".into(),
        };
        assert_eq!(encode_payment(&pay), "bitcoin:1A1z?message=for%20pizza");
    }

    #[test]
    fn unknown_payment_is_empty() {
        assert_eq!(encode_payment(&PaymentFields::unknown()), "");
    }
}
