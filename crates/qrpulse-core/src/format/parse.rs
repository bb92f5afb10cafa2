//! Field parser — payload strings back into typed fields.
//!
//! Best effort by contract: each extractor returns its intent's struct with
//! empty strings wherever a marker is missing. Nothing here fails.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::format::datetime;
use crate::format::escape::{unescape_text, unescape_wifi, unfold_lines};
use crate::format::pct::query_value;
use crate::models::fields::WIFI_DEFAULT_SECURITY;
use crate::models::{
    CallFields, ContactFields, EmailFields, EventFields, Fields, Intent, LocationFields,
    PaymentFields, PaymentKind, SmsFields, TextFields, UrlFields, WifiFields,
};

static WIFI_SSID: Lazy<Regex> = Lazy::new(|| wifi_field("S"));
static WIFI_PASSWORD: Lazy<Regex> = Lazy::new(|| wifi_field("P"));
static WIFI_SECURITY: Lazy<Regex> = Lazy::new(|| wifi_field("T"));

static PAYPAL_ME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)paypal\.com/paypalme/([^/?#\s]*)(?:/([^/?#\s]+))?")
        .expect("static regex")
});

/// `S:`/`P:`/`T:` value up to the next unescaped `;`.
fn wifi_field(key: &str) -> Regex {
    Regex::new(&format!(r"(?i)(?:^|[:;]){}:((?:\\.|[^;\\])*)", key)).expect("static regex")
}

/// Content-line value for `name`, tolerating parameters (`TEL;TYPE=CELL:`).
fn property(name: &str) -> Regex {
    Regex::new(&format!(r"(?im)^{}(?:;[^:\r\n]*)?:(.*)$", name)).expect("static regex")
}

struct LineProps {
    fn_: Regex,
    n: Regex,
    tel: Regex,
    email: Regex,
    org: Regex,
    title: Regex,
    url: Regex,
    adr: Regex,
    summary: Regex,
    dtstart: Regex,
    dtend: Regex,
    location: Regex,
    description: Regex,
}

static PROPS: Lazy<LineProps> = Lazy::new(|| LineProps {
    fn_: property("FN"),
    n: property("N"),
    tel: property("TEL"),
    email: property("EMAIL"),
    org: property("ORG"),
    title: property("TITLE"),
    url: property("URL"),
    adr: property("ADR"),
    summary: property("SUMMARY"),
    dtstart: property("DTSTART"),
    dtend: property("DTEND"),
    location: property("LOCATION"),
    description: property("DESCRIPTION"),
});

/// Extract fields from `payload` read as `intent`.
pub fn parse(payload: &str, intent: Intent) -> Fields {
    match intent {
        Intent::Text => Fields::Text(TextFields {
            text: payload.to_string(),
        }),
        Intent::Url => Fields::Url(UrlFields {
            url: payload.to_string(),
        }),
        Intent::Email => Fields::Email(parse_email(payload)),
        Intent::Wifi => Fields::Wifi(parse_wifi(payload)),
        Intent::Vcard => Fields::Vcard(parse_vcard(payload)),
        Intent::Location => Fields::Location(parse_location(payload)),
        Intent::Sms => Fields::Sms(parse_sms(payload)),
        Intent::Call => Fields::Call(parse_call(payload)),
        Intent::Event => Fields::Event(parse_event(payload)),
        Intent::Payment => Fields::Payment(parse_payment(payload)),
    }
}

pub fn parse_wifi(payload: &str) -> WifiFields {
    let security = capture(&WIFI_SECURITY, payload)
        .map(|s| unescape_wifi(&s))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| WIFI_DEFAULT_SECURITY.to_string());
    WifiFields {
        ssid: capture(&WIFI_SSID, payload)
            .map(|s| unescape_wifi(&s))
            .unwrap_or_default(),
        password: capture(&WIFI_PASSWORD, payload)
            .map(|s| unescape_wifi(&s))
            .unwrap_or_default(),
        security,
    }
}

pub fn parse_email(payload: &str) -> EmailFields {
    let rest = strip_scheme(payload, "mailto:").unwrap_or(payload);
    let (address, query) = split_query(rest);
    EmailFields {
        email: address.to_string(),
        subject: query_value(query, "subject").unwrap_or_default(),
        body: query_value(query, "body").unwrap_or_default(),
    }
}

pub fn parse_vcard(payload: &str) -> ContactFields {
    let text = unfold_lines(payload);
    let p = &*PROPS;
    let name = line_value(&p.fn_, &text)
        .filter(|n| !n.is_empty())
        .or_else(|| capture(&p.n, &text).map(|n| structured_name(&n)))
        .unwrap_or_default();
    ContactFields {
        name,
        phone: line_value(&p.tel, &text).unwrap_or_default(),
        email: line_value(&p.email, &text).unwrap_or_default(),
        organization: line_value(&p.org, &text).unwrap_or_default(),
        title: line_value(&p.title, &text).unwrap_or_default(),
        url: line_value(&p.url, &text).unwrap_or_default(),
        address: capture(&p.adr, &text)
            .map(|adr| address_from_adr(&adr))
            .unwrap_or_default(),
    }
}

/// `N:Family;Given;...` to a display name.
fn structured_name(raw: &str) -> String {
    let mut parts = raw.split(';').map(unescape_text);
    let family = parts.next().unwrap_or_default();
    let given = parts.next().unwrap_or_default();
    match (given.is_empty(), family.is_empty()) {
        (false, false) => format!("{} {}", given, family),
        (false, true) => given,
        _ => family,
    }
}

/// Our own `;;<address>;;;` layout is taken whole; any other ADR value joins
/// its non-empty components.
fn address_from_adr(raw: &str) -> String {
    if let Some(inner) = raw
        .strip_prefix(";;")
        .and_then(|rest| rest.strip_suffix(";;;"))
    {
        return unescape_text(inner);
    }
    raw.split(';')
        .map(unescape_text)
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Reads the `q=` address; a legacy `geo:<lat>,<lng>` without one yields the
/// coordinate pair, except the `0,0` placeholder.
pub fn parse_location(payload: &str) -> LocationFields {
    let rest = strip_scheme(payload, "geo:").unwrap_or(payload);
    let (coords, query) = split_query(rest);
    let address = match query_value(query, "q") {
        Some(q) => q,
        None if !coords.is_empty() && coords != "0,0" && strip_scheme(payload, "geo:").is_some() => {
            coords.to_string()
        }
        None => String::new(),
    };
    LocationFields { address }
}

/// `sms:<phone>?body=<message>`, also accepting the `SMSTO:<phone>:<message>` form.
pub fn parse_sms(payload: &str) -> SmsFields {
    if let Some(rest) = strip_scheme(payload, "smsto:") {
        let (phone, message) = rest.split_once(':').unwrap_or((rest, ""));
        return SmsFields {
            phone: phone.to_string(),
            message: message.to_string(),
        };
    }
    let rest = strip_scheme(payload, "sms:").unwrap_or(payload);
    let (phone, query) = split_query(rest);
    SmsFields {
        phone: phone.to_string(),
        message: query_value(query, "body").unwrap_or_default(),
    }
}

pub fn parse_call(payload: &str) -> CallFields {
    CallFields {
        phone: strip_scheme(payload, "tel:").unwrap_or(payload).to_string(),
    }
}

pub fn parse_event(payload: &str) -> EventFields {
    let text = unfold_lines(payload);
    let p = &*PROPS;
    EventFields {
        title: line_value(&p.summary, &text).unwrap_or_default(),
        start: capture(&p.dtstart, &text)
            .map(|s| datetime::expand(s.trim()))
            .unwrap_or_default(),
        end: capture(&p.dtend, &text)
            .map(|s| datetime::expand(s.trim()))
            .unwrap_or_default(),
        location: line_value(&p.location, &text).unwrap_or_default(),
        description: line_value(&p.description, &text).unwrap_or_default(),
    }
}

/// PayPal.me link (recipient, then an optional amount segment) or BIP21
/// `bitcoin:` URI; anything else is the unknown sentinel.
pub fn parse_payment(payload: &str) -> PaymentFields {
    if let Some(caps) = PAYPAL_ME.captures(payload) {
        return PaymentFields {
            payment_kind: PaymentKind::Paypal,
            recipient: caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default(),
            amount: caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default(),
            note: String::new(),
        };
    }
    if let Some(rest) = strip_scheme(payload, "bitcoin:") {
        let (address, query) = split_query(rest);
        return PaymentFields {
            payment_kind: PaymentKind::Bitcoin,
            recipient: address.to_string(),
            amount: query_value(query, "amount").unwrap_or_default(),
            note: query_value(query, "message").unwrap_or_default(),
        };
    }
    PaymentFields::unknown()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim_end_matches('\r').to_string())
}

/// Captured content-line value with text escapes undone.
fn line_value(re: &Regex, text: &str) -> Option<String> {
    capture(re, text).map(|v| unescape_text(&v))
}

/// Remainder after a case-insensitive `scheme` prefix.
fn strip_scheme<'a>(payload: &'a str, scheme: &str) -> Option<&'a str> {
    let head = payload.get(..scheme.len())?;
    if head.eq_ignore_ascii_case(scheme) {
        Some(&payload[scheme.len()..])
    } else {
        None
    }
}

/// Split `target?query` at the first `?`. No `?` means an empty query.
fn split_query(rest: &str) -> (&str, &str) {
    rest.split_once('?').unwrap_or((rest, ""))
}
