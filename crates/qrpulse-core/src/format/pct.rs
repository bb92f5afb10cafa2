//! URI component percent-encoding and query-string lookup.

/// Bytes that pass through unescaped besides ASCII alphanumerics.
const UNRESERVED_MARKS: &[u8] = b"-_.!~*'()";

/// Percent-encode a URI component: everything but `A-Z a-z 0-9 - _ . ! ~ * ' ( )`
/// becomes `%XX` over its UTF-8 bytes.
pub fn encode_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for &b in value.as_bytes() {
        if b.is_ascii_alphanumeric() || UNRESERVED_MARKS.contains(&b) {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}

/// Decode `%XX` escapes. Malformed escapes are kept literally; if the decoded
/// bytes are not valid UTF-8 the input is returned unchanged.
pub fn decode_component(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8(out).unwrap_or_else(|_| value.to_string())
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Look up `name` (case-insensitive) in an `a=1&b=2` query string and
/// percent-decode its value. First occurrence wins.
pub fn query_value(query: &str, name: &str) -> Option<String> {
    query
        .split('&')
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| decode_component(value))
}

/// Appends `key=value` query parameters, choosing `?` or `&` as needed.
pub(crate) struct QueryWriter<'a> {
    out: &'a mut String,
    started: bool,
}

impl<'a> QueryWriter<'a> {
    pub(crate) fn new(out: &'a mut String) -> Self {
        Self { out, started: false }
    }

    /// Append `key=<encoded value>` unless `value` is empty.
    pub(crate) fn param(&mut self, key: &str, value: &str) -> &mut Self {
        if !value.is_empty() {
            self.always(key, value);
        }
        self
    }

    /// Append `key=<encoded value>` even when `value` is empty.
    pub(crate) fn always(&mut self, key: &str, value: &str) -> &mut Self {
        self.out.push(if self.started { '&' } else { '?' });
        self.started = true;
        self.out.push_str(key);
        self.out.push('=');
        self.out.push_str(&encode_component(value));
        self
    }
}
