//! Backslash escaping for the line- and semicolon-delimited grammars.

/// Characters the Wi-Fi (MECARD-style) grammar reserves inside a value.
const WIFI_SPECIAL: &[char] = &['\\', ';', ',', ':', '"'];

pub fn escape_wifi(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if WIFI_SPECIAL.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Drop the backslash in front of any escaped character.
pub fn unescape_wifi(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Escape a vCard/iCalendar text value so it stays on one content line.
pub fn escape_text(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace("\r\n", "\\n")
        .replace(['\n', '\r'], "\\n")
}

/// Reverse vCard/iCalendar text escaping (`\\`, `\n`, `\N`, `\,`, `\;`).
/// Unknown escapes keep their backslash.
pub fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('n') | Some('N') => {
                out.push('\n');
                chars.next();
            }
            Some(next @ ('\\' | ',' | ';')) => {
                out.push(next);
                chars.next();
            }
            _ => out.push('\\'),
        }
    }
    out
}

/// Join folded content lines (a line break followed by a space or tab).
pub fn unfold_lines(text: &str) -> String {
    text.replace("\r\n ", "")
        .replace("\r\n\t", "")
        .replace("\n ", "")
        .replace("\n\t", "")
}
