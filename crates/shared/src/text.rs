//! Text escaping for iCalendar and XML output.

/// Maximum octets per physical iCalendar line, excluding the CRLF.
pub const ICAL_LINE_LIMIT: usize = 75;

/// Escapes a TEXT value for an iCalendar content line.
///
/// Backslash, semicolon and comma are prefixed with a backslash, line feeds
/// become the two characters `\n`, and carriage returns are dropped.
pub fn escape_ical_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(ch),
        }
    }
    out
}

/// Folds a content line so no physical line exceeds [`ICAL_LINE_LIMIT`] octets.
///
/// Continuation lines start with a single space. Splits never land inside a
/// multi-byte UTF-8 sequence. The returned string has CRLF between physical
/// lines and no trailing CRLF.
pub fn fold_ical_line(line: &str) -> String {
    if line.len() <= ICAL_LINE_LIMIT {
        return line.to_string();
    }

    let mut out = String::with_capacity(line.len() + line.len() / ICAL_LINE_LIMIT * 3);
    let mut current = 0usize;
    for ch in line.chars() {
        let width = ch.len_utf8();
        if current + width > ICAL_LINE_LIMIT {
            out.push_str("\r\n ");
            current = 1;
        }
        out.push(ch);
        current += width;
    }
    out
}

/// Escapes the five XML special characters.
pub fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Collapses runs of whitespace into single spaces and trims the ends.
pub fn clean_text(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}
