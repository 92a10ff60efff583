//! Line-number normalization.
//!
//! The dispatch service encodes line numbers differently depending on the
//! query mode and the deployment: `"527"`, `"010527"`, `"000527"`, or a bare
//! numeric `10527`. Displays want the short public number.

/// Placeholder shown when neither line field carries anything.
pub const UNKNOWN_LINE: &str = "?";

/// Normalize a line number from its textual and numeric upstream fields.
///
/// The textual field is preferred. Rules, first match wins:
///
/// 1. one to three digits are already a public line number;
/// 2. `010` followed by three digits drops the `010` prefix;
/// 3. leading zeros followed by exactly three digits drop the zeros;
/// 4. otherwise the trailing three digits of the numeric field (or of the
///    text when there is no numeric field);
/// 5. otherwise the raw value verbatim, or [`UNKNOWN_LINE`].
///
/// # Examples
///
/// ```
/// use bus_proxy::domain::normalize_line;
///
/// assert_eq!(normalize_line(Some("010527"), None), "527");
/// assert_eq!(normalize_line(Some("000527"), None), "527");
/// assert_eq!(normalize_line(None, Some("10527")), "527");
/// assert_eq!(normalize_line(Some("52"), Some("10052")), "52");
/// assert_eq!(normalize_line(None, None), "?");
/// ```
pub fn normalize_line(text: Option<&str>, numeric: Option<&str>) -> String {
    let text = non_blank(text);
    let numeric = non_blank(numeric);

    let Some(preferred) = text.or(numeric) else {
        return UNKNOWN_LINE.to_string();
    };

    if (1..=3).contains(&preferred.len()) && all_digits(preferred) {
        return preferred.to_string();
    }

    if let Some(rest) = preferred.strip_prefix("010") {
        if rest.len() == 3 && all_digits(rest) {
            return rest.to_string();
        }
    }

    if let Some(short) = strip_zero_padding(preferred) {
        return short.to_string();
    }

    if let Some(tail) = numeric.and_then(trailing_three_digits) {
        return tail.to_string();
    }
    if let Some(tail) = text.and_then(trailing_three_digits) {
        return tail.to_string();
    }

    preferred.to_string()
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// `^0+(\d{3})$`
fn strip_zero_padding(s: &str) -> Option<&str> {
    if s.len() < 4 || !s.is_ascii() {
        return None;
    }
    let (zeros, tail) = s.split_at(s.len() - 3);
    (zeros.bytes().all(|b| b == b'0') && all_digits(tail)).then_some(tail)
}

/// `(\d{3})$`
fn trailing_three_digits(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    if bytes.len() < 3 || !bytes[bytes.len() - 3..].iter().all(u8::is_ascii_digit) {
        return None;
    }
    Some(&s[s.len() - 3..])
}
