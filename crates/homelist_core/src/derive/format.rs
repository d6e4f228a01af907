//! es-CL text formatting for prices and relative times.

use once_cell::sync::Lazy;
use regex::Regex;

static NON_DIGIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\D+").expect("valid non-digit regex"));

const MINUTE_SECS: i64 = 60;
const HOUR_SECS: i64 = 60 * MINUTE_SECS;
const DAY_SECS: i64 = 24 * HOUR_SECS;

/// Spanish "time ago" label for `then_ms` as seen at `now_ms`.
///
/// Future timestamps read as "just now".
pub fn format_relative_time(then_ms: i64, now_ms: i64) -> String {
    let seconds = now_ms.saturating_sub(then_ms).div_euclid(1000);
    if seconds < MINUTE_SECS {
        return "hace unos segundos".to_string();
    }

    let minutes = seconds / MINUTE_SECS;
    if minutes < 60 {
        return format!("hace {minutes} min.");
    }

    let hours = seconds / HOUR_SECS;
    if hours < 24 {
        return format!("hace {hours} h.");
    }

    let days = seconds / DAY_SECS;
    if days == 1 {
        return "ayer".to_string();
    }
    if days < 7 {
        return format!("hace {days} días");
    }

    let weeks = days / 7;
    if weeks < 4 {
        return format!("hace {weeks} sem.");
    }

    let months = days / 30;
    if months < 12 {
        return format!("hace {months} meses");
    }

    format!("hace {} años", days / 365)
}

/// Groups digits with `.` as thousands separator: `1234567` -> `1.234.567`.
pub fn format_thousands(amount: i64) -> String {
    let grouped = group_digits(amount.unsigned_abs());
    if amount < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Chilean peso amount without decimals: `-1500` -> `-$1.500`.
pub fn format_clp(amount: i64) -> String {
    let grouped = group_digits(amount.unsigned_abs());
    if amount < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

fn group_digits(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    grouped
}

/// Reads a price typed with any separators or currency symbols.
///
/// Non-digits are stripped. Returns `None` when no digit remains or the
/// value does not fit.
pub fn parse_price_input(input: &str) -> Option<i64> {
    let digits = NON_DIGIT_RE.replace_all(input, "");
    if digits.is_empty() {
        return None;
    }
    digits.parse::<i64>().ok()
}
