//! Amount formatting for summary cards.
//!
//! # Invariants
//! - Count and energy aggregates render with zero fractional digits.
//! - Rounding is half-to-even, matching platform decimal formatters.
//! - Formatting is pure: the same aggregate always yields the same string.

use serde::{Deserialize, Serialize};

/// Number grouping convention used for count/energy amounts and goals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberLocale {
    /// `1,234,567`
    #[default]
    EnUs,
    /// `1.234.567`
    DeDe,
    /// `1 234 567` with a narrow no-break space.
    FrFr,
    /// `1234567`
    Plain,
}

impl NumberLocale {
    pub fn grouping_separator(self) -> Option<char> {
        match self {
            Self::EnUs => Some(','),
            Self::DeDe => Some('.'),
            Self::FrFr => Some('\u{202f}'),
            Self::Plain => None,
        }
    }
}

const GROUP_SIZE: usize = 3;

/// Formats a numeric aggregate as a grouped integer string.
///
/// Non-finite input renders as `-`.
pub fn format_decimal(value: f64, locale: NumberLocale) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }

    let rounded = value.round_ties_even();
    let digits = format!("{:.0}", rounded.abs());
    let grouped = match locale.grouping_separator() {
        Some(separator) => group_digits(&digits, separator),
        None => digits,
    };

    // `-0` is rendered as `0`.
    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Formats a whole-minute duration aggregate.
pub fn format_minutes(minutes: u64) -> String {
    format!("{minutes} minutes")
}

fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / GROUP_SIZE * separator.len_utf8());
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (len - index) % GROUP_SIZE == 0 {
            grouped.push(separator);
        }
        grouped.push(digit);
    }
    grouped
}
