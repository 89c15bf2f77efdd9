//! Presentation helpers for prices, quantities and timestamps.
//!
//! Output is locale-independent: `.` decimal point, `,` thousands
//! separator. The f64 goes through `Decimal::from_f64`, which drops the
//! binary noise past f64's significant digits (`0.15` becomes `0.15`,
//! not `0.1499…`). That value is rounded half away from zero, so `0.15`
//! renders as `"0.2"`.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::*;

/// Rendered in place of NaN and infinities.
pub const NOT_AVAILABLE: &str = "n/a";

/// Fixed-precision number formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    decimals: u32,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self { decimals: 1 }
    }
}

impl NumberFormat {
    pub const fn new(decimals: u32) -> Self {
        Self { decimals }
    }

    pub const fn decimals(&self) -> u32 {
        self.decimals
    }

    /// `0.731` -> `"73.1%"`.
    pub fn probability(&self, p: f64) -> String {
        if !p.is_finite() {
            return NOT_AVAILABLE.to_string();
        }
        format!("{}%", self.fixed(p * 100.0))
    }

    /// `1234567.89` -> `"1,234,567.9"`.
    pub fn number(&self, x: f64) -> String {
        if !x.is_finite() {
            return NOT_AVAILABLE.to_string();
        }
        group_thousands(&self.fixed(x))
    }

    /// `3.21` -> `"+3.2%"`, `-1.0` -> `"-1.0%"`, zero unsigned.
    pub fn signed_percent(&self, pct: f64) -> String {
        if !pct.is_finite() {
            return NOT_AVAILABLE.to_string();
        }
        let body = self.fixed(pct);
        if body.starts_with('-') || is_zero_text(&body) {
            format!("{body}%")
        } else {
            format!("+{body}%")
        }
    }

    fn fixed(&self, x: f64) -> String {
        match Decimal::from_f64(x) {
            Some(d) => {
                let mut rounded =
                    d.round_dp_with_strategy(self.decimals, RoundingStrategy::MidpointAwayFromZero);
                if rounded.is_zero() {
                    rounded = Decimal::ZERO;
                }
                rounded.rescale(self.decimals);
                rounded.to_string()
            }
            // Beyond Decimal's range; f64 formatting is exact enough there.
            None => format!("{x:.prec$}", prec = self.decimals as usize),
        }
    }
}

/// Percentage with one decimal: `0.731` -> `"73.1%"`.
pub fn format_probability(p: f64) -> String {
    NumberFormat::default().probability(p)
}

/// Grouped quantity with one decimal: `10` -> `"10.0"`.
pub fn format_number(x: f64) -> String {
    NumberFormat::default().number(x)
}

/// Signed percentage with one decimal: `3.21` -> `"+3.2%"`.
pub fn format_signed_percent(pct: f64) -> String {
    NumberFormat::default().signed_percent(pct)
}

/// Grouped integer: `1234` -> `"1,234"`.
pub fn format_count(n: u64) -> String {
    group_thousands(&n.to_string())
}

/// Coarse relative age: `"just now"`, `"5m ago"`, `"3h ago"`, `"2d ago"`.
///
/// Timestamps in the future count as "just now".
pub fn format_time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    match seconds {
        s if s < 60 => "just now".to_string(),
        s if s < 3_600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3_600),
        s => format!("{}d ago", s / 86_400),
    }
}

fn is_zero_text(s: &str) -> bool {
    s.chars().all(|c| c == '0' || c == '.')
}

fn group_thousands(text: &str) -> String {
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}
