//! Locale-aware currency and percentage formatting.
//!
//! Formatting never fails: absent, unparsable or non-finite input is
//! formatted as zero so a bad cell degrades to `0,00 zł` instead of breaking
//! the table around it.

use serde::{Deserialize, Serialize};

const NBSP: char = '\u{a0}';

/// Number formatting locale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Locale {
    /// Polish złoty: `12 345,67 zł`.
    #[default]
    PlPl,
    /// US dollar: `$12,345.67`.
    EnUs,
}

impl Locale {
    fn decimal_separator(self) -> char {
        match self {
            Locale::PlPl => ',',
            Locale::EnUs => '.',
        }
    }

    fn group_separator(self) -> char {
        match self {
            Locale::PlPl => NBSP,
            Locale::EnUs => ',',
        }
    }

    /// Shortest integer part (in digits) that gets grouped at all.
    ///
    /// Polish leaves four-digit amounts ungrouped (`1000,00 zł`).
    fn min_grouped_digits(self) -> usize {
        match self {
            Locale::PlPl => 5,
            Locale::EnUs => 4,
        }
    }
}

/// Formatter bound to a single locale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Formatter {
    pub locale: Locale,
}

impl Formatter {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// Currency with two fixed decimals and the locale's symbol.
    ///
    /// Rounds half-up from the shortest decimal form, so `1.005` is `1,01 zł`.
    pub fn currency(&self, value: f64) -> String {
        let value = if value.is_finite() { value } else { 0.0 };
        let (int, frac) = round_half_up(value, 0, 2);
        let negative = value < 0.0 && !is_zero(&int, &frac);
        let digits = self.group(&int);
        let sign = if negative { "-" } else { "" };
        let sep = self.locale.decimal_separator();
        match self.locale {
            Locale::PlPl => format!("{sign}{digits}{sep}{frac}{NBSP}zł"),
            Locale::EnUs => format!("{sign}${digits}{sep}{frac}"),
        }
    }

    /// Currency from a text cell, parsed leniently.
    pub fn currency_str(&self, text: &str) -> String {
        self.currency(parse_lenient(text).unwrap_or(0.0))
    }

    pub fn currency_opt(&self, value: Option<f64>) -> String {
        self.currency(value.unwrap_or(0.0))
    }

    /// Percentage of a 0–1 fraction, at most two decimals.
    pub fn percentage(&self, fraction: f64) -> String {
        let fraction = if fraction.is_finite() { fraction } else { 0.0 };
        let (int, frac) = round_half_up(fraction, 2, 2);
        let negative = fraction < 0.0 && !is_zero(&int, &frac);
        let digits = self.group(&int);
        let sign = if negative { "-" } else { "" };
        let sep = self.locale.decimal_separator();
        match frac.trim_end_matches('0') {
            "" => format!("{sign}{digits}%"),
            f => format!("{sign}{digits}{sep}{f}%"),
        }
    }

    pub fn percentage_opt(&self, fraction: Option<f64>) -> String {
        self.percentage(fraction.unwrap_or(0.0))
    }

    fn group(&self, digits: &str) -> String {
        if digits.len() < self.locale.min_grouped_digits() {
            return digits.to_string();
        }
        let sep = self.locale.group_separator();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(sep);
            }
            out.push(ch);
        }
        out
    }
}

/// Integer and fractional digits of `|value| * 10^shift`, rounded half-up
/// to `decimals` places.
///
/// Works on the shortest decimal text of the float, so there is no integer
/// overflow and no binary-representation drift on half-way amounts.
fn round_half_up(value: f64, shift: usize, decimals: usize) -> (String, String) {
    let text = value.abs().to_string();
    let (int, frac) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let mut digits: Vec<u8> = int.bytes().chain(frac.bytes()).collect();
    let mut point = int.len() + shift;
    if digits.len() < point + decimals + 1 {
        digits.resize(point + decimals + 1, b'0');
    }

    let round_digit = digits[point + decimals];
    digits.truncate(point + decimals);
    if round_digit >= b'5' {
        let mut carry = true;
        for d in digits.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
            point += 1;
        }
    }

    let frac: String = digits[point..].iter().map(|&d| char::from(d)).collect();
    let int: String = digits[..point].iter().map(|&d| char::from(d)).collect();
    let int = match int.trim_start_matches('0') {
        "" => "0".to_string(),
        trimmed => trimmed.to_string(),
    };
    (int, frac)
}

fn is_zero(int: &str, frac: &str) -> bool {
    int.bytes().chain(frac.bytes()).all(|d| d == b'0')
}

/// Parse the leading number of `text`, ignoring whatever follows it.
///
/// `"1000 PLN"` parses as `1000.0`; `"abc"` and `""` parse as `None`.
pub fn parse_lenient(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return None;
    }

    // exponent only counts when digits follow it
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}
