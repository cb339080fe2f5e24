// loanlink-core/src/domain/amount.rs
//
// Monetary aggregates come back from PostgreSQL as `numeric::text`.
// They are coerced to f64 here. No currency rounding is applied.

use crate::domain::error::DomainError;

const MAX_FRACTION_DIGITS: usize = 3;

/// Coerces a textual aggregate (`"1250000.50"`) into a float.
pub fn parse_amount(raw: &str) -> Result<f64, DomainError> {
    let trimmed = raw.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| DomainError::InvalidAmount(raw.to_string()))?;

    if !value.is_finite() {
        return Err(DomainError::InvalidAmount(raw.to_string()));
    }
    Ok(value)
}

/// en-US display: thousands grouped with commas, at most three fraction
/// digits, trailing zeros dropped (`1234567.5` -> `1,234,567.5`).
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.*}", MAX_FRACTION_DIGITS, value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let digits = int_part.len();
    let mut out = String::with_capacity(digits + digits / 3 + frac.len() + 2);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }

    // Values that round to zero are shown unsigned.
    if value < 0.0 && out.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.insert(0, '-');
    }
    out
}
