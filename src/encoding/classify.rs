//! Type inference for raw text fields.

use crate::types::TypeTag;

/// Classify a raw field.
///
/// Precedence, first match wins:
///
/// 1. `""` → [`TypeTag::Null`]
/// 2. ASCII digits only → [`TypeTag::Integer`]
/// 3. `digits.digits` → [`TypeTag::Float`]
/// 4. exactly `true` / `false` → [`TypeTag::Boolean`]
/// 5. `YYYY-MM-DD` → [`TypeTag::Date`]
/// 6. `YYYY-MM-DD HH:MM:SS` → [`TypeTag::Timestamp`]
/// 7. anything else → [`TypeTag::String`]
///
/// Matching is on shape only: `2024-13-45` is still a date. Signs, exponents and surrounding
/// whitespace make a field a string.
pub fn classify(raw: &str) -> TypeTag {
    if raw.is_empty() {
        TypeTag::Null
    } else if is_digits(raw) {
        TypeTag::Integer
    } else if is_decimal(raw) {
        TypeTag::Float
    } else if raw == "true" || raw == "false" {
        TypeTag::Boolean
    } else if is_date(raw) {
        TypeTag::Date
    } else if is_timestamp(raw) {
        TypeTag::Timestamp
    } else {
        TypeTag::String
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_decimal(s: &str) -> bool {
    match s.split_once('.') {
        Some((int, frac)) => is_digits(int) && is_digits(frac),
        None => false,
    }
}

/// Match `s` against a shape where `d` is any ASCII digit and every other byte is literal.
fn matches_shape(s: &str, shape: &str) -> bool {
    s.len() == shape.len()
        && s.bytes().zip(shape.bytes()).all(|(b, p)| match p {
            b'd' => b.is_ascii_digit(),
            lit => b == lit,
        })
}

fn is_date(s: &str) -> bool {
    matches_shape(s, "dddd-dd-dd")
}

fn is_timestamp(s: &str) -> bool {
    matches_shape(s, "dddd-dd-dd dd:dd:dd")
}
