//! Chilean RUT validation.
//!
//! A RUT is a body of 7-8 digits followed by a check character (a digit or
//! "K") computed with the modulo-11 weighted-sum algorithm.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // [0-9] rather than \d: the latter matches any Unicode decimal digit,
    // and the body must be ASCII digits only.
    static ref RUT_SHAPE: Regex = Regex::new(r"^[0-9]{7,8}[0-9K]$").unwrap();
}

/// Validate a RUT including its check digit.
///
/// Accepts the common written forms ("21.402.714-3", "21402714-3",
/// "214027143", lowercase "k"). Malformed input returns `false`, it never
/// panics.
pub fn validate(raw: &str) -> bool {
    let rut = raw.to_uppercase().replace(['.', '-'], "");
    if !RUT_SHAPE.is_match(&rut) {
        return false;
    }

    let (body, dv) = rut.split_at(rut.len() - 1);
    dv == expected_check_char(body)
}

/// Compute the expected check character for a digit-only RUT body.
///
/// Weights cycle 2,3,4,5,6,7 from the least significant digit upward.
fn expected_check_char(body: &str) -> String {
    let mut sum: u32 = 0;
    let mut factor: u32 = 2;
    for c in body.chars().rev() {
        sum += c.to_digit(10).unwrap_or(0) * factor;
        factor = if factor == 7 { 2 } else { factor + 1 };
    }

    match sum % 11 {
        0 => "0".to_string(),
        1 => "K".to_string(),
        resto => (11 - resto).to_string(),
    }
}

/// Split a RUT into its numeric body and check character.
///
/// Used when persisting workers: the body and check digit live in separate
/// columns. Returns `None` when the input does not have a valid shape.
pub fn split(raw: &str) -> Option<(String, String)> {
    let rut = raw.to_uppercase().replace(['.', '-'], "");
    if !RUT_SHAPE.is_match(&rut) {
        return None;
    }
    let (body, dv) = rut.split_at(rut.len() - 1);
    Some((body.to_string(), dv.to_string()))
}

/// Format a stored body + check digit pair for display ("12345678-5").
pub fn format_display(body: &str, dv: &str) -> String {
    format!("{}-{}", body, dv)
}
