//! Strict parser for conversion matrix text.
//!
//! The conversion matrix is stored as the text of a six-element numeric
//! sequence, e.g. `[1.2e3, -4, 0.5, 7, 100, 200]`. Only numeric literals are
//! accepted; anything else is an error, never something to evaluate.

use thiserror::Error;

/// Number of coefficients in an affine descriptor.
pub const DESCRIPTOR_LEN: usize = 6;

/// Why conversion matrix text could not be parsed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("conversion matrix is empty")]
    Empty,

    #[error("missing closing '{expected}'")]
    UnclosedBracket { expected: char },

    #[error("element {index} is empty")]
    EmptyElement { index: usize },

    #[error("element {index} is not a number: '{token}'")]
    NonNumeric { index: usize, token: String },

    #[error("expected 6 elements, found {found}")]
    WrongLength { found: usize },

    #[error("expected text or a list of numbers, found a {found}")]
    UnsupportedValue { found: &'static str },
}

/// Parses the text of a six-element numeric sequence.
///
/// The sequence may be wrapped in `[...]` or `(...)` or left bare, elements
/// are separated by commas, and a single trailing comma is allowed. Each
/// element must be a decimal numeric literal with an optional sign, fraction
/// and exponent, and must fit a finite `f64`. Names and expressions are
/// rejected, and so are `nan`, `inf` and out-of-range literals.
///
/// # Example
///
/// ```
/// use stagecoord::transform::parse_coefficients;
///
/// let raw = parse_coefficients("[1, 0, 0, 1, -2.5e3, 40]").unwrap();
/// assert_eq!(raw, [1.0, 0.0, 0.0, 1.0, -2500.0, 40.0]);
/// assert!(parse_coefficients("[1, 0, 0, 1, 0]").is_err());
/// ```
pub fn parse_coefficients(text: &str) -> Result<[f64; DESCRIPTOR_LEN], ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }

    let body = strip_brackets(trimmed)?;
    let elements = split_elements(body)?;

    let mut values = Vec::with_capacity(elements.len());
    for (index, token) in elements.iter().enumerate() {
        let value = parse_number(token).ok_or_else(|| ParseError::NonNumeric {
            index,
            token: (*token).to_string(),
        })?;
        values.push(value);
    }

    let found = values.len();
    values
        .try_into()
        .map_err(|_| ParseError::WrongLength { found })
}

fn strip_brackets(text: &str) -> Result<&str, ParseError> {
    let closing = match text.as_bytes()[0] {
        b'[' => ']',
        b'(' => ')',
        _ => return Ok(text),
    };
    text[1..]
        .strip_suffix(closing)
        .ok_or(ParseError::UnclosedBracket { expected: closing })
}

fn split_elements(body: &str) -> Result<Vec<&str>, ParseError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut elements: Vec<&str> = body.split(',').map(str::trim).collect();

    // One trailing comma is part of the literal syntax.
    if elements.len() > 1 && elements.last().is_some_and(|e| e.is_empty()) {
        elements.pop();
    }

    if let Some(index) = elements.iter().position(|e| e.is_empty()) {
        return Err(ParseError::EmptyElement { index });
    }

    Ok(elements)
}

/// Parses one decimal literal: `[+-]? (digits [. digits?] | . digits) ([eE] [+-]? digits)?`.
fn parse_number(token: &str) -> Option<f64> {
    let bytes = token.as_bytes();
    let mut pos = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        pos += 1;
    }

    let int_digits = count_digits(&bytes[pos..]);
    pos += int_digits;

    let mut frac_digits = 0;
    if bytes.get(pos) == Some(&b'.') {
        pos += 1;
        frac_digits = count_digits(&bytes[pos..]);
        pos += frac_digits;
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(pos), Some(b'e') | Some(b'E')) {
        pos += 1;
        if matches!(bytes.get(pos), Some(b'+') | Some(b'-')) {
            pos += 1;
        }
        let exp_digits = count_digits(&bytes[pos..]);
        if exp_digits == 0 {
            return None;
        }
        pos += exp_digits;
    }

    if pos != bytes.len() {
        return None;
    }

    // Literals too large for f64 would come back as infinity.
    token.parse().ok().filter(|v: &f64| v.is_finite())
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
