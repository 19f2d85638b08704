//! Route handlers, one module per area of the site.

pub mod account;
pub mod admin;
pub mod cart;
pub mod catalog;
pub mod rating;

use serde::Deserialize;

use crate::error::Error;

/// A form value that clients send either as a JSON number or as text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Lenient {
  Number(f64),
  Text(String),
}

impl Lenient {
  /// The value as a float. Blank text counts as absent.
  pub fn to_f64(&self, field: &str) -> Result<Option<f64>, Error> {
    match self {
      Lenient::Number(n) => Ok(Some(*n)),
      Lenient::Text(s) if s.trim().is_empty() => Ok(None),
      Lenient::Text(s) => s
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(Some)
        .ok_or_else(|| Error::bad_request(format!("{field} must be a number"))),
    }
  }

  /// The value as a whole number. Blank text counts as absent.
  pub fn to_i64(&self, field: &str) -> Result<Option<i64>, Error> {
    match self.to_f64(field)? {
      None => Ok(None),
      Some(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => Ok(Some(n as i64)),
      Some(_) => Err(Error::bad_request(format!("{field} must be a whole number"))),
    }
  }
}

/// Flatten an optional lenient field.
pub fn opt_i64(value: &Option<Lenient>, field: &str) -> Result<Option<i64>, Error> {
  value.as_ref().map(|v| v.to_i64(field)).transpose().map(Option::flatten)
}

pub fn opt_f64(value: &Option<Lenient>, field: &str) -> Result<Option<f64>, Error> {
  value.as_ref().map(|v| v.to_f64(field)).transpose().map(Option::flatten)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(json: &str) -> Lenient { serde_json::from_str(json).unwrap() }

  #[test]
  fn accepts_numbers_and_numeric_text() {
    assert_eq!(parse("3").to_i64("quantity").unwrap(), Some(3));
    assert_eq!(parse("\"4\"").to_i64("quantity").unwrap(), Some(4));
    assert_eq!(parse("\" 2.5 \"").to_f64("rating").unwrap(), Some(2.5));
    assert_eq!(parse("\"\"").to_i64("quantity").unwrap(), None);
  }

  #[test]
  fn rejects_garbage_and_fractions() {
    assert!(parse("\"lots\"").to_i64("quantity").is_err());
    assert!(parse("2.5").to_i64("quantity").is_err());
    assert!(parse("\"NaN\"").to_f64("rating").is_err());
  }

  #[test]
  fn absent_stays_absent() {
    assert_eq!(opt_i64(&None, "quantity").unwrap(), None);
    assert_eq!(opt_f64(&Some(parse("\"\"")), "unitPrice").unwrap(), None);
  }
}
