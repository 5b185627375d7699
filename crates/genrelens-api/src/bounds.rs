//! The range of `(year, month)` windows the upstream data set covers.
//!
//! Rejecting out-of-range requests is the HTTP layer's job; the engine itself
//! only refuses months outside 1–12.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowBounds {
  pub min_year:  i32,
  /// Earliest month accepted when `year == min_year`.
  pub min_month: u32,
  pub max_year:  i32,
  /// Latest month accepted when `year == max_year`.
  pub max_month: u32,
}

impl Default for WindowBounds {
  fn default() -> Self { Self { min_year: 2021, min_month: 1, max_year: 2024, max_month: 11 } }
}

impl WindowBounds {
  /// Validate a requested window and narrow the month once it is known to be
  /// in range.
  pub fn check(&self, year: i32, month: i64) -> Result<u32, ApiError> {
    if !(self.min_year..=self.max_year).contains(&year) {
      return Err(ApiError::BadRequest(format!(
        "Year must be between {} and {}",
        self.min_year, self.max_year
      )));
    }
    if year == self.min_year && month < i64::from(self.min_month) {
      return Err(ApiError::BadRequest(format!(
        "For year {}, month must be between {} and 12",
        self.min_year, self.min_month
      )));
    }
    if year == self.max_year && month > i64::from(self.max_month) {
      return Err(ApiError::BadRequest(format!(
        "For year {}, month must be between 1 and {}",
        self.max_year, self.max_month
      )));
    }
    match u32::try_from(month) {
      Ok(month @ 1..=12) => Ok(month),
      _ => Err(ApiError::BadRequest("Month must be between 1 and 12".to_owned())),
    }
  }
}
