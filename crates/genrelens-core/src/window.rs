//! Time Window Resolver — calendar-month windows and the previous month end.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// An inclusive `[start, end]` date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
  pub start: NaiveDate,
  pub end:   NaiveDate,
}

impl DateWindow {
  pub fn new(start: NaiveDate, end: NaiveDate) -> Self { Self { start, end } }

  pub fn contains(&self, date: NaiveDate) -> bool {
    self.start <= date && date <= self.end
  }
}

/// The window of the calendar month `(year, month)`: the 1st through the last
/// day of that month.
pub fn resolve(year: i32, month: u32) -> Result<DateWindow> {
  let start = first_of_month(year, month)?;
  let (next_year, next_month) = if month == 12 {
    (year.checked_add(1).ok_or(Error::InvalidWindow { year, month })?, 1)
  } else {
    (year, month + 1)
  };
  let end = first_of_month(next_year, next_month)
    .map_err(|_| Error::InvalidWindow { year, month })?
    .checked_sub_days(Days::new(1))
    .ok_or(Error::InvalidWindow { year, month })?;
  Ok(DateWindow::new(start, end))
}

/// The last day of the month before `(year, month)`. January rolls back to
/// December 31 of `year - 1`.
pub fn previous_month_end(year: i32, month: u32) -> Result<NaiveDate> {
  if month == 1 {
    return year
      .checked_sub(1)
      .and_then(|y| NaiveDate::from_ymd_opt(y, 12, 31))
      .ok_or(Error::InvalidWindow { year, month });
  }
  first_of_month(year, month)?
    .checked_sub_days(Days::new(1))
    .ok_or(Error::InvalidWindow { year, month })
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate> {
  if !(1..=12).contains(&month) {
    return Err(Error::InvalidWindow { year, month });
  }
  NaiveDate::from_ymd_opt(year, month, 1).ok_or(Error::InvalidWindow { year, month })
}

#[cfg(test)]
mod tests {
  use chrono::Datelike;

  use super::*;

  fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
  }

  #[test]
  fn resolve_mid_year_month() {
    let w = resolve(2023, 6).unwrap();
    assert_eq!(w.start, d(2023, 6, 1));
    assert_eq!(w.end, d(2023, 6, 30));
  }

  #[test]
  fn resolve_december_rolls_into_next_year() {
    for year in 2021..=2024 {
      let w = resolve(year, 12).unwrap();
      assert_eq!(w.start, d(year, 12, 1));
      assert_eq!(w.end, d(year, 12, 31));
    }
  }

  #[test]
  fn resolve_leap_february() {
    assert_eq!(resolve(2024, 2).unwrap().end, d(2024, 2, 29));
    assert_eq!(resolve(2023, 2).unwrap().end, d(2023, 2, 28));
  }

  #[test]
  fn previous_month_end_in_january_is_prior_december() {
    for year in 2021..=2024 {
      assert_eq!(previous_month_end(year, 1).unwrap(), d(year - 1, 12, 31));
    }
  }

  #[test]
  fn previous_month_end_mid_year() {
    assert_eq!(previous_month_end(2024, 3).unwrap(), d(2024, 2, 29));
    assert_eq!(previous_month_end(2022, 5).unwrap(), d(2022, 4, 30));
  }

  #[test]
  fn month_out_of_range_is_invalid() {
    assert!(matches!(
      resolve(2023, 0),
      Err(Error::InvalidWindow { year: 2023, month: 0 })
    ));
    assert!(matches!(
      resolve(2023, 13),
      Err(Error::InvalidWindow { year: 2023, month: 13 })
    ));
    assert!(previous_month_end(2023, 13).is_err());
  }

  #[test]
  fn years_beyond_the_calendar_are_invalid() {
    assert!(matches!(
      previous_month_end(i32::MIN, 1),
      Err(Error::InvalidWindow { year: i32::MIN, month: 1 })
    ));
    assert!(resolve(i32::MAX, 12).is_err());
    let last = NaiveDate::MAX.year();
    assert!(matches!(
      resolve(last, 12),
      Err(Error::InvalidWindow { year, month: 12 }) if year == last
    ));
  }

  #[test]
  fn window_contains_is_inclusive() {
    let w = resolve(2023, 6).unwrap();
    assert!(w.contains(d(2023, 6, 1)));
    assert!(w.contains(d(2023, 6, 30)));
    assert!(!w.contains(d(2023, 7, 1)));
    assert!(!w.contains(d(2023, 5, 31)));
  }
}
