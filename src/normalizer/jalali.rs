//! Solar Hijri (Jalali) <-> Gregorian date conversion.
//!
//! Uses the 33-year break-table arithmetic: for a Jalali year the table gives
//! the Gregorian day in March on which Farvardin 1 falls, and the position of
//! the year within its leap cycle. Everything else is day counting on top of
//! [`chrono::NaiveDate`].

use chrono::{Datelike, Duration, NaiveDate};

use crate::app::{GleanerError, Result};

/// Jalali years at which the leap pattern restarts.
const BREAKS: [i32; 20] = [
    -61, 9, 38, 199, 426, 686, 756, 818, 1111, 1181, 1210, 1635, 2060, 2097, 2192, 2262, 2324,
    2394, 2456, 3178,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct JalaliDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

struct YearInfo {
    /// Years since the last leap year (0 means this year is leap).
    leap: i32,
    gregorian_year: i32,
    /// Day in March of Farvardin 1.
    march: i32,
}

fn year_info(jy: i32) -> Result<YearInfo> {
    if jy < BREAKS[0] || jy >= BREAKS[BREAKS.len() - 1] {
        return Err(GleanerError::Parse(format!(
            "Jalali year {} outside supported range",
            jy
        )));
    }

    let gy = jy + 621;
    let mut leap_j = -14;
    let mut jp = BREAKS[0];
    let mut jump = 0;

    for &jm in &BREAKS[1..] {
        jump = jm - jp;
        if jy < jm {
            break;
        }
        leap_j += jump / 33 * 8 + (jump % 33) / 4;
        jp = jm;
    }

    let mut n = jy - jp;
    leap_j += n / 33 * 8 + (n % 33 + 3) / 4;
    if jump % 33 == 4 && jump - n == 4 {
        leap_j += 1;
    }

    let leap_g = gy / 4 - (gy / 100 + 1) * 3 / 4 - 150;
    let march = 20 + leap_j - leap_g;

    if jump - n < 6 {
        n = n - jump + (jump + 4) / 33 * 33;
    }
    let mut leap = ((n + 1) % 33 - 1) % 4;
    if leap == -1 {
        leap = 4;
    }

    Ok(YearInfo {
        leap,
        gregorian_year: gy,
        march,
    })
}

fn farvardin_first(info: &YearInfo) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(info.gregorian_year, 3, info.march as u32).ok_or_else(|| {
        GleanerError::Parse(format!(
            "no Gregorian date for March {} {}",
            info.march, info.gregorian_year
        ))
    })
}

/// First year of the era. Earlier years have no four-digit canonical form.
pub const MIN_YEAR: i32 = 1;

fn check_year(jy: i32) -> Result<()> {
    if jy < MIN_YEAR || jy >= BREAKS[BREAKS.len() - 1] {
        return Err(GleanerError::Parse(format!(
            "Jalali year {} outside supported range",
            jy
        )));
    }
    Ok(())
}

pub fn is_leap_year(jy: i32) -> Result<bool> {
    Ok(year_info(jy)?.leap == 0)
}

pub fn month_length(jy: i32, month: u32) -> Result<u32> {
    match month {
        1..=6 => Ok(31),
        7..=11 => Ok(30),
        12 => Ok(if is_leap_year(jy)? { 30 } else { 29 }),
        _ => Err(GleanerError::Parse(format!("month {} out of range", month))),
    }
}

impl JalaliDate {
    /// Builds a date after checking month and day bounds for `year`.
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self> {
        check_year(year)?;
        let len = month_length(year, month)?;
        if day == 0 || day > len {
            return Err(GleanerError::Parse(format!(
                "day {} out of range for {}-{:02}",
                day, year, month
            )));
        }
        Ok(Self { year, month, day })
    }

    pub fn to_gregorian(self) -> Result<NaiveDate> {
        let info = year_info(self.year)?;
        let start = farvardin_first(&info)?;
        let m = self.month as i64;
        let offset = (m - 1) * 31 - (m / 7) * (m - 7) + self.day as i64 - 1;
        Ok(start + Duration::days(offset))
    }

    pub fn from_gregorian(date: NaiveDate) -> Result<Self> {
        let gy = date.year();
        let mut jy = gy - 621;
        let info = year_info(jy)?;
        let mut k = (date - farvardin_first(&info)?).num_days();

        if k >= 0 {
            if k <= 185 {
                check_year(jy)?;
                return Ok(Self {
                    year: jy,
                    month: 1 + (k / 31) as u32,
                    day: (k % 31) as u32 + 1,
                });
            }
            k -= 186;
        } else {
            jy -= 1;
            k += 179;
            if info.leap == 1 {
                k += 1;
            }
        }

        check_year(jy)?;
        Ok(Self {
            year: jy,
            month: 7 + (k / 30) as u32,
            day: (k % 30) as u32 + 1,
        })
    }
}
