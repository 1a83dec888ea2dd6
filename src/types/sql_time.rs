//! Native time record shared by every temporal column.
//!
//! Layout follows the client library's `MYSQL_TIME`:
//! - year, month, day, hour, minute, second: `u32`
//! - second_part: `u64` microseconds
//! - neg: `bool` (negative TIME values)
//! - time_type: `i32` (none -2, error -1, date 0, datetime 1, time 2,
//!   datetime with zone 3)
//! - time_zone_displacement: `i32` seconds east of UTC

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::error::{Error, Result};

/// Which fields of a [`SqlTime`] are meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum TimestampType {
    None = -2,
    Error = -1,
    Date = 0,
    DateTime = 1,
    Time = 2,
    DateTimeTz = 3,
}

impl TimestampType {
    /// Decode the raw discriminant written by the client library.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => TimestampType::Date,
            1 => TimestampType::DateTime,
            2 => TimestampType::Time,
            3 => TimestampType::DateTimeTz,
            -2 => TimestampType::None,
            _ => TimestampType::Error,
        }
    }
}

/// Structured temporal value bound to DATE, DATETIME, TIMESTAMP and TIME columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct SqlTime {
    pub year: u32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    /// Fractional seconds in microseconds.
    pub second_part: u64,
    pub neg: bool,
    /// Raw [`TimestampType`] discriminant; the native side may write it.
    pub time_type: i32,
    /// UTC offset in seconds, meaningful only for [`TimestampType::DateTimeTz`].
    pub time_zone_displacement: i32,
}

impl SqlTime {
    /// A calendar date.
    pub fn date(year: u32, month: u32, day: u32) -> Self {
        Self {
            year,
            month,
            day,
            time_type: TimestampType::Date as i32,
            ..Self::default()
        }
    }

    /// A date with wall-clock time.
    pub fn datetime(year: u32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            time_type: TimestampType::DateTime as i32,
            ..Self::default()
        }
    }

    /// A (possibly negative) duration-of-day value for TIME columns.
    ///
    /// `hour` may exceed 23; TIME ranges over -838:59:59 to 838:59:59.
    pub fn time(neg: bool, hour: u32, minute: u32, second: u32) -> Self {
        Self {
            hour,
            minute,
            second,
            neg,
            time_type: TimestampType::Time as i32,
            ..Self::default()
        }
    }

    /// Set fractional seconds.
    pub fn with_micros(mut self, micros: u64) -> Self {
        self.second_part = micros;
        self
    }

    /// Attach a UTC offset in seconds, turning a date-time into a zoned one.
    pub fn with_time_zone(mut self, displacement: i32) -> Self {
        self.time_zone_displacement = displacement;
        self.time_type = TimestampType::DateTimeTz as i32;
        self
    }

    /// Decoded time type.
    pub fn timestamp_type(&self) -> TimestampType {
        TimestampType::from_raw(self.time_type)
    }

    /// Convert the date part to a chrono date.
    pub fn to_naive_date(&self) -> Result<NaiveDate> {
        let year = i32::try_from(self.year)
            .map_err(|_| Error::invalid_time(format!("year out of range: {}", self.year)))?;
        NaiveDate::from_ymd_opt(year, self.month, self.day).ok_or_else(|| {
            Error::invalid_time(format!(
                "year={}, month={}, day={}",
                self.year, self.month, self.day
            ))
        })
    }

    /// Convert the time-of-day part to a chrono time.
    pub fn to_naive_time(&self) -> Result<NaiveTime> {
        if self.neg {
            return Err(Error::invalid_time("negative TIME has no time of day"));
        }
        let micros = u32::try_from(self.second_part)
            .map_err(|_| Error::invalid_time(format!("second_part={}", self.second_part)))?;
        NaiveTime::from_hms_micro_opt(self.hour, self.minute, self.second, micros).ok_or_else(
            || {
                Error::invalid_time(format!(
                    "hour={}, minute={}, second={}, micros={}",
                    self.hour, self.minute, self.second, self.second_part
                ))
            },
        )
    }

    /// Convert to a chrono date-time.
    pub fn to_naive_datetime(&self) -> Result<NaiveDateTime> {
        Ok(NaiveDateTime::new(
            self.to_naive_date()?,
            self.to_naive_time()?,
        ))
    }

    fn fmt_clock(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)?;
        if self.second_part != 0 {
            write!(f, ".{:06}", self.second_part)?;
        }
        Ok(())
    }
}

impl From<NaiveDate> for SqlTime {
    fn from(date: NaiveDate) -> Self {
        // Years before 0 have no native representation and are clamped.
        SqlTime::date(date.year().max(0) as u32, date.month(), date.day())
    }
}

impl From<NaiveDateTime> for SqlTime {
    fn from(dt: NaiveDateTime) -> Self {
        SqlTime::datetime(
            dt.year().max(0) as u32,
            dt.month(),
            dt.day(),
            dt.hour(),
            dt.minute(),
            dt.second(),
        )
        .with_micros(u64::from(dt.nanosecond() / 1_000))
    }
}

impl From<NaiveTime> for SqlTime {
    fn from(t: NaiveTime) -> Self {
        SqlTime::time(false, t.hour(), t.minute(), t.second())
            .with_micros(u64::from(t.nanosecond() / 1_000))
    }
}

impl fmt::Display for SqlTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.timestamp_type() {
            TimestampType::Date => write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day),
            TimestampType::Time => {
                if self.neg {
                    f.write_str("-")?;
                }
                self.fmt_clock(f)
            }
            TimestampType::DateTime => {
                write!(f, "{:04}-{:02}-{:02} ", self.year, self.month, self.day)?;
                self.fmt_clock(f)
            }
            TimestampType::DateTimeTz => {
                write!(f, "{:04}-{:02}-{:02} ", self.year, self.month, self.day)?;
                self.fmt_clock(f)?;
                let sign = if self.time_zone_displacement < 0 { '-' } else { '+' };
                let offset = self.time_zone_displacement.unsigned_abs() / 60;
                write!(f, "{sign}{:02}:{:02}", offset / 60, offset % 60)
            }
            TimestampType::None | TimestampType::Error => f.write_str("<invalid time>"),
        }
    }
}
