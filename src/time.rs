//! Time conversions between the kernel time scale and calendar input.
//!
//! Kernels are indexed by ET (TDB) seconds past J2000. Callers holding a
//! [`hifitime::Epoch`] go through [`epoch_to_et`]; the command line accepts
//! proleptic Gregorian dates (`YYYY`, `YYYY/MM`, `YYYY/MM/DD`, or the same
//! with `-`) read as midnight TDB.

use hifitime::{Epoch, TimeScale};

use crate::constants::seconds_to_jd;
use crate::ephem_errors::{EphemError, Result};

/// ET seconds past J2000 of an epoch, in any time scale.
pub fn epoch_to_et(epoch: &Epoch) -> f64 {
    epoch.to_et_seconds()
}

pub fn et_to_epoch(et: f64) -> Epoch {
    Epoch::from_et_seconds(et)
}

/// `YYYY-MM-DD` of the TDB calendar day containing an ET instant.
pub fn calendar_day(et: f64) -> String {
    let (year, month, day, ..) = Epoch::from_tdb_seconds(et).to_gregorian(TimeScale::TDB);
    format!("{year}-{month:02}-{day:02}")
}

/// Julian date (TDB) of midnight starting a calendar date.
///
/// Arguments
/// -----------------
/// * `text`: `YYYY`, `YYYY/MM` or `YYYY/MM/DD`; `-` is accepted as separator.
///
/// Return
/// ----------
/// * The Julian date, or [`EphemError::InvalidDate`] for a malformed or
///   impossible date.
pub fn parse_date(text: &str) -> Result<f64> {
    let invalid = |reason: String| EphemError::InvalidDate(format!("{text:?}: {reason}"));

    let fields: Vec<&str> = text.trim().split(['/', '-']).collect();
    let (year, month, day) = match fields.as_slice() {
        [y] => (y, "1", "1"),
        [y, m] => (y, *m, "1"),
        [y, m, d] => (y, *m, *d),
        _ => {
            return Err(invalid(
                "specify each date as YYYY or YYYY/MM or YYYY/MM/DD".into(),
            ))
        }
    };
    let year: i32 = year.parse().map_err(|_| invalid(format!("bad year {year:?}")))?;
    let month: u8 = month.parse().map_err(|_| invalid(format!("bad month {month:?}")))?;
    let day: u8 = day.parse().map_err(|_| invalid(format!("bad day {day:?}")))?;

    let midnight = Epoch::maybe_from_gregorian(year, month, day, 0, 0, 0, 0, TimeScale::TDB)
        .map_err(|err| invalid(err.to_string()))?;
    Ok(seconds_to_jd(midnight.to_tdb_seconds()))
}
