//! Directory footer of a uniform Chebyshev SPK array.
//!
//! Type 2 and 3 arrays end with four words:
//!
//! * `init`, start of the first record (ET seconds past J2000),
//! * `intlen`, length of every record interval (seconds),
//! * `rsize`, record size in words,
//! * `n`, number of records.
//!
//! Records are laid out back to back from the first word of the array, so the
//! array holds exactly `rsize * n + 4` words.

use hifitime::{Duration, Epoch};

use crate::constants::DIRECTORY_WORDS;
use crate::daf::Words;
use crate::ephem_errors::{EphemError, Result};

/// Decoded directory footer.
///
/// See also
/// ------------
/// * [`DirectoryData::parse`] – Reads the footer from an array view.
/// * [`DirectoryData::record_index`] – Uses `init`/`intlen` to find a record.
#[derive(Debug, PartialEq, Clone)]
pub struct DirectoryData {
    pub init: f64,
    pub intlen: f64,
    pub rsize: usize,
    pub n_records: usize,
}

impl DirectoryData {
    /// Read and validate the footer of a Chebyshev array.
    ///
    /// Arguments
    /// -----------------
    /// * `array`: All words of the array, footer included.
    /// * `components`: Components per record (3 for type 2, 6 for type 3).
    ///
    /// Return
    /// ----------
    /// * The directory, or [`EphemError::Format`] when the footer is not a
    ///   plausible directory or disagrees with the array length.
    pub fn parse(array: &Words<'_>, components: usize) -> Result<Self> {
        let len = array.len();
        let footer = len
            .checked_sub(DIRECTORY_WORDS)
            .and_then(|offset| array.slice(offset, DIRECTORY_WORDS))
            .ok_or_else(|| {
                EphemError::Format(format!("array of {len} words has no directory footer"))
            })?;
        let word = |i: usize| footer.get(i).unwrap_or(f64::NAN);
        let (init, intlen, rsize, n_records) = (word(0), word(1), word(2), word(3));

        if !init.is_finite() || !intlen.is_finite() || intlen <= 0.0 {
            return Err(EphemError::Format(format!(
                "directory has init={init} intlen={intlen}"
            )));
        }
        let rsize = as_count(rsize, "rsize")?;
        let n_records = as_count(n_records, "n")?;

        if n_records == 0 {
            return Err(EphemError::Format("directory declares no records".into()));
        }
        if rsize < 2 + components {
            return Err(EphemError::Format(format!(
                "record size {rsize} cannot hold {components} components"
            )));
        }
        if (rsize - 2) % components != 0 {
            return Err(EphemError::Format(format!(
                "record size {rsize} does not split into {components} equal components"
            )));
        }
        if rsize.checked_mul(n_records).map(|w| w + DIRECTORY_WORDS) != Some(len) {
            return Err(EphemError::Format(format!(
                "directory declares {n_records} records of {rsize} words, array holds {len} words"
            )));
        }

        Ok(DirectoryData {
            init,
            intlen,
            rsize,
            n_records,
        })
    }

    /// Coefficients per component: `(rsize - 2) / components`.
    pub fn coefficient_count(&self, components: usize) -> usize {
        (self.rsize - 2) / components
    }

    /// End of the last record interval.
    pub fn end(&self) -> f64 {
        self.init + self.intlen * self.n_records as f64
    }

    /// Index of the record whose interval holds `t`.
    ///
    /// Intervals are half-open except the last one, which also owns
    /// [`DirectoryData::end`]. `None` for NaN or a time outside
    /// `[init, end]`.
    pub fn record_index(&self, t: f64) -> Option<usize> {
        let index = ((t - self.init) / self.intlen).floor();
        if index.is_nan() || index < 0.0 {
            return None;
        }
        if (index as usize) < self.n_records {
            Some(index as usize)
        } else if t <= self.end() {
            Some(self.n_records - 1)
        } else {
            None
        }
    }

    /// Interval `[start, end]` of record `index`.
    pub fn record_bounds(&self, index: usize) -> (f64, f64) {
        let start = self.init + self.intlen * index as f64;
        (start, start + self.intlen)
    }

    /// Words of the array without the footer.
    pub fn array_words(&self) -> usize {
        self.rsize * self.n_records + DIRECTORY_WORDS
    }
}

fn as_count(value: f64, label: &str) -> Result<usize> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Ok(value as usize)
    } else {
        Err(EphemError::Format(format!(
            "directory word {label} = {value} is not a count"
        )))
    }
}

impl std::fmt::Display for DirectoryData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let epoch = Epoch::from_et_seconds(self.init);
        let record_length = Duration::from_seconds(self.intlen);

        writeln!(f, "+----------------+----------------------------+")?;
        writeln!(f, "| {:<14} | {:<26} |", "Field", "Value")?;
        writeln!(f, "+----------------+----------------------------+")?;
        writeln!(f, "| {:<14} | {:<26} |", "init (epoch)", epoch.to_string())?;
        writeln!(
            f,
            "| {:<14} | {:<26} |",
            "intlen",
            record_length.to_string()
        )?;
        writeln!(f, "| {:<14} | {:<26} |", "rsize", self.rsize)?;
        writeln!(f, "| {:<14} | {:<26} |", "n_records", self.n_records)?;
        writeln!(f, "+----------------+----------------------------+")
    }
}

#[cfg(test)]
mod test_directory {
    use super::*;
    use crate::daf::{DafWriter, Daf};

    fn array_daf(words: &[f64]) -> Daf {
        let mut writer = DafWriter::new("DAF/SPK", 2, 6);
        writer
            .add_array("DIR", &[0.0, 1.0], &[1, 0, 1, 2], words)
            .unwrap();
        Daf::from_bytes(writer.to_bytes()).unwrap()
    }

    fn parse(words: &[f64], components: usize) -> Result<DirectoryData> {
        let daf = array_daf(words);
        let summary = &daf.summaries()?[0];
        let array = daf.words(summary.start_word() as usize, summary.end_word() as usize)?;
        DirectoryData::parse(&array, components)
    }

    #[test]
    fn test_parse_valid_directory() {
        // two records of mid, radius and 3 x 2 coefficients
        let mut words = vec![0.0; 16];
        words.extend_from_slice(&[-100.0, 50.0, 8.0, 2.0]);
        let directory = parse(&words, 3).unwrap();
        assert_eq!(
            directory,
            DirectoryData {
                init: -100.0,
                intlen: 50.0,
                rsize: 8,
                n_records: 2
            }
        );
        assert_eq!(directory.coefficient_count(3), 2);
        assert_eq!(directory.end(), 0.0);
        assert_eq!(directory.record_bounds(1), (-50.0, 0.0));
        assert_eq!(directory.array_words(), 20);
    }

    #[test]
    fn test_record_index() {
        let directory = DirectoryData {
            init: -100.0,
            intlen: 50.0,
            rsize: 8,
            n_records: 2,
        };
        assert_eq!(directory.record_index(-100.0), Some(0));
        assert_eq!(directory.record_index(-50.0), Some(1));
        assert_eq!(directory.record_index(-0.5), Some(1));
        assert_eq!(directory.record_index(0.0), Some(1));
        assert_eq!(directory.record_index(0.5), None);
        assert_eq!(directory.record_index(-100.5), None);
        assert_eq!(directory.record_index(f64::NAN), None);
    }

    #[test]
    fn test_inconsistent_directories() {
        let mut words = vec![0.0; 16];
        words.extend_from_slice(&[-100.0, 50.0, 8.0, 3.0]);
        assert!(matches!(parse(&words, 3), Err(EphemError::Format(_))));

        let mut words = vec![0.0; 16];
        words.extend_from_slice(&[-100.0, 0.0, 8.0, 2.0]);
        assert!(matches!(parse(&words, 3), Err(EphemError::Format(_))));

        let mut words = vec![0.0; 16];
        words.extend_from_slice(&[-100.0, 50.0, 8.0, 2.0]);
        assert!(matches!(parse(&words, 6), Err(EphemError::Format(_))));

        assert!(matches!(parse(&[1.0, 2.0], 3), Err(EphemError::Format(_))));
    }

    #[test]
    fn test_directory_display() {
        let dir_data = DirectoryData {
            init: -14200747200.0,
            intlen: 1382400.0,
            rsize: 41,
            n_records: 25112,
        };

        let expected_output = r#"+----------------+----------------------------+
| Field          | Value                      |
+----------------+----------------------------+
| init (epoch)   | 1549-12-31T00:00:00 ET     |
| intlen         | 16 days                    |
| rsize          | 41                         |
| n_records      | 25112                      |
+----------------+----------------------------+
"#;

        assert_eq!(format!("{dir_data}"), expected_output);
    }
}
