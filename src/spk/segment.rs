//! One SPK array: a series of Chebyshev records for a `(center, target)` pair.
//!
//! A [`Segment`] keeps a shared handle on the DAF plus the word range of its
//! array; records are resolved by offset on every query, nothing is decoded
//! up front except the four-word directory.
//!
//! Record lookup is O(1): records have a uniform length `intlen`, so the
//! record covering `t` is `floor((t - init) / intlen)`. Each record covers the
//! half-open interval `[start, end)`, except the last one which also owns the
//! final instant of the series.

use std::sync::Arc;

use nalgebra::Vector3;
use tracing::trace;

use super::directory::DirectoryData;
use super::ephemeris_record::EphemerisRecord;
use super::spk_type::SpkDataType;
use super::summary_record::Summary;
use super::SeriesKey;
use crate::constants::SECONDS_PER_DAY;
use crate::daf::{Daf, Words};
use crate::ephem_errors::{EphemError, Result};
use crate::time::calendar_day;

/// Chebyshev layout of an evaluable segment.
#[derive(Debug, Clone, PartialEq)]
struct Chebyshev {
    data_type: SpkDataType,
    components: usize,
    directory: DirectoryData,
}

/// A series of an SPK kernel.
///
/// Segments of data types other than 2 and 3 are kept so they can be listed,
/// but every evaluation on them fails with [`EphemError::Format`].
///
/// See also
/// ------------
/// * [`Segment::locate`] – Record index for a time.
/// * [`Segment::position`] / [`Segment::state`] – Evaluation.
#[derive(Debug, Clone)]
pub struct Segment {
    daf: Arc<Daf>,
    summary: Summary,
    chebyshev: Option<Chebyshev>,
}

impl Segment {
    /// Bind a summary to the DAF holding its array.
    ///
    /// Arguments
    /// -----------------
    /// * `daf`: Shared kernel container.
    /// * `summary`: SPK descriptor of the array.
    ///
    /// Return
    /// ----------
    /// * The segment, or [`EphemError::Format`] if the array words fall
    ///   outside the file or the directory of a type 2/3 array is
    ///   inconsistent.
    pub fn new(daf: Arc<Daf>, summary: Summary) -> Result<Self> {
        let (first, last) = (summary.initial_addr, summary.final_addr);
        if first < 1 || last < first {
            return Err(EphemError::Format(format!(
                "segment {:?} has word range {first}..{last}",
                summary.source
            )));
        }
        let array = daf.words(first as usize, last as usize)?;

        let chebyshev = summary
            .spk_type()
            .ok()
            .and_then(|data_type| data_type.component_count().map(|c| (data_type, c)))
            .map(|(data_type, components)| {
                DirectoryData::parse(&array, components).map(|directory| Chebyshev {
                    data_type,
                    components,
                    directory,
                })
            })
            .transpose()?;

        Ok(Segment {
            daf,
            summary,
            chebyshev,
        })
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn key(&self) -> SeriesKey {
        self.summary.key()
    }

    pub fn source(&self) -> &str {
        &self.summary.source
    }

    /// True for the Chebyshev types this crate evaluates.
    pub fn is_supported(&self) -> bool {
        self.chebyshev.is_some()
    }

    /// Declared coverage `[start, end]`, ET seconds.
    pub fn coverage(&self) -> (f64, f64) {
        (self.summary.start_epoch, self.summary.end_epoch)
    }

    pub fn covers(&self, t: f64) -> bool {
        let (start, end) = self.coverage();
        t >= start && t <= end
    }

    fn chebyshev(&self) -> Result<&Chebyshev> {
        self.chebyshev.as_ref().ok_or_else(|| {
            EphemError::Format(format!(
                "unsupported data type {} in segment {}",
                self.summary.data_type,
                self.key()
            ))
        })
    }

    pub fn directory(&self) -> Result<&DirectoryData> {
        Ok(&self.chebyshev()?.directory)
    }

    pub fn data_type(&self) -> Result<SpkDataType> {
        Ok(self.chebyshev()?.data_type)
    }

    pub fn record_count(&self) -> Result<usize> {
        Ok(self.directory()?.n_records)
    }

    /// Polynomial degree, one less than the coefficients per component.
    pub fn degree(&self) -> Result<usize> {
        let cheb = self.chebyshev()?;
        Ok(cheb.directory.coefficient_count(cheb.components) - 1)
    }

    /// Interval `[start, end]` of record `index`.
    pub fn record_bounds(&self, index: usize) -> Result<(f64, f64)> {
        let directory = self.directory()?;
        if index >= directory.n_records {
            return Err(EphemError::Format(format!(
                "record {index} of a {}-record segment",
                directory.n_records
            )));
        }
        Ok(directory.record_bounds(index))
    }

    /// Index of the record covering `t`.
    ///
    /// Return
    /// ----------
    /// * [`EphemError::OutOfRange`] when `t` is NaN or outside the declared
    ///   coverage. `t` equal to the end of the series maps to the last record.
    pub fn locate(&self, t: f64) -> Result<usize> {
        let directory = self.directory()?;
        let (start, end) = self.coverage();
        if !self.covers(t) {
            return Err(EphemError::OutOfRange {
                time: t,
                start,
                end,
            });
        }

        let index = directory
            .record_index(t)
            .ok_or(EphemError::OutOfRange {
                time: t,
                start: directory.init,
                end: directory.end(),
            })?;
        trace!(key = %self.key(), t, index, "located record");
        Ok(index)
    }

    /// View of record `index`.
    pub fn record(&self, index: usize) -> Result<EphemerisRecord<'_>> {
        let cheb = self.chebyshev()?;
        let bounds = self.record_bounds(index)?;
        let rsize = cheb.directory.rsize;
        let words = self.array()?.slice(index * rsize, rsize).ok_or_else(|| {
            EphemError::Format(format!("record {index} runs past its segment"))
        })?;
        EphemerisRecord::new(words, cheb.components, bounds)
    }

    /// Words of the whole array, directory included.
    pub fn array(&self) -> Result<Words<'_>> {
        self.daf.words(
            self.summary.initial_addr as usize,
            self.summary.final_addr as usize,
        )
    }

    /// Position (km) at `t`.
    pub fn position(&self, t: f64) -> Result<Vector3<f64>> {
        Ok(self.record(self.locate(t)?)?.position(t))
    }

    /// Position (km) and velocity (km/s) at `t`.
    pub fn state(&self, t: f64) -> Result<(Vector3<f64>, Vector3<f64>)> {
        Ok(self.record(self.locate(t)?)?.state(t))
    }

    /// Record layout lines of the verbose `spk` listing.
    ///
    /// Empty for unsupported data types.
    pub fn describe_records(&self) -> Vec<String> {
        let Some(cheb) = &self.chebyshev else {
            return Vec::new();
        };
        let directory = &cheb.directory;
        let n = directory.n_records;
        let coefficients = directory.coefficient_count(cheb.components);
        let (plural, each) = if n == 1 { ("", "") } else { ("s", " each") };

        let mut lines = vec![
            format!(
                "   {n} polynomial{plural} covering {:?} days{each}",
                directory.intlen / SECONDS_PER_DAY
            ),
            format!("      x {coefficients} coefficients per polynomial"),
            format!("      x {} coordinates", cheb.components),
            format!(
                "      = {} double precision floats",
                n * coefficients * cheb.components
            ),
        ];

        let (start, end) = self.coverage();
        if start == directory.init {
            lines.push("   Polynomial start date matches segment start date".into());
        } else {
            lines.push(format!(
                "   First polynomial starts {:.1} days earlier than segment start date, on {}",
                (start - directory.init) / SECONDS_PER_DAY,
                calendar_day(directory.init)
            ));
        }
        if end == directory.end() {
            lines.push("   Polynomial end date matches segment end date".into());
        } else {
            lines.push(format!(
                "   Final polynomial ends {:.1} days later than segment end date, on {}",
                (directory.end() - end) / SECONDS_PER_DAY,
                calendar_day(directory.end())
            ));
        }
        lines
    }
}
