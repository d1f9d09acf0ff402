//! One binary PCK array: Chebyshev series of the orientation angles of a body.
//!
//! Type 2 arrays share the SPK type 2 layout: uniform records of
//! `(mid, radius, coefficients)` for three components, closed by the
//! `init, intlen, rsize, n` directory. The components are the Euler angles
//! (radians) of the body frame relative to its reference frame.

use std::fmt;
use std::sync::Arc;

use hifitime::Epoch;
use nalgebra::Vector3;
use tracing::trace;

use crate::constants::{seconds_to_jd, SECONDS_PER_DAY};
use crate::daf::{Daf, DafSummary, Words};
use crate::ephem_errors::{EphemError, Result};
use crate::naif_ids::body_name;
use crate::spk::{DirectoryData, EphemerisRecord};

/// Only Chebyshev angles (type 2) are evaluated.
pub const PCK_CHEBYSHEV_TYPE: i32 = 2;

/// Angles per record of a type 2 array.
pub const PCK_ANGLE_COMPONENTS: usize = 3;

/// PCK view of a DAF array summary (`ND = 2`, `NI = 5`).
#[derive(Debug, Clone, PartialEq)]
pub struct PckSummary {
    pub source: String,
    /// Start of the declared coverage, ET seconds past J2000.
    pub start_epoch: f64,
    /// End of the declared coverage, ET seconds past J2000.
    pub end_epoch: f64,
    /// Body (or body-fixed frame class id) whose orientation is given.
    pub body: i32,
    /// Reference frame of the angles.
    pub frame_id: i32,
    pub data_type: i32,
    /// First word of the array (1-based).
    pub initial_addr: i32,
    /// Last word of the array (1-based, inclusive).
    pub final_addr: i32,
}

impl PckSummary {
    pub fn from_daf(summary: &DafSummary) -> Result<Self> {
        match (summary.doubles.as_slice(), summary.integers.as_slice()) {
            (
                &[start_epoch, end_epoch, ..],
                &[body, frame_id, data_type, initial_addr, final_addr, ..],
            ) => Ok(PckSummary {
                source: summary.name.clone(),
                start_epoch,
                end_epoch,
                body,
                frame_id,
                data_type,
                initial_addr,
                final_addr,
            }),
            _ => Err(EphemError::Format(format!(
                "summary {:?} has {} doubles and {} integers, a PCK needs 2 and 5",
                summary.name,
                summary.doubles.len(),
                summary.integers.len()
            ))),
        }
    }

    pub fn start_jd(&self) -> f64 {
        seconds_to_jd(self.start_epoch)
    }

    pub fn end_jd(&self) -> f64 {
        seconds_to_jd(self.end_epoch)
    }

    /// One-line listing: `JD..JD frame=F  Body (id)`.
    ///
    /// The verbose form adds the data type and source name on a second line.
    pub fn describe(&self, verbose: bool) -> String {
        let body = body_name(self.body).unwrap_or("Unknown Body");
        let mut text = format!(
            "{:.2}..{:.2} frame={}  {} ({})",
            self.start_jd(),
            self.end_jd(),
            self.frame_id,
            body,
            self.body
        );
        if verbose {
            text.push_str(&format!(
                "\n  data_type={} source={}",
                self.data_type, self.source
            ));
        }
        text
    }
}

impl fmt::Display for PckSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PCK segment {:?}", self.source)?;
        writeln!(
            f,
            "  {} .. {}",
            Epoch::from_tdb_seconds(self.start_epoch),
            Epoch::from_tdb_seconds(self.end_epoch)
        )?;
        write!(
            f,
            "  body={} frame={} data_type={} words={}..{}",
            self.body, self.frame_id, self.data_type, self.initial_addr, self.final_addr
        )
    }
}

/// Orientation series of one body in a binary PCK.
///
/// Segments of data types other than 2 are listed but cannot be evaluated.
#[derive(Debug, Clone)]
pub struct PckSegment {
    daf: Arc<Daf>,
    summary: PckSummary,
    directory: Option<DirectoryData>,
}

impl PckSegment {
    /// Bind a summary to the DAF holding its array.
    ///
    /// Return
    /// ----------
    /// * The segment, or [`EphemError::Format`] if the array words fall
    ///   outside the file or a type 2 directory is inconsistent.
    pub fn new(daf: Arc<Daf>, summary: PckSummary) -> Result<Self> {
        let (first, last) = (summary.initial_addr, summary.final_addr);
        if first < 1 || last < first {
            return Err(EphemError::Format(format!(
                "PCK segment {:?} has word range {first}..{last}",
                summary.source
            )));
        }
        let array = daf.words(first as usize, last as usize)?;
        let directory = if summary.data_type == PCK_CHEBYSHEV_TYPE {
            Some(DirectoryData::parse(&array, PCK_ANGLE_COMPONENTS)?)
        } else {
            None
        };
        Ok(PckSegment {
            daf,
            summary,
            directory,
        })
    }

    pub fn summary(&self) -> &PckSummary {
        &self.summary
    }

    pub fn body(&self) -> i32 {
        self.summary.body
    }

    pub fn frame_id(&self) -> i32 {
        self.summary.frame_id
    }

    pub fn source(&self) -> &str {
        &self.summary.source
    }

    pub fn is_supported(&self) -> bool {
        self.directory.is_some()
    }

    /// Declared coverage `[start, end]`, ET seconds.
    pub fn coverage(&self) -> (f64, f64) {
        (self.summary.start_epoch, self.summary.end_epoch)
    }

    pub fn covers(&self, t: f64) -> bool {
        let (start, end) = self.coverage();
        t >= start && t <= end
    }

    pub fn directory(&self) -> Result<&DirectoryData> {
        self.directory.as_ref().ok_or_else(|| {
            EphemError::Format(format!(
                "only binary PCK data type {PCK_CHEBYSHEV_TYPE} is supported, segment {:?} has type {}",
                self.summary.source, self.summary.data_type
            ))
        })
    }

    /// Index of the record covering `t`.
    ///
    /// The records themselves bound the lookup, not the declared coverage:
    /// any `t` in `[init, init + n * intlen]` is accepted.
    pub fn locate(&self, t: f64) -> Result<usize> {
        let directory = self.directory()?;
        let index = directory
            .record_index(t)
            .ok_or(EphemError::OutOfRange {
                time: t,
                start: directory.init,
                end: directory.end(),
            })?;
        trace!(body = self.body(), t, index, "located PCK record");
        Ok(index)
    }

    /// Words of the whole array, directory included.
    pub fn array(&self) -> Result<Words<'_>> {
        self.daf.words(
            self.summary.initial_addr as usize,
            self.summary.final_addr as usize,
        )
    }

    /// View of record `index`.
    pub fn record(&self, index: usize) -> Result<EphemerisRecord<'_>> {
        let directory = self.directory()?;
        if index >= directory.n_records {
            return Err(EphemError::Format(format!(
                "record {index} of a {}-record PCK segment",
                directory.n_records
            )));
        }
        let rsize = directory.rsize;
        let words = self.array()?.slice(index * rsize, rsize).ok_or_else(|| {
            EphemError::Format(format!("record {index} runs past its PCK segment"))
        })?;
        EphemerisRecord::new(words, PCK_ANGLE_COMPONENTS, directory.record_bounds(index))
    }

    /// Orientation angles (radians) at `t`.
    pub fn compute(&self, t: f64) -> Result<Vector3<f64>> {
        Ok(self.record(self.locate(t)?)?.position(t))
    }

    /// Orientation angles (radians) and their rates (radians per second).
    pub fn compute_and_differentiate(&self, t: f64) -> Result<(Vector3<f64>, Vector3<f64>)> {
        Ok(self.record(self.locate(t)?)?.state(t))
    }

    /// Record layout lines of the verbose listing; empty for unsupported types.
    pub fn describe_records(&self) -> Vec<String> {
        let Some(directory) = &self.directory else {
            return Vec::new();
        };
        let n = directory.n_records;
        let (plural, each) = if n == 1 { ("", "") } else { ("s", " each") };
        vec![
            format!(
                "   {n} polynomial{plural} covering {:?} days{each}",
                directory.intlen / SECONDS_PER_DAY
            ),
            format!(
                "      x {} coefficients per angle",
                directory.coefficient_count(PCK_ANGLE_COMPONENTS)
            ),
        ]
    }
}
