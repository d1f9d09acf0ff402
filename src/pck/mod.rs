//! # Binary PCK kernels
//!
//! A binary PCK (`.bpc`) is a DAF whose summaries carry `ND = 2` doubles and
//! `NI = 5` integers: `(start_et, end_et, body, frame, data_type, start_word,
//! end_word)`. Each array gives the orientation of a body frame as three
//! Euler angles expanded in Chebyshev polynomials, for instance the lunar
//! principal axes in `moon_pa_de421_1900-2050.bpc`.
//!
//! Angles are in radians, their rates in radians per second.
//!
//! ## See also
//! ------------
//! * [`crate::spk`] – Same container and record layout for positions.
//! * [`PckSegment::compute_and_differentiate`] – Angles with rates.

pub mod segment;

use std::fmt;
use std::io::Read;
use std::sync::Arc;

use camino::Utf8Path;
use itertools::Itertools;
use nalgebra::Vector3;
use tracing::{debug, warn};

pub use segment::{PckSegment, PckSummary, PCK_ANGLE_COMPONENTS, PCK_CHEBYSHEV_TYPE};

use crate::daf::Daf;
use crate::ephem_errors::{EphemError, Result};

/// An opened binary PCK with its segments in file order.
#[derive(Debug)]
pub struct Pck {
    daf: Arc<Daf>,
    segments: Vec<PckSegment>,
}

impl Pck {
    pub fn open(path: impl AsRef<Utf8Path>) -> Result<Self> {
        Self::new(Daf::open(path)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::new(Daf::from_reader(reader)?)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::new(Daf::from_bytes(bytes)?)
    }

    /// Bind every array of a DAF with the PCK summary layout.
    ///
    /// Return
    /// ----------
    /// * [`EphemError::Format`] if the layout is not `ND = 2`, `NI = 5` or an
    ///   array is malformed.
    pub fn new(daf: Daf) -> Result<Self> {
        let header = daf.header();
        if header.nd != 2 || header.ni != 5 {
            return Err(EphemError::Format(format!(
                "binary PCK summaries have ND=2 and NI=5, found ND={} NI={}",
                header.nd, header.ni
            )));
        }

        let daf = Arc::new(daf);
        let segments = daf
            .summaries()?
            .iter()
            .map(|raw| PckSegment::new(Arc::clone(&daf), PckSummary::from_daf(raw)?))
            .collect::<Result<Vec<_>>>()?;
        for segment in segments.iter().filter(|s| !s.is_supported()) {
            warn!(
                body = segment.body(),
                data_type = segment.summary().data_type,
                "PCK segment data type cannot be evaluated"
            );
        }
        debug!(segments = segments.len(), "indexed PCK segments");
        Ok(Pck { daf, segments })
    }

    pub fn daf(&self) -> &Daf {
        &self.daf
    }

    pub fn segments(&self) -> &[PckSegment] {
        &self.segments
    }

    /// Distinct bodies, sorted.
    pub fn bodies(&self) -> Vec<i32> {
        self.segments
            .iter()
            .map(PckSegment::body)
            .sorted()
            .dedup()
            .collect()
    }

    pub fn comments(&self) -> Result<String> {
        self.daf.comments()
    }

    /// Union of the declared coverage of a body.
    pub fn coverage(&self, body: i32) -> Result<(f64, f64)> {
        self.segments
            .iter()
            .filter(|s| s.body() == body)
            .map(PckSegment::coverage)
            .reduce(|(s1, e1), (s2, e2)| (s1.min(s2), e1.max(e2)))
            .ok_or_else(|| EphemError::UnknownTarget(format!("no body {body} in PCK")))
    }

    /// Segment of `body` whose declared coverage contains `t`, the one
    /// stored last when several do.
    pub fn segment_at(&self, body: i32, t: f64) -> Result<&PckSegment> {
        let (start, end) = self.coverage(body)?;
        self.segments
            .iter()
            .filter(|s| s.body() == body && s.covers(t))
            .last()
            .ok_or(EphemError::OutOfRange { time: t, start, end })
    }

    /// Orientation angles (radians) of `body` at `t`.
    pub fn compute(&self, body: i32, t: f64) -> Result<Vector3<f64>> {
        self.segment_at(body, t)?.compute(t)
    }

    /// Orientation angles (radians) and rates (radians per second) of `body`
    /// at `t`.
    pub fn compute_and_differentiate(
        &self,
        body: i32,
        t: f64,
    ) -> Result<(Vector3<f64>, Vector3<f64>)> {
        self.segment_at(body, t)?.compute_and_differentiate(t)
    }

    /// Listing of the segments, one per line.
    pub fn describe(&self, verbose: bool) -> String {
        let header = self.daf.header();
        let mut lines = vec![format!(
            "File type {} and format {} with {} segments:",
            header.idword,
            header.endianness.locfmt(),
            self.segments.len()
        )];
        for segment in &self.segments {
            lines.push(segment.summary().describe(verbose));
            if verbose {
                lines.extend(segment.describe_records());
            }
        }
        lines.join("\n")
    }
}

impl fmt::Display for Pck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe(false))
    }
}
