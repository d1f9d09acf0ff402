//! # SPK kernels
//!
//! An SPK is a DAF whose summaries carry `ND = 2` doubles and `NI = 6`
//! integers: `(start_et, end_et, target, center, frame, data_type,
//! start_word, end_word)`. Each array is one [`Segment`], a series of
//! Chebyshev records giving the state of `target` relative to `center`.
//!
//! [`Spk`] indexes the segments of a kernel by [`SeriesKey`]. A key may own
//! several segments with adjacent coverage (DE441 splits every body in two);
//! queries pick the segment whose declared coverage contains the requested
//! time.
//!
//! ## See also
//! ------------
//! * [`crate::daf`] – The container underneath.
//! * [`SpkWriter`] – Builds type 2/3 kernels.
//! * [`excerpt::write_excerpt`] – Cuts a kernel down to a time window.

pub mod directory;
pub mod ephemeris_record;
pub mod excerpt;
pub mod jpl_ephem_header;
pub mod segment;
pub mod spk_type;
pub mod spk_writer;
pub mod summary_record;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use itertools::Itertools;
use nalgebra::Vector3;
use tracing::{debug, warn};

pub use directory::DirectoryData;
pub use ephemeris_record::EphemerisRecord;
pub use jpl_ephem_header::JPLEphemHeader;
pub use segment::Segment;
pub use spk_type::SpkDataType;
pub use spk_writer::SpkWriter;
pub use summary_record::Summary;

use crate::daf::Daf;
use crate::ephem_errors::{EphemError, Result};

/// `(center, target)` pair naming a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeriesKey {
    pub center: i32,
    pub target: i32,
}

impl SeriesKey {
    pub const fn new(center: i32, target: i32) -> Self {
        SeriesKey { center, target }
    }
}

impl From<(i32, i32)> for SeriesKey {
    fn from((center, target): (i32, i32)) -> Self {
        SeriesKey::new(center, target)
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.center, self.target)
    }
}

/// Segments of an SPK kernel, indexed by `(center, target)`.
#[derive(Debug, Clone)]
pub struct Spk {
    daf: Arc<Daf>,
    segments: Vec<Segment>,
    index: HashMap<SeriesKey, Vec<usize>>,
}

impl Spk {
    /// Index the segments of an SPK.
    ///
    /// Arguments
    /// -----------------
    /// * `daf`: An opened DAF with `ND = 2`, `NI = 6`.
    ///
    /// Return
    /// ----------
    /// * The indexed kernel, or [`EphemError::Format`] if the summary layout
    ///   is not the SPK one or any array is malformed.
    pub fn new(daf: Daf) -> Result<Self> {
        let header = daf.header();
        if header.nd != 2 || header.ni != 6 {
            return Err(EphemError::Format(format!(
                "SPK summaries have ND=2 and NI=6, found ND={} NI={}",
                header.nd, header.ni
            )));
        }

        let daf = Arc::new(daf);
        let mut segments = Vec::new();
        let mut index: HashMap<SeriesKey, Vec<usize>> = HashMap::new();
        for raw in daf.summaries()? {
            let summary = Summary::from_daf(&raw)?;
            let segment = Segment::new(Arc::clone(&daf), summary)?;
            if !segment.is_supported() {
                warn!(
                    key = %segment.key(),
                    data_type = segment.summary().data_type,
                    "segment data type cannot be evaluated"
                );
            }
            index.entry(segment.key()).or_default().push(segments.len());
            segments.push(segment);
        }

        debug!(
            segments = segments.len(),
            series = index.len(),
            "indexed SPK segments"
        );
        Ok(Spk {
            daf,
            segments,
            index,
        })
    }

    pub fn daf(&self) -> &Daf {
        &self.daf
    }

    /// All segments, in file order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Distinct series keys, sorted.
    pub fn keys(&self) -> Vec<SeriesKey> {
        self.index.keys().copied().sorted().collect()
    }

    pub fn contains(&self, key: SeriesKey) -> bool {
        self.index.contains_key(&key)
    }

    /// Segments of one series, in file order.
    pub fn segments_for(&self, key: SeriesKey) -> impl Iterator<Item = &Segment> + '_ {
        self.index
            .get(&key)
            .into_iter()
            .flatten()
            .filter_map(|&i| self.segments.get(i))
    }

    /// Union of the declared coverage of a series.
    ///
    /// Return
    /// ----------
    /// * `(start, end)` in ET seconds, or [`EphemError::UnknownTarget`] if the
    ///   kernel has no such series.
    pub fn coverage(&self, key: SeriesKey) -> Result<(f64, f64)> {
        self.segments_for(key)
            .map(Segment::coverage)
            .reduce(|(s1, e1), (s2, e2)| (s1.min(s2), e1.max(e2)))
            .ok_or_else(|| EphemError::UnknownTarget(format!("no series {key} in kernel")))
    }

    /// Segment of `key` whose coverage contains `t`.
    ///
    /// When several segments overlap at `t`, the one stored last wins.
    pub fn segment_at(&self, key: SeriesKey, t: f64) -> Result<&Segment> {
        let (start, end) = self.coverage(key)?;
        self.segments_for(key)
            .filter(|segment| segment.covers(t))
            .last()
            .ok_or(EphemError::OutOfRange { time: t, start, end })
    }

    /// Position (km) of `key.target` relative to `key.center` at `t`.
    pub fn position(&self, key: SeriesKey, t: f64) -> Result<Vector3<f64>> {
        self.segment_at(key, t)?.position(t)
    }

    /// Position (km) and velocity (km/s) of `key.target` relative to
    /// `key.center` at `t`.
    pub fn state(&self, key: SeriesKey, t: f64) -> Result<(Vector3<f64>, Vector3<f64>)> {
        self.segment_at(key, t)?.state(t)
    }

    pub fn comments(&self) -> Result<String> {
        self.daf.comments()
    }

    /// JPL release header found in the comments, if any.
    pub fn header(&self) -> Option<JPLEphemHeader> {
        self.comments()
            .ok()
            .and_then(|text| JPLEphemHeader::from_comments(&text))
    }

    /// Listing of the segments, one per line, with the verbose layout
    /// details when asked.
    pub fn describe(&self, verbose: bool) -> String {
        let mut lines = vec![self.title()];
        for segment in &self.segments {
            lines.push(segment.summary().describe(verbose));
            if verbose {
                let details = segment.describe_records();
                if !details.is_empty() {
                    lines.extend(details);
                    lines.push(String::new());
                }
            }
        }
        lines.join("\n")
    }

    fn title(&self) -> String {
        let header = self.daf.header();
        format!(
            "File type {} and format {} with {} segments:",
            header.idword,
            header.endianness.locfmt(),
            self.segments.len()
        )
    }
}

impl fmt::Display for Spk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe(false))
    }
}
