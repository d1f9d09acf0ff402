//! Building SPK kernels from Chebyshev series.
//!
//! [`SpkWriter`] wraps a [`DafWriter`] configured for SPK summaries
//! (`ND = 2`, `NI = 6`). Series are described by [`ChebyshevSeries`]: a
//! uniform grid of records (`init`, `intlen`) and, per record, the
//! coefficients of every component laid out back to back. The writer adds the
//! per-record `mid`/`radius` words and the trailing directory.

use camino::Utf8Path;
use nalgebra::Vector3;

use super::spk_type::SpkDataType;
use super::SeriesKey;
use crate::chebyshev::fit;
use crate::daf::{DafWriter, Endianness};
use crate::ephem_errors::{EphemError, Result};

/// ICRF/J2000 frame code used by the JPL planetary ephemerides.
pub const FRAME_J2000: i32 = 1;

/// One type 2 or type 3 series, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct ChebyshevSeries {
    pub source: String,
    pub key: SeriesKey,
    pub frame: i32,
    pub data_type: SpkDataType,
    pub init: f64,
    pub intlen: f64,
    /// Per record: `n_coeff` coefficients for each component, X first.
    pub records: Vec<Vec<f64>>,
    /// Declared coverage; the span of the records when `None`.
    pub coverage: Option<(f64, f64)>,
}

impl ChebyshevSeries {
    pub fn new(key: SeriesKey, data_type: SpkDataType, init: f64, intlen: f64) -> Self {
        ChebyshevSeries {
            source: String::from("jplephem"),
            key,
            frame: FRAME_J2000,
            data_type,
            init,
            intlen,
            records: Vec::new(),
            coverage: None,
        }
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }

    pub fn with_coverage(mut self, start: f64, end: f64) -> Self {
        self.coverage = Some((start, end));
        self
    }

    pub fn push_record(&mut self, coefficients: Vec<f64>) {
        self.records.push(coefficients);
    }

    /// Fit an analytic motion on `n_records` records of `intlen` seconds.
    ///
    /// Arguments
    /// -----------------
    /// * `state`: Position (km) and velocity (km/s) at an ET. Type 2 series
    ///   only use the position; type 3 series fit both.
    /// * `n_coeff`: Coefficients per component.
    ///
    /// Return
    /// ----------
    /// * The fitted series, or [`EphemError::Format`] for a data type that is
    ///   not a Chebyshev type.
    pub fn fit<F>(
        key: SeriesKey,
        data_type: SpkDataType,
        init: f64,
        intlen: f64,
        n_records: usize,
        n_coeff: usize,
        state: F,
    ) -> Result<Self>
    where
        F: Fn(f64) -> (Vector3<f64>, Vector3<f64>),
    {
        let components = components_of(data_type)?;
        let mut series = ChebyshevSeries::new(key, data_type, init, intlen);
        for i in 0..n_records {
            let start = init + intlen * i as f64;
            let at = |s: f64| state(start + (s + 1.0) * intlen / 2.0);
            let mut record = Vec::with_capacity(components * n_coeff);
            for component in 0..components {
                record.extend(fit(
                    |s| {
                        let (p, v) = at(s);
                        if component < 3 {
                            p[component]
                        } else {
                            v[component - 3]
                        }
                    },
                    n_coeff,
                ));
            }
            series.push_record(record);
        }
        Ok(series)
    }

    /// Array words: records with their `mid`/`radius`, then the directory.
    pub fn to_words(&self) -> Result<Vec<f64>> {
        let components = components_of(self.data_type)?;
        let n_coeff = match self.records.first() {
            Some(first) if !first.is_empty() && first.len() % components == 0 => {
                first.len() / components
            }
            _ => {
                return Err(EphemError::Format(format!(
                    "series {} needs at least one record of {components} equal components",
                    self.key
                )))
            }
        };
        if self.intlen.is_nan() || self.intlen <= 0.0 {
            return Err(EphemError::Format(format!(
                "series {} has record length {}",
                self.key, self.intlen
            )));
        }

        let rsize = 2 + components * n_coeff;
        let mut words = Vec::with_capacity(rsize * self.records.len() + 4);
        for (i, record) in self.records.iter().enumerate() {
            if record.len() != components * n_coeff {
                return Err(EphemError::Format(format!(
                    "record {i} of series {} has {} coefficients, expected {}",
                    self.key,
                    record.len(),
                    components * n_coeff
                )));
            }
            let radius = self.intlen / 2.0;
            words.push(self.init + self.intlen * i as f64 + radius);
            words.push(radius);
            words.extend_from_slice(record);
        }
        words.extend_from_slice(&[
            self.init,
            self.intlen,
            rsize as f64,
            self.records.len() as f64,
        ]);
        Ok(words)
    }

    /// Declared coverage, defaulting to the span of the records.
    pub fn coverage(&self) -> (f64, f64) {
        self.coverage.unwrap_or((
            self.init,
            self.init + self.intlen * self.records.len() as f64,
        ))
    }
}

fn components_of(data_type: SpkDataType) -> Result<usize> {
    data_type.component_count().ok_or_else(|| {
        EphemError::Format(format!("cannot write unsupported data type {data_type}"))
    })
}

/// Builder for an SPK file.
#[derive(Debug, Clone)]
pub struct SpkWriter {
    daf: DafWriter,
}

impl Default for SpkWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl SpkWriter {
    pub fn new() -> Self {
        SpkWriter {
            daf: DafWriter::new("DAF/SPK", 2, 6),
        }
    }

    pub fn with_internal_name(self, name: &str) -> Self {
        SpkWriter {
            daf: self.daf.with_internal_name(name),
        }
    }

    pub fn with_comment(self, comment: &str) -> Self {
        SpkWriter {
            daf: self.daf.with_comment(comment),
        }
    }

    pub fn with_endianness(self, endianness: Endianness) -> Self {
        SpkWriter {
            daf: self.daf.with_endianness(endianness),
        }
    }

    pub fn add_series(&mut self, series: &ChebyshevSeries) -> Result<()> {
        let words = series.to_words()?;
        let (start, end) = series.coverage();
        self.add_raw(
            &series.source,
            (start, end),
            series.key,
            series.frame,
            series.data_type.to_i32(),
            &words,
        )
    }

    /// Add an array whose words are already laid out (records and
    /// directory), as copied from another kernel.
    pub fn add_raw(
        &mut self,
        source: &str,
        (start, end): (f64, f64),
        key: SeriesKey,
        frame: i32,
        data_type: i32,
        words: &[f64],
    ) -> Result<()> {
        self.daf.add_array(
            source,
            &[start, end],
            &[key.target, key.center, frame, data_type],
            words,
        )
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.daf.to_bytes()
    }

    pub fn write_to(&self, path: impl AsRef<Utf8Path>) -> Result<()> {
        self.daf.write_to(path)
    }
}
