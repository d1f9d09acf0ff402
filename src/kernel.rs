//! # Kernel: the public query API
//!
//! [`Kernel`] ties an opened SPK to a [`BodyResolver`] and answers
//! "where is this body at this time" in barycentric terms:
//!
//! ```text
//! target ──resolver──▶ Combination ──▶ series (0, 3) + (3, 399) ──▶ km, km/s
//! ```
//!
//! Times are ET (TDB) seconds past J2000, the native scale of SPK kernels;
//! [`Kernel::position_at`] and [`Kernel::state_at`] accept a
//! [`hifitime::Epoch`] instead. Positions are in km and velocities in km/s,
//! relative to the Solar System Barycenter for the default rules.
//!
//! A kernel is immutable once loaded, and can be shared between threads.
//!
//! ## Example
//! ```rust,no_run
//! use jplephem::kernel::Kernel;
//!
//! let kernel = Kernel::open("de421.bsp")?;
//! let earth = kernel.position("earth", 0.0)?;
//! let (start, end) = kernel.coverage(499)?;
//! # Ok::<(), jplephem::ephem_errors::EphemError>(())
//! ```

use std::fmt;
use std::io::Read;

use camino::{Utf8Path, Utf8PathBuf};
use hifitime::Epoch;
use nalgebra::Vector3;
use tracing::debug;

use crate::daf::Daf;
use crate::ephem_errors::{EphemError, Result};
use crate::kernel_source::KernelSource;
use crate::resolver::{BodyResolver, Combination, TargetId};
use crate::spk::{JPLEphemHeader, SeriesKey, Segment, Spk};
use crate::state_vector::StateVector;
use crate::time::epoch_to_et;

/// An opened ephemeris kernel.
#[derive(Debug, Clone)]
pub struct Kernel {
    spk: Spk,
    resolver: BodyResolver,
    path: Option<Utf8PathBuf>,
}

impl Kernel {
    /// Memory map and index a kernel file.
    ///
    /// Arguments
    /// -----------------
    /// * `path`: An SPK file (`.bsp`).
    ///
    /// Return
    /// ----------
    /// * The kernel, [`EphemError::Io`] if the file cannot be read, or
    ///   [`EphemError::Format`] if it is not a valid SPK. The map is released
    ///   on every error path.
    ///
    /// See also
    /// ------------
    /// * [`Kernel::from_source`] – Open from a `naif:`/`path:` source string.
    pub fn open(path: impl AsRef<Utf8Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut kernel = Self::from_spk(Spk::new(Daf::open(path)?)?);
        kernel.path = Some(path.to_path_buf());
        Ok(kernel)
    }

    /// Read a whole kernel from a stream.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(Self::from_spk(Spk::new(Daf::from_reader(reader)?)?))
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Ok(Self::from_spk(Spk::new(Daf::from_bytes(bytes)?)?))
    }

    /// Open the kernel a source string points to (`"naif:DE440"`,
    /// `"path:/data/de421.bsp"`, or a bare path).
    pub fn from_source(source: &str) -> Result<Self> {
        let path = source.parse::<KernelSource>()?.resolve()?;
        Self::open(path)
    }

    pub fn from_spk(spk: Spk) -> Self {
        debug!(series = spk.keys().len(), "kernel ready");
        Kernel {
            spk,
            resolver: BodyResolver::default(),
            path: None,
        }
    }

    pub fn spk(&self) -> &Spk {
        &self.spk
    }

    /// File the kernel was opened from, if any.
    pub fn path(&self) -> Option<&Utf8Path> {
        self.path.as_deref()
    }

    pub fn resolver(&self) -> &BodyResolver {
        &self.resolver
    }

    /// Mutable access to the rules, to register custom combinations.
    pub fn resolver_mut(&mut self) -> &mut BodyResolver {
        &mut self.resolver
    }

    /// Rule for `target`, checked against the series of this kernel.
    ///
    /// Return
    /// ----------
    /// * The rule, or [`EphemError::UnknownTarget`] if there is none or one
    ///   of its series is missing from the kernel.
    pub fn combination(&self, target: impl Into<TargetId>) -> Result<Combination> {
        let target = target.into();
        let rule = self.resolver.rule(&target)?;
        if let Some(missing) = rule.keys().into_iter().find(|key| !self.spk.contains(*key)) {
            return Err(EphemError::UnknownTarget(format!(
                "{target} needs series {missing}, which this kernel does not hold"
            )));
        }
        Ok(rule)
    }

    /// Position (km) of `target` at `t` (ET seconds past J2000).
    ///
    /// Return
    /// ----------
    /// * The position, [`EphemError::UnknownTarget`] for a target this kernel
    ///   cannot resolve, or [`EphemError::OutOfRange`] for a time outside the
    ///   coverage of one of its series.
    pub fn position(&self, target: impl Into<TargetId>, t: f64) -> Result<Vector3<f64>> {
        self.combination(target)?
            .evaluate(|key| self.spk.position(key, t))
    }

    /// Position (km) and velocity (km/s) of `target` at `t`.
    ///
    /// The position is bit-identical to [`Kernel::position`] at the same `t`.
    pub fn position_and_velocity(&self, target: impl Into<TargetId>, t: f64) -> Result<StateVector> {
        self.combination(target)?
            .evaluate(|key| self.state_of(key, t))
    }

    /// Positions at each time of `times`.
    ///
    /// Return
    /// ----------
    /// * One position per time, in order, or the first error met. No partial
    ///   result is returned.
    pub fn positions(&self, target: impl Into<TargetId>, times: &[f64]) -> Result<Vec<Vector3<f64>>> {
        let rule = self.combination(target)?;
        times
            .iter()
            .map(|&t| rule.evaluate(|key| self.spk.position(key, t)))
            .collect()
    }

    /// States at each time of `times`; fails as a whole like
    /// [`Kernel::positions`].
    pub fn positions_and_velocities(
        &self,
        target: impl Into<TargetId>,
        times: &[f64],
    ) -> Result<Vec<StateVector>> {
        let rule = self.combination(target)?;
        times
            .iter()
            .map(|&t| rule.evaluate(|key| self.state_of(key, t)))
            .collect()
    }

    /// Span over which `target` can be evaluated: the intersection of the
    /// coverage of the series it combines.
    pub fn coverage(&self, target: impl Into<TargetId>) -> Result<(f64, f64)> {
        let target = target.into();
        let rule = self.combination(&target)?;
        let (start, end) = rule
            .keys()
            .into_iter()
            .map(|key| self.spk.coverage(key))
            .reduce(|a, b| {
                let ((s1, e1), (s2, e2)) = (a?, b?);
                Ok((s1.max(s2), e1.min(e2)))
            })
            .unwrap_or_else(|| Err(EphemError::UnknownTarget(target.to_string())))?;
        if start > end {
            return Err(EphemError::UnknownTarget(format!(
                "the series of {target} do not overlap in time"
            )));
        }
        Ok((start, end))
    }

    /// [`Kernel::position`] at an epoch in any time scale.
    pub fn position_at(&self, target: impl Into<TargetId>, epoch: &Epoch) -> Result<Vector3<f64>> {
        self.position(target, epoch_to_et(epoch))
    }

    /// [`Kernel::position_and_velocity`] at an epoch in any time scale.
    pub fn state_at(&self, target: impl Into<TargetId>, epoch: &Epoch) -> Result<StateVector> {
        self.position_and_velocity(target, epoch_to_et(epoch))
    }

    /// Segments of the `(center, target)` series, in file order.
    pub fn series(&self, center: i32, target: i32) -> Result<Vec<&Segment>> {
        let key = SeriesKey::new(center, target);
        let segments: Vec<&Segment> = self.spk.segments_for(key).collect();
        if segments.is_empty() {
            return Err(EphemError::UnknownTarget(format!(
                "no series {key} in kernel"
            )));
        }
        Ok(segments)
    }

    /// Every `(center, target)` pair of the kernel, sorted.
    pub fn series_list(&self) -> Vec<SeriesKey> {
        self.spk.keys()
    }

    pub fn comments(&self) -> Result<String> {
        self.spk.comments()
    }

    pub fn header(&self) -> Option<JPLEphemHeader> {
        self.spk.header()
    }

    fn state_of(&self, key: SeriesKey, t: f64) -> Result<StateVector> {
        self.spk.state(key, t).map(StateVector::from)
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(path) = &self.path {
            writeln!(f, "{path}")?;
        }
        write!(f, "{}", self.spk)
    }
}

#[cfg(test)]
mod test_kernel {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::spk::spk_writer::ChebyshevSeries;
    use crate::spk::{SpkDataType, SpkWriter};

    fn constant(key: SeriesKey, x: f64, start: f64, end: f64) -> ChebyshevSeries {
        let mut series =
            ChebyshevSeries::new(key, SpkDataType::ChebyshevPositionOnly, start, end - start);
        series.push_record(vec![x, 0.0, 0.0, 1.0, 0.0, 0.0]);
        series
    }

    fn sample() -> Kernel {
        let mut writer = SpkWriter::new();
        for series in [
            constant(SeriesKey::new(0, 3), 100.0, 0.0, 1000.0),
            constant(SeriesKey::new(3, 399), 1.0, 0.0, 500.0),
            constant(SeriesKey::new(3, 301), 50.0, 200.0, 1000.0),
            constant(SeriesKey::new(0, 10), -3.0, 0.0, 1000.0),
        ] {
            writer.add_series(&series).unwrap();
        }
        Kernel::from_bytes(writer.to_bytes()).unwrap()
    }

    #[test]
    fn test_sum_and_difference() {
        let kernel = sample();
        assert_eq!(kernel.position(10, 5.0).unwrap(), Vector3::new(-3.0, 0.0, 0.0));
        assert_eq!(
            kernel.position("earth", 300.0).unwrap(),
            Vector3::new(101.0, 0.0, 0.0)
        );
        assert_eq!(
            kernel.position("geocentric moon", 300.0).unwrap(),
            Vector3::new(49.0, 0.0, 0.0)
        );

        let state = kernel.position_and_velocity(399, 300.0).unwrap();
        assert_eq!(state.position, kernel.position(399, 300.0).unwrap());
        // y = s across each record, so dy/dt = 2 / length
        assert_abs_diff_eq!(state.velocity.y, 2.0 / 1000.0 + 2.0 / 500.0);
    }

    #[test]
    fn test_coverage_is_intersection() {
        let kernel = sample();
        assert_eq!(kernel.coverage(3).unwrap(), (0.0, 1000.0));
        assert_eq!(kernel.coverage("Earth").unwrap(), (0.0, 500.0));
        assert_eq!(kernel.coverage(301).unwrap(), (200.0, 1000.0));
        assert_eq!(kernel.coverage("geocentric moon").unwrap(), (200.0, 500.0));
    }

    #[test]
    fn test_unknown_targets() {
        let kernel = sample();
        assert!(matches!(
            kernel.position("Pluto", 0.0),
            Err(EphemError::UnknownTarget(_))
        ));
        assert!(matches!(kernel.coverage(4), Err(EphemError::UnknownTarget(_))));
        assert!(matches!(
            kernel.series(0, 4),
            Err(EphemError::UnknownTarget(_))
        ));
        assert_eq!(kernel.series(3, 399).unwrap().len(), 1);
    }

    #[test]
    fn test_out_of_range_in_second_series() {
        let kernel = sample();
        assert_eq!(
            kernel.position(399, 600.0),
            Err(EphemError::OutOfRange {
                time: 600.0,
                start: 0.0,
                end: 500.0
            })
        );
        assert!(kernel.positions(399, &[0.0, 100.0, 600.0]).is_err());
        assert_eq!(kernel.positions(399, &[0.0, 500.0]).unwrap().len(), 2);
        assert!(kernel.positions(399, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_custom_rule() {
        let mut kernel = sample();
        kernel.resolver_mut().insert(
            "heliocentric emb",
            Combination::Difference(SeriesKey::new(0, 3), SeriesKey::new(0, 10)),
        );
        assert_eq!(
            kernel.position("heliocentric emb", 0.0).unwrap(),
            Vector3::new(103.0, 0.0, 0.0)
        );
    }

    #[test]
    fn test_listing() {
        let kernel = sample();
        assert_eq!(
            kernel.series_list(),
            vec![
                SeriesKey::new(0, 3),
                SeriesKey::new(0, 10),
                SeriesKey::new(3, 301),
                SeriesKey::new(3, 399)
            ]
        );
        assert!(kernel
            .to_string()
            .starts_with("File type DAF/SPK and format LTL-IEEE with 4 segments:"));
        assert_eq!(kernel.header(), None);
        assert_eq!(kernel.path(), None);
    }

    #[test]
    fn test_kernel_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Kernel>();
    }
}
