//! Ephemeris record view and Chebyshev interpolation.
//!
//! An [`EphemerisRecord`] borrows the words of one record straight from the
//! kernel bytes: the record midpoint `mid` (ET seconds), the half interval
//! `radius` (seconds), then `n_coeff` Chebyshev coefficients for each
//! component.
//!
//! ## Record layout
//! 1. `mid`,
//! 2. `radius`,
//! 3. `n_coeff` coefficients for X (km), then Y, then Z,
//! 4. for SPK type 3 only: `n_coeff` coefficients for VX (km/s), then VY, VZ.
//!
//! The record interval used for normalization comes from the series
//! directory, `[init + i * intlen, init + (i + 1) * intlen]`, so that adjacent
//! records share their boundary exactly.
//!
//! ## Units & time scales
//! * Times are ET/TDB seconds past J2000.
//! * Positions are in **kilometers**; velocities in **km/s**.
//!
//! ## See also
//! ------------
//! * [`crate::chebyshev`] – The recurrences evaluated here.
//! * [`super::directory`] – Footer providing `rsize` and the record bounds.
use std::fmt;

use hifitime::{Duration, Epoch};
use nalgebra::Vector3;

use crate::chebyshev::{evaluate, evaluate_derivative, normalize_time, CoefficientBuffer};
use crate::daf::Words;
use crate::ephem_errors::{EphemError, Result};

const AXIS_LABELS: [&str; 6] = ["X", "Y", "Z", "VX", "VY", "VZ"];

/// One SPK ephemeris record, decoded lazily from the kernel bytes.
///
/// See also
/// ------------
/// * [`crate::spk::Segment::record`] – Builds the view for a record index.
/// * [`EphemerisRecord::position`] – Interpolated position at an ET.
/// * [`EphemerisRecord::state`] – Interpolated position and velocity at an ET.
#[derive(Debug, Clone, Copy)]
pub struct EphemerisRecord<'a> {
    words: Words<'a>,
    components: usize,
    n_coeff: usize,
    start: f64,
    end: f64,
}

impl<'a> EphemerisRecord<'a> {
    /// Wrap the words of one record.
    ///
    /// Arguments
    /// -----------------
    /// * `words`: Exactly `rsize` words of the record.
    /// * `components`: 3 (position only) or 6 (position and velocity).
    /// * `bounds`: `(start, end)` of the record interval, ET seconds.
    ///
    /// Return
    /// ----------
    /// * [`EphemError::Format`] when the words cannot hold `mid`, `radius`
    ///   and an equal number of coefficients per component.
    pub fn new(words: Words<'a>, components: usize, bounds: (f64, f64)) -> Result<Self> {
        let len = words.len();
        if components == 0 || len < 2 + components || (len - 2) % components != 0 {
            return Err(EphemError::Format(format!(
                "record of {len} words does not hold {components} coefficient series"
            )));
        }
        Ok(EphemerisRecord {
            words,
            components,
            n_coeff: (len - 2) / components,
            start: bounds.0,
            end: bounds.1,
        })
    }

    /// Midpoint stored in the record (ET seconds).
    pub fn mid(&self) -> f64 {
        self.words.get(0).unwrap_or(f64::NAN)
    }

    /// Half length stored in the record (seconds).
    pub fn radius(&self) -> f64 {
        self.words.get(1).unwrap_or(f64::NAN)
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.start, self.end)
    }

    pub fn component_count(&self) -> usize {
        self.components
    }

    /// Coefficients per component; the polynomial degree is one less.
    pub fn coefficient_count(&self) -> usize {
        self.n_coeff
    }

    /// Coefficients of `component`, copied into a fixed-capacity buffer.
    ///
    /// An out-of-range component yields an empty buffer.
    pub fn coefficients(&self, component: usize) -> CoefficientBuffer {
        if component >= self.components {
            return CoefficientBuffer::new();
        }
        self.words
            .slice(2 + component * self.n_coeff, self.n_coeff)
            .map(|w| w.iter().collect())
            .unwrap_or_default()
    }

    fn eval_components(&self, first: usize, s: f64) -> Vector3<f64> {
        Vector3::from_fn(|axis, _| evaluate(&self.coefficients(first + axis), s))
    }

    /// Interpolated position (km) at `et`.
    pub fn position(&self, et: f64) -> Vector3<f64> {
        self.eval_components(0, normalize_time(et, self.start, self.end))
    }

    /// Interpolated position (km) and velocity (km/s) at `et`.
    ///
    /// Position-only records differentiate the position series; records
    /// carrying six components evaluate the velocity series directly.
    pub fn state(&self, et: f64) -> (Vector3<f64>, Vector3<f64>) {
        let s = normalize_time(et, self.start, self.end);
        let position = self.eval_components(0, s);
        let velocity = if self.components >= 6 {
            self.eval_components(3, s)
        } else {
            let rate = 2.0 / (self.end - self.start);
            Vector3::from_fn(|axis, _| evaluate_derivative(&self.coefficients(axis), s) * rate)
        };
        (position, velocity)
    }
}

impl fmt::Display for EphemerisRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mid_str = Epoch::from_et_seconds(self.mid()).to_string();
        let radius_str = Duration::from_seconds(self.radius()).to_string();

        let label_width = 16;
        let value_width = mid_str.len().max(radius_str.len()).max(55);

        let border = format!(
            "+{:-<label$}+{:-<value$}+",
            "",
            "",
            label = label_width + 2,
            value = value_width + 2
        );
        let row = |f: &mut fmt::Formatter<'_>, label: &str, value: &str| {
            writeln!(
                f,
                "| {:<label$} | {:<value$} |",
                label,
                value,
                label = label_width,
                value = value_width
            )
        };

        writeln!(
            f,
            "+{:^label$}+{:^value$}+",
            "Ephemeris Record",
            "",
            label = label_width + 2,
            value = value_width + 2
        )?;
        writeln!(f, "{border}")?;
        row(f, "Midpoint", &mid_str)?;
        row(f, "Radius", &radius_str)?;
        writeln!(f, "{border}")?;
        row(f, "Axis", "Chebyshev Coefficients")?;
        writeln!(f, "{border}")?;

        for (component, axis) in AXIS_LABELS.iter().take(self.components).enumerate() {
            row(f, axis, "")?;
            for chunk in self.coefficients(component).chunks(4) {
                let line = chunk
                    .iter()
                    .map(|c| format!("{c:>12.4e}"))
                    .collect::<Vec<_>>()
                    .join(" ");
                row(f, "", &line)?;
            }
            writeln!(f, "{border}")?;
        }

        Ok(())
    }
}
