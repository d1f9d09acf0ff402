//! Cartesian state returned by kernel queries.
//!
//! Units
//! -----------------
//! * `position`: kilometers (km)
//! * `velocity`: kilometers per second (km/s)
//!
//! Use [`StateVector::to_au`] to get AU and AU/day.
//!
//! Arithmetic
//! -----------------
//! `+` and `-` act component-wise on both vectors; they are how the body
//! resolver chains two series (e.g. SSB → EMB → Earth). Scalar `*` and `/`
//! scale both vectors by the same factor.
//!
//! See also
//! -----------------
//! * [`crate::kernel::Kernel::position_and_velocity`] – Main producer.
//! * [`StateRow`] – Flat row used for CSV output.

use std::ops::{Add, Div, Mul, Neg, Sub};

use nalgebra::Vector3;
use serde::Serialize;

use crate::constants::{seconds_to_jd, AU, SECONDS_PER_DAY};

/// Position and velocity of a body at one instant.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct StateVector {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

impl StateVector {
    pub fn new(position: Vector3<f64>, velocity: Vector3<f64>) -> Self {
        StateVector { position, velocity }
    }

    /// Convert to AU-based units.
    ///
    /// Return
    /// -----------------
    /// * A new state with `position` in AU and `velocity` in AU/day.
    ///
    /// See also
    /// -----------------
    /// * [`AU`] – astronomical unit used for scaling.
    #[must_use = "`.to_au()` returns a new StateVector; assign or use it"]
    pub fn to_au(&self) -> Self {
        StateVector {
            position: self.position / AU,
            velocity: self.velocity * (SECONDS_PER_DAY / AU),
        }
    }

    /// Flatten into a CSV row tagged with the TDB Julian date of `et`.
    pub fn to_row(&self, et: f64) -> StateRow {
        StateRow {
            jd_tdb: seconds_to_jd(et),
            x: self.position.x,
            y: self.position.y,
            z: self.position.z,
            vx: self.velocity.x,
            vy: self.velocity.y,
            vz: self.velocity.z,
        }
    }
}

impl From<(Vector3<f64>, Vector3<f64>)> for StateVector {
    fn from((position, velocity): (Vector3<f64>, Vector3<f64>)) -> Self {
        StateVector::new(position, velocity)
    }
}

impl Add for StateVector {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        StateVector {
            position: self.position + other.position,
            velocity: self.velocity + other.velocity,
        }
    }
}

impl Add for &StateVector {
    type Output = StateVector;

    fn add(self, other: Self) -> Self::Output {
        *self + *other
    }
}

impl Sub for StateVector {
    type Output = Self;

    /// Component-wise difference, e.g. a geocentric state from two
    /// barycentric ones.
    fn sub(self, other: Self) -> Self::Output {
        StateVector {
            position: self.position - other.position,
            velocity: self.velocity - other.velocity,
        }
    }
}

impl Sub for &StateVector {
    type Output = StateVector;

    fn sub(self, other: Self) -> Self::Output {
        *self - *other
    }
}

impl Neg for StateVector {
    type Output = Self;

    fn neg(self) -> Self::Output {
        StateVector {
            position: -self.position,
            velocity: -self.velocity,
        }
    }
}

impl Mul<f64> for StateVector {
    type Output = Self;

    fn mul(self, factor: f64) -> Self::Output {
        StateVector {
            position: self.position * factor,
            velocity: self.velocity * factor,
        }
    }
}

impl Div<f64> for StateVector {
    type Output = Self;

    fn div(self, divisor: f64) -> Self::Output {
        StateVector {
            position: self.position / divisor,
            velocity: self.velocity / divisor,
        }
    }
}

/// One line of a state table: `jd_tdb,x,y,z,vx,vy,vz`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StateRow {
    pub jd_tdb: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub vx: f64,
    pub vy: f64,
    pub vz: f64,
}
