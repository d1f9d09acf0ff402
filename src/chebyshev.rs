//! # Chebyshev series evaluation
//!
//! Every record of a type 2/3 SPK series stores, per Cartesian component, the
//! coefficients `c_0 .. c_n` of a Chebyshev expansion over the record interval
//! `[start, end]`. With the normalized time
//!
//! ```text
//! s = 2 (t - start) / (end - start) - 1      s ∈ [-1, 1]
//! ```
//!
//! the component value is `Σ c_i T_i(s)`, where the polynomials of the first
//! kind follow `T_0 = 1`, `T_1 = s`, `T_n = 2 s T_(n-1) - T_(n-2)`.
//!
//! The time derivative uses `d T_i / ds = i U_(i-1)(s)` with the polynomials of
//! the second kind `U_0 = 1`, `U_1 = 2 s`, `U_n = 2 s U_(n-1) - U_(n-2)`, and
//! the chain-rule factor `ds / dt = 2 / (end - start)`.
//!
//! Both recurrences run in constant memory: a call never allocates.
//!
//! ## See also
//! ------------
//! * [`crate::spk::EphemerisRecord`] – Feeds record coefficients to these routines.
//! * [`CoefficientBuffer`] – Fixed-capacity buffer used to gather coefficients.

use smallvec::SmallVec;

/// Working buffer for the coefficients of one component.
///
/// JPL planetary series use at most 15 coefficients per component; the buffer
/// only spills to the heap for unusual series longer than 32 terms.
pub type CoefficientBuffer = SmallVec<[f64; 32]>;

/// Map `t` in `[start, end]` onto `s` in `[-1, 1]`.
#[inline]
pub fn normalize_time(t: f64, start: f64, end: f64) -> f64 {
    2.0 * (t - start) / (end - start) - 1.0
}

/// `Σ c_i T_i(s)`.
///
/// An empty coefficient slice evaluates to 0.
pub fn evaluate(coefficients: &[f64], s: f64) -> f64 {
    match coefficients {
        [] => 0.0,
        [c0] => *c0,
        [c0, c1, rest @ ..] => {
            let (mut t_prev, mut t_curr) = (1.0, s);
            let mut sum = c0 + c1 * s;
            for c in rest {
                let t_next = 2.0 * s * t_curr - t_prev;
                sum += c * t_next;
                t_prev = t_curr;
                t_curr = t_next;
            }
            sum
        }
    }
}

/// `Σ c_i i U_(i-1)(s)`, the derivative of [`evaluate`] with respect to `s`.
pub fn evaluate_derivative(coefficients: &[f64], s: f64) -> f64 {
    if coefficients.len() < 2 {
        return 0.0;
    }
    let (mut u_prev, mut u_curr) = (1.0, 2.0 * s);
    let mut sum = coefficients[1];
    for (i, c) in coefficients.iter().enumerate().skip(2) {
        sum += c * i as f64 * u_curr;
        let u_next = 2.0 * s * u_curr - u_prev;
        u_prev = u_curr;
        u_curr = u_next;
    }
    sum
}

/// Value and time derivative of a series over the record `[start, end]`.
///
/// Arguments
/// -----------------
/// * `coefficients`: Chebyshev coefficients of one component.
/// * `t`: Evaluation time, inside `[start, end]`.
/// * `start`, `end`: Record bounds, in the same unit as `t`.
///
/// Return
/// ----------
/// * `(value, d value / dt)`.
pub fn evaluate_with_rate(coefficients: &[f64], t: f64, start: f64, end: f64) -> (f64, f64) {
    let s = normalize_time(t, start, end);
    let rate = evaluate_derivative(coefficients, s) * 2.0 / (end - start);
    (evaluate(coefficients, s), rate)
}

/// Chebyshev coefficients interpolating `f` on `[-1, 1]`.
///
/// Samples `f` at the `n_coeff` Chebyshev nodes `cos(π (k + ½) / n)` and
/// returns the coefficients of the unique polynomial of degree `n_coeff - 1`
/// through them. Used to build kernels from analytic motions.
pub fn fit<F: Fn(f64) -> f64>(f: F, n_coeff: usize) -> Vec<f64> {
    let n = n_coeff as f64;
    let nodes: Vec<(f64, f64)> = (0..n_coeff)
        .map(|k| {
            let angle = std::f64::consts::PI * (k as f64 + 0.5) / n;
            (angle, f(angle.cos()))
        })
        .collect();

    (0..n_coeff)
        .map(|j| {
            let sum: f64 = nodes
                .iter()
                .map(|(angle, value)| value * (j as f64 * angle).cos())
                .sum();
            if j == 0 {
                sum / n
            } else {
                2.0 * sum / n
            }
        })
        .collect()
}
