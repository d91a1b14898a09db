//! Closed-form solution of the two-site exchange problem.
//!
//! Transverse magnetization exchanging between sites A and B evolves as
//! `m' = L m` with
//!
//! ```text
//! L = [ -kab        kba            ]
//!     [  kab   -kba + i·Δω        ]
//! ```
//!
//! where `kab = kex_ab·pb`, `kba = kex_ab·(1 - pb)`, site A sits at zero
//! frequency and site B is offset by `Δω` (rad/s). Relaxation is omitted:
//! the observable here is a frequency difference, not a linewidth.
//!
//! The detected line is the slowly relaxing eigenvector of `L`; the
//! imaginary part of its eigenvalue is the exchange-perturbed position, the
//! negated real part the exchange contribution to its decay.
//!
//! Limits:
//! - `pb = 0`: the observed eigenvalue is exactly 0, so there is no shift.
//! - fast exchange (`kex_ab ≫ |Δω|`): shift → `pb·Δω`, the
//!   population-weighted average position.
//! - slow exchange (`kex_ab → 0`, `pb < 1/2`): shift → 0, the major-state
//!   position.

use nalgebra::Complex;

/// Position and decay rate of the slowly relaxing component of two-site
/// exchange.
///
/// `pb` is the minor-state population in `[0, 1)`, `kex_ab` the total
/// exchange rate in /s, `domega` the B−A shift difference in rad/s.
/// Returns `(shift, r2_ex)`, both in rad/s resp. /s.
pub fn shift_ex_2st(pb: f64, kex_ab: f64, domega: f64) -> (f64, f64) {
    let kab = kex_ab * pb;
    let kba = kex_ab - kab;

    // Without a minor state (or without an offset) the observed eigenvalue
    // is exactly 0. Return the analytic value instead of round-tripping it
    // through the polar form of the complex square root.
    if kab == 0.0 || domega == 0.0 {
        return (0.0, 0.0);
    }

    // Eigenvalues of L via the quadratic formula. The trace carries the
    // total exchange rate and the offset; the determinant reduces to
    // -i·kab·Δω because the kab·kba terms cancel.
    let trace = Complex::new(-(kab + kba), domega);
    let det = Complex::new(0.0, -kab * domega);

    let disc = (trace * trace - 4.0 * det).sqrt();
    let l1 = 0.5 * (trace + disc);
    let l2 = 0.5 * (trace - disc);

    // The slowly relaxing component decays least: larger real part.
    let slow = if l1.re >= l2.re { l1 } else { l2 };

    (slow.im, -slow.re)
}

/// Single-quantum and multiple-quantum observed positions for an I–S pair.
///
/// The SQ coherence of nucleus I evolves at `Δω_i`; the MQ observable is the
/// mean of the two single-coherence evaluations at `Δω_i + Δω_s` and
/// `Δω_i − Δω_s`.
pub fn shift_sq_mq_2st(pb: f64, kex_ab: f64, domega_i: f64, domega_s: f64) -> (f64, f64) {
    let sq = shift_ex_2st(pb, kex_ab, domega_i).0;
    let mq = 0.5
        * (shift_ex_2st(pb, kex_ab, domega_i + domega_s).0
            + shift_ex_2st(pb, kex_ab, domega_i - domega_s).0);
    (sq, mq)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_minor_state_means_no_shift() {
        for &domega in &[-500.0, -1.0, 0.0, 1.0, 500.0] {
            let (shift, r2) = shift_ex_2st(0.0, 200.0, domega);
            assert_eq!(shift, 0.0, "domega={domega}");
            assert_eq!(r2, 0.0, "domega={domega}");
        }
    }

    #[test]
    fn zero_offset_means_no_shift() {
        let (shift, r2) = shift_ex_2st(0.05, 200.0, 0.0);
        assert_eq!(shift, 0.0);
        assert!(r2.abs() < 1e-12);
    }

    #[test]
    fn fast_exchange_approaches_population_average() {
        let pb = 0.05;
        let domega = 100.0;
        let (shift, _) = shift_ex_2st(pb, 1.0e7, domega);
        let average = pb * domega;
        assert!(
            (shift - average).abs() / average < 1e-6,
            "shift={shift}, average={average}"
        );
    }

    #[test]
    fn slow_exchange_approaches_major_state_position() {
        let (shift, _) = shift_ex_2st(0.05, 1.0e-3, 100.0);
        assert!(shift.abs() < 1e-4, "shift={shift}");
    }

    #[test]
    fn shift_grows_with_population_in_fast_exchange() {
        let domega = 200.0;
        let small = shift_ex_2st(0.01, 5.0e4, domega).0;
        let large = shift_ex_2st(0.10, 5.0e4, domega).0;
        assert!(large > small);
        assert!(small > 0.0);
    }

    #[test]
    fn shift_sign_follows_offset_sign() {
        let plus = shift_ex_2st(0.05, 1.0e5, 100.0).0;
        let minus = shift_ex_2st(0.05, 1.0e5, -100.0).0;
        assert!(plus > 0.0);
        assert!(minus < 0.0);
        assert!((plus + minus).abs() < 1e-9);
    }

    #[test]
    fn exchange_broadening_is_positive_between_limits() {
        // Intermediate exchange must broaden the observed line.
        let (_, r2) = shift_ex_2st(0.05, 500.0, 500.0);
        assert!(r2 > 0.0);
    }

    #[test]
    fn mq_equals_sq_when_coupled_offset_vanishes() {
        let (sq, mq) = shift_sq_mq_2st(0.05, 200.0, 300.0, 0.0);
        assert_eq!(sq, mq);
    }

    #[test]
    fn mq_is_mean_of_sum_and_difference_evaluations() {
        let (pb, kex, di, ds) = (0.03, 400.0, 250.0, 80.0);
        let (_, mq) = shift_sq_mq_2st(pb, kex, di, ds);
        let expected = 0.5
            * (shift_ex_2st(pb, kex, di + ds).0 + shift_ex_2st(pb, kex, di - ds).0);
        assert_eq!(mq, expected);
    }
}
