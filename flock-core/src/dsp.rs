//! Math backend and small numeric helpers shared by the generators.
//!
//! Design goals:
//! - `no_std` ready (guarded by the crate feature `no-std` or `micromath`)
//! - Math backend selection that works in both `std` and `no_std` contexts
//! - Optional `fast-math` approximation for the oscillator hot path
//! - Pure helpers; no state, no allocation
//!
//! Conventions:
//! - Phases are in radians.
//! - NaN and infinities are passed through untouched; nothing here traps.

#![allow(clippy::excessive_precision)]

use cfg_if::cfg_if;

#[cfg(all(not(feature = "std"), not(feature = "no-std"), not(feature = "micromath")))]
compile_error!("flock-core without `std` needs a math backend: enable `no-std` (libm) or `micromath`");

// ----------------------------- Math backend selection -----------------------------

cfg_if! {
    // micromath preferred if explicitly requested (works in no_std)
    if #[cfg(feature = "micromath")] {
        #[allow(unused_imports)]
        use micromath::F32Ext as _;
        #[inline] pub(crate) fn m_sin(x: f32) -> f32 { x.sin() }
        #[inline] pub(crate) fn m_exp(x: f32) -> f32 { x.exp() }
        #[inline] pub(crate) fn m_floor(x: f32) -> f32 { x.floor() }
    // libm (C math) in no_std
    } else if #[cfg(feature = "no-std")] {
        #[inline] pub(crate) fn m_sin(x: f32) -> f32 { libm::sinf(x) }
        #[inline] pub(crate) fn m_exp(x: f32) -> f32 { libm::expf(x) }
        #[inline] pub(crate) fn m_floor(x: f32) -> f32 { libm::floorf(x) }
    // std backend
    } else {
        #[inline] pub(crate) fn m_sin(x: f32) -> f32 { x.sin() }
        #[inline] pub(crate) fn m_exp(x: f32) -> f32 { x.exp() }
        #[inline] pub(crate) fn m_floor(x: f32) -> f32 { x.floor() }
    }
}

// --------------------------------- Constants -------------------------------------

/// π
pub const PI: f32 = core::f32::consts::PI;

/// 2π, one full oscillator cycle in radians.
pub const TWO_PI: f32 = 2.0 * PI;

const INV_TWO_PI: f32 = 1.0 / TWO_PI;

// --------------------------------- Phase -----------------------------------------

/// Wrap a phase in radians into `[0, 2π)`.
///
/// Works for negative phases (backwards-running oscillators) and for phases
/// many cycles away from zero. Non-finite input yields NaN.
#[inline]
pub fn wrap_phase(x: f32) -> f32 {
    let mut r = x - TWO_PI * m_floor(x * INV_TWO_PI);
    // floor() of a rounded quotient can land one cycle off in either direction.
    if r < 0.0 {
        r += TWO_PI;
    }
    if r >= TWO_PI {
        r -= TWO_PI;
    }
    r
}

/// Sine used by the oscillator.
///
/// With `fast-math`, a 7th-order odd polynomial after range reduction into
/// [-π/2, π/2] (max abs error ~2e-4). Otherwise the exact backend `sin`.
#[inline]
pub fn sin(x: f32) -> f32 {
    cfg_if! {
        if #[cfg(feature = "fast-math")] {
            const HALF_PI: f32 = 0.5 * PI;
            let k = m_floor(x * INV_TWO_PI + 0.5);
            let mut xr = x - k * TWO_PI;
            // fold [-π, π] onto [-π/2, π/2] using sin(x) = sin(π - x)
            if xr > HALF_PI {
                xr = PI - xr;
            } else if xr < -HALF_PI {
                xr = -PI - xr;
            }
            let x2 = xr * xr;
            xr * (1.0 + x2 * (-1.0 / 6.0 + x2 * (1.0 / 120.0 + x2 * (-1.0 / 5040.0))))
        } else {
            m_sin(x)
        }
    }
}

// --------------------------------- Smoothing -------------------------------------

/// One-pole smoothing coefficient for a time constant `t_ms` (milliseconds).
///
/// The discrete one-pole form: `y[n] = y[n-1] + (x - y[n-1]) * (1 - a)`
/// where `a = exp(-1/(tau * sr))`. `t_ms` is the time to reach ~63% of a step.
///
/// `t_ms <= 0` means no smoothing and returns `0.0`.
#[inline]
pub fn one_pole_coeff_ms(t_ms: f32, sr: f32) -> f32 {
    if t_ms <= 0.0 {
        return 0.0;
    }
    let tau = t_ms * 0.001;
    m_exp(-1.0 / (tau * sr))
}

// --------------------------------- Tests (std only) ------------------------------
