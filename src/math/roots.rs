//! Scalar root finding for equilibrium equations
//!
//! Equilibrium states (neutral axis depth, strain offset, initial curvature)
//! have no closed-form inverse once geometry splitting and nonlinear material
//! response are involved, so they are located numerically: `brent` for
//! bracketed solves, `secant` for open ones.

use crate::error::{SectionError, SectionResult};

/// Tolerances and iteration limit for a root solve
#[derive(Debug, Clone, Copy)]
pub struct RootConfig {
    /// Absolute tolerance on the root
    pub xtol: f64,
    /// Relative tolerance on the root
    pub rtol: f64,
    /// Maximum number of iterations
    pub max_iter: usize,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            xtol: 1e-9,
            rtol: 1e-9,
            max_iter: 100,
        }
    }
}

impl RootConfig {
    /// Create a config with explicit tolerances
    pub fn new(xtol: f64, rtol: f64) -> Self {
        Self {
            xtol,
            rtol,
            ..Self::default()
        }
    }
}

/// Find a root of `f` in the bracket `[a, b]` using the Brent-Dekker method.
///
/// Fails with [`SectionError::Bracket`] when `f(a)` and `f(b)` do not
/// straddle zero, and with [`SectionError::Convergence`] when the iteration
/// limit is exhausted. Errors from `f` itself propagate unchanged.
pub fn brent<F>(mut f: F, a: f64, b: f64, config: &RootConfig) -> SectionResult<f64>
where
    F: FnMut(f64) -> SectionResult<f64>,
{
    let mut a = a;
    let mut b = b;
    let mut fa = f(a)?;
    let mut fb = f(b)?;

    if fa == 0.0 {
        return Ok(a);
    }
    if fb == 0.0 {
        return Ok(b);
    }
    if fa * fb > 0.0 {
        return Err(SectionError::Bracket { a, b, fa, fb });
    }

    if fa.abs() < fb.abs() {
        std::mem::swap(&mut a, &mut b);
        std::mem::swap(&mut fa, &mut fb);
    }

    let mut c = a;
    let mut fc = fa;
    let mut d = b - a;
    let mut bisected = true;

    for iteration in 0..config.max_iter {
        let tol = config.xtol + config.rtol * b.abs();

        if fb == 0.0 || (b - a).abs() < tol {
            log::debug!("brent converged after {iteration} iterations, root = {b}");
            return Ok(b);
        }

        let mut s = if fa != fc && fb != fc {
            // inverse quadratic interpolation
            a * fb * fc / ((fa - fb) * (fa - fc))
                + b * fa * fc / ((fb - fa) * (fb - fc))
                + c * fa * fb / ((fc - fa) * (fc - fb))
        } else {
            // secant step
            b - fb * (b - a) / (fb - fa)
        };

        let midpoint = (a + b) / 2.0;
        let step_ok = (s - b) * (s - midpoint) < 0.0;
        let step_small = if bisected {
            (s - b).abs() < (b - c).abs() / 2.0
        } else {
            (s - b).abs() < d.abs() / 2.0
        };

        if !step_ok || !step_small {
            s = midpoint;
            bisected = true;
        } else {
            bisected = false;
        }

        let fs = f(s)?;
        d = c - b;
        c = b;
        fc = fb;

        if fa * fs < 0.0 {
            b = s;
            fb = fs;
        } else {
            a = s;
            fa = fs;
        }

        if fa.abs() < fb.abs() {
            std::mem::swap(&mut a, &mut b);
            std::mem::swap(&mut fa, &mut fb);
        }
    }

    Err(SectionError::Convergence {
        iterations: config.max_iter,
    })
}

/// Find a root of `f` with the secant method starting from `x0` and `x1`.
///
/// Used for open (unbracketed) solves such as locating the initial curvature
/// of a prestressed section.
pub fn secant<F>(mut f: F, x0: f64, x1: f64, config: &RootConfig) -> SectionResult<f64>
where
    F: FnMut(f64) -> SectionResult<f64>,
{
    let mut x0 = x0;
    let mut x1 = x1;
    let mut f0 = f(x0)?;
    let mut f1 = f(x1)?;

    if f0 == 0.0 {
        return Ok(x0);
    }

    for iteration in 0..config.max_iter {
        if f1 == 0.0 {
            return Ok(x1);
        }
        if f1 == f0 {
            // flat secant, cannot make progress
            return Err(SectionError::Convergence {
                iterations: iteration,
            });
        }

        let x2 = x1 - f1 * (x1 - x0) / (f1 - f0);
        if (x2 - x1).abs() < config.xtol + config.rtol * x2.abs() {
            log::debug!("secant converged after {iteration} iterations, root = {x2}");
            return Ok(x2);
        }

        x0 = x1;
        f0 = f1;
        x1 = x2;
        f1 = f(x1)?;
    }

    Err(SectionError::Convergence {
        iterations: config.max_iter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_brent_simple_cubic() {
        let root = brent(
            |x| Ok(x * x * x - 2.0 * x - 5.0),
            1.0,
            3.0,
            &RootConfig::default(),
        )
        .unwrap();
        assert_relative_eq!(root, 2.0945514815423265, epsilon = 1e-7);
    }

    #[test]
    fn test_brent_no_bracket() {
        let result = brent(|x| Ok(x * x + 1.0), -1.0, 1.0, &RootConfig::default());
        assert!(matches!(result, Err(SectionError::Bracket { .. })));
    }

    #[test]
    fn test_brent_propagates_eval_error() {
        let result = brent(
            |_| Err(SectionError::InvalidInput("bad".into())),
            -1.0,
            1.0,
            &RootConfig::default(),
        );
        assert!(matches!(result, Err(SectionError::InvalidInput(_))));
    }

    #[test]
    fn test_secant_linear() {
        let root = secant(|x| Ok(3.0 * x - 6.0), 0.0, 1.0, &RootConfig::default()).unwrap();
        assert_relative_eq!(root, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_secant_transcendental() {
        let root = secant(|x: f64| Ok(x.cos() - x), 0.0, 1.0, &RootConfig::default()).unwrap();
        assert_relative_eq!(root, 0.7390851332151607, epsilon = 1e-7);
    }
}
