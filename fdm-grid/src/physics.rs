//! Physics callbacks consumed by the assemblers
//!
//! Each callback is a trait with a single method and a blanket implementation
//! for closures of the matching signature, so problems can be described
//! either with plain closures or with dedicated types.
//!
//! All callbacks are expected to be pure functions of their arguments.

/// Forcing term of a steady problem, `f(x, y)`
pub trait SourceTerm {
    /// Evaluate the source at a grid point
    fn source(&self, x: f64, y: f64) -> f64;
}

impl<F> SourceTerm for F
where
    F: Fn(f64, f64) -> f64,
{
    fn source(&self, x: f64, y: f64) -> f64 {
        self(x, y)
    }
}

/// Forcing term of a time-dependent problem, `f(x, y, t, hx, hy)`
///
/// The spacings are passed so that manufactured sources can account for
/// discretization-dependent corrections.
pub trait TimeSourceTerm {
    /// Evaluate the source at a grid point and time
    fn source(&self, x: f64, y: f64, t: f64, hx: f64, hy: f64) -> f64;
}

impl<F> TimeSourceTerm for F
where
    F: Fn(f64, f64, f64, f64, f64) -> f64,
{
    fn source(&self, x: f64, y: f64, t: f64, hx: f64, hy: f64) -> f64 {
        self(x, y, t, hx, hy)
    }
}

/// Dirichlet value or Neumann flux at a classified boundary point
pub trait BoundaryValue {
    /// Evaluate the boundary condition; `code` is the point's region code (>= 2)
    fn value(&self, x: f64, y: f64, code: u32) -> f64;
}

impl<F> BoundaryValue for F
where
    F: Fn(f64, f64, u32) -> f64,
{
    fn value(&self, x: f64, y: f64, code: u32) -> f64 {
        self(x, y, code)
    }
}

/// Time-dependent boundary value, `g(x, y, t, code)`
pub trait TimeBoundaryValue {
    /// Evaluate the boundary condition at time `t`
    fn value(&self, x: f64, y: f64, t: f64, code: u32) -> f64;
}

impl<F> TimeBoundaryValue for F
where
    F: Fn(f64, f64, f64, u32) -> f64,
{
    fn value(&self, x: f64, y: f64, t: f64, code: u32) -> f64 {
        self(x, y, t, code)
    }
}

/// Outward normal direction of a boundary segment, in radians
pub trait NormalAngle {
    /// Angle of the outward normal for boundary `code`
    fn angle(&self, code: u32) -> f64;
}

impl<F> NormalAngle for F
where
    F: Fn(u32) -> f64,
{
    fn angle(&self, code: u32) -> f64 {
        self(code)
    }
}

/// Value pinned at an anchor point of an otherwise singular Neumann problem
pub trait AnchorValue {
    /// Value of the solution at `(x, y)`
    fn anchor(&self, x: f64, y: f64) -> f64;
}

impl<F> AnchorValue for F
where
    F: Fn(f64, f64) -> f64,
{
    fn anchor(&self, x: f64, y: f64) -> f64 {
        self(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    struct Quadrants;

    impl NormalAngle for Quadrants {
        fn angle(&self, code: u32) -> f64 {
            f64::from(code) * PI / 2.0
        }
    }

    fn eval_source(f: &impl SourceTerm) -> f64 {
        f.source(1.0, 2.0)
    }

    #[test]
    fn test_closures_are_callbacks() {
        assert_eq!(eval_source(&|x: f64, y: f64| x * y), 2.0);

        let g = |x: f64, _y: f64, t: f64, code: u32| x + t + f64::from(code);
        assert_eq!(TimeBoundaryValue::value(&g, 1.0, 0.0, 0.5, 2), 3.5);

        let normal = |code: u32| if code == 2 { PI } else { 0.0 };
        assert_eq!(normal.angle(2), PI);
    }

    #[test]
    fn test_named_callback_type() {
        assert_eq!(Quadrants.angle(2), PI);
    }
}
