//! JSON configuration for grid problems
//!
//! ```json
//! {
//!   "grid": { "nx": 21, "ny": 21, "x0": 0.0, "x1": 1.0, "y0": 0.0, "y1": 1.0 },
//!   "solver": { "method": "conjugate_gradient", "tolerance": 1e-10 },
//!   "time": { "tau": 0.005, "t_end": 0.1 }
//! }
//! ```
//!
//! Missing `solver` fields take their defaults and `time` may be omitted for
//! steady problems.

use crate::error::{GridError, Result};
use crate::grid::{Bounds, RegionDivider, StructuredGrid};
use serde::{Deserialize, Serialize};
use solvers::{IterativeConfig, SolverMethod};
use std::fs;
use std::path::Path;

/// Complete problem configuration loaded from JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemConfig {
    /// Grid resolution and domain
    pub grid: GridConfig,
    /// Linear solver settings
    #[serde(default)]
    pub solver: SolverSettings,
    /// Time stepping, absent for steady problems
    #[serde(default)]
    pub time: Option<TimeConfig>,
}

/// Grid resolution and rectangular domain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Points along x
    pub nx: usize,
    /// Points along y
    pub ny: usize,
    /// Lower x bound
    #[serde(default)]
    pub x0: f64,
    /// Upper x bound
    #[serde(default = "default_upper")]
    pub x1: f64,
    /// Lower y bound
    #[serde(default)]
    pub y0: f64,
    /// Upper y bound
    #[serde(default = "default_upper")]
    pub y1: f64,
}

fn default_upper() -> f64 {
    1.0
}

impl GridConfig {
    /// Domain bounds
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x0, self.x1, self.y0, self.y1)
    }

    /// Build a grid classified by `divider`
    pub fn build(&self, divider: impl RegionDivider) -> Result<StructuredGrid> {
        StructuredGrid::build(self.nx, self.ny, self.bounds(), divider)
    }

    /// Build a rectangle grid with every edge point on boundary segment 2
    pub fn uniform(&self) -> Result<StructuredGrid> {
        StructuredGrid::uniform(self.nx, self.ny, self.bounds())
    }
}

/// Iterative solver selection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverSettings {
    /// Iterative method
    #[serde(default)]
    pub method: SolverMethod,
    /// Maximum number of iterations
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Convergence tolerance
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Log progress every N iterations (0 = no output)
    #[serde(default)]
    pub print_interval: usize,
}

fn default_max_iterations() -> usize {
    1000
}

fn default_tolerance() -> f64 {
    1e-6
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            method: SolverMethod::default(),
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
            print_interval: 0,
        }
    }
}

impl SolverSettings {
    /// Iteration limits in the form the solvers take
    pub fn iterative_config(&self) -> IterativeConfig<f64> {
        IterativeConfig {
            max_iterations: self.max_iterations,
            tolerance: self.tolerance,
            print_interval: self.print_interval,
        }
    }
}

impl From<SolverSettings> for IterativeConfig<f64> {
    fn from(settings: SolverSettings) -> Self {
        settings.iterative_config()
    }
}

/// Time-stepping parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeConfig {
    /// Step size
    pub tau: f64,
    /// Final time, starting from `t = 0`
    pub t_end: f64,
}

impl TimeConfig {
    /// Number of whole steps of size `tau` that fit in `[0, t_end]`
    ///
    /// A relative slack of `1e-9` absorbs rounding in `t_end / tau`.
    pub fn steps(&self) -> usize {
        let ratio = self.t_end / self.tau;
        (ratio * (1.0 + 1e-9)).floor().max(0.0) as usize
    }
}

impl ProblemConfig {
    /// Parse and validate a configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ProblemConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check grid geometry, solver limits and time step
    pub fn validate(&self) -> Result<()> {
        if self.grid.nx < 2 || self.grid.ny < 2 {
            return Err(GridError::InvalidGridDimensions {
                nx: self.grid.nx,
                ny: self.grid.ny,
            });
        }
        self.grid.bounds().validate()?;

        if !(self.solver.tolerance.is_finite() && self.solver.tolerance > 0.0) {
            return Err(GridError::Config(format!(
                "solver tolerance must be positive, got {}",
                self.solver.tolerance
            )));
        }
        if let Some(time) = &self.time {
            if !(time.tau.is_finite() && time.tau > 0.0) {
                return Err(GridError::Config(format!(
                    "time step must be positive, got {}",
                    time.tau
                )));
            }
            if !(time.t_end.is_finite() && time.t_end >= 0.0) {
                return Err(GridError::Config(format!(
                    "final time must be non-negative, got {}",
                    time.t_end
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = ProblemConfig::from_json_str(r#"{ "grid": { "nx": 11, "ny": 6 } }"#).unwrap();

        assert_eq!(config.grid.bounds(), Bounds::unit_square());
        assert_eq!(config.solver, SolverSettings::default());
        assert_eq!(config.solver.method, SolverMethod::GaussSeidel);
        assert!(config.time.is_none());

        let grid = config.grid.uniform().unwrap();
        assert_eq!(grid.n_active(), 66);
        assert_eq!(grid.interior_count(), 9 * 4);
    }

    #[test]
    fn test_full_config() {
        let json = r#"{
            "grid": { "nx": 21, "ny": 41, "x0": 0.0, "x1": 2.0, "y0": -2.0, "y1": 2.0 },
            "solver": {
                "method": "conjugate_gradient",
                "max_iterations": 500,
                "tolerance": 1e-10,
                "print_interval": 50
            },
            "time": { "tau": 0.005, "t_end": 0.1 }
        }"#;
        let config = ProblemConfig::from_json_str(json).unwrap();

        assert_eq!(config.solver.method, SolverMethod::ConjugateGradient);
        let iterative: IterativeConfig<f64> = config.solver.into();
        assert_eq!(iterative.max_iterations, 500);
        assert_eq!(iterative.tolerance, 1e-10);
        assert_eq!(iterative.print_interval, 50);

        assert_eq!(config.time.unwrap().steps(), 20);
        assert_eq!(config.grid.bounds(), Bounds::new(0.0, 2.0, -2.0, 2.0));
    }

    #[test]
    fn test_json_round_trip() {
        let config = ProblemConfig {
            grid: GridConfig {
                nx: 5,
                ny: 7,
                x0: -1.0,
                x1: 1.0,
                y0: 0.0,
                y1: 3.0,
            },
            solver: SolverSettings {
                method: SolverMethod::Jacobi,
                ..SolverSettings::default()
            },
            time: None,
        };
        let json = config.to_json_string().unwrap();
        assert!(json.contains("\"jacobi\""));
        assert_eq!(ProblemConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_validation_errors() {
        let err = ProblemConfig::from_json_str(r#"{ "grid": { "nx": 1, "ny": 6 } }"#).unwrap_err();
        assert!(err.is_geometry_error());

        let err =
            ProblemConfig::from_json_str(r#"{ "grid": { "nx": 4, "ny": 4, "x0": 1.0, "x1": 1.0 } }"#)
                .unwrap_err();
        assert!(matches!(err, GridError::InvalidBounds { axis: 'x', .. }));

        let err = ProblemConfig::from_json_str(
            r#"{ "grid": { "nx": 4, "ny": 4 }, "solver": { "tolerance": 0.0 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, GridError::Config(_)));

        let err = ProblemConfig::from_json_str(
            r#"{ "grid": { "nx": 4, "ny": 4 }, "time": { "tau": -0.1, "t_end": 1.0 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, GridError::Config(_)));

        let err = ProblemConfig::from_json_str(r#"{ "grid": { "nx": 4 "#).unwrap_err();
        assert!(matches!(err, GridError::Config(_)));

        let err = ProblemConfig::from_json_str(
            r#"{ "grid": { "nx": 4, "ny": 4 }, "solver": { "method": "sor" } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, GridError::Config(_)));
    }

    #[test]
    fn test_steps_absorbs_rounding() {
        let time = TimeConfig {
            tau: 0.1,
            t_end: 0.3,
        };
        assert_eq!(time.steps(), 3);

        let time = TimeConfig {
            tau: 0.25,
            t_end: 0.9,
        };
        assert_eq!(time.steps(), 3);
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!("fdm-grid-config-{}.json", std::process::id()));
        fs::write(&path, r#"{ "grid": { "nx": 3, "ny": 3 } }"#).unwrap();
        let config = ProblemConfig::from_file(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(config.grid.nx, 3);

        let err = ProblemConfig::from_file(path.with_extension("missing")).unwrap_err();
        assert!(matches!(err, GridError::Io(_)));
    }
}
