use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ensemble::Clock;
use crate::error::{Error, Result};
use crate::integrator::Scheme;
use crate::kernel::{ForceKernel, SOFTENING_SQ};
use crate::parallel::Execution;
use crate::scenario::Scenario;
use crate::simulation::Simulation;
use crate::snapshot::DerivedField;
use crate::vector::Real;

/// Run configuration, loadable from YAML.
///
/// Every field has a default, so a file only needs the values it changes:
///
/// ```yaml
/// bodies: 4096
/// timestep: 0.1
/// end_time: 100.0
/// integrator: verlet4     # euler | verlet3 | verlet4
/// execution: parallel     # serial | parallel
/// softening_sq: 1.0e-5
/// snapshot_interval: 20
/// field: momentum         # momentum | velocity
/// scenario: colliding_galaxies  # colliding_galaxies | uniform_disc | concentric_rings | sphere
/// seed: 42
/// output_dir: snapshots
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of bodies the scenario generates.
    pub bodies: usize,
    /// Fixed integration step.
    pub timestep: f64,
    /// Stop once elapsed time exceeds this.
    pub end_time: f64,
    pub integrator: Scheme,
    pub execution: Execution,
    /// Softening length squared (ε²).
    pub softening_sq: f64,
    /// Steps between snapshots.
    pub snapshot_interval: usize,
    /// Scalar written next to each position.
    pub field: DerivedField,
    pub scenario: Scenario,
    /// Seed for the scenario generator.
    pub seed: u64,
    /// Directory snapshots are written to.
    pub output_dir: PathBuf,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            bodies: 32768,
            timestep: 0.1,
            end_time: 1000.0,
            integrator: Scheme::default(),
            execution: Execution::default(),
            softening_sq: SOFTENING_SQ,
            snapshot_interval: Simulation::<f32>::DEFAULT_SNAPSHOT_INTERVAL,
            field: DerivedField::default(),
            scenario: Scenario::default(),
            seed: 0,
            output_dir: PathBuf::from("snapshots"),
        }
    }
}

impl SimulationConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_yaml_str(&fs::read_to_string(path)?)
    }

    /// Rejects configurations no run could start from.
    pub fn validate(&self) -> Result<()> {
        if self.bodies == 0 {
            return Err(Error::Empty);
        }
        self.clock().validate()?;
        if !(self.softening_sq.is_finite() && self.softening_sq > 0.0) {
            return Err(Error::InvalidSoftening(self.softening_sq));
        }
        if self.snapshot_interval == 0 {
            return Err(Error::ZeroSnapshotInterval);
        }
        Ok(())
    }

    pub fn clock(&self) -> Clock {
        Clock::new(self.timestep, self.end_time)
    }

    pub fn kernel<T: Real>(&self) -> ForceKernel<T> {
        ForceKernel::new(T::from_f64(self.softening_sq), self.execution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = SimulationConfig::from_yaml_str(
            "bodies: 128\nintegrator: verlet3\nexecution: serial\nfield: velocity\nscenario: uniform_disc\n",
        )
        .unwrap();

        assert_eq!(config.bodies, 128);
        assert_eq!(config.integrator, Scheme::Verlet3);
        assert_eq!(config.execution, Execution::Serial);
        assert_eq!(config.field, DerivedField::Velocity);
        assert_eq!(config.scenario, Scenario::UniformDisc);
        assert_eq!(config.timestep, 0.1);
        assert_eq!(config.snapshot_interval, 20);
        assert_eq!(config.softening_sq, 1e-5);

        let config = SimulationConfig::from_yaml_str("scenario: sphere").unwrap();
        assert_eq!(config.scenario, Scenario::Sphere);
    }

    #[test]
    fn invalid_values_fail_fast() {
        assert!(matches!(
            SimulationConfig::from_yaml_str("bodies: 0"),
            Err(Error::Empty)
        ));
        assert!(matches!(
            SimulationConfig::from_yaml_str("timestep: -0.1"),
            Err(Error::InvalidTimestep(_))
        ));
        assert!(matches!(
            SimulationConfig::from_yaml_str("end_time: -1.0"),
            Err(Error::InvalidEndTime(_))
        ));
        assert!(matches!(
            SimulationConfig::from_yaml_str("snapshot_interval: 0"),
            Err(Error::ZeroSnapshotInterval)
        ));
        assert!(matches!(
            SimulationConfig::from_yaml_str("integrator: leapfrog"),
            Err(Error::Yaml(_))
        ));
        assert!(matches!(
            SimulationConfig::from_yaml_str("theta: 0.5"),
            Err(Error::Yaml(_))
        ));
    }
}
