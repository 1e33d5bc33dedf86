pub mod body;
pub mod c_api;
pub mod config;
pub mod diagnostics;
pub mod ensemble;
pub mod error;
pub mod integrator;
pub mod kernel;
pub mod parallel;
pub mod scenario;
pub mod simulation;
pub mod snapshot;
pub mod vector;

pub use body::Body;
pub use config::SimulationConfig;
pub use ensemble::{Clock, Ensemble};
pub use error::{Error, Result};
pub use integrator::{Euler, Integrator, Scheme, VelocityVerlet3, VelocityVerlet4, prime};
pub use kernel::{ForceKernel, SOFTENING_SQ, accumulate_forces, pairwise_acceleration};
pub use parallel::Execution;
pub use scenario::Scenario;
pub use simulation::{RunSummary, Simulation};
pub use snapshot::{DerivedField, Snapshot, SnapshotSink, TextSink};
pub use vector::Real;
