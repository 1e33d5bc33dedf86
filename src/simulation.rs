use crate::ensemble::Ensemble;
use crate::error::{Error, Result};
use crate::integrator::{Integrator, Scheme, prime};
use crate::snapshot::{DerivedField, Snapshot, SnapshotSink};
use crate::vector::Real;

/// Drives an ensemble from its initial state to the configured end time.
#[derive(Debug, Clone)]
pub struct Simulation<T: Real = f32> {
    /// The particle state being advanced.
    pub ensemble: Ensemble<T>,
    /// Integration scheme applied every step.
    pub scheme: Scheme,
    /// Integration steps taken so far.
    pub frame: usize,
    snapshot_interval: usize,
    field: DerivedField,
    // Preallocated buffer for the derived field of each snapshot.
    values: Vec<T>,
}

/// What a completed run did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub steps: usize,
    pub snapshots: usize,
    pub elapsed_time: f64,
}

impl<T: Real> Simulation<T> {
    /// Default number of steps between snapshots.
    pub const DEFAULT_SNAPSHOT_INTERVAL: usize = 20;

    /// Wraps `ensemble` and primes its acceleration so the first step starts
    /// from forces consistent with the initial positions.
    pub fn new(mut ensemble: Ensemble<T>, scheme: Scheme) -> Self {
        prime(&mut ensemble);
        let values = vec![T::ZERO; ensemble.len()];
        Self {
            ensemble,
            scheme,
            frame: 0,
            snapshot_interval: Self::DEFAULT_SNAPSHOT_INTERVAL,
            field: DerivedField::default(),
            values,
        }
    }

    pub fn with_snapshot_interval(mut self, interval: usize) -> Result<Self> {
        if interval == 0 {
            return Err(Error::ZeroSnapshotInterval);
        }
        self.snapshot_interval = interval;
        Ok(self)
    }

    pub fn with_field(mut self, field: DerivedField) -> Self {
        self.field = field;
        self
    }

    pub fn snapshot_interval(&self) -> usize {
        self.snapshot_interval
    }

    pub fn field(&self) -> DerivedField {
        self.field
    }

    pub fn is_finished(&self) -> bool {
        self.ensemble.is_finished()
    }

    /// Advances the simulation by one integration step and one timestep of
    /// simulated time.
    pub fn step(&mut self) {
        let dt = self.ensemble.dt();
        self.scheme.step(&mut self.ensemble, dt);
        self.ensemble.advance_clock();
        self.frame += 1;
    }

    /// Hands the current state to `sink` as snapshot number `index`.
    pub fn write_snapshot<S: SnapshotSink<T>>(&mut self, sink: &mut S, index: usize) -> Result<()> {
        self.field.compute_into(&self.ensemble, &mut self.values);
        let snapshot = Snapshot {
            index,
            step: self.frame,
            time: self.ensemble.elapsed_time(),
            position: self.ensemble.position(),
            field: self.field,
            values: &self.values,
        };
        sink.write(&snapshot)
    }

    /// Runs until elapsed time exceeds the end time.
    ///
    /// Snapshot 0 is written before any integration, then one snapshot every
    /// `snapshot_interval` steps.
    pub fn run<S: SnapshotSink<T>>(&mut self, sink: &mut S) -> Result<RunSummary> {
        let mut snapshots = 0;
        self.write_snapshot(sink, snapshots)?;
        snapshots += 1;

        log::info!(
            "running {} bodies with {} (dt = {}, end time = {})",
            self.ensemble.len(),
            Integrator::<T>::name(&self.scheme),
            self.ensemble.timestep(),
            self.ensemble.end_time(),
        );

        while !self.is_finished() {
            self.step();
            if self.frame % self.snapshot_interval == 0 {
                log::info!("writing snapshot {} at time {}", snapshots, self.ensemble.elapsed_time());
                self.write_snapshot(sink, snapshots)?;
                snapshots += 1;
            }
        }

        Ok(RunSummary {
            steps: self.frame,
            snapshots,
            elapsed_time: self.ensemble.elapsed_time(),
        })
    }
}
