use crate::body::Body;
use crate::error::{Error, Result};
use crate::kernel::ForceKernel;
use crate::parallel::Execution;
use crate::vector::{Real, zero};

/// Fixed step size and stopping threshold of a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Clock {
    /// Time step per integration step (Δt).
    pub timestep: f64,
    /// The run stops once elapsed time exceeds this.
    pub end_time: f64,
}

impl Clock {
    pub fn new(timestep: f64, end_time: f64) -> Self {
        Self { timestep, end_time }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.timestep.is_finite() && self.timestep > 0.0) {
            return Err(Error::InvalidTimestep(self.timestep));
        }
        if !(self.end_time.is_finite() && self.end_time >= 0.0) {
            return Err(Error::InvalidEndTime(self.end_time));
        }
        Ok(())
    }
}

/// The particle state of a run, stored as parallel sequences indexed by body.
///
/// The four sequences always have the same length, fixed at construction.
/// Index `i` is the only identity a body has; it stays stable for the whole
/// life of the ensemble. Masses never change.
#[derive(Clone, Debug)]
pub struct Ensemble<T: Real = f32> {
    pub(crate) position: Vec<T::Vec3>,
    pub(crate) velocity: Vec<T::Vec3>,
    pub(crate) acceleration: Vec<T::Vec3>,
    pub(crate) mass: Vec<T>,
    // Second acceleration buffer for schemes that need old and new values.
    pub(crate) scratch: Vec<T::Vec3>,
    pub(crate) kernel: ForceKernel<T>,
    clock: Clock,
    elapsed_time: f64,
}

impl<T: Real> Ensemble<T> {
    /// Builds an ensemble from parallel sequences. Acceleration starts at zero.
    pub fn new(position: Vec<T::Vec3>, velocity: Vec<T::Vec3>, mass: Vec<T>, clock: Clock) -> Result<Self> {
        let n = position.len();
        if n == 0 {
            return Err(Error::Empty);
        }
        if velocity.len() != n {
            return Err(Error::LengthMismatch {
                field: "velocity",
                expected: n,
                found: velocity.len(),
            });
        }
        if mass.len() != n {
            return Err(Error::LengthMismatch {
                field: "mass",
                expected: n,
                found: mass.len(),
            });
        }
        if let Some((index, &m)) = mass
            .iter()
            .enumerate()
            .find(|(_, m)| !(m.is_finite() && **m > T::ZERO))
        {
            return Err(Error::InvalidMass {
                index,
                mass: m.to_f64(),
            });
        }
        clock.validate()?;

        Ok(Self {
            position,
            velocity,
            acceleration: vec![zero::<T>(); n],
            mass,
            scratch: vec![zero::<T>(); n],
            kernel: ForceKernel::default(),
            clock,
            elapsed_time: 0.0,
        })
    }

    /// Builds an ensemble from arrays-of-structs initial conditions.
    pub fn from_bodies(bodies: &[Body<T>], clock: Clock) -> Result<Self> {
        let position = bodies.iter().map(|b| b.pos).collect();
        let velocity = bodies.iter().map(|b| b.vel).collect();
        let mass = bodies.iter().map(|b| b.mass).collect();
        Self::new(position, velocity, mass, clock)
    }

    /// Replaces the force kernel (softening and execution strategy).
    pub fn with_kernel(mut self, kernel: ForceKernel<T>) -> Result<Self> {
        let eps_sq = kernel.softening_sq;
        if !(eps_sq.is_finite() && eps_sq > T::ZERO) {
            return Err(Error::InvalidSoftening(eps_sq.to_f64()));
        }
        self.kernel = kernel;
        Ok(self)
    }

    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.kernel.execution = execution;
        self
    }

    /// Number of bodies.
    pub fn len(&self) -> usize {
        self.position.len()
    }

    /// Always false for a constructed ensemble.
    pub fn is_empty(&self) -> bool {
        self.position.is_empty()
    }

    pub fn position(&self) -> &[T::Vec3] {
        &self.position
    }

    pub fn velocity(&self) -> &[T::Vec3] {
        &self.velocity
    }

    pub fn acceleration(&self) -> &[T::Vec3] {
        &self.acceleration
    }

    pub fn mass(&self) -> &[T] {
        &self.mass
    }

    pub fn kernel(&self) -> &ForceKernel<T> {
        &self.kernel
    }

    pub fn execution(&self) -> Execution {
        self.kernel.execution
    }

    /// Snapshot of body `i` in arrays-of-structs form.
    pub fn body(&self, i: usize) -> Body<T> {
        Body::new(self.position[i], self.velocity[i], self.mass[i])
    }

    pub fn clock(&self) -> Clock {
        self.clock
    }

    pub fn timestep(&self) -> f64 {
        self.clock.timestep
    }

    pub fn end_time(&self) -> f64 {
        self.clock.end_time
    }

    pub fn elapsed_time(&self) -> f64 {
        self.elapsed_time
    }

    /// The step size in the ensemble's precision.
    pub fn dt(&self) -> T {
        T::from_f64(self.clock.timestep)
    }

    /// True once elapsed time has passed the end time.
    pub fn is_finished(&self) -> bool {
        self.elapsed_time > self.clock.end_time
    }

    /// Moves the simulation clock forward by one timestep.
    pub fn advance_clock(&mut self) {
        self.elapsed_time += self.clock.timestep;
    }
}
