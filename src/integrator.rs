use serde::{Deserialize, Serialize};

use crate::ensemble::Ensemble;
use crate::kernel::accumulate_forces;
use crate::vector::Real;

/// Advances an ensemble's positions and velocities by one timestep.
///
/// Each scheme is a fixed sequence of force evaluations and bulk
/// velocity/position updates. The Verlet schemes return with the cached
/// acceleration evaluated at the new positions; [`Euler`] keeps the
/// acceleration it integrated with and re-evaluates at the start of its next
/// step.
pub trait Integrator<T: Real> {
    fn step(&self, ensemble: &mut Ensemble<T>, dt: T);

    fn name(&self) -> &'static str;
}

/// Brings the cached acceleration in line with the current positions.
///
/// The Verlet schemes start each step from the cached acceleration, so a
/// freshly built ensemble (acceleration zero) must be primed once before
/// its first step.
pub fn prime<T: Real>(ensemble: &mut Ensemble<T>) {
    accumulate_forces(ensemble);
}

/// `velocity += acceleration * dt`
fn kick<T: Real>(ensemble: &mut Ensemble<T>, dt: T) {
    ensemble
        .kernel
        .execution
        .for_each2(&mut ensemble.velocity, &ensemble.acceleration, |v, &a| *v += a * dt);
}

/// `position += velocity * dt`
fn drift<T: Real>(ensemble: &mut Ensemble<T>, dt: T) {
    ensemble
        .kernel
        .execution
        .for_each2(&mut ensemble.position, &ensemble.velocity, |x, &v| *x += v * dt);
}

/// Forward Euler (velocity first, then position with the new velocity).
///
/// First order. Cheap baseline only; energy drifts over long runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct Euler;

impl<T: Real> Integrator<T> for Euler {
    fn step(&self, ensemble: &mut Ensemble<T>, dt: T) {
        accumulate_forces(ensemble);
        kick(ensemble, dt);
        drift(ensemble, dt);
    }

    fn name(&self) -> &'static str {
        "euler"
    }
}

/// Velocity Verlet, kick-drift-kick form.
///
/// ```text
/// v(t+dt/2) = v(t) + a(t) dt/2
/// x(t+dt)   = x(t) + v(t+dt/2) dt
/// a(t+dt)   = F(x(t+dt))
/// v(t+dt)   = v(t+dt/2) + a(t+dt) dt/2
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct VelocityVerlet4;

impl<T: Real> Integrator<T> for VelocityVerlet4 {
    fn step(&self, ensemble: &mut Ensemble<T>, dt: T) {
        let half_dt = dt * T::HALF;
        kick(ensemble, half_dt);
        drift(ensemble, dt);
        accumulate_forces(ensemble);
        kick(ensemble, half_dt);
    }

    fn name(&self) -> &'static str {
        "verlet4"
    }
}

/// Velocity Verlet, position-first form.
///
/// ```text
/// x(t+dt) = x(t) + v(t) dt + a(t) dt²/2
/// a(t+dt) = F(x(t+dt))
/// v(t+dt) = v(t) + (a(t) + a(t+dt)) dt/2
/// ```
///
/// Same order as [`VelocityVerlet4`] but a different rounding sequence, so
/// the trajectories are not bit-identical.
#[derive(Clone, Copy, Debug, Default)]
pub struct VelocityVerlet3;

impl<T: Real> Integrator<T> for VelocityVerlet3 {
    fn step(&self, ensemble: &mut Ensemble<T>, dt: T) {
        let half_dt = dt * T::HALF;
        let half_dt_sq = dt * dt * T::HALF;
        let execution = ensemble.kernel.execution;

        execution.for_each3(
            &mut ensemble.position,
            &ensemble.velocity,
            &ensemble.acceleration,
            |x, &v, &a| {
                *x += v * dt;
                *x += a * half_dt_sq;
            },
        );

        let kernel = ensemble.kernel;
        kernel.accumulate(&ensemble.position, &ensemble.mass, &mut ensemble.scratch);

        execution.for_each3(
            &mut ensemble.velocity,
            &ensemble.acceleration,
            &ensemble.scratch,
            |v, &a_old, &a_new| *v += (a_old + a_new) * half_dt,
        );
        std::mem::swap(&mut ensemble.acceleration, &mut ensemble.scratch);
    }

    fn name(&self) -> &'static str {
        "verlet3"
    }
}

/// Runtime choice of integration scheme.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    Euler,
    Verlet3,
    #[default]
    Verlet4,
}

impl<T: Real> Integrator<T> for Scheme {
    fn step(&self, ensemble: &mut Ensemble<T>, dt: T) {
        match self {
            Scheme::Euler => Euler.step(ensemble, dt),
            Scheme::Verlet3 => VelocityVerlet3.step(ensemble, dt),
            Scheme::Verlet4 => VelocityVerlet4.step(ensemble, dt),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Scheme::Euler => "euler",
            Scheme::Verlet3 => "verlet3",
            Scheme::Verlet4 => "verlet4",
        }
    }
}
