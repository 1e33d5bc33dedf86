use crate::vector::{Real, zero};

/// Initial state of one body, as handed over by a scenario generator.
///
/// The engine itself stores bodies as parallel sequences (see
/// [`Ensemble`](crate::Ensemble)); `Body` is the arrays-of-structs form used
/// at the boundary.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body<T: Real = f32> {
    /// Position vector.
    pub pos: T::Vec3,
    /// Velocity vector.
    pub vel: T::Vec3,
    /// Mass of the body.
    pub mass: T,
}

impl<T: Real> Default for Body<T> {
    fn default() -> Self {
        Self::at_rest(zero::<T>(), T::ONE)
    }
}

impl<T: Real> Body<T> {
    pub fn new(pos: T::Vec3, vel: T::Vec3, mass: T) -> Self {
        Self { pos, vel, mass }
    }

    /// A body with zero velocity.
    pub fn at_rest(pos: T::Vec3, mass: T) -> Self {
        Self::new(pos, zero::<T>(), mass)
    }

    /// Linear momentum `vel * mass`.
    pub fn momentum(&self) -> T::Vec3 {
        self.vel * self.mass
    }
}
