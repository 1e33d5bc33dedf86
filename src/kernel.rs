use crate::ensemble::Ensemble;
use crate::parallel::Execution;
use crate::vector::{Real, dot, zero};

/// Default softening length squared (ε²).
pub const SOFTENING_SQ: f64 = 1e-5;

/// Acceleration felt at `pos_a` due to a point mass `mass_b` at `pos_b`.
///
/// Uses an exact reciprocal square root; results differ from an approximate
/// `rsqrt` in the last bits only.
#[inline(always)]
pub fn pairwise_acceleration<T: Real>(pos_a: T::Vec3, pos_b: T::Vec3, mass_b: T, eps_sq: T) -> T::Vec3 {
    let r = pos_b - pos_a;
    let r2 = eps_sq + dot::<T>(r, r);
    let inv_r = T::ONE / r2.sqrt();
    let impulse = mass_b * inv_r * inv_r * inv_r;
    r * impulse
}

/// The force oracle integrators call once per step: all-pairs softened
/// Newtonian gravity with G = 1.
///
/// For every body `i` the kernel sums
///
/// ```text
/// a_i = Σ_j m_j · r_ij / (|r_ij|² + ε²)^(3/2),    r_ij = x_j - x_i
/// ```
///
/// over **all** `j`, including `j == i`. The self-term has `r = 0` and
/// contributes exactly the zero vector, so the inner loop needs no branch.
/// Each body's sum runs sequentially in index order; only the outer loop over
/// `i` is distributed, which keeps results deterministic for either
/// [`Execution`] strategy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceKernel<T: Real = f32> {
    /// Softening length squared (ε²).
    pub softening_sq: T,
    /// Scheduling of the outer loop over bodies.
    pub execution: Execution,
}

impl<T: Real> Default for ForceKernel<T> {
    fn default() -> Self {
        Self::new(T::from_f64(SOFTENING_SQ), Execution::default())
    }
}

impl<T: Real> ForceKernel<T> {
    pub fn new(softening_sq: T, execution: Execution) -> Self {
        Self {
            softening_sq,
            execution,
        }
    }

    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    /// Net acceleration on a body at `pos` from every body in `positions`.
    #[inline(always)]
    pub fn acceleration_at(&self, pos: T::Vec3, positions: &[T::Vec3], masses: &[T]) -> T::Vec3 {
        let eps_sq = self.softening_sq;
        let mut acc = zero::<T>();
        for (&other, &mass) in positions.iter().zip(masses) {
            acc += pairwise_acceleration::<T>(pos, other, mass, eps_sq);
        }
        acc
    }

    /// Overwrites `out[i]` with the net acceleration on body `i`.
    ///
    /// `positions` and `masses` are only read; `out` is written at disjoint
    /// indices, so the outer loop needs no synchronisation.
    pub fn accumulate(&self, positions: &[T::Vec3], masses: &[T], out: &mut [T::Vec3]) {
        debug_assert_eq!(positions.len(), masses.len());
        self.execution.for_each2(out, positions, |acc, &pos| {
            *acc = self.acceleration_at(pos, positions, masses);
        });
    }
}

/// Recomputes `acceleration[]` of the ensemble from its current positions.
pub fn accumulate_forces<T: Real>(ensemble: &mut Ensemble<T>) {
    let kernel = ensemble.kernel;
    kernel.accumulate(&ensemble.position, &ensemble.mass, &mut ensemble.acceleration);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::{magnitude, vec3};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use ultraviolet::Vec3;

    const EPS_SQ: f32 = SOFTENING_SQ as f32;

    #[test]
    fn pairwise_obeys_third_law() {
        let pi = Vec3::new(0.3, -1.2, 2.0);
        let pj = Vec3::new(-4.0, 0.5, 1.1);
        let (mi, mj) = (3.0f32, 7.5f32);

        let on_i = pairwise_acceleration::<f32>(pi, pj, mj, EPS_SQ) * mi;
        let on_j = pairwise_acceleration::<f32>(pj, pi, mi, EPS_SQ) * mj;

        assert_relative_eq!(on_i.x, -on_j.x, max_relative = 1e-6);
        assert_relative_eq!(on_i.y, -on_j.y, max_relative = 1e-6);
        assert_relative_eq!(on_i.z, -on_j.z, max_relative = 1e-6);
    }

    #[test]
    fn self_term_is_zero() {
        let p = Vec3::new(12.0, -3.0, 0.5);
        let a = pairwise_acceleration::<f32>(p, p, 1e13, EPS_SQ);
        assert_eq!(a, Vec3::zero());
        assert!(magnitude::<f32>(a) <= 1e13 / EPS_SQ.powf(1.5));
    }

    #[test]
    fn softened_value_matches_closed_form() {
        let d = 1e-3f64;
        let m = 5.0f64;
        let a = pairwise_acceleration::<f32>(Vec3::zero(), Vec3::new(d as f32, 0.0, 0.0), m as f32, EPS_SQ);
        let expected = m * d / (d * d + SOFTENING_SQ).powf(1.5);

        assert!(a.x.is_finite());
        assert_relative_eq!(a.x as f64, expected, max_relative = 1e-5);
        assert_eq!(a.y, 0.0);
        assert_eq!(a.z, 0.0);
    }

    #[test]
    fn accumulate_matches_direct_sum() {
        let positions = vec![
            vec3::<f32>(0.0, 0.0, 0.0),
            vec3::<f32>(1.0, 0.0, 0.0),
            vec3::<f32>(0.0, 2.0, 0.0),
        ];
        let masses = vec![1.0f32, 2.0, 4.0];
        let mut out = vec![Vec3::zero(); 3];

        ForceKernel::<f32>::default().accumulate(&positions, &masses, &mut out);

        // Body 0: pulled by 2 along +x at distance 1 and by 4 along +y at distance 2.
        assert_relative_eq!(out[0].x, 2.0, max_relative = 1e-4);
        assert_relative_eq!(out[0].y, 1.0, max_relative = 1e-4);
        assert_eq!(out[0].z, 0.0);
    }

    #[test]
    fn serial_and_parallel_agree_bitwise() {
        let mut rng = StdRng::seed_from_u64(7);
        let positions: Vec<Vec3> = (0..500)
            .map(|_| Vec3::new(rng.random(), rng.random(), rng.random()) * 100.0)
            .collect();
        let masses: Vec<f32> = (0..500).map(|_| 1.0 + rng.random::<f32>() * 10.0).collect();

        let mut serial = vec![Vec3::zero(); 500];
        let mut parallel = vec![Vec3::zero(); 500];
        ForceKernel::<f32>::default()
            .with_execution(Execution::Serial)
            .accumulate(&positions, &masses, &mut serial);
        ForceKernel::<f32>::default()
            .with_execution(Execution::Parallel)
            .accumulate(&positions, &masses, &mut parallel);

        assert_eq!(serial, parallel);
    }
}
