use crate::ensemble::Ensemble;
use crate::vector::{Real, magnitude, mag_sq, zero};

/// `momentum[i] = velocity[i] * mass[i]`, written into `out`.
pub fn momentum_into<T: Real>(ensemble: &Ensemble<T>, out: &mut [T::Vec3]) {
    ensemble
        .execution()
        .for_each3(out, ensemble.velocity(), ensemble.mass(), |p, &v, &m| *p = v * m);
}

pub fn momentum<T: Real>(ensemble: &Ensemble<T>) -> Vec<T::Vec3> {
    let mut out = vec![zero::<T>(); ensemble.len()];
    momentum_into(ensemble, &mut out);
    out
}

/// `|velocity[i] * mass[i]|`, written into `out`.
pub fn momentum_magnitude_into<T: Real>(ensemble: &Ensemble<T>, out: &mut [T]) {
    ensemble.execution().for_each3(out, ensemble.velocity(), ensemble.mass(), |p, &v, &m| {
        *p = magnitude::<T>(v * m)
    });
}

pub fn momentum_magnitude<T: Real>(ensemble: &Ensemble<T>) -> Vec<T> {
    let mut out = vec![T::ZERO; ensemble.len()];
    momentum_magnitude_into(ensemble, &mut out);
    out
}

/// `|velocity[i]|`, written into `out`.
pub fn velocity_magnitude_into<T: Real>(ensemble: &Ensemble<T>, out: &mut [T]) {
    ensemble
        .execution()
        .for_each2(out, ensemble.velocity(), |s, &v| *s = magnitude::<T>(v));
}

pub fn velocity_magnitude<T: Real>(ensemble: &Ensemble<T>) -> Vec<T> {
    let mut out = vec![T::ZERO; ensemble.len()];
    velocity_magnitude_into(ensemble, &mut out);
    out
}

/// Σ velocity[i] * mass[i]
pub fn total_momentum<T: Real>(ensemble: &Ensemble<T>) -> T::Vec3 {
    let mut total = zero::<T>();
    for (&v, &m) in ensemble.velocity().iter().zip(ensemble.mass()) {
        total += v * m;
    }
    total
}

pub fn total_mass<T: Real>(ensemble: &Ensemble<T>) -> T {
    ensemble.mass().iter().copied().sum()
}

/// Mass-weighted mean position.
pub fn center_of_mass<T: Real>(ensemble: &Ensemble<T>) -> T::Vec3 {
    let mut weighted = zero::<T>();
    for (&x, &m) in ensemble.position().iter().zip(ensemble.mass()) {
        weighted += x * m;
    }
    weighted / total_mass(ensemble)
}

/// Σ ½ m |v|²
pub fn kinetic_energy<T: Real>(ensemble: &Ensemble<T>) -> T {
    ensemble
        .velocity()
        .iter()
        .zip(ensemble.mass())
        .map(|(&v, &m)| T::HALF * m * mag_sq::<T>(v))
        .sum()
}

/// Softened pairwise potential, -Σ_{i<j} m_i m_j / sqrt(|r_ij|² + ε²),
/// consistent with the force law the kernel integrates.
pub fn potential_energy<T: Real>(ensemble: &Ensemble<T>) -> T {
    let eps_sq = ensemble.kernel().softening_sq;
    let position = ensemble.position();
    let mass = ensemble.mass();

    let mut energy = T::ZERO;
    for i in 0..position.len() {
        for j in (i + 1)..position.len() {
            let r = position[j] - position[i];
            let dist = (mag_sq::<T>(r) + eps_sq).sqrt();
            energy += -(mass[i] * mass[j] / dist);
        }
    }
    energy
}

pub fn total_energy<T: Real>(ensemble: &Ensemble<T>) -> T {
    kinetic_energy(ensemble) + potential_energy(ensemble)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Body;
    use crate::ensemble::Clock;
    use approx::assert_relative_eq;
    use ultraviolet::Vec3;

    fn sample() -> Ensemble<f32> {
        let bodies = [
            Body::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(3.0, 4.0, 0.0), 2.0),
            Body::new(Vec3::new(4.0, 0.0, 0.0), Vec3::new(0.0, -1.0, 0.0), 6.0),
        ];
        Ensemble::from_bodies(&bodies, Clock::new(0.1, 1.0)).unwrap()
    }

    #[test]
    fn per_body_fields() {
        let ensemble = sample();

        assert_eq!(momentum(&ensemble), vec![Vec3::new(6.0, 8.0, 0.0), Vec3::new(0.0, -6.0, 0.0)]);
        assert_eq!(momentum_magnitude(&ensemble), vec![10.0, 6.0]);
        assert_eq!(velocity_magnitude(&ensemble), vec![5.0, 1.0]);
    }

    #[test]
    fn aggregates() {
        let ensemble = sample();

        assert_eq!(total_momentum(&ensemble), Vec3::new(6.0, 2.0, 0.0));
        assert_eq!(center_of_mass(&ensemble), Vec3::new(3.0, 0.0, 0.0));
        assert_relative_eq!(kinetic_energy(&ensemble), 25.0 + 3.0);
        assert_relative_eq!(potential_energy(&ensemble), -12.0 / 4.0, max_relative = 1e-5);
        assert_relative_eq!(total_energy(&ensemble), 25.0, max_relative = 1e-5);
    }

    #[test]
    fn diagnostics_leave_state_untouched() {
        let ensemble = sample();
        let before = ensemble.clone();
        let _ = momentum(&ensemble);
        let _ = velocity_magnitude(&ensemble);
        let _ = total_energy(&ensemble);
        assert_eq!(before.position(), ensemble.position());
        assert_eq!(before.velocity(), ensemble.velocity());
    }
}
