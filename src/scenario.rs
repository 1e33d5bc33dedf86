use std::f32::consts::{PI, TAU};

use rand::Rng;
use rand_distr::{Distribution, LogNormal};
use serde::{Deserialize, Serialize};
use ultraviolet::Vec3;

use crate::body::Body;
use crate::error::Result;

/// Mass of the anchor body placed at the origin by [`colliding_galaxies`].
pub const ANCHOR_MASS: f32 = 1e13;
/// Mass of the central body of each galaxy.
pub const GALAXY_CORE_MASS: f32 = 3e10;

/// Named initial configurations.
///
/// Every generator draws from the RNG it is handed, so a seeded RNG fully
/// determines the bodies.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Four hollow-sphere galaxies around a heavy anchor.
    #[default]
    CollidingGalaxies,
    /// A flat disc in circular orbits around a central mass.
    UniformDisc,
    /// Three rings orbiting a central mass.
    ConcentricRings,
    /// A filled ball orbiting a central mass.
    Sphere,
}

impl Scenario {
    pub fn generate<R: Rng>(self, rng: &mut R, n: usize) -> Result<Vec<Body>> {
        match self {
            Scenario::CollidingGalaxies => colliding_galaxies(rng, n),
            Scenario::UniformDisc => Ok(uniform_disc(rng, n)),
            Scenario::ConcentricRings => ring_system(rng, n),
            Scenario::Sphere => sphere_system(rng, n),
        }
    }
}

/// Points in a thin disc of radius `radius` (height `radius / 10`).
pub fn frisbee<R: Rng>(rng: &mut R, n: usize, radius: f32) -> Vec<Vec3> {
    (0..n)
        .map(|_| {
            let (sin, cos) = (TAU * rng.random::<f32>()).sin_cos();
            let r = rng.random::<f32>() * radius;
            Vec3::new(cos * r, sin * r, rng.random::<f32>() * radius / 10.0)
        })
        .collect()
}

/// Points in a ring of radius `radius`, 5% wide and 1% high.
pub fn ring<R: Rng>(rng: &mut R, n: usize, radius: f32) -> Vec<Vec3> {
    (0..n)
        .map(|_| {
            let (sin, cos) = (TAU * rng.random::<f32>()).sin_cos();
            let r = radius + rng.random::<f32>() * radius / 20.0;
            Vec3::new(cos * r, sin * r, rng.random::<f32>() * radius / 100.0)
        })
        .collect()
}

fn spherical(theta: f32, phi: f32, r: f32) -> Vec3 {
    let (sin_t, cos_t) = theta.sin_cos();
    let (sin_p, cos_p) = phi.sin_cos();
    Vec3::new(sin_t * cos_p * r, sin_t * sin_p * r, cos_t * r)
}

/// Points inside a ball of radius `radius`.
pub fn sphere<R: Rng>(rng: &mut R, n: usize, radius: f32) -> Vec<Vec3> {
    (0..n)
        .map(|_| {
            let theta = TAU * rng.random::<f32>();
            let phi = PI * rng.random::<f32>();
            spherical(theta, phi, rng.random::<f32>() * radius)
        })
        .collect()
}

/// Points in a shell of radius `radius`, 1% thick.
pub fn hollow_sphere<R: Rng>(rng: &mut R, n: usize, radius: f32) -> Vec<Vec3> {
    (0..n)
        .map(|_| {
            let theta = TAU * rng.random::<f32>();
            let phi = PI * rng.random::<f32>();
            spherical(theta, phi, radius + rng.random::<f32>() * radius / 100.0)
        })
        .collect()
}

/// Two hollow spheres of radius 2e4 centred at (±3e4, 0, 0).
pub fn two_sphere<R: Rng>(rng: &mut R, n: usize) -> Vec<Vec3> {
    let half = n / 2;
    let offset = Vec3::new(30000.0, 0.0, 0.0);

    let mut points = hollow_sphere(rng, half, 20000.0);
    points.iter_mut().for_each(|p| *p += offset);
    points.extend(hollow_sphere(rng, n - half, 20000.0).into_iter().map(|p| p - offset));
    points
}

/// Rings of radius 1e4, 3e4 and 5e4.
pub fn concentric_rings<R: Rng>(rng: &mut R, n: usize) -> Vec<Vec3> {
    let third = n / 3;
    let mut points = ring(rng, third, 10000.0);
    points.extend(ring(rng, third, 30000.0));
    points.extend(ring(rng, n - 2 * third, 50000.0));
    points
}

/// Masses `1 + X * 1e4` with `X` drawn from a standard log-normal.
pub fn random_masses<R: Rng>(rng: &mut R, n: usize) -> Result<Vec<f32>> {
    let dist = LogNormal::new(0.0f32, 1.0)?;
    Ok((0..n).map(|_| 1.0 + dist.sample(rng) * 10000.0).collect())
}

/// Velocities for circular orbits about the z axis around a mass
/// `central_mass` at the origin (G = 1). Points on the axis get zero velocity.
pub fn orbital_velocity(positions: &[Vec3], central_mass: f32) -> Vec<Vec3> {
    positions
        .iter()
        .map(|&pos| {
            let dir = pos.cross(Vec3::unit_z());
            let r = dir.mag();
            if r == 0.0 {
                return Vec3::zero();
            }
            dir.normalized() * (central_mass / r).sqrt()
        })
        .collect()
}

/// Turns `pos[0]` into a core of `core_mass` at the origin and puts every
/// other body on a circular orbit around it.
fn orbiting(mut pos: Vec<Vec3>, mut mass: Vec<f32>, core_mass: f32) -> Vec<Body> {
    if let (Some(p), Some(m)) = (pos.first_mut(), mass.first_mut()) {
        *p = Vec3::zero();
        *m = core_mass;
    }
    let vel = orbital_velocity(&pos, core_mass);

    pos.into_iter()
        .zip(vel)
        .zip(mass)
        .map(|((pos, vel), mass)| Body::new(pos, vel, mass))
        .collect()
}

/// One galaxy: a heavy core at `center` and `n - 1` bodies on a double shell
/// orbiting it, all also given the orbital velocity around the anchor.
pub fn galaxy<R: Rng>(rng: &mut R, center: Vec3, n: usize, core_mass: f32) -> Result<Vec<Body>> {
    let mass = random_masses(rng, n)?;
    let pos = two_sphere(rng, n);
    let mut bodies = orbiting(pos, mass, core_mass);

    for body in &mut bodies {
        body.pos += center;
    }
    let positions: Vec<Vec3> = bodies.iter().map(|b| b.pos).collect();
    for (body, around_anchor) in bodies.iter_mut().zip(orbital_velocity(&positions, ANCHOR_MASS)) {
        body.vel += around_anchor;
    }
    Ok(bodies)
}

/// Four galaxies at (±4e5, ±4e5, 0). Body 1 is replaced by the anchor: a
/// mass of [`ANCHOR_MASS`] at rest at the origin.
pub fn colliding_galaxies<R: Rng>(rng: &mut R, n: usize) -> Result<Vec<Body>> {
    let quarter = n / 4;
    let centers = [
        Vec3::new(400000.0, 400000.0, 0.0),
        Vec3::new(-400000.0, -400000.0, 0.0),
        Vec3::new(400000.0, -400000.0, 0.0),
        Vec3::new(-400000.0, 400000.0, 0.0),
    ];
    let sizes = [quarter, quarter, quarter, n - 3 * quarter];

    let mut bodies = Vec::with_capacity(n);
    for (center, size) in centers.into_iter().zip(sizes) {
        bodies.extend(galaxy(rng, center, size, GALAXY_CORE_MASS)?);
    }

    if let Some(body) = bodies.get_mut(1) {
        *body = Body::at_rest(Vec3::zero(), ANCHOR_MASS);
    }
    Ok(bodies)
}

/// `n` bodies in a disc around a massive central body, sorted by distance and
/// given the circular speed for the mass enclosed by their orbit.
pub fn uniform_disc<R: Rng>(rng: &mut R, n: usize) -> Vec<Body> {
    if n == 0 {
        return Vec::new();
    }
    let inner_radius = 25.0;
    let outer_radius = (n as f32).sqrt() * 5.0;

    let mut bodies: Vec<Body> = Vec::with_capacity(n);
    bodies.push(Body::at_rest(Vec3::zero(), 1e6));

    let t = inner_radius / outer_radius;
    while bodies.len() < n {
        let (sin, cos) = (rng.random::<f32>() * TAU).sin_cos();
        // Uniform in area between the inner and outer radius.
        let r = rng.random::<f32>() * (1.0 - t * t) + t * t;
        let pos = Vec3::new(cos, sin, 0.0) * outer_radius * r.sqrt();
        let vel = Vec3::new(sin, -cos, 0.0);
        bodies.push(Body::new(pos, vel, 1.0));
    }

    bodies.sort_by(|a, b| a.pos.mag_sq().total_cmp(&b.pos.mag_sq()));

    let mut enclosed = 0.0;
    for body in &mut bodies {
        enclosed += body.mass;
        if body.pos == Vec3::zero() {
            continue;
        }
        body.vel *= (enclosed / body.pos.mag()).sqrt();
    }

    bodies
}

/// A central mass of [`GALAXY_CORE_MASS`] with [`concentric_rings`] orbiting it.
pub fn ring_system<R: Rng>(rng: &mut R, n: usize) -> Result<Vec<Body>> {
    let pos = concentric_rings(rng, n);
    let mass = random_masses(rng, n)?;
    Ok(orbiting(pos, mass, GALAXY_CORE_MASS))
}

/// A central mass of [`GALAXY_CORE_MASS`] inside a ball of radius 2e4 whose
/// bodies orbit it.
pub fn sphere_system<R: Rng>(rng: &mut R, n: usize) -> Result<Vec<Body>> {
    let pos = sphere(rng, n, 20000.0);
    let mass = random_masses(rng, n)?;
    Ok(orbiting(pos, mass, GALAXY_CORE_MASS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn same_seed_same_bodies() {
        let a = colliding_galaxies(&mut StdRng::seed_from_u64(42), 101).unwrap();
        let b = colliding_galaxies(&mut StdRng::seed_from_u64(42), 101).unwrap();
        let c = colliding_galaxies(&mut StdRng::seed_from_u64(43), 101).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn masses_depend_only_on_seed() {
        let a = random_masses(&mut StdRng::seed_from_u64(5), 256).unwrap();
        let b = random_masses(&mut StdRng::seed_from_u64(5), 256).unwrap();
        let c = random_masses(&mut StdRng::seed_from_u64(6), 256).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.iter().all(|&m| m > 1.0 && m.is_finite()));
    }

    #[test]
    fn every_scenario_yields_n_valid_bodies() {
        let scenarios = [
            Scenario::CollidingGalaxies,
            Scenario::UniformDisc,
            Scenario::ConcentricRings,
            Scenario::Sphere,
        ];
        for scenario in scenarios {
            for n in [1, 2, 7, 64] {
                let bodies = scenario.generate(&mut StdRng::seed_from_u64(1), n).unwrap();
                assert_eq!(bodies.len(), n, "{scenario:?}");
                for body in &bodies {
                    assert!(body.mass > 0.0 && body.mass.is_finite(), "{scenario:?}");
                    assert!(body.pos.x.is_finite() && body.vel.x.is_finite(), "{scenario:?}");
                    assert!(body.vel.mag().is_finite(), "{scenario:?}");
                }
            }
        }
    }

    #[test]
    fn colliding_galaxies_anchor_sits_at_origin() {
        let bodies = colliding_galaxies(&mut StdRng::seed_from_u64(3), 40).unwrap();
        assert_eq!(bodies[1], Body::at_rest(Vec3::zero(), ANCHOR_MASS));
        assert_eq!(bodies[0].mass, GALAXY_CORE_MASS);
        assert_eq!(bodies[0].pos, Vec3::new(400000.0, 400000.0, 0.0));
    }

    #[test]
    fn sphere_system_orbits_its_core() {
        let bodies = sphere_system(&mut StdRng::seed_from_u64(11), 50).unwrap();
        assert_eq!(bodies[0], Body::at_rest(Vec3::zero(), GALAXY_CORE_MASS));
        for body in &bodies[1..] {
            assert!(body.pos.mag() <= 20000.0 * 1.0001);
            // Circular orbits about z: velocity is perpendicular to position.
            assert!(body.vel.dot(body.pos).abs() <= 1e-3 * body.vel.mag() * body.pos.mag());
        }
    }

    #[test]
    fn orbital_velocity_is_tangential() {
        let pos = [Vec3::new(100.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 5.0)];
        let vel = orbital_velocity(&pos, 1e4);
        assert!(vel[0].dot(pos[0]).abs() < 1e-3);
        assert!((vel[0].mag() - 10.0).abs() < 1e-4);
        assert_eq!(vel[1], Vec3::zero());
    }

    #[test]
    fn shells_stay_within_bounds() {
        let mut rng = StdRng::seed_from_u64(9);
        for p in hollow_sphere(&mut rng, 200, 100.0) {
            let r = p.mag();
            assert!((99.9..=101.1).contains(&r), "{r}");
        }
        for p in sphere(&mut rng, 200, 100.0) {
            assert!(p.mag() <= 100.01);
        }
        for p in frisbee(&mut rng, 200, 50.0) {
            assert!(Vec3::new(p.x, p.y, 0.0).mag() <= 50.01);
            assert!((0.0..=5.0).contains(&p.z));
        }
    }
}
