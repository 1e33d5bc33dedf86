use crate::{
    config::SimulationConfig,
    ensemble::{Clock, Ensemble},
    integrator::Scheme,
    scenario::Scenario,
    simulation::Simulation,
    snapshot::DerivedField,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ultraviolet::Vec3;

/// Creates a colliding-galaxies simulation with `n` bodies. Returns null if
/// the parameters are invalid.
#[unsafe(no_mangle)]
pub extern "C" fn NBody_Create(n: usize, seed: u64, timestep: f64, end_time: f64) -> *mut Simulation {
    let mut rng = StdRng::seed_from_u64(seed);
    let sim = Scenario::CollidingGalaxies
        .generate(&mut rng, n)
        .and_then(|bodies| Ensemble::from_bodies(&bodies, Clock::new(timestep, end_time)))
        .map(|ensemble| Simulation::new(ensemble, Scheme::Verlet4));
    match sim {
        Ok(sim) => Box::into_raw(Box::new(sim)),
        Err(err) => {
            log::warn!("rejected simulation parameters: {err}");
            std::ptr::null_mut()
        }
    }
}

/// Loads a YAML configuration and builds the simulation it describes.
/// Returns null if the file cannot be read or is invalid.
///
/// # Safety
/// `path` must be null or point to a NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn NBody_CreateFromConfig(path: *const std::ffi::c_char) -> *mut Simulation {
    if path.is_null() {
        return std::ptr::null_mut();
    }
    let path = unsafe { std::ffi::CStr::from_ptr(path) }.to_string_lossy().into_owned();
    let config = match SimulationConfig::load(&path) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("failed to load {path}: {err}");
            return std::ptr::null_mut();
        }
    };

    let mut rng = StdRng::seed_from_u64(config.seed);
    let sim = config
        .scenario
        .generate(&mut rng, config.bodies)
        .and_then(|bodies| Ensemble::from_bodies(&bodies, config.clock()))
        .and_then(|ensemble| ensemble.with_kernel(config.kernel()))
        .map(|ensemble| Simulation::new(ensemble, config.integrator).with_field(config.field))
        .and_then(|sim| sim.with_snapshot_interval(config.snapshot_interval));
    match sim {
        Ok(sim) => Box::into_raw(Box::new(sim)),
        Err(err) => {
            log::warn!("rejected configuration {path}: {err}");
            std::ptr::null_mut()
        }
    }
}

/// # Safety
/// `handle` must be null or a pointer returned by one of the create functions
/// that has not been destroyed yet.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn NBody_Destroy(handle: *mut Simulation) {
    if !handle.is_null() {
        unsafe { drop(Box::from_raw(handle)) };
    }
}

/// Advances one step. Does nothing once the end time has passed.
///
/// # Safety
/// See [`NBody_Destroy`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn NBody_Step(handle: *mut Simulation) {
    if let Some(sim) = unsafe { handle.as_mut() } {
        if !sim.is_finished() {
            sim.step();
        }
    }
}

/// # Safety
/// See [`NBody_Destroy`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn NBody_IsFinished(handle: *const Simulation) -> bool {
    unsafe { handle.as_ref() }.is_none_or(|sim| sim.is_finished())
}

/// # Safety
/// See [`NBody_Destroy`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn NBody_GetElapsedTime(handle: *const Simulation) -> f64 {
    unsafe { handle.as_ref() }.map_or(0.0, |sim| sim.ensemble.elapsed_time())
}

/// # Safety
/// See [`NBody_Destroy`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn NBody_GetBodyCount(handle: *const Simulation) -> usize {
    unsafe { handle.as_ref() }.map_or(0, |sim| sim.ensemble.len())
}

/// Pointer to `3 * count` floats (`x y z` per body), valid until the next
/// step or destroy.
///
/// # Safety
/// See [`NBody_Destroy`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn NBody_GetPositions(handle: *const Simulation) -> *const Vec3 {
    unsafe { handle.as_ref() }.map_or(std::ptr::null(), |sim| sim.ensemble.position().as_ptr())
}

/// Copies momentum magnitudes (`field == 0`) or velocity magnitudes
/// (`field == 1`) into `out`. Returns the number of values written, or 0 on
/// bad arguments.
///
/// # Safety
/// See [`NBody_Destroy`]. `out` must be valid for `len` writes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn NBody_CopyField(handle: *const Simulation, field: u32, out: *mut f32, len: usize) -> usize {
    let Some(sim) = (unsafe { handle.as_ref() }) else {
        return 0;
    };
    let field = match field {
        0 => DerivedField::Momentum,
        1 => DerivedField::Velocity,
        _ => return 0,
    };
    let n = sim.ensemble.len();
    if out.is_null() || len < n {
        return 0;
    }
    let out = unsafe { std::slice::from_raw_parts_mut(out, n) };
    field.compute_into(&sim.ensemble, out);
    n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_lifecycle() {
        let handle = NBody_Create(16, 5, 0.5, 1.0);
        assert!(!handle.is_null());
        unsafe {
            assert_eq!(NBody_GetBodyCount(handle), 16);
            assert!(!NBody_GetPositions(handle).is_null());

            let mut steps = 0;
            while !NBody_IsFinished(handle) {
                NBody_Step(handle);
                steps += 1;
            }
            assert_eq!(steps, 3);
            assert_eq!(NBody_GetElapsedTime(handle), 1.5);

            let mut out = vec![0.0f32; 16];
            assert_eq!(NBody_CopyField(handle, 1, out.as_mut_ptr(), out.len()), 16);
            assert!(out.iter().all(|v| v.is_finite()));
            assert_eq!(NBody_CopyField(handle, 7, out.as_mut_ptr(), out.len()), 0);

            NBody_Destroy(handle);
        }
    }

    #[test]
    fn invalid_parameters_yield_null() {
        assert!(NBody_Create(0, 1, 0.1, 1.0).is_null());
        assert!(NBody_Create(8, 1, -0.1, 1.0).is_null());
    }
}
