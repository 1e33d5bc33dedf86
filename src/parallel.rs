use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// How the per-body loops of a step are scheduled.
///
/// Every helper here is a map over the body index with disjoint writes:
/// element `i` of the output is written by exactly one worker and nothing
/// else reads it during the call. `Parallel` splits the index range into
/// contiguous chunks on the rayon pool; `Serial` walks it on the calling
/// thread. Both give bit-identical results from run to run.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Execution {
    Serial,
    #[default]
    Parallel,
}

impl Execution {
    /// Smallest contiguous index range handed to a single rayon task.
    pub const MIN_CHUNK: usize = 64;

    /// `f(&mut out[i], &a[i])` for every `i`.
    #[inline]
    pub fn for_each2<O, A, F>(self, out: &mut [O], a: &[A], f: F)
    where
        O: Send,
        A: Sync,
        F: Fn(&mut O, &A) + Send + Sync,
    {
        debug_assert_eq!(out.len(), a.len());
        match self {
            Execution::Serial => out.iter_mut().zip(a).for_each(|(o, a)| f(o, a)),
            Execution::Parallel => out
                .par_iter_mut()
                .zip(a.par_iter())
                .with_min_len(Self::MIN_CHUNK)
                .for_each(|(o, a)| f(o, a)),
        }
    }

    /// `f(&mut out[i], &a[i], &b[i])` for every `i`.
    #[inline]
    pub fn for_each3<O, A, B, F>(self, out: &mut [O], a: &[A], b: &[B], f: F)
    where
        O: Send,
        A: Sync,
        B: Sync,
        F: Fn(&mut O, &A, &B) + Send + Sync,
    {
        debug_assert_eq!(out.len(), a.len());
        debug_assert_eq!(out.len(), b.len());
        match self {
            Execution::Serial => out
                .iter_mut()
                .zip(a)
                .zip(b)
                .for_each(|((o, a), b)| f(o, a, b)),
            Execution::Parallel => out
                .par_iter_mut()
                .zip(a.par_iter())
                .zip(b.par_iter())
                .with_min_len(Self::MIN_CHUNK)
                .for_each(|((o, a), b)| f(o, a, b)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategies_agree() {
        let a: Vec<f32> = (0..1000).map(|i| i as f32 * 0.25).collect();
        let b: Vec<f32> = (0..1000).map(|i| (i as f32).sqrt()).collect();

        let mut serial = vec![1.0f32; 1000];
        let mut parallel = vec![1.0f32; 1000];
        Execution::Serial.for_each3(&mut serial, &a, &b, |o, a, b| *o += a * b);
        Execution::Parallel.for_each3(&mut parallel, &a, &b, |o, a, b| *o += a * b);

        assert_eq!(serial, parallel);
    }
}
