use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::diagnostics;
use crate::ensemble::Ensemble;
use crate::error::Result;
use crate::vector::Real;

/// The scalar written next to each position.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum DerivedField {
    /// `|velocity[i] * mass[i]|`
    #[default]
    Momentum,
    /// `|velocity[i]|`
    Velocity,
}

impl DerivedField {
    pub fn name(self) -> &'static str {
        match self {
            DerivedField::Momentum => "momentum",
            DerivedField::Velocity => "velocity",
        }
    }

    /// Fills `out` with this field for every body.
    pub fn compute_into<T: Real>(self, ensemble: &Ensemble<T>, out: &mut [T]) {
        match self {
            DerivedField::Momentum => diagnostics::momentum_magnitude_into(ensemble, out),
            DerivedField::Velocity => diagnostics::velocity_magnitude_into(ensemble, out),
        }
    }
}

/// One exported instant of a run.
#[derive(Debug)]
pub struct Snapshot<'a, T: Real = f32> {
    /// Sequence number of this snapshot within the run (0 = initial state).
    pub index: usize,
    /// Integration steps taken so far.
    pub step: usize,
    /// Elapsed simulation time.
    pub time: f64,
    pub position: &'a [T::Vec3],
    pub field: DerivedField,
    /// `field` evaluated for every body, same indexing as `position`.
    pub values: &'a [T],
}

/// Receives snapshots from the driver.
pub trait SnapshotSink<T: Real> {
    fn write(&mut self, snapshot: &Snapshot<'_, T>) -> Result<()>;
}

/// Writes each snapshot to `<dir>/<field>.<index>.3D` as whitespace
/// separated text: a header line, a `#coordflag xyzm` line, then
/// `x y z value` per body.
#[derive(Debug, Clone)]
pub struct TextSink {
    directory: PathBuf,
}

impl TextSink {
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory)?;
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn path_for(&self, field: DerivedField, index: usize) -> PathBuf {
        self.directory.join(format!("{}.{}.3D", field.name(), index))
    }
}

impl<T: Real> SnapshotSink<T> for TextSink {
    fn write(&mut self, snapshot: &Snapshot<'_, T>) -> Result<()> {
        let path = self.path_for(snapshot.field, snapshot.index);
        let mut out = BufWriter::new(File::create(&path)?);

        writeln!(out, "x y z {}", snapshot.field.name())?;
        writeln!(out, "#coordflag xyzm")?;
        for (&pos, value) in snapshot.position.iter().zip(snapshot.values) {
            let [x, y, z] = T::components(pos);
            writeln!(out, "{:?} {:?} {:?} {:?}", x, y, z, value)?;
        }
        out.flush()?;

        log::debug!("wrote {}", path.display());
        Ok(())
    }
}
