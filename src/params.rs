use std::fmt::Display;

use lazy_static::lazy_static;

lazy_static! {
  pub static ref DEFAULT_PARAMS: Params = Params {
    // Random scenes to check
    n_trials: 10_000,
    // Scene size upper bound (actual size is uniform in [0, max_points])
    max_points: 64,
    // Points are placed in a square of this half-width around the observer
    coord_range: 100.0,
    // Angles are drawn from (-max_turns, max_turns) full turns
    max_turns: 3.0,
    seed: 0,

    // Default to system physical cores (to prevent interference from hyperthreading)
    n_threads: num_cpus::get_physical(),
  };
}

/// Randomized verification parameters.
#[derive(Copy, Clone, Debug)]
pub struct Params {
    /// Number of random scenes
    pub n_trials: usize,
    /// Maximum number of points per scene
    pub max_points: usize,
    /// Half-width of the coordinate square around the observer
    pub coord_range: f64,
    /// Bound on the magnitude of tested angles, in full turns
    pub max_turns: f64,
    /// Base seed; trial `i` uses `seed + i`
    pub seed: u64,

    /// Number of threads available
    pub n_threads: usize,
}

impl Display for Params {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "===== Verification Parameters =====")?;
        writeln!(f, "\t - n_trials (random scenes): {}", self.n_trials)?;
        writeln!(f, "\t - max_points (points per scene): {}", self.max_points)?;
        writeln!(f, "\t - coord_range (coordinate half-width): {}", self.coord_range)?;
        writeln!(f, "\t - max_turns (angle bound in turns): {}", self.max_turns)?;
        writeln!(f, "\t - seed (base seed): {}", self.seed)?;
        writeln!(f, "\t - n_threads (n threads to use): {}", self.n_threads)
    }
}
