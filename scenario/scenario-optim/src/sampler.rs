//! Uniform random pose sampling.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use scenario_types::{AxisRange, ConfigError, Pose, PoseBounds};

/// Draws poses uniformly from independent per-axis bounds.
///
/// # Example
///
/// ```
/// use scenario_optim::PoseSampler;
/// use scenario_types::{AxisRange, PoseBounds};
///
/// let mut bounds = PoseBounds::default();
/// bounds.x = AxisRange::new(-1.0, 1.0);
/// bounds.yaw = AxisRange::new(0.0, 360.0);
///
/// let mut sampler = PoseSampler::with_seed(bounds, 42).unwrap();
/// let pose = sampler.generate_pose();
/// assert!(bounds.contains(&pose));
/// ```
#[derive(Debug, Clone)]
pub struct PoseSampler {
    bounds: PoseBounds,
    rng: ChaCha8Rng,
}

impl PoseSampler {
    /// Create a sampler seeded from system entropy.
    pub fn new(bounds: PoseBounds) -> Result<Self, ConfigError> {
        bounds.validate()?;
        Ok(Self {
            bounds,
            rng: ChaCha8Rng::from_entropy(),
        })
    }

    /// Create a sampler with a fixed seed; equal seeds give equal sequences.
    pub fn with_seed(bounds: PoseBounds, seed: u64) -> Result<Self, ConfigError> {
        bounds.validate()?;
        Ok(Self {
            bounds,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    /// Create a sampler, seeded when `seed` is given.
    pub fn from_seed_option(bounds: PoseBounds, seed: Option<u64>) -> Result<Self, ConfigError> {
        match seed {
            Some(seed) => Self::with_seed(bounds, seed),
            None => Self::new(bounds),
        }
    }

    /// The configured bounds.
    #[must_use]
    pub const fn bounds(&self) -> &PoseBounds {
        &self.bounds
    }

    /// Draw one pose.
    pub fn generate_pose(&mut self) -> Pose {
        let [x, y, z, roll, pitch, yaw] = self.bounds.axes().map(|range| self.sample(range));
        Pose::from_components(x, y, z, roll, pitch, yaw)
    }

    fn sample(&mut self, range: AxisRange) -> f64 {
        self.rng
            .gen_range(range.min..=range.max)
            .clamp(range.min, range.max)
    }
}
