//! Synthetic scalar fields for demos and tests.
//!
//! A real deployment would load sampled data instead; anything producing a
//! [`ScalarField`] for a [`GridDomain`] can stand in via [`GridSampler`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ContourResult, GridDomain, ScalarField};

/// Produces a scalar field covering a grid domain.
pub trait GridSampler {
    fn sample(&self, domain: &GridDomain) -> ContourResult<ScalarField>;
}

/// A single Gaussian bump centred on the domain, peaking at 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaussianSampler {
    /// Standard deviation measured in grid cells.
    pub sigma_cells: f64,
}

impl Default for GaussianSampler {
    fn default() -> Self {
        Self { sigma_cells: 10.0 }
    }
}

impl GridSampler for GaussianSampler {
    fn sample(&self, domain: &GridDomain) -> ContourResult<ScalarField> {
        let center = domain.bounds.center();
        let sigma = domain.lon_spacing() * self.sigma_cells;
        let two_sigma_sq = 2.0 * sigma * sigma;

        debug!(
            rows = domain.rows,
            cols = domain.cols,
            sigma = sigma,
            "Sampling gaussian field"
        );

        ScalarField::from_fn(domain.rows, domain.cols, |row, col| {
            let p = domain.sample_position(row, col);
            let dx = p.lon - center.lon;
            let dy = p.lat - center.lat;
            (-(dx * dx + dy * dy) / two_sigma_sq).exp()
        })
    }
}

/// A west-to-east ramp bent by a sine wave and roughened with noise.
///
/// Values are clamped into `[0, 1]`. The noise is seeded so the same
/// configuration always produces the same field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WavyRampSampler {
    pub wave_amplitude: f64,
    /// Full width of the uniform noise band.
    pub noise: f64,
    pub seed: u64,
}

impl Default for WavyRampSampler {
    fn default() -> Self {
        Self {
            wave_amplitude: 0.15,
            noise: 0.05,
            seed: 42,
        }
    }
}

impl GridSampler for WavyRampSampler {
    fn sample(&self, domain: &GridDomain) -> ContourResult<ScalarField> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let rows = domain.rows as f64;
        let cols = domain.cols as f64;

        ScalarField::from_fn(domain.rows, domain.cols, |row, col| {
            let ramp = col as f64 / cols;
            let wave = (row as f64 / rows * std::f64::consts::PI * 4.0).sin() * self.wave_amplitude;
            let jitter = if self.noise > 0.0 {
                (rng.gen::<f64>() - 0.5) * self.noise
            } else {
                0.0
            };
            (ramp + wave + jitter).clamp(0.0, 1.0)
        })
    }
}
