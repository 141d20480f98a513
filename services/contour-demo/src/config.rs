//! Demo configuration loaded from YAML.
//!
//! Drawing options are the renderer's `PipelineConfig`, flattened into the
//! top level of the file next to the grid, domain, sampler and image
//! sections.

use std::path::Path;

use anyhow::{ensure, Context, Result};
use contour_common::{
    ContourResult, GaussianSampler, GeoBounds, GeoPoint, GridDomain, GridSampler, ScalarField,
    WavyRampSampler,
};
use renderer::{Color, PipelineConfig};
use serde::Deserialize;
use tracing::{debug, info};

/// Root of a demo config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DemoConfig {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub domain: DomainConfig,
    #[serde(default)]
    pub sampler: SamplerConfig,
    #[serde(default)]
    pub image: ImageConfig,
    #[serde(flatten)]
    pub pipeline: PipelineConfig,
}

/// Sample counts along each axis.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_samples")]
    pub width: usize,
    #[serde(default = "default_samples")]
    pub height: usize,
}

fn default_samples() -> usize {
    50
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: default_samples(),
            height: default_samples(),
        }
    }
}

/// Geographic placement of the grid.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainConfig {
    /// Centred on a point with uniform spacing in degrees.
    Center { lon: f64, lat: f64, spacing: f64 },
    /// Explicit bounds in degrees.
    Bounds {
        west: f64,
        south: f64,
        east: f64,
        north: f64,
    },
}

impl Default for DomainConfig {
    fn default() -> Self {
        DomainConfig::Center {
            lon: 116.391,
            lat: 39.901,
            spacing: 0.01,
        }
    }
}

/// Which synthetic field to contour.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SamplerConfig {
    Gaussian(GaussianSampler),
    WavyRamp(WavyRampSampler),
}

impl Default for SamplerConfig {
    fn default() -> Self {
        SamplerConfig::Gaussian(GaussianSampler::default())
    }
}

impl SamplerConfig {
    pub fn sample(&self, domain: &GridDomain) -> ContourResult<ScalarField> {
        let sampler: &dyn GridSampler = match self {
            SamplerConfig::Gaussian(s) => s,
            SamplerConfig::WavyRamp(s) => s,
        };
        sampler.sample(domain)
    }
}

/// PNG output settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageConfig {
    #[serde(default = "default_image_size")]
    pub width: u32,
    #[serde(default = "default_image_size")]
    pub height: u32,
    /// `#RRGGBB`; transparent when absent.
    #[serde(default)]
    pub background: Option<String>,
}

fn default_image_size() -> u32 {
    800
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            width: default_image_size(),
            height: default_image_size(),
            background: None,
        }
    }
}

impl ImageConfig {
    pub fn background_color(&self) -> Result<Color> {
        match &self.background {
            None => Ok(Color::transparent()),
            Some(hex) => Color::from_hex(hex)
                .with_context(|| format!("Invalid background color: {}", hex)),
        }
    }
}

impl DemoConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: DemoConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        info!(
            path = %path.display(),
            rows = config.grid.height,
            cols = config.grid.width,
            levels = config.pipeline.levels.len(),
            "Loaded demo config"
        );

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.grid.width >= 2 && self.grid.height >= 2,
            "grid must be at least 2x2, got {}x{}",
            self.grid.width,
            self.grid.height
        );
        ensure!(
            !self.pipeline.levels.is_empty(),
            "at least one level is required"
        );
        ensure!(
            (0.0..=1.0).contains(&self.pipeline.fill_alpha),
            "fill_alpha must be within [0, 1], got {}",
            self.pipeline.fill_alpha
        );
        ensure!(
            self.image.width > 0 && self.image.height > 0,
            "image size must be positive"
        );
        if let DomainConfig::Center { spacing, .. } = self.domain {
            ensure!(spacing > 0.0, "domain spacing must be positive, got {}", spacing);
        }
        self.image.background_color()?;

        debug!("Config validated");
        Ok(())
    }

    /// The grid's footprint. Rows run south to north.
    pub fn grid_domain(&self) -> Result<GridDomain> {
        let rows = self.grid.height;
        let cols = self.grid.width;
        let domain = match self.domain {
            DomainConfig::Center { lon, lat, spacing } => {
                GridDomain::from_center(rows, cols, GeoPoint::new(lon, lat), spacing)
            }
            DomainConfig::Bounds {
                west,
                south,
                east,
                north,
            } => GridDomain::from_bounds(rows, cols, GeoBounds::new(west, south, east, north)),
        };
        domain.context("Invalid grid domain")
    }
}
