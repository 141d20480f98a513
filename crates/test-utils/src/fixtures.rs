//! Common test fixtures for geo-contour tests.
//!
//! Domains are given as plain tuples so this crate stays dependency-free.

/// Common domain definitions as `(west, south, east, north)` in degrees.
pub mod bounds {
    /// Default demo domain: 50x50 samples at 0.01° around central Beijing.
    pub const BEIJING_DEMO: (f64, f64, f64, f64) = (116.141, 39.651, 116.641, 40.151);

    /// One-degree box used by the "real data" path of the demo.
    pub const BEIJING_DEGREE: (f64, f64, f64, f64) = (116.0, 39.5, 117.0, 40.5);

    /// Continental United States.
    pub const CONUS: (f64, f64, f64, f64) = (-130.0, 20.0, -60.0, 55.0);

    /// Unit box around the origin.
    pub const UNIT: (f64, f64, f64, f64) = (-0.5, -0.5, 0.5, 0.5);
}

/// Center + spacing form of the default demo domain.
pub mod center {
    pub const LON: f64 = 116.391;
    pub const LAT: f64 = 39.901;
    pub const SPACING: f64 = 0.01;
    pub const SAMPLES: usize = 50;
}

/// Normalised level sets used throughout the tests.
pub mod levels {
    /// The demo's default four levels.
    pub const DEFAULT: [f64; 4] = [0.2, 0.4, 0.6, 0.8];

    /// Single mid-range level.
    pub const MID: [f64; 1] = [0.5];
}
