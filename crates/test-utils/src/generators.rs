//! Test data generators for creating synthetic scalar fields.
//!
//! All generators return row-major `Vec<f64>` data (row 0 first) so they can
//! be fed to `ScalarField::new(rows, cols, data)`.

/// Creates a discrete Gaussian bump peaking at 1.0 on `(peak_row, peak_col)`.
///
/// `sigma` is measured in samples.
pub fn create_peak_grid(
    width: usize,
    height: usize,
    peak_row: usize,
    peak_col: usize,
    sigma: f64,
) -> Vec<f64> {
    let two_sigma_sq = 2.0 * sigma * sigma;
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let dr = row as f64 - peak_row as f64;
            let dc = col as f64 - peak_col as f64;
            data.push((-(dr * dr + dc * dc) / two_sigma_sq).exp());
        }
    }
    data
}

/// The 4x4 single-peak scenario: a narrow bump with its maximum at `[2][2]`.
///
/// Only the peak sample lies above the mid-range level, so contouring at
/// 0.5 yields one closed ring around it.
///
/// # Example
///
/// ```
/// use test_utils::single_peak_4x4;
///
/// let grid = single_peak_4x4();
/// assert_eq!(grid.len(), 16);
/// assert_eq!(grid[2 * 4 + 2], 1.0);
/// ```
pub fn single_peak_4x4() -> Vec<f64> {
    create_peak_grid(4, 4, 2, 2, 0.5)
}

/// Creates a field that increases linearly west to east: `col / width`.
///
/// # Example
///
/// ```
/// use test_utils::create_linear_ramp;
///
/// let grid = create_linear_ramp(4, 3);
/// assert_eq!(grid[..4], [0.0, 0.25, 0.5, 0.75]);
/// ```
pub fn create_linear_ramp(width: usize, height: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(width * height);
    for _row in 0..height {
        for col in 0..width {
            data.push(col as f64 / width as f64);
        }
    }
    data
}

/// Creates a grid filled with a constant value.
pub fn create_constant_grid(width: usize, height: usize, value: f64) -> Vec<f64> {
    vec![value; width * height]
}

/// Creates a zero grid with NaN ("no data") at the given `(col, row)` positions.
pub fn create_grid_with_nans(
    width: usize,
    height: usize,
    nan_positions: &[(usize, usize)],
) -> Vec<f64> {
    let mut data = vec![0.0f64; width * height];
    for &(col, row) in nan_positions {
        if col < width && row < height {
            data[row * width + col] = f64::NAN;
        }
    }
    data
}

/// Creates a smooth field of overlapping sine waves with many contours.
pub fn create_smooth_field(width: usize, height: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let fx = col as f64 / width as f64;
            let fy = row as f64 / height as f64;

            let v1 = (fx * std::f64::consts::PI * 4.0).sin() * 20.0;
            let v2 = (fy * std::f64::consts::PI * 4.0).sin() * 20.0;
            let v3 = ((fx + fy) * std::f64::consts::PI * 2.0).sin() * 10.0;

            data.push(50.0 + v1 + v2 + v3);
        }
    }
    data
}

/// Creates a field with deterministic pseudo-random jitter on top of
/// [`create_smooth_field`], producing many short contours.
pub fn create_noisy_field(width: usize, height: usize, seed: u32) -> Vec<f64> {
    let mut data = create_smooth_field(width, height);
    for row in 0..height {
        for col in 0..width {
            let hash = simple_hash(col as u32, row as u32, seed);
            let jitter = (hash % 1000) as f64 / 100.0 - 5.0; // -5 to +5
            data[row * width + col] += jitter;
        }
    }
    data
}

/// Simple deterministic hash for reproducible test data.
fn simple_hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = seed;
    h = h.wrapping_mul(31).wrapping_add(x);
    h = h.wrapping_mul(31).wrapping_add(y);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^= h >> 16;
    h
}
