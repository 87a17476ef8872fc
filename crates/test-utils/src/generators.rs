//! Synthetic TIN generators.
//!
//! Every generator triangulates a regular grid of `n x n` cells (two
//! triangles per cell, split along the same diagonal) and samples heights
//! from an analytic surface, so expected contours can be reasoned about.

/// A triangle as `[[x, y, z]; 3]`.
pub type RawTriangle = [[f64; 3]; 3];

/// Triangulates a regular grid, sampling heights from `height(x, y)`.
///
/// # Arguments
///
/// * `cols` - Number of grid cells along x
/// * `rows` - Number of grid cells along y
/// * `spacing` - Cell edge length
/// * `height` - Surface function
///
/// # Returns
///
/// `2 * cols * rows` triangles in row-major cell order.
///
/// # Example
///
/// ```
/// use test_utils::create_grid_tin;
///
/// let tin = create_grid_tin(3, 2, 1.0, |x, _| x);
/// assert_eq!(tin.len(), 12);
/// assert_eq!(tin[0][1], [1.0, 0.0, 1.0]);
/// ```
pub fn create_grid_tin<F>(cols: usize, rows: usize, spacing: f64, height: F) -> Vec<RawTriangle>
where
    F: Fn(f64, f64) -> f64,
{
    let vertex = |i: usize, j: usize| {
        let x = i as f64 * spacing;
        let y = j as f64 * spacing;
        [x, y, height(x, y)]
    };

    let mut tin = Vec::with_capacity(2 * cols * rows);
    for j in 0..rows {
        for i in 0..cols {
            let a = vertex(i, j);
            let b = vertex(i + 1, j);
            let c = vertex(i + 1, j + 1);
            let d = vertex(i, j + 1);
            tin.push([a, b, d]);
            tin.push([b, c, d]);
        }
    }
    tin
}

/// A tilted plane rising along x: `z = slope * x`.
///
/// Contours are straight vertical lines.
pub fn create_plane_tin(n: usize, spacing: f64, slope: f64) -> Vec<RawTriangle> {
    create_grid_tin(n, n, spacing, |x, _| slope * x)
}

/// A cone with its apex at the grid centre: `z = peak - distance`.
///
/// Contours are (approximately) concentric circles.
pub fn create_cone_tin(n: usize, spacing: f64, peak: f64) -> Vec<RawTriangle> {
    let centre = n as f64 * spacing / 2.0;
    create_grid_tin(n, n, spacing, |x, y| {
        peak - ((x - centre).powi(2) + (y - centre).powi(2)).sqrt()
    })
}

/// Rolling hills with several peaks and pits in `[-1, 1]`.
pub fn create_hills_tin(n: usize, spacing: f64) -> Vec<RawTriangle> {
    let extent = n as f64 * spacing;
    create_grid_tin(n, n, spacing, |x, y| {
        let fx = x / extent * std::f64::consts::PI * 4.0;
        let fy = y / extent * std::f64::consts::PI * 4.0;
        0.5 * fx.sin() * fy.cos() + 0.3 * (0.5 * (fx + fy)).sin()
    })
}

/// A flat surface at a constant height.
pub fn create_flat_tin(n: usize, spacing: f64, z: f64) -> Vec<RawTriangle> {
    create_grid_tin(n, n, spacing, |_, _| z)
}

/// Hills with deterministic pseudo-random jitter added to every vertex.
///
/// The same seed always gives the same TIN.
pub fn create_noisy_tin(n: usize, spacing: f64, amplitude: f64, seed: u64) -> Vec<RawTriangle> {
    let extent = n as f64 * spacing;
    create_grid_tin(n, n, spacing, |x, y| {
        let fx = x / extent * std::f64::consts::PI * 4.0;
        let fy = y / extent * std::f64::consts::PI * 4.0;
        let base = 0.5 * fx.sin() * fy.cos();
        base + amplitude * hash_unit(x.to_bits() ^ y.to_bits().rotate_left(17), seed)
    })
}

/// Maps a key to `[-1, 1)` with a splitmix64-style mix.
fn hash_unit(key: u64, seed: u64) -> f64 {
    let mut z = key.wrapping_add(seed).wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^= z >> 31;
    (z >> 11) as f64 / (1u64 << 53) as f64 * 2.0 - 1.0
}
