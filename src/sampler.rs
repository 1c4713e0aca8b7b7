//! Single-lattice gradient noise sampling.
//!
//! For a continuous point the four surrounding lattice corners each
//! contribute `gradient · (offset to the point)`, and the four dot products
//! are blended bilinearly with [`fade`]-shaped weights.

use crate::lattice::GradientLattice;

/// Quintic fade `6t⁵ − 15t⁴ + 10t³`.
///
/// First and second derivatives vanish at `t = 0` and `t = 1`, which hides
/// the lattice grid lines a linear blend would leave behind.
#[inline]
pub fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Sample `lattice` at `(x, y)` in lattice units.  Output lies in `[-1, 1]`
/// (in practice within `±√2/2`).
///
/// Corner indices wrap modulo the lattice side, so any finite coordinate is
/// safe.
pub fn sample(lattice: &GradientLattice, x: f64, y: f64) -> f64 {
    let fx = x.floor();
    let fy = y.floor();
    let ix = fx as i64;
    let iy = fy as i64;
    let dx = x - fx;
    let dy = y - fy;
    let u = fade(dx);
    let v = fade(dy);

    let mut acc = 0.0;
    for i in 0..2i64 {
        let wx = if i == 1 { u } else { 1.0 - u };
        let ox = dx - i as f64;
        for j in 0..2i64 {
            let wy = if j == 1 { v } else { 1.0 - v };
            let oy = dy - j as f64;
            let [gx, gy] = lattice.lookup(ix + i, iy + j);
            acc += (gx * ox + gy * oy) * wx * wy;
        }
    }
    acc
}
