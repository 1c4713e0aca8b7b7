//! Minimal 2-D shape composition for overlays.
//!
//! [`Transformable`] is implemented once per shape kind through a single
//! [`DAffine2`] hook; move/rotate/scale/shear are provided on top of it.
//! Shapes that need a tracked reference point carry a [`BasePoint`] inside
//! a [`Composite`] instead of inheriting one.

use bevy::math::{DAffine2, DMat2, DVec2};

use crate::{lattice::GradientLattice, terrain::Rgb};

/// Something that can be mapped through an affine transform.
///
/// Angles are in degrees, counter-clockwise.
pub trait Transformable {
    fn apply(&mut self, transform: DAffine2);

    /// Pivot used by the un-anchored operations.
    fn center(&self) -> DVec2;

    fn translate(&mut self, offset: DVec2) {
        self.apply(DAffine2::from_translation(offset));
    }

    fn rotate_about(&mut self, degrees: f64, pivot: DVec2) {
        self.apply(about(pivot, DAffine2::from_angle(degrees.to_radians())));
    }

    fn rotate(&mut self, degrees: f64) {
        let c = self.center();
        self.rotate_about(degrees, c);
    }

    fn scale_about(&mut self, factor: f64, pivot: DVec2) {
        self.apply(about(pivot, DAffine2::from_scale(DVec2::splat(factor))));
    }

    fn scale(&mut self, factor: f64) {
        let c = self.center();
        self.scale_about(factor, c);
    }

    /// Shear about the center: `x += kx·y`, `y += ky·x`.
    fn shear(&mut self, kx: f64, ky: f64) {
        let c = self.center();
        let m = DMat2::from_cols(DVec2::new(1.0, ky), DVec2::new(kx, 1.0));
        self.apply(about(c, DAffine2::from_mat2(m)));
    }
}

fn about(pivot: DVec2, t: DAffine2) -> DAffine2 {
    DAffine2::from_translation(pivot) * t * DAffine2::from_translation(-pivot)
}

/// Rotation (radians) and uniform scale of `m` if it is a proper similarity.
fn similarity(m: DMat2) -> Option<(f64, f64)> {
    let (a, b) = (m.x_axis, m.y_axis);
    let (la, lb) = (a.length(), b.length());
    let tol = 1e-9 * la.max(lb).max(1.0);
    if a.dot(b).abs() > tol || (la - lb).abs() > tol || m.determinant() <= 0.0 {
        return None;
    }
    Some((a.y.atan2(a.x), la))
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Point {
        at: DVec2,
        color: Rgb,
    },
    Polyline {
        points: Vec<DVec2>,
        color: Rgb,
    },
    /// Closed; the first vertex is not repeated.
    Polygon {
        points: Vec<DVec2>,
        color: Rgb,
    },
    /// Counter-clockwise from `start_deg` to `end_deg`.  An `end_deg` at
    /// least a full turn past `start_deg` draws the whole circle.
    Arc {
        center: DVec2,
        radius: f64,
        start_deg: f64,
        end_deg: f64,
        color: Rgb,
    },
}

/// Counter-clockwise sweep in degrees, `[0, 360]`.
fn arc_sweep(start_deg: f64, end_deg: f64) -> f64 {
    let d = end_deg - start_deg;
    if d >= 360.0 {
        360.0
    } else {
        d.rem_euclid(360.0)
    }
}

impl Shape {
    pub fn color(&self) -> Rgb {
        match self {
            Shape::Point { color, .. }
            | Shape::Polyline { color, .. }
            | Shape::Polygon { color, .. }
            | Shape::Arc { color, .. } => *color,
        }
    }

    pub fn set_color(&mut self, new: Rgb) {
        match self {
            Shape::Point { color, .. }
            | Shape::Polyline { color, .. }
            | Shape::Polygon { color, .. }
            | Shape::Arc { color, .. } => *color = new,
        }
    }

    /// Approximate an arc by a polyline with segments about two units long.
    /// Other shapes are returned unchanged.
    pub fn flatten(&self) -> Shape {
        let Shape::Arc {
            center,
            radius,
            start_deg,
            end_deg,
            color,
        } = *self
        else {
            return self.clone();
        };
        let sweep = arc_sweep(start_deg, end_deg).to_radians();
        let start = start_deg.to_radians();
        let segments = ((radius * sweep) as usize / 2).max(2);
        let points = (0..=segments)
            .map(|i| {
                let a = start + sweep * i as f64 / segments as f64;
                center + radius * DVec2::new(a.cos(), a.sin())
            })
            .collect();
        Shape::Polyline { points, color }
    }
}

fn mean(points: &[DVec2]) -> DVec2 {
    if points.is_empty() {
        return DVec2::ZERO;
    }
    points.iter().copied().sum::<DVec2>() / points.len() as f64
}

impl Transformable for Shape {
    fn apply(&mut self, t: DAffine2) {
        match self {
            Shape::Point { at, .. } => *at = t.transform_point2(*at),
            Shape::Polyline { points, .. } | Shape::Polygon { points, .. } => {
                for p in points.iter_mut() {
                    *p = t.transform_point2(*p);
                }
            }
            Shape::Arc {
                center,
                radius,
                start_deg,
                end_deg,
                ..
            } => match similarity(t.matrix2) {
                Some((angle, scale)) => {
                    *center = t.transform_point2(*center);
                    *radius *= scale;
                    let sweep = arc_sweep(*start_deg, *end_deg);
                    *start_deg = (*start_deg + angle.to_degrees()).rem_euclid(360.0);
                    *end_deg = *start_deg + sweep;
                }
                // A sheared or mirrored circle is no longer an arc.
                None => {
                    let mut flat = self.flatten();
                    flat.apply(t);
                    *self = flat;
                }
            },
        }
    }

    fn center(&self) -> DVec2 {
        match self {
            Shape::Point { at, .. } => *at,
            Shape::Polyline { points, .. } | Shape::Polygon { points, .. } => mean(points),
            Shape::Arc { center, .. } => *center,
        }
    }
}

/// A tracked reference point and heading that follows its shape's transforms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BasePoint {
    pub point: DVec2,
    /// Heading in degrees, counter-clockwise from +x.
    pub angle_deg: f64,
}

impl BasePoint {
    fn apply(&mut self, t: DAffine2) {
        let tip = t.transform_point2(self.point + DVec2::from_angle(self.angle_deg.to_radians()));
        self.point = t.transform_point2(self.point);
        let dir = tip - self.point;
        self.angle_deg = dir.y.atan2(dir.x).to_degrees().rem_euclid(360.0);
    }
}

/// Several shapes moved as one, optionally anchored at a [`BasePoint`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Composite {
    pub parts: Vec<Shape>,
    pub base: Option<BasePoint>,
}

impl Composite {
    pub fn new(parts: Vec<Shape>) -> Self {
        Self { parts, base: None }
    }

    pub fn with_base(mut self, base: BasePoint) -> Self {
        self.base = Some(base);
        self
    }

    pub fn set_color(&mut self, color: Rgb) {
        for part in &mut self.parts {
            part.set_color(color);
        }
    }
}

impl Transformable for Composite {
    fn apply(&mut self, t: DAffine2) {
        for part in &mut self.parts {
            part.apply(t);
        }
        if let Some(base) = &mut self.base {
            base.apply(t);
        }
    }

    /// The base point when present, else the mean of the part centers.
    fn center(&self) -> DVec2 {
        match &self.base {
            Some(base) => base.point,
            None => mean(&self.parts.iter().map(Shape::center).collect::<Vec<_>>()),
        }
    }
}

/// One arrow glyph per lattice gradient, laid out on a grid of `cell` units
/// starting at `origin`.  Each arrow is based at its lattice point and
/// headed along its gradient.
pub fn gradient_arrows(
    lattice: &GradientLattice,
    origin: DVec2,
    cell: f64,
    length: f64,
    color: Rgb,
) -> Vec<Composite> {
    lattice
        .iter()
        .map(|(ix, iy, [gx, gy])| {
            let base = origin + DVec2::new(ix as f64, iy as f64) * cell;
            let dir = DVec2::new(gx, gy);
            let tip = base + dir * length;
            let head = length * 0.25;
            let left = tip + DVec2::from_angle(150f64.to_radians()).rotate(dir) * head;
            let right = tip + DVec2::from_angle(-150f64.to_radians()).rotate(dir) * head;
            Composite::new(vec![
                Shape::Polyline {
                    points: vec![base, tip],
                    color,
                },
                Shape::Polyline {
                    points: vec![left, tip, right],
                    color,
                },
            ])
            .with_base(BasePoint {
                point: base,
                angle_deg: gy.atan2(gx).to_degrees().rem_euclid(360.0),
            })
        })
        .collect()
}

/// Subdivide each segment of `points` into pieces no longer than about `length`.
///
/// Segments shorter than `length` are kept whole.
pub fn interpolate_with_length(points: &[DVec2], length: f64) -> Vec<DVec2> {
    let Some(&first) = points.first() else {
        return Vec::new();
    };
    let mut out = vec![first];
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let n = if length > 0.0 {
            ((a.distance(b) / length) as usize).max(1)
        } else {
            1
        };
        out.extend((1..=n).map(|i| a.lerp(b, i as f64 / n as f64)));
    }
    out
}
