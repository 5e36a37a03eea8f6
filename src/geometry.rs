//! Points, rectangles and the affine transform shared by the view,
//! hit-testing and the render targets. Document space is y-down.

use std::ops::{Add, Sub};

/// A point in device or document space. Also used for deltas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned rectangle stored as edge coordinates, `left <= right`
/// and `top <= bottom` for every rectangle produced by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Rect {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle from a top-left corner plus extents.
    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect::new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Closed containment test: points on the edges are inside.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    /// Shifts the rectangle by a delta without changing its size.
    pub fn offset(&mut self, delta: Point) {
        self.left += delta.x;
        self.top += delta.y;
        self.right += delta.x;
        self.bottom += delta.y;
    }
}

/// Affine 2D transform
///
/// ```text
/// | sx kx tx |
/// | ky sy ty |
/// ```
///
/// mapping `(x, y)` to `(sx*x + kx*y + tx, ky*x + sy*y + ty)`. The skew
/// terms are carried for completeness; pan, zoom and fit only ever
/// produce scale and translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub sx: f32,
    pub kx: f32,
    pub ky: f32,
    pub sy: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Transform::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Transform {
            sx: 1.0,
            kx: 0.0,
            ky: 0.0,
            sy: 1.0,
            tx: 0.0,
            ty: 0.0,
        }
    }

    pub fn from_translate(tx: f32, ty: f32) -> Self {
        Transform {
            tx,
            ty,
            ..Transform::identity()
        }
    }

    pub fn from_scale(sx: f32, sy: f32) -> Self {
        Transform {
            sx,
            sy,
            ..Transform::identity()
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Transform::identity()
    }

    pub fn map_point(&self, p: Point) -> Point {
        Point::new(
            self.sx * p.x + self.kx * p.y + self.tx,
            self.ky * p.x + self.sy * p.y + self.ty,
        )
    }

    /// `self * other`: `other` is applied first, then `self`.
    pub fn pre_concat(&self, other: Transform) -> Transform {
        Transform {
            sx: self.sx * other.sx + self.kx * other.ky,
            kx: self.sx * other.kx + self.kx * other.sy,
            tx: self.sx * other.tx + self.kx * other.ty + self.tx,
            ky: self.ky * other.sx + self.sy * other.ky,
            sy: self.ky * other.kx + self.sy * other.sy,
            ty: self.ky * other.tx + self.sy * other.ty + self.ty,
        }
    }

    /// `other * self`: `self` is applied first, then `other`.
    pub fn post_concat(&self, other: Transform) -> Transform {
        other.pre_concat(*self)
    }

    pub fn pre_translate(&self, tx: f32, ty: f32) -> Transform {
        self.pre_concat(Transform::from_translate(tx, ty))
    }

    /// Determinant of the linear part, computed in f64 so deep zoom-out
    /// does not round a small-but-real determinant to zero.
    fn determinant(&self) -> f64 {
        self.sx as f64 * self.sy as f64 - self.kx as f64 * self.ky as f64
    }

    /// Inverse transform, or `None` when the matrix is degenerate.
    pub fn invert(&self) -> Option<Transform> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv = 1.0 / det;
        let sx = (self.sy as f64 * inv) as f32;
        let kx = (-self.kx as f64 * inv) as f32;
        let ky = (-self.ky as f64 * inv) as f32;
        let sy = (self.sx as f64 * inv) as f32;
        let tx = ((self.kx as f64 * self.ty as f64 - self.sy as f64 * self.tx as f64) * inv) as f32;
        let ty = ((self.ky as f64 * self.tx as f64 - self.sx as f64 * self.ty as f64) * inv) as f32;
        Some(Transform {
            sx,
            kx,
            ky,
            sy,
            tx,
            ty,
        })
    }
}
