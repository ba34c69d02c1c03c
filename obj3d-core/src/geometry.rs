//! Geometry value types shared by the decoder and its consumers
use nalgebra::{Point3, Vector3};

/// A float triple: position, normal, texture coordinate or color
pub type Tuple3 = Vector3<f32>;

/// Running axis-aligned extents of the model.
///
/// Created from the first vertex and only ever widened afterwards. Sizes and
/// the center are computed on demand so they can't drift from the bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingExtents {
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
    far: f32,
    near: f32,
}

impl BoundingExtents {
    /// Extents collapsed onto a single point
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            left: x,
            right: x,
            bottom: y,
            top: y,
            far: z,
            near: z,
        }
    }

    /// Reset all six bounds to the given point
    pub fn set(&mut self, x: f32, y: f32, z: f32) {
        *self = Self::new(x, y, z);
    }

    /// Widen the bounds to include the given point
    pub fn update(&mut self, x: f32, y: f32, z: f32) {
        self.right = self.right.max(x);
        self.left = self.left.min(x);

        self.top = self.top.max(y);
        self.bottom = self.bottom.min(y);

        self.near = self.near.max(z);
        self.far = self.far.min(z);
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    pub fn depth(&self) -> f32 {
        self.near - self.far
    }

    /// The largest of width, height and depth
    pub fn largest(&self) -> f32 {
        self.width().max(self.height()).max(self.depth())
    }

    pub fn center(&self) -> Point3<f32> {
        Point3::new(
            (self.right + self.left) / 2.0,
            (self.top + self.bottom) / 2.0,
            (self.near + self.far) / 2.0,
        )
    }

    pub fn min(&self) -> Point3<f32> {
        Point3::new(self.left, self.bottom, self.far)
    }

    pub fn max(&self) -> Point3<f32> {
        Point3::new(self.right, self.top, self.near)
    }
}
