//! Vertex types and attributes.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// RGB display colour with floating point components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VertexColor {
    /// Red component.
    pub r: f32,
    /// Green component.
    pub g: f32,
    /// Blue component.
    pub b: f32,
}

impl VertexColor {
    /// Create a colour from components, clamping each into `[0, 1]`.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::VertexColor;
    ///
    /// let c = VertexColor::new(1.5, 0.5, -0.2);
    /// assert_eq!(c.to_array(), [1.0, 0.5, 0.0]);
    /// ```
    #[inline]
    #[must_use]
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
        }
    }

    /// Create a colour without clamping. Intended for palette constants.
    #[inline]
    #[must_use]
    pub const fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Components as `[r, g, b]`.
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[f32; 3]> for VertexColor {
    fn from([r, g, b]: [f32; 3]) -> Self {
        Self::new(r, g, b)
    }
}

/// Optional attributes attached to a vertex.
///
/// - `label`: tissue class identifier assigned by the labeller
/// - `color`: display colour derived from the label (or overridden by the
///   simulator for resected tissue)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VertexAttributes {
    /// Tissue class identifier.
    pub label: Option<u8>,

    /// Display colour.
    pub color: Option<VertexColor>,
}

impl VertexAttributes {
    /// Attributes with nothing set.
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            label: None,
            color: None,
        }
    }

    /// Attributes carrying a label and its colour.
    #[inline]
    #[must_use]
    pub const fn labeled(label: u8, color: VertexColor) -> Self {
        Self {
            label: Some(label),
            color: Some(color),
        }
    }

    /// Check if no attribute is set.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.label.is_none() && self.color.is_none()
    }
}

/// A vertex in 3D space with optional attributes.
///
/// # Example
///
/// ```
/// use mesh_types::{Vertex, Point3};
///
/// let v1 = Vertex::new(Point3::new(1.0, 2.0, 3.0));
/// let v2 = Vertex::from_coords(1.0, 2.0, 3.0);
///
/// assert_eq!(v1.position, v2.position);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vertex {
    /// 3D position.
    pub position: Point3<f64>,

    /// Optional attributes (label, colour).
    pub attributes: VertexAttributes,
}

impl Vertex {
    /// Create a vertex with only its position set.
    #[inline]
    #[must_use]
    pub const fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            attributes: VertexAttributes::empty(),
        }
    }

    /// Create a vertex from raw coordinates.
    #[inline]
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Point3::new is not const in nalgebra
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }

    /// Create a labelled, coloured vertex.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Vertex, VertexColor, Point3};
    ///
    /// let v = Vertex::labeled(Point3::origin(), 3, VertexColor::from_rgb(0.9, 0.2, 0.2));
    /// assert_eq!(v.label(), Some(3));
    /// ```
    #[inline]
    #[must_use]
    pub const fn labeled(position: Point3<f64>, label: u8, color: VertexColor) -> Self {
        Self {
            position,
            attributes: VertexAttributes::labeled(label, color),
        }
    }

    /// Get the label if set.
    #[inline]
    #[must_use]
    pub const fn label(&self) -> Option<u8> {
        self.attributes.label
    }

    /// Get the colour if set.
    #[inline]
    #[must_use]
    pub const fn color(&self) -> Option<VertexColor> {
        self.attributes.color
    }
}

impl From<Point3<f64>> for Vertex {
    fn from(position: Point3<f64>) -> Self {
        Self::new(position)
    }
}

impl From<[f64; 3]> for Vertex {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::from_coords(x, y, z)
    }
}
