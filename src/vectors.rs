//! Vector value types shared by the model plan and the solver field output.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Position in the global model frame, in millimetres.
///
/// The cross-section lies in the X/Y plane and the profile is extruded along Z.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate in the section plane.
    pub x: f64,
    /// Vertical coordinate in the section plane.
    pub y: f64,
    /// Coordinate along the span.
    pub z: f64,
}

impl Point {
    /// Create a [`Point`] with explicit coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Distance from this point to the longitudinal line through `(x, y)`.
    #[must_use]
    pub fn distance_to_line(self, x: f64, y: f64) -> f64 {
        (self.x - x).hypot(self.y - y)
    }
}

/// Position in the cross-section plane, in millimetres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectionPoint {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl SectionPoint {
    /// Create a [`SectionPoint`] with explicit coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Midpoint between two section points.
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Lift the point into the model frame at span position `z`.
    #[must_use]
    pub const fn at(self, z: f64) -> Point {
        Point::new(self.x, self.y, z)
    }
}

/// Nodal force in newtons.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Force {
    /// Component along the global X axis.
    pub x: f64,
    /// Component along the global Y axis.
    pub y: f64,
    /// Component along the global Z axis.
    pub z: f64,
}

impl Force {
    /// Create a [`Force`] with explicit components.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Convert the force into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Euclidean magnitude of the force.
    #[must_use]
    pub fn magnitude(self) -> f64 {
        self.to_vector().norm()
    }
}

impl Default for Force {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

impl From<Vector3<f64>> for Force {
    fn from(value: Vector3<f64>) -> Self {
        Self::new(value.x, value.y, value.z)
    }
}

/// Nodal translation in millimetres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Displacement {
    /// Translation along the global X axis (`U1`).
    pub x: f64,
    /// Translation along the global Y axis (`U2`), negative when the section sags.
    pub y: f64,
    /// Translation along the global Z axis (`U3`).
    pub z: f64,
}

impl Displacement {
    /// Create a [`Displacement`] with explicit components.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Downward deflection, i.e. the negated vertical component.
    #[must_use]
    pub fn deflection(self) -> f64 {
        -self.y
    }
}

impl Default for Displacement {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

/// Convenience helper for creating [`Point`] instances.
///
/// # Examples
/// ```
/// use profilex::point;
///
/// let origin = point(0.0, 0.0, 0.0);
/// assert_eq!(origin.z, 0.0);
/// ```
#[must_use]
pub const fn point(x: f64, y: f64, z: f64) -> Point {
    Point::new(x, y, z)
}

/// Convenience helper for creating [`Force`] instances.
#[must_use]
pub const fn force(x: f64, y: f64, z: f64) -> Force {
    Force::new(x, y, z)
}

/// Convenience helper for creating [`Displacement`] instances.
///
/// # Examples
/// ```
/// use profilex::displacement;
///
/// let sag = displacement(0.0, -2.5, 0.0);
/// assert_eq!(sag.deflection(), 2.5);
/// ```
#[must_use]
pub const fn displacement(x: f64, y: f64, z: f64) -> Displacement {
    Displacement::new(x, y, z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn force_magnitude_uses_all_components() {
        assert_eq!(force(3.0, 4.0, 12.0).magnitude(), 13.0);
    }

    #[test]
    fn deflection_is_reported_positive_downwards() {
        assert_eq!(displacement(0.1, -5.0, 0.0).deflection(), 5.0);
        assert_eq!(displacement(0.0, 1.5, 0.0).deflection(), -1.5);
    }

    #[test]
    fn section_midpoint_lifts_to_span_position() {
        let mid = SectionPoint::new(-10.0, 4.0).midpoint(SectionPoint::new(-6.0, 4.0));
        assert_eq!(mid.at(1850.0), point(-8.0, 4.0, 1850.0));
    }

    #[test]
    fn distance_to_line_ignores_span_position() {
        let p = point(-141.0, 0.5, 900.0);
        assert!((p.distance_to_line(-144.0, 0.5) - 3.0).abs() < 1.0e-12);
    }
}
