//! Boundary conditions of the simply supported profile.
//!
//! Supports are planned by segment tag. Every tag resolves to the exact
//! coordinates computed by [`DerivedGeometry`], so the plan does not depend on
//! how finely the faces are meshed.

use serde::{Deserialize, Serialize};

use crate::geometry::{DerivedGeometry, EdgeRef, Half, Level, SegmentTag, Side, SpanEnd};
use crate::vectors::Point;

/// Degree-of-freedom mask ordered `u1, u2, u3, ur1, ur2, ur3`; `true` means fixed.
pub type DofMask = [bool; 6];

/// All six degrees of freedom fixed.
pub const CLAMPED: DofMask = [true; 6];

/// `u1`, `u3` and `ur2` fixed; enough to remove the rigid-body modes left by
/// the line supports.
pub const RIGID_BODY: DofMask = [true, false, true, false, true, false];

/// Constraint applied to a set of edges.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeConstraint {
    /// Boundary condition name in the solver model.
    pub name: String,
    /// Constrained edges.
    pub edges: Vec<EdgeRef>,
    /// Fixed degrees of freedom.
    pub fixed: DofMask,
}

/// Constraint applied to a single vertex.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VertexConstraint {
    /// Boundary condition name in the solver model.
    pub name: String,
    /// Canonical vertex index (0-based).
    pub vertex: usize,
    /// Location of the constrained vertex.
    pub locator: Point,
    /// Fixed degrees of freedom.
    pub fixed: DofMask,
}

/// Boundary conditions of one analysis step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BcPlan {
    /// Line supports at both span ends.
    supported_lines: EdgeConstraint,
    /// Single-vertex constraint against rigid-body motion.
    rigid_body: VertexConstraint,
}

impl BcPlan {
    /// Plan the supports of `geometry`.
    ///
    /// Both top flange halves of each I-profile half and both T-web segments are
    /// clamped at `z = 0` and `z = length`. The top outer corner of the left
    /// I-flange at `z = length` is additionally restrained against in-plane
    /// rigid-body motion.
    #[must_use]
    pub fn new(geometry: &DerivedGeometry) -> Self {
        let mut edges = Vec::with_capacity(12);
        for end in [SpanEnd::Start, SpanEnd::End] {
            for segment in supported_segments() {
                edges.push(geometry.edge(segment, end));
            }
        }
        let corner = SegmentTag::i_flange(Side::Left, Level::Top, Half::Outer);
        let (vertex, _) = geometry.endpoints(corner);
        Self {
            supported_lines: EdgeConstraint {
                name: "vertical supported lines".to_owned(),
                edges,
                fixed: CLAMPED,
            },
            rigid_body: VertexConstraint {
                name: "rigid body modes".to_owned(),
                vertex: 0,
                locator: vertex.at(geometry.span_position(SpanEnd::End)),
                fixed: RIGID_BODY,
            },
        }
    }

    /// Line supports at both span ends.
    #[must_use]
    pub const fn supported_lines(&self) -> &EdgeConstraint {
        &self.supported_lines
    }

    /// Constraint against rigid-body motion.
    #[must_use]
    pub const fn rigid_body(&self) -> &VertexConstraint {
        &self.rigid_body
    }
}

/// Segments whose end edges carry the line supports.
fn supported_segments() -> impl Iterator<Item = SegmentTag> {
    [Side::Left, Side::Right].into_iter().flat_map(|side| {
        [
            SegmentTag::i_flange(side, Level::Top, Half::Outer),
            SegmentTag::i_flange(side, Level::Top, Half::Inner),
            SegmentTag::TWeb { side },
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProfileConfig;
    use crate::section::CrossSectionParameters;
    use crate::vectors::SectionPoint;

    fn plan() -> (BcPlan, DerivedGeometry) {
        let params = CrossSectionParameters::from_config(&ProfileConfig::default())
            .expect("default profile is valid");
        let geometry = DerivedGeometry::new(&params);
        (BcPlan::new(&geometry), geometry)
    }

    #[test]
    fn supports_cover_both_span_ends() {
        let (plan, _) = plan();
        let lines = plan.supported_lines();
        assert_eq!(lines.name, "vertical supported lines");
        assert_eq!(lines.fixed, CLAMPED);
        assert_eq!(lines.edges.len(), 12);
        let at_start = lines.edges.iter().filter(|e| e.end == SpanEnd::Start).count();
        assert_eq!(at_start, 6);
        assert!(lines
            .edges
            .iter()
            .all(|e| e.locator.z == 0.0 || e.locator.z == 3700.0));
    }

    #[test]
    fn supports_lie_on_the_top_flange_level() {
        let (plan, geometry) = plan();
        let level = geometry.stations().y1_i;
        assert!(plan
            .supported_lines()
            .edges
            .iter()
            .all(|e| e.locator.y == level));
    }

    #[test]
    fn supports_are_mirrored() {
        let (plan, _) = plan();
        let xs: Vec<f64> = plan
            .supported_lines()
            .edges
            .iter()
            .map(|e| e.locator.x)
            .collect();
        assert_eq!(xs.iter().sum::<f64>(), 0.0);
        assert!(xs.contains(&-40.0) && xs.contains(&40.0));
    }

    #[test]
    fn rigid_body_vertex_sits_at_far_end_corner() {
        let (plan, geometry) = plan();
        let rigid = plan.rigid_body();
        assert_eq!(rigid.name, "rigid body modes");
        assert_eq!(rigid.fixed, RIGID_BODY);
        assert_eq!(rigid.fixed.iter().filter(|&&fixed| fixed).count(), 3);
        let s = geometry.stations();
        assert_eq!(rigid.locator, Point::new(-s.x1_i, s.y1_i, 3700.0));
        assert_eq!(
            geometry.vertices().nth(rigid.vertex),
            Some(SectionPoint::new(-s.x1_i, s.y1_i))
        );
    }
}
