//! Cross-section geometry of the combined profile.
//!
//! The I-profile is split into two mirrored halves lying on their side at
//! `x < 0` and `x > 0`. Each half has a top flange at `y = y1_I`, a bottom flange
//! at `y = 0` and a vertical web at `x = ±x2_I`. The bottom flanges are joined by
//! the connecting flange, the top flanges by the T-web, and the T-flange stands
//! vertically on `x = 0`. The section is extruded along `z` over the span.
//!
//! Every segment carries a [`SegmentTag`]; downstream planners refer to regions
//! by tag only and never compare coordinates.

use std::collections::HashMap;
use std::fmt;

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};

use crate::config::Dimensions;
use crate::section::CrossSectionParameters;
use crate::vectors::{Point, SectionPoint};

/// Mirrored half of the section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    /// Half at negative `x`.
    Left,
    /// Half at positive `x`.
    Right,
}

/// Flange level of the I-profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    /// Flange at `y = y1_I`.
    Top,
    /// Flange at `y = 0`.
    Bottom,
}

/// Part of an I-flange relative to the web.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Half {
    /// Between the web and the free flange edge.
    Outer,
    /// Between the web and the T-profile.
    Inner,
}

/// Part of the T-flange relative to the T-web.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Reach {
    /// Above the T-web.
    Upper,
    /// Below the T-web.
    Lower,
}

/// Semantic name of one of the fifteen section segments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SegmentTag {
    /// One half of an I-flange.
    IFlange {
        /// Mirrored half of the section.
        side: Side,
        /// Flange level.
        level: Level,
        /// Position relative to the web.
        half: Half,
    },
    /// One of the two I-webs.
    IWeb {
        /// Mirrored half of the section.
        side: Side,
    },
    /// One of the two T-web segments joining the top I-flanges.
    TWeb {
        /// Mirrored half of the section.
        side: Side,
    },
    /// One of the two T-flange segments.
    TFlange {
        /// Position relative to the T-web.
        reach: Reach,
    },
    /// Bottom flange joining both I-profile halves.
    ConnectingFlange,
}

impl SegmentTag {
    /// All tags in sketch order.
    pub const ALL: [SegmentTag; 15] = [
        Self::i_flange(Side::Left, Level::Top, Half::Outer),
        Self::i_flange(Side::Left, Level::Top, Half::Inner),
        Self::TWeb { side: Side::Left },
        Self::TWeb { side: Side::Right },
        Self::i_flange(Side::Right, Level::Top, Half::Inner),
        Self::i_flange(Side::Right, Level::Top, Half::Outer),
        Self::IWeb { side: Side::Left },
        Self::TFlange { reach: Reach::Upper },
        Self::TFlange { reach: Reach::Lower },
        Self::IWeb { side: Side::Right },
        Self::i_flange(Side::Right, Level::Bottom, Half::Outer),
        Self::i_flange(Side::Right, Level::Bottom, Half::Inner),
        Self::ConnectingFlange,
        Self::i_flange(Side::Left, Level::Bottom, Half::Inner),
        Self::i_flange(Side::Left, Level::Bottom, Half::Outer),
    ];

    /// Shorthand for an I-flange tag.
    #[must_use]
    pub const fn i_flange(side: Side, level: Level, half: Half) -> Self {
        Self::IFlange { side, level, half }
    }

    /// Shell section the face extruded from this segment belongs to.
    #[must_use]
    pub const fn section(self) -> SectionKind {
        match self {
            Self::IFlange { .. } | Self::ConnectingFlange => SectionKind::IFlange,
            Self::IWeb { .. } => SectionKind::IWeb,
            Self::TWeb { .. } | Self::TFlange { .. } => SectionKind::TSection,
        }
    }

    /// Canonical vertex indices (0-based) of the segment end points.
    const fn vertex_pair(self) -> (usize, usize) {
        match self {
            Self::IFlange { side, level, half } => match (side, level, half) {
                (Side::Left, Level::Top, Half::Outer) => (0, 1),
                (Side::Left, Level::Top, Half::Inner) => (2, 1),
                (Side::Right, Level::Top, Half::Inner) => (12, 13),
                (Side::Right, Level::Top, Half::Outer) => (13, 14),
                (Side::Right, Level::Bottom, Half::Outer) => (17, 16),
                (Side::Right, Level::Bottom, Half::Inner) => (16, 15),
                (Side::Left, Level::Bottom, Half::Inner) => (5, 4),
                (Side::Left, Level::Bottom, Half::Outer) => (4, 3),
            },
            Self::TWeb { side: Side::Left } => (7, 2),
            Self::TWeb { side: Side::Right } => (7, 12),
            Self::IWeb { side: Side::Left } => (1, 4),
            Self::IWeb { side: Side::Right } => (13, 16),
            Self::TFlange { reach: Reach::Upper } => (6, 7),
            Self::TFlange { reach: Reach::Lower } => (7, 8),
            Self::ConnectingFlange => (15, 5),
        }
    }
}

impl fmt::Display for SegmentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = |side: &Side| match side {
            Side::Left => "left",
            Side::Right => "right",
        };
        match self {
            Self::IFlange { side: s, level, half } => {
                let level = match level {
                    Level::Top => "top",
                    Level::Bottom => "bottom",
                };
                let half = match half {
                    Half::Outer => "outer",
                    Half::Inner => "inner",
                };
                write!(f, "I-flange-{level}-{}-{half}", side(s))
            }
            Self::IWeb { side: s } => write!(f, "I-web-{}", side(s)),
            Self::TWeb { side: s } => write!(f, "T-web-{}", side(s)),
            Self::TFlange { reach: Reach::Upper } => f.write_str("T-flange-upper"),
            Self::TFlange { reach: Reach::Lower } => f.write_str("T-flange-lower"),
            Self::ConnectingFlange => f.write_str("connecting-flange"),
        }
    }
}

/// Homogeneous shell section of the combined profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionKind {
    /// I-flanges and the connecting flange, thickness `dt1`.
    IFlange,
    /// I-webs, thickness `ds1`.
    IWeb,
    /// T-web and T-flange, thickness `dt2`.
    TSection,
}

impl SectionKind {
    /// All sections in assignment order.
    pub const ALL: [SectionKind; 3] = [Self::IFlange, Self::IWeb, Self::TSection];

    /// Shell thickness of the section.
    #[must_use]
    pub const fn thickness(self, dimensions: &Dimensions) -> f64 {
        match self {
            Self::IFlange => dimensions.dt1,
            Self::IWeb => dimensions.ds1,
            Self::TSection => dimensions.dt2,
        }
    }

    /// Suffix of the section name in the solver model.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::IFlange => "I-Section-Flange",
            Self::IWeb => "I-Section-Web",
            Self::TSection => "T-Section",
        }
    }
}

/// End of the span an edge lies on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpanEnd {
    /// `z = 0`.
    Start,
    /// `z = length`.
    End,
}

/// Edge of a section segment at one end of the span.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeRef {
    /// Segment the edge belongs to.
    pub segment: SegmentTag,
    /// Span end the edge lies on.
    pub end: SpanEnd,
    /// Midpoint of the edge.
    pub locator: Point,
}

/// Helper coordinates locating the section vertices.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stations {
    /// Free edge of the I-flanges, `dh2 + dw1`.
    pub x1_i: f64,
    /// I-web position, `dh2 + dw1 / 2`.
    pub x2_i: f64,
    /// Inner edge of the I-flanges, `dh2`.
    pub x3_i: f64,
    /// Top I-flange level, `dh1 - dt1`.
    pub y1_i: f64,
    /// T-flange position.
    pub x1_t: f64,
    /// Upper tip of the T-flange.
    pub y1_t: f64,
    /// T-web level.
    pub y2_t: f64,
    /// Lower tip of the T-flange.
    pub y3_t: f64,
}

impl Stations {
    /// Compute the helper coordinates from the nominal dimensions.
    #[must_use]
    pub fn new(d: &Dimensions) -> Self {
        let y1_i = d.dh1 - d.dt1;
        Self {
            x1_i: d.dh2 + d.dw1,
            x2_i: d.dh2 + d.dw1 / 2.0,
            x3_i: d.dh2,
            y1_i,
            x1_t: 0.0,
            y1_t: y1_i + d.dw2 / 2.0,
            y2_t: y1_i,
            y3_t: y1_i - d.dw2 / 2.0,
        }
    }

    /// The eighteen canonical sketch vertices.
    ///
    /// Vertices 10 to 12 repeat 7 to 9; both T-flange ends are listed once for
    /// each I-profile half.
    #[must_use]
    pub fn vertices(&self) -> [SectionPoint; 18] {
        let p = SectionPoint::new;
        [
            p(-self.x1_i, self.y1_i),
            p(-self.x2_i, self.y1_i),
            p(-self.x3_i, self.y1_i),
            p(-self.x1_i, 0.0),
            p(-self.x2_i, 0.0),
            p(-self.x3_i, 0.0),
            p(self.x1_t, self.y1_t),
            p(self.x1_t, self.y2_t),
            p(self.x1_t, self.y3_t),
            p(self.x1_t, self.y1_t),
            p(self.x1_t, self.y2_t),
            p(self.x1_t, self.y3_t),
            p(self.x3_i, self.y1_i),
            p(self.x2_i, self.y1_i),
            p(self.x1_i, self.y1_i),
            p(self.x3_i, 0.0),
            p(self.x2_i, 0.0),
            p(self.x1_i, 0.0),
        ]
    }
}

/// Vertex and segment description of the combined section.
///
/// The value is a pure function of the dimensions: identical inputs produce
/// bit-identical geometry.
#[derive(Clone, Debug)]
pub struct DerivedGeometry {
    /// Helper coordinates.
    stations: Stations,
    /// Extrusion depth.
    length: f64,
    /// Sketch vertices (nodes) and segments (edges).
    sketch: UnGraph<SectionPoint, SegmentTag>,
    /// Segment arena indexed by tag.
    segments: HashMap<SegmentTag, EdgeIndex>,
}

impl DerivedGeometry {
    /// Derive the geometry of a validated profile.
    ///
    /// # Examples
    /// ```
    /// use profilex::{config::ProfileConfig, CrossSectionParameters, DerivedGeometry};
    ///
    /// let params = CrossSectionParameters::from_config(&ProfileConfig::default())
    ///     .expect("default profile is valid");
    /// let geometry = DerivedGeometry::new(&params);
    /// assert_eq!(geometry.vertex_count(), 18);
    /// assert_eq!(geometry.segment_count(), 15);
    /// ```
    #[must_use]
    pub fn new(params: &CrossSectionParameters) -> Self {
        Self::from_dimensions(params.dimensions())
    }

    /// Build the sketch graph from the dimensions.
    fn from_dimensions(dimensions: &Dimensions) -> Self {
        let stations = Stations::new(dimensions);
        let mut sketch = UnGraph::with_capacity(18, SegmentTag::ALL.len());
        let nodes: Vec<NodeIndex> = stations
            .vertices()
            .into_iter()
            .map(|vertex| sketch.add_node(vertex))
            .collect();
        let segments = SegmentTag::ALL
            .into_iter()
            .map(|tag| {
                let (start, end) = tag.vertex_pair();
                (tag, sketch.add_edge(nodes[start], nodes[end], tag))
            })
            .collect();
        Self {
            stations,
            length: dimensions.length,
            sketch,
            segments,
        }
    }

    /// Helper coordinates.
    #[must_use]
    pub const fn stations(&self) -> &Stations {
        &self.stations
    }

    /// Extrusion depth (span length).
    #[must_use]
    pub const fn length(&self) -> f64 {
        self.length
    }

    /// Number of canonical vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.sketch.node_count()
    }

    /// Number of segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.sketch.edge_count()
    }

    /// Canonical vertices in sketch order.
    pub fn vertices(&self) -> impl Iterator<Item = SectionPoint> + '_ {
        self.sketch.node_weights().copied()
    }

    /// Segments in sketch order with their end points.
    pub fn segments(&self) -> impl Iterator<Item = (SegmentTag, SectionPoint, SectionPoint)> + '_ {
        SegmentTag::ALL.into_iter().map(move |tag| {
            let (start, end) = self.endpoints(tag);
            (tag, start, end)
        })
    }

    /// End points of a segment.
    #[must_use]
    pub fn endpoints(&self, tag: SegmentTag) -> (SectionPoint, SectionPoint) {
        let (start, end) = self
            .sketch
            .edge_endpoints(self.segments[&tag])
            .expect("every tag is inserted at construction");
        (self.sketch[start], self.sketch[end])
    }

    /// Midpoint of a segment, the coordinate used to identify it.
    #[must_use]
    pub fn midpoint(&self, tag: SegmentTag) -> SectionPoint {
        let (start, end) = self.endpoints(tag);
        start.midpoint(end)
    }

    /// Length of a segment in the section plane.
    #[must_use]
    pub fn segment_width(&self, tag: SegmentTag) -> f64 {
        let (start, end) = self.endpoints(tag);
        (end.x - start.x).hypot(end.y - start.y)
    }

    /// A point inside the face extruded from `tag`, at mid-span.
    #[must_use]
    pub fn face_locator(&self, tag: SegmentTag) -> Point {
        self.midpoint(tag).at(self.length / 2.0)
    }

    /// A point on the edge of `tag` at one end of the span.
    #[must_use]
    pub fn edge_locator(&self, tag: SegmentTag, end: SpanEnd) -> Point {
        self.midpoint(tag).at(self.span_position(end))
    }

    /// The edge of `tag` at one end of the span.
    #[must_use]
    pub fn edge(&self, tag: SegmentTag, end: SpanEnd) -> EdgeRef {
        EdgeRef {
            segment: tag,
            end,
            locator: self.edge_locator(tag, end),
        }
    }

    /// `z` coordinate of a span end.
    #[must_use]
    pub fn span_position(&self, end: SpanEnd) -> f64 {
        match end {
            SpanEnd::Start => 0.0,
            SpanEnd::End => self.length,
        }
    }

    /// Mid-span points of the longitudinal edges, one per distinct vertex.
    ///
    /// The repeated T-flange vertices produce a single edge each, so fifteen
    /// edges are returned.
    #[must_use]
    pub fn longitudinal_edges(&self) -> Vec<Point> {
        let mut distinct: Vec<SectionPoint> = Vec::with_capacity(self.vertex_count());
        for vertex in self.vertices() {
            if !distinct.contains(&vertex) {
                distinct.push(vertex);
            }
        }
        distinct
            .into_iter()
            .map(|vertex| vertex.at(self.length / 2.0))
            .collect()
    }

    /// Segment whose midpoint is exactly `point`.
    ///
    /// Solver adapters that select entities by location use this to map a
    /// coordinate back onto a tag; no tolerance is applied.
    #[must_use]
    pub fn tag_at(&self, point: SectionPoint) -> Option<SegmentTag> {
        SegmentTag::ALL
            .into_iter()
            .find(|&tag| self.midpoint(tag) == point)
    }

    /// Section-plane location of the reference fiber line, the bottom outer
    /// corner of the left I-flange.
    #[must_use]
    pub fn fiber_line(&self) -> SectionPoint {
        SectionPoint::new(-self.stations.x1_i, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::config::ProfileConfig;

    fn cp3() -> DerivedGeometry {
        let params = CrossSectionParameters::from_config(&ProfileConfig::default())
            .expect("default profile is valid");
        DerivedGeometry::new(&params)
    }

    #[test]
    fn stations_follow_dimensions() {
        let geometry = cp3();
        let s = geometry.stations();
        assert_eq!(s.x1_i, 144.0);
        assert_eq!(s.x2_i, 112.0);
        assert_eq!(s.x3_i, 80.0);
        assert_relative_eq!(s.y1_i, 113.7, epsilon = 1.0e-12);
        assert_relative_eq!(s.y1_t, 153.7, epsilon = 1.0e-12);
        assert_relative_eq!(s.y3_t, 73.7, epsilon = 1.0e-12);
        assert_eq!(s.y2_t, s.y1_i);
    }

    #[test]
    fn stations_are_monotonic_for_all_presets() {
        for name in crate::config::PRESETS {
            let config = ProfileConfig::preset(name).expect("known preset");
            let params = CrossSectionParameters::from_config(&config).expect("valid preset");
            let s = *DerivedGeometry::new(&params).stations();
            assert!(s.x1_i > s.x2_i && s.x2_i > s.x3_i && s.x3_i > 0.0);
            assert!(s.y1_t > s.y2_t && s.y2_t > s.y3_t);
        }
    }

    #[test]
    fn derivation_is_deterministic() {
        let a = cp3();
        let b = cp3();
        let bits = |g: &DerivedGeometry| -> Vec<(u64, u64)> {
            g.vertices().map(|v| (v.x.to_bits(), v.y.to_bits())).collect()
        };
        assert_eq!(bits(&a), bits(&b));
        for tag in SegmentTag::ALL {
            assert_eq!(a.endpoints(tag), b.endpoints(tag));
        }
    }

    #[test]
    fn section_is_mirrored_about_the_vertical_axis() {
        let geometry = cp3();
        let vertices: Vec<SectionPoint> = geometry.vertices().collect();
        for (left, right) in (0..6).zip([14, 13, 12, 17, 16, 15]) {
            assert_eq!(vertices[left].x, -vertices[right].x);
            assert_eq!(vertices[left].y, vertices[right].y);
        }
        assert_eq!(geometry.midpoint(SegmentTag::ConnectingFlange), SectionPoint::new(0.0, 0.0));
    }

    #[test]
    fn every_tag_is_found_at_its_midpoint() {
        let geometry = cp3();
        for tag in SegmentTag::ALL {
            assert_eq!(geometry.tag_at(geometry.midpoint(tag)), Some(tag));
        }
        assert_eq!(geometry.tag_at(SectionPoint::new(1.0e6, 0.0)), None);
    }

    #[test]
    fn flange_halves_split_the_flange_width() {
        let geometry = cp3();
        let outer = SegmentTag::i_flange(Side::Left, Level::Top, Half::Outer);
        let inner = SegmentTag::i_flange(Side::Right, Level::Top, Half::Inner);
        assert_eq!(geometry.segment_width(outer), 32.0);
        assert_eq!(geometry.segment_width(inner), 32.0);
        assert_eq!(geometry.midpoint(outer), SectionPoint::new(-128.0, geometry.stations().y1_i));
        assert_eq!(geometry.segment_width(SegmentTag::ConnectingFlange), 160.0);
    }

    #[test]
    fn locators_sit_on_the_span() {
        let geometry = cp3();
        let web = SegmentTag::IWeb { side: Side::Right };
        let face = geometry.face_locator(web);
        assert_eq!(face.z, 1850.0);
        assert_eq!(face.x, 112.0);
        assert_eq!(geometry.edge_locator(web, SpanEnd::Start).z, 0.0);
        assert_eq!(geometry.edge_locator(web, SpanEnd::End).z, 3700.0);
    }

    #[test]
    fn duplicate_tee_vertices_share_one_longitudinal_edge() {
        let geometry = cp3();
        assert_eq!(geometry.longitudinal_edges().len(), 15);
    }

    #[test]
    fn inner_flange_edges_run_along_the_span() {
        let geometry = cp3();
        let s = geometry.stations();
        let edges = geometry.longitudinal_edges();
        for (x, y) in [(-s.x3_i, s.y1_i), (-s.x3_i, 0.0), (s.x3_i, s.y1_i), (s.x3_i, 0.0)] {
            assert!(edges.contains(&Point::new(x, y, 1850.0)), "no edge at ({x}, {y})");
        }
    }

    #[test]
    fn sections_group_the_segments() {
        let count = |kind| SegmentTag::ALL.iter().filter(|t| t.section() == kind).count();
        assert_eq!(count(SectionKind::IFlange), 9);
        assert_eq!(count(SectionKind::IWeb), 2);
        assert_eq!(count(SectionKind::TSection), 4);
    }

    #[test]
    fn tags_have_readable_names() {
        let tag = SegmentTag::i_flange(Side::Left, Level::Top, Half::Outer);
        assert_eq!(tag.to_string(), "I-flange-top-left-outer");
        assert_eq!(SegmentTag::TFlange { reach: Reach::Lower }.to_string(), "T-flange-lower");
    }
}
