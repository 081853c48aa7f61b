//! Allocation of the element budget across the section's edge groups.
//!
//! The cross-section seeds are chosen by hand; the number of divisions along
//! the span is whatever the element budget leaves over. Each division along the
//! span produces one row of elements across the whole section, so the element
//! count is bounded by `length_seed × weighted_sum ≤ budget`.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::MeshConfig;
use crate::errors::MeshPlanError;
use crate::geometry::{DerivedGeometry, EdgeRef, SegmentTag, SpanEnd};
use crate::vectors::Point;

/// Group of edges seeded with a common number of elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeedGroup {
    /// Edges of the eight I-flange halves.
    IFlange,
    /// Edges of both I-webs.
    IWeb,
    /// Edges of both T-web segments.
    TWeb,
    /// Edges of both T-flange segments.
    TFlange,
    /// Edges of the connecting flange.
    ConnectingFlange,
    /// Longitudinal edges along the span.
    Length,
}

impl SeedGroup {
    /// Groups in the order the seeds are applied.
    pub const ALL: [SeedGroup; 6] = [
        Self::IFlange,
        Self::IWeb,
        Self::TWeb,
        Self::TFlange,
        Self::ConnectingFlange,
        Self::Length,
    ];

    /// Group the end edges of a segment belong to.
    #[must_use]
    pub const fn of(tag: SegmentTag) -> Self {
        match tag {
            SegmentTag::IFlange { .. } => Self::IFlange,
            SegmentTag::IWeb { .. } => Self::IWeb,
            SegmentTag::TWeb { .. } => Self::TWeb,
            SegmentTag::TFlange { .. } => Self::TFlange,
            SegmentTag::ConnectingFlange => Self::ConnectingFlange,
        }
    }

    /// Human readable name used in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::IFlange => "I-flange",
            Self::IWeb => "I-web",
            Self::TWeb => "T-web",
            Self::TFlange => "T-flange",
            Self::ConnectingFlange => "Connecting flange",
            Self::Length => "Length",
        }
    }
}

/// An edge that receives a seed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum SeededEdge {
    /// Edge of a section segment at one end of the span.
    Section(EdgeRef),
    /// Edge running along the span through a section vertex.
    Longitudinal {
        /// A point on the edge, at mid-span.
        locator: Point,
    },
}

/// Seeding instruction for one edge group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeSeed {
    /// The seeded group.
    pub group: SeedGroup,
    /// Number of elements along each edge of the group.
    pub number: u32,
    /// Edges in the group.
    pub edges: Vec<SeededEdge>,
}

/// Per-region element seeds of the shell mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshPlan {
    /// Maximum number of elements.
    budget: u32,
    /// Seeds on each I-flange edge.
    i_flange: u32,
    /// Seeds on each I-web edge.
    i_web: u32,
    /// Seeds on each T-flange edge.
    t_flange: u32,
    /// Seeds on each T-web edge.
    t_web: u32,
    /// Seeds on the connecting flange edge.
    connecting_flange: u32,
    /// Elements in one row across the section.
    weighted_sum: u64,
    /// Divisions along the span.
    length: u32,
}

impl MeshPlan {
    /// Derive the length seed from the cross-section seeds and the budget.
    ///
    /// # Errors
    ///
    /// Returns [`MeshPlanError::DegenerateSeeds`] when every cross-section seed
    /// is zero and [`MeshPlanError::BudgetTooSmall`] when not even one division
    /// along the span fits the budget.
    ///
    /// # Examples
    /// ```
    /// use profilex::{config::MeshConfig, MeshPlan};
    ///
    /// let plan = MeshPlan::new(&MeshConfig::default()).expect("default seeds are valid");
    /// assert_eq!(plan.weighted_sum(), 26);
    /// assert_eq!(plan.length_seed(), 38);
    /// ```
    pub fn new(config: &MeshConfig) -> Result<Self, MeshPlanError> {
        let weighted_sum = 8 * u64::from(config.i_flange)
            + 2 * u64::from(config.i_web)
            + 2 * u64::from(config.t_flange)
            + 2 * u64::from(config.t_web)
            + 2 * u64::from(config.connecting_flange);
        if weighted_sum == 0 {
            return Err(MeshPlanError::DegenerateSeeds);
        }
        let length = u64::from(config.max_elements) / weighted_sum;
        if length == 0 {
            return Err(MeshPlanError::BudgetTooSmall {
                budget: config.max_elements,
                weighted_sum,
            });
        }
        // The quotient never exceeds the u32 budget it was divided from.
        let length = u32::try_from(length).unwrap_or(u32::MAX);
        debug!(
            "mesh plan: weighted seed sum {weighted_sum}, length seed {length}, budget {}",
            config.max_elements
        );
        Ok(Self {
            budget: config.max_elements,
            i_flange: config.i_flange,
            i_web: config.i_web,
            t_flange: config.t_flange,
            t_web: config.t_web,
            connecting_flange: config.connecting_flange,
            weighted_sum,
            length,
        })
    }

    /// Maximum number of elements requested.
    #[must_use]
    pub const fn budget(&self) -> u32 {
        self.budget
    }

    /// `8·iF + 2·iW + 2·tF + 2·tW + 2·cF`.
    #[must_use]
    pub const fn weighted_sum(&self) -> u64 {
        self.weighted_sum
    }

    /// Number of divisions along the span.
    #[must_use]
    pub const fn length_seed(&self) -> u32 {
        self.length
    }

    /// Seed count of a group.
    #[must_use]
    pub const fn seed(&self, group: SeedGroup) -> u32 {
        match group {
            SeedGroup::IFlange => self.i_flange,
            SeedGroup::IWeb => self.i_web,
            SeedGroup::TWeb => self.t_web,
            SeedGroup::TFlange => self.t_flange,
            SeedGroup::ConnectingFlange => self.connecting_flange,
            SeedGroup::Length => self.length,
        }
    }

    /// Upper estimate of the element count.
    #[must_use]
    pub const fn estimated_elements(&self) -> u64 {
        self.weighted_sum * self.length as u64
    }

    /// Seeding instructions for every edge group of `geometry`.
    #[must_use]
    pub fn edge_seeds(&self, geometry: &DerivedGeometry) -> Vec<EdgeSeed> {
        SeedGroup::ALL
            .into_iter()
            .map(|group| {
                let edges = match group {
                    SeedGroup::Length => geometry
                        .longitudinal_edges()
                        .into_iter()
                        .map(|locator| SeededEdge::Longitudinal { locator })
                        .collect(),
                    _ => [SpanEnd::Start, SpanEnd::End]
                        .into_iter()
                        .flat_map(|end| {
                            SegmentTag::ALL
                                .into_iter()
                                .filter(move |&segment| SeedGroup::of(segment) == group)
                                .map(move |segment| {
                                    SeededEdge::Section(geometry.edge(segment, end))
                                })
                        })
                        .collect(),
                };
                EdgeSeed {
                    group,
                    number: self.seed(group),
                    edges,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProfileConfig;
    use crate::section::CrossSectionParameters;

    fn seeds(i_flange: u32, i_web: u32, t_flange: u32, t_web: u32, connecting: u32) -> MeshConfig {
        MeshConfig {
            max_elements: 1000,
            i_flange,
            i_web,
            t_flange,
            t_web,
            connecting_flange: connecting,
        }
    }

    #[test]
    fn length_seed_is_floor_of_budget_over_weighted_sum() {
        let plan = MeshPlan::new(&seeds(1, 2, 1, 2, 4)).expect("valid seeds");
        assert_eq!(plan.weighted_sum(), 8 + 4 + 2 + 4 + 8);
        assert_eq!(plan.length_seed(), 38);
        assert_eq!(plan.estimated_elements(), 988);
        assert!(plan.estimated_elements() <= u64::from(plan.budget()));
    }

    #[test]
    fn all_zero_seeds_are_degenerate() {
        let error = MeshPlan::new(&seeds(0, 0, 0, 0, 0)).expect_err("nothing to divide by");
        assert_eq!(error, MeshPlanError::DegenerateSeeds);
    }

    #[test]
    fn single_positive_seed_is_enough() {
        let plan = MeshPlan::new(&seeds(0, 0, 0, 0, 5)).expect("connecting seed only");
        assert_eq!(plan.weighted_sum(), 10);
        assert_eq!(plan.length_seed(), 100);
    }

    #[test]
    fn budget_must_cover_one_row() {
        let config = MeshConfig {
            max_elements: 20,
            ..seeds(1, 2, 1, 2, 4)
        };
        let error = MeshPlan::new(&config).expect_err("20 < 26");
        assert_eq!(
            error,
            MeshPlanError::BudgetTooSmall {
                budget: 20,
                weighted_sum: 26
            }
        );
    }

    #[test]
    fn huge_seeds_do_not_overflow() {
        let config = MeshConfig {
            max_elements: u32::MAX,
            ..seeds(u32::MAX, 0, 0, 0, 0)
        };
        let error = MeshPlan::new(&config).expect_err("budget below weighted sum");
        assert!(matches!(error, MeshPlanError::BudgetTooSmall { .. }));
    }

    #[test]
    fn edge_groups_cover_both_span_ends() {
        let params = CrossSectionParameters::from_config(&ProfileConfig::default())
            .expect("default profile is valid");
        let geometry = DerivedGeometry::new(&params);
        let plan = MeshPlan::new(&MeshConfig::default()).expect("valid seeds");
        let groups = plan.edge_seeds(&geometry);

        let counts: Vec<(SeedGroup, usize, u32)> = groups
            .iter()
            .map(|seed| (seed.group, seed.edges.len(), seed.number))
            .collect();
        assert_eq!(
            counts,
            vec![
                (SeedGroup::IFlange, 16, 1),
                (SeedGroup::IWeb, 4, 2),
                (SeedGroup::TWeb, 4, 2),
                (SeedGroup::TFlange, 4, 1),
                (SeedGroup::ConnectingFlange, 2, 4),
                (SeedGroup::Length, 15, 38),
            ]
        );

        let connecting = &groups[4].edges;
        assert!(connecting.iter().any(|edge| matches!(
            edge,
            SeededEdge::Section(EdgeRef { end: SpanEnd::End, locator, .. }) if locator.z == 3700.0
        )));
    }
}
