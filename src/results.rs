//! Reduction of solver field output into engineering summaries.
//!
//! Every reduction is a single pass over one field that keeps running
//! aggregates only. A field the reduction needs but the solver did not deliver
//! is reported as [`ResultError::MissingField`]; it is never read as zero.

use std::collections::BTreeSet;

use log::{debug, warn};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::config::AnalysisMode;
use crate::errors::{FieldKind, ResultError};
use crate::geometry::DerivedGeometry;
use crate::vectors::{Displacement, Force, Point};

/// Reaction vectors with a smaller magnitude are treated as numerical noise.
pub const REACTION_NOISE: f64 = 1.0e-3;

/// Mesh nodes closer than this to the fiber line belong to the fiber.
pub const FIBER_TOLERANCE: f64 = 1.0;

/// A node of the solver-generated mesh.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshNode {
    /// Node label assigned by the solver.
    pub label: u32,
    /// Node coordinates.
    pub position: Point,
}

/// Reaction force at a node.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodalForce {
    /// Node label.
    pub node: u32,
    /// Reaction force.
    pub force: Force,
}

/// Displacement of a node.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodalDisplacement {
    /// Node label.
    pub node: u32,
    /// Translation vector.
    pub displacement: Displacement,
}

/// Von Mises stress of an element.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementStress {
    /// Element label.
    pub element: u32,
    /// Von Mises stress in N/mm².
    pub mises: f64,
}

/// Field output of the final frame of one analysis step.
///
/// Categories the solver did not write stay `None`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldOutput {
    /// Name of the step.
    pub step: String,
    /// Index of the frame.
    pub frame: usize,
    /// Nodal reaction forces (`RF`).
    pub reaction_forces: Option<Vec<NodalForce>>,
    /// Nodal displacements (`U`).
    pub displacements: Option<Vec<NodalDisplacement>>,
    /// Element von Mises stresses (`S`).
    pub stresses: Option<Vec<ElementStress>>,
    /// Buckling eigenvalues, one per mode.
    pub eigenvalues: Option<Vec<f64>>,
}

impl FieldOutput {
    /// Empty output of `frame` of `step`.
    #[must_use]
    pub fn new(step: impl Into<String>, frame: usize) -> Self {
        Self {
            step: step.into(),
            frame,
            ..Self::default()
        }
    }

    /// Build the error for a missing category.
    fn missing(&self, field: FieldKind) -> ResultError {
        ResultError::MissingField {
            step: self.step.clone(),
            frame: self.frame,
            field,
        }
    }

    /// Reaction forces above the noise threshold.
    ///
    /// # Errors
    ///
    /// Returns [`ResultError::MissingField`] when the output has no reaction
    /// forces or an empty reaction field.
    pub fn significant_reactions(
        &self,
    ) -> Result<impl Iterator<Item = &NodalForce> + '_, ResultError> {
        let reactions = self
            .reaction_forces
            .as_ref()
            .filter(|values| !values.is_empty())
            .ok_or_else(|| self.missing(FieldKind::ReactionForce))?;
        Ok(reactions
            .iter()
            .filter(|reaction| reaction.force.magnitude() >= REACTION_NOISE))
    }
}

/// Mesh nodes lying on the reference fiber line.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FiberNodeSet {
    /// Selected nodes in mesh order.
    nodes: Vec<MeshNode>,
    /// Labels of the selected nodes.
    labels: BTreeSet<u32>,
}

impl FiberNodeSet {
    /// Pick the nodes within [`FIBER_TOLERANCE`] of the fiber line of `geometry`.
    #[must_use]
    pub fn select(mesh: &[MeshNode], geometry: &DerivedGeometry) -> Self {
        let line = geometry.fiber_line();
        let nodes: Vec<MeshNode> = mesh
            .iter()
            .filter(|node| node.position.distance_to_line(line.x, line.y) <= FIBER_TOLERANCE)
            .copied()
            .collect();
        let labels = nodes.iter().map(|node| node.label).collect();
        debug!("{} of {} mesh nodes lie on the fiber", nodes.len(), mesh.len());
        Self { nodes, labels }
    }

    /// Selected nodes in mesh order.
    #[must_use]
    pub fn nodes(&self) -> &[MeshNode] {
        &self.nodes
    }

    /// Number of fiber nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no node lies on the fiber.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the node with `label` lies on the fiber.
    #[must_use]
    pub fn contains(&self, label: u32) -> bool {
        self.labels.contains(&label)
    }
}

/// Extreme value of a field and the entity it belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Extremum {
    /// The extreme value.
    pub value: f64,
    /// Label of the node or element holding it.
    pub label: u32,
}

impl Extremum {
    /// Keep the larger of the running maximum and a new candidate; the first
    /// entry wins ties.
    fn raise(current: Option<Self>, value: f64, label: u32) -> Option<Self> {
        match current {
            Some(best) if best.value >= value => Some(best),
            _ => Some(Self { value, label }),
        }
    }
}

/// Sum of the significant reaction forces.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReactionSum {
    /// Component-wise sum in N.
    pub total: Force,
    /// Number of reaction vectors included in the sum.
    pub included: usize,
    /// Number of vectors discarded as noise.
    pub discarded: usize,
}

impl ReactionSum {
    /// Relative difference between the reaction magnitude and the applied load.
    #[must_use]
    pub fn imbalance(&self, applied: f64) -> f64 {
        (self.total.magnitude() - applied.abs()).abs() / applied.abs()
    }

    /// Whether the reactions balance `applied` within the relative `tolerance`.
    #[must_use]
    pub fn is_balanced(&self, applied: f64, tolerance: f64) -> bool {
        self.imbalance(applied) <= tolerance
    }
}

/// Mode-specific part of a summary.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Response {
    /// Maximum downward deflection in mm.
    Deflection {
        /// Over all nodes.
        global: Extremum,
        /// Over the fiber nodes; `None` when no node lies on the fiber.
        fiber: Option<Extremum>,
    },
    /// Maximum von Mises stress in N/mm² and the element it occurs in.
    Stress {
        /// Largest stress.
        peak: Extremum,
    },
    /// Smallest positive buckling eigenvalue; `None` when every mode is negative.
    Buckling {
        /// Critical load factor.
        critical: Option<f64>,
    },
}

/// Engineering summary of one solved step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    /// Step name.
    pub step: String,
    /// Frame index.
    pub frame: usize,
    /// Reaction sum; not evaluated for buckling steps.
    pub reactions: Option<ReactionSum>,
    /// Mode-specific response.
    pub response: Response,
}

/// Reduces the field output of a step according to the analysis mode.
#[derive(Clone, Copy, Debug)]
pub struct ResultAggregator<'a> {
    /// Selected reduction.
    mode: AnalysisMode,
    /// Nodes for the fiber-restricted deflection.
    fibers: &'a FiberNodeSet,
}

impl<'a> ResultAggregator<'a> {
    /// Create an aggregator for `mode`.
    #[must_use]
    pub const fn new(mode: AnalysisMode, fibers: &'a FiberNodeSet) -> Self {
        Self { mode, fibers }
    }

    /// Reduce `field` to a summary.
    ///
    /// # Errors
    ///
    /// Returns a [`ResultError`] when a field the mode needs is missing.
    pub fn aggregate(&self, field: &FieldOutput) -> Result<ResultSummary, ResultError> {
        let (reactions, response) = match self.mode {
            AnalysisMode::Deflection => {
                let reactions = sum_reactions(field)?;
                let (global, fiber) = max_deflection(field, self.fibers)?;
                (Some(reactions), Response::Deflection { global, fiber })
            }
            AnalysisMode::Stress => {
                let reactions = sum_reactions(field)?;
                let peak = max_stress(field)?;
                (Some(reactions), Response::Stress { peak })
            }
            AnalysisMode::Buckling => {
                let critical = min_positive_eigenvalue(field)?;
                (None, Response::Buckling { critical })
            }
        };
        Ok(ResultSummary {
            step: field.step.clone(),
            frame: field.frame,
            reactions,
            response,
        })
    }
}

/// Sum the reaction vectors whose magnitude is at least [`REACTION_NOISE`].
///
/// # Errors
///
/// Returns [`ResultError::MissingField`] when the output has no reaction forces
/// or an empty reaction field.
pub fn sum_reactions(field: &FieldOutput) -> Result<ReactionSum, ResultError> {
    let mut total = Vector3::zeros();
    let mut included = 0;
    for reaction in field.significant_reactions()? {
        total += reaction.force.to_vector();
        included += 1;
    }
    let available = field.reaction_forces.as_ref().map_or(0, Vec::len);
    Ok(ReactionSum {
        total: Force::from(total),
        included,
        discarded: available - included,
    })
}

/// Maximum downward deflection over all nodes and over the fiber nodes.
///
/// # Errors
///
/// Returns [`ResultError::MissingField`] when the output has no displacements and
/// [`ResultError::MissingFiberDisplacement`] when a fiber node is absent from
/// them.
pub fn max_deflection(
    field: &FieldOutput,
    fibers: &FiberNodeSet,
) -> Result<(Extremum, Option<Extremum>), ResultError> {
    let displacements = field
        .displacements
        .as_ref()
        .filter(|values| !values.is_empty())
        .ok_or_else(|| field.missing(FieldKind::Displacement))?;

    let mut global = None;
    let mut fiber = None;
    let mut seen = BTreeSet::new();
    for value in displacements {
        let deflection = value.displacement.deflection();
        global = Extremum::raise(global, deflection, value.node);
        if fibers.contains(value.node) {
            fiber = Extremum::raise(fiber, deflection, value.node);
            seen.insert(value.node);
        }
    }

    if let Some(node) = fibers.nodes().iter().find(|node| !seen.contains(&node.label)) {
        return Err(ResultError::MissingFiberDisplacement {
            step: field.step.clone(),
            frame: field.frame,
            node: node.label,
        });
    }
    if fibers.is_empty() {
        warn!("no mesh node lies on the fiber line; fiber deflection unavailable");
    }
    let global = global.ok_or_else(|| field.missing(FieldKind::Displacement))?;
    Ok((global, fiber))
}

/// Maximum von Mises stress and the element holding it.
///
/// # Errors
///
/// Returns [`ResultError::MissingField`] when the output has no stresses.
pub fn max_stress(field: &FieldOutput) -> Result<Extremum, ResultError> {
    field
        .stresses
        .as_ref()
        .and_then(|stresses| {
            stresses.iter().fold(None, |peak, stress| {
                Extremum::raise(peak, stress.mises, stress.element)
            })
        })
        .ok_or_else(|| field.missing(FieldKind::Stress))
}

/// Smallest positive buckling eigenvalue.
///
/// # Errors
///
/// Returns [`ResultError::MissingField`] when the output has no eigenvalues.
pub fn min_positive_eigenvalue(field: &FieldOutput) -> Result<Option<f64>, ResultError> {
    let eigenvalues = field
        .eigenvalues
        .as_ref()
        .filter(|values| !values.is_empty())
        .ok_or_else(|| field.missing(FieldKind::Eigenvalue))?;
    Ok(eigenvalues
        .iter()
        .copied()
        .filter(|&value| value > 0.0)
        .fold(None, |min: Option<f64>, value| {
            Some(min.map_or(value, |current| current.min(value)))
        }))
}
