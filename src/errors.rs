//! Error types produced while planning or reducing a combined-profile analysis.

use std::fmt;

use thiserror::Error;

use crate::analysis::Stage;

/// Constraint a configuration value failed to satisfy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SizingRule {
    /// The value must be a finite number.
    Finite,
    /// The value must be strictly positive.
    Positive,
    /// The value must be zero or positive.
    NonNegative,
    /// The value must not be smaller than the minimum plate dimension.
    MinimumDimension {
        /// Smallest admissible dimension in millimetres.
        minimum: f64,
    },
    /// The value must not exceed another dimension.
    AtMost {
        /// Name of the bounding field.
        bound: &'static str,
        /// Value of the bounding field.
        limit: f64,
    },
    /// The value must be at least twice another dimension.
    AtLeastTwice {
        /// Name of the bounding field.
        bound: &'static str,
        /// Value of the bounding field.
        limit: f64,
    },
    /// The value must lie in the half-open interval `[lower, upper)`.
    Within {
        /// Inclusive lower bound.
        lower: f64,
        /// Exclusive upper bound.
        upper: f64,
    },
}

impl fmt::Display for SizingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite => write!(f, "must be finite"),
            Self::Positive => write!(f, "must be positive"),
            Self::NonNegative => write!(f, "must not be negative"),
            Self::MinimumDimension { minimum } => write!(f, "must be at least {minimum}"),
            Self::AtMost { bound, limit } => {
                write!(f, "must not exceed {bound} (= {limit})")
            }
            Self::AtLeastTwice { bound, limit } => {
                write!(f, "must be at least twice {bound} (= {limit})")
            }
            Self::Within { lower, upper } => write!(f, "must lie within [{lower}, {upper})"),
        }
    }
}

/// Error returned when a cross-section parameter violates a sizing rule.
///
/// Validation stops at the first violation, so the error always names exactly
/// one field.
///
/// # Examples
///
/// ```
/// use profilex::{config::ProfileConfig, CrossSectionParameters};
///
/// let mut config = ProfileConfig::default();
/// config.dimensions.dh1 = 10.0;
/// config.dimensions.dt1 = 6.3;
/// let error = CrossSectionParameters::from_config(&config).expect_err("too shallow");
/// assert_eq!(error.field, "dh1");
/// ```
#[derive(Clone, Copy, Debug, Error, PartialEq)]
#[error("invalid value {value} for `{field}`: {rule}")]
pub struct ConfigurationError {
    /// Name of the offending field.
    pub field: &'static str,
    /// Rejected value.
    pub value: f64,
    /// The rule the value violates.
    pub rule: SizingRule,
}

impl ConfigurationError {
    /// Shorthand used by the validators.
    pub(crate) const fn new(field: &'static str, value: f64, rule: SizingRule) -> Self {
        Self { field, value, rule }
    }
}

/// Error returned when the mesh seed configuration cannot be turned into a plan.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum MeshPlanError {
    /// Returned when every manual seed is zero, leaving nothing to divide the budget by.
    #[error("weighted seed sum is zero; at least one cross-section seed must be positive")]
    DegenerateSeeds,
    /// Returned when the budget cannot afford a single element along the length.
    #[error("element budget {budget} is smaller than the weighted seed sum {weighted_sum}")]
    BudgetTooSmall {
        /// Requested element budget.
        budget: u32,
        /// Elements per length division implied by the cross-section seeds.
        weighted_sum: u64,
    },
}

/// Category of solver field output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Nodal reaction forces (`RF`).
    ReactionForce,
    /// Nodal displacements (`U`).
    Displacement,
    /// Element stress invariants (`S`).
    Stress,
    /// Buckling eigenvalues.
    Eigenvalue,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ReactionForce => "RF",
            Self::Displacement => "U",
            Self::Stress => "S",
            Self::Eigenvalue => "EV",
        };
        f.write_str(label)
    }
}

/// Error returned when solver output cannot be reduced to a summary.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ResultError {
    /// Returned when a required field category is absent or empty.
    #[error("field output {field} missing in step '{step}', frame {frame}")]
    MissingField {
        /// Name of the analysis step.
        step: String,
        /// Index of the frame that was inspected.
        frame: usize,
        /// The missing category.
        field: FieldKind,
    },
    /// Returned when a selected fiber node is not part of the displacement field.
    #[error("fiber node {node} has no displacement in step '{step}', frame {frame}")]
    MissingFiberDisplacement {
        /// Name of the analysis step.
        step: String,
        /// Index of the frame that was inspected.
        frame: usize,
        /// Label of the fiber node.
        node: u32,
    },
}

/// Error returned when a configuration record cannot be loaded.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    /// Returned when the configuration file cannot be read.
    #[error("unable to read configuration: {0}")]
    Io(#[from] std::io::Error),
    /// Returned when the configuration is not valid JSON for a profile.
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// Returned when a preset name is not known.
    #[error("unknown profile preset '{0}'")]
    UnknownPreset(String),
}

/// Failure raised inside one stage of the analysis pipeline.
#[derive(Debug, Error)]
pub enum StageError {
    /// A cross-section parameter violated a sizing rule.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// The mesh seeds could not be planned.
    #[error(transparent)]
    MeshPlan(#[from] MeshPlanError),
    /// The external solver signalled a failure.
    #[error("external solve failed: {0}")]
    Solve(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// The solver output could not be reduced.
    #[error(transparent)]
    Reduction(#[from] ResultError),
}

/// Terminal failure of an analysis run, tagged with the stage it happened in.
#[derive(Debug, Error)]
#[error("analysis failed while {stage}: {source}")]
pub struct AnalysisError {
    /// Stage in which the run stopped.
    pub stage: Stage,
    /// Underlying cause.
    #[source]
    pub source: StageError,
}

impl AnalysisError {
    /// Attach the stage to a stage failure.
    pub(crate) fn at(stage: Stage, source: impl Into<StageError>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }
}
