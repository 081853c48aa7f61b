#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_doc_code_examples)]
#![warn(clippy::missing_docs_in_private_items)]
#![doc = include_str!("../README.md")]

pub mod analysis;
pub mod conditions;
pub mod config;
pub mod errors;
pub mod geometry;
pub mod journal;
pub mod loads;
pub mod mesh;
pub mod model;
pub mod report;
pub mod results;
pub mod section;
pub mod vectors;

pub use analysis::{Analysis, AnalysisOutcome, Solver, Stage};
pub use conditions::BcPlan;
pub use config::{AnalysisMode, ProfileConfig};
pub use errors::{
    AnalysisError, ConfigLoadError, ConfigurationError, MeshPlanError, ResultError, StageError,
};
pub use geometry::{DerivedGeometry, SegmentTag};
pub use journal::{Journal, MemoryJournal, TimestampedJournal};
pub use loads::LoadPlan;
pub use mesh::MeshPlan;
pub use model::SolverModel;
pub use results::{FieldOutput, MeshNode, ResultAggregator, ResultSummary};
pub use section::CrossSectionParameters;
pub use vectors::{displacement, force, point, Displacement, Force, Point};
