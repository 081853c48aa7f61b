//! Sequential analysis pipeline.
//!
//! An [`Analysis`] walks a configuration through the stages
//! `Configuring → GeometryValidated → Meshed → LoadedConstrained → Solved →
//! Aggregated`. Every failure is terminal and is reported together with the
//! stage the run was trying to reach.

use std::fmt;

use log::{info, warn};

use crate::conditions::BcPlan;
use crate::config::ProfileConfig;
use crate::errors::{AnalysisError, StageError};
use crate::geometry::DerivedGeometry;
use crate::journal::Journal;
use crate::loads::LoadPlan;
use crate::mesh::{MeshPlan, SeedGroup};
use crate::model::SolverModel;
use crate::results::{FiberNodeSet, FieldOutput, MeshNode, ResultAggregator, ResultSummary};
use crate::section::CrossSectionParameters;

/// Relative tolerance of the equilibrium check between reactions and load.
pub const EQUILIBRIUM_TOLERANCE: f64 = 1.0e-3;

/// Progress of an analysis run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    /// Nothing has been validated yet.
    Configuring,
    /// Parameters are valid and the geometry is derived.
    GeometryValidated,
    /// The mesh seeds are planned.
    Meshed,
    /// Loads and supports are planned and the solver model is assembled.
    LoadedConstrained,
    /// The external solver has produced field output.
    Solved,
    /// The field output is reduced to a summary.
    Aggregated,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let activity = match self {
            Self::Configuring => "configuring",
            Self::GeometryValidated => "validating the geometry",
            Self::Meshed => "planning the mesh",
            Self::LoadedConstrained => "applying loads and supports",
            Self::Solved => "solving",
            Self::Aggregated => "aggregating results",
        };
        f.write_str(activity)
    }
}

/// External finite-element solver.
///
/// Both calls block until the solver is done; a returned error ends the run.
pub trait Solver {
    /// Failure reported by the solver.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Mesh the model and return the generated nodes.
    ///
    /// # Errors
    ///
    /// Returns the solver's error when meshing fails.
    fn mesh(&mut self, model: &SolverModel) -> Result<Vec<MeshNode>, Self::Error>;

    /// Run the model's step and return the field output of its final frame.
    ///
    /// # Errors
    ///
    /// Returns the solver's error when the job fails.
    fn solve(&mut self, model: &SolverModel) -> Result<FieldOutput, Self::Error>;
}

/// Everything a completed run produced.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisOutcome {
    /// The model that was solved.
    pub model: SolverModel,
    /// Mesh nodes on the fiber line.
    pub fibers: FiberNodeSet,
    /// Reduced results.
    pub summary: ResultSummary,
}

/// A single analysis run reporting to a journal.
#[derive(Debug)]
pub struct Analysis<'j, J: Journal> {
    /// Last stage reached.
    stage: Stage,
    /// Progress sink.
    journal: &'j mut J,
}

impl<'j, J: Journal> Analysis<'j, J> {
    /// Start a run in [`Stage::Configuring`].
    pub fn new(journal: &'j mut J) -> Self {
        Self {
            stage: Stage::Configuring,
            journal,
        }
    }

    /// Last stage reached.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Plan the solver model without solving it.
    ///
    /// # Errors
    ///
    /// Returns an [`AnalysisError`] when a parameter violates a sizing rule or
    /// the mesh seeds cannot be planned.
    pub fn plan(&mut self, config: &ProfileConfig) -> Result<SolverModel, AnalysisError> {
        self.assemble(config).map(|(model, _)| model)
    }

    /// Plan, solve and reduce one configuration.
    ///
    /// # Errors
    ///
    /// Returns an [`AnalysisError`] tagged with the stage the run failed to
    /// reach: invalid parameters, unplannable seeds, a solver failure or
    /// incomplete field output.
    pub fn run<S: Solver>(
        &mut self,
        config: &ProfileConfig,
        solver: &mut S,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let (model, geometry) = self.assemble(config)?;

        self.journal
            .append(&format!("> create job '{}' and run it...", model.job));
        let nodes = solver
            .mesh(&model)
            .map_err(|e| AnalysisError::at(Stage::Solved, StageError::Solve(Box::new(e))))?;
        let fibers = FiberNodeSet::select(&nodes, &geometry);
        self.journal
            .append(&format!("> {} nodes, {} fiber nodes", nodes.len(), fibers.len()));
        let field = solver
            .solve(&model)
            .map_err(|e| AnalysisError::at(Stage::Solved, StageError::Solve(Box::new(e))))?;
        self.advance(Stage::Solved);

        self.journal
            .append(&format!("> analysis of step '{}'...", model.step.name));
        let summary = ResultAggregator::new(config.mode, &fibers)
            .aggregate(&field)
            .map_err(|e| AnalysisError::at(Stage::Aggregated, e))?;
        if let Some(reactions) = summary.reactions {
            let applied = model.loads.resultant();
            if !reactions.is_balanced(applied, EQUILIBRIUM_TOLERANCE) {
                warn!(
                    "reaction sum deviates from the applied load by {:.3}%",
                    100.0 * reactions.imbalance(applied)
                );
            }
        }
        self.advance(Stage::Aggregated);

        Ok(AnalysisOutcome {
            model,
            fibers,
            summary,
        })
    }

    /// Validate the configuration and assemble the solver model.
    fn assemble(
        &mut self,
        config: &ProfileConfig,
    ) -> Result<(SolverModel, DerivedGeometry), AnalysisError> {
        self.journal.append(&format!("> create model '{}'...", config.name));
        let params = CrossSectionParameters::from_config(config)
            .map_err(|e| AnalysisError::at(Stage::GeometryValidated, e))?;
        let geometry = DerivedGeometry::new(&params);
        self.advance(Stage::GeometryValidated);

        let mesh = MeshPlan::new(&config.mesh).map_err(|e| AnalysisError::at(Stage::Meshed, e))?;
        self.journal.append("> No of seeds...");
        for group in SeedGroup::ALL {
            let label = format!("{} seed", group.label());
            self.journal
                .append(&format!("  {label:.<21}: {}", mesh.seed(group)));
        }
        self.advance(Stage::Meshed);

        let loads = LoadPlan::new(&params, &geometry);
        let bcs = BcPlan::new(&geometry);
        self.journal
            .append(&format!("> create Loads... p = {:.6} N/mm^2", loads.magnitude()));
        let model = SolverModel::new(&params, &geometry, mesh, bcs, loads, config.mode);
        self.advance(Stage::LoadedConstrained);
        Ok((model, geometry))
    }

    /// Record a stage transition.
    fn advance(&mut self, stage: Stage) {
        info!("analysis stage: {stage:?}");
        self.stage = stage;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisMode;
    use crate::errors::{ConfigurationError, MeshPlanError};
    use crate::journal::MemoryJournal;

    /// Solver that fails every call.
    struct Failing;

    #[derive(Debug, thiserror::Error)]
    #[error("solver unavailable")]
    struct Unavailable;

    impl Solver for Failing {
        type Error = Unavailable;

        fn mesh(&mut self, _: &SolverModel) -> Result<Vec<MeshNode>, Self::Error> {
            Err(Unavailable)
        }

        fn solve(&mut self, _: &SolverModel) -> Result<FieldOutput, Self::Error> {
            Err(Unavailable)
        }
    }

    #[test]
    fn planning_reaches_loaded_constrained() {
        let mut journal = MemoryJournal::new();
        let mut analysis = Analysis::new(&mut journal);
        let model = analysis
            .plan(&ProfileConfig::default())
            .expect("default profile plans");
        assert_eq!(analysis.stage(), Stage::LoadedConstrained);
        assert_eq!(model.job, "CP3-Linear");
        assert!(journal.lines().iter().any(|l| l == "  Length seed..........: 38"));
    }

    #[test]
    fn invalid_geometry_stops_before_validation() {
        let mut config = ProfileConfig::default();
        config.dimensions.dh1 = 10.0;
        let mut journal = MemoryJournal::new();
        let mut analysis = Analysis::new(&mut journal);
        let error = analysis.run(&config, &mut Failing).expect_err("dh1 too small");
        assert_eq!(error.stage, Stage::GeometryValidated);
        assert_eq!(analysis.stage(), Stage::Configuring);
        assert!(matches!(
            error.source,
            StageError::Configuration(ConfigurationError { field: "dh1", .. })
        ));
    }

    #[test]
    fn degenerate_seeds_stop_at_meshing() {
        let mut config = ProfileConfig::default();
        config.mesh.i_flange = 0;
        config.mesh.i_web = 0;
        config.mesh.t_flange = 0;
        config.mesh.t_web = 0;
        config.mesh.connecting_flange = 0;
        let mut journal = MemoryJournal::new();
        let mut analysis = Analysis::new(&mut journal);
        let error = analysis.plan(&config).expect_err("no seeds");
        assert_eq!(error.stage, Stage::Meshed);
        assert!(matches!(
            error.source,
            StageError::MeshPlan(MeshPlanError::DegenerateSeeds)
        ));
        assert_eq!(analysis.stage(), Stage::GeometryValidated);
    }

    #[test]
    fn solver_failure_is_terminal() {
        let config = ProfileConfig {
            mode: AnalysisMode::Buckling,
            ..ProfileConfig::default()
        };
        let mut journal = MemoryJournal::new();
        let mut analysis = Analysis::new(&mut journal);
        let error = analysis.run(&config, &mut Failing).expect_err("solver fails");
        assert_eq!(error.stage, Stage::Solved);
        assert_eq!(analysis.stage(), Stage::LoadedConstrained);
        assert_eq!(
            error.to_string(),
            "analysis failed while solving: external solve failed: solver unavailable"
        );
    }
}
