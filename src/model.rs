//! The named solver model handed to the external solver.
//!
//! [`SolverModel`] is a plain, serialisable snapshot of every plan. Entity
//! names follow the conventions solver adapters expect: sections are prefixed
//! with the model name, the job is `<model>-<step>` and the result database
//! `<job>.odb`.

use serde::{Deserialize, Serialize};

use crate::conditions::BcPlan;
use crate::config::{AnalysisMode, MaterialConfig};
use crate::geometry::{DerivedGeometry, SectionKind, SegmentTag};
use crate::loads::LoadPlan;
use crate::mesh::{EdgeSeed, MeshPlan};
use crate::section::CrossSectionParameters;
use crate::vectors::{Point, SectionPoint};

/// Name of the step every analysis step follows.
pub const INITIAL_STEP: &str = "Initial";

/// Shell element used for the sections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementType {
    /// Four-node shell with reduced integration.
    S4R,
    /// Three-node triangular shell.
    S3,
}

/// Element types in order of preference; triangles fill what quads cannot.
pub const ELEMENT_TYPES: [ElementType; 2] = [ElementType::S4R, ElementType::S3];

/// A tagged line of the cross-section sketch.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SketchLine {
    /// Segment tag.
    pub tag: SegmentTag,
    /// First end point.
    pub start: SectionPoint,
    /// Second end point.
    pub end: SectionPoint,
}

/// Cross-section sketch that is extruded into the shell part.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sketch {
    /// Canonical vertices.
    pub vertices: Vec<SectionPoint>,
    /// Lines between the vertices.
    pub lines: Vec<SketchLine>,
    /// Extrusion depth.
    pub depth: f64,
}

/// Homogeneous shell section with the faces it is assigned to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShellSection {
    /// Section name.
    pub name: String,
    /// Which part of the profile the section models.
    pub kind: SectionKind,
    /// Name of the section material.
    pub material: String,
    /// Shell thickness.
    pub thickness: f64,
    /// Faces carrying the section.
    pub faces: Vec<SegmentTag>,
    /// A point inside each face, in the order of `faces`.
    pub locators: Vec<Point>,
}

/// Procedure of the analysis step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepKind {
    /// Linear static equilibrium.
    Static,
    /// Linear buckling eigenvalue extraction.
    Buckle,
}

/// The analysis step of the model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Step name.
    pub name: String,
    /// Procedure.
    pub kind: StepKind,
    /// Step this one follows.
    pub previous: String,
}

impl Step {
    /// The step an analysis mode needs.
    #[must_use]
    pub fn for_mode(mode: AnalysisMode) -> Self {
        let (name, kind) = match mode {
            AnalysisMode::Deflection | AnalysisMode::Stress => ("Linear", StepKind::Static),
            AnalysisMode::Buckling => ("Buckling", StepKind::Buckle),
        };
        Self {
            name: name.to_owned(),
            kind,
            previous: INITIAL_STEP.to_owned(),
        }
    }
}

/// Complete, named description of the shell model and its analysis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolverModel {
    /// Model name.
    pub name: String,
    /// Cross-section sketch.
    pub sketch: Sketch,
    /// Material constants.
    pub material: MaterialConfig,
    /// Shell sections with their assignments.
    pub sections: Vec<ShellSection>,
    /// Element types for every section.
    pub element_types: [ElementType; 2],
    /// Seed counts.
    pub mesh: MeshPlan,
    /// Seed counts resolved onto edges.
    pub edge_seeds: Vec<EdgeSeed>,
    /// Analysis step.
    pub step: Step,
    /// Supports.
    pub boundary_conditions: BcPlan,
    /// Pressure load.
    pub loads: LoadPlan,
    /// Job name.
    pub job: String,
    /// Result database file name.
    pub result_database: String,
}

impl SolverModel {
    /// Assemble the model from the individual plans.
    #[must_use]
    pub fn new(
        params: &CrossSectionParameters,
        geometry: &DerivedGeometry,
        mesh: MeshPlan,
        boundary_conditions: BcPlan,
        loads: LoadPlan,
        mode: AnalysisMode,
    ) -> Self {
        let name = params.name().to_owned();
        let material = params.material().clone();
        let sections = SectionKind::ALL
            .into_iter()
            .map(|kind| {
                let faces: Vec<SegmentTag> = SegmentTag::ALL
                    .into_iter()
                    .filter(|tag| tag.section() == kind)
                    .collect();
                ShellSection {
                    name: format!("{name}-{}", kind.label()),
                    kind,
                    material: material.name.clone(),
                    thickness: kind.thickness(params.dimensions()),
                    locators: faces.iter().map(|&tag| geometry.face_locator(tag)).collect(),
                    faces,
                }
            })
            .collect();
        let sketch = Sketch {
            vertices: geometry.vertices().collect(),
            lines: geometry
                .segments()
                .map(|(tag, start, end)| SketchLine { tag, start, end })
                .collect(),
            depth: geometry.length(),
        };
        let step = Step::for_mode(mode);
        let job = format!("{name}-{}", step.name);
        Self {
            result_database: format!("{job}.odb"),
            job,
            edge_seeds: mesh.edge_seeds(geometry),
            mesh,
            name,
            sketch,
            material,
            sections,
            element_types: ELEMENT_TYPES,
            step,
            boundary_conditions,
            loads,
        }
    }

    /// Section a face is assigned to.
    #[must_use]
    pub fn section_of(&self, tag: SegmentTag) -> Option<&ShellSection> {
        self.sections.iter().find(|section| section.faces.contains(&tag))
    }

    /// Serialise the model as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns the serialiser's error; none is expected for a model built by
    /// [`SolverModel::new`].
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProfileConfig;
    use crate::geometry::{Reach, Side};

    fn model(mode: AnalysisMode) -> SolverModel {
        let config = ProfileConfig::default();
        let params =
            CrossSectionParameters::from_config(&config).expect("default profile is valid");
        let geometry = DerivedGeometry::new(&params);
        let mesh = MeshPlan::new(&config.mesh).expect("default seeds are valid");
        let bcs = BcPlan::new(&geometry);
        let loads = LoadPlan::new(&params, &geometry);
        SolverModel::new(&params, &geometry, mesh, bcs, loads, mode)
    }

    #[test]
    fn names_follow_the_model_name() {
        let model = model(AnalysisMode::Deflection);
        assert_eq!(model.name, "CP3");
        let names: Vec<&str> = model.sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["CP3-I-Section-Flange", "CP3-I-Section-Web", "CP3-T-Section"]);
        assert_eq!(model.step.name, "Linear");
        assert_eq!(model.step.previous, "Initial");
        assert_eq!(model.job, "CP3-Linear");
        assert_eq!(model.result_database, "CP3-Linear.odb");
    }

    #[test]
    fn buckling_mode_uses_a_buckle_step() {
        let model = model(AnalysisMode::Buckling);
        assert_eq!(model.step.kind, StepKind::Buckle);
        assert_eq!(model.job, "CP3-Buckling");
    }

    #[test]
    fn every_face_has_exactly_one_section() {
        let model = model(AnalysisMode::Stress);
        let assigned: usize = model.sections.iter().map(|s| s.faces.len()).sum();
        assert_eq!(assigned, 15);
        for tag in SegmentTag::ALL {
            assert!(model.section_of(tag).is_some(), "{tag} unassigned");
        }
        let web = model
            .section_of(SegmentTag::IWeb { side: Side::Left })
            .expect("web assigned");
        assert_eq!(web.thickness, 4.4);
        let tee = model
            .section_of(SegmentTag::TFlange { reach: Reach::Upper })
            .expect("tee assigned");
        assert_eq!(tee.thickness, 9.0);
    }

    #[test]
    fn sketch_and_json_are_complete() {
        let model = model(AnalysisMode::Deflection);
        assert_eq!(model.sketch.vertices.len(), 18);
        assert_eq!(model.sketch.lines.len(), 15);
        assert_eq!(model.sketch.depth, 3700.0);
        assert_eq!(model.element_types, [ElementType::S4R, ElementType::S3]);

        let json = model.to_json().expect("model serialises");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["job"], "CP3-Linear");
        assert_eq!(value["edge_seeds"].as_array().map(Vec::len), Some(6));
    }
}
