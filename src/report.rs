//! Plain-text rendering of planned models and reduced results.

use std::fmt::Write;

use uom::si::f64::Force;
use uom::si::force::{kilonewton, newton};

use crate::errors::ResultError;
use crate::model::SolverModel;
use crate::results::{FieldOutput, Response, ResultSummary};

/// Render the planned model: sections, seeds, load and supports.
#[must_use]
pub fn render_plan(model: &SolverModel) -> String {
    let mut output = String::new();

    writeln!(
        &mut output,
        "Model '{}' (span = {:.1} mm, step = {}, job = {})",
        model.name, model.sketch.depth, model.step.name, model.job
    )
    .expect("writing to string cannot fail");

    for section in &model.sections {
        writeln!(
            &mut output,
            "  {:<24} t = {:5.2} mm, {:2} faces",
            section.name,
            section.thickness,
            section.faces.len()
        )
        .expect("writing to string cannot fail");
    }

    // Seeds are listed in the order they are applied; the length seed is
    // derived from the element budget.
    output.push_str("Seeds:\n");
    for seed in &model.edge_seeds {
        let label = format!("{} seed", seed.group.label());
        writeln!(
            &mut output,
            "  {label:.<21}: {:3} on {:2} edges",
            seed.number,
            seed.edges.len()
        )
        .expect("writing to string cannot fail");
    }
    writeln!(
        &mut output,
        "  Element estimate.....: {} of {}",
        model.mesh.estimated_elements(),
        model.mesh.budget()
    )
    .expect("writing to string cannot fail");

    writeln!(
        &mut output,
        "Pressure: {:.6} N/mm^2 on {} regions, resultant {:.1} N",
        model.loads.magnitude(),
        model.loads.regions().len(),
        model.loads.resultant()
    )
    .expect("writing to string cannot fail");

    let supports = &model.boundary_conditions;
    writeln!(
        &mut output,
        "Supports: '{}' on {} edges, '{}' on vertex {}",
        supports.supported_lines().name,
        supports.supported_lines().edges.len(),
        supports.rigid_body().name,
        supports.rigid_body().vertex
    )
    .expect("writing to string cannot fail");

    output
}

/// Tabulate the reaction forces that enter the reaction sum.
///
/// # Errors
///
/// Returns [`ResultError::MissingField`] when the output has no reaction forces.
pub fn render_reactions(field: &FieldOutput) -> Result<String, ResultError> {
    let mut output = String::from("  --no ------Fx ------Fy ------Fz\n");
    for reaction in field.significant_reactions()? {
        let force = reaction.force;
        writeln!(
            &mut output,
            "  {:4} {:8.2} {:8.2} {:8.2}",
            reaction.node, force.x, force.y, force.z
        )
        .expect("writing to string cannot fail");
    }
    Ok(output)
}

/// Render a reduced result.
#[must_use]
pub fn render_summary(summary: &ResultSummary) -> String {
    let mut output = String::new();

    writeln!(
        &mut output,
        "Results of step '{}', frame {}",
        summary.step, summary.frame
    )
    .expect("writing to string cannot fail");

    // Reaction sums are reported in kN, the unit of the configured load.
    if let Some(reactions) = summary.reactions {
        let kn = |value: f64| Force::new::<newton>(value).get::<kilonewton>();
        writeln!(
            &mut output,
            "Sum of reaction forces: {:8.3} {:8.3} {:8.3} kN ({} nodes, {} below noise)",
            kn(reactions.total.x),
            kn(reactions.total.y),
            kn(reactions.total.z),
            reactions.included,
            reactions.discarded
        )
        .expect("writing to string cannot fail");
    }

    match summary.response {
        Response::Deflection { global, fiber } => {
            output.push_str("Maximum vertical displacements:\n");
            writeln!(
                &mut output,
                "  total............: {:8.3} mm (node {})",
                global.value, global.label
            )
            .expect("writing to string cannot fail");
            if let Some(fiber) = fiber {
                writeln!(
                    &mut output,
                    "  on supported line: {:8.3} mm (node {})",
                    fiber.value, fiber.label
                )
                .expect("writing to string cannot fail");
            } else {
                output.push_str("  on supported line: no fiber nodes\n");
            }
        }
        Response::Stress { peak } => {
            writeln!(
                &mut output,
                "Max. Mises stress: element {}, {:8.1} N/mm^2",
                peak.label, peak.value
            )
            .expect("writing to string cannot fail");
        }
        Response::Buckling { critical } => match critical {
            Some(value) => {
                writeln!(&mut output, "Min. positive buckling eigenvalue: {value:.4}")
                    .expect("writing to string cannot fail");
            }
            None => output.push_str("Min. positive buckling eigenvalue: none\n"),
        },
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProfileConfig;
    use crate::journal::MemoryJournal;
    use crate::results::{Extremum, NodalForce, ReactionSum};
    use crate::vectors::force;
    use crate::Analysis;

    #[test]
    fn plan_lists_sections_seeds_and_supports() {
        let mut journal = MemoryJournal::new();
        let model = Analysis::new(&mut journal)
            .plan(&ProfileConfig::default())
            .expect("default profile plans");
        let report = render_plan(&model);
        let header = "Model 'CP3' (span = 3700.0 mm, step = Linear, job = CP3-Linear)";
        assert!(report.starts_with(header));
        assert!(report.contains("CP3-I-Section-Web"));
        assert!(report.contains("  Length seed..........:  38 on 15 edges"));
        assert!(report.contains("  Element estimate.....: 988 of 1000"));
        assert!(report.contains("'vertical supported lines' on 12 edges"));
    }

    #[test]
    fn reactions_are_summed_in_kilonewtons() {
        let summary = ResultSummary {
            step: "Linear".to_owned(),
            frame: 1,
            reactions: Some(ReactionSum {
                total: force(0.0, 19_111.1, 0.0),
                included: 8,
                discarded: 2,
            }),
            response: Response::Deflection {
                global: Extremum { value: 4.25, label: 17 },
                fiber: None,
            },
        };
        let report = render_summary(&summary);
        assert!(report.contains("Results of step 'Linear', frame 1"));
        assert!(report.contains("  19.111 "));
        assert!(report.contains("(8 nodes, 2 below noise)"));
        assert!(report.contains("  total............:    4.250 mm (node 17)"));
        assert!(report.contains("no fiber nodes"));
    }

    #[test]
    fn stress_and_buckling_are_rendered() {
        let stress = ResultSummary {
            step: "Linear".to_owned(),
            frame: 1,
            reactions: None,
            response: Response::Stress {
                peak: Extremum { value: 212.34, label: 5 },
            },
        };
        assert!(render_summary(&stress).contains("element 5,    212.3 N/mm^2"));

        let buckling = ResultSummary {
            step: "Buckling".to_owned(),
            frame: 1,
            reactions: None,
            response: Response::Buckling { critical: Some(3.5) },
        };
        assert!(render_summary(&buckling).contains("eigenvalue: 3.5000"));
    }

    #[test]
    fn reaction_table_skips_noise() {
        let mut field = FieldOutput::new("Linear", 1);
        field.reaction_forces = Some(vec![
            NodalForce { node: 3, force: force(0.0, 1_500.0, 0.0) },
            NodalForce { node: 4, force: force(0.0, 1.0e-6, 0.0) },
        ]);
        let table = render_reactions(&field).expect("reactions present");
        assert_eq!(table.lines().count(), 2);
        assert!(table.contains("     3     0.00  1500.00     0.00"));
    }
}
