//! Plan text rendering
//!
//! Deterministic: the same structured plan always renders to the same
//! bytes, and all ten section markers appear in fixed order regardless of
//! section content.

use std::fmt::Write;

use super::ExecutablePlan;

/// The ten section markers, in rendering order.
pub const SECTION_MARKERS: [&str; 10] = [
    "## Overview",
    "## Architecture",
    "## Modules",
    "## Interfaces",
    "## Data Models",
    "## Behavior Rules",
    "## Build Steps",
    "## Test Expectations",
    "## Constraints",
    "## Non-Goals",
];

const EMPTY_SECTION: &str = "(none)";

pub fn render(plan: &ExecutablePlan) -> String {
    let mut out = String::new();
    out.push_str("# Build Plan\n");

    paragraph(&mut out, SECTION_MARKERS[0], &plan.overview);
    paragraph(&mut out, SECTION_MARKERS[1], &plan.architecture);

    out.push('\n');
    out.push_str(SECTION_MARKERS[2]);
    out.push('\n');
    if plan.modules.is_empty() {
        out.push_str(EMPTY_SECTION);
        out.push('\n');
    } else {
        for module in &plan.modules {
            let _ = write!(out, "- {}: {}", module.name, module.purpose);
            if !module.depends_on.is_empty() {
                let _ = write!(out, " (depends on {})", module.depends_on.join(", "));
            }
            out.push('\n');
        }
    }

    bullets(&mut out, SECTION_MARKERS[3], &plan.interfaces);
    bullets(&mut out, SECTION_MARKERS[4], &plan.data_models);
    bullets(&mut out, SECTION_MARKERS[5], &plan.behavior_rules);

    out.push('\n');
    out.push_str(SECTION_MARKERS[6]);
    out.push('\n');
    if plan.build_steps.is_empty() {
        out.push_str(EMPTY_SECTION);
        out.push('\n');
    } else {
        for (idx, step) in plan.build_steps.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", idx + 1, step);
        }
    }

    bullets(&mut out, SECTION_MARKERS[7], &plan.test_expectations);
    bullets(&mut out, SECTION_MARKERS[8], &plan.constraints);
    bullets(&mut out, SECTION_MARKERS[9], &plan.non_goals);

    out
}

fn paragraph(out: &mut String, marker: &str, body: &str) {
    out.push('\n');
    out.push_str(marker);
    out.push('\n');
    if body.trim().is_empty() {
        out.push_str(EMPTY_SECTION);
    } else {
        out.push_str(body.trim());
    }
    out.push('\n');
}

fn bullets(out: &mut String, marker: &str, items: &[String]) {
    out.push('\n');
    out.push_str(marker);
    out.push('\n');
    if items.is_empty() {
        out.push_str(EMPTY_SECTION);
        out.push('\n');
    } else {
        for item in items {
            let _ = writeln!(out, "- {}", item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{ExecutablePlan, PlanModule};

    fn sample_plan() -> ExecutablePlan {
        ExecutablePlan {
            overview: "A storefront".to_string(),
            architecture: "web talks to api".to_string(),
            modules: vec![
                PlanModule {
                    name: "web".to_string(),
                    purpose: "render pages".to_string(),
                    depends_on: vec!["api".to_string()],
                },
                PlanModule {
                    name: "api".to_string(),
                    purpose: "serve orders".to_string(),
                    depends_on: vec![],
                },
            ],
            interfaces: vec!["web -> api (request)".to_string()],
            build_steps: vec!["npm install".to_string(), "npm run build".to_string()],
            non_goals: vec!["No deployment automation".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_rendering_is_byte_identical() {
        let plan = sample_plan();
        assert_eq!(render(&plan), render(&plan));
    }

    #[test]
    fn test_all_markers_present_in_order() {
        let text = render(&sample_plan());

        let mut last = 0;
        for marker in SECTION_MARKERS {
            let position = text[last..]
                .find(marker)
                .unwrap_or_else(|| panic!("missing marker {}", marker));
            last += position;
        }
    }

    #[test]
    fn test_markers_survive_empty_sections() {
        let text = render(&ExecutablePlan::default());
        for marker in SECTION_MARKERS {
            assert!(text.contains(marker));
        }
        assert!(text.contains("(none)"));
    }

    #[test]
    fn test_build_steps_are_numbered() {
        let text = render(&sample_plan());
        assert!(text.contains("1. npm install"));
        assert!(text.contains("2. npm run build"));
    }

    #[test]
    fn test_module_dependencies_rendered() {
        let text = render(&sample_plan());
        assert!(text.contains("- web: render pages (depends on api)"));
    }
}
