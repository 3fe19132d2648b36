//! Manifest parser registry
//!
//! Classification rules are data: a table mapping a manifest filename to a
//! parser function that yields zero or more findings. Adding an ecosystem
//! means adding a row and a parser, nothing structural.

pub mod cargo;
pub mod docker;
pub mod gomod;
pub mod gradle;
pub mod maven;
pub mod node;
pub mod php;
pub mod python;
pub mod ruby;

use super::Finding;
use crate::snapshot::FileSample;

/// One classification rule: manifest filename plus its parser.
pub struct ManifestRule {
    pub filename: &'static str,
    pub parser: fn(&FileSample) -> Vec<Finding>,
}

/// The full rule table, keyed by exact basename.
pub const RULES: &[ManifestRule] = &[
    ManifestRule {
        filename: "package.json",
        parser: node::parse_package_json,
    },
    ManifestRule {
        filename: "Cargo.toml",
        parser: cargo::parse_cargo_toml,
    },
    ManifestRule {
        filename: "requirements.txt",
        parser: python::parse_requirements,
    },
    ManifestRule {
        filename: "pyproject.toml",
        parser: python::parse_pyproject,
    },
    ManifestRule {
        filename: "pom.xml",
        parser: maven::parse_pom,
    },
    ManifestRule {
        filename: "build.gradle",
        parser: gradle::parse_gradle,
    },
    ManifestRule {
        filename: "build.gradle.kts",
        parser: gradle::parse_gradle,
    },
    ManifestRule {
        filename: "go.mod",
        parser: gomod::parse_go_mod,
    },
    ManifestRule {
        filename: "Gemfile",
        parser: ruby::parse_gemfile,
    },
    ManifestRule {
        filename: "composer.json",
        parser: php::parse_composer_json,
    },
    ManifestRule {
        filename: "Dockerfile",
        parser: docker::parse_dockerfile,
    },
    ManifestRule {
        filename: "docker-compose.yml",
        parser: docker::parse_compose,
    },
    ManifestRule {
        filename: "docker-compose.yaml",
        parser: docker::parse_compose,
    },
];

/// Looks up the rule for a file basename. `Dockerfile.dev` and friends hit
/// the Dockerfile parser.
pub fn rule_for(file_name: &str) -> Option<&'static ManifestRule> {
    if let Some(rule) = RULES.iter().find(|r| r.filename == file_name) {
        return Some(rule);
    }
    if file_name.starts_with("Dockerfile.") {
        return RULES.iter().find(|r| r.filename == "Dockerfile");
    }
    None
}

/// Strips range operators and whitespace from a declared version, keeping it
/// only when it starts with a digit (`^14.0.0` yields `14.0.0`, `*` yields None).
pub(crate) fn clean_version(raw: &str) -> Option<String> {
    let cleaned = raw
        .trim()
        .trim_start_matches(['^', '~', '>', '<', '=', 'v', ' '])
        .trim();
    if cleaned.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        Some(cleaned.to_string())
    } else {
        None
    }
}
