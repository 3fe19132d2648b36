//! Cargo.toml parser

use toml::Value;

use super::clean_version;
use crate::snapshot::FileSample;
use crate::stack::StackCategory::{Auth, Backend, DataStore, Infrastructure};
use crate::stack::{Finding, StackCategory};

const KNOWN_CRATES: &[(&str, StackCategory, &str, f32)] = &[
    ("axum", Backend, "Axum", 0.2),
    ("actix-web", Backend, "Actix Web", 0.2),
    ("rocket", Backend, "Rocket", 0.2),
    ("warp", Backend, "Warp", 0.15),
    ("tonic", Backend, "Tonic", 0.1),
    ("sqlx", DataStore, "SQLx", 0.15),
    ("diesel", DataStore, "Diesel", 0.15),
    ("sea-orm", DataStore, "SeaORM", 0.15),
    ("mongodb", DataStore, "MongoDB", 0.15),
    ("redis", DataStore, "Redis", 0.1),
    ("rusqlite", DataStore, "SQLite", 0.1),
    ("jsonwebtoken", Auth, "JWT", 0.05),
    ("oauth2", Auth, "OAuth2", 0.1),
    ("tokio", Infrastructure, "Tokio", 0.1),
];

pub fn parse_cargo_toml(file: &FileSample) -> Vec<Finding> {
    let Ok(root) = file.content.parse::<Value>() else {
        return Vec::new();
    };

    let mut findings = Vec::new();
    for section in ["dependencies", "dev-dependencies", "workspace.dependencies"] {
        let table = match section.split_once('.') {
            Some((outer, inner)) => root.get(outer).and_then(|v| v.get(inner)),
            None => root.get(section),
        };
        let Some(deps) = table.and_then(Value::as_table) else {
            continue;
        };

        for (dep, spec) in deps {
            let Some(&(_, category, display, boost)) =
                KNOWN_CRATES.iter().find(|(name, ..)| name == dep)
            else {
                continue;
            };
            let raw_version = match spec {
                Value::String(v) => v.as_str(),
                Value::Table(t) => t.get("version").and_then(Value::as_str).unwrap_or_default(),
                _ => "",
            };
            findings.push(
                Finding::new(
                    category,
                    display,
                    format!("{} dependency {} {}", file.path, dep, raw_version),
                )
                .with_version(clean_version(raw_version))
                .with_boost(boost),
            );
        }
    }
    findings
}
