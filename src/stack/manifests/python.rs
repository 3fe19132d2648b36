//! requirements.txt and pyproject.toml parsers

use toml::Value;

use super::clean_version;
use crate::snapshot::FileSample;
use crate::stack::StackCategory::{Auth, Backend, DataStore, Infrastructure};
use crate::stack::{Finding, StackCategory};

const KNOWN_PACKAGES: &[(&str, StackCategory, &str, f32)] = &[
    ("django", Backend, "Django", 0.2),
    ("flask", Backend, "Flask", 0.2),
    ("fastapi", Backend, "FastAPI", 0.2),
    ("tornado", Backend, "Tornado", 0.15),
    ("sqlalchemy", DataStore, "SQLAlchemy", 0.15),
    ("psycopg2", DataStore, "PostgreSQL", 0.15),
    ("psycopg2-binary", DataStore, "PostgreSQL", 0.15),
    ("pymongo", DataStore, "MongoDB", 0.15),
    ("redis", DataStore, "Redis", 0.1),
    ("authlib", Auth, "Authlib", 0.1),
    ("pyjwt", Auth, "JWT", 0.05),
    ("django-allauth", Auth, "django-allauth", 0.1),
    ("celery", Infrastructure, "Celery", 0.1),
    ("gunicorn", Infrastructure, "Gunicorn", 0.05),
    ("uvicorn", Infrastructure, "Uvicorn", 0.05),
    ("boto3", Infrastructure, "AWS", 0.05),
];

fn lookup(package: &str) -> Option<&'static (&'static str, StackCategory, &'static str, f32)> {
    let normalized = package.to_ascii_lowercase();
    KNOWN_PACKAGES.iter().find(|(name, ..)| *name == normalized)
}

/// Parses `name==1.2` / `name>=1.2` requirement lines.
pub fn parse_requirements(file: &FileSample) -> Vec<Finding> {
    let mut findings = Vec::new();

    for line in file.content.lines() {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() || line.starts_with('-') {
            continue;
        }

        let split = line.find(|c: char| !matches!(c, 'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.'));
        let (package, spec) = match split {
            Some(idx) => line.split_at(idx),
            None => (line, ""),
        };
        let Some(&(_, category, display, boost)) = lookup(package) else {
            continue;
        };

        let version = spec
            .trim_start_matches(['=', '>', '<', '~', '!', ' '])
            .split(',')
            .next()
            .unwrap_or("");
        findings.push(
            Finding::new(category, display, format!("{} entry {}", file.path, line))
                .with_version(clean_version(version))
                .with_boost(boost),
        );
    }

    findings
}

/// Parses PEP 621 `[project.dependencies]` and poetry dependency tables.
pub fn parse_pyproject(file: &FileSample) -> Vec<Finding> {
    let Ok(root) = file.content.parse::<Value>() else {
        return Vec::new();
    };

    let mut findings = Vec::new();

    if let Some(deps) = root
        .get("project")
        .and_then(|p| p.get("dependencies"))
        .and_then(Value::as_array)
    {
        for requirement in deps.iter().filter_map(Value::as_str) {
            let synthetic = FileSample::new(file.path.clone(), requirement);
            findings.extend(parse_requirements(&synthetic));
        }
    }

    if let Some(deps) = root
        .get("tool")
        .and_then(|t| t.get("poetry"))
        .and_then(|p| p.get("dependencies"))
        .and_then(Value::as_table)
    {
        for (package, spec) in deps {
            let Some(&(_, category, display, boost)) = lookup(package) else {
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
                    format!("{} poetry dependency {}", file.path, package),
                )
                .with_version(clean_version(raw_version))
                .with_boost(boost),
            );
        }
    }

    findings
}
