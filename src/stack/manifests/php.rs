//! composer.json parser

use serde_json::Value;

use super::clean_version;
use crate::snapshot::FileSample;
use crate::stack::StackCategory::{Auth, Backend, DataStore};
use crate::stack::{Finding, StackCategory};

const KNOWN_PACKAGES: &[(&str, StackCategory, &str, f32)] = &[
    ("laravel/framework", Backend, "Laravel", 0.2),
    ("symfony/framework-bundle", Backend, "Symfony", 0.2),
    ("slim/slim", Backend, "Slim", 0.15),
    ("doctrine/orm", DataStore, "Doctrine", 0.15),
    ("mongodb/mongodb", DataStore, "MongoDB", 0.15),
    ("predis/predis", DataStore, "Redis", 0.1),
    ("laravel/sanctum", Auth, "Laravel Sanctum", 0.15),
    ("firebase/php-jwt", Auth, "JWT", 0.05),
];

pub fn parse_composer_json(file: &FileSample) -> Vec<Finding> {
    let Ok(root) = serde_json::from_str::<Value>(&file.content) else {
        return Vec::new();
    };

    let mut findings = Vec::new();
    for section in ["require", "require-dev"] {
        let Some(deps) = root.get(section).and_then(Value::as_object) else {
            continue;
        };
        for (package, version) in deps {
            let Some(&(_, category, display, boost)) =
                KNOWN_PACKAGES.iter().find(|(name, ..)| name == package)
            else {
                continue;
            };
            let raw_version = version.as_str().unwrap_or_default();
            findings.push(
                Finding::new(
                    category,
                    display,
                    format!("{} require {}@{}", file.path, package, raw_version),
                )
                .with_version(clean_version(raw_version))
                .with_boost(boost),
            );
        }
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_laravel_detected() {
        let file = FileSample::new(
            "composer.json",
            r#"{"require": {"php": "^8.2", "laravel/framework": "^10.35"}}"#,
        );
        let findings = parse_composer_json(&file);

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].name, "Laravel");
        assert_eq!(findings[0].version, Some("10.35".to_string()));
    }
}
