//! build.gradle / build.gradle.kts parser
//!
//! Line-oriented: Gradle builds are scripts, so this only reads dependency
//! coordinates and plugin ids, never evaluates anything.

use regex::Regex;

use super::clean_version;
use crate::snapshot::FileSample;
use crate::stack::StackCategory::{Auth, Backend, DataStore};
use crate::stack::{Finding, StackCategory};

const KNOWN_COORDINATES: &[(&str, StackCategory, &str, f32)] = &[
    ("org.springframework.boot", Backend, "Spring Boot", 0.2),
    ("io.ktor", Backend, "Ktor", 0.2),
    ("io.micronaut", Backend, "Micronaut", 0.2),
    ("io.quarkus", Backend, "Quarkus", 0.2),
    ("org.postgresql:postgresql", DataStore, "PostgreSQL", 0.15),
    ("com.mysql:mysql-connector-j", DataStore, "MySQL", 0.15),
    ("org.mongodb:", DataStore, "MongoDB", 0.15),
    ("redis.clients:jedis", DataStore, "Redis", 0.1),
    ("org.springframework.security", Auth, "Spring Security", 0.15),
];

pub fn parse_gradle(file: &FileSample) -> Vec<Finding> {
    let dependency_re =
        Regex::new(r#"(?:implementation|api|compileOnly|runtimeOnly|compile)\s*\(?\s*["']([^"']+)["']"#)
            .unwrap();
    let plugin_re =
        Regex::new(r#"id\s*\(?\s*["']([\w.-]+)["']\s*\)?\s*version\s*\(?\s*["']([^"']+)["']"#)
            .unwrap();

    let mut findings = Vec::new();

    for captures in dependency_re.captures_iter(&file.content) {
        let coordinate = &captures[1];
        let Some(&(_, category, display, boost)) = KNOWN_COORDINATES
            .iter()
            .find(|(prefix, ..)| coordinate.starts_with(prefix))
        else {
            continue;
        };
        let version = coordinate.splitn(3, ':').nth(2).unwrap_or("");
        findings.push(
            Finding::new(
                category,
                display,
                format!("{} dependency {}", file.path, coordinate),
            )
            .with_version(clean_version(version))
            .with_boost(boost),
        );
    }

    for captures in plugin_re.captures_iter(&file.content) {
        let plugin = &captures[1];
        let version = &captures[2];
        let Some(&(_, category, display, boost)) = KNOWN_COORDINATES
            .iter()
            .find(|(prefix, ..)| plugin.starts_with(prefix))
        else {
            continue;
        };
        findings.push(
            Finding::new(category, display, format!("{} plugin {}", file.path, plugin))
                .with_version(clean_version(version))
                .with_boost(boost),
        );
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groovy_dependencies() {
        let file = FileSample::new(
            "build.gradle",
            r#"
dependencies {
    implementation 'org.springframework.boot:spring-boot-starter-web:3.2.0'
    runtimeOnly 'org.postgresql:postgresql:42.7.1'
    testImplementation 'org.junit.jupiter:junit-jupiter'
}
"#,
        );
        let findings = parse_gradle(&file);

        let spring = findings.iter().find(|f| f.name == "Spring Boot").unwrap();
        assert_eq!(spring.version, Some("3.2.0".to_string()));
        assert!(findings.iter().any(|f| f.name == "PostgreSQL"));
    }

    #[test]
    fn test_kotlin_dsl_plugin_version() {
        let file = FileSample::new(
            "build.gradle.kts",
            r#"plugins { id("org.springframework.boot") version "3.2.1" }"#,
        );
        let findings = parse_gradle(&file);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].version, Some("3.2.1".to_string()));
    }

    #[test]
    fn test_unrelated_script_yields_nothing() {
        let file = FileSample::new("build.gradle", "task hello { println 'hi' }");
        assert!(parse_gradle(&file).is_empty());
    }
}
