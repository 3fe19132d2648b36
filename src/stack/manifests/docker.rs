//! Dockerfile and docker-compose parsers

use serde_yaml::Value;

use crate::snapshot::FileSample;
use crate::stack::StackCategory::{DataStore, Infrastructure};
use crate::stack::{Finding, StackCategory};

/// Service images that identify a backing technology.
const KNOWN_IMAGES: &[(&str, StackCategory, &str, f32)] = &[
    ("postgres", DataStore, "PostgreSQL", 0.15),
    ("mysql", DataStore, "MySQL", 0.15),
    ("mariadb", DataStore, "MariaDB", 0.15),
    ("mongo", DataStore, "MongoDB", 0.15),
    ("redis", DataStore, "Redis", 0.1),
    ("elasticsearch", DataStore, "Elasticsearch", 0.15),
    ("rabbitmq", Infrastructure, "RabbitMQ", 0.1),
    ("kafka", Infrastructure, "Kafka", 0.1),
    ("nginx", Infrastructure, "Nginx", 0.1),
    ("traefik", Infrastructure, "Traefik", 0.1),
];

fn image_finding(source_path: &str, image: &str, context: &str) -> Option<Finding> {
    let name = image.split('/').next_back().unwrap_or(image);
    let (base, tag) = match name.split_once(':') {
        Some((base, tag)) => (base, Some(tag)),
        None => (name, None),
    };

    let &(_, category, display, boost) = KNOWN_IMAGES
        .iter()
        .find(|(known, ..)| base == *known)?;

    let version = tag
        .filter(|t| t.chars().next().is_some_and(|c| c.is_ascii_digit()))
        .map(|t| t.to_string());

    Some(
        Finding::new(category, display, format!("{} {} {}", source_path, context, image))
            .with_version(version)
            .with_boost(boost),
    )
}

pub fn parse_dockerfile(file: &FileSample) -> Vec<Finding> {
    let mut findings = vec![Finding::new(
        Infrastructure,
        "Docker",
        format!("{} present", file.path),
    )
    .with_boost(0.1)];

    for line in file.content.lines() {
        let line = line.trim();
        let Some(rest) = line
            .strip_prefix("FROM ")
            .or_else(|| line.strip_prefix("from "))
        else {
            continue;
        };
        let image = rest.split_whitespace().next().unwrap_or("");
        if let Some(finding) = image_finding(&file.path, image, "FROM") {
            findings.push(finding);
        }
    }

    findings
}

pub fn parse_compose(file: &FileSample) -> Vec<Finding> {
    let Ok(root) = serde_yaml::from_str::<Value>(&file.content) else {
        return Vec::new();
    };

    let mut findings = vec![Finding::new(
        Infrastructure,
        "Docker Compose",
        format!("{} present", file.path),
    )
    .with_boost(0.1)];

    if let Some(services) = root.get("services").and_then(Value::as_mapping) {
        for (service_name, service) in services {
            let Some(image) = service.get("image").and_then(Value::as_str) else {
                continue;
            };
            let context = format!(
                "service {}",
                service_name.as_str().unwrap_or("<unnamed>")
            );
            if let Some(finding) = image_finding(&file.path, image, &context) {
                findings.push(finding);
            }
        }
    }

    findings
}
