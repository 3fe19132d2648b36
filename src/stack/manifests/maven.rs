//! pom.xml parser

use roxmltree::Document;

use super::clean_version;
use crate::snapshot::FileSample;
use crate::stack::StackCategory::{Auth, Backend, DataStore};
use crate::stack::{Finding, StackCategory};

/// Matched against `groupId:artifactId`.
const KNOWN_COORDINATES: &[(&str, StackCategory, &str, f32)] = &[
    ("org.springframework.boot:", Backend, "Spring Boot", 0.2),
    ("io.quarkus:", Backend, "Quarkus", 0.2),
    ("io.micronaut:", Backend, "Micronaut", 0.2),
    ("org.postgresql:postgresql", DataStore, "PostgreSQL", 0.15),
    ("com.mysql:mysql-connector-j", DataStore, "MySQL", 0.15),
    ("mysql:mysql-connector-java", DataStore, "MySQL", 0.15),
    ("org.mongodb:", DataStore, "MongoDB", 0.15),
    ("org.hibernate", DataStore, "Hibernate", 0.1),
    ("redis.clients:jedis", DataStore, "Redis", 0.1),
    ("org.springframework.security:", Auth, "Spring Security", 0.15),
    ("io.jsonwebtoken:", Auth, "JWT", 0.05),
];

pub fn parse_pom(file: &FileSample) -> Vec<Finding> {
    let Ok(doc) = Document::parse(&file.content) else {
        return Vec::new();
    };

    let mut findings = Vec::new();

    for dependency in doc.descendants().filter(|n| n.has_tag_name("dependency")) {
        let child_text = |tag: &str| {
            dependency
                .children()
                .find(|c| c.has_tag_name(tag))
                .and_then(|c| c.text())
                .unwrap_or("")
                .trim()
                .to_string()
        };

        let group = child_text("groupId");
        let artifact = child_text("artifactId");
        let version = child_text("version");
        let coordinate = format!("{}:{}", group, artifact);

        let Some(&(_, category, display, boost)) = KNOWN_COORDINATES
            .iter()
            .find(|(prefix, ..)| coordinate.starts_with(prefix))
        else {
            continue;
        };

        findings.push(
            Finding::new(
                category,
                display,
                format!("{} dependency {}", file.path, coordinate),
            )
            .with_version(clean_version(&version))
            .with_boost(boost),
        );
    }

    // The spring-boot parent pins the framework version when dependencies
    // omit it.
    if let Some(parent) = doc.descendants().find(|n| n.has_tag_name("parent")) {
        let artifact = parent
            .children()
            .find(|c| c.has_tag_name("artifactId"))
            .and_then(|c| c.text())
            .unwrap_or("");
        if artifact == "spring-boot-starter-parent" {
            let version = parent
                .children()
                .find(|c| c.has_tag_name("version"))
                .and_then(|c| c.text())
                .unwrap_or("");
            findings.push(
                Finding::new(
                    Backend,
                    "Spring Boot",
                    format!("{} parent spring-boot-starter-parent {}", file.path, version),
                )
                .with_version(clean_version(version))
                .with_boost(0.2),
            );
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spring_boot_with_parent_version() {
        let file = FileSample::new(
            "pom.xml",
            r#"<project>
  <parent>
    <groupId>org.springframework.boot</groupId>
    <artifactId>spring-boot-starter-parent</artifactId>
    <version>3.2.1</version>
  </parent>
  <dependencies>
    <dependency>
      <groupId>org.springframework.boot</groupId>
      <artifactId>spring-boot-starter-web</artifactId>
    </dependency>
    <dependency>
      <groupId>org.postgresql</groupId>
      <artifactId>postgresql</artifactId>
      <version>42.7.1</version>
    </dependency>
  </dependencies>
</project>"#,
        );
        let findings = parse_pom(&file);

        let spring: Vec<_> = findings.iter().filter(|f| f.name == "Spring Boot").collect();
        assert_eq!(spring.len(), 2);
        assert!(spring.iter().any(|f| f.version == Some("3.2.1".to_string())));

        let pg = findings.iter().find(|f| f.name == "PostgreSQL").unwrap();
        assert_eq!(pg.version, Some("42.7.1".to_string()));
    }

    #[test]
    fn test_invalid_xml_yields_nothing() {
        let file = FileSample::new("pom.xml", "<project><unclosed>");
        assert!(parse_pom(&file).is_empty());
    }
}
