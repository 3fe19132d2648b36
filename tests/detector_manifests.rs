//! Manifest-rule coverage: one ecosystem per case, driven through the full
//! detector.

use yare::parameterized;

use specforge::snapshot::{FileSample, RepoMetadata, RepoSource, RepositorySnapshot};
use specforge::stack::{detect, StackCategory};

fn snapshot_with(file_name: &str, content: &str) -> RepositorySnapshot {
    RepositorySnapshot {
        metadata: RepoMetadata {
            name: "fixture".to_string(),
            source: RepoSource::local("/repos/fixture"),
            description: None,
            default_branch: None,
        },
        tree: vec![file_name.to_string()],
        files: vec![FileSample::new(file_name, content)],
        languages: vec![],
    }
}

#[parameterized(
    node_express = {
        "package.json",
        r#"{"dependencies": {"express": "4.18.2"}}"#,
        StackCategory::Backend, "Express"
    },
    node_nextjs = {
        "package.json",
        r#"{"dependencies": {"next": "^14.0.0"}}"#,
        StackCategory::Frontend, "Next.js"
    },
    rust_axum = {
        "Cargo.toml",
        "[dependencies]\naxum = \"0.7\"\n",
        StackCategory::Backend, "Axum"
    },
    python_requirements = {
        "requirements.txt",
        "django==4.2.7\n",
        StackCategory::Backend, "Django"
    },
    python_pyproject = {
        "pyproject.toml",
        "[project]\nname = \"svc\"\ndependencies = [\"fastapi>=0.104\"]\n",
        StackCategory::Backend, "FastAPI"
    },
    java_maven = {
        "pom.xml",
        "<project><dependencies><dependency><groupId>org.springframework.boot</groupId><artifactId>spring-boot-starter-web</artifactId></dependency></dependencies></project>",
        StackCategory::Backend, "Spring Boot"
    },
    java_gradle = {
        "build.gradle",
        "dependencies { implementation 'org.springframework.boot:spring-boot-starter-web:3.2.0' }",
        StackCategory::Backend, "Spring Boot"
    },
    go_gin = {
        "go.mod",
        "module svc\n\nrequire github.com/gin-gonic/gin v1.9.1\n",
        StackCategory::Backend, "Gin"
    },
    ruby_rails = {
        "Gemfile",
        "gem 'rails', '~> 7.1.2'\n",
        StackCategory::Backend, "Ruby on Rails"
    },
    php_laravel = {
        "composer.json",
        r#"{"require": {"laravel/framework": "^10.35"}}"#,
        StackCategory::Backend, "Laravel"
    },
    dockerfile = {
        "Dockerfile",
        "FROM node:20-alpine\n",
        StackCategory::Infrastructure, "Docker"
    },
    compose_postgres = {
        "docker-compose.yml",
        "services:\n  db:\n    image: postgres:16.1\n",
        StackCategory::DataStore, "PostgreSQL"
    },
)]
fn manifest_detects_technology(
    file_name: &str,
    content: &str,
    category: StackCategory,
    expected: &str,
) {
    let fingerprint = detect(&snapshot_with(file_name, content));

    let item = fingerprint
        .category(category)
        .iter()
        .find(|item| item.name == expected)
        .unwrap_or_else(|| panic!("{} not detected from {}", expected, file_name));

    assert!((0.35..=0.99).contains(&item.confidence));
    assert!(!item.evidence.is_empty());
}

#[parameterized(
    readme = { "README.md" },
    lockfile = { "package-lock.json" },
    source = { "src/main.rs" },
)]
fn non_manifest_files_yield_nothing(file_name: &str) {
    let fingerprint = detect(&snapshot_with(file_name, "content"));
    assert_eq!(fingerprint.item_count(), 0);
}
