//! go.mod parser

use super::clean_version;
use crate::snapshot::FileSample;
use crate::stack::StackCategory::{Auth, Backend, DataStore, Infrastructure};
use crate::stack::{Finding, StackCategory};

const KNOWN_MODULES: &[(&str, StackCategory, &str, f32)] = &[
    ("github.com/gin-gonic/gin", Backend, "Gin", 0.2),
    ("github.com/labstack/echo", Backend, "Echo", 0.2),
    ("github.com/gofiber/fiber", Backend, "Fiber", 0.2),
    ("github.com/go-chi/chi", Backend, "Chi", 0.15),
    ("google.golang.org/grpc", Backend, "gRPC", 0.1),
    ("gorm.io/gorm", DataStore, "GORM", 0.15),
    ("github.com/lib/pq", DataStore, "PostgreSQL", 0.15),
    ("github.com/jackc/pgx", DataStore, "PostgreSQL", 0.15),
    ("go.mongodb.org/mongo-driver", DataStore, "MongoDB", 0.15),
    ("github.com/redis/go-redis", DataStore, "Redis", 0.1),
    ("github.com/golang-jwt/jwt", Auth, "JWT", 0.05),
    ("github.com/aws/aws-sdk-go", Infrastructure, "AWS", 0.05),
];

pub fn parse_go_mod(file: &FileSample) -> Vec<Finding> {
    let mut findings = Vec::new();

    for line in file.content.lines() {
        let line = line.trim().trim_start_matches("require").trim();
        let mut parts = line.split_whitespace();
        let (Some(module), version) = (parts.next(), parts.next().unwrap_or("")) else {
            continue;
        };

        let Some(&(_, category, display, boost)) = KNOWN_MODULES
            .iter()
            .find(|(prefix, ..)| module.starts_with(prefix))
        else {
            continue;
        };

        findings.push(
            Finding::new(
                category,
                display,
                format!("{} require {} {}", file.path, module, version),
            )
            .with_version(clean_version(version))
            .with_boost(boost),
        );
    }

    findings
}
