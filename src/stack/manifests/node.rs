//! package.json parser

use serde_json::Value;

use super::clean_version;
use crate::snapshot::FileSample;
use crate::stack::StackCategory::{Auth, Backend, DataStore, Frontend, Infrastructure};
use crate::stack::{Finding, StackCategory};

/// Known npm dependencies: package name, category, display name, boost.
const KNOWN_DEPENDENCIES: &[(&str, StackCategory, &str, f32)] = &[
    ("next", Frontend, "Next.js", 0.2),
    ("react", Frontend, "React", 0.15),
    ("vue", Frontend, "Vue.js", 0.2),
    ("svelte", Frontend, "Svelte", 0.2),
    ("@angular/core", Frontend, "Angular", 0.2),
    ("nuxt", Frontend, "Nuxt", 0.2),
    ("tailwindcss", Frontend, "Tailwind CSS", 0.05),
    ("vite", Frontend, "Vite", 0.05),
    ("express", Backend, "Express", 0.2),
    ("fastify", Backend, "Fastify", 0.2),
    ("@nestjs/core", Backend, "NestJS", 0.2),
    ("koa", Backend, "Koa", 0.15),
    ("hono", Backend, "Hono", 0.15),
    ("mongoose", DataStore, "MongoDB", 0.15),
    ("mongodb", DataStore, "MongoDB", 0.15),
    ("pg", DataStore, "PostgreSQL", 0.15),
    ("mysql2", DataStore, "MySQL", 0.15),
    ("@prisma/client", DataStore, "Prisma", 0.1),
    ("prisma", DataStore, "Prisma", 0.1),
    ("drizzle-orm", DataStore, "Drizzle", 0.1),
    ("redis", DataStore, "Redis", 0.1),
    ("ioredis", DataStore, "Redis", 0.1),
    ("sqlite3", DataStore, "SQLite", 0.1),
    ("@supabase/supabase-js", DataStore, "Supabase", 0.15),
    ("next-auth", Auth, "NextAuth.js", 0.15),
    ("@clerk/nextjs", Auth, "Clerk", 0.15),
    ("passport", Auth, "Passport", 0.15),
    ("jsonwebtoken", Auth, "JWT", 0.05),
    ("@auth0/nextjs-auth0", Auth, "Auth0", 0.15),
    ("serverless", Infrastructure, "Serverless Framework", 0.1),
    ("aws-sdk", Infrastructure, "AWS", 0.05),
    ("@aws-sdk/client-s3", Infrastructure, "AWS", 0.05),
];

pub fn parse_package_json(file: &FileSample) -> Vec<Finding> {
    let Ok(root) = serde_json::from_str::<Value>(&file.content) else {
        return Vec::new();
    };

    let mut findings = Vec::new();
    for section in ["dependencies", "devDependencies"] {
        let Some(deps) = root.get(section).and_then(Value::as_object) else {
            continue;
        };
        for (dep, version) in deps {
            let Some(&(_, category, display, boost)) =
                KNOWN_DEPENDENCIES.iter().find(|(name, ..)| name == dep)
            else {
                continue;
            };
            let raw_version = version.as_str().unwrap_or_default();
            findings.push(
                Finding::new(
                    category,
                    display,
                    format!("{} dependency {}@{}", file.path, dep, raw_version),
                )
                .with_version(clean_version(raw_version))
                .with_boost(boost),
            );
        }
    }
    findings
}
