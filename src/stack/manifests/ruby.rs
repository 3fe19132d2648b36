//! Gemfile parser

use regex::Regex;

use super::clean_version;
use crate::snapshot::FileSample;
use crate::stack::StackCategory::{Auth, Backend, DataStore};
use crate::stack::{Finding, StackCategory};

const KNOWN_GEMS: &[(&str, StackCategory, &str, f32)] = &[
    ("rails", Backend, "Ruby on Rails", 0.2),
    ("sinatra", Backend, "Sinatra", 0.2),
    ("pg", DataStore, "PostgreSQL", 0.15),
    ("mysql2", DataStore, "MySQL", 0.15),
    ("mongoid", DataStore, "MongoDB", 0.15),
    ("redis", DataStore, "Redis", 0.1),
    ("devise", Auth, "Devise", 0.15),
    ("omniauth", Auth, "OmniAuth", 0.1),
];

pub fn parse_gemfile(file: &FileSample) -> Vec<Finding> {
    let gem_re = Regex::new(r#"^\s*gem\s+["']([\w-]+)["'](?:\s*,\s*["']([^"']+)["'])?"#).unwrap();

    let mut findings = Vec::new();
    for line in file.content.lines() {
        let Some(captures) = gem_re.captures(line) else {
            continue;
        };
        let gem = &captures[1];
        let Some(&(_, category, display, boost)) =
            KNOWN_GEMS.iter().find(|(name, ..)| name == &gem)
        else {
            continue;
        };
        let version = captures.get(2).map(|m| m.as_str()).unwrap_or("");
        findings.push(
            Finding::new(category, display, format!("{} gem {}", file.path, gem))
                .with_version(clean_version(version))
                .with_boost(boost),
        );
    }
    findings
}
