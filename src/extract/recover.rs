//! JSON recovery from free-form service responses
//!
//! The service is instructed to return JSON only, but must be tolerated when
//! it wraps the document in prose or markdown fencing. Recovery tries, in
//! order: a fenced code-block match, the substring between the first `{` and
//! the last `}`, then the trimmed raw text.

use regex::Regex;

/// Extracts the best JSON candidate from a response. Always returns
/// something; whether it parses is the caller's problem.
pub fn json_candidate(response: &str) -> String {
    let trimmed = response.trim();

    if trimmed.contains("```") {
        if let Some(block) = fenced_block(trimmed) {
            return block;
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            return trimmed[start..=end].to_string();
        }
    }

    trimmed.to_string()
}

fn fenced_block(text: &str) -> Option<String> {
    let re = Regex::new(r"```(?:json)?\s*\n?([\s\S]*?)\n?```").unwrap();
    let captures = re.captures(text)?;
    let body = captures.get(1)?.as_str().trim();
    if body.is_empty() {
        None
    } else {
        Some(body.to_string())
    }
}
