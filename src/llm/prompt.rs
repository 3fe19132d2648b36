//! Prompt assembly and size budgeting
//!
//! Prompt size must stay bounded independent of repository size: file
//! samples are truncated per-file and greedily packed until the character
//! budget is exhausted.

use crate::snapshot::FileSample;

/// Fixed system-level instruction sent with every extraction prompt.
///
/// The service is expected (not guaranteed) to comply; the extraction
/// contract tolerates prose and markdown fencing anyway.
pub const JSON_ONLY_INSTRUCTION: &str = "You are a precise software analysis assistant. \
Respond with a single JSON object only. \
No prose, no explanations, no markdown fencing.";

/// A system + user prompt pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    /// A prompt with the fixed JSON-only system instruction.
    pub fn json_only(user: impl Into<String>) -> Self {
        Self::new(JSON_ONLY_INSTRUCTION, user)
    }

    /// A prompt with an empty system part (tests, ad hoc calls).
    pub fn user(user: impl Into<String>) -> Self {
        Self::new("", user)
    }

    pub fn len(&self) -> usize {
        self.system.len() + self.user.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Character budget applied when packing file samples into a prompt.
#[derive(Debug, Clone, Copy)]
pub struct PromptBudget {
    /// Total characters available for packed file content
    pub max_chars: usize,
    /// Per-file truncation cap
    pub per_file_chars: usize,
}

impl Default for PromptBudget {
    fn default() -> Self {
        Self {
            max_chars: 24_000,
            per_file_chars: 2_000,
        }
    }
}

impl PromptBudget {
    pub fn new(max_chars: usize, per_file_chars: usize) -> Self {
        Self {
            max_chars,
            per_file_chars,
        }
    }
}

/// Greedily packs file samples, in the order given, until the budget is hit.
///
/// Each sample is truncated to `per_file_chars` first; a sample that no
/// longer fits in the remaining budget ends the packing (files are already
/// ordered by relevance, so later files are the least valuable).
pub fn pack_files<'a, I>(files: I, budget: &PromptBudget) -> String
where
    I: IntoIterator<Item = &'a FileSample>,
{
    let mut out = String::new();
    let mut remaining = budget.max_chars;

    for file in files {
        let body = truncate_chars(&file.content, budget.per_file_chars);
        let block_len = file.path.len() + body.len() + 16;
        if block_len > remaining {
            break;
        }
        out.push_str("--- ");
        out.push_str(&file.path);
        out.push_str(" ---\n");
        out.push_str(body);
        if !body.ends_with('\n') {
            out.push('\n');
        }
        remaining -= block_len;
    }

    out
}

/// Truncates on a char boundary, never mid-codepoint.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(path: &str, content: &str) -> FileSample {
        FileSample::new(path, content)
    }

    #[test]
    fn test_prompt_json_only_carries_instruction() {
        let prompt = Prompt::json_only("analyze this");
        assert_eq!(prompt.system, JSON_ONLY_INSTRUCTION);
        assert_eq!(prompt.user, "analyze this");
    }

    #[test]
    fn test_pack_respects_total_budget() {
        let files = vec![
            sample("a.txt", &"x".repeat(500)),
            sample("b.txt", &"y".repeat(500)),
            sample("c.txt", &"z".repeat(500)),
        ];
        let budget = PromptBudget::new(1100, 2_000);
        let packed = pack_files(&files, &budget);

        assert!(packed.contains("--- a.txt ---"));
        assert!(packed.contains("--- b.txt ---"));
        // Third file does not fit
        assert!(!packed.contains("c.txt"));
        assert!(packed.len() <= 1100);
    }

    #[test]
    fn test_pack_truncates_each_file() {
        let files = vec![sample("big.txt", &"a".repeat(10_000))];
        let budget = PromptBudget::new(24_000, 100);
        let packed = pack_files(&files, &budget);
        assert!(packed.len() < 200);
    }

    #[test]
    fn test_pack_is_order_preserving() {
        let files = vec![sample("first", "1"), sample("second", "2")];
        let packed = pack_files(&files, &PromptBudget::default());
        let first = packed.find("first").unwrap();
        let second = packed.find("second").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_truncate_chars_multibyte_safe() {
        let text = "héllo wörld";
        let cut = truncate_chars(text, 3);
        assert_eq!(cut, "hél");
    }
}
