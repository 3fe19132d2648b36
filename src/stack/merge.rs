//! Finding merge and confidence scoring
//!
//! Findings are grouped by (category, case-insensitive name). The first
//! occurrence seeds `clamp(0.45 + 0.15 + boost)`, each repeat adds a flat
//! +0.10 capped at the ceiling, appends its evidence, and backfills a
//! missing version. The arithmetic is a frozen heuristic policy.

use std::collections::HashMap;

use super::{Finding, StackCategory, StackItem, TechnologyFingerprint};

const SEED_BASE: f32 = 0.45;
const SEED_STEP: f32 = 0.15;
const REPEAT_BONUS: f32 = 0.10;
const CONFIDENCE_FLOOR: f32 = 0.35;
const CONFIDENCE_CEILING: f32 = 0.99;

/// Confidence at or below this lands the item in the low-confidence list.
pub const LOW_CONFIDENCE_CEILING: f32 = 0.55;

/// Accumulates findings and produces the merged fingerprint.
#[derive(Default)]
pub struct FindingMerger {
    items: Vec<StackItem>,
    index: HashMap<(StackCategory, String), usize>,
}

impl FindingMerger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, finding: Finding) {
        let key = (finding.category, finding.name.to_ascii_lowercase());

        match self.index.get(&key) {
            Some(&idx) => {
                let item = &mut self.items[idx];
                item.confidence = (item.confidence + REPEAT_BONUS).min(CONFIDENCE_CEILING);
                item.evidence.push(finding.evidence);
                if item.version.is_none() {
                    item.version = finding.version;
                }
            }
            None => {
                let confidence = (SEED_BASE + SEED_STEP + finding.boost)
                    .clamp(CONFIDENCE_FLOOR, CONFIDENCE_CEILING);
                self.index.insert(key, self.items.len());
                self.items.push(StackItem {
                    category: finding.category,
                    name: finding.name,
                    version: finding.version,
                    confidence,
                    evidence: vec![finding.evidence],
                });
            }
        }
    }

    /// Rounds, buckets by category, sorts each bucket by descending
    /// confidence, and collects the low-confidence tokens.
    pub fn finish(self) -> TechnologyFingerprint {
        let mut fingerprint = TechnologyFingerprint::default();

        for mut item in self.items {
            item.confidence = round2(item.confidence);
            fingerprint.category_mut(item.category).push(item);
        }

        for category in StackCategory::ALL {
            fingerprint
                .category_mut(category)
                .sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        }

        fingerprint.low_confidence = fingerprint
            .items()
            .filter(|item| item.confidence <= LOW_CONFIDENCE_CEILING)
            .map(|item| format!("{}:{}", item.category, item.name))
            .collect();

        fingerprint
    }
}

pub(crate) fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}
