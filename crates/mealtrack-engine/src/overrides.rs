//! Candidate override ranking.
//!
//! Repositories already return candidates sorted `priority DESC,
//! created_at DESC`, but the resolver must not depend on a backing
//! store's sort being stable. Re-ranking here with the same key makes
//! the recency tie-break an explicit contract of the engine.

use mealtrack_core::models::override_rule::RuleOverride;

/// Candidates in resolution order: highest priority first, most
/// recently created first within a priority class.
pub fn ranked(candidates: &[RuleOverride]) -> Vec<&RuleOverride> {
    let mut out: Vec<&RuleOverride> = candidates.iter().collect();
    out.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    out
}
