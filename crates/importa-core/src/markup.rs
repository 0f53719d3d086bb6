//! # Markup Scenarios
//!
//! Construction and merging of markup scenarios. Built-in scenarios cover
//! 150% through 300%; users can add custom percentages on top.
//!
//! ## Rules
//! - Ids are derived from the percentage (`markup-150` for 1.5) so re-adding
//!   the same percentage replaces rather than duplicates.
//! - Custom scenarios win over built-ins with the same id when merging.
//! - Merged lists sort by percentage ascending.

use crate::types::{default_markups, ColorToken, MarkupScenario};

/// Derives the canonical id for a markup percentage (1.5 -> `markup-150`).
pub fn markup_id(percentage: f64) -> String {
    format!("markup-{}", (percentage * 100.0).round() as i64)
}

/// Builds a custom markup scenario from a raw percentage.
///
/// Negative or non-finite percentages clamp to zero. The color token bands
/// the aggressiveness of the markup: 250%+ reads as success, 150%+ as
/// warning, anything thinner as danger.
pub fn custom_markup(percentage: f64) -> MarkupScenario {
    let pct = if percentage.is_finite() && percentage > 0.0 {
        percentage
    } else {
        0.0
    };
    let color = if pct >= 2.5 {
        ColorToken::Success
    } else if pct >= 1.5 {
        ColorToken::Warning
    } else {
        ColorToken::Danger
    };
    MarkupScenario {
        id: markup_id(pct),
        label: format!("{:.0}%", pct * 100.0),
        percentage: pct,
        is_custom: true,
        color_token: Some(color),
    }
}

/// Merges custom markups over the built-in set.
///
/// Deduplicates by id with custom entries taking precedence, then sorts by
/// percentage ascending.
pub fn merge_markups(custom: &[MarkupScenario]) -> Vec<MarkupScenario> {
    let mut merged: Vec<MarkupScenario> = Vec::new();
    for scenario in default_markups() {
        if !custom.iter().any(|c| c.id == scenario.id) {
            merged.push(scenario);
        }
    }
    merged.extend(custom.iter().cloned());
    merged.sort_by(|a, b| {
        a.percentage
            .partial_cmp(&b.percentage)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    merged
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markup_id_rounds_to_whole_percent() {
        assert_eq!(markup_id(1.5), "markup-150");
        assert_eq!(markup_id(2.0), "markup-200");
        assert_eq!(markup_id(1.753), "markup-175");
    }

    #[test]
    fn test_custom_markup_clamps_and_labels() {
        let m = custom_markup(1.75);
        assert_eq!(m.id, "markup-175");
        assert_eq!(m.label, "175%");
        assert!(m.is_custom);
        assert_eq!(m.color_token, Some(ColorToken::Warning));

        let zero = custom_markup(-0.5);
        assert_eq!(zero.percentage, 0.0);
        assert_eq!(zero.color_token, Some(ColorToken::Danger));
    }

    #[test]
    fn test_color_bands() {
        assert_eq!(custom_markup(3.0).color_token, Some(ColorToken::Success));
        assert_eq!(custom_markup(2.5).color_token, Some(ColorToken::Success));
        assert_eq!(custom_markup(2.0).color_token, Some(ColorToken::Warning));
        assert_eq!(custom_markup(1.0).color_token, Some(ColorToken::Danger));
    }

    #[test]
    fn test_merge_custom_wins_and_sorts() {
        let custom = vec![custom_markup(2.0), custom_markup(1.75)];
        let merged = merge_markups(&custom);
        // 150, 175, 200 (custom), 250, 300
        assert_eq!(merged.len(), 5);
        assert_eq!(merged[0].id, "markup-150");
        assert_eq!(merged[1].id, "markup-175");
        assert_eq!(merged[2].id, "markup-200");
        assert!(merged[2].is_custom);
        assert_eq!(merged[4].id, "markup-300");
    }

    #[test]
    fn test_merge_with_no_custom_is_defaults() {
        let merged = merge_markups(&[]);
        assert_eq!(merged.len(), 4);
        assert!(merged.iter().all(|m| !m.is_custom));
    }
}
