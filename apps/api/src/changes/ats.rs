//! ATS preview — before/after compatibility scores supplied by the external
//! scorer. Carried as-is; only clamped and differenced for display.
//!
//! The preview describes the full optimized document the tailoring service
//! returned. It is never recomputed for a partial selection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsPreview {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword_coverage_before: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword_coverage_after: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<BTreeMap<String, Value>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum ScoreDelta {
    Available(f64),
    Unavailable,
}

/// Display view of an `AtsPreview`: scores clamped to [0, 100].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsScoreView {
    pub before_score: Option<f64>,
    pub after_score: Option<f64>,
    pub delta: ScoreDelta,
}

impl AtsPreview {
    pub fn view(&self) -> AtsScoreView {
        let before_score = self.before_score.and_then(clamp_score);
        let after_score = self.after_score.and_then(clamp_score);

        let delta = match (before_score, after_score) {
            (Some(before), Some(after)) => ScoreDelta::Available(after - before),
            _ => ScoreDelta::Unavailable,
        };

        AtsScoreView {
            before_score,
            after_score,
            delta,
        }
    }
}

/// NaN carries no information and is treated as absent.
fn clamp_score(score: f64) -> Option<f64> {
    if score.is_nan() {
        None
    } else {
        Some(score.clamp(0.0, 100.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_delta_when_both_present() {
        let preview = AtsPreview {
            before_score: Some(52.0),
            after_score: Some(78.5),
            ..Default::default()
        };
        let view = preview.view();
        assert_eq!(view.delta, ScoreDelta::Available(26.5));
    }

    #[test]
    fn test_scores_are_clamped_before_differencing() {
        let preview = AtsPreview {
            before_score: Some(-10.0),
            after_score: Some(140.0),
            ..Default::default()
        };
        let view = preview.view();
        assert_eq!(view.before_score, Some(0.0));
        assert_eq!(view.after_score, Some(100.0));
        assert_eq!(view.delta, ScoreDelta::Available(100.0));
    }

    #[test]
    fn test_unavailable_when_either_missing() {
        let only_after = AtsPreview {
            after_score: Some(80.0),
            ..Default::default()
        };
        assert_eq!(only_after.view().delta, ScoreDelta::Unavailable);
        assert_eq!(AtsPreview::default().view().delta, ScoreDelta::Unavailable);

        let nan = AtsPreview {
            before_score: Some(f64::NAN),
            after_score: Some(80.0),
            ..Default::default()
        };
        assert_eq!(nan.view().before_score, None);
        assert_eq!(nan.view().delta, ScoreDelta::Unavailable);
    }

    #[test]
    fn test_deserializes_camel_case_with_opaque_extras() {
        let preview: AtsPreview = serde_json::from_value(json!({
            "beforeScore": 40,
            "afterScore": 72,
            "keywordCoverageBefore": {"matched": 3, "total": 10},
            "breakdown": {"formatting": 9}
        }))
        .unwrap();

        assert_eq!(preview.before_score, Some(40.0));
        assert_eq!(preview.breakdown.unwrap()["formatting"], json!(9));
    }

    #[test]
    fn test_view_serializes_delta_status() {
        let view = AtsPreview::default().view();
        let value = serde_json::to_value(view).unwrap();
        assert_eq!(value["delta"], json!({"status": "unavailable"}));
    }
}
