use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::analysis::AnalysisOutcome;

/// Which operation produced a stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    Review,
    Match,
    Rewrite,
    CoverLetter,
}

/// One completed analysis, as kept in the in-memory store and returned to
/// clients. The payload is the coerced JSON value, verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub kind: AnalysisKind,
    pub payload: Value,
    pub was_repaired: bool,
    pub degraded: bool,
    pub created_at: DateTime<Utc>,
}

impl AnalysisRecord {
    pub fn new(kind: AnalysisKind, outcome: &AnalysisOutcome) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            payload: outcome.payload.clone(),
            was_repaired: outcome.was_repaired,
            degraded: outcome.degraded,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&AnalysisKind::CoverLetter).unwrap(),
            r#""cover_letter""#
        );
        let kind: AnalysisKind = serde_json::from_str(r#""match""#).unwrap();
        assert_eq!(kind, AnalysisKind::Match);
    }

    #[test]
    fn test_record_round_trips_through_json() {
        let outcome = AnalysisOutcome {
            payload: json!({"score": 10}),
            was_repaired: true,
            degraded: false,
        };
        let record = AnalysisRecord::new(AnalysisKind::Review, &outcome);
        let json = serde_json::to_string(&record).unwrap();
        let recovered: AnalysisRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(recovered.id, record.id);
        assert_eq!(recovered.kind, AnalysisKind::Review);
        assert!(recovered.was_repaired);
        assert_eq!(recovered.payload, json!({"score": 10}));
    }
}
