use serde::{Deserialize, Serialize};

use crate::{Level, Promotion};

/// A submission that passed validation and is ready to be recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedGrade {
    pub name: String,
    pub score: u32,
}

/// One evaluation in the grade ledger.
///
/// `score` was checked against the cap of `level` when the record was created;
/// it is never re-validated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeRecord {
    pub trainee: String,
    pub score: u32,
    pub level: Level,
    pub promotion: Promotion,
    /// Opaque identity of whoever submitted the grade.
    pub graded_by: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl GradeRecord {
    #[must_use]
    pub fn belongs_to(&self, level: Level, promotion: Promotion) -> bool {
        self.level == level && self.promotion == promotion
    }
}

#[cfg(test)]
mod tests {
    use super::{GradeRecord, Level, Promotion};

    #[test]
    fn ledger_entry_uses_camel_case_keys() {
        let record = GradeRecord {
            trainee: "Ana_Perez".to_string(),
            score: 12,
            level: Level::FIRST,
            promotion: Promotion::FIRST,
            graded_by: "1234".to_string(),
            timestamp: 1_700_000_000_000,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "trainee": "Ana_Perez",
                "score": 12,
                "level": 1,
                "promotion": 1,
                "gradedBy": "1234",
                "timestamp": 1_700_000_000_000_i64
            })
        );
    }
}
