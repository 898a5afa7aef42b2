// src/domain/evaluation_status.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// 評価の状態を表すenum
///
/// draft → submitted → approved → completed の一方向フローに、
/// submitted → draft（マネージャーによる差し戻し）のみ逆方向が許可される。
/// approved は従業員による承認、completed はHRによる最終確定。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStatus {
    Draft,
    Submitted,
    Approved,
    Completed,
}

impl EvaluationStatus {
    /// 文字列からEvaluationStatusに変換
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "submitted" => Some(Self::Submitted),
            "approved" => Some(Self::Approved),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// EvaluationStatusを文字列として取得
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Completed => "completed",
        }
    }

    /// すべての有効なステータスを取得
    pub fn all() -> Vec<Self> {
        vec![Self::Draft, Self::Submitted, Self::Approved, Self::Completed]
    }

    /// 終端状態かチェック
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// 有効なステータス遷移かチェック
    pub fn can_transition_to(&self, new_status: Self) -> bool {
        matches!(
            (self, new_status),
            (Self::Draft, Self::Submitted)
                | (Self::Submitted, Self::Approved)
                | (Self::Submitted, Self::Draft)
                | (Self::Approved, Self::Completed)
        )
    }
}

impl fmt::Display for EvaluationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transitions() {
        assert!(EvaluationStatus::Draft.can_transition_to(EvaluationStatus::Submitted));
        assert!(EvaluationStatus::Submitted.can_transition_to(EvaluationStatus::Approved));
        // 差し戻し
        assert!(EvaluationStatus::Submitted.can_transition_to(EvaluationStatus::Draft));
        assert!(EvaluationStatus::Approved.can_transition_to(EvaluationStatus::Completed));
    }

    #[test]
    fn test_invalid_transitions() {
        // 飛び級は不可
        assert!(!EvaluationStatus::Draft.can_transition_to(EvaluationStatus::Approved));
        assert!(!EvaluationStatus::Draft.can_transition_to(EvaluationStatus::Completed));
        assert!(!EvaluationStatus::Submitted.can_transition_to(EvaluationStatus::Completed));
        // 確定後の巻き戻しは不可
        assert!(!EvaluationStatus::Approved.can_transition_to(EvaluationStatus::Draft));
        assert!(!EvaluationStatus::Approved.can_transition_to(EvaluationStatus::Submitted));
        assert!(!EvaluationStatus::Completed.can_transition_to(EvaluationStatus::Draft));
        assert!(!EvaluationStatus::Completed.can_transition_to(EvaluationStatus::Approved));
        // 同一ステータスへの遷移は不可
        for status in EvaluationStatus::all() {
            assert!(!status.can_transition_to(status));
        }
    }

    #[test]
    fn test_terminal() {
        assert!(EvaluationStatus::Completed.is_terminal());
        assert!(!EvaluationStatus::Approved.is_terminal());
        assert!(!EvaluationStatus::Draft.is_terminal());
    }

    #[test]
    fn test_round_trip() {
        for status in EvaluationStatus::all() {
            assert_eq!(EvaluationStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(EvaluationStatus::from_str("unknown"), None);
    }
}
