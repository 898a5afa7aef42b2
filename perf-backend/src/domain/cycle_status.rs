// src/domain/cycle_status.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// 評価サイクルの状態を表すenum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleStatus {
    Active,
    Closed,
    Archived,
}

impl CycleStatus {
    /// 文字列からCycleStatusに変換
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "closed" => Some(Self::Closed),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }

    /// CycleStatusを文字列として取得
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Closed => "closed",
            Self::Archived => "archived",
        }
    }

    /// すべての有効なステータスを取得
    pub fn all() -> Vec<Self> {
        vec![Self::Active, Self::Closed, Self::Archived]
    }

    /// サイクル内の評価を変更できる状態かチェック
    pub fn allows_evaluation_mutation(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// HRの部分評価（partial assessment）を書き込める状態かチェック
    /// クローズ中も許可されるが、アーカイブ後は不可
    pub fn allows_partial_assessment(&self) -> bool {
        matches!(self, Self::Active | Self::Closed)
    }

    /// 終端状態かチェック
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Archived)
    }

    /// 有効なステータス遷移かチェック
    ///
    /// active → closed → archived が基本で、closed → active（再オープン）のみ
    /// 逆方向が許可される。archived からの遷移は常に不可。
    pub fn can_transition_to(&self, new_status: Self) -> bool {
        matches!(
            (self, new_status),
            (Self::Active, Self::Closed)
                | (Self::Closed, Self::Active)
                | (Self::Closed, Self::Archived)
        )
    }
}

impl fmt::Display for CycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transitions() {
        assert!(CycleStatus::Active.can_transition_to(CycleStatus::Closed));
        assert!(CycleStatus::Closed.can_transition_to(CycleStatus::Active));
        assert!(CycleStatus::Closed.can_transition_to(CycleStatus::Archived));
    }

    #[test]
    fn test_invalid_transitions() {
        // active から archived へ直接は不可
        assert!(!CycleStatus::Active.can_transition_to(CycleStatus::Archived));
        // archived は終端
        assert!(!CycleStatus::Archived.can_transition_to(CycleStatus::Active));
        assert!(!CycleStatus::Archived.can_transition_to(CycleStatus::Closed));
        // 同一ステータスへの遷移も不可
        for status in CycleStatus::all() {
            assert!(!status.can_transition_to(status));
        }
    }

    #[test]
    fn test_mutation_gates() {
        assert!(CycleStatus::Active.allows_evaluation_mutation());
        assert!(!CycleStatus::Closed.allows_evaluation_mutation());
        assert!(!CycleStatus::Archived.allows_evaluation_mutation());

        assert!(CycleStatus::Active.allows_partial_assessment());
        assert!(CycleStatus::Closed.allows_partial_assessment());
        assert!(!CycleStatus::Archived.allows_partial_assessment());
    }
}
