// src/domain/user_role.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// ユーザーのロールを表すenum
///
/// ロールはフラットな集合であり、継承関係は持たない。
/// 各エンドポイントが許可ロール集合を明示的に宣言する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Employee,
    Manager,
    Hr,
}

impl UserRole {
    /// 文字列からUserRoleに変換
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "employee" => Some(Self::Employee),
            "manager" => Some(Self::Manager),
            "hr" => Some(Self::Hr),
            _ => None,
        }
    }

    /// UserRoleを文字列として取得
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Manager => "manager",
            Self::Hr => "hr",
        }
    }

    /// すべての有効なロールを取得
    pub fn all() -> Vec<Self> {
        vec![Self::Employee, Self::Manager, Self::Hr]
    }

    pub fn is_hr(&self) -> bool {
        matches!(self, Self::Hr)
    }

    pub fn is_manager(&self) -> bool {
        matches!(self, Self::Manager)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// ユーザーの勤務形態を表すenum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    Office,
    Operational,
}

impl UserType {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "office" => Some(Self::Office),
            "operational" => Some(Self::Operational),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Office => "office",
            Self::Operational => "operational",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in UserRole::all() {
            assert_eq!(UserRole::from_str(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::from_str("HR"), Some(UserRole::Hr));
        assert_eq!(UserRole::from_str("admin"), None);
    }

    #[test]
    fn test_user_type_round_trip() {
        assert_eq!(UserType::from_str("office"), Some(UserType::Office));
        assert_eq!(
            UserType::from_str("operational"),
            Some(UserType::Operational)
        );
        assert_eq!(UserType::from_str("remote"), None);
    }
}
