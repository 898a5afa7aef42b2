// src/api/dto/audit_log_dto.rs

use crate::domain::audit_log_model::Model as AuditLogModel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 監査ログ一覧のクエリパラメータ
#[derive(Debug, Clone, Deserialize)]
pub struct AuditLogQuery {
    pub entity_type: Option<String>,
    pub entity_id: Option<Uuid>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl AuditLogQuery {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> u64 {
        self.per_page.unwrap_or(50).clamp(1, 200)
    }

    pub fn offset(&self) -> u64 {
        (self.page() - 1) * self.per_page()
    }
}

// --- レスポンスDTO ---

#[derive(Debug, Clone, Serialize)]
pub struct AuditLogResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_role: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub old_data: Option<serde_json::Value>,
    pub new_data: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl From<AuditLogModel> for AuditLogResponse {
    fn from(log: AuditLogModel) -> Self {
        Self {
            id: log.id,
            user_id: log.user_id,
            user_role: log.user_role,
            action: log.action,
            entity_type: log.entity_type,
            entity_id: log.entity_id,
            old_data: log.old_data,
            new_data: log.new_data,
            created_at: log.created_at,
        }
    }
}

/// ページネーション付き一覧レスポンス
#[derive(Debug, Clone, Serialize)]
pub struct AuditLogListResponse {
    pub logs: Vec<AuditLogResponse>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults() {
        let query = AuditLogQuery {
            entity_type: None,
            entity_id: None,
            page: None,
            per_page: None,
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.per_page(), 50);
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn test_query_clamps_per_page() {
        let query = AuditLogQuery {
            entity_type: None,
            entity_id: None,
            page: Some(3),
            per_page: Some(1000),
        };
        assert_eq!(query.per_page(), 200);
        assert_eq!(query.offset(), 400);
    }
}
