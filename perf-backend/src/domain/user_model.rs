// src/domain/user_model.rs

use super::user_role::{UserRole, UserType};
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub name: String,

    #[sea_orm(unique, nullable)]
    pub email: Option<String>,

    #[sea_orm(nullable)]
    pub username: Option<String>,

    #[serde(skip_serializing)] // パスワードハッシュは絶対にシリアライズしない
    pub password_hash: String,

    /// employee | manager | hr
    pub role: String,

    pub company_id: Uuid,

    /// 直属マネージャー（自己参照・一段のみ）
    #[sea_orm(nullable)]
    pub manager_id: Option<Uuid>,

    #[sea_orm(nullable)]
    pub department: Option<String>,

    /// office | operational
    pub user_type: String,

    pub is_active: bool,

    pub last_login_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::domain::company_model::Entity",
        from = "Column::CompanyId",
        to = "crate::domain::company_model::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Company,
    #[sea_orm(has_many = "crate::domain::evaluation_model::Entity")]
    Evaluations,
}

impl Related<crate::domain::company_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
            ..ActiveModelTrait::default()
        }
    }

    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if !insert {
            self.updated_at = Set(Utc::now());
        }
        Ok(self)
    }
}

impl Model {
    /// 認証可能な状態かチェック
    pub fn can_authenticate(&self) -> bool {
        self.is_active
    }

    pub fn role(&self) -> Option<UserRole> {
        UserRole::from_str(&self.role)
    }

    pub fn user_type(&self) -> Option<UserType> {
        UserType::from_str(&self.user_type)
    }

    /// 公開可能なフィールドのみのユーザー情報に変換
    pub fn to_safe_user(&self) -> SafeUser {
        SafeUser {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            username: self.username.clone(),
            role: self.role.clone(),
            company_id: self.company_id,
            manager_id: self.manager_id,
            department: self.department.clone(),
            user_type: self.user_type.clone(),
            is_active: self.is_active,
            last_login_at: self.last_login_at,
            created_at: self.created_at,
        }
    }
}

/// パスワードハッシュを除いた公開用ユーザー情報
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeUser {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub username: Option<String>,
    pub role: String,
    pub company_id: Uuid,
    pub manager_id: Option<Uuid>,
    pub department: Option<String>,
    pub user_type: String,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Model> for SafeUser {
    fn from(user: Model) -> Self {
        user.to_safe_user()
    }
}

/// JWTに載せるユーザークレーム
///
/// セッショントークンは {sub, role, company_id, user_type, department?} を運ぶ。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserClaims {
    pub user_id: Uuid,
    pub name: String,
    pub role: UserRole,
    pub company_id: Uuid,
    pub user_type: UserType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    pub is_active: bool,
}

impl UserClaims {
    pub fn is_hr(&self) -> bool {
        self.role.is_hr()
    }

    pub fn is_manager(&self) -> bool {
        self.role.is_manager()
    }
}

impl Model {
    /// JWTクレームに変換（ロール/勤務形態が不正な行は認証不可として扱う）
    pub fn to_claims(&self) -> Option<UserClaims> {
        Some(UserClaims {
            user_id: self.id,
            name: self.name.clone(),
            role: self.role()?,
            company_id: self.company_id,
            user_type: self.user_type()?,
            department: self.department.clone(),
            is_active: self.is_active,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> Model {
        Model {
            id: Uuid::new_v4(),
            name: "Taro Yamada".to_string(),
            email: Some("taro@example.com".to_string()),
            username: None,
            password_hash: "$argon2id$dummy".to_string(),
            role: "manager".to_string(),
            company_id: Uuid::new_v4(),
            manager_id: None,
            department: Some("Sales".to_string()),
            user_type: "office".to_string(),
            is_active: true,
            last_login_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_safe_user_has_no_password_hash() {
        let user = sample_user();
        let safe = user.to_safe_user();
        let json = serde_json::to_value(&safe).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "manager");
    }

    #[test]
    fn test_to_claims() {
        let user = sample_user();
        let claims = user.to_claims().unwrap();
        assert_eq!(claims.role, UserRole::Manager);
        assert_eq!(claims.user_type, UserType::Office);
        assert_eq!(claims.company_id, user.company_id);
    }

    #[test]
    fn test_to_claims_rejects_unknown_role() {
        let mut user = sample_user();
        user.role = "superuser".to_string();
        assert!(user.to_claims().is_none());
    }
}
