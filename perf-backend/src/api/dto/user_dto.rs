// src/api/dto/user_dto.rs

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

// --- リクエストDTO ---

/// ユーザー作成リクエスト（HRによるプロビジョニング）
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 3, max = 30, message = "Username must be between 3 and 30 characters"))]
    pub username: Option<String>,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// employee | manager | hr
    #[validate(length(min = 1, message = "Role is required"))]
    pub role: String,

    /// office | operational
    #[validate(length(min = 1, message = "User type is required"))]
    pub user_type: String,

    pub manager_id: Option<Uuid>,

    #[validate(length(max = 100, message = "Department must be at most 100 characters"))]
    pub department: Option<String>,
}

/// ユーザー更新リクエスト（指定されたフィールドのみ更新）
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 100, message = "Department must be at most 100 characters"))]
    pub department: Option<String>,

    pub manager_id: Option<Uuid>,

    /// employee | manager | hr
    pub role: Option<String>,
}
