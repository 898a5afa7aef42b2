// src/utils/permission.rs

//! エンドポイント単位の認可ガード
//!
//! ロールはフラットな集合として扱い、継承は行わない。各エンドポイントが
//! 許可ロール集合を明示的に宣言し、この共有ガードで評価する。
//! ガードは純粋関数であり、副作用を持たない（ミューテーション前に安全に実行できる）。

use crate::domain::user_model::UserClaims;
use crate::domain::user_role::UserRole;
use crate::error::{AppError, AppResult};
use uuid::Uuid;

/// ロール不一致・テナント不一致で共通して返すメッセージ
///
/// テナントの存在を推測させないため、どちらの理由でも同一の文言にする。
const ACCESS_DENIED: &str = "Access denied";

/// 許可ロール集合のチェック
pub fn require_role(claims: &UserClaims, allowed: &[UserRole]) -> AppResult<()> {
    if allowed.contains(&claims.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden(ACCESS_DENIED.to_string()))
    }
}

/// テナント（会社）スコープのチェック
///
/// HRも自社スコープに限定され、テナント横断は常に不可。
pub fn require_company(claims: &UserClaims, resource_company_id: Uuid) -> AppResult<()> {
    if claims.company_id == resource_company_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(ACCESS_DENIED.to_string()))
    }
}

/// ロールとテナントをまとめてチェック
pub fn authorize(
    claims: &UserClaims,
    allowed: &[UserRole],
    resource_company_id: Uuid,
) -> AppResult<()> {
    require_role(claims, allowed)?;
    require_company(claims, resource_company_id)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user_role::UserType;

    fn claims(role: UserRole, company_id: Uuid) -> UserClaims {
        UserClaims {
            user_id: Uuid::new_v4(),
            name: "Test User".to_string(),
            role,
            company_id,
            user_type: UserType::Office,
            department: None,
            is_active: true,
        }
    }

    #[test]
    fn test_role_set_is_flat() {
        let company = Uuid::new_v4();
        let manager = claims(UserRole::Manager, company);

        assert!(require_role(&manager, &[UserRole::Manager, UserRole::Hr]).is_ok());
        // manager は employee 専用エンドポイントにはアクセスできない（継承なし）
        assert!(require_role(&manager, &[UserRole::Employee]).is_err());
        // hr も manager 専用エンドポイントにはアクセスできない
        let hr = claims(UserRole::Hr, company);
        assert!(require_role(&hr, &[UserRole::Manager]).is_err());
    }

    #[test]
    fn test_company_scope() {
        let company = Uuid::new_v4();
        let hr = claims(UserRole::Hr, company);

        assert!(require_company(&hr, company).is_ok());
        // HRであってもテナント横断は不可
        assert!(require_company(&hr, Uuid::new_v4()).is_err());
    }

    #[test]
    fn test_mismatch_reasons_are_indistinguishable() {
        let company = Uuid::new_v4();
        let employee = claims(UserRole::Employee, company);

        let role_err = require_role(&employee, &[UserRole::Hr]).unwrap_err();
        let company_err = require_company(&employee, Uuid::new_v4()).unwrap_err();

        match (role_err, company_err) {
            (AppError::Forbidden(a), AppError::Forbidden(b)) => assert_eq!(a, b),
            _ => panic!("expected Forbidden for both"),
        }
    }

    #[test]
    fn test_authorize_combined() {
        let company = Uuid::new_v4();
        let hr = claims(UserRole::Hr, company);

        assert!(authorize(&hr, &[UserRole::Hr], company).is_ok());
        assert!(authorize(&hr, &[UserRole::Hr], Uuid::new_v4()).is_err());
        assert!(authorize(&hr, &[UserRole::Manager], company).is_err());
    }
}
