// tests/service_test.rs
//
// サービス層の振る舞いをモック接続で検証する（DB不要）。
// 条件付き更新の競合・サイクルゲート・テナント分離・監査ログの書き込みを対象とする。

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult, Value};
use serde_json::json;
use uuid::Uuid;

use perf_backend::domain::audit_log_model::Model as AuditLogModel;
use perf_backend::domain::evaluation_model::Model as EvaluationModel;
use perf_backend::domain::performance_cycle_model::Model as CycleModel;
use perf_backend::domain::cycle_status::CycleStatus;
use perf_backend::domain::user_model::UserClaims;
use perf_backend::domain::user_role::{UserRole, UserType};
use perf_backend::error::AppError;
use perf_backend::repository::audit_log_repository::AuditLogRepository;
use perf_backend::repository::evaluation_repository::EvaluationRepository;
use perf_backend::repository::partial_assessment_repository::PartialAssessmentRepository;
use perf_backend::repository::performance_cycle_repository::PerformanceCycleRepository;
use perf_backend::repository::user_repository::UserRepository;
use perf_backend::service::audit_log_service::AuditLogService;
use perf_backend::service::cycle_service::CycleService;
use perf_backend::service::evaluation_service::EvaluationService;

fn claims(role: UserRole, user_id: Uuid, company_id: Uuid) -> UserClaims {
    UserClaims {
        user_id,
        name: "Test User".to_string(),
        role,
        company_id,
        user_type: UserType::Office,
        department: None,
        is_active: true,
    }
}

fn draft_evaluation(
    company_id: Uuid,
    cycle_id: Uuid,
    manager_id: Uuid,
    employee_id: Uuid,
) -> EvaluationModel {
    EvaluationModel {
        id: Uuid::new_v4(),
        company_id,
        cycle_id,
        employee_id,
        manager_id,
        period_type: "quarterly".to_string(),
        period_date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
        status: "draft".to_string(),
        overall_rating: None,
        evaluation_items_data: json!([{ "item_id": Uuid::new_v4(), "rating": 3.0 }]),
        submitted_at: None,
        approved_at: None,
        completed_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn cycle_with_status(id: Uuid, company_id: Uuid, status: &str) -> CycleModel {
    CycleModel {
        id,
        company_id,
        name: "2025 H1".to_string(),
        start_date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2025, 9, 30).unwrap(),
        status: status.to_string(),
        closed_by: None,
        closed_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn audit_row(company_id: Uuid, user_id: Uuid, entity_id: Uuid) -> AuditLogModel {
    AuditLogModel {
        id: Uuid::new_v4(),
        user_id,
        user_role: "manager".to_string(),
        company_id,
        action: "evaluation_submitted".to_string(),
        entity_type: "evaluation".to_string(),
        entity_id,
        old_data: None,
        new_data: None,
        created_at: Utc::now(),
    }
}

fn evaluation_service(db: &Arc<DatabaseConnection>) -> EvaluationService {
    EvaluationService::new(
        Arc::new(EvaluationRepository::new(db.clone())),
        Arc::new(PerformanceCycleRepository::new(db.clone())),
        Arc::new(UserRepository::new(db.clone())),
        Arc::new(PartialAssessmentRepository::new(db.clone())),
        Arc::new(AuditLogService::new(Arc::new(AuditLogRepository::new(
            db.clone(),
        )))),
    )
}

fn cycle_service(db: &Arc<DatabaseConnection>) -> CycleService {
    CycleService::new(
        Arc::new(PerformanceCycleRepository::new(db.clone())),
        Arc::new(EvaluationRepository::new(db.clone())),
        Arc::new(AuditLogService::new(Arc::new(AuditLogRepository::new(
            db.clone(),
        )))),
    )
}

#[tokio::test]
async fn test_submit_on_archived_cycle_returns_cycle_closed() {
    let company_id = Uuid::new_v4();
    let cycle_id = Uuid::new_v4();
    let manager_id = Uuid::new_v4();
    let evaluation = draft_evaluation(company_id, cycle_id, manager_id, Uuid::new_v4());

    let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![evaluation.clone()]])
        .append_query_results([vec![cycle_with_status(cycle_id, company_id, "archived")]])
        .into_connection());
    let service = evaluation_service(&db);

    let actor = claims(UserRole::Manager, manager_id, company_id);
    match service.submit(&actor, evaluation.id).await {
        Err(AppError::CycleClosed(_)) => {}
        other => panic!("expected CycleClosed, got {:?}", other.map(|m| m.status)),
    }
}

#[tokio::test]
async fn test_losing_submit_gets_invalid_state_and_no_audit_row() {
    let company_id = Uuid::new_v4();
    let cycle_id = Uuid::new_v4();
    let manager_id = Uuid::new_v4();
    let evaluation = draft_evaluation(company_id, cycle_id, manager_id, Uuid::new_v4());

    // 条件付き更新が0行 = 先を越された側。監査ログの結果は一切積んでいないので、
    // 誤って監査書き込みまで進めばこのテストは別のエラーで落ちる。
    let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![evaluation.clone()]])
        .append_query_results([vec![cycle_with_status(cycle_id, company_id, "active")]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection());
    let service = evaluation_service(&db);

    let actor = claims(UserRole::Manager, manager_id, company_id);
    match service.submit(&actor, evaluation.id).await {
        Err(AppError::InvalidState(_)) => {}
        other => panic!("expected InvalidState, got {:?}", other.map(|m| m.status)),
    }

    drop(service);
    let log = Arc::try_unwrap(db)
        .expect("all repository handles should be dropped")
        .into_transaction_log();
    assert!(
        log.iter().all(|t| !format!("{:?}", t).contains("audit_logs")),
        "no audit row may be written for a failed transition"
    );
}

#[tokio::test]
async fn test_successful_submit_writes_exactly_one_audit_row() {
    let company_id = Uuid::new_v4();
    let cycle_id = Uuid::new_v4();
    let manager_id = Uuid::new_v4();
    let evaluation = draft_evaluation(company_id, cycle_id, manager_id, Uuid::new_v4());

    let mut submitted = evaluation.clone();
    submitted.status = "submitted".to_string();
    submitted.overall_rating = Some(3.0);
    submitted.submitted_at = Some(Utc::now());

    let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![evaluation.clone()]])
        .append_query_results([vec![cycle_with_status(cycle_id, company_id, "active")]])
        .append_query_results([vec![submitted]])
        .append_query_results([vec![audit_row(company_id, manager_id, evaluation.id)]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection());
    let service = evaluation_service(&db);

    let actor = claims(UserRole::Manager, manager_id, company_id);
    let updated = service.submit(&actor, evaluation.id).await.unwrap();
    assert_eq!(updated.status, "submitted");
    assert_eq!(updated.overall_rating, Some(3.0));

    // 遷移1件につき監査ログのINSERTはちょうど1回
    drop(service);
    let log = Arc::try_unwrap(db)
        .expect("all repository handles should be dropped")
        .into_transaction_log();
    let audit_inserts = log
        .iter()
        .filter(|t| format!("{:?}", t).contains("audit_logs"))
        .count();
    assert_eq!(audit_inserts, 1);
}

#[tokio::test]
async fn test_cross_tenant_evaluation_id_reads_as_not_found() {
    // テナントスコープ付きクエリでは他社のIDは行を返さない
    let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<EvaluationModel>::new()])
        .into_connection());
    let service = evaluation_service(&db);

    let actor = claims(UserRole::Hr, Uuid::new_v4(), Uuid::new_v4());
    match service.get_evaluation(&actor, Uuid::new_v4()).await {
        Err(AppError::NotFound(_)) => {}
        other => panic!("expected NotFound, got {:?}", other.map(|m| m.status)),
    }
}

#[tokio::test]
async fn test_losing_cycle_close_gets_invalid_state() {
    let company_id = Uuid::new_v4();
    let cycle_id = Uuid::new_v4();

    let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![cycle_with_status(cycle_id, company_id, "active")]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection());
    let service = cycle_service(&db);

    let actor = claims(UserRole::Hr, Uuid::new_v4(), company_id);
    match service
        .set_cycle_status(&actor, cycle_id, CycleStatus::Closed)
        .await
    {
        Err(AppError::InvalidState(_)) => {}
        other => panic!("expected InvalidState, got {:?}", other.map(|m| m.status)),
    }

    drop(service);
    let log = Arc::try_unwrap(db)
        .expect("all repository handles should be dropped")
        .into_transaction_log();
    assert!(log.iter().all(|t| !format!("{:?}", t).contains("audit_logs")));
}

#[tokio::test]
async fn test_audit_log_count_applies_entity_filters() {
    let company_id = Uuid::new_v4();

    let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<AuditLogModel>::new()])
        .append_query_results([vec![BTreeMap::from([(
            "num_items",
            Value::BigInt(Some(7)),
        )])]])
        .into_connection());
    let service = AuditLogService::new(Arc::new(AuditLogRepository::new(db.clone())));

    let (logs, total) = service
        .list_by_company(company_id, Some("evaluation"), None, 50, 0)
        .await
        .unwrap();
    assert!(logs.is_empty());
    assert_eq!(total, 7);

    // 件数クエリにも一覧と同じ entity_type の絞り込みがかかる
    drop(service);
    let log = Arc::try_unwrap(db)
        .expect("all repository handles should be dropped")
        .into_transaction_log();
    let count_stmt = format!("{:?}", log[1]);
    assert!(count_stmt.contains("entity_type"));
}
