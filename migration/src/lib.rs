// migration/src/lib.rs
pub use sea_orm_migration::prelude::*;

// テナント・ユーザー基盤
mod m20250801_000001_create_companies_table;
mod m20250801_000002_create_users_table;

// 評価サイクル
mod m20250801_000003_create_performance_cycles_table;

// 評価項目と割り当て
mod m20250801_000004_create_evaluation_items_table;
mod m20250801_000005_create_evaluation_item_assignments_table;

// 評価ワークフロー
mod m20250801_000006_create_evaluations_table;
mod m20250801_000007_create_partial_assessments_table;

// 監査ログ
mod m20250801_000008_create_audit_logs_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            // 1. 基本テーブル（依存関係なし）
            Box::new(m20250801_000001_create_companies_table::Migration),
            // 2. companies に依存
            Box::new(m20250801_000002_create_users_table::Migration),
            // 3. companies / users に依存
            Box::new(m20250801_000003_create_performance_cycles_table::Migration),
            Box::new(m20250801_000004_create_evaluation_items_table::Migration),
            // 4. evaluation_items / users に依存
            Box::new(m20250801_000005_create_evaluation_item_assignments_table::Migration),
            // 5. performance_cycles / users に依存
            Box::new(m20250801_000006_create_evaluations_table::Migration),
            // 6. evaluations に依存
            Box::new(m20250801_000007_create_partial_assessments_table::Migration),
            // 7. 監査ログ
            Box::new(m20250801_000008_create_audit_logs_table::Migration),
        ]
    }
}
