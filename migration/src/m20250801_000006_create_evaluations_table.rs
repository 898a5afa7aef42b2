use sea_orm_migration::prelude::*;

use crate::m20250801_000001_create_companies_table::Companies;
use crate::m20250801_000002_create_users_table::Users;
use crate::m20250801_000003_create_performance_cycles_table::PerformanceCycles;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 評価テーブルの作成（ワークフローの中心）
        manager
            .create_table(
                Table::create()
                    .table(Evaluations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Evaluations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Evaluations::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(Evaluations::CycleId).uuid().not_null())
                    .col(ColumnDef::new(Evaluations::EmployeeId).uuid().not_null())
                    .col(ColumnDef::new(Evaluations::ManagerId).uuid().not_null())
                    .col(ColumnDef::new(Evaluations::PeriodType).string().not_null())
                    .col(ColumnDef::new(Evaluations::PeriodDate).date().not_null())
                    .col(
                        ColumnDef::new(Evaluations::Status)
                            .string()
                            .not_null()
                            .default("draft"),
                    )
                    .col(ColumnDef::new(Evaluations::OverallRating).double())
                    .col(
                        ColumnDef::new(Evaluations::EvaluationItemsData)
                            .json_binary()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Evaluations::SubmittedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Evaluations::ApprovedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Evaluations::CompletedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Evaluations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP"),
                    )
                    .col(
                        ColumnDef::new(Evaluations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_evaluations_company_id")
                            .from(Evaluations::Table, Evaluations::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_evaluations_cycle_id")
                            .from(Evaluations::Table, Evaluations::CycleId)
                            .to(PerformanceCycles::Table, PerformanceCycles::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_evaluations_employee_id")
                            .from(Evaluations::Table, Evaluations::EmployeeId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_evaluations_manager_id")
                            .from(Evaluations::Table, Evaluations::ManagerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // 同一サイクル内で従業員あたり1件
        manager
            .create_index(
                Index::create()
                    .name("idx_evaluations_cycle_employee")
                    .table(Evaluations::Table)
                    .col(Evaluations::CycleId)
                    .col(Evaluations::EmployeeId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_evaluations_company_status")
                    .table(Evaluations::Table)
                    .col(Evaluations::CompanyId)
                    .col(Evaluations::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_evaluations_manager_id")
                    .table(Evaluations::Table)
                    .col(Evaluations::ManagerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_evaluations_employee_id")
                    .table(Evaluations::Table)
                    .col(Evaluations::EmployeeId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Evaluations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Evaluations {
    Table,
    Id,
    CompanyId,
    CycleId,
    EmployeeId,
    ManagerId,
    PeriodType,
    PeriodDate,
    Status,
    OverallRating,
    EvaluationItemsData,
    SubmittedAt,
    ApprovedAt,
    CompletedAt,
    CreatedAt,
    UpdatedAt,
}
