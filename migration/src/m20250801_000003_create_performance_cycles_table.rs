use sea_orm_migration::prelude::*;

use crate::m20250801_000001_create_companies_table::Companies;
use crate::m20250801_000002_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 評価サイクルテーブルの作成
        manager
            .create_table(
                Table::create()
                    .table(PerformanceCycles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PerformanceCycles::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PerformanceCycles::CompanyId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PerformanceCycles::Name).string().not_null())
                    .col(
                        ColumnDef::new(PerformanceCycles::StartDate)
                            .date()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PerformanceCycles::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(PerformanceCycles::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(PerformanceCycles::ClosedBy).uuid())
                    .col(ColumnDef::new(PerformanceCycles::ClosedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(PerformanceCycles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP"),
                    )
                    .col(
                        ColumnDef::new(PerformanceCycles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_performance_cycles_company_id")
                            .from(PerformanceCycles::Table, PerformanceCycles::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_performance_cycles_closed_by")
                            .from(PerformanceCycles::Table, PerformanceCycles::ClosedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 会社内でサイクル名を一意にする
        manager
            .create_index(
                Index::create()
                    .name("idx_performance_cycles_company_name")
                    .table(PerformanceCycles::Table)
                    .col(PerformanceCycles::CompanyId)
                    .col(PerformanceCycles::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_performance_cycles_company_status")
                    .table(PerformanceCycles::Table)
                    .col(PerformanceCycles::CompanyId)
                    .col(PerformanceCycles::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PerformanceCycles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum PerformanceCycles {
    Table,
    Id,
    CompanyId,
    Name,
    StartDate,
    EndDate,
    Status,
    ClosedBy,
    ClosedAt,
    CreatedAt,
    UpdatedAt,
}
