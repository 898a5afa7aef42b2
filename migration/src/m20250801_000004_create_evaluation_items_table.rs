use sea_orm_migration::prelude::*;

use crate::m20250801_000001_create_companies_table::Companies;
use crate::m20250801_000002_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 評価項目テーブルの作成
        manager
            .create_table(
                Table::create()
                    .table(EvaluationItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EvaluationItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EvaluationItems::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(EvaluationItems::Title).string().not_null())
                    .col(ColumnDef::new(EvaluationItems::Description).text())
                    .col(ColumnDef::new(EvaluationItems::ItemType).string().not_null())
                    .col(ColumnDef::new(EvaluationItems::Level).string().not_null())
                    .col(
                        ColumnDef::new(EvaluationItems::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(EvaluationItems::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(EvaluationItems::CreatorId).uuid().not_null())
                    .col(
                        ColumnDef::new(EvaluationItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP"),
                    )
                    .col(
                        ColumnDef::new(EvaluationItems::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_evaluation_items_company_id")
                            .from(EvaluationItems::Table, EvaluationItems::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_evaluation_items_creator_id")
                            .from(EvaluationItems::Table, EvaluationItems::CreatorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_evaluation_items_company_active")
                    .table(EvaluationItems::Table)
                    .col(EvaluationItems::CompanyId)
                    .col(EvaluationItems::IsActive)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EvaluationItems::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum EvaluationItems {
    Table,
    Id,
    CompanyId,
    Title,
    Description,
    ItemType,
    Level,
    SortOrder,
    IsActive,
    CreatorId,
    CreatedAt,
    UpdatedAt,
}
