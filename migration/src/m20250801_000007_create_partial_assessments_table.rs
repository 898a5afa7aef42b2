use sea_orm_migration::prelude::*;

use crate::m20250801_000001_create_companies_table::Companies;
use crate::m20250801_000002_create_users_table::Users;
use crate::m20250801_000003_create_performance_cycles_table::PerformanceCycles;
use crate::m20250801_000006_create_evaluations_table::Evaluations;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 部分評価テーブルの作成（HRによる期中メモ・暫定評点）
        manager
            .create_table(
                Table::create()
                    .table(PartialAssessments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PartialAssessments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PartialAssessments::CompanyId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PartialAssessments::EvaluationId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PartialAssessments::CycleId).uuid().not_null())
                    .col(ColumnDef::new(PartialAssessments::AuthorId).uuid().not_null())
                    .col(ColumnDef::new(PartialAssessments::Note).text().not_null())
                    .col(ColumnDef::new(PartialAssessments::Rating).double())
                    .col(
                        ColumnDef::new(PartialAssessments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_partial_assessments_company_id")
                            .from(PartialAssessments::Table, PartialAssessments::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_partial_assessments_evaluation_id")
                            .from(PartialAssessments::Table, PartialAssessments::EvaluationId)
                            .to(Evaluations::Table, Evaluations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_partial_assessments_cycle_id")
                            .from(PartialAssessments::Table, PartialAssessments::CycleId)
                            .to(PerformanceCycles::Table, PerformanceCycles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_partial_assessments_author_id")
                            .from(PartialAssessments::Table, PartialAssessments::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_partial_assessments_evaluation_id")
                    .table(PartialAssessments::Table)
                    .col(PartialAssessments::EvaluationId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PartialAssessments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum PartialAssessments {
    Table,
    Id,
    CompanyId,
    EvaluationId,
    CycleId,
    AuthorId,
    Note,
    Rating,
    CreatedAt,
}
