use sea_orm_migration::prelude::*;

use crate::m20250801_000001_create_companies_table::Companies;
use crate::m20250801_000002_create_users_table::Users;
use crate::m20250801_000004_create_evaluation_items_table::EvaluationItems;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 評価項目の従業員への割り当てテーブルの作成
        manager
            .create_table(
                Table::create()
                    .table(EvaluationItemAssignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EvaluationItemAssignments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EvaluationItemAssignments::CompanyId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationItemAssignments::ItemId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationItemAssignments::EmployeeId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationItemAssignments::AssignedBy)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationItemAssignments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_item_assignments_company_id")
                            .from(
                                EvaluationItemAssignments::Table,
                                EvaluationItemAssignments::CompanyId,
                            )
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_item_assignments_item_id")
                            .from(
                                EvaluationItemAssignments::Table,
                                EvaluationItemAssignments::ItemId,
                            )
                            .to(EvaluationItems::Table, EvaluationItems::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_item_assignments_employee_id")
                            .from(
                                EvaluationItemAssignments::Table,
                                EvaluationItemAssignments::EmployeeId,
                            )
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 同じ項目を同じ従業員に二重に割り当てない
        manager
            .create_index(
                Index::create()
                    .name("idx_item_assignments_item_employee")
                    .table(EvaluationItemAssignments::Table)
                    .col(EvaluationItemAssignments::ItemId)
                    .col(EvaluationItemAssignments::EmployeeId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_item_assignments_employee_id")
                    .table(EvaluationItemAssignments::Table)
                    .col(EvaluationItemAssignments::EmployeeId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(EvaluationItemAssignments::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
pub enum EvaluationItemAssignments {
    Table,
    Id,
    CompanyId,
    ItemId,
    EmployeeId,
    AssignedBy,
    CreatedAt,
}
