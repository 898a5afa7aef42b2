// src/repository/evaluation_item_repository.rs

use crate::domain::evaluation_item_assignment_model::{
    self as assignment_model, ActiveModel as AssignmentActiveModel,
    Entity as AssignmentEntity, Model as AssignmentModel,
};
use crate::domain::evaluation_item_model::{
    self, ActiveModel as ItemActiveModel, Entity as ItemEntity, Model as ItemModel,
};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{entity::*, query::*, DbConn, DbErr};
use std::sync::Arc;
use uuid::Uuid;

pub struct EvaluationItemRepository {
    db: Arc<DbConn>,
}

impl EvaluationItemRepository {
    pub fn new(db: Arc<DbConn>) -> Self {
        Self { db }
    }

    pub async fn create(&self, item: ItemActiveModel) -> Result<ItemModel, DbErr> {
        item.insert(&*self.db).await
    }

    pub async fn find_by_id_in_company(
        &self,
        id: Uuid,
        company_id: Uuid,
    ) -> Result<Option<ItemModel>, DbErr> {
        ItemEntity::find_by_id(id)
            .filter(evaluation_item_model::Column::CompanyId.eq(company_id))
            .one(&*self.db)
            .await
    }

    pub async fn find_all_by_company(
        &self,
        company_id: Uuid,
        only_active: bool,
    ) -> Result<Vec<ItemModel>, DbErr> {
        let mut query =
            ItemEntity::find().filter(evaluation_item_model::Column::CompanyId.eq(company_id));
        if only_active {
            query = query.filter(evaluation_item_model::Column::IsActive.eq(true));
        }
        query
            .order_by_asc(evaluation_item_model::Column::SortOrder)
            .order_by_asc(evaluation_item_model::Column::CreatedAt)
            .all(&*self.db)
            .await
    }

    pub async fn update(&self, item: ItemActiveModel) -> Result<ItemModel, DbErr> {
        item.update(&*self.db).await
    }

    pub async fn set_active(&self, id: Uuid, is_active: bool) -> Result<u64, DbErr> {
        let result = ItemEntity::update_many()
            .col_expr(evaluation_item_model::Column::IsActive, Expr::value(is_active))
            .col_expr(
                evaluation_item_model::Column::UpdatedAt,
                Expr::value(Utc::now()),
            )
            .filter(evaluation_item_model::Column::Id.eq(id))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected)
    }

    // --- 割り当て ---

    pub async fn create_assignment(
        &self,
        assignment: AssignmentActiveModel,
    ) -> Result<AssignmentModel, DbErr> {
        assignment.insert(&*self.db).await
    }

    pub async fn find_assignment(
        &self,
        item_id: Uuid,
        employee_id: Uuid,
    ) -> Result<Option<AssignmentModel>, DbErr> {
        AssignmentEntity::find()
            .filter(assignment_model::Column::ItemId.eq(item_id))
            .filter(assignment_model::Column::EmployeeId.eq(employee_id))
            .one(&*self.db)
            .await
    }

    pub async fn find_assignments_by_employee(
        &self,
        employee_id: Uuid,
        company_id: Uuid,
    ) -> Result<Vec<AssignmentModel>, DbErr> {
        AssignmentEntity::find()
            .filter(assignment_model::Column::EmployeeId.eq(employee_id))
            .filter(assignment_model::Column::CompanyId.eq(company_id))
            .all(&*self.db)
            .await
    }
}

impl Clone for EvaluationItemRepository {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}
