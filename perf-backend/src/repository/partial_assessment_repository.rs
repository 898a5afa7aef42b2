// src/repository/partial_assessment_repository.rs

use crate::domain::partial_assessment_model::{
    self, ActiveModel as PartialAssessmentActiveModel, Entity as PartialAssessmentEntity,
    Model as PartialAssessmentModel,
};
use sea_orm::{entity::*, query::*, DbConn, DbErr};
use std::sync::Arc;
use uuid::Uuid;

pub struct PartialAssessmentRepository {
    db: Arc<DbConn>,
}

impl PartialAssessmentRepository {
    pub fn new(db: Arc<DbConn>) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        assessment: PartialAssessmentActiveModel,
    ) -> Result<PartialAssessmentModel, DbErr> {
        assessment.insert(&*self.db).await
    }

    pub async fn find_by_evaluation(
        &self,
        evaluation_id: Uuid,
        company_id: Uuid,
    ) -> Result<Vec<PartialAssessmentModel>, DbErr> {
        PartialAssessmentEntity::find()
            .filter(partial_assessment_model::Column::EvaluationId.eq(evaluation_id))
            .filter(partial_assessment_model::Column::CompanyId.eq(company_id))
            .order_by_desc(partial_assessment_model::Column::CreatedAt)
            .all(&*self.db)
            .await
    }
}

impl Clone for PartialAssessmentRepository {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}
