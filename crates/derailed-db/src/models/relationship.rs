//! Relationship database model

use derailed_core::{DomainError, Relationship, RelationshipType, Snowflake};
use sqlx::FromRow;

/// Database model for relationships table
#[derive(Debug, Clone, FromRow)]
pub struct RelationshipModel {
    pub target_user_id: i64,
    #[sqlx(rename = "type")]
    pub relation: i32,
}

impl TryFrom<RelationshipModel> for Relationship {
    type Error = DomainError;

    fn try_from(model: RelationshipModel) -> Result<Self, Self::Error> {
        let relation = RelationshipType::from_i32(model.relation).ok_or_else(|| {
            DomainError::DatabaseError(format!("unknown relationship type {}", model.relation))
        })?;

        Ok(Relationship::new(Snowflake::new(model.target_user_id), relation))
    }
}
