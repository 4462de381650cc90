//! Row lookups shared by the repositories.

use mizan_core::DomainError;
use sea_orm::{ConnectionTrait, EntityTrait, PrimaryKeyTrait};

use crate::error::ServiceResult;

/// Loads a row by primary key or fails with [`DomainError::NotFound`].
pub(crate) async fn require<E, C>(
    conn: &C,
    entity: &'static str,
    id: i64,
) -> ServiceResult<E::Model>
where
    E: EntityTrait,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = i64>,
    C: ConnectionTrait,
{
    E::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| DomainError::not_found(entity, id).into())
}
