//! Append-only status change log.

use entity::status_change;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    EntityTrait, QueryFilter, QueryOrder,
};

use crate::error::HrResult;
use crate::fsm::{Label, StateMachine};
use crate::support::now;

pub(crate) struct Change<'a, S: 'static, A: 'static> {
    pub machine: &'a StateMachine<S, A>,
    pub entity_id: i32,
    pub from: S,
    pub action: A,
    pub to: S,
    pub actor: Option<&'a str>,
    pub note: Option<&'a str>,
}

pub(crate) async fn record<C, S, A>(db: &C, change: Change<'_, S, A>) -> HrResult<()>
where
    C: ConnectionTrait,
    S: Label,
    A: Label,
{
    let row = status_change::ActiveModel {
        id: NotSet,
        entity_type: Set(change.machine.entity().to_string()),
        entity_id: Set(change.entity_id),
        from_status: Set(change.from.label().to_string()),
        to_status: Set(change.to.label().to_string()),
        action: Set(change.action.label().to_string()),
        actor: Set(change.actor.map(str::to_string)),
        note: Set(change.note.map(str::to_string)),
        changed_at: Set(now()),
    };
    row.insert(db).await?;
    Ok(())
}

/// Transitions of one record, oldest first.
pub async fn history<C: ConnectionTrait>(
    db: &C,
    entity_type: &str,
    entity_id: i32,
) -> HrResult<Vec<status_change::Model>> {
    let rows = status_change::Entity::find()
        .filter(status_change::Column::EntityType.eq(entity_type))
        .filter(status_change::Column::EntityId.eq(entity_id))
        .order_by_asc(status_change::Column::ChangedAt)
        .order_by_asc(status_change::Column::Id)
        .all(db)
        .await?;
    Ok(rows)
}
