use entity::job_requisition::{self, Status};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::{info, instrument};

use crate::error::{HrError, HrResult, lost_race};
use crate::fsm::Label;
use crate::history::{self, Change};
use crate::lifecycle::{REQUISITION, RequisitionAction};
use crate::support::{actor_or_default, now, optional, positive, required};

#[derive(Clone, Debug)]
pub struct RequisitionInput {
    pub title: String,
    pub department: Option<String>,
    pub positions: i32,
    pub justification: Option<String>,
    /// Only `draft` (the default) or `open` are accepted on create; ignored
    /// on update.
    pub status: Option<Status>,
}

#[derive(Clone, Debug, Default)]
pub struct RequisitionFilter {
    pub department: Option<String>,
    pub status: Option<Status>,
}

pub async fn list<C: ConnectionTrait>(
    db: &C,
    filter: RequisitionFilter,
) -> HrResult<Vec<job_requisition::Model>> {
    let mut query = job_requisition::Entity::find();
    if let Some(department) = optional(filter.department) {
        query = query.filter(job_requisition::Column::Department.eq(department));
    }
    if let Some(status) = filter.status {
        query = query.filter(job_requisition::Column::Status.eq(status));
    }
    Ok(query
        .order_by_desc(job_requisition::Column::CreatedAt)
        .order_by_desc(job_requisition::Column::Id)
        .all(db)
        .await?)
}

pub async fn get<C: ConnectionTrait>(db: &C, id: i32) -> HrResult<job_requisition::Model> {
    job_requisition::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(HrError::not_found("job_requisition", id))
}

#[instrument(name = "hr.requisition.create", skip_all)]
pub async fn create(
    db: &DatabaseConnection,
    input: RequisitionInput,
) -> HrResult<job_requisition::Model> {
    let title = required("title", &input.title)?;
    let positions = positive("positions", input.positions)?;
    let status = match input.status {
        None => REQUISITION.initial(),
        Some(status @ (Status::Draft | Status::Open)) => status,
        Some(other) => {
            return Err(HrError::validation(
                "status",
                format!("a requisition cannot start {}", other.label()),
            ));
        }
    };
    let ts = now();
    let model = job_requisition::ActiveModel {
        id: NotSet,
        title: Set(title),
        department: Set(optional(input.department)),
        positions: Set(positions),
        justification: Set(optional(input.justification)),
        status: Set(status),
        created_at: Set(ts),
        updated_at: Set(ts),
    }
    .insert(db)
    .await?;
    info!(requisition_id = model.id, status = status.label(), "requisition created");
    Ok(model)
}

#[instrument(name = "hr.requisition.update", skip(db, input))]
pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    input: RequisitionInput,
) -> HrResult<job_requisition::Model> {
    let title = required("title", &input.title)?;
    let positions = positive("positions", input.positions)?;
    let existing = get(db, id).await?;
    if REQUISITION.is_terminal(existing.status) {
        return Err(HrError::invalid_state(
            "job_requisition",
            format!("requisition is already {}", existing.status.label()),
        ));
    }
    let mut active: job_requisition::ActiveModel = existing.into();
    active.title = Set(title);
    active.department = Set(optional(input.department));
    active.positions = Set(positions);
    active.justification = Set(optional(input.justification));
    active.updated_at = Set(now());
    Ok(active.update(db).await?)
}

/// Announcements and their candidates go with the requisition.
pub async fn delete(db: &DatabaseConnection, id: i32) -> HrResult<bool> {
    let res = job_requisition::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

#[instrument(name = "hr.requisition.transition", skip(db, actor))]
pub async fn transition(
    db: &DatabaseConnection,
    id: i32,
    action: RequisitionAction,
    actor: Option<String>,
) -> HrResult<job_requisition::Model> {
    let actor = actor_or_default(actor);
    let txn = db.begin().await?;
    let existing = get(&txn, id).await?;
    let from = existing.status;
    let to = REQUISITION.next(from, action)?;
    let mut active: job_requisition::ActiveModel = existing.into();
    active.status = Set(to);
    active.updated_at = Set(now());
    let updated = job_requisition::Entity::update(active)
        .filter(job_requisition::Column::Status.eq(from))
        .exec(&txn)
        .await
        .map_err(lost_race("job_requisition"))?;
    history::record(
        &txn,
        Change {
            machine: &REQUISITION,
            entity_id: id,
            from,
            action,
            to,
            actor: Some(&actor),
            note: None,
        },
    )
    .await?;
    txn.commit().await?;
    info!(requisition_id = id, status = to.label(), "requisition moved");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recruitment::fixtures::requisition_input;
    use crate::testing::memory_db;

    #[tokio::test]
    async fn starts_as_draft_unless_opened() {
        let db = memory_db().await;
        let draft = create(&db, requisition_input()).await.unwrap();
        assert_eq!(draft.status, Status::Draft);

        let mut input = requisition_input();
        input.status = Some(Status::Open);
        assert_eq!(create(&db, input).await.unwrap().status, Status::Open);

        let mut input = requisition_input();
        input.status = Some(Status::Filled);
        let err = create(&db, input).await.unwrap_err();
        assert!(matches!(err, HrError::Validation { field: "status", .. }));
    }

    #[tokio::test]
    async fn positions_must_be_positive() {
        let db = memory_db().await;
        let mut input = requisition_input();
        input.positions = 0;
        let err = create(&db, input).await.unwrap_err();
        assert!(matches!(err, HrError::Validation { field: "positions", .. }));
    }

    #[tokio::test]
    async fn walks_through_hold_and_fill() {
        let db = memory_db().await;
        let draft = create(&db, requisition_input()).await.unwrap();
        let open = transition(&db, draft.id, RequisitionAction::Open, None).await.unwrap();
        let held = transition(&db, open.id, RequisitionAction::Hold, None).await.unwrap();
        assert_eq!(held.status, Status::OnHold);
        let err = transition(&db, held.id, RequisitionAction::Fill, None)
            .await
            .unwrap_err();
        assert!(matches!(err, HrError::InvalidTransition(_)));
        transition(&db, held.id, RequisitionAction::Resume, None).await.unwrap();
        let filled = transition(&db, held.id, RequisitionAction::Fill, None).await.unwrap();
        assert_eq!(filled.status, Status::Filled);

        let err = update(&db, filled.id, requisition_input()).await.unwrap_err();
        assert!(matches!(err, HrError::InvalidState { .. }));

        let rows = history::history(&db, "job_requisition", draft.id).await.unwrap();
        let actions: Vec<_> = rows.iter().map(|row| row.action.as_str()).collect();
        assert_eq!(actions, ["open", "hold", "resume", "fill"]);
    }

    #[tokio::test]
    async fn deleted_requisition_drops_out_of_the_list() {
        let db = memory_db().await;
        let kept = create(&db, requisition_input()).await.unwrap();
        let gone = create(&db, requisition_input()).await.unwrap();

        assert!(delete(&db, gone.id).await.unwrap());
        let ids: Vec<_> = list(&db, RequisitionFilter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, [kept.id]);
        assert!(!delete(&db, gone.id).await.unwrap());
    }
}
