use chrono::NaiveDate;
use entity::job_announcement::{self, Status};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::{info, instrument};

use super::requisitions;
use crate::error::{HrError, HrResult, lost_race};
use crate::fsm::Label;
use crate::history::{self, Change};
use crate::lifecycle::{ANNOUNCEMENT, AnnouncementAction};
use crate::support::{actor_or_default, now, optional, required};

#[derive(Clone, Debug)]
pub struct AnnouncementInput {
    pub requisition_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub closing_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Default)]
pub struct AnnouncementFilter {
    pub requisition_id: Option<i32>,
    pub status: Option<Status>,
}

pub async fn list<C: ConnectionTrait>(
    db: &C,
    filter: AnnouncementFilter,
) -> HrResult<Vec<job_announcement::Model>> {
    let mut query = job_announcement::Entity::find();
    if let Some(requisition_id) = filter.requisition_id {
        query = query.filter(job_announcement::Column::RequisitionId.eq(requisition_id));
    }
    if let Some(status) = filter.status {
        query = query.filter(job_announcement::Column::Status.eq(status));
    }
    Ok(query
        .order_by_desc(job_announcement::Column::CreatedAt)
        .order_by_desc(job_announcement::Column::Id)
        .all(db)
        .await?)
}

pub async fn get<C: ConnectionTrait>(db: &C, id: i32) -> HrResult<job_announcement::Model> {
    job_announcement::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(HrError::not_found("job_announcement", id))
}

#[instrument(name = "hr.announcement.create", skip_all, fields(requisition_id = input.requisition_id))]
pub async fn create(
    db: &DatabaseConnection,
    input: AnnouncementInput,
) -> HrResult<job_announcement::Model> {
    let title = required("title", &input.title)?;
    requisitions::get(db, input.requisition_id).await?;
    let ts = now();
    let model = job_announcement::ActiveModel {
        id: NotSet,
        requisition_id: Set(input.requisition_id),
        title: Set(title),
        description: Set(optional(input.description)),
        closing_date: Set(input.closing_date),
        status: Set(ANNOUNCEMENT.initial()),
        published_at: Set(None),
        closed_at: Set(None),
        created_at: Set(ts),
        updated_at: Set(ts),
    }
    .insert(db)
    .await?;
    info!(announcement_id = model.id, "announcement drafted");
    Ok(model)
}

/// Closed announcements are kept as they were.
#[instrument(name = "hr.announcement.update", skip(db, input))]
pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    input: AnnouncementInput,
) -> HrResult<job_announcement::Model> {
    let title = required("title", &input.title)?;
    let existing = get(db, id).await?;
    if existing.status == Status::Closed {
        return Err(HrError::invalid_state(
            "job_announcement",
            "announcement is closed",
        ));
    }
    if existing.requisition_id != input.requisition_id {
        requisitions::get(db, input.requisition_id).await?;
    }
    let mut active: job_announcement::ActiveModel = existing.into();
    active.requisition_id = Set(input.requisition_id);
    active.title = Set(title);
    active.description = Set(optional(input.description));
    active.closing_date = Set(input.closing_date);
    active.updated_at = Set(now());
    Ok(active.update(db).await?)
}

pub async fn delete(db: &DatabaseConnection, id: i32) -> HrResult<bool> {
    let res = job_announcement::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

pub async fn publish(
    db: &DatabaseConnection,
    id: i32,
    actor: Option<String>,
) -> HrResult<job_announcement::Model> {
    transition(db, id, AnnouncementAction::Publish, actor).await
}

pub async fn close(
    db: &DatabaseConnection,
    id: i32,
    actor: Option<String>,
) -> HrResult<job_announcement::Model> {
    transition(db, id, AnnouncementAction::Close, actor).await
}

#[instrument(name = "hr.announcement.transition", skip(db, actor))]
async fn transition(
    db: &DatabaseConnection,
    id: i32,
    action: AnnouncementAction,
    actor: Option<String>,
) -> HrResult<job_announcement::Model> {
    let actor = actor_or_default(actor);
    let txn = db.begin().await?;
    let existing = get(&txn, id).await?;
    let from = existing.status;
    let to = ANNOUNCEMENT.next(from, action)?;
    let ts = now();
    let mut active: job_announcement::ActiveModel = existing.into();
    active.status = Set(to);
    match action {
        AnnouncementAction::Publish => active.published_at = Set(Some(ts)),
        AnnouncementAction::Close => active.closed_at = Set(Some(ts)),
    }
    active.updated_at = Set(ts);
    let updated = job_announcement::Entity::update(active)
        .filter(job_announcement::Column::Status.eq(from))
        .exec(&txn)
        .await
        .map_err(lost_race("job_announcement"))?;
    history::record(
        &txn,
        Change {
            machine: &ANNOUNCEMENT,
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
    info!(announcement_id = id, status = to.label(), "announcement moved");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recruitment::fixtures;
    use crate::testing::memory_db;

    #[tokio::test]
    async fn draft_then_publish_then_close() {
        let db = memory_db().await;
        let requisition = fixtures::requisition(&db).await;
        let draft = create(
            &db,
            AnnouncementInput {
                requisition_id: requisition.id,
                title: "Data Analyst".into(),
                description: None,
                closing_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            },
        )
        .await
        .unwrap();
        assert_eq!(draft.status, Status::Draft);
        assert!(draft.published_at.is_none());

        let err = close(&db, draft.id, None).await.unwrap_err();
        assert!(matches!(err, HrError::InvalidTransition(_)));

        let published = publish(&db, draft.id, None).await.unwrap();
        assert_eq!(published.status, Status::Published);
        assert!(published.published_at.is_some());
        assert!(publish(&db, draft.id, None).await.is_err());

        let closed = close(&db, draft.id, Some("Lin".into())).await.unwrap();
        assert_eq!(closed.status, Status::Closed);
        assert!(closed.closed_at.is_some());
    }

    #[tokio::test]
    async fn requires_an_existing_requisition() {
        let db = memory_db().await;
        let err = create(
            &db,
            AnnouncementInput {
                requisition_id: 77,
                title: "Ghost".into(),
                description: None,
                closing_date: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, HrError::NotFound { entity: "job_requisition", id: 77 }));
    }

    #[tokio::test]
    async fn deleted_announcement_drops_out_of_the_list() {
        let db = memory_db().await;
        let published = fixtures::published_announcement(&db).await;
        assert_eq!(list(&db, AnnouncementFilter::default()).await.unwrap().len(), 1);

        assert!(delete(&db, published.id).await.unwrap());
        assert!(list(&db, AnnouncementFilter::default()).await.unwrap().is_empty());
        assert!(get(&db, published.id).await.unwrap_err().is_not_found());
    }
}
