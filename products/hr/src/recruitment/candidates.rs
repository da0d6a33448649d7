use entity::{candidate, job_announcement};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::{info, instrument};

use super::{announcements, move_candidate};
use crate::error::{HrError, HrResult};
use crate::fsm::Label;
use crate::lifecycle::{CANDIDATE, CandidateAction};
use crate::support::{actor_or_default, now, optional, required};

#[derive(Clone, Debug)]
pub struct CandidateInput {
    pub announcement_id: i32,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct CandidateFilter {
    pub announcement_id: Option<i32>,
    pub status: Option<candidate::Status>,
}

pub async fn list<C: ConnectionTrait>(
    db: &C,
    filter: CandidateFilter,
) -> HrResult<Vec<candidate::Model>> {
    let mut query = candidate::Entity::find();
    if let Some(announcement_id) = filter.announcement_id {
        query = query.filter(candidate::Column::AnnouncementId.eq(announcement_id));
    }
    if let Some(status) = filter.status {
        query = query.filter(candidate::Column::Status.eq(status));
    }
    Ok(query
        .order_by_desc(candidate::Column::CreatedAt)
        .order_by_desc(candidate::Column::Id)
        .all(db)
        .await?)
}

pub async fn get<C: ConnectionTrait>(db: &C, id: i32) -> HrResult<candidate::Model> {
    candidate::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(HrError::not_found("candidate", id))
}

fn check_email(email: &str) -> HrResult<String> {
    let email = required("email", email)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(HrError::validation("email", "is not a valid address")),
    }
}

/// Applications are only taken while the announcement is published.
#[instrument(name = "hr.candidate.create", skip_all, fields(announcement_id = input.announcement_id))]
pub async fn create(db: &DatabaseConnection, input: CandidateInput) -> HrResult<candidate::Model> {
    let full_name = required("full_name", &input.full_name)?;
    let email = check_email(&input.email)?;
    let announcement = announcements::get(db, input.announcement_id).await?;
    if announcement.status != job_announcement::Status::Published {
        return Err(HrError::invalid_state(
            "job_announcement",
            format!(
                "announcement is {}; candidates can only apply to published announcements",
                announcement.status.label()
            ),
        ));
    }
    let ts = now();
    let model = candidate::ActiveModel {
        id: NotSet,
        announcement_id: Set(announcement.id),
        full_name: Set(full_name),
        email: Set(email),
        phone: Set(optional(input.phone)),
        status: Set(CANDIDATE.initial()),
        created_at: Set(ts),
        updated_at: Set(ts),
    }
    .insert(db)
    .await?;
    info!(candidate_id = model.id, "candidate applied");
    Ok(model)
}

/// Contact details only; the announcement cannot change after applying.
#[instrument(name = "hr.candidate.update", skip(db, input))]
pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    input: CandidateInput,
) -> HrResult<candidate::Model> {
    let full_name = required("full_name", &input.full_name)?;
    let email = check_email(&input.email)?;
    let existing = get(db, id).await?;
    if existing.announcement_id != input.announcement_id {
        return Err(HrError::validation(
            "announcement_id",
            "a candidate cannot move to another announcement",
        ));
    }
    let mut active: candidate::ActiveModel = existing.into();
    active.full_name = Set(full_name);
    active.email = Set(email);
    active.phone = Set(optional(input.phone));
    active.updated_at = Set(now());
    Ok(active.update(db).await?)
}

pub async fn delete(db: &DatabaseConnection, id: i32) -> HrResult<bool> {
    let res = candidate::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

pub async fn shortlist(
    db: &DatabaseConnection,
    id: i32,
    actor: Option<String>,
) -> HrResult<candidate::Model> {
    transition(db, id, CandidateAction::Shortlist, actor, None).await
}

pub async fn reject(
    db: &DatabaseConnection,
    id: i32,
    actor: Option<String>,
    reason: Option<String>,
) -> HrResult<candidate::Model> {
    transition(db, id, CandidateAction::Reject, actor, reason).await
}

pub async fn withdraw(
    db: &DatabaseConnection,
    id: i32,
    actor: Option<String>,
) -> HrResult<candidate::Model> {
    transition(db, id, CandidateAction::Withdraw, actor, None).await
}

#[instrument(name = "hr.candidate.transition", skip(db, actor, note))]
async fn transition(
    db: &DatabaseConnection,
    id: i32,
    action: CandidateAction,
    actor: Option<String>,
    note: Option<String>,
) -> HrResult<candidate::Model> {
    let actor = actor_or_default(actor);
    let note = optional(note);
    let txn = db.begin().await?;
    let existing = get(&txn, id).await?;
    let updated = move_candidate(&txn, existing, action, &actor, note.as_deref()).await?;
    txn.commit().await?;
    info!(candidate_id = id, status = updated.status.label(), "candidate moved");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recruitment::announcements::{AnnouncementInput, close};
    use crate::recruitment::fixtures;
    use crate::testing::memory_db;

    #[tokio::test]
    async fn draft_announcements_take_no_candidates() {
        let db = memory_db().await;
        let requisition = fixtures::requisition(&db).await;
        let draft = announcements::create(
            &db,
            AnnouncementInput {
                requisition_id: requisition.id,
                title: "Designer".into(),
                description: None,
                closing_date: None,
            },
        )
        .await
        .unwrap();
        let err = create(&db, fixtures::candidate_input(draft.id, "a@example.test"))
            .await
            .unwrap_err();
        assert!(matches!(err, HrError::InvalidState { .. }));
    }

    #[tokio::test]
    async fn closed_announcements_take_no_candidates() {
        let db = memory_db().await;
        let announcement = fixtures::published_announcement(&db).await;
        close(&db, announcement.id, None).await.unwrap();
        let err = create(&db, fixtures::candidate_input(announcement.id, "a@example.test"))
            .await
            .unwrap_err();
        assert!(matches!(err, HrError::InvalidState { .. }));
    }

    #[tokio::test]
    async fn applied_candidates_can_be_shortlisted_or_rejected() {
        let db = memory_db().await;
        let announcement = fixtures::published_announcement(&db).await;
        let first = create(&db, fixtures::candidate_input(announcement.id, "a@example.test"))
            .await
            .unwrap();
        assert_eq!(first.status, candidate::Status::Applied);
        let second = create(&db, fixtures::candidate_input(announcement.id, "b@example.test"))
            .await
            .unwrap();

        let shortlisted = shortlist(&db, first.id, None).await.unwrap();
        assert_eq!(shortlisted.status, candidate::Status::Shortlisted);
        let rejected = reject(&db, second.id, None, Some("no visa".into())).await.unwrap();
        assert_eq!(rejected.status, candidate::Status::Rejected);

        let err = withdraw(&db, second.id, None).await.unwrap_err();
        assert!(matches!(err, HrError::InvalidTransition(_)));
    }

    #[tokio::test]
    async fn malformed_email_is_rejected() {
        let db = memory_db().await;
        let announcement = fixtures::published_announcement(&db).await;
        let err = create(&db, fixtures::candidate_input(announcement.id, "nobody"))
            .await
            .unwrap_err();
        assert!(matches!(err, HrError::Validation { field: "email", .. }));
    }

    #[tokio::test]
    async fn deleted_candidate_drops_out_of_the_list() {
        let db = memory_db().await;
        let announcement = fixtures::published_announcement(&db).await;
        let kept = create(&db, fixtures::candidate_input(announcement.id, "kept@example.test"))
            .await
            .unwrap();
        let gone = create(&db, fixtures::candidate_input(announcement.id, "gone@example.test"))
            .await
            .unwrap();

        assert!(delete(&db, gone.id).await.unwrap());
        let ids: Vec<_> = list(&db, CandidateFilter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, [kept.id]);
        assert!(!delete(&db, gone.id).await.unwrap());
    }
}
