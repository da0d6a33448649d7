use entity::{candidate, interview};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::DateTimeWithTimeZone,
};
use tracing::{info, instrument};

use super::{candidates, move_candidate};
use crate::error::{HrError, HrResult, lost_race};
use crate::fsm::Label;
use crate::history::{self, Change};
use crate::lifecycle::{CandidateAction, INTERVIEW, InterviewAction};
use crate::support::{actor_or_default, now, optional, required};

#[derive(Clone, Debug)]
pub struct ScheduleInput {
    pub candidate_id: i32,
    pub scheduled_at: DateTimeWithTimeZone,
    pub interviewer: String,
}

#[derive(Clone, Debug)]
pub struct CompletionInput {
    pub score: i32,
    pub feedback: Option<String>,
}

pub async fn list<C: ConnectionTrait>(
    db: &C,
    candidate_id: Option<i32>,
) -> HrResult<Vec<interview::Model>> {
    let mut query = interview::Entity::find();
    if let Some(candidate_id) = candidate_id {
        query = query.filter(interview::Column::CandidateId.eq(candidate_id));
    }
    Ok(query
        .order_by_asc(interview::Column::ScheduledAt)
        .order_by_asc(interview::Column::Id)
        .all(db)
        .await?)
}

pub async fn get<C: ConnectionTrait>(db: &C, id: i32) -> HrResult<interview::Model> {
    interview::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(HrError::not_found("interview", id))
}

/// Book an interview. A shortlisted candidate moves to `interviewing` in
/// the same transaction; later rounds leave the candidate as is.
#[instrument(name = "hr.interview.schedule", skip_all, fields(candidate_id = input.candidate_id))]
pub async fn schedule(
    db: &DatabaseConnection,
    input: ScheduleInput,
    actor: Option<String>,
) -> HrResult<interview::Model> {
    let interviewer = required("interviewer", &input.interviewer)?;
    let actor = actor_or_default(actor);
    let txn = db.begin().await?;
    let candidate = candidates::get(&txn, input.candidate_id).await?;
    match candidate.status {
        candidate::Status::Shortlisted => {
            move_candidate(&txn, candidate, CandidateAction::Interview, &actor, None).await?;
        }
        candidate::Status::Interviewing => {}
        other => {
            return Err(HrError::invalid_state(
                "candidate",
                format!(
                    "candidate is {}; interviews need a shortlisted candidate",
                    other.label()
                ),
            ));
        }
    }
    let ts = now();
    let model = interview::ActiveModel {
        id: NotSet,
        candidate_id: Set(input.candidate_id),
        scheduled_at: Set(input.scheduled_at),
        interviewer: Set(interviewer),
        score: Set(None),
        feedback: Set(None),
        status: Set(INTERVIEW.initial()),
        created_at: Set(ts),
        updated_at: Set(ts),
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;
    info!(interview_id = model.id, "interview scheduled");
    Ok(model)
}

/// Reschedule or reassign a still scheduled interview.
#[instrument(name = "hr.interview.update", skip(db, input))]
pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    input: ScheduleInput,
) -> HrResult<interview::Model> {
    let interviewer = required("interviewer", &input.interviewer)?;
    let existing = get(db, id).await?;
    if existing.status != interview::Status::Scheduled {
        return Err(HrError::invalid_state(
            "interview",
            format!("interview is already {}", existing.status.label()),
        ));
    }
    let mut active: interview::ActiveModel = existing.into();
    active.scheduled_at = Set(input.scheduled_at);
    active.interviewer = Set(interviewer);
    active.updated_at = Set(now());
    Ok(active.update(db).await?)
}

pub async fn delete(db: &DatabaseConnection, id: i32) -> HrResult<bool> {
    let res = interview::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

#[instrument(name = "hr.interview.complete", skip(db, input, actor))]
pub async fn complete(
    db: &DatabaseConnection,
    id: i32,
    input: CompletionInput,
    actor: Option<String>,
) -> HrResult<interview::Model> {
    if !(1..=5).contains(&input.score) {
        return Err(HrError::validation("score", "must be between 1 and 5"));
    }
    let feedback = optional(input.feedback);
    transition(db, id, InterviewAction::Complete, actor, |active| {
        active.score = Set(Some(input.score));
        active.feedback = Set(feedback);
    })
    .await
}

#[instrument(name = "hr.interview.cancel", skip(db, actor))]
pub async fn cancel(
    db: &DatabaseConnection,
    id: i32,
    actor: Option<String>,
) -> HrResult<interview::Model> {
    transition(db, id, InterviewAction::Cancel, actor, |_| {}).await
}

async fn transition<F>(
    db: &DatabaseConnection,
    id: i32,
    action: InterviewAction,
    actor: Option<String>,
    fill: F,
) -> HrResult<interview::Model>
where
    F: FnOnce(&mut interview::ActiveModel),
{
    let actor = actor_or_default(actor);
    let txn = db.begin().await?;
    let existing = get(&txn, id).await?;
    let from = existing.status;
    let to = INTERVIEW.next(from, action)?;
    let mut active: interview::ActiveModel = existing.into();
    active.status = Set(to);
    active.updated_at = Set(now());
    fill(&mut active);
    let updated = interview::Entity::update(active)
        .filter(interview::Column::Status.eq(from))
        .exec(&txn)
        .await
        .map_err(lost_race("interview"))?;
    history::record(
        &txn,
        Change {
            machine: &INTERVIEW,
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
    info!(interview_id = id, status = to.label(), "interview moved");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recruitment::fixtures;
    use crate::testing::memory_db;

    fn booking(candidate_id: i32) -> ScheduleInput {
        ScheduleInput {
            candidate_id,
            scheduled_at: now(),
            interviewer: "Ken".into(),
        }
    }

    #[tokio::test]
    async fn scheduling_moves_a_shortlisted_candidate_once() {
        let db = memory_db().await;
        let candidate = fixtures::shortlisted_candidate(&db).await;
        let first = schedule(&db, booking(candidate.id), None).await.unwrap();
        assert_eq!(first.status, interview::Status::Scheduled);
        assert_eq!(
            candidates::get(&db, candidate.id).await.unwrap().status,
            candidate::Status::Interviewing
        );
        schedule(&db, booking(candidate.id), None).await.unwrap();
        assert_eq!(list(&db, Some(candidate.id)).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn applied_candidates_cannot_be_interviewed() {
        let db = memory_db().await;
        let announcement = fixtures::published_announcement(&db).await;
        let applied = candidates::create(
            &db,
            fixtures::candidate_input(announcement.id, "x@example.test"),
        )
        .await
        .unwrap();
        let err = schedule(&db, booking(applied.id), None).await.unwrap_err();
        assert!(matches!(err, HrError::InvalidState { .. }));
        assert!(list(&db, Some(applied.id)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn completion_requires_a_score_in_range() {
        let db = memory_db().await;
        let candidate = fixtures::shortlisted_candidate(&db).await;
        let booked = schedule(&db, booking(candidate.id), None).await.unwrap();
        let err = complete(
            &db,
            booked.id,
            CompletionInput {
                score: 6,
                feedback: None,
            },
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, HrError::Validation { field: "score", .. }));

        let done = complete(
            &db,
            booked.id,
            CompletionInput {
                score: 4,
                feedback: Some("strong systems design".into()),
            },
            None,
        )
        .await
        .unwrap();
        assert_eq!(done.status, interview::Status::Completed);
        assert_eq!(done.score, Some(4));
        assert!(cancel(&db, booked.id, None).await.is_err());
    }

    #[tokio::test]
    async fn deleted_interview_drops_out_of_the_list() {
        let db = memory_db().await;
        let candidate = fixtures::shortlisted_candidate(&db).await;
        let interview = schedule(&db, booking(candidate.id), None).await.unwrap();
        assert_eq!(list(&db, None).await.unwrap().len(), 1);

        assert!(delete(&db, interview.id).await.unwrap());
        assert!(list(&db, None).await.unwrap().is_empty());
        assert!(list(&db, Some(candidate.id)).await.unwrap().is_empty());
        assert!(!delete(&db, interview.id).await.unwrap());
    }
}
