//! Hiring pipeline: requisition, announcement, candidate, interview, offer.
//!
//! Steps that move two records (scheduling an interview, extending or
//! answering an offer) update the candidate inside the same transaction as
//! the record that triggered it.

pub mod announcements;
pub mod candidates;
pub mod interviews;
pub mod offers;
pub mod requisitions;

use entity::candidate;
use sea_orm::{ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::error::{HrResult, lost_race};
use crate::history::{self, Change};
use crate::lifecycle::{CANDIDATE, CandidateAction};
use crate::support::now;

/// Apply `action` to an already loaded candidate on `db`, which may be an
/// open transaction.
pub(crate) async fn move_candidate<C: ConnectionTrait>(
    db: &C,
    existing: candidate::Model,
    action: CandidateAction,
    actor: &str,
    note: Option<&str>,
) -> HrResult<candidate::Model> {
    let from = existing.status;
    let to = CANDIDATE.next(from, action)?;
    let id = existing.id;
    let mut active: candidate::ActiveModel = existing.into();
    active.status = Set(to);
    active.updated_at = Set(now());
    let updated = candidate::Entity::update(active)
        .filter(candidate::Column::Status.eq(from))
        .exec(db)
        .await
        .map_err(lost_race("candidate"))?;
    history::record(
        db,
        Change {
            machine: &CANDIDATE,
            entity_id: id,
            from,
            action,
            to,
            actor: Some(actor),
            note,
        },
    )
    .await?;
    Ok(updated)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HrError;
    use crate::testing::memory_db;

    #[tokio::test]
    async fn stale_candidate_snapshot_cannot_move_again() {
        let db = memory_db().await;
        let snapshot = fixtures::shortlisted_candidate(&db).await;

        let moved = move_candidate(&db, snapshot.clone(), CandidateAction::Reject, "Grace", None)
            .await
            .unwrap();
        assert_eq!(moved.status, candidate::Status::Rejected);

        // A second writer still holding the shortlisted copy loses.
        let err = move_candidate(&db, snapshot, CandidateAction::Interview, "Ken", None)
            .await
            .unwrap_err();
        assert!(matches!(err, HrError::InvalidState { entity: "candidate", .. }));
        let changes = history::history(&db, "candidate", moved.id).await.unwrap();
        assert_eq!(changes.last().map(|c| c.to_status.as_str()), Some("rejected"));
    }
}
