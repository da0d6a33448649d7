use chrono::NaiveDate;
use entity::{candidate, job_offer};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::{info, instrument};

use super::{candidates, move_candidate};
use crate::error::{HrError, HrResult, lost_race};
use crate::fsm::Label;
use crate::history::{self, Change};
use crate::lifecycle::{CandidateAction, OFFER, OfferAction};
use crate::support::{DEFAULT_ACTOR, actor_or_default, now};

#[derive(Clone, Debug)]
pub struct OfferInput {
    pub candidate_id: i32,
    pub salary_cents: i64,
    pub currency: String,
    pub start_date: Option<NaiveDate>,
}

pub async fn list<C: ConnectionTrait>(
    db: &C,
    candidate_id: Option<i32>,
) -> HrResult<Vec<job_offer::Model>> {
    let mut query = job_offer::Entity::find();
    if let Some(candidate_id) = candidate_id {
        query = query.filter(job_offer::Column::CandidateId.eq(candidate_id));
    }
    Ok(query
        .order_by_desc(job_offer::Column::CreatedAt)
        .order_by_desc(job_offer::Column::Id)
        .all(db)
        .await?)
}

pub async fn get<C: ConnectionTrait>(db: &C, id: i32) -> HrResult<job_offer::Model> {
    job_offer::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(HrError::not_found("job_offer", id))
}

fn check_terms(input: &OfferInput) -> HrResult<String> {
    if input.salary_cents <= 0 {
        return Err(HrError::validation("salary_cents", "must be greater than zero"));
    }
    let currency = input.currency.trim().to_ascii_uppercase();
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(HrError::validation("currency", "must be a three-letter code"));
    }
    Ok(currency)
}

/// Offer the job to an interviewing candidate, who becomes `offered`.
#[instrument(name = "hr.offer.extend", skip_all, fields(candidate_id = input.candidate_id))]
pub async fn extend_offer(
    db: &DatabaseConnection,
    input: OfferInput,
    actor: Option<String>,
) -> HrResult<job_offer::Model> {
    let currency = check_terms(&input)?;
    let actor = actor_or_default(actor);
    let txn = db.begin().await?;
    let candidate = candidates::get(&txn, input.candidate_id).await?;
    if candidate.status != candidate::Status::Interviewing {
        return Err(HrError::invalid_state(
            "candidate",
            format!(
                "candidate is {}; offers go to interviewing candidates",
                candidate.status.label()
            ),
        ));
    }
    move_candidate(&txn, candidate, CandidateAction::Offer, &actor, None).await?;
    let ts = now();
    let model = job_offer::ActiveModel {
        id: NotSet,
        candidate_id: Set(input.candidate_id),
        salary_cents: Set(input.salary_cents),
        currency: Set(currency),
        start_date: Set(input.start_date),
        status: Set(OFFER.initial()),
        responded_at: Set(None),
        created_at: Set(ts),
        updated_at: Set(ts),
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;
    info!(offer_id = model.id, "offer extended");
    Ok(model)
}

/// Terms stay editable while the offer is pending.
#[instrument(name = "hr.offer.update", skip(db, input))]
pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    input: OfferInput,
) -> HrResult<job_offer::Model> {
    let currency = check_terms(&input)?;
    let existing = get(db, id).await?;
    if existing.status != job_offer::Status::Pending {
        return Err(HrError::invalid_state(
            "job_offer",
            format!("offer is already {}", existing.status.label()),
        ));
    }
    let mut active: job_offer::ActiveModel = existing.into();
    active.salary_cents = Set(input.salary_cents);
    active.currency = Set(currency);
    active.start_date = Set(input.start_date);
    active.updated_at = Set(now());
    Ok(active.update(db).await?)
}

/// Removing a pending offer sends the candidate back to interviewing.
#[instrument(name = "hr.offer.delete", skip(db))]
pub async fn delete(db: &DatabaseConnection, id: i32) -> HrResult<bool> {
    let txn = db.begin().await?;
    let Some(existing) = job_offer::Entity::find_by_id(id).one(&txn).await? else {
        return Ok(false);
    };
    if existing.status == job_offer::Status::Pending {
        let candidate = candidates::get(&txn, existing.candidate_id).await?;
        if candidate.status == candidate::Status::Offered {
            move_candidate(
                &txn,
                candidate,
                CandidateAction::Reopen,
                DEFAULT_ACTOR,
                Some("offer deleted"),
            )
            .await?;
        }
    }
    let res = job_offer::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;
    Ok(res.rows_affected > 0)
}

/// The candidate is hired.
pub async fn accept(
    db: &DatabaseConnection,
    id: i32,
    actor: Option<String>,
) -> HrResult<job_offer::Model> {
    respond(db, id, OfferAction::Accept, actor).await
}

/// The candidate walks away and is marked withdrawn.
pub async fn decline(
    db: &DatabaseConnection,
    id: i32,
    actor: Option<String>,
) -> HrResult<job_offer::Model> {
    respond(db, id, OfferAction::Decline, actor).await
}

/// Pull the offer back; the candidate returns to interviewing.
pub async fn withdraw(
    db: &DatabaseConnection,
    id: i32,
    actor: Option<String>,
) -> HrResult<job_offer::Model> {
    respond(db, id, OfferAction::Withdraw, actor).await
}

#[instrument(name = "hr.offer.respond", skip(db, actor))]
async fn respond(
    db: &DatabaseConnection,
    id: i32,
    action: OfferAction,
    actor: Option<String>,
) -> HrResult<job_offer::Model> {
    let actor = actor_or_default(actor);
    let txn = db.begin().await?;
    let existing = get(&txn, id).await?;
    let from = existing.status;
    let to = OFFER.next(from, action)?;
    let candidate_id = existing.candidate_id;
    let ts = now();
    let mut active: job_offer::ActiveModel = existing.into();
    active.status = Set(to);
    if action != OfferAction::Withdraw {
        active.responded_at = Set(Some(ts));
    }
    active.updated_at = Set(ts);
    let updated = job_offer::Entity::update(active)
        .filter(job_offer::Column::Status.eq(from))
        .exec(&txn)
        .await
        .map_err(lost_race("job_offer"))?;
    history::record(
        &txn,
        Change {
            machine: &OFFER,
            entity_id: id,
            from,
            action,
            to,
            actor: Some(&actor),
            note: None,
        },
    )
    .await?;

    let candidate = candidates::get(&txn, candidate_id).await?;
    let follow_up = match action {
        OfferAction::Accept => Some(CandidateAction::Hire),
        OfferAction::Decline => Some(CandidateAction::Withdraw),
        // A candidate already rejected elsewhere stays rejected.
        OfferAction::Withdraw => {
            (candidate.status == candidate::Status::Offered).then_some(CandidateAction::Reopen)
        }
    };
    if let Some(candidate_action) = follow_up {
        move_candidate(&txn, candidate, candidate_action, &actor, None).await?;
    }
    txn.commit().await?;
    info!(offer_id = id, status = to.label(), "offer answered");
    Ok(updated)
}
