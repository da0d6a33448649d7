//! Dashboard figures derived from record collections.

use chrono::NaiveDate;
use entity::{
    candidate, job_announcement, job_requisition, leave_request, probation_evaluation,
    probation_record, user_account,
};
use sea_orm::{ConnectionTrait, EntityTrait};

use crate::error::HrResult;
use crate::fsm::{Label, StateMachine};
use crate::lifecycle::{ANNOUNCEMENT, CANDIDATE, LEAVE_REQUEST, PROBATION, REQUISITION, USER_ACCOUNT};
use crate::probation::days_remaining;

/// Open probations ending within this many days count as "ending soon".
pub const ENDING_SOON_DAYS: i64 = 30;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusCount {
    pub status: &'static str,
    pub count: u64,
}

/// One entry per state of `machine`, in table order, zeros included.
pub fn status_counts<S, A>(
    machine: &StateMachine<S, A>,
    statuses: impl IntoIterator<Item = S>,
) -> Vec<StatusCount>
where
    S: Label,
    A: Label,
{
    let mut counts: Vec<StatusCount> = machine
        .states()
        .iter()
        .map(|state| StatusCount {
            status: state.label(),
            count: 0,
        })
        .collect();
    for status in statuses {
        let label = status.label();
        if let Some(entry) = counts.iter_mut().find(|entry| entry.status == label) {
            entry.count += 1;
        }
    }
    counts
}

#[derive(Clone, Debug, PartialEq)]
pub struct LeaveStats {
    pub total: u64,
    pub by_status: Vec<StatusCount>,
    pub approved_days: i64,
}

pub fn leave_stats(requests: &[leave_request::Model]) -> LeaveStats {
    LeaveStats {
        total: requests.len() as u64,
        by_status: status_counts(&LEAVE_REQUEST, requests.iter().map(|r| r.status)),
        approved_days: requests
            .iter()
            .filter(|r| r.status == leave_request::Status::Approved)
            .map(|r| i64::from(r.total_days))
            .sum(),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProbationStats {
    pub total: u64,
    pub by_status: Vec<StatusCount>,
    pub average_rating: Option<f64>,
    pub ending_soon: u64,
    pub overdue: u64,
}

/// Mean of the fixed rating scale, or `None` without evaluations.
pub fn average_rating(evaluations: &[probation_evaluation::Model]) -> Option<f64> {
    if evaluations.is_empty() {
        return None;
    }
    let sum: u32 = evaluations
        .iter()
        .map(|e| u32::from(e.rating.score()))
        .sum();
    Some(f64::from(sum) / evaluations.len() as f64)
}

pub fn probation_stats(
    records: &[probation_record::Model],
    evaluations: &[probation_evaluation::Model],
    today: NaiveDate,
) -> ProbationStats {
    let open: Vec<i64> = records
        .iter()
        .filter(|r| r.status.is_open())
        .map(|r| days_remaining(r, today))
        .collect();
    ProbationStats {
        total: records.len() as u64,
        by_status: status_counts(&PROBATION, records.iter().map(|r| r.status)),
        average_rating: average_rating(evaluations),
        ending_soon: open
            .iter()
            .filter(|days| (0..=ENDING_SOON_DAYS).contains(*days))
            .count() as u64,
        overdue: open.iter().filter(|days| **days < 0).count() as u64,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecruitmentStats {
    pub requisitions: Vec<StatusCount>,
    pub announcements: Vec<StatusCount>,
    pub candidates: Vec<StatusCount>,
    pub open_positions: i64,
}

pub fn recruitment_stats(
    requisitions: &[job_requisition::Model],
    announcements: &[job_announcement::Model],
    candidates: &[candidate::Model],
) -> RecruitmentStats {
    RecruitmentStats {
        requisitions: status_counts(&REQUISITION, requisitions.iter().map(|r| r.status)),
        announcements: status_counts(&ANNOUNCEMENT, announcements.iter().map(|a| a.status)),
        candidates: status_counts(&CANDIDATE, candidates.iter().map(|c| c.status)),
        open_positions: requisitions
            .iter()
            .filter(|r| {
                matches!(
                    r.status,
                    job_requisition::Status::Open | job_requisition::Status::InProgress
                )
            })
            .map(|r| i64::from(r.positions))
            .sum(),
    }
}

pub fn account_stats(users: &[user_account::Model]) -> Vec<StatusCount> {
    status_counts(&USER_ACCOUNT, users.iter().map(|u| u.status))
}

pub async fn load_leave_stats<C: ConnectionTrait>(db: &C) -> HrResult<LeaveStats> {
    let requests = leave_request::Entity::find().all(db).await?;
    Ok(leave_stats(&requests))
}

pub async fn load_probation_stats<C: ConnectionTrait>(
    db: &C,
    today: NaiveDate,
) -> HrResult<ProbationStats> {
    let records = probation_record::Entity::find().all(db).await?;
    let evaluations = probation_evaluation::Entity::find().all(db).await?;
    Ok(probation_stats(&records, &evaluations, today))
}

pub async fn load_recruitment_stats<C: ConnectionTrait>(db: &C) -> HrResult<RecruitmentStats> {
    let requisitions = job_requisition::Entity::find().all(db).await?;
    let announcements = job_announcement::Entity::find().all(db).await?;
    let candidates = candidate::Entity::find().all(db).await?;
    Ok(recruitment_stats(&requisitions, &announcements, &candidates))
}

pub async fn load_account_stats<C: ConnectionTrait>(db: &C) -> HrResult<Vec<StatusCount>> {
    let users = user_account::Entity::find().all(db).await?;
    Ok(account_stats(&users))
}
