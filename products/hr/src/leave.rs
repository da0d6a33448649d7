//! Leave types, leave requests and their approval flow.

use chrono::{Datelike, NaiveDate};
use entity::{employee, leave_request, leave_type};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Select, TransactionTrait,
};
use tracing::{info, instrument};

use crate::error::{HrError, HrResult, conflict_on, lost_race};
use crate::fsm::Label;
use crate::history::{self, Change};
use crate::lifecycle::{LEAVE_REQUEST, LeaveAction};
use crate::support::{actor_or_default, now, optional, required};

#[derive(Clone, Debug, Default)]
pub struct LeaveTypeInput {
    pub name: String,
    pub days_allowed: i32,
    pub description: Option<String>,
}

#[derive(Clone, Debug)]
pub struct LeaveRequestInput {
    pub employee_id: i32,
    pub leave_type_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LeaveRequestFilter {
    pub employee_id: Option<i32>,
    pub leave_type_id: Option<i32>,
    pub status: Option<leave_request::Status>,
}

#[derive(Clone, Debug, Default)]
pub struct Approval {
    pub approved_by: Option<String>,
    pub comments: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct Rejection {
    pub rejected_by: Option<String>,
    pub reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaveBalance {
    pub leave_type_id: i32,
    pub leave_type: String,
    pub days_allowed: i32,
    pub days_used: i32,
    pub days_remaining: i32,
}

const TYPE_NAME_TAKEN: &str = "a leave type with this name already exists";

/// Inclusive calendar-day count of a leave period.
pub fn calculate_days(start: NaiveDate, end: NaiveDate) -> HrResult<i32> {
    if end < start {
        return Err(HrError::validation(
            "end_date",
            "end date must not be before start date",
        ));
    }
    let days = (end - start).num_days() + 1;
    i32::try_from(days).map_err(|_| HrError::validation("end_date", "leave period is too long"))
}

pub async fn list_types<C: ConnectionTrait>(db: &C) -> HrResult<Vec<leave_type::Model>> {
    Ok(leave_type::Entity::find()
        .order_by_asc(leave_type::Column::Name)
        .all(db)
        .await?)
}

pub async fn get_type<C: ConnectionTrait>(db: &C, id: i32) -> HrResult<leave_type::Model> {
    leave_type::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(HrError::not_found("leave_type", id))
}

fn check_days_allowed(days: i32) -> HrResult<i32> {
    if days < 0 {
        return Err(HrError::validation("days_allowed", "must not be negative"));
    }
    Ok(days)
}

#[instrument(name = "hr.leave_type.create", skip_all)]
pub async fn create_type(
    db: &DatabaseConnection,
    input: LeaveTypeInput,
) -> HrResult<leave_type::Model> {
    let name = required("name", &input.name)?;
    let days_allowed = check_days_allowed(input.days_allowed)?;
    let ts = now();
    leave_type::ActiveModel {
        id: NotSet,
        name: Set(name),
        days_allowed: Set(days_allowed),
        description: Set(optional(input.description)),
        created_at: Set(ts),
        updated_at: Set(ts),
    }
    .insert(db)
    .await
    .map_err(conflict_on("name", TYPE_NAME_TAKEN))
}

#[instrument(name = "hr.leave_type.update", skip(db, input))]
pub async fn update_type(
    db: &DatabaseConnection,
    id: i32,
    input: LeaveTypeInput,
) -> HrResult<leave_type::Model> {
    let name = required("name", &input.name)?;
    let days_allowed = check_days_allowed(input.days_allowed)?;
    let mut active: leave_type::ActiveModel = get_type(db, id).await?.into();
    active.name = Set(name);
    active.days_allowed = Set(days_allowed);
    active.description = Set(optional(input.description));
    active.updated_at = Set(now());
    active
        .update(db)
        .await
        .map_err(conflict_on("name", TYPE_NAME_TAKEN))
}

/// Types referenced by any request cannot be removed.
#[instrument(name = "hr.leave_type.delete", skip(db))]
pub async fn delete_type(db: &DatabaseConnection, id: i32) -> HrResult<bool> {
    let in_use = leave_request::Entity::find()
        .filter(leave_request::Column::LeaveTypeId.eq(id))
        .one(db)
        .await?;
    if in_use.is_some() {
        return Err(HrError::invalid_state(
            "leave_type",
            "leave type is referenced by leave requests",
        ));
    }
    let res = leave_type::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

fn requests_query(filter: LeaveRequestFilter) -> Select<leave_request::Entity> {
    let mut query = leave_request::Entity::find();
    if let Some(employee_id) = filter.employee_id {
        query = query.filter(leave_request::Column::EmployeeId.eq(employee_id));
    }
    if let Some(leave_type_id) = filter.leave_type_id {
        query = query.filter(leave_request::Column::LeaveTypeId.eq(leave_type_id));
    }
    if let Some(status) = filter.status {
        query = query.filter(leave_request::Column::Status.eq(status));
    }
    query
        .order_by_desc(leave_request::Column::CreatedAt)
        .order_by_desc(leave_request::Column::Id)
}

pub async fn list_requests<C: ConnectionTrait>(
    db: &C,
    filter: LeaveRequestFilter,
) -> HrResult<Vec<leave_request::Model>> {
    Ok(requests_query(filter).all(db).await?)
}

/// Same rows as [`list_requests`], each paired with its employee.
pub async fn list_requests_with_employee<C: ConnectionTrait>(
    db: &C,
    filter: LeaveRequestFilter,
) -> HrResult<Vec<(leave_request::Model, Option<employee::Model>)>> {
    Ok(requests_query(filter)
        .find_also_related(employee::Entity)
        .all(db)
        .await?)
}

pub async fn get_request<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> HrResult<leave_request::Model> {
    leave_request::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(HrError::not_found("leave_request", id))
}

async fn check_references<C: ConnectionTrait>(db: &C, input: &LeaveRequestInput) -> HrResult<()> {
    employee::Entity::find_by_id(input.employee_id)
        .one(db)
        .await?
        .ok_or(HrError::not_found("employee", input.employee_id))?;
    get_type(db, input.leave_type_id).await?;
    Ok(())
}

#[instrument(
    name = "hr.leave.create",
    skip_all,
    fields(employee_id = input.employee_id, leave_type_id = input.leave_type_id)
)]
pub async fn create_request(
    db: &DatabaseConnection,
    input: LeaveRequestInput,
) -> HrResult<leave_request::Model> {
    let total_days = calculate_days(input.start_date, input.end_date)?;
    check_references(db, &input).await?;
    let ts = now();
    let model = leave_request::ActiveModel {
        id: NotSet,
        employee_id: Set(input.employee_id),
        leave_type_id: Set(input.leave_type_id),
        start_date: Set(input.start_date),
        end_date: Set(input.end_date),
        total_days: Set(total_days),
        reason: Set(optional(input.reason)),
        status: Set(LEAVE_REQUEST.initial()),
        approved_by: Set(None),
        approved_at: Set(None),
        comments: Set(None),
        rejected_by: Set(None),
        rejected_at: Set(None),
        rejection_reason: Set(None),
        created_at: Set(ts),
        updated_at: Set(ts),
    }
    .insert(db)
    .await?;
    info!(leave_request_id = model.id, total_days, "leave request created");
    Ok(model)
}

/// Only pending requests may be edited; `total_days` is recomputed.
#[instrument(name = "hr.leave.update", skip(db, input))]
pub async fn update_request(
    db: &DatabaseConnection,
    id: i32,
    input: LeaveRequestInput,
) -> HrResult<leave_request::Model> {
    let total_days = calculate_days(input.start_date, input.end_date)?;
    let existing = get_request(db, id).await?;
    if existing.status != leave_request::Status::Pending {
        return Err(HrError::invalid_state(
            "leave_request",
            format!("only pending requests can be edited (is {})", existing.status.label()),
        ));
    }
    check_references(db, &input).await?;
    let mut active: leave_request::ActiveModel = existing.into();
    active.employee_id = Set(input.employee_id);
    active.leave_type_id = Set(input.leave_type_id);
    active.start_date = Set(input.start_date);
    active.end_date = Set(input.end_date);
    active.total_days = Set(total_days);
    active.reason = Set(optional(input.reason));
    active.updated_at = Set(now());
    Ok(active.update(db).await?)
}

pub async fn delete_request(db: &DatabaseConnection, id: i32) -> HrResult<bool> {
    let res = leave_request::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

#[instrument(name = "hr.leave.approve", skip(db, approval))]
pub async fn approve(
    db: &DatabaseConnection,
    id: i32,
    approval: Approval,
) -> HrResult<leave_request::Model> {
    let actor = actor_or_default(approval.approved_by);
    let comments = optional(approval.comments);
    decide(db, id, LeaveAction::Approve, &actor, comments.as_deref(), |active, ts| {
        active.approved_by = Set(Some(actor.clone()));
        active.approved_at = Set(Some(ts));
        active.comments = Set(comments.clone());
    })
    .await
}

#[instrument(name = "hr.leave.reject", skip(db, rejection))]
pub async fn reject(
    db: &DatabaseConnection,
    id: i32,
    rejection: Rejection,
) -> HrResult<leave_request::Model> {
    let actor = actor_or_default(rejection.rejected_by);
    let reason = optional(rejection.reason);
    decide(db, id, LeaveAction::Reject, &actor, reason.as_deref(), |active, ts| {
        active.rejected_by = Set(Some(actor.clone()));
        active.rejected_at = Set(Some(ts));
        active.rejection_reason = Set(reason.clone());
    })
    .await
}

#[instrument(name = "hr.leave.cancel", skip(db, actor))]
pub async fn cancel(
    db: &DatabaseConnection,
    id: i32,
    actor: Option<String>,
) -> HrResult<leave_request::Model> {
    let actor = actor_or_default(actor);
    decide(db, id, LeaveAction::Cancel, &actor, None, |_, _| {}).await
}

async fn decide<F>(
    db: &DatabaseConnection,
    id: i32,
    action: LeaveAction,
    actor: &str,
    note: Option<&str>,
    stamp: F,
) -> HrResult<leave_request::Model>
where
    F: FnOnce(&mut leave_request::ActiveModel, sea_orm::prelude::DateTimeWithTimeZone),
{
    let txn = db.begin().await?;
    let existing = get_request(&txn, id).await?;
    let from = existing.status;
    let to = LEAVE_REQUEST.next(from, action)?;
    let ts = now();
    let mut active: leave_request::ActiveModel = existing.into();
    active.status = Set(to);
    active.updated_at = Set(ts);
    stamp(&mut active, ts);
    let updated = leave_request::Entity::update(active)
        .filter(leave_request::Column::Status.eq(from))
        .exec(&txn)
        .await
        .map_err(lost_race("leave_request"))?;
    history::record(
        &txn,
        Change {
            machine: &LEAVE_REQUEST,
            entity_id: id,
            from,
            action,
            to,
            actor: Some(actor),
            note,
        },
    )
    .await?;
    txn.commit().await?;
    info!(leave_request_id = id, status = to.label(), "leave request decided");
    Ok(updated)
}

/// Approved days per leave type overlapping `year`, against each allowance.
pub async fn leave_balance<C: ConnectionTrait>(
    db: &C,
    employee_id: i32,
    year: i32,
) -> HrResult<Vec<LeaveBalance>> {
    let types = list_types(db).await?;
    let approved = list_requests(
        db,
        LeaveRequestFilter {
            employee_id: Some(employee_id),
            status: Some(leave_request::Status::Approved),
            ..LeaveRequestFilter::default()
        },
    )
    .await?;
    Ok(types
        .into_iter()
        .map(|kind| {
            let days_used: i32 = approved
                .iter()
                .filter(|request| request.leave_type_id == kind.id)
                .map(|request| days_within_year(request.start_date, request.end_date, year))
                .sum();
            LeaveBalance {
                leave_type_id: kind.id,
                leave_type: kind.name,
                days_allowed: kind.days_allowed,
                days_used,
                days_remaining: kind.days_allowed - days_used,
            }
        })
        .collect())
}

fn days_within_year(start: NaiveDate, end: NaiveDate, year: i32) -> i32 {
    let (Some(first), Some(last)) = (
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year, 12, 31),
    ) else {
        return 0;
    };
    if end.year() < year || start.year() > year {
        return 0;
    }
    calculate_days(start.max(first), end.min(last)).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::people::{self, EmployeeInput};
    use crate::testing::memory_db;
    use crate::view::{self, ViewQuery};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    struct Fixture {
        db: DatabaseConnection,
        employee_id: i32,
        leave_type_id: i32,
    }

    async fn fixture() -> Fixture {
        let db = memory_db().await;
        let employee = people::create_employee(
            &db,
            EmployeeInput {
                employee_number: "E-100".into(),
                first_name: "Alan".into(),
                last_name: "Turing".into(),
                email: None,
                department: None,
                position: None,
                employee_type_id: None,
                hire_date: None,
                status: None,
            },
        )
        .await
        .unwrap();
        let kind = create_type(
            &db,
            LeaveTypeInput {
                name: "Annual".into(),
                days_allowed: 20,
                description: None,
            },
        )
        .await
        .unwrap();
        Fixture {
            db,
            employee_id: employee.id,
            leave_type_id: kind.id,
        }
    }

    fn request(fx: &Fixture, start: NaiveDate, end: NaiveDate) -> LeaveRequestInput {
        LeaveRequestInput {
            employee_id: fx.employee_id,
            leave_type_id: fx.leave_type_id,
            start_date: start,
            end_date: end,
            reason: Some("family trip".into()),
        }
    }

    #[test]
    fn day_count_is_inclusive() {
        assert_eq!(calculate_days(date(2024, 1, 10), date(2024, 1, 12)).unwrap(), 3);
        assert_eq!(calculate_days(date(2024, 1, 10), date(2024, 1, 10)).unwrap(), 1);
        assert_eq!(calculate_days(date(2024, 2, 28), date(2024, 3, 1)).unwrap(), 3);
    }

    #[test]
    fn day_count_grows_with_the_period() {
        let start = date(2024, 1, 1);
        let mut previous = 0;
        for offset in 0..60 {
            let days = calculate_days(start, start + chrono::Duration::days(offset)).unwrap();
            assert!(days > previous);
            previous = days;
        }
    }

    #[test]
    fn reversed_range_is_a_validation_error() {
        let err = calculate_days(date(2024, 1, 12), date(2024, 1, 10)).unwrap_err();
        assert!(matches!(err, HrError::Validation { field: "end_date", .. }));
    }

    #[test]
    fn year_overlap_is_clamped() {
        assert_eq!(days_within_year(date(2023, 12, 30), date(2024, 1, 2), 2024), 2);
        assert_eq!(days_within_year(date(2023, 12, 30), date(2024, 1, 2), 2023), 2);
        assert_eq!(days_within_year(date(2022, 5, 1), date(2022, 5, 3), 2024), 0);
    }

    #[tokio::test]
    async fn new_requests_are_pending_with_total_days() {
        let fx = fixture().await;
        let created = create_request(&fx.db, request(&fx, date(2024, 1, 10), date(2024, 1, 12)))
            .await
            .unwrap();
        assert_eq!(created.status, leave_request::Status::Pending);
        assert_eq!(created.total_days, 3);
    }

    #[tokio::test]
    async fn decisions_only_apply_to_pending_requests() {
        let fx = fixture().await;
        let created = create_request(&fx.db, request(&fx, date(2024, 1, 10), date(2024, 1, 12)))
            .await
            .unwrap();
        let rejected = reject(
            &fx.db,
            created.id,
            Rejection {
                rejected_by: None,
                reason: Some("coverage".into()),
            },
        )
        .await
        .unwrap();
        assert_eq!(rejected.status, leave_request::Status::Rejected);
        assert_eq!(rejected.rejected_by.as_deref(), Some(crate::DEFAULT_ACTOR));

        let err = approve(&fx.db, created.id, Approval::default()).await.unwrap_err();
        assert!(matches!(err, HrError::InvalidTransition(_)));
        let err = cancel(&fx.db, created.id, None).await.unwrap_err();
        assert!(matches!(err, HrError::InvalidTransition(_)));
        assert_eq!(
            get_request(&fx.db, created.id).await.unwrap().status,
            leave_request::Status::Rejected
        );
    }

    #[tokio::test]
    async fn decided_requests_cannot_be_edited() {
        let fx = fixture().await;
        let created = create_request(&fx.db, request(&fx, date(2024, 3, 1), date(2024, 3, 2)))
            .await
            .unwrap();
        let updated = update_request(
            &fx.db,
            created.id,
            request(&fx, date(2024, 3, 1), date(2024, 3, 5)),
        )
        .await
        .unwrap();
        assert_eq!(updated.total_days, 5);

        cancel(&fx.db, created.id, Some("Alan".into())).await.unwrap();
        let err = update_request(
            &fx.db,
            created.id,
            request(&fx, date(2024, 3, 1), date(2024, 3, 2)),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, HrError::InvalidState { .. }));
    }

    #[tokio::test]
    async fn balance_counts_only_approved_days() {
        let fx = fixture().await;
        let first = create_request(&fx.db, request(&fx, date(2024, 1, 10), date(2024, 1, 12)))
            .await
            .unwrap();
        create_request(&fx.db, request(&fx, date(2024, 2, 1), date(2024, 2, 9)))
            .await
            .unwrap();
        approve(&fx.db, first.id, Approval::default()).await.unwrap();

        let balance = leave_balance(&fx.db, fx.employee_id, 2024).await.unwrap();
        assert_eq!(balance.len(), 1);
        assert_eq!(balance[0].days_used, 3);
        assert_eq!(balance[0].days_remaining, 17);
    }

    #[tokio::test]
    async fn unknown_employee_is_not_found() {
        let fx = fixture().await;
        let mut input = request(&fx, date(2024, 1, 10), date(2024, 1, 12));
        input.employee_id = 999;
        let err = create_request(&fx.db, input).await.unwrap_err();
        assert!(matches!(err, HrError::NotFound { entity: "employee", .. }));
    }

    #[tokio::test]
    async fn deleted_request_drops_out_of_the_list() {
        let fx = fixture().await;
        let kept = create_request(&fx.db, request(&fx, date(2024, 1, 10), date(2024, 1, 12)))
            .await
            .unwrap();
        let gone = create_request(&fx.db, request(&fx, date(2024, 2, 1), date(2024, 2, 2)))
            .await
            .unwrap();

        assert!(delete_request(&fx.db, gone.id).await.unwrap());
        let ids: Vec<_> = list_requests(&fx.db, LeaveRequestFilter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, [kept.id]);
        assert!(!delete_request(&fx.db, gone.id).await.unwrap());
        assert!(get_request(&fx.db, gone.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn requests_are_found_by_employee_name_and_number() {
        let fx = fixture().await;
        let created = create_request(&fx.db, request(&fx, date(2024, 1, 10), date(2024, 1, 12)))
            .await
            .unwrap();
        let rows = list_requests_with_employee(&fx.db, LeaveRequestFilter::default())
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].1.as_ref().map(|e| e.id), Some(fx.employee_id));

        for term in ["turing", "ALAN", "e-100"] {
            let page = view::view(rows.clone(), &ViewQuery::default().search(term)).unwrap();
            assert_eq!(page.total_items, 1, "term {term}");
            assert_eq!(page.items[0].0.id, created.id);
        }
        let none = view::view(rows, &ViewQuery::default().search("hopper")).unwrap();
        assert_eq!(none.total_items, 0);
    }

    #[tokio::test]
    async fn leave_types_in_use_are_kept() {
        let fx = fixture().await;
        create_request(&fx.db, request(&fx, date(2024, 1, 10), date(2024, 1, 12)))
            .await
            .unwrap();
        let err = delete_type(&fx.db, fx.leave_type_id).await.unwrap_err();
        assert!(matches!(err, HrError::InvalidState { .. }));
    }
}
