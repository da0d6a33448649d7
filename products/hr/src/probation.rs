//! Probation records and the evaluations that decide them.

use chrono::{Duration, NaiveDate};
use entity::{employee, probation_evaluation, probation_record};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Select, TransactionTrait,
};
use tracing::{info, instrument};

use crate::error::{HrError, HrResult, lost_race};
use crate::fsm::Label;
use crate::history::{self, Change};
use crate::lifecycle::{PROBATION, ProbationAction};
use crate::support::{actor_or_default, now, optional, positive};

#[derive(Clone, Debug)]
pub struct ProbationInput {
    pub employee_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct ProbationFilter {
    pub employee_id: Option<i32>,
    pub status: Option<probation_record::Status>,
}

#[derive(Clone, Debug)]
pub struct EvaluationInput {
    pub probation_id: i32,
    pub evaluator: Option<String>,
    pub evaluation_date: NaiveDate,
    pub rating: probation_evaluation::Rating,
    pub recommendation: probation_evaluation::Recommendation,
    pub extension_days: Option<i32>,
    pub comments: Option<String>,
}

/// The stored evaluation together with the record it decided.
#[derive(Clone, Debug)]
pub struct EvaluationOutcome {
    pub evaluation: probation_evaluation::Model,
    pub record: probation_record::Model,
}

fn check_period(start: NaiveDate, end: NaiveDate) -> HrResult<()> {
    if end < start {
        return Err(HrError::validation(
            "end_date",
            "end date must not be before start date",
        ));
    }
    Ok(())
}

fn records_query(filter: ProbationFilter) -> Select<probation_record::Entity> {
    let mut query = probation_record::Entity::find();
    if let Some(employee_id) = filter.employee_id {
        query = query.filter(probation_record::Column::EmployeeId.eq(employee_id));
    }
    if let Some(status) = filter.status {
        query = query.filter(probation_record::Column::Status.eq(status));
    }
    query
        .order_by_asc(probation_record::Column::EndDate)
        .order_by_asc(probation_record::Column::Id)
}

pub async fn list_records<C: ConnectionTrait>(
    db: &C,
    filter: ProbationFilter,
) -> HrResult<Vec<probation_record::Model>> {
    Ok(records_query(filter).all(db).await?)
}

pub async fn list_records_with_employee<C: ConnectionTrait>(
    db: &C,
    filter: ProbationFilter,
) -> HrResult<Vec<(probation_record::Model, Option<employee::Model>)>> {
    Ok(records_query(filter)
        .find_also_related(employee::Entity)
        .all(db)
        .await?)
}

pub async fn get_record<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> HrResult<probation_record::Model> {
    probation_record::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(HrError::not_found("probation_record", id))
}

#[instrument(name = "hr.probation.create", skip_all, fields(employee_id = input.employee_id))]
pub async fn create_record(
    db: &DatabaseConnection,
    input: ProbationInput,
) -> HrResult<probation_record::Model> {
    check_period(input.start_date, input.end_date)?;
    employee::Entity::find_by_id(input.employee_id)
        .one(db)
        .await?
        .ok_or(HrError::not_found("employee", input.employee_id))?;
    let ts = now();
    let model = probation_record::ActiveModel {
        id: NotSet,
        employee_id: Set(input.employee_id),
        start_date: Set(input.start_date),
        end_date: Set(input.end_date),
        notes: Set(optional(input.notes)),
        status: Set(PROBATION.initial()),
        created_at: Set(ts),
        updated_at: Set(ts),
    }
    .insert(db)
    .await?;
    info!(probation_id = model.id, "probation record created");
    Ok(model)
}

/// Dates and notes stay editable until an outcome is reached.
#[instrument(name = "hr.probation.update", skip(db, input))]
pub async fn update_record(
    db: &DatabaseConnection,
    id: i32,
    input: ProbationInput,
) -> HrResult<probation_record::Model> {
    check_period(input.start_date, input.end_date)?;
    let existing = get_record(db, id).await?;
    if !existing.status.is_open() {
        return Err(HrError::invalid_state(
            "probation_record",
            format!("probation is already {}", existing.status.label()),
        ));
    }
    if existing.employee_id != input.employee_id {
        return Err(HrError::validation(
            "employee_id",
            "a probation record cannot move to another employee",
        ));
    }
    let mut active: probation_record::ActiveModel = existing.into();
    active.start_date = Set(input.start_date);
    active.end_date = Set(input.end_date);
    active.notes = Set(optional(input.notes));
    active.updated_at = Set(now());
    Ok(active.update(db).await?)
}

pub async fn delete_record(db: &DatabaseConnection, id: i32) -> HrResult<bool> {
    let res = probation_record::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

pub async fn list_evaluations<C: ConnectionTrait>(
    db: &C,
    probation_id: i32,
) -> HrResult<Vec<probation_evaluation::Model>> {
    Ok(probation_evaluation::Entity::find()
        .filter(probation_evaluation::Column::ProbationId.eq(probation_id))
        .order_by_asc(probation_evaluation::Column::EvaluationDate)
        .order_by_asc(probation_evaluation::Column::Id)
        .all(db)
        .await?)
}

pub async fn all_evaluations<C: ConnectionTrait>(
    db: &C,
) -> HrResult<Vec<probation_evaluation::Model>> {
    Ok(probation_evaluation::Entity::find().all(db).await?)
}

/// Store an evaluation and apply its recommendation to the record.
///
/// Both writes commit together: a recommendation the record cannot take
/// leaves no evaluation behind.
#[instrument(
    name = "hr.probation.evaluate",
    skip_all,
    fields(probation_id = input.probation_id, recommendation = input.recommendation.label())
)]
pub async fn submit_evaluation(
    db: &DatabaseConnection,
    input: EvaluationInput,
) -> HrResult<EvaluationOutcome> {
    let action = ProbationAction::from(input.recommendation);
    let extension_days = match action {
        ProbationAction::Extend => {
            let days = input.extension_days.ok_or(HrError::validation(
                "extension_days",
                "required when recommending an extension",
            ))?;
            Some(positive("extension_days", days)?)
        }
        _ => None,
    };
    let evaluator = actor_or_default(input.evaluator);
    let comments = optional(input.comments);

    let txn = db.begin().await?;
    let record = get_record(&txn, input.probation_id).await?;
    let from = record.status;
    let to = PROBATION.next(from, action)?;

    let evaluation = probation_evaluation::ActiveModel {
        id: NotSet,
        probation_id: Set(record.id),
        evaluator: Set(evaluator.clone()),
        evaluation_date: Set(input.evaluation_date),
        rating: Set(input.rating),
        recommendation: Set(input.recommendation),
        extension_days: Set(extension_days),
        comments: Set(comments.clone()),
        created_at: Set(now()),
    }
    .insert(&txn)
    .await?;

    let new_end = extension_days.map(|days| record.end_date + Duration::days(i64::from(days)));
    let mut active: probation_record::ActiveModel = record.into();
    active.status = Set(to);
    if let Some(end_date) = new_end {
        active.end_date = Set(end_date);
    }
    active.updated_at = Set(now());
    let record = probation_record::Entity::update(active)
        .filter(probation_record::Column::Status.eq(from))
        .exec(&txn)
        .await
        .map_err(lost_race("probation_record"))?;

    history::record(
        &txn,
        Change {
            machine: &PROBATION,
            entity_id: record.id,
            from,
            action,
            to,
            actor: Some(&evaluator),
            note: comments.as_deref(),
        },
    )
    .await?;
    txn.commit().await?;
    info!(
        probation_id = record.id,
        status = to.label(),
        evaluation_id = evaluation.id,
        "probation evaluated"
    );
    Ok(EvaluationOutcome { evaluation, record })
}

/// Days until `end_date`; negative once overdue.
pub fn days_remaining(record: &probation_record::Model, today: NaiveDate) -> i64 {
    (record.end_date - today).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::people::{self, EmployeeInput};
    use crate::testing::memory_db;
    use crate::view::{self, ViewQuery};
    use probation_evaluation::{Rating, Recommendation};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn record_fixture() -> (DatabaseConnection, probation_record::Model) {
        let db = memory_db().await;
        let employee = people::create_employee(
            &db,
            EmployeeInput {
                employee_number: "P-1".into(),
                first_name: "Katherine".into(),
                last_name: "Johnson".into(),
                email: None,
                department: Some("Research".into()),
                position: None,
                employee_type_id: None,
                hire_date: None,
                status: None,
            },
        )
        .await
        .unwrap();
        let record = create_record(
            &db,
            ProbationInput {
                employee_id: employee.id,
                start_date: date(2024, 1, 1),
                end_date: date(2024, 3, 31),
                notes: None,
            },
        )
        .await
        .unwrap();
        (db, record)
    }

    fn evaluation(probation_id: i32, recommendation: Recommendation) -> EvaluationInput {
        EvaluationInput {
            probation_id,
            evaluator: Some("Mary".into()),
            evaluation_date: date(2024, 3, 25),
            rating: Rating::Good,
            recommendation,
            extension_days: None,
            comments: Some("steady progress".into()),
        }
    }

    #[tokio::test]
    async fn confirm_recommendation_confirms_the_record() {
        let (db, record) = record_fixture().await;
        assert_eq!(record.status, probation_record::Status::Active);
        let outcome = submit_evaluation(&db, evaluation(record.id, Recommendation::Confirm))
            .await
            .unwrap();
        assert_eq!(outcome.record.status, probation_record::Status::Confirmed);
        assert_eq!(outcome.evaluation.evaluator, "Mary");
        assert_eq!(list_evaluations(&db, record.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn extension_pushes_the_end_date() {
        let (db, record) = record_fixture().await;
        let mut input = evaluation(record.id, Recommendation::Extend);
        input.extension_days = Some(30);
        let outcome = submit_evaluation(&db, input).await.unwrap();
        assert_eq!(outcome.record.status, probation_record::Status::Extended);
        assert_eq!(outcome.record.end_date, date(2024, 4, 30));

        let outcome = submit_evaluation(&db, evaluation(record.id, Recommendation::Terminate))
            .await
            .unwrap();
        assert_eq!(outcome.record.status, probation_record::Status::Terminated);
    }

    #[tokio::test]
    async fn extension_without_days_is_rejected() {
        let (db, record) = record_fixture().await;
        let err = submit_evaluation(&db, evaluation(record.id, Recommendation::Extend))
            .await
            .unwrap_err();
        assert!(matches!(err, HrError::Validation { field: "extension_days", .. }));
    }

    #[tokio::test]
    async fn rejected_transition_leaves_no_evaluation() {
        let (db, record) = record_fixture().await;
        submit_evaluation(&db, evaluation(record.id, Recommendation::Confirm))
            .await
            .unwrap();
        let err = submit_evaluation(&db, evaluation(record.id, Recommendation::Terminate))
            .await
            .unwrap_err();
        assert!(matches!(err, HrError::InvalidTransition(_)));
        assert_eq!(list_evaluations(&db, record.id).await.unwrap().len(), 1);
        assert_eq!(
            get_record(&db, record.id).await.unwrap().status,
            probation_record::Status::Confirmed
        );
    }

    #[tokio::test]
    async fn decided_records_are_read_only() {
        let (db, record) = record_fixture().await;
        submit_evaluation(&db, evaluation(record.id, Recommendation::Confirm))
            .await
            .unwrap();
        let err = update_record(
            &db,
            record.id,
            ProbationInput {
                employee_id: record.employee_id,
                start_date: date(2024, 1, 1),
                end_date: date(2024, 6, 30),
                notes: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, HrError::InvalidState { .. }));
    }

    #[tokio::test]
    async fn deleting_the_employee_removes_the_record() {
        let (db, record) = record_fixture().await;
        people::delete_employee(&db, record.employee_id).await.unwrap();
        assert!(get_record(&db, record.id).await.unwrap_err().is_not_found());
    }

    #[test]
    fn days_remaining_goes_negative_when_overdue() {
        let ts = now();
        let record = probation_record::Model {
            id: 1,
            employee_id: 1,
            start_date: date(2024, 1, 1),
            end_date: date(2024, 3, 31),
            notes: None,
            status: probation_record::Status::Active,
            created_at: ts,
            updated_at: ts,
        };
        assert_eq!(days_remaining(&record, date(2024, 3, 21)), 10);
        assert_eq!(days_remaining(&record, date(2024, 4, 2)), -2);
    }

    #[tokio::test]
    async fn deleted_record_drops_out_of_the_list() {
        let (db, record) = record_fixture().await;
        assert_eq!(list_records(&db, ProbationFilter::default()).await.unwrap().len(), 1);

        assert!(delete_record(&db, record.id).await.unwrap());
        assert!(list_records(&db, ProbationFilter::default()).await.unwrap().is_empty());
        assert!(!delete_record(&db, record.id).await.unwrap());
        assert!(get_record(&db, record.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn records_are_found_by_employee_name() {
        let (db, record) = record_fixture().await;
        let rows = list_records_with_employee(&db, ProbationFilter::default())
            .await
            .unwrap();
        let query = ViewQuery::default().search("johnson").filter("status", "ACTIVE");
        let page = view::view(rows, &query).unwrap();
        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].0.id, record.id);
        assert_eq!(page.items[0].1.as_ref().map(|e| e.employee_number.as_str()), Some("P-1"));
    }
}
