use anyhow::Result;
use entity::{
    probation_evaluation::{Rating, Recommendation},
    probation_record::Status,
};
use products_hr::{
    HrError, history,
    probation::{self, EvaluationInput, ProbationInput},
    stats,
};
use suite_tests::{date, hire, memory_db};

fn evaluation(probation_id: i32, rating: Rating, recommendation: Recommendation) -> EvaluationInput {
    EvaluationInput {
        probation_id,
        evaluator: Some("Margaret".into()),
        evaluation_date: date(2024, 3, 28),
        rating,
        recommendation,
        extension_days: None,
        comments: None,
    }
}

#[tokio::test]
async fn extension_then_confirmation_feeds_the_dashboard() -> Result<()> {
    let db = memory_db().await?;
    let ada = hire(&db, "E-200", "Ada").await?;
    let grace = hire(&db, "E-201", "Grace").await?;
    let first = probation::create_record(
        &db,
        ProbationInput {
            employee_id: ada.id,
            start_date: date(2024, 1, 1),
            end_date: date(2024, 3, 31),
            notes: None,
        },
    )
    .await?;
    probation::create_record(
        &db,
        ProbationInput {
            employee_id: grace.id,
            start_date: date(2024, 2, 1),
            end_date: date(2024, 4, 30),
            notes: Some("remote".into()),
        },
    )
    .await?;

    let extended = probation::submit_evaluation(
        &db,
        EvaluationInput {
            extension_days: Some(30),
            comments: Some("needs more time on call rotation".into()),
            ..evaluation(first.id, Rating::Satisfactory, Recommendation::Extend)
        },
    )
    .await?;
    assert_eq!(extended.record.status, Status::Extended);
    assert_eq!(extended.record.end_date, date(2024, 4, 30));
    assert_eq!(extended.evaluation.extension_days, Some(30));

    let confirmed = probation::submit_evaluation(
        &db,
        evaluation(first.id, Rating::Good, Recommendation::Confirm),
    )
    .await?;
    assert_eq!(confirmed.record.status, Status::Confirmed);
    assert_eq!(confirmed.record.end_date, date(2024, 4, 30));

    let changes = history::history(&db, "probation_record", first.id).await?;
    let actions: Vec<_> = changes.iter().map(|c| c.action.as_str()).collect();
    assert_eq!(actions, ["extend", "confirm"]);
    assert!(changes.iter().all(|c| c.actor.as_deref() == Some("Margaret")));

    let mid_april = stats::load_probation_stats(&db, date(2024, 4, 15)).await?;
    assert_eq!(mid_april.total, 2);
    assert_eq!(mid_april.average_rating, Some(3.5));
    assert_eq!(mid_april.ending_soon, 1);
    assert_eq!(mid_april.overdue, 0);

    let may = stats::load_probation_stats(&db, date(2024, 5, 10)).await?;
    assert_eq!(may.ending_soon, 0);
    assert_eq!(may.overdue, 1);
    Ok(())
}

#[tokio::test]
async fn terminated_probation_rejects_further_evaluations() -> Result<()> {
    let db = memory_db().await?;
    let ada = hire(&db, "E-202", "Ada").await?;
    let record = probation::create_record(
        &db,
        ProbationInput {
            employee_id: ada.id,
            start_date: date(2024, 1, 1),
            end_date: date(2024, 3, 31),
            notes: None,
        },
    )
    .await?;
    probation::submit_evaluation(
        &db,
        evaluation(record.id, Rating::Poor, Recommendation::Terminate),
    )
    .await?;

    let err = probation::submit_evaluation(
        &db,
        evaluation(record.id, Rating::Excellent, Recommendation::Confirm),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, HrError::InvalidTransition(_)));
    assert_eq!(probation::list_evaluations(&db, record.id).await?.len(), 1);

    let err = probation::update_record(
        &db,
        record.id,
        ProbationInput {
            employee_id: ada.id,
            start_date: date(2024, 1, 1),
            end_date: date(2024, 6, 30),
            notes: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, HrError::InvalidState { .. }));
    Ok(())
}
