use anyhow::Result;
use entity::leave_request::Status;
use products_hr::{
    HrError, history,
    leave::{self, Approval, LeaveRequestInput, LeaveTypeInput, Rejection},
    people, stats,
    view::{self, ViewQuery},
};
use suite_tests::{date, hire, memory_db};

#[tokio::test]
async fn requests_flow_from_pending_into_balance_and_stats() -> Result<()> {
    let db = memory_db().await?;
    let ada = hire(&db, "E-100", "Ada").await?;
    let annual = leave::create_type(
        &db,
        LeaveTypeInput {
            name: "Annual".into(),
            days_allowed: 20,
            description: None,
        },
    )
    .await?;

    let request = |start, end| LeaveRequestInput {
        employee_id: ada.id,
        leave_type_id: annual.id,
        start_date: start,
        end_date: end,
        reason: Some("family".into()),
    };
    let first = leave::create_request(&db, request(date(2024, 3, 4), date(2024, 3, 8))).await?;
    let second = leave::create_request(&db, request(date(2024, 12, 30), date(2025, 1, 2))).await?;
    let third = leave::create_request(&db, request(date(2024, 6, 3), date(2024, 6, 3))).await?;
    assert_eq!(first.total_days, 5);
    assert_eq!(second.total_days, 4);
    assert_eq!(first.status, Status::Pending);

    let approved = leave::approve(
        &db,
        first.id,
        Approval {
            approved_by: Some("Grace".into()),
            comments: Some("enjoy".into()),
        },
    )
    .await?;
    assert_eq!(approved.status, Status::Approved);
    assert_eq!(approved.approved_by.as_deref(), Some("Grace"));
    assert!(approved.approved_at.is_some());

    leave::approve(&db, second.id, Approval::default()).await?;
    let rejected = leave::reject(
        &db,
        third.id,
        Rejection {
            rejected_by: None,
            reason: Some("release week".into()),
        },
    )
    .await?;
    assert_eq!(rejected.rejected_by.as_deref(), Some(products_hr::DEFAULT_ACTOR));

    // Only the days falling inside 2024 count against that year.
    let balance = leave::leave_balance(&db, ada.id, 2024).await?;
    assert_eq!(balance.len(), 1);
    assert_eq!(balance[0].days_used, 7);
    assert_eq!(balance[0].days_remaining, 13);

    let figures = stats::load_leave_stats(&db).await?;
    assert_eq!(figures.total, 3);
    assert_eq!(figures.approved_days, 9);

    let changes = history::history(&db, "leave_request", first.id).await?;
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].from_status, "pending");
    assert_eq!(changes[0].to_status, "approved");
    assert_eq!(changes[0].actor.as_deref(), Some("Grace"));
    assert_eq!(changes[0].note.as_deref(), Some("enjoy"));
    Ok(())
}

#[tokio::test]
async fn decided_requests_are_frozen() -> Result<()> {
    let db = memory_db().await?;
    let ada = hire(&db, "E-101", "Ada").await?;
    let sick = leave::create_type(
        &db,
        LeaveTypeInput {
            name: "Sick".into(),
            days_allowed: 10,
            description: None,
        },
    )
    .await?;
    let input = LeaveRequestInput {
        employee_id: ada.id,
        leave_type_id: sick.id,
        start_date: date(2024, 2, 1),
        end_date: date(2024, 2, 2),
        reason: None,
    };
    let request = leave::create_request(&db, input.clone()).await?;
    leave::cancel(&db, request.id, None).await?;

    let err = leave::approve(&db, request.id, Approval::default())
        .await
        .unwrap_err();
    assert!(matches!(err, HrError::InvalidTransition(_)));
    let err = leave::update_request(&db, request.id, input).await.unwrap_err();
    assert!(matches!(err, HrError::InvalidState { .. }));

    // The failed approval left no trace.
    let changes = history::history(&db, "leave_request", request.id).await?;
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].action, "cancel");
    Ok(())
}

#[tokio::test]
async fn employee_removal_takes_leave_requests_along() -> Result<()> {
    let db = memory_db().await?;
    let ada = hire(&db, "E-102", "Ada").await?;
    let grace = hire(&db, "E-103", "Grace").await?;
    let annual = leave::create_type(
        &db,
        LeaveTypeInput {
            name: "Annual".into(),
            days_allowed: 20,
            description: None,
        },
    )
    .await?;
    for employee in [&ada, &grace] {
        leave::create_request(
            &db,
            LeaveRequestInput {
                employee_id: employee.id,
                leave_type_id: annual.id,
                start_date: date(2024, 5, 6),
                end_date: date(2024, 5, 7),
                reason: None,
            },
        )
        .await?;
    }

    assert!(people::delete_employee(&db, ada.id).await?);
    let remaining = leave::list_requests(&db, Default::default()).await?;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].employee_id, grace.id);

    let page = view::view(
        remaining,
        &ViewQuery::default().filter("status", "pending"),
    )?;
    assert_eq!(page.total_items, 1);
    Ok(())
}
