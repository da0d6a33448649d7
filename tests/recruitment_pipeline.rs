use anyhow::Result;
use chrono::{TimeZone, Utc};
use entity::{candidate, job_announcement, job_offer, job_requisition};
use products_hr::{
    HrError, history,
    lifecycle::RequisitionAction,
    recruitment::{
        announcements::{self, AnnouncementInput},
        candidates::{self, CandidateInput},
        interviews::{self, CompletionInput, ScheduleInput},
        offers::{self, OfferInput},
        requisitions::{self, RequisitionInput},
    },
    stats::{self, StatusCount},
};
use suite_tests::{date, memory_db};

fn count(counts: &[StatusCount], status: &str) -> u64 {
    counts
        .iter()
        .find(|entry| entry.status == status)
        .map_or(0, |entry| entry.count)
}

#[tokio::test]
async fn candidate_travels_from_application_to_hire() -> Result<()> {
    let db = memory_db().await?;
    let requisition = requisitions::create(
        &db,
        RequisitionInput {
            title: "Site Reliability Engineer".into(),
            department: Some("Platform".into()),
            positions: 2,
            justification: Some("on-call coverage".into()),
            status: None,
        },
    )
    .await?;
    assert_eq!(requisition.status, job_requisition::Status::Draft);
    requisitions::transition(&db, requisition.id, RequisitionAction::Open, None).await?;

    let announcement = announcements::create(
        &db,
        AnnouncementInput {
            requisition_id: requisition.id,
            title: "SRE (remote)".into(),
            description: None,
            closing_date: Some(date(2024, 9, 30)),
        },
    )
    .await?;
    let early = candidates::create(
        &db,
        CandidateInput {
            announcement_id: announcement.id,
            full_name: "Too Early".into(),
            email: "early@example.test".into(),
            phone: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(early, HrError::InvalidState { .. }));

    let published = announcements::publish(&db, announcement.id, None).await?;
    assert_eq!(published.status, job_announcement::Status::Published);
    assert!(published.published_at.is_some());

    let apply = |name: &str, email: &str| CandidateInput {
        announcement_id: announcement.id,
        full_name: name.into(),
        email: email.into(),
        phone: None,
    };
    let linus = candidates::create(&db, apply("Linus", "linus@example.test")).await?;
    let barbara = candidates::create(&db, apply("Barbara", "barbara@example.test")).await?;
    candidates::reject(
        &db,
        barbara.id,
        Some("Recruiter".into()),
        Some("position mismatch".into()),
    )
    .await?;

    candidates::shortlist(&db, linus.id, None).await?;
    let interview = interviews::schedule(
        &db,
        ScheduleInput {
            candidate_id: linus.id,
            scheduled_at: Utc
                .with_ymd_and_hms(2024, 9, 2, 14, 0, 0)
                .single()
                .unwrap_or_default()
                .into(),
            interviewer: "Ken".into(),
        },
        None,
    )
    .await?;
    assert_eq!(
        candidates::get(&db, linus.id).await?.status,
        candidate::Status::Interviewing
    );
    let done = interviews::complete(
        &db,
        interview.id,
        CompletionInput {
            score: 5,
            feedback: Some("strong debugging".into()),
        },
        None,
    )
    .await?;
    assert_eq!(done.score, Some(5));

    let offer = offers::extend_offer(
        &db,
        OfferInput {
            candidate_id: linus.id,
            salary_cents: 12_500_000,
            currency: "eur".into(),
            start_date: Some(date(2024, 10, 1)),
        },
        None,
    )
    .await?;
    assert_eq!(offer.currency, "EUR");
    let accepted = offers::accept(&db, offer.id, None).await?;
    assert_eq!(accepted.status, job_offer::Status::Accepted);
    assert!(accepted.responded_at.is_some());

    let hired = candidates::get(&db, linus.id).await?;
    assert_eq!(hired.status, candidate::Status::Hired);
    let path: Vec<_> = history::history(&db, "candidate", linus.id)
        .await?
        .into_iter()
        .map(|change| change.to_status)
        .collect();
    assert_eq!(path, ["shortlisted", "interviewing", "offered", "hired"]);

    let figures = stats::load_recruitment_stats(&db).await?;
    assert_eq!(figures.open_positions, 2);
    assert_eq!(count(&figures.candidates, "hired"), 1);
    assert_eq!(count(&figures.candidates, "rejected"), 1);
    assert_eq!(count(&figures.announcements, "published"), 1);

    requisitions::transition(&db, requisition.id, RequisitionAction::Fill, None).await?;
    let figures = stats::load_recruitment_stats(&db).await?;
    assert_eq!(figures.open_positions, 0);
    assert_eq!(count(&figures.requisitions, "filled"), 1);
    Ok(())
}

#[tokio::test]
async fn declined_offer_withdraws_the_candidate() -> Result<()> {
    let db = memory_db().await?;
    let requisition = requisitions::create(
        &db,
        RequisitionInput {
            title: "Data Analyst".into(),
            department: None,
            positions: 1,
            justification: None,
            status: Some(job_requisition::Status::Open),
        },
    )
    .await?;
    let announcement = announcements::create(
        &db,
        AnnouncementInput {
            requisition_id: requisition.id,
            title: "Data Analyst".into(),
            description: None,
            closing_date: None,
        },
    )
    .await?;
    announcements::publish(&db, announcement.id, None).await?;
    let applicant = candidates::create(
        &db,
        CandidateInput {
            announcement_id: announcement.id,
            full_name: "Frances".into(),
            email: "frances@example.test".into(),
            phone: Some("+1 555 0100".into()),
        },
    )
    .await?;

    // Offers need an interviewing candidate.
    let premature = offers::extend_offer(
        &db,
        OfferInput {
            candidate_id: applicant.id,
            salary_cents: 9_000_000,
            currency: "USD".into(),
            start_date: None,
        },
        None,
    )
    .await
    .unwrap_err();
    assert!(matches!(premature, HrError::InvalidState { .. }));

    candidates::shortlist(&db, applicant.id, None).await?;
    interviews::schedule(
        &db,
        ScheduleInput {
            candidate_id: applicant.id,
            scheduled_at: Utc::now().into(),
            interviewer: "Grace".into(),
        },
        None,
    )
    .await?;
    let offer = offers::extend_offer(
        &db,
        OfferInput {
            candidate_id: applicant.id,
            salary_cents: 9_000_000,
            currency: "USD".into(),
            start_date: None,
        },
        None,
    )
    .await?;
    offers::decline(&db, offer.id, None).await?;

    let applicant = candidates::get(&db, applicant.id).await?;
    assert_eq!(applicant.status, candidate::Status::Withdrawn);
    let err = offers::accept(&db, offer.id, None).await.unwrap_err();
    assert!(matches!(err, HrError::InvalidTransition(_)));

    announcements::close(&db, announcement.id, None).await?;
    let err = announcements::publish(&db, announcement.id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, HrError::InvalidTransition(_)));
    Ok(())
}
