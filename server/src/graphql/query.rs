use async_graphql::{Context, ID, Object, OutputType, Result};
use chrono::{Datelike, NaiveDate, Utc};
use products_hr::{
    accounts::{self, UserAccountFilter},
    history,
    leave::{self, LeaveRequestFilter},
    people::{self, EmployeeFilter},
    probation::{self, ProbationFilter},
    recruitment::{
        announcements::{self, AnnouncementFilter},
        candidates::{self, CandidateFilter},
        interviews, offers,
        requisitions::{self, RequisitionFilter},
    },
    stats,
    view::{self, Searchable},
};
use tracing::instrument;

use super::inputs::{ViewArgs, view_query};
use super::types::*;
use super::{IntoGql, database, parse_id};

#[derive(Default)]
pub struct HrQuery;

fn paged<M, N>(records: Vec<M>, args: Option<ViewArgs>) -> Result<Paged<N>>
where
    M: Searchable,
    N: From<M> + OutputType,
{
    let page = view::view(records, &view_query(args)).gql()?;
    Ok(Paged::from_page(page))
}

fn optional_id(field: &str, id: Option<ID>) -> Result<Option<i32>> {
    id.as_ref().map(|id| parse_id(field, id)).transpose()
}

#[Object]
impl HrQuery {
    async fn employee_types(
        &self,
        ctx: &Context<'_>,
        view: Option<ViewArgs>,
    ) -> Result<Paged<EmployeeTypeNode>> {
        let db = database(ctx)?;
        paged(people::list_employee_types(db.as_ref()).await.gql()?, view)
    }

    async fn employee_type(&self, ctx: &Context<'_>, id: ID) -> Result<EmployeeTypeNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        Ok(people::get_employee_type(db.as_ref(), id).await.gql()?.into())
    }

    #[instrument(name = "graphql.hr.employees", skip_all)]
    async fn employees(
        &self,
        ctx: &Context<'_>,
        view: Option<ViewArgs>,
    ) -> Result<Paged<EmployeeNode>> {
        let db = database(ctx)?;
        let records = people::list_employees(db.as_ref(), EmployeeFilter::default())
            .await
            .gql()?;
        paged(records, view)
    }

    async fn employee(&self, ctx: &Context<'_>, id: ID) -> Result<EmployeeNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        Ok(people::get_employee(db.as_ref(), id).await.gql()?.into())
    }

    async fn roles(&self, ctx: &Context<'_>, view: Option<ViewArgs>) -> Result<Paged<RoleNode>> {
        let db = database(ctx)?;
        paged(accounts::list_roles(db.as_ref()).await.gql()?, view)
    }

    async fn role(&self, ctx: &Context<'_>, id: ID) -> Result<RoleNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        Ok(accounts::get_role(db.as_ref(), id).await.gql()?.into())
    }

    async fn users(
        &self,
        ctx: &Context<'_>,
        view: Option<ViewArgs>,
    ) -> Result<Paged<UserAccountNode>> {
        let db = database(ctx)?;
        let records = accounts::list_users(db.as_ref(), UserAccountFilter::default())
            .await
            .gql()?;
        paged(records, view)
    }

    async fn user(&self, ctx: &Context<'_>, id: ID) -> Result<UserAccountNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        Ok(accounts::get_user(db.as_ref(), id).await.gql()?.into())
    }

    async fn leave_types(
        &self,
        ctx: &Context<'_>,
        view: Option<ViewArgs>,
    ) -> Result<Paged<LeaveTypeNode>> {
        let db = database(ctx)?;
        paged(leave::list_types(db.as_ref()).await.gql()?, view)
    }

    async fn leave_type(&self, ctx: &Context<'_>, id: ID) -> Result<LeaveTypeNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        Ok(leave::get_type(db.as_ref(), id).await.gql()?.into())
    }

    #[instrument(name = "graphql.hr.leave_requests", skip_all)]
    async fn leave_requests(
        &self,
        ctx: &Context<'_>,
        employee_id: Option<ID>,
        view: Option<ViewArgs>,
    ) -> Result<Paged<LeaveRequestNode>> {
        let db = database(ctx)?;
        let filter = LeaveRequestFilter {
            employee_id: optional_id("employeeId", employee_id)?,
            ..LeaveRequestFilter::default()
        };
        let records = leave::list_requests_with_employee(db.as_ref(), filter).await.gql()?;
        paged(records, view)
    }

    async fn leave_request(&self, ctx: &Context<'_>, id: ID) -> Result<LeaveRequestNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        Ok(leave::get_request(db.as_ref(), id).await.gql()?.into())
    }

    /// Inclusive day count of a leave period.
    async fn calculate_leave_days(&self, start_date: NaiveDate, end_date: NaiveDate) -> Result<i32> {
        leave::calculate_days(start_date, end_date).gql()
    }

    async fn leave_balance(
        &self,
        ctx: &Context<'_>,
        employee_id: ID,
        year: Option<i32>,
    ) -> Result<Vec<LeaveBalanceNode>> {
        let db = database(ctx)?;
        let employee_id = parse_id("employeeId", &employee_id)?;
        let year = year.unwrap_or_else(|| Utc::now().year());
        people::get_employee(db.as_ref(), employee_id).await.gql()?;
        let balances = leave::leave_balance(db.as_ref(), employee_id, year)
            .await
            .gql()?;
        Ok(balances.into_iter().map(Into::into).collect())
    }

    async fn probations(
        &self,
        ctx: &Context<'_>,
        employee_id: Option<ID>,
        view: Option<ViewArgs>,
    ) -> Result<Paged<ProbationRecordNode>> {
        let db = database(ctx)?;
        let filter = ProbationFilter {
            employee_id: optional_id("employeeId", employee_id)?,
            ..ProbationFilter::default()
        };
        let records = probation::list_records_with_employee(db.as_ref(), filter).await.gql()?;
        paged(records, view)
    }

    async fn probation(&self, ctx: &Context<'_>, id: ID) -> Result<ProbationRecordNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        Ok(probation::get_record(db.as_ref(), id).await.gql()?.into())
    }

    async fn evaluations(&self, ctx: &Context<'_>, probation_id: ID) -> Result<Vec<EvaluationNode>> {
        let db = database(ctx)?;
        let probation_id = parse_id("probationId", &probation_id)?;
        let rows = probation::list_evaluations(db.as_ref(), probation_id)
            .await
            .gql()?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn requisitions(
        &self,
        ctx: &Context<'_>,
        view: Option<ViewArgs>,
    ) -> Result<Paged<RequisitionNode>> {
        let db = database(ctx)?;
        let records = requisitions::list(db.as_ref(), RequisitionFilter::default())
            .await
            .gql()?;
        paged(records, view)
    }

    async fn requisition(&self, ctx: &Context<'_>, id: ID) -> Result<RequisitionNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        Ok(requisitions::get(db.as_ref(), id).await.gql()?.into())
    }

    async fn announcements(
        &self,
        ctx: &Context<'_>,
        requisition_id: Option<ID>,
        view: Option<ViewArgs>,
    ) -> Result<Paged<AnnouncementNode>> {
        let db = database(ctx)?;
        let filter = AnnouncementFilter {
            requisition_id: optional_id("requisitionId", requisition_id)?,
            ..AnnouncementFilter::default()
        };
        let records = announcements::list(db.as_ref(), filter).await.gql()?;
        paged(records, view)
    }

    async fn announcement(&self, ctx: &Context<'_>, id: ID) -> Result<AnnouncementNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        Ok(announcements::get(db.as_ref(), id).await.gql()?.into())
    }

    async fn candidates(
        &self,
        ctx: &Context<'_>,
        announcement_id: Option<ID>,
        view: Option<ViewArgs>,
    ) -> Result<Paged<CandidateNode>> {
        let db = database(ctx)?;
        let filter = CandidateFilter {
            announcement_id: optional_id("announcementId", announcement_id)?,
            ..CandidateFilter::default()
        };
        let records = candidates::list(db.as_ref(), filter).await.gql()?;
        paged(records, view)
    }

    async fn candidate(&self, ctx: &Context<'_>, id: ID) -> Result<CandidateNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        Ok(candidates::get(db.as_ref(), id).await.gql()?.into())
    }

    async fn interviews(
        &self,
        ctx: &Context<'_>,
        candidate_id: Option<ID>,
        view: Option<ViewArgs>,
    ) -> Result<Paged<InterviewNode>> {
        let db = database(ctx)?;
        let candidate_id = optional_id("candidateId", candidate_id)?;
        let records = interviews::list(db.as_ref(), candidate_id).await.gql()?;
        paged(records, view)
    }

    async fn interview(&self, ctx: &Context<'_>, id: ID) -> Result<InterviewNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        Ok(interviews::get(db.as_ref(), id).await.gql()?.into())
    }

    async fn offers(
        &self,
        ctx: &Context<'_>,
        candidate_id: Option<ID>,
        view: Option<ViewArgs>,
    ) -> Result<Paged<OfferNode>> {
        let db = database(ctx)?;
        let candidate_id = optional_id("candidateId", candidate_id)?;
        let records = offers::list(db.as_ref(), candidate_id).await.gql()?;
        paged(records, view)
    }

    async fn offer(&self, ctx: &Context<'_>, id: ID) -> Result<OfferNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        Ok(offers::get(db.as_ref(), id).await.gql()?.into())
    }

    /// Status transitions of one record, oldest first.
    async fn history(
        &self,
        ctx: &Context<'_>,
        entity_type: String,
        entity_id: ID,
    ) -> Result<Vec<StatusChangeNode>> {
        let db = database(ctx)?;
        let entity_id = parse_id("entityId", &entity_id)?;
        let rows = history::history(db.as_ref(), entity_type.trim(), entity_id)
            .await
            .gql()?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn leave_stats(&self, ctx: &Context<'_>) -> Result<LeaveStatsPayload> {
        let db = database(ctx)?;
        Ok(stats::load_leave_stats(db.as_ref()).await.gql()?.into())
    }

    async fn probation_stats(
        &self,
        ctx: &Context<'_>,
        today: Option<NaiveDate>,
    ) -> Result<ProbationStatsPayload> {
        let db = database(ctx)?;
        let today = today.unwrap_or_else(|| Utc::now().date_naive());
        Ok(stats::load_probation_stats(db.as_ref(), today)
            .await
            .gql()?
            .into())
    }

    async fn recruitment_stats(&self, ctx: &Context<'_>) -> Result<RecruitmentStatsPayload> {
        let db = database(ctx)?;
        Ok(stats::load_recruitment_stats(db.as_ref()).await.gql()?.into())
    }

    async fn account_stats(&self, ctx: &Context<'_>) -> Result<Vec<StatusCountNode>> {
        let db = database(ctx)?;
        let counts = stats::load_account_stats(db.as_ref()).await.gql()?;
        Ok(counts.into_iter().map(Into::into).collect())
    }
}
