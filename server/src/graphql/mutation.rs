use async_graphql::{Context, ID, Object, Result};
use products_hr::{
    accounts, leave, people, probation,
    recruitment::{announcements, candidates, interviews, offers, requisitions},
};
use tracing::instrument;

use super::inputs::*;
use super::types::*;
use super::{IntoGql, actor, database, parse_id};

#[derive(Default)]
pub struct HrMutation;

#[Object]
impl HrMutation {
    async fn create_employee_type(
        &self,
        ctx: &Context<'_>,
        input: EmployeeTypeFields,
    ) -> Result<EmployeeTypeNode> {
        let db = database(ctx)?;
        let model = people::create_employee_type(db.as_ref(), input.into())
            .await
            .gql()?;
        Ok(model.into())
    }

    async fn update_employee_type(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: EmployeeTypeFields,
    ) -> Result<EmployeeTypeNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        let model = people::update_employee_type(db.as_ref(), id, input.into())
            .await
            .gql()?;
        Ok(model.into())
    }

    async fn delete_employee_type(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        people::delete_employee_type(db.as_ref(), id).await.gql()
    }

    #[instrument(name = "graphql.hr.create_employee", skip_all)]
    async fn create_employee(&self, ctx: &Context<'_>, input: EmployeeFields) -> Result<EmployeeNode> {
        let db = database(ctx)?;
        let model = people::create_employee(db.as_ref(), input.into_input()?)
            .await
            .gql()?;
        Ok(model.into())
    }

    async fn update_employee(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: EmployeeFields,
    ) -> Result<EmployeeNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        let model = people::update_employee(db.as_ref(), id, input.into_input()?)
            .await
            .gql()?;
        Ok(model.into())
    }

    /// Leave requests and probation records of the employee are removed too.
    async fn delete_employee(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        people::delete_employee(db.as_ref(), id).await.gql()
    }

    async fn create_role(&self, ctx: &Context<'_>, input: RoleFields) -> Result<RoleNode> {
        let db = database(ctx)?;
        Ok(accounts::create_role(db.as_ref(), input.into()).await.gql()?.into())
    }

    async fn update_role(&self, ctx: &Context<'_>, id: ID, input: RoleFields) -> Result<RoleNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        Ok(accounts::update_role(db.as_ref(), id, input.into())
            .await
            .gql()?
            .into())
    }

    async fn delete_role(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        accounts::delete_role(db.as_ref(), id).await.gql()
    }

    async fn create_user(
        &self,
        ctx: &Context<'_>,
        input: UserAccountFields,
    ) -> Result<UserAccountNode> {
        let db = database(ctx)?;
        Ok(accounts::create_user(db.as_ref(), input.into_input()?)
            .await
            .gql()?
            .into())
    }

    async fn update_user(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UserAccountFields,
    ) -> Result<UserAccountNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        Ok(accounts::update_user(db.as_ref(), id, input.into_input()?)
            .await
            .gql()?
            .into())
    }

    async fn delete_user(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        accounts::delete_user(db.as_ref(), id).await.gql()
    }

    async fn toggle_user_status(
        &self,
        ctx: &Context<'_>,
        id: ID,
        actor_name: Option<String>,
    ) -> Result<UserAccountNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        Ok(accounts::toggle_status(db.as_ref(), id, actor(ctx, actor_name))
            .await
            .gql()?
            .into())
    }

    async fn create_leave_type(
        &self,
        ctx: &Context<'_>,
        input: LeaveTypeFields,
    ) -> Result<LeaveTypeNode> {
        let db = database(ctx)?;
        Ok(leave::create_type(db.as_ref(), input.into()).await.gql()?.into())
    }

    async fn update_leave_type(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: LeaveTypeFields,
    ) -> Result<LeaveTypeNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        Ok(leave::update_type(db.as_ref(), id, input.into())
            .await
            .gql()?
            .into())
    }

    async fn delete_leave_type(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        leave::delete_type(db.as_ref(), id).await.gql()
    }

    #[instrument(name = "graphql.hr.create_leave_request", skip_all)]
    async fn create_leave_request(
        &self,
        ctx: &Context<'_>,
        input: LeaveRequestFields,
    ) -> Result<LeaveRequestNode> {
        let db = database(ctx)?;
        Ok(leave::create_request(db.as_ref(), input.into_input()?)
            .await
            .gql()?
            .into())
    }

    async fn update_leave_request(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: LeaveRequestFields,
    ) -> Result<LeaveRequestNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        Ok(leave::update_request(db.as_ref(), id, input.into_input()?)
            .await
            .gql()?
            .into())
    }

    async fn delete_leave_request(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        leave::delete_request(db.as_ref(), id).await.gql()
    }

    async fn approve_leave(
        &self,
        ctx: &Context<'_>,
        id: ID,
        #[graphql(default)] input: ApprovalFields,
    ) -> Result<LeaveRequestNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        let mut approval: leave::Approval = input.into();
        approval.approved_by = actor(ctx, approval.approved_by);
        Ok(leave::approve(db.as_ref(), id, approval).await.gql()?.into())
    }

    async fn reject_leave(
        &self,
        ctx: &Context<'_>,
        id: ID,
        #[graphql(default)] input: RejectionFields,
    ) -> Result<LeaveRequestNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        let mut rejection: leave::Rejection = input.into();
        rejection.rejected_by = actor(ctx, rejection.rejected_by);
        Ok(leave::reject(db.as_ref(), id, rejection).await.gql()?.into())
    }

    async fn cancel_leave(
        &self,
        ctx: &Context<'_>,
        id: ID,
        actor_name: Option<String>,
    ) -> Result<LeaveRequestNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        Ok(leave::cancel(db.as_ref(), id, actor(ctx, actor_name))
            .await
            .gql()?
            .into())
    }

    async fn create_probation(
        &self,
        ctx: &Context<'_>,
        input: ProbationFields,
    ) -> Result<ProbationRecordNode> {
        let db = database(ctx)?;
        Ok(probation::create_record(db.as_ref(), input.into_input()?)
            .await
            .gql()?
            .into())
    }

    async fn update_probation(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: ProbationFields,
    ) -> Result<ProbationRecordNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        Ok(probation::update_record(db.as_ref(), id, input.into_input()?)
            .await
            .gql()?
            .into())
    }

    async fn delete_probation(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        probation::delete_record(db.as_ref(), id).await.gql()
    }

    /// Store an evaluation and apply its recommendation in one step.
    #[instrument(name = "graphql.hr.submit_evaluation", skip_all)]
    async fn submit_evaluation(
        &self,
        ctx: &Context<'_>,
        input: EvaluationFields,
    ) -> Result<EvaluationPayload> {
        let db = database(ctx)?;
        let mut input = input.into_input()?;
        input.evaluator = actor(ctx, input.evaluator);
        Ok(probation::submit_evaluation(db.as_ref(), input)
            .await
            .gql()?
            .into())
    }

    async fn create_requisition(
        &self,
        ctx: &Context<'_>,
        input: RequisitionFields,
    ) -> Result<RequisitionNode> {
        let db = database(ctx)?;
        Ok(requisitions::create(db.as_ref(), input.into()).await.gql()?.into())
    }

    async fn update_requisition(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: RequisitionFields,
    ) -> Result<RequisitionNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        Ok(requisitions::update(db.as_ref(), id, input.into())
            .await
            .gql()?
            .into())
    }

    async fn delete_requisition(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        requisitions::delete(db.as_ref(), id).await.gql()
    }

    async fn transition_requisition(
        &self,
        ctx: &Context<'_>,
        id: ID,
        action: RequisitionAction,
        actor_name: Option<String>,
    ) -> Result<RequisitionNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        Ok(
            requisitions::transition(db.as_ref(), id, action.into(), actor(ctx, actor_name))
                .await
                .gql()?
                .into(),
        )
    }

    async fn create_announcement(
        &self,
        ctx: &Context<'_>,
        input: AnnouncementFields,
    ) -> Result<AnnouncementNode> {
        let db = database(ctx)?;
        Ok(announcements::create(db.as_ref(), input.into_input()?)
            .await
            .gql()?
            .into())
    }

    async fn update_announcement(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: AnnouncementFields,
    ) -> Result<AnnouncementNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        Ok(announcements::update(db.as_ref(), id, input.into_input()?)
            .await
            .gql()?
            .into())
    }

    async fn delete_announcement(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        announcements::delete(db.as_ref(), id).await.gql()
    }

    async fn publish_announcement(
        &self,
        ctx: &Context<'_>,
        id: ID,
        actor_name: Option<String>,
    ) -> Result<AnnouncementNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        Ok(announcements::publish(db.as_ref(), id, actor(ctx, actor_name))
            .await
            .gql()?
            .into())
    }

    async fn close_announcement(
        &self,
        ctx: &Context<'_>,
        id: ID,
        actor_name: Option<String>,
    ) -> Result<AnnouncementNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        Ok(announcements::close(db.as_ref(), id, actor(ctx, actor_name))
            .await
            .gql()?
            .into())
    }

    async fn create_candidate(
        &self,
        ctx: &Context<'_>,
        input: CandidateFields,
    ) -> Result<CandidateNode> {
        let db = database(ctx)?;
        Ok(candidates::create(db.as_ref(), input.into_input()?)
            .await
            .gql()?
            .into())
    }

    async fn update_candidate(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: CandidateFields,
    ) -> Result<CandidateNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        Ok(candidates::update(db.as_ref(), id, input.into_input()?)
            .await
            .gql()?
            .into())
    }

    async fn delete_candidate(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        candidates::delete(db.as_ref(), id).await.gql()
    }

    async fn shortlist_candidate(
        &self,
        ctx: &Context<'_>,
        id: ID,
        actor_name: Option<String>,
    ) -> Result<CandidateNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        Ok(candidates::shortlist(db.as_ref(), id, actor(ctx, actor_name))
            .await
            .gql()?
            .into())
    }

    async fn reject_candidate(
        &self,
        ctx: &Context<'_>,
        id: ID,
        reason: Option<String>,
        actor_name: Option<String>,
    ) -> Result<CandidateNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        Ok(
            candidates::reject(db.as_ref(), id, actor(ctx, actor_name), reason)
                .await
                .gql()?
                .into(),
        )
    }

    async fn withdraw_candidate(
        &self,
        ctx: &Context<'_>,
        id: ID,
        actor_name: Option<String>,
    ) -> Result<CandidateNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        Ok(candidates::withdraw(db.as_ref(), id, actor(ctx, actor_name))
            .await
            .gql()?
            .into())
    }

    async fn schedule_interview(
        &self,
        ctx: &Context<'_>,
        input: InterviewFields,
        actor_name: Option<String>,
    ) -> Result<InterviewNode> {
        let db = database(ctx)?;
        Ok(
            interviews::schedule(db.as_ref(), input.into_input()?, actor(ctx, actor_name))
                .await
                .gql()?
                .into(),
        )
    }

    async fn update_interview(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: InterviewFields,
    ) -> Result<InterviewNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        Ok(interviews::update(db.as_ref(), id, input.into_input()?)
            .await
            .gql()?
            .into())
    }

    async fn delete_interview(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        interviews::delete(db.as_ref(), id).await.gql()
    }

    async fn complete_interview(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: InterviewResultFields,
        actor_name: Option<String>,
    ) -> Result<InterviewNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        Ok(
            interviews::complete(db.as_ref(), id, input.into(), actor(ctx, actor_name))
                .await
                .gql()?
                .into(),
        )
    }

    async fn cancel_interview(
        &self,
        ctx: &Context<'_>,
        id: ID,
        actor_name: Option<String>,
    ) -> Result<InterviewNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        Ok(interviews::cancel(db.as_ref(), id, actor(ctx, actor_name))
            .await
            .gql()?
            .into())
    }

    async fn extend_offer(
        &self,
        ctx: &Context<'_>,
        input: OfferFields,
        actor_name: Option<String>,
    ) -> Result<OfferNode> {
        let db = database(ctx)?;
        Ok(
            offers::extend_offer(db.as_ref(), input.into_input()?, actor(ctx, actor_name))
                .await
                .gql()?
                .into(),
        )
    }

    async fn update_offer(&self, ctx: &Context<'_>, id: ID, input: OfferFields) -> Result<OfferNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        Ok(offers::update(db.as_ref(), id, input.into_input()?)
            .await
            .gql()?
            .into())
    }

    async fn delete_offer(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        offers::delete(db.as_ref(), id).await.gql()
    }

    async fn accept_offer(
        &self,
        ctx: &Context<'_>,
        id: ID,
        actor_name: Option<String>,
    ) -> Result<OfferNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        Ok(offers::accept(db.as_ref(), id, actor(ctx, actor_name))
            .await
            .gql()?
            .into())
    }

    async fn decline_offer(
        &self,
        ctx: &Context<'_>,
        id: ID,
        actor_name: Option<String>,
    ) -> Result<OfferNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        Ok(offers::decline(db.as_ref(), id, actor(ctx, actor_name))
            .await
            .gql()?
            .into())
    }

    async fn withdraw_offer(
        &self,
        ctx: &Context<'_>,
        id: ID,
        actor_name: Option<String>,
    ) -> Result<OfferNode> {
        let db = database(ctx)?;
        let id = parse_id("id", &id)?;
        Ok(offers::withdraw(db.as_ref(), id, actor(ctx, actor_name))
            .await
            .gql()?
            .into())
    }
}
