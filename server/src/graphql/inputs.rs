use async_graphql::{ID, InputObject};
use chrono::{DateTime, NaiveDate, Utc};
use products_hr::{
    accounts::{RoleInput, UserAccountInput},
    leave::{Approval, LeaveRequestInput, LeaveTypeInput, Rejection},
    people::{EmployeeInput, EmployeeTypeInput},
    probation::{EvaluationInput, ProbationInput},
    recruitment::{
        announcements::AnnouncementInput,
        candidates::CandidateInput,
        interviews::{CompletionInput, ScheduleInput},
        offers::OfferInput,
        requisitions::RequisitionInput,
    },
    view::{DEFAULT_PAGE_SIZE, ViewQuery},
};

use super::parse_id;
use super::types::{EmployeeStatus, Rating, Recommendation, RequisitionStatus};

#[derive(InputObject, Clone, Debug)]
pub struct FacetFilter {
    pub facet: String,
    pub value: String,
}

/// Search, facet filters and 1-based paging applied to a list.
#[derive(InputObject, Clone, Debug, Default)]
pub struct ViewArgs {
    pub search: Option<String>,
    #[graphql(default)]
    pub filters: Vec<FacetFilter>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

pub fn view_query(args: Option<ViewArgs>) -> ViewQuery {
    let args = args.unwrap_or_default();
    ViewQuery {
        search: args.search,
        filters: args
            .filters
            .into_iter()
            .map(|filter| (filter.facet, filter.value))
            .collect(),
        page: args.page.unwrap_or(1),
        page_size: args.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
    }
}

#[derive(InputObject, Clone, Debug)]
pub struct EmployeeTypeFields {
    pub name: String,
    pub description: Option<String>,
}

impl From<EmployeeTypeFields> for EmployeeTypeInput {
    fn from(value: EmployeeTypeFields) -> Self {
        Self {
            name: value.name,
            description: value.description,
        }
    }
}

#[derive(InputObject, Clone, Debug)]
pub struct EmployeeFields {
    pub employee_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub employee_type_id: Option<ID>,
    pub hire_date: Option<NaiveDate>,
    pub status: Option<EmployeeStatus>,
}

impl EmployeeFields {
    pub fn into_input(self) -> async_graphql::Result<EmployeeInput> {
        Ok(EmployeeInput {
            employee_type_id: self
                .employee_type_id
                .as_ref()
                .map(|id| parse_id("employeeTypeId", id))
                .transpose()?,
            employee_number: self.employee_number,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            department: self.department,
            position: self.position,
            hire_date: self.hire_date,
            status: self.status.map(Into::into),
        })
    }
}

#[derive(InputObject, Clone, Debug)]
pub struct RoleFields {
    pub name: String,
    pub description: Option<String>,
}

impl From<RoleFields> for RoleInput {
    fn from(value: RoleFields) -> Self {
        Self {
            name: value.name,
            description: value.description,
        }
    }
}

#[derive(InputObject, Clone, Debug)]
pub struct UserAccountFields {
    pub username: String,
    pub full_name: String,
    pub email: Option<String>,
    pub role_id: ID,
}

impl UserAccountFields {
    pub fn into_input(self) -> async_graphql::Result<UserAccountInput> {
        Ok(UserAccountInput {
            role_id: parse_id("roleId", &self.role_id)?,
            username: self.username,
            full_name: self.full_name,
            email: self.email,
        })
    }
}

#[derive(InputObject, Clone, Debug)]
pub struct LeaveTypeFields {
    pub name: String,
    pub days_allowed: i32,
    pub description: Option<String>,
}

impl From<LeaveTypeFields> for LeaveTypeInput {
    fn from(value: LeaveTypeFields) -> Self {
        Self {
            name: value.name,
            days_allowed: value.days_allowed,
            description: value.description,
        }
    }
}

#[derive(InputObject, Clone, Debug)]
pub struct LeaveRequestFields {
    pub employee_id: ID,
    pub leave_type_id: ID,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

impl LeaveRequestFields {
    pub fn into_input(self) -> async_graphql::Result<LeaveRequestInput> {
        Ok(LeaveRequestInput {
            employee_id: parse_id("employeeId", &self.employee_id)?,
            leave_type_id: parse_id("leaveTypeId", &self.leave_type_id)?,
            start_date: self.start_date,
            end_date: self.end_date,
            reason: self.reason,
        })
    }
}

#[derive(InputObject, Clone, Debug, Default)]
pub struct ApprovalFields {
    pub approved_by: Option<String>,
    pub comments: Option<String>,
}

impl From<ApprovalFields> for Approval {
    fn from(value: ApprovalFields) -> Self {
        Self {
            approved_by: value.approved_by,
            comments: value.comments,
        }
    }
}

#[derive(InputObject, Clone, Debug, Default)]
pub struct RejectionFields {
    pub rejected_by: Option<String>,
    pub reason: Option<String>,
}

impl From<RejectionFields> for Rejection {
    fn from(value: RejectionFields) -> Self {
        Self {
            rejected_by: value.rejected_by,
            reason: value.reason,
        }
    }
}

#[derive(InputObject, Clone, Debug)]
pub struct ProbationFields {
    pub employee_id: ID,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub notes: Option<String>,
}

impl ProbationFields {
    pub fn into_input(self) -> async_graphql::Result<ProbationInput> {
        Ok(ProbationInput {
            employee_id: parse_id("employeeId", &self.employee_id)?,
            start_date: self.start_date,
            end_date: self.end_date,
            notes: self.notes,
        })
    }
}

#[derive(InputObject, Clone, Debug)]
pub struct EvaluationFields {
    pub probation_id: ID,
    pub evaluator: Option<String>,
    pub evaluation_date: NaiveDate,
    pub rating: Rating,
    pub recommendation: Recommendation,
    pub extension_days: Option<i32>,
    pub comments: Option<String>,
}

impl EvaluationFields {
    pub fn into_input(self) -> async_graphql::Result<EvaluationInput> {
        Ok(EvaluationInput {
            probation_id: parse_id("probationId", &self.probation_id)?,
            evaluator: self.evaluator,
            evaluation_date: self.evaluation_date,
            rating: self.rating.into(),
            recommendation: self.recommendation.into(),
            extension_days: self.extension_days,
            comments: self.comments,
        })
    }
}

#[derive(InputObject, Clone, Debug)]
pub struct RequisitionFields {
    pub title: String,
    pub department: Option<String>,
    pub positions: i32,
    pub justification: Option<String>,
    pub status: Option<RequisitionStatus>,
}

impl From<RequisitionFields> for RequisitionInput {
    fn from(value: RequisitionFields) -> Self {
        Self {
            title: value.title,
            department: value.department,
            positions: value.positions,
            justification: value.justification,
            status: value.status.map(Into::into),
        }
    }
}

#[derive(InputObject, Clone, Debug)]
pub struct AnnouncementFields {
    pub requisition_id: ID,
    pub title: String,
    pub description: Option<String>,
    pub closing_date: Option<NaiveDate>,
}

impl AnnouncementFields {
    pub fn into_input(self) -> async_graphql::Result<AnnouncementInput> {
        Ok(AnnouncementInput {
            requisition_id: parse_id("requisitionId", &self.requisition_id)?,
            title: self.title,
            description: self.description,
            closing_date: self.closing_date,
        })
    }
}

#[derive(InputObject, Clone, Debug)]
pub struct CandidateFields {
    pub announcement_id: ID,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl CandidateFields {
    pub fn into_input(self) -> async_graphql::Result<CandidateInput> {
        Ok(CandidateInput {
            announcement_id: parse_id("announcementId", &self.announcement_id)?,
            full_name: self.full_name,
            email: self.email,
            phone: self.phone,
        })
    }
}

#[derive(InputObject, Clone, Debug)]
pub struct InterviewFields {
    pub candidate_id: ID,
    pub scheduled_at: DateTime<Utc>,
    pub interviewer: String,
}

impl InterviewFields {
    pub fn into_input(self) -> async_graphql::Result<ScheduleInput> {
        Ok(ScheduleInput {
            candidate_id: parse_id("candidateId", &self.candidate_id)?,
            scheduled_at: self.scheduled_at.into(),
            interviewer: self.interviewer,
        })
    }
}

#[derive(InputObject, Clone, Debug)]
pub struct InterviewResultFields {
    pub score: i32,
    pub feedback: Option<String>,
}

impl From<InterviewResultFields> for CompletionInput {
    fn from(value: InterviewResultFields) -> Self {
        Self {
            score: value.score,
            feedback: value.feedback,
        }
    }
}

#[derive(InputObject, Clone, Debug)]
pub struct OfferFields {
    pub candidate_id: ID,
    pub salary_cents: i64,
    pub currency: String,
    pub start_date: Option<NaiveDate>,
}

impl OfferFields {
    pub fn into_input(self) -> async_graphql::Result<OfferInput> {
        Ok(OfferInput {
            candidate_id: parse_id("candidateId", &self.candidate_id)?,
            salary_cents: self.salary_cents,
            currency: self.currency,
            start_date: self.start_date,
        })
    }
}
