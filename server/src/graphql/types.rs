use async_graphql::{Enum, ID, OutputType, SimpleObject};
use chrono::{DateTime, NaiveDate, Utc};
use entity::{
    candidate, employee, employee_type, interview, job_announcement, job_offer, job_requisition,
    leave_request, leave_type, probation_evaluation, probation_record, role, status_change,
    user_account,
};
use products_hr::{
    Label, StateMachine,
    leave::LeaveBalance,
    lifecycle::{
        ANNOUNCEMENT, CANDIDATE, INTERVIEW, LEAVE_REQUEST, OFFER, PROBATION, REQUISITION,
        USER_ACCOUNT,
    },
    probation::EvaluationOutcome,
    stats::{LeaveStats, ProbationStats, RecruitmentStats, StatusCount},
    view::Page,
};

pub(crate) fn gid(id: i32) -> ID {
    ID::from(id.to_string())
}

fn actions<S: Label, A: Label>(machine: &StateMachine<S, A>, state: S) -> Vec<String> {
    machine
        .allowed_actions(state)
        .into_iter()
        .map(|action| action.label().to_string())
        .collect()
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(remote = "entity::employee::Status")]
pub enum EmployeeStatus {
    Active,
    Inactive,
    Terminated,
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(remote = "entity::user_account::Status")]
pub enum AccountStatus {
    Active,
    Inactive,
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(remote = "entity::leave_request::Status")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(remote = "entity::probation_record::Status")]
pub enum ProbationStatus {
    Active,
    Confirmed,
    Extended,
    Terminated,
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(remote = "entity::probation_evaluation::Rating")]
pub enum Rating {
    Excellent,
    Good,
    Satisfactory,
    NeedsImprovement,
    Poor,
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(remote = "entity::probation_evaluation::Recommendation")]
pub enum Recommendation {
    Confirm,
    Extend,
    Terminate,
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(remote = "entity::job_requisition::Status")]
pub enum RequisitionStatus {
    Draft,
    Open,
    InProgress,
    OnHold,
    Filled,
    Cancelled,
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(remote = "products_hr::lifecycle::RequisitionAction")]
pub enum RequisitionAction {
    Open,
    Start,
    Hold,
    Resume,
    Fill,
    Cancel,
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(remote = "entity::job_announcement::Status")]
pub enum AnnouncementStatus {
    Draft,
    Published,
    Closed,
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(remote = "entity::candidate::Status")]
pub enum CandidateStatus {
    Applied,
    Shortlisted,
    Interviewing,
    Offered,
    Hired,
    Rejected,
    Withdrawn,
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(remote = "entity::interview::Status")]
pub enum InterviewStatus {
    Scheduled,
    Completed,
    Cancelled,
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(remote = "entity::job_offer::Status")]
pub enum OfferStatus {
    Pending,
    Accepted,
    Declined,
    Withdrawn,
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(concrete(name = "EmployeeTypePage", params(EmployeeTypeNode)))]
#[graphql(concrete(name = "EmployeePage", params(EmployeeNode)))]
#[graphql(concrete(name = "RolePage", params(RoleNode)))]
#[graphql(concrete(name = "UserAccountPage", params(UserAccountNode)))]
#[graphql(concrete(name = "LeaveTypePage", params(LeaveTypeNode)))]
#[graphql(concrete(name = "LeaveRequestPage", params(LeaveRequestNode)))]
#[graphql(concrete(name = "ProbationRecordPage", params(ProbationRecordNode)))]
#[graphql(concrete(name = "RequisitionPage", params(RequisitionNode)))]
#[graphql(concrete(name = "AnnouncementPage", params(AnnouncementNode)))]
#[graphql(concrete(name = "CandidatePage", params(CandidateNode)))]
#[graphql(concrete(name = "InterviewPage", params(InterviewNode)))]
#[graphql(concrete(name = "OfferPage", params(OfferNode)))]
pub struct Paged<T: OutputType> {
    pub items: Vec<T>,
    pub page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T: OutputType> Paged<T> {
    pub fn from_page<M>(page: Page<M>) -> Self
    where
        T: From<M>,
    {
        let page = page.map(T::from);
        Self {
            items: page.items,
            page: page.page,
            page_size: page.page_size,
            total_items: page.total_items,
            total_pages: page.total_pages,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "EmployeeType")]
pub struct EmployeeTypeNode {
    pub id: ID,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<employee_type::Model> for EmployeeTypeNode {
    fn from(model: employee_type::Model) -> Self {
        Self {
            id: gid(model.id),
            name: model.name,
            description: model.description,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Employee")]
pub struct EmployeeNode {
    pub id: ID,
    pub employee_number: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub employee_type_id: Option<ID>,
    pub hire_date: Option<NaiveDate>,
    pub status: EmployeeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<employee::Model> for EmployeeNode {
    fn from(model: employee::Model) -> Self {
        Self {
            id: gid(model.id),
            full_name: model.full_name(),
            employee_number: model.employee_number,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            department: model.department,
            position: model.position,
            employee_type_id: model.employee_type_id.map(gid),
            hire_date: model.hire_date,
            status: model.status.into(),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Role")]
pub struct RoleNode {
    pub id: ID,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<role::Model> for RoleNode {
    fn from(model: role::Model) -> Self {
        Self {
            id: gid(model.id),
            name: model.name,
            description: model.description,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "UserAccount")]
pub struct UserAccountNode {
    pub id: ID,
    pub username: String,
    pub full_name: String,
    pub email: Option<String>,
    pub role_id: ID,
    pub status: AccountStatus,
    pub allowed_actions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<user_account::Model> for UserAccountNode {
    fn from(model: user_account::Model) -> Self {
        Self {
            id: gid(model.id),
            username: model.username,
            full_name: model.full_name,
            email: model.email,
            role_id: gid(model.role_id),
            allowed_actions: actions(&USER_ACCOUNT, model.status),
            status: model.status.into(),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "LeaveType")]
pub struct LeaveTypeNode {
    pub id: ID,
    pub name: String,
    pub days_allowed: i32,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<leave_type::Model> for LeaveTypeNode {
    fn from(model: leave_type::Model) -> Self {
        Self {
            id: gid(model.id),
            name: model.name,
            days_allowed: model.days_allowed,
            description: model.description,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "LeaveRequest")]
pub struct LeaveRequestNode {
    pub id: ID,
    pub employee_id: ID,
    /// Filled on list queries, which load the employee alongside.
    pub employee_name: Option<String>,
    pub leave_type_id: ID,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_days: i32,
    pub reason: Option<String>,
    pub status: LeaveStatus,
    pub allowed_actions: Vec<String>,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub comments: Option<String>,
    pub rejected_by: Option<String>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<leave_request::Model> for LeaveRequestNode {
    fn from(model: leave_request::Model) -> Self {
        Self {
            id: gid(model.id),
            employee_id: gid(model.employee_id),
            employee_name: None,
            leave_type_id: gid(model.leave_type_id),
            start_date: model.start_date,
            end_date: model.end_date,
            total_days: model.total_days,
            reason: model.reason,
            allowed_actions: actions(&LEAVE_REQUEST, model.status),
            status: model.status.into(),
            approved_by: model.approved_by,
            approved_at: model.approved_at.map(Into::into),
            comments: model.comments,
            rejected_by: model.rejected_by,
            rejected_at: model.rejected_at.map(Into::into),
            rejection_reason: model.rejection_reason,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<(leave_request::Model, Option<employee::Model>)> for LeaveRequestNode {
    fn from((model, employee): (leave_request::Model, Option<employee::Model>)) -> Self {
        Self {
            employee_name: employee.as_ref().map(employee::Model::full_name),
            ..model.into()
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "LeaveBalance")]
pub struct LeaveBalanceNode {
    pub leave_type_id: ID,
    pub leave_type: String,
    pub days_allowed: i32,
    pub days_used: i32,
    pub days_remaining: i32,
}

impl From<LeaveBalance> for LeaveBalanceNode {
    fn from(balance: LeaveBalance) -> Self {
        Self {
            leave_type_id: gid(balance.leave_type_id),
            leave_type: balance.leave_type,
            days_allowed: balance.days_allowed,
            days_used: balance.days_used,
            days_remaining: balance.days_remaining,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "ProbationRecord")]
pub struct ProbationRecordNode {
    pub id: ID,
    pub employee_id: ID,
    pub employee_name: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub notes: Option<String>,
    pub status: ProbationStatus,
    pub allowed_actions: Vec<String>,
    /// Days until the end date relative to today; negative once overdue.
    pub days_remaining: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<probation_record::Model> for ProbationRecordNode {
    fn from(model: probation_record::Model) -> Self {
        Self {
            id: gid(model.id),
            employee_id: gid(model.employee_id),
            employee_name: None,
            days_remaining: products_hr::probation::days_remaining(
                &model,
                Utc::now().date_naive(),
            ),
            start_date: model.start_date,
            end_date: model.end_date,
            notes: model.notes,
            allowed_actions: actions(&PROBATION, model.status),
            status: model.status.into(),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<(probation_record::Model, Option<employee::Model>)> for ProbationRecordNode {
    fn from((model, employee): (probation_record::Model, Option<employee::Model>)) -> Self {
        Self {
            employee_name: employee.as_ref().map(employee::Model::full_name),
            ..model.into()
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "ProbationEvaluation")]
pub struct EvaluationNode {
    pub id: ID,
    pub probation_id: ID,
    pub evaluator: String,
    pub evaluation_date: NaiveDate,
    pub rating: Rating,
    pub score: i32,
    pub recommendation: Recommendation,
    pub extension_days: Option<i32>,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<probation_evaluation::Model> for EvaluationNode {
    fn from(model: probation_evaluation::Model) -> Self {
        Self {
            id: gid(model.id),
            probation_id: gid(model.probation_id),
            evaluator: model.evaluator,
            evaluation_date: model.evaluation_date,
            score: i32::from(model.rating.score()),
            rating: model.rating.into(),
            recommendation: model.recommendation.into(),
            extension_days: model.extension_days,
            comments: model.comments,
            created_at: model.created_at.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct EvaluationPayload {
    pub evaluation: EvaluationNode,
    pub probation: ProbationRecordNode,
}

impl From<EvaluationOutcome> for EvaluationPayload {
    fn from(outcome: EvaluationOutcome) -> Self {
        Self {
            evaluation: outcome.evaluation.into(),
            probation: outcome.record.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "JobRequisition")]
pub struct RequisitionNode {
    pub id: ID,
    pub title: String,
    pub department: Option<String>,
    pub positions: i32,
    pub justification: Option<String>,
    pub status: RequisitionStatus,
    pub allowed_actions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<job_requisition::Model> for RequisitionNode {
    fn from(model: job_requisition::Model) -> Self {
        Self {
            id: gid(model.id),
            title: model.title,
            department: model.department,
            positions: model.positions,
            justification: model.justification,
            allowed_actions: actions(&REQUISITION, model.status),
            status: model.status.into(),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "JobAnnouncement")]
pub struct AnnouncementNode {
    pub id: ID,
    pub requisition_id: ID,
    pub title: String,
    pub description: Option<String>,
    pub closing_date: Option<NaiveDate>,
    pub status: AnnouncementStatus,
    pub allowed_actions: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<job_announcement::Model> for AnnouncementNode {
    fn from(model: job_announcement::Model) -> Self {
        Self {
            id: gid(model.id),
            requisition_id: gid(model.requisition_id),
            title: model.title,
            description: model.description,
            closing_date: model.closing_date,
            allowed_actions: actions(&ANNOUNCEMENT, model.status),
            status: model.status.into(),
            published_at: model.published_at.map(Into::into),
            closed_at: model.closed_at.map(Into::into),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Candidate")]
pub struct CandidateNode {
    pub id: ID,
    pub announcement_id: ID,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: CandidateStatus,
    pub allowed_actions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<candidate::Model> for CandidateNode {
    fn from(model: candidate::Model) -> Self {
        Self {
            id: gid(model.id),
            announcement_id: gid(model.announcement_id),
            full_name: model.full_name,
            email: model.email,
            phone: model.phone,
            allowed_actions: actions(&CANDIDATE, model.status),
            status: model.status.into(),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Interview")]
pub struct InterviewNode {
    pub id: ID,
    pub candidate_id: ID,
    pub scheduled_at: DateTime<Utc>,
    pub interviewer: String,
    pub score: Option<i32>,
    pub feedback: Option<String>,
    pub status: InterviewStatus,
    pub allowed_actions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<interview::Model> for InterviewNode {
    fn from(model: interview::Model) -> Self {
        Self {
            id: gid(model.id),
            candidate_id: gid(model.candidate_id),
            scheduled_at: model.scheduled_at.into(),
            interviewer: model.interviewer,
            score: model.score,
            feedback: model.feedback,
            allowed_actions: actions(&INTERVIEW, model.status),
            status: model.status.into(),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "JobOffer")]
pub struct OfferNode {
    pub id: ID,
    pub candidate_id: ID,
    pub salary_cents: i64,
    pub currency: String,
    pub start_date: Option<NaiveDate>,
    pub status: OfferStatus,
    pub allowed_actions: Vec<String>,
    pub responded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<job_offer::Model> for OfferNode {
    fn from(model: job_offer::Model) -> Self {
        Self {
            id: gid(model.id),
            candidate_id: gid(model.candidate_id),
            salary_cents: model.salary_cents,
            currency: model.currency,
            start_date: model.start_date,
            allowed_actions: actions(&OFFER, model.status),
            status: model.status.into(),
            responded_at: model.responded_at.map(Into::into),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "StatusChange")]
pub struct StatusChangeNode {
    pub id: ID,
    pub entity_type: String,
    pub entity_id: ID,
    pub from_status: String,
    pub to_status: String,
    pub action: String,
    pub actor: Option<String>,
    pub note: Option<String>,
    pub changed_at: DateTime<Utc>,
}

impl From<status_change::Model> for StatusChangeNode {
    fn from(model: status_change::Model) -> Self {
        Self {
            id: gid(model.id),
            entity_type: model.entity_type,
            entity_id: gid(model.entity_id),
            from_status: model.from_status,
            to_status: model.to_status,
            action: model.action,
            actor: model.actor,
            note: model.note,
            changed_at: model.changed_at.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "StatusCount")]
pub struct StatusCountNode {
    pub status: String,
    pub count: u64,
}

impl From<StatusCount> for StatusCountNode {
    fn from(value: StatusCount) -> Self {
        Self {
            status: value.status.to_string(),
            count: value.count,
        }
    }
}

fn counts(values: Vec<StatusCount>) -> Vec<StatusCountNode> {
    values.into_iter().map(Into::into).collect()
}

#[derive(Clone, Debug, SimpleObject)]
pub struct LeaveStatsPayload {
    pub total: u64,
    pub by_status: Vec<StatusCountNode>,
    pub approved_days: i64,
}

impl From<LeaveStats> for LeaveStatsPayload {
    fn from(stats: LeaveStats) -> Self {
        Self {
            total: stats.total,
            by_status: counts(stats.by_status),
            approved_days: stats.approved_days,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct ProbationStatsPayload {
    pub total: u64,
    pub by_status: Vec<StatusCountNode>,
    pub average_rating: Option<f64>,
    pub ending_soon: u64,
    pub overdue: u64,
}

impl From<ProbationStats> for ProbationStatsPayload {
    fn from(stats: ProbationStats) -> Self {
        Self {
            total: stats.total,
            by_status: counts(stats.by_status),
            average_rating: stats.average_rating,
            ending_soon: stats.ending_soon,
            overdue: stats.overdue,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct RecruitmentStatsPayload {
    pub requisitions: Vec<StatusCountNode>,
    pub announcements: Vec<StatusCountNode>,
    pub candidates: Vec<StatusCountNode>,
    pub open_positions: i64,
}

impl From<RecruitmentStats> for RecruitmentStatsPayload {
    fn from(stats: RecruitmentStats) -> Self {
        Self {
            requisitions: counts(stats.requisitions),
            announcements: counts(stats.announcements),
            candidates: counts(stats.candidates),
            open_positions: stats.open_positions,
        }
    }
}
