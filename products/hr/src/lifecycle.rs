//! Transition tables for each status-bearing record.

use entity::{
    candidate::Status as CandidateStatus, employee::Status as EmployeeStatus,
    interview::Status as InterviewStatus, job_announcement::Status as AnnouncementStatus,
    job_offer::Status as OfferStatus, job_requisition::Status as RequisitionStatus,
    leave_request::Status as LeaveStatus, probation_evaluation::Rating,
    probation_evaluation::Recommendation, probation_record::Status as ProbationStatus,
    user_account::Status as AccountStatus,
};

use crate::fsm::{Label, StateMachine};

macro_rules! labels {
    ($ty:ty { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl Label for $ty {
            fn label(self) -> &'static str {
                type Subject = $ty;
                match self {
                    $(Subject::$variant => $label,)+
                }
            }
        }
    };
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LeaveAction {
    Approve,
    Reject,
    Cancel,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ProbationAction {
    Confirm,
    Extend,
    Terminate,
}

impl From<Recommendation> for ProbationAction {
    fn from(value: Recommendation) -> Self {
        match value {
            Recommendation::Confirm => ProbationAction::Confirm,
            Recommendation::Extend => ProbationAction::Extend,
            Recommendation::Terminate => ProbationAction::Terminate,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RequisitionAction {
    Open,
    Start,
    Hold,
    Resume,
    Fill,
    Cancel,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AnnouncementAction {
    Publish,
    Close,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CandidateAction {
    Shortlist,
    Interview,
    Offer,
    Hire,
    Reject,
    Withdraw,
    Reopen,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InterviewAction {
    Complete,
    Cancel,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OfferAction {
    Accept,
    Decline,
    Withdraw,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AccountAction {
    Toggle,
}

labels!(LeaveStatus {
    Pending => "pending",
    Approved => "approved",
    Rejected => "rejected",
    Cancelled => "cancelled",
});
labels!(LeaveAction {
    Approve => "approve",
    Reject => "reject",
    Cancel => "cancel",
});
labels!(ProbationStatus {
    Active => "active",
    Confirmed => "confirmed",
    Extended => "extended",
    Terminated => "terminated",
});
labels!(ProbationAction {
    Confirm => "confirm",
    Extend => "extend",
    Terminate => "terminate",
});
labels!(RequisitionStatus {
    Draft => "draft",
    Open => "open",
    InProgress => "in_progress",
    OnHold => "on_hold",
    Filled => "filled",
    Cancelled => "cancelled",
});
labels!(RequisitionAction {
    Open => "open",
    Start => "start",
    Hold => "hold",
    Resume => "resume",
    Fill => "fill",
    Cancel => "cancel",
});
labels!(AnnouncementStatus {
    Draft => "draft",
    Published => "published",
    Closed => "closed",
});
labels!(AnnouncementAction {
    Publish => "publish",
    Close => "close",
});
labels!(CandidateStatus {
    Applied => "applied",
    Shortlisted => "shortlisted",
    Interviewing => "interviewing",
    Offered => "offered",
    Hired => "hired",
    Rejected => "rejected",
    Withdrawn => "withdrawn",
});
labels!(CandidateAction {
    Shortlist => "shortlist",
    Interview => "interview",
    Offer => "offer",
    Hire => "hire",
    Reject => "reject",
    Withdraw => "withdraw",
    Reopen => "reopen",
});
labels!(InterviewStatus {
    Scheduled => "scheduled",
    Completed => "completed",
    Cancelled => "cancelled",
});
labels!(InterviewAction {
    Complete => "complete",
    Cancel => "cancel",
});
labels!(OfferStatus {
    Pending => "pending",
    Accepted => "accepted",
    Declined => "declined",
    Withdrawn => "withdrawn",
});
labels!(OfferAction {
    Accept => "accept",
    Decline => "decline",
    Withdraw => "withdraw",
});
labels!(AccountStatus {
    Active => "active",
    Inactive => "inactive",
});
labels!(AccountAction {
    Toggle => "toggle",
});
labels!(EmployeeStatus {
    Active => "active",
    Inactive => "inactive",
    Terminated => "terminated",
});
labels!(Rating {
    Excellent => "excellent",
    Good => "good",
    Satisfactory => "satisfactory",
    NeedsImprovement => "needs_improvement",
    Poor => "poor",
});
labels!(Recommendation {
    Confirm => "confirm",
    Extend => "extend",
    Terminate => "terminate",
});

pub static LEAVE_REQUEST: StateMachine<LeaveStatus, LeaveAction> = StateMachine::new(
    "leave_request",
    LeaveStatus::Pending,
    &[
        LeaveStatus::Pending,
        LeaveStatus::Approved,
        LeaveStatus::Rejected,
        LeaveStatus::Cancelled,
    ],
    &[
        (LeaveStatus::Pending, LeaveAction::Approve, LeaveStatus::Approved),
        (LeaveStatus::Pending, LeaveAction::Reject, LeaveStatus::Rejected),
        (LeaveStatus::Pending, LeaveAction::Cancel, LeaveStatus::Cancelled),
    ],
);

// An extended probation is evaluated again at its new end date.
pub static PROBATION: StateMachine<ProbationStatus, ProbationAction> = StateMachine::new(
    "probation_record",
    ProbationStatus::Active,
    &[
        ProbationStatus::Active,
        ProbationStatus::Confirmed,
        ProbationStatus::Extended,
        ProbationStatus::Terminated,
    ],
    &[
        (ProbationStatus::Active, ProbationAction::Confirm, ProbationStatus::Confirmed),
        (ProbationStatus::Active, ProbationAction::Extend, ProbationStatus::Extended),
        (ProbationStatus::Active, ProbationAction::Terminate, ProbationStatus::Terminated),
        (ProbationStatus::Extended, ProbationAction::Confirm, ProbationStatus::Confirmed),
        (ProbationStatus::Extended, ProbationAction::Extend, ProbationStatus::Extended),
        (ProbationStatus::Extended, ProbationAction::Terminate, ProbationStatus::Terminated),
    ],
);

pub static REQUISITION: StateMachine<RequisitionStatus, RequisitionAction> = StateMachine::new(
    "job_requisition",
    RequisitionStatus::Draft,
    &[
        RequisitionStatus::Draft,
        RequisitionStatus::Open,
        RequisitionStatus::InProgress,
        RequisitionStatus::OnHold,
        RequisitionStatus::Filled,
        RequisitionStatus::Cancelled,
    ],
    &[
        (RequisitionStatus::Draft, RequisitionAction::Open, RequisitionStatus::Open),
        (RequisitionStatus::Open, RequisitionAction::Start, RequisitionStatus::InProgress),
        (RequisitionStatus::Open, RequisitionAction::Hold, RequisitionStatus::OnHold),
        (RequisitionStatus::InProgress, RequisitionAction::Hold, RequisitionStatus::OnHold),
        (RequisitionStatus::OnHold, RequisitionAction::Resume, RequisitionStatus::Open),
        (RequisitionStatus::Open, RequisitionAction::Fill, RequisitionStatus::Filled),
        (RequisitionStatus::InProgress, RequisitionAction::Fill, RequisitionStatus::Filled),
        (RequisitionStatus::Draft, RequisitionAction::Cancel, RequisitionStatus::Cancelled),
        (RequisitionStatus::Open, RequisitionAction::Cancel, RequisitionStatus::Cancelled),
        (RequisitionStatus::InProgress, RequisitionAction::Cancel, RequisitionStatus::Cancelled),
        (RequisitionStatus::OnHold, RequisitionAction::Cancel, RequisitionStatus::Cancelled),
    ],
);

pub static ANNOUNCEMENT: StateMachine<AnnouncementStatus, AnnouncementAction> = StateMachine::new(
    "job_announcement",
    AnnouncementStatus::Draft,
    &[
        AnnouncementStatus::Draft,
        AnnouncementStatus::Published,
        AnnouncementStatus::Closed,
    ],
    &[
        (AnnouncementStatus::Draft, AnnouncementAction::Publish, AnnouncementStatus::Published),
        (AnnouncementStatus::Published, AnnouncementAction::Close, AnnouncementStatus::Closed),
    ],
);

pub static CANDIDATE: StateMachine<CandidateStatus, CandidateAction> = StateMachine::new(
    "candidate",
    CandidateStatus::Applied,
    &[
        CandidateStatus::Applied,
        CandidateStatus::Shortlisted,
        CandidateStatus::Interviewing,
        CandidateStatus::Offered,
        CandidateStatus::Hired,
        CandidateStatus::Rejected,
        CandidateStatus::Withdrawn,
    ],
    &[
        (CandidateStatus::Applied, CandidateAction::Shortlist, CandidateStatus::Shortlisted),
        (CandidateStatus::Shortlisted, CandidateAction::Interview, CandidateStatus::Interviewing),
        (CandidateStatus::Interviewing, CandidateAction::Offer, CandidateStatus::Offered),
        (CandidateStatus::Offered, CandidateAction::Hire, CandidateStatus::Hired),
        // An offer pulled back or removed returns the candidate to interviewing.
        (CandidateStatus::Offered, CandidateAction::Reopen, CandidateStatus::Interviewing),
        (CandidateStatus::Applied, CandidateAction::Reject, CandidateStatus::Rejected),
        (CandidateStatus::Shortlisted, CandidateAction::Reject, CandidateStatus::Rejected),
        (CandidateStatus::Interviewing, CandidateAction::Reject, CandidateStatus::Rejected),
        (CandidateStatus::Offered, CandidateAction::Reject, CandidateStatus::Rejected),
        (CandidateStatus::Applied, CandidateAction::Withdraw, CandidateStatus::Withdrawn),
        (CandidateStatus::Shortlisted, CandidateAction::Withdraw, CandidateStatus::Withdrawn),
        (CandidateStatus::Interviewing, CandidateAction::Withdraw, CandidateStatus::Withdrawn),
        (CandidateStatus::Offered, CandidateAction::Withdraw, CandidateStatus::Withdrawn),
    ],
);

pub static INTERVIEW: StateMachine<InterviewStatus, InterviewAction> = StateMachine::new(
    "interview",
    InterviewStatus::Scheduled,
    &[
        InterviewStatus::Scheduled,
        InterviewStatus::Completed,
        InterviewStatus::Cancelled,
    ],
    &[
        (InterviewStatus::Scheduled, InterviewAction::Complete, InterviewStatus::Completed),
        (InterviewStatus::Scheduled, InterviewAction::Cancel, InterviewStatus::Cancelled),
    ],
);

pub static OFFER: StateMachine<OfferStatus, OfferAction> = StateMachine::new(
    "job_offer",
    OfferStatus::Pending,
    &[
        OfferStatus::Pending,
        OfferStatus::Accepted,
        OfferStatus::Declined,
        OfferStatus::Withdrawn,
    ],
    &[
        (OfferStatus::Pending, OfferAction::Accept, OfferStatus::Accepted),
        (OfferStatus::Pending, OfferAction::Decline, OfferStatus::Declined),
        (OfferStatus::Pending, OfferAction::Withdraw, OfferStatus::Withdrawn),
    ],
);

pub static USER_ACCOUNT: StateMachine<AccountStatus, AccountAction> = StateMachine::new(
    "user_account",
    AccountStatus::Active,
    &[AccountStatus::Active, AccountStatus::Inactive],
    &[
        (AccountStatus::Active, AccountAction::Toggle, AccountStatus::Inactive),
        (AccountStatus::Inactive, AccountAction::Toggle, AccountStatus::Active),
    ],
);
