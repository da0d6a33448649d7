//! Persisted HR console records.
//!
//! Every status-bearing model stores its status as a closed string enum whose
//! first variant is the default assigned on creation.

pub mod candidate;
pub mod employee;
pub mod employee_type;
pub mod interview;
pub mod job_announcement;
pub mod job_offer;
pub mod job_requisition;
pub mod leave_request;
pub mod leave_type;
pub mod probation_evaluation;
pub mod probation_record;
pub mod role;
pub mod status_change;
pub mod user_account;
