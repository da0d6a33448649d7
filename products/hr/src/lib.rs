//! HR vertical slice.
//!
//! Records live in the `entity` tables; this crate owns what may happen to
//! them. Status changes only go through the transition helpers, which consult
//! the per-entity [`lifecycle`] tables and append a `status_change` row in the
//! same transaction as the record write.

pub mod accounts;
pub mod error;
pub mod fsm;
pub mod history;
pub mod leave;
pub mod lifecycle;
pub mod people;
pub mod probation;
pub mod recruitment;
pub mod stats;
pub mod view;

mod support;

pub use error::{HrError, HrResult};
pub use fsm::{Label, StateMachine, TransitionError};
pub use support::DEFAULT_ACTOR;
