//! Table-driven finite-state helper shared by every status-bearing record.
//!
//! A machine is plain data: the entity name, its states (initial first) and a
//! list of `(from, action, to)` rows. Entity modules never branch on status
//! strings themselves; they ask the machine for the next state.

use std::fmt;

use thiserror::Error;

/// Stable snake_case name for a state or action, as stored and exposed.
pub trait Label: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    fn label(self) -> &'static str;
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("cannot {action} {entity} while it is {from}")]
pub struct TransitionError {
    pub entity: &'static str,
    pub from: &'static str,
    pub action: &'static str,
}

#[derive(Debug)]
pub struct StateMachine<S: 'static, A: 'static> {
    entity: &'static str,
    initial: S,
    states: &'static [S],
    transitions: &'static [(S, A, S)],
}

impl<S, A> StateMachine<S, A> {
    pub const fn new(
        entity: &'static str,
        initial: S,
        states: &'static [S],
        transitions: &'static [(S, A, S)],
    ) -> Self {
        Self {
            entity,
            initial,
            states,
            transitions,
        }
    }
}

impl<S: Label, A: Label> StateMachine<S, A> {
    pub fn entity(&self) -> &'static str {
        self.entity
    }

    /// Status assigned on creation.
    pub fn initial(&self) -> S {
        self.initial
    }

    pub fn states(&self) -> &'static [S] {
        self.states
    }

    pub fn next(&self, from: S, action: A) -> Result<S, TransitionError> {
        self.transitions
            .iter()
            .find(|(state, act, _)| *state == from && *act == action)
            .map(|(_, _, to)| *to)
            .ok_or(TransitionError {
                entity: self.entity,
                from: from.label(),
                action: action.label(),
            })
    }

    pub fn can(&self, from: S, action: A) -> bool {
        self.next(from, action).is_ok()
    }

    /// Actions valid from `from`, in table order, without duplicates.
    pub fn allowed_actions(&self, from: S) -> Vec<A> {
        let mut actions = Vec::new();
        for (state, action, _) in self.transitions {
            if *state == from && !actions.contains(action) {
                actions.push(*action);
            }
        }
        actions
    }

    pub fn is_terminal(&self, state: S) -> bool {
        !self.transitions.iter().any(|(from, _, _)| *from == state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    enum Door {
        Closed,
        Open,
        Locked,
    }

    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    enum Push {
        Open,
        Close,
        Lock,
    }

    impl Label for Door {
        fn label(self) -> &'static str {
            match self {
                Door::Closed => "closed",
                Door::Open => "open",
                Door::Locked => "locked",
            }
        }
    }

    impl Label for Push {
        fn label(self) -> &'static str {
            match self {
                Push::Open => "open",
                Push::Close => "close",
                Push::Lock => "lock",
            }
        }
    }

    static DOOR: StateMachine<Door, Push> = StateMachine::new(
        "door",
        Door::Closed,
        &[Door::Closed, Door::Open, Door::Locked],
        &[
            (Door::Closed, Push::Open, Door::Open),
            (Door::Open, Push::Close, Door::Closed),
            (Door::Closed, Push::Lock, Door::Locked),
        ],
    );

    #[test]
    fn follows_table_rows() {
        assert_eq!(DOOR.initial(), Door::Closed);
        assert_eq!(DOOR.next(Door::Closed, Push::Open), Ok(Door::Open));
        assert_eq!(DOOR.next(Door::Open, Push::Close), Ok(Door::Closed));
    }

    #[test]
    fn unknown_pairs_name_the_offending_state_and_action() {
        let err = DOOR.next(Door::Open, Push::Lock).unwrap_err();
        assert_eq!(err.from, "open");
        assert_eq!(err.action, "lock");
        assert_eq!(err.to_string(), "cannot lock door while it is open");
    }

    #[test]
    fn allowed_actions_and_terminal_states() {
        assert_eq!(DOOR.allowed_actions(Door::Closed), vec![Push::Open, Push::Lock]);
        assert!(DOOR.allowed_actions(Door::Locked).is_empty());
        assert!(DOOR.is_terminal(Door::Locked));
        assert!(!DOOR.is_terminal(Door::Open));
        assert!(DOOR.can(Door::Closed, Push::Lock));
        assert!(!DOOR.can(Door::Locked, Push::Open));
    }
}
