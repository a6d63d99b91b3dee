//! Session audit events.
//!
//! RULE: every state change on an AuthorizationSession is recorded
//! as a SessionEvent, in the order it happened.
//! Variants are appended, never removed or reordered.

use crate::{permission::Role, types::Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    SessionStarted {
        at:   Timestamp,
        role: Role,
    },
    RoleChanged {
        at:   Timestamp,
        from: Role,
        to:   Role,
    },
    StepUpVerified {
        at:   Timestamp,
        role: Role,
    },
    StepUpCleared {
        at:     Timestamp,
        role:   Role,
        reason: StepUpClearReason,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StepUpClearReason {
    /// The session switched to a role that does not carry step-up state.
    RoleSwitch,
    /// The verification collaborator revoked it explicitly.
    Revoked,
}

impl SessionEvent {
    /// Stable type name, as used in the serialized `type` tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::SessionStarted { .. } => "session_started",
            Self::RoleChanged { .. }    => "role_changed",
            Self::StepUpVerified { .. } => "step_up_verified",
            Self::StepUpCleared { .. }  => "step_up_cleared",
        }
    }
}
