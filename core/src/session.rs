//! Authorization session - the current actor's role and step-up state.
//!
//! State machine, per session:
//!
//!   NotVerified ──set_step_up_verified(true)──▶ Verified
//!   Verified ──set_role(r) where r has no step-up requirement──▶ NotVerified
//!   Verified ──set_step_up_verified(false)──▶ NotVerified
//!
//! Switching to a step-up role never grants verification by itself, and
//! a role without a step-up requirement never holds it: marking such a
//! session verified is ignored.
//! Verification itself (MFA etc.) happens elsewhere; this type only
//! records the outcome.
//!
//! Single writer: all mutators take `&mut self`. Share a session across
//! threads only behind your own lock.

use crate::{
    event::{SessionEvent, StepUpClearReason},
    permission::{Capability, CapabilityVector, PermissionTable, Role},
};
use chrono::Utc;

/// Role a session starts with when the caller does not pick one.
pub const DEFAULT_ROLE: Role = Role::Viewer;

pub struct AuthorizationSession<'t> {
    table:             &'t PermissionTable,
    role:              Role,
    step_up_verified:  bool,
    events:            Vec<SessionEvent>,
}

impl<'t> AuthorizationSession<'t> {
    pub fn new(table: &'t PermissionTable) -> Self {
        Self::with_role(table, DEFAULT_ROLE)
    }

    pub fn with_role(table: &'t PermissionTable, role: Role) -> Self {
        Self {
            table,
            role,
            step_up_verified: false,
            events: vec![SessionEvent::SessionStarted { at: Utc::now(), role }],
        }
    }

    pub fn current_role(&self) -> Role {
        self.role
    }

    pub fn set_role(&mut self, role: Role) {
        let from = self.role;
        self.role = role;
        self.events.push(SessionEvent::RoleChanged { at: Utc::now(), from, to: role });
        log::info!("session role {} -> {}", from.name(), role.name());

        if !self.table.requires_step_up(role) && self.step_up_verified {
            self.step_up_verified = false;
            self.events.push(SessionEvent::StepUpCleared {
                at: Utc::now(),
                role,
                reason: StepUpClearReason::RoleSwitch,
            });
            log::debug!("step-up verification cleared on switch to {}", role.name());
        }
    }

    pub fn has_capability(&self, cap: Capability) -> bool {
        self.table.allows(self.role, cap)
    }

    /// Lookup by name, for callers holding a string flag.
    ///
    /// An unknown name is a caller bug: it panics in debug builds and
    /// is logged and denied in release builds.
    pub fn has_capability_named(&self, name: &str) -> bool {
        match name.parse::<Capability>() {
            Ok(cap) => self.has_capability(cap),
            Err(e) => {
                debug_assert!(false, "{e}");
                log::error!("{e}; denying");
                false
            }
        }
    }

    /// Granted AND, for step-up roles, verified.
    pub fn can_exercise(&self, cap: Capability) -> bool {
        self.has_capability(cap) && (!self.requires_step_up() || self.step_up_verified)
    }

    pub fn requires_step_up(&self) -> bool {
        self.table.requires_step_up(self.role)
    }

    pub fn capabilities(&self) -> &CapabilityVector {
        self.table.vector(self.role)
    }

    pub fn is_step_up_verified(&self) -> bool {
        self.step_up_verified
    }

    pub fn set_step_up_verified(&mut self, verified: bool) {
        if verified == self.step_up_verified {
            return;
        }
        if verified && !self.requires_step_up() {
            log::warn!(
                "ignoring step-up verification for {}; role does not carry it",
                self.role.name()
            );
            return;
        }
        self.step_up_verified = verified;
        let at = Utc::now();
        let role = self.role;
        self.events.push(if verified {
            SessionEvent::StepUpVerified { at, role }
        } else {
            SessionEvent::StepUpCleared { at, role, reason: StepUpClearReason::Revoked }
        });
    }

    /// Audit trail, oldest first.
    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }
}
