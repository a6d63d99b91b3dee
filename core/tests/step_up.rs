//! Authorization session state machine tests.

use opsdesk_core::{
    event::{SessionEvent, StepUpClearReason},
    permission::{Capability, PermissionTable, Role},
    session::{AuthorizationSession, DEFAULT_ROLE},
};

#[test]
fn session_starts_unverified_with_default_role() {
    let table = PermissionTable::standard();
    let session = AuthorizationSession::new(&table);

    assert_eq!(session.current_role(), DEFAULT_ROLE);
    assert!(!session.is_step_up_verified());
    assert_eq!(session.events().len(), 1);
    assert_eq!(session.events()[0].type_name(), "session_started");
}

/// Whatever the prior state, landing on a role without a step-up
/// requirement leaves the session unverified.
#[test]
fn switching_to_non_step_up_role_always_clears_verification() {
    let table = PermissionTable::standard();

    for from in Role::ALL {
        for to in Role::ALL.into_iter().filter(|r| !table.requires_step_up(*r)) {
            for prior in [false, true] {
                let mut session = AuthorizationSession::with_role(&table, from);
                session.set_step_up_verified(prior);
                session.set_role(to);
                assert!(
                    !session.is_step_up_verified(),
                    "{from} (verified={prior}) -> {to} left the session verified"
                );
            }
        }
    }
}

#[test]
fn switching_to_step_up_role_never_grants_verification() {
    let table = PermissionTable::standard();
    let mut session = AuthorizationSession::with_role(&table, Role::Viewer);

    session.set_role(Role::Admin);
    assert!(session.requires_step_up());
    assert!(!session.is_step_up_verified());
}

/// A verification recorded under a role without the requirement must not
/// carry into a step-up role.
#[test]
fn verification_under_non_step_up_role_is_ignored() {
    let table = PermissionTable::standard();
    let mut session = AuthorizationSession::with_role(&table, Role::Viewer);

    session.set_step_up_verified(true);
    assert!(!session.is_step_up_verified());

    session.set_role(Role::Admin);
    assert!(!session.is_step_up_verified());
    assert!(!session.can_exercise(Capability::ManageRoles));

    let types: Vec<&str> = session.events().iter().map(SessionEvent::type_name).collect();
    assert_eq!(types, vec!["session_started", "role_changed"]);
}

/// Verification carries between two roles that both require it.
#[test]
fn verification_survives_switch_between_step_up_roles() {
    let table = PermissionTable::standard();
    let mut session = AuthorizationSession::with_role(&table, Role::Admin);

    session.set_step_up_verified(true);
    session.set_role(Role::RelationshipManager);
    assert!(session.is_step_up_verified());
}

#[test]
fn step_up_roles_exercise_capabilities_only_once_verified() {
    let table = PermissionTable::standard();
    let mut session = AuthorizationSession::with_role(&table, Role::RelationshipManager);

    assert!(session.has_capability(Capability::ViewSensitiveData));
    assert!(!session.can_exercise(Capability::ViewSensitiveData));

    session.set_step_up_verified(true);
    assert!(session.can_exercise(Capability::ViewSensitiveData));
    assert!(!session.can_exercise(Capability::ManageRoles), "verification never adds grants");
}

#[test]
fn non_step_up_roles_exercise_grants_directly() {
    let table = PermissionTable::standard();
    let session = AuthorizationSession::with_role(&table, Role::Marketing);
    assert!(session.can_exercise(Capability::ExportData));
    assert!(!session.can_exercise(Capability::ChangeConsent));
}

#[test]
fn audit_trail_records_changes_in_order() {
    let table = PermissionTable::standard();
    let mut session = AuthorizationSession::with_role(&table, Role::Admin);

    session.set_step_up_verified(true);
    session.set_role(Role::CustomerService);

    let types: Vec<&str> = session.events().iter().map(SessionEvent::type_name).collect();
    assert_eq!(
        types,
        vec!["session_started", "step_up_verified", "role_changed", "step_up_cleared"]
    );
    match session.events().last() {
        Some(SessionEvent::StepUpCleared { role, reason, .. }) => {
            assert_eq!(*role, Role::CustomerService);
            assert_eq!(*reason, StepUpClearReason::RoleSwitch);
        }
        other => panic!("unexpected last event {other:?}"),
    }
}

#[test]
fn named_lookup_resolves_known_flags() {
    let table = PermissionTable::standard();
    let session = AuthorizationSession::with_role(&table, Role::CustomerService);
    assert!(session.has_capability_named("canChangeConsent"));
    assert!(!session.has_capability_named("export_data"));
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "Unknown capability")]
fn named_lookup_of_unknown_flag_panics_in_debug() {
    let table = PermissionTable::standard();
    let session = AuthorizationSession::new(&table);
    session.has_capability_named("canLaunchRockets");
}
