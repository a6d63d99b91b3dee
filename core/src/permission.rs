//! Role-based permission model.
//!
//! RULE: the Role → CapabilityVector table is data, not scattered
//! conditionals. It is built once at startup, never mutated, and
//! passed by reference to whoever needs an authorization decision.
//!
//! The table is total over Role by construction: it is stored as a
//! fixed array indexed by role, and the JSON loader refuses a matrix
//! that leaves any role out.

use crate::{
    config::RoleGrant,
    error::{DeskError, DeskResult},
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

// ── Role ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    RelationshipManager,
    CustomerService,
    Marketing,
    Viewer,
}

impl Role {
    pub const COUNT: usize = 5;

    /// Every role, in table order.
    pub const ALL: [Role; Role::COUNT] = [
        Role::Admin,
        Role::RelationshipManager,
        Role::CustomerService,
        Role::Marketing,
        Role::Viewer,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Admin               => "admin",
            Self::RelationshipManager => "relationship_manager",
            Self::CustomerService     => "customer_service",
            Self::Marketing           => "marketing",
            Self::Viewer              => "viewer",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Admin               => "Admin",
            Self::RelationshipManager => "Relationship Manager",
            Self::CustomerService     => "Customer Service",
            Self::Marketing           => "Marketing",
            Self::Viewer              => "Viewer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Role {
    type Err = DeskError;

    /// Accepts `relationship_manager`, `relationship-manager`,
    /// `Relationship Manager` and `relationshipManager`.
    fn from_str(s: &str) -> DeskResult<Self> {
        let wanted = squash(s);
        Role::ALL
            .into_iter()
            .find(|r| squash(r.name()) == wanted)
            .ok_or_else(|| DeskError::UnknownRole(s.to_string()))
    }
}

// ── Capability ───────────────────────────────────────────────────────────────

/// A single named permission flag. The set is closed: querying a
/// capability that does not exist cannot be expressed in Rust code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    #[serde(alias = "canViewAllCustomers")]
    ViewAllCustomers,
    #[serde(alias = "canEditCustomers")]
    EditCustomers,
    #[serde(alias = "canManageCampaigns")]
    ManageCampaigns,
    #[serde(alias = "canViewSensitiveData")]
    ViewSensitiveData,
    #[serde(alias = "canManageUsers")]
    ManageUsers,
    #[serde(alias = "canViewAuditLog")]
    ViewAuditLog,
    #[serde(alias = "canExportData")]
    ExportData,
    #[serde(alias = "canChangeConsent")]
    ChangeConsent,
    #[serde(alias = "canManageRoles")]
    ManageRoles,
}

impl Capability {
    pub const ALL: [Capability; 9] = [
        Capability::ViewAllCustomers,
        Capability::EditCustomers,
        Capability::ManageCampaigns,
        Capability::ViewSensitiveData,
        Capability::ManageUsers,
        Capability::ViewAuditLog,
        Capability::ExportData,
        Capability::ChangeConsent,
        Capability::ManageRoles,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::ViewAllCustomers  => "view_all_customers",
            Self::EditCustomers     => "edit_customers",
            Self::ManageCampaigns   => "manage_campaigns",
            Self::ViewSensitiveData => "view_sensitive_data",
            Self::ManageUsers       => "manage_users",
            Self::ViewAuditLog      => "view_audit_log",
            Self::ExportData        => "export_data",
            Self::ChangeConsent     => "change_consent",
            Self::ManageRoles       => "manage_roles",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Capability {
    type Err = DeskError;

    /// Accepts the snake_case name or the `can`-prefixed camelCase flag
    /// name used by display layers (`canExportData`).
    fn from_str(s: &str) -> DeskResult<Self> {
        let trimmed = s.strip_prefix("can").filter(|rest| {
            rest.chars().next().is_some_and(|c| c.is_ascii_uppercase())
        });
        let wanted = squash(trimmed.unwrap_or(s));
        Capability::ALL
            .into_iter()
            .find(|c| squash(c.name()) == wanted)
            .ok_or_else(|| DeskError::UnknownCapability(s.to_string()))
    }
}

fn squash(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

// ── CapabilityVector ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CapabilityVector {
    pub view_all_customers:    bool,
    pub edit_customers:        bool,
    pub manage_campaigns:      bool,
    pub view_sensitive_data:   bool,
    pub manage_users:          bool,
    pub view_audit_log:        bool,
    pub export_data:           bool,
    pub change_consent:        bool,
    pub manage_roles:          bool,
    pub requires_step_up_auth: bool,
}

impl CapabilityVector {
    /// A vector granting exactly `caps`.
    pub fn granting(caps: &[Capability], requires_step_up_auth: bool) -> Self {
        let mut v = Self { requires_step_up_auth, ..Self::default() };
        for cap in caps {
            *v.slot_mut(*cap) = true;
        }
        v
    }

    pub fn allows(&self, cap: Capability) -> bool {
        match cap {
            Capability::ViewAllCustomers  => self.view_all_customers,
            Capability::EditCustomers     => self.edit_customers,
            Capability::ManageCampaigns   => self.manage_campaigns,
            Capability::ViewSensitiveData => self.view_sensitive_data,
            Capability::ManageUsers       => self.manage_users,
            Capability::ViewAuditLog      => self.view_audit_log,
            Capability::ExportData        => self.export_data,
            Capability::ChangeConsent     => self.change_consent,
            Capability::ManageRoles       => self.manage_roles,
        }
    }

    fn slot_mut(&mut self, cap: Capability) -> &mut bool {
        match cap {
            Capability::ViewAllCustomers  => &mut self.view_all_customers,
            Capability::EditCustomers     => &mut self.edit_customers,
            Capability::ManageCampaigns   => &mut self.manage_campaigns,
            Capability::ViewSensitiveData => &mut self.view_sensitive_data,
            Capability::ManageUsers       => &mut self.manage_users,
            Capability::ViewAuditLog      => &mut self.view_audit_log,
            Capability::ExportData        => &mut self.export_data,
            Capability::ChangeConsent     => &mut self.change_consent,
            Capability::ManageRoles       => &mut self.manage_roles,
        }
    }

    /// Granted capabilities in `Capability::ALL` order.
    pub fn granted(&self) -> Vec<Capability> {
        Capability::ALL.into_iter().filter(|c| self.allows(*c)).collect()
    }
}

// ── PermissionTable ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionTable {
    vectors: [CapabilityVector; Role::COUNT],
}

impl PermissionTable {
    /// The reference matrix.
    ///
    /// Marketing never gets `ChangeConsent`: the team that runs
    /// campaigns must not be able to flip the consent they target.
    pub fn standard() -> Self {
        use Capability::*;

        let mut vectors = [CapabilityVector::default(); Role::COUNT];
        vectors[Role::Admin.index()] = CapabilityVector::granting(&Capability::ALL, true);
        vectors[Role::RelationshipManager.index()] = CapabilityVector::granting(
            &[ViewAllCustomers, EditCustomers, ViewSensitiveData, ExportData, ChangeConsent],
            true,
        );
        vectors[Role::CustomerService.index()] = CapabilityVector::granting(
            &[ViewAllCustomers, EditCustomers, ChangeConsent],
            false,
        );
        vectors[Role::Marketing.index()] = CapabilityVector::granting(
            &[ViewAllCustomers, ManageCampaigns, ExportData],
            false,
        );
        vectors[Role::Viewer.index()] = CapabilityVector::granting(&[ViewAllCustomers], false);

        Self { vectors }
    }

    /// Build from a loaded role matrix. Every role must appear exactly once.
    pub fn from_grants(grants: &[RoleGrant]) -> DeskResult<Self> {
        let mut slots: [Option<CapabilityVector>; Role::COUNT] = [None; Role::COUNT];

        for grant in grants {
            let slot = &mut slots[grant.role.index()];
            if slot.is_some() {
                return Err(DeskError::InvalidConfig(format!(
                    "role '{}' appears more than once in the role matrix",
                    grant.role.name()
                )));
            }
            *slot = Some(CapabilityVector::granting(
                &grant.capabilities,
                grant.requires_step_up_auth,
            ));
        }

        let missing: Vec<String> = Role::ALL
            .into_iter()
            .filter(|r| slots[r.index()].is_none())
            .map(|r| r.name().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(DeskError::IncompleteRoleMatrix { missing });
        }

        let mut vectors = [CapabilityVector::default(); Role::COUNT];
        for role in Role::ALL {
            if let Some(v) = slots[role.index()] {
                vectors[role.index()] = v;
            }
        }
        Ok(Self { vectors })
    }

    pub fn vector(&self, role: Role) -> &CapabilityVector {
        &self.vectors[role.index()]
    }

    pub fn allows(&self, role: Role, cap: Capability) -> bool {
        self.vector(role).allows(cap)
    }

    pub fn requires_step_up(&self, role: Role) -> bool {
        self.vector(role).requires_step_up_auth
    }

    /// Roles granted `cap`, in `Role::ALL` order.
    pub fn roles_with(&self, cap: Capability) -> Vec<Role> {
        Role::ALL.into_iter().filter(|r| self.allows(*r, cap)).collect()
    }
}

impl Default for PermissionTable {
    fn default() -> Self { Self::standard() }
}
