//! Team authorization decision table
//!
//! Decisions are looked up by (principal kind, resource kind, action) and
//! resolved against the principal's membership role in the team. A missing
//! entry denies.

use serde::{Deserialize, Serialize};

use crate::domain::team::TeamRole;

/// Who is asking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrincipalKind {
    /// Sees and manages every team
    Administrator,
    /// Ordinary user, scoped by memberships
    Member,
}

/// What is being accessed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Team,
    TeamMembers,
    TeamNamespaces,
}

/// What the principal wants to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeamAction {
    View,
    Create,
    ManageMembers,
    /// Make someone other than oneself the owner of a new team
    AssignOwner,
}

/// Who may create teams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TeamCreationPolicy {
    /// Any authenticated user
    #[default]
    AnyUser,
    /// Administrators only
    AdminsOnly,
}

#[derive(Debug, Clone, Copy)]
enum Rule {
    Allow,
    AnyMembership,
    MemberManager,
    CreationPolicy,
}

impl Rule {
    fn permits(self, role: Option<TeamRole>, policy: TeamCreationPolicy) -> bool {
        match self {
            Self::Allow => true,
            Self::AnyMembership => role.is_some(),
            Self::MemberManager => role.is_some_and(|r| r.can_manage_members()),
            Self::CreationPolicy => policy == TeamCreationPolicy::AnyUser,
        }
    }
}

use PrincipalKind::{Administrator, Member};
use ResourceKind::{Team, TeamMembers, TeamNamespaces};
use TeamAction::{AssignOwner, Create, ManageMembers, View};

const RULES: &[(PrincipalKind, ResourceKind, TeamAction, Rule)] = &[
    (Administrator, Team, View, Rule::Allow),
    (Administrator, Team, Create, Rule::Allow),
    (Administrator, Team, AssignOwner, Rule::Allow),
    (Administrator, TeamMembers, View, Rule::Allow),
    (Administrator, TeamMembers, ManageMembers, Rule::Allow),
    (Administrator, TeamNamespaces, View, Rule::Allow),
    (Member, Team, View, Rule::AnyMembership),
    (Member, Team, Create, Rule::CreationPolicy),
    (Member, TeamMembers, View, Rule::AnyMembership),
    (Member, TeamMembers, ManageMembers, Rule::MemberManager),
    (Member, TeamNamespaces, View, Rule::AnyMembership),
];

/// Evaluate one authorization decision
///
/// `role` is the principal's membership role in the team concerned, `None`
/// when not a member or when the action is not about an existing team.
pub fn evaluate(
    kind: PrincipalKind,
    resource: ResourceKind,
    action: TeamAction,
    role: Option<TeamRole>,
    policy: TeamCreationPolicy,
) -> bool {
    RULES
        .iter()
        .find(|(k, r, a, _)| *k == kind && *r == resource && *a == action)
        .is_some_and(|(_, _, _, rule)| rule.permits(role, policy))
}
