//! Roles, capabilities, and the authenticated actor.

use serde::{Deserialize, Serialize};
use tesoreria_shared::types::{ChurchId, UserId};
use thiserror::Error;

/// Authorization errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The role string at the boundary did not match any known role.
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// The actor is not scoped to the church the operation targets.
    #[error("Actor is not scoped to church {0}")]
    WrongChurch(ChurchId),

    /// The actor's role cannot approve monthly reports.
    #[error("Role {0} cannot approve monthly reports")]
    CannotApproveReport(Role),

    /// The actor's role cannot approve fund events.
    #[error("Role {0} cannot approve fund events")]
    CannotApproveEvent(Role),

    /// The actor's role cannot create or submit fund events.
    #[error("Role {0} cannot manage fund events")]
    CannotManageEvent(Role),

    /// Only the creator of a fund event (or a national-scope actor) may
    /// submit its budget.
    #[error("Actor may only submit fund events they created")]
    NotEventCreator,

    /// A church-scoped actor may never approve its own church's report.
    #[error("Actor may not approve a report from their own church")]
    SelfApproval,

    /// The creator of a fund event may not approve it.
    #[error("Actor may not approve a fund event they created")]
    SelfEventApproval,
}

/// Closed set of roles known to the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access to every operation.
    Admin,
    /// National treasurer: approves reports and events, closes ledgers.
    NationalTreasurer,
    /// Church pastor: creates and submits their church's reports.
    ChurchPastor,
    /// Fund director: plans fund events and records actuals.
    FundDirector,
}

/// Scope of a role's authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// National-level authority across all churches and funds.
    National,
    /// Authority limited to a single church.
    Church,
    /// Authority limited to fund planning.
    Fund,
}

/// What a role is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// May approve submitted monthly reports.
    pub can_approve_report: bool,
    /// May approve submitted fund events.
    pub can_approve_event: bool,
    /// May create and submit fund event budgets.
    pub can_manage_event: bool,
    /// The scope of the role's authority.
    pub scope: Scope,
}

impl Role {
    /// Returns the capability table entry for this role.
    #[must_use]
    pub const fn capabilities(self) -> Capabilities {
        match self {
            Self::Admin | Self::NationalTreasurer => Capabilities {
                can_approve_report: true,
                can_approve_event: true,
                can_manage_event: true,
                scope: Scope::National,
            },
            Self::ChurchPastor => Capabilities {
                can_approve_report: false,
                can_approve_event: false,
                can_manage_event: false,
                scope: Scope::Church,
            },
            Self::FundDirector => Capabilities {
                can_approve_report: false,
                can_approve_event: false,
                can_manage_event: true,
                scope: Scope::Fund,
            },
        }
    }

    /// Parses a role from its stored string form.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UnknownRole`] for anything outside the closed
    /// set. Callers must surface this; there is no low-privilege default.
    pub fn parse(s: &str) -> Result<Self, AuthError> {
        match s {
            "admin" => Ok(Self::Admin),
            "national_treasurer" => Ok(Self::NationalTreasurer),
            "church_pastor" => Ok(Self::ChurchPastor),
            "fund_director" => Ok(Self::FundDirector),
            other => Err(AuthError::UnknownRole(other.to_string())),
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::NationalTreasurer => "national_treasurer",
            Self::ChurchPastor => "church_pastor",
            Self::FundDirector => "fund_director",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An authenticated actor, as handed in by the identity collaborator.
///
/// The core trusts this context for every role-gating decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The actor's user ID.
    pub user_id: UserId,
    /// The actor's role. Required; never defaulted.
    pub role: Role,
    /// The church the actor belongs to, for church-scoped roles.
    pub church_id: Option<ChurchId>,
}

impl Actor {
    /// Checks that the actor may act on behalf of the given church.
    ///
    /// National-scope roles may act for any church; church-scope roles only
    /// for their own.
    pub fn authorize_church(&self, church_id: ChurchId) -> Result<(), AuthError> {
        match self.role.capabilities().scope {
            Scope::National => Ok(()),
            Scope::Church | Scope::Fund => {
                if self.church_id == Some(church_id) {
                    Ok(())
                } else {
                    Err(AuthError::WrongChurch(church_id))
                }
            }
        }
    }

    /// Checks that the actor may approve a report belonging to `church_id`.
    ///
    /// Requires the report-approval capability, and rejects approval by an
    /// actor attached to the submitting church, whatever their role.
    pub fn authorize_report_approval(&self, church_id: ChurchId) -> Result<(), AuthError> {
        if !self.role.capabilities().can_approve_report {
            return Err(AuthError::CannotApproveReport(self.role));
        }
        if self.church_id == Some(church_id) {
            return Err(AuthError::SelfApproval);
        }
        Ok(())
    }

    /// Checks that the actor may create fund event budgets.
    pub fn authorize_event_management(&self) -> Result<(), AuthError> {
        if self.role.capabilities().can_manage_event {
            Ok(())
        } else {
            Err(AuthError::CannotManageEvent(self.role))
        }
    }

    /// Checks that the actor may submit the event created by `created_by`.
    ///
    /// National-scope actors may submit any draft; everyone else only
    /// their own.
    pub fn authorize_event_submission(&self, created_by: UserId) -> Result<(), AuthError> {
        self.authorize_event_management()?;
        if self.role.capabilities().scope != Scope::National && self.user_id != created_by {
            return Err(AuthError::NotEventCreator);
        }
        Ok(())
    }

    /// Checks that the actor may approve a fund event created by `created_by`.
    pub fn authorize_event_approval(&self, created_by: UserId) -> Result<(), AuthError> {
        if !self.role.capabilities().can_approve_event {
            return Err(AuthError::CannotApproveEvent(self.role));
        }
        if self.user_id == created_by {
            return Err(AuthError::SelfEventApproval);
        }
        Ok(())
    }
}
