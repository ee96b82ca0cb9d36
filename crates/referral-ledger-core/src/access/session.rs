//! Signed-in session state.

use serde::{Deserialize, Serialize};

use crate::models::{Role, UserProfile};

/// The signed-in user as the access rules see them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub uid: String,
    pub role: Role,
    pub approved: bool,
}

impl Session {
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            uid: profile.uid.clone(),
            role: profile.role.clone(),
            approved: profile.approved,
        }
    }

    pub fn is_superadmin(&self) -> bool {
        self.role == Role::SuperAdmin
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Outcome of looking up a signed-in account's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No profile document for the account
    ProfileMissing,
    /// Administrator awaiting super-admin approval
    PendingApproval,
    /// Allowed in
    Authorized(Session),
    /// Role the app does not know
    Unauthorized,
}

impl SessionState {
    pub fn resolve(profile: Option<&UserProfile>) -> Self {
        let Some(profile) = profile else {
            return SessionState::ProfileMissing;
        };

        match profile.role {
            Role::Admin if !profile.approved => SessionState::PendingApproval,
            Role::Admin | Role::SuperAdmin => {
                SessionState::Authorized(Session::from_profile(profile))
            }
            Role::Unknown(_) => SessionState::Unauthorized,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Authorized(session) => Some(session),
            _ => None,
        }
    }

    /// Message shown instead of the app, if any.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            SessionState::ProfileMissing => Some("User data not found."),
            SessionState::PendingApproval => {
                Some("Your account is pending approval from the Super Admin.")
            }
            SessionState::Unauthorized => {
                Some("Unauthorized access. Please contact administrator.")
            }
            SessionState::Authorized(_) => None,
        }
    }
}
