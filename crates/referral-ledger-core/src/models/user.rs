//! Administrator account models.

use serde::{Deserialize, Serialize};

/// Account role as stored on the user profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Full access: roster, approvals, analytics, exports
    SuperAdmin,
    /// Same-day record entry
    Admin,
    /// Any other stored value
    Unknown(String),
}

impl Role {
    /// Parse a stored role string.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "superadmin" => Role::SuperAdmin,
            "admin" => Role::Admin,
            other => Role::Unknown(other.to_string()),
        }
    }

    /// Stored form of the role.
    pub fn as_str(&self) -> &str {
        match self {
            Role::SuperAdmin => "superadmin",
            Role::Admin => "admin",
            Role::Unknown(raw) => raw,
        }
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        Role::parse(&raw)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

/// A user profile kept alongside the auth provider's account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    /// Auth provider user ID
    pub uid: String,
    /// Login email
    pub email: String,
    /// Account role
    pub role: Role,
    /// Whether a super-admin has approved the account
    #[serde(default)]
    pub approved: bool,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: String,
}

impl UserProfile {
    /// A freshly signed-up administrator awaiting approval.
    pub fn pending_admin(uid: String, email: String) -> Self {
        Self {
            uid,
            email,
            role: Role::Admin,
            approved: false,
            created_at: super::timestamp_now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for raw in ["superadmin", "admin", "viewer"] {
            assert_eq!(Role::parse(raw).as_str(), raw);
        }
        assert_eq!(Role::parse("viewer"), Role::Unknown("viewer".into()));
    }

    #[test]
    fn test_profile_from_document() {
        let profile: UserProfile = serde_json::from_str(
            r#"{"uid":"u1","email":"a@clinic.pk","role":"superadmin","approved":true}"#,
        )
        .unwrap();
        assert_eq!(profile.role, Role::SuperAdmin);
        assert!(profile.approved);

        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains(r#""role":"superadmin""#));
    }

    #[test]
    fn test_pending_admin() {
        let profile = UserProfile::pending_admin("u2".into(), "b@clinic.pk".into());
        assert_eq!(profile.role, Role::Admin);
        assert!(!profile.approved);
    }
}
