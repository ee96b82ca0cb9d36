//! User-facing messages for auth provider failures.

use serde::{Deserialize, Serialize};

/// Screen on which an auth call failed. Wording differs per screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthFlow {
    Login,
    Signup,
    PasswordReset,
    SetPassword,
}

pub const MIN_PASSWORD_LEN: usize = 6;

/// Translate an auth provider error code such as `auth/invalid-email`.
pub fn auth_error_message(flow: AuthFlow, code: &str) -> &'static str {
    match (flow, code) {
        (_, "auth/invalid-email") => "Invalid email address.",
        (AuthFlow::Login, "auth/wrong-password" | "auth/user-not-found" | "auth/invalid-credential") => {
            "Invalid email or password."
        }
        (_, "auth/too-many-requests") => "Too many attempts. Please try again later.",
        (AuthFlow::Signup, "auth/email-already-in-use") => "This email is already registered.",
        (AuthFlow::Signup, "auth/weak-password") => {
            "Password is too weak. It must be at least 6 characters."
        }
        (AuthFlow::PasswordReset, "auth/user-not-found") => {
            "No account found with this email address."
        }
        (AuthFlow::SetPassword, "auth/expired-action-code") => {
            "The password reset link has expired."
        }
        (AuthFlow::SetPassword, "auth/invalid-action-code") => {
            "The password reset link is invalid."
        }
        (AuthFlow::Login, _) => "Failed to log in. Please try again.",
        (AuthFlow::Signup, _) => "Failed to create account. Please try again.",
        (AuthFlow::PasswordReset, _) => "Failed to send reset email. Please try again later.",
        (AuthFlow::SetPassword, _) => "Failed to reset password. Please try again.",
    }
}

/// Check a new password and its confirmation before calling the provider.
pub fn check_new_password(password: &str, confirm: &str) -> Result<(), &'static str> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 6 characters.");
    }
    if password != confirm {
        return Err("Passwords do not match.");
    }
    Ok(())
}
