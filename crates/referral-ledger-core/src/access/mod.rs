//! Who may see and change what.
//!
//! Everything here is a pure function of an explicit [`Session`]; the host
//! resolves the session once from the stored profile and passes it along.

mod auth;
mod rules;
mod session;

pub use auth::*;
pub use rules::*;
pub use session::*;
