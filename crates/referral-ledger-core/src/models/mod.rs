//! Domain models for the referral ledger.

mod doctor;
mod record;
mod user;

pub use doctor::*;
pub use record::*;
pub use user::*;
