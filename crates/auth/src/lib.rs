//! `freshcart-auth`: session identity boundary.
//!
//! Answers one question for the rest of the system: "who, if anyone, is acting?"
//! Token issuance and passwords live elsewhere; this crate only verifies.

pub mod claims;
pub mod principal;
pub mod validator;

pub use claims::{SessionClaims, SessionError, validate_claims};
pub use principal::ActingUser;
pub use validator::{Hs256SessionValidator, SessionValidator};
