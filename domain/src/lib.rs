//! Identity resolution for incoming connections.
//!
//! The relay does not issue credentials. It only checks bearer tokens minted
//! by the upstream application and extracts the user identity from them.

pub mod error;
pub mod jwt;

pub use jwt::{JwtVerifier, TokenVerifier};
