//! Authentication infrastructure module
//!
//! Signed-token issuance and verification for logged-in users.

mod jwt;

pub use jwt::{JwtTokenIssuer, TokenClaims, TokenConfig, TokenIssuer};
