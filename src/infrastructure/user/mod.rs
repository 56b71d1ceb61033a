//! User infrastructure module
//!
//! Password hashing with Argon2.

mod password;

pub use password::{hash_blocking, verify_blocking, Argon2Hasher, PasswordHasher};
