//! User domain
//!
//! Entity, role and validation rules for users, plus the repository port
//! the handlers consume.

mod entity;
mod repository;
mod validation;

pub use entity::{normalize_email, User, UserId, UserRole};
pub use repository::UserRepository;
pub use validation::{
    validate_display_name, validate_email, validate_password, UserValidationError,
};

#[cfg(test)]
pub use repository::MockUserRepository;
