//! Domain layer - Core business logic and entities

pub mod error;
pub mod outcome;
pub mod pipeline;
pub mod team;
pub mod traits;
pub mod user;

pub use error::DomainError;
pub use outcome::{Outcome, EMAIL_IN_USE, INVALID_CREDENTIALS, TEAM_NOT_FOUND, USER_NOT_FOUND};
pub use pipeline::{
    Dispatcher, DispatcherBuilder, Request, RequestHandler, ValidationViolation, Validator,
};
pub use team::{Team, TeamId, TeamRepository};
pub use traits::{UnitOfWork, UnitOfWorkFactory, WorkScope};
pub use user::{User, UserId, UserRepository, UserRole};
