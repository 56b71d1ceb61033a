//! Request pipeline
//!
//! Generic command/query dispatch: one handler per request type, a pluggable
//! validation stage in front of it, and a uniform [`Outcome`](crate::domain::Outcome)
//! coming back.

mod dispatcher;
mod request;
mod validation;

pub use dispatcher::{Dispatcher, DispatcherBuilder};
pub use request::{ensure_not_cancelled, Request, RequestHandler};
pub use validation::{
    join_violations, ValidationStage, ValidationViolation, Validator, VIOLATION_SEPARATOR,
};
