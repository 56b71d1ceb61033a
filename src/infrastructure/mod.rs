//! Infrastructure layer - adapters, handlers and process wiring

pub mod auth;
pub mod handlers;
pub mod logging;
pub mod pipeline;
pub mod seed;
pub mod storage;
pub mod user;
