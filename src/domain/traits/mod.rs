//! Cross-entity persistence ports

mod unit_of_work;

pub use unit_of_work::{UnitOfWork, UnitOfWorkFactory, WorkScope};

#[cfg(test)]
pub use unit_of_work::{MockUnitOfWork, MockUnitOfWorkFactory};
