//! Domain models for the farmai system.

mod account;
mod condition;
mod diagnosis;
mod history;
mod stock;
mod subject;

pub use account::*;
pub use condition::*;
pub use diagnosis::*;
pub use history::*;
pub use stock::*;
pub use subject::*;
