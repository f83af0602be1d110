//! Kernel module - server infrastructure and dependencies.

pub mod ai;
pub mod deps;
pub mod store;
pub mod test_dependencies;
pub mod traits;

pub use ai::GatewayAI;
pub use deps::ServerDeps;
pub use store::PostgresComplaintStore;
pub use test_dependencies::{InMemoryComplaintStore, MockAI, TestDependencies};
pub use traits::*;
