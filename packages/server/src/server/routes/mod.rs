// HTTP routes
pub mod complaints;
pub mod duplicates;
pub mod health;

pub use complaints::*;
pub use duplicates::*;
pub use health::*;
