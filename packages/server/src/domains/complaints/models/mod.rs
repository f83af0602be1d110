pub mod complaint;
pub mod profile;

pub use complaint::*;
pub use profile::*;
