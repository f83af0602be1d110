// Business domains
pub mod complaints;
