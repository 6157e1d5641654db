pub mod balance;
pub mod batch;
pub mod deploy;
pub mod registry;
