pub mod classify;
pub mod config;
pub mod load;
pub mod profile;
pub mod query;
pub mod repair;
pub mod report;
pub mod tables;
