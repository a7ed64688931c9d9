#[macro_use]
extern crate lazy_static;

pub mod address;
pub mod chain;
pub mod config;
pub mod constants;
pub mod errors;
pub mod infra;
pub mod revert;
pub mod runner;
pub mod units;
