pub mod bind;
pub mod check;
pub mod count;
pub mod param;
pub mod project;
pub mod query_loader;
pub mod run_common;

#[cfg(test)]
mod check_tests;
