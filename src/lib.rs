// Core infrastructure modules
pub mod core;

// Front-end facing modules
pub mod config;
pub mod filters;
pub mod rpc;

#[cfg(test)]
mod test_utils;
