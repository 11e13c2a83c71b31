pub mod adapters;
pub mod bootstrap;
pub mod common;
pub mod config;
pub mod database;
pub mod dependencies;
pub mod domain;
pub mod routes;
pub mod services;

#[cfg(test)]
mod test_support;
