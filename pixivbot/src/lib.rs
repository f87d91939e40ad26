// ABOUTME: Library exports for the pixivbot relay pipeline and its configuration
// ABOUTME: Makes internal modules available to integration tests and benchmarks

pub mod config;
pub mod constants;
pub mod error;
pub mod relay;

pub use error::RelayError;
