//! Command-line front end for the crew tracker.
mod app;
mod cli;
mod config;
mod render;

pub use app::run_app;
