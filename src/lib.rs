// src/lib.rs
pub mod banner;
pub mod config;
pub mod errors;
pub mod jobs;
pub mod report;
pub mod runner;
pub mod stats;
pub mod submitter;
pub mod transport;
