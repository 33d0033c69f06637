pub mod aggregate;
pub mod apaleo;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod report;
pub mod revenue;
