pub mod cli;
pub mod config;
pub mod export;
pub mod pipeline;
pub mod report;
pub mod stats;
pub mod table;
pub mod views;
