pub mod apis;
pub mod config;
pub mod constants;
pub mod date_parse;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod storage;
pub mod tasks;
pub mod types;
