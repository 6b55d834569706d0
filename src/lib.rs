pub mod config;
pub mod executor;
pub mod health;
pub mod pool;
pub mod report;
pub mod request;
pub mod runner;
pub mod stats;
pub mod util;
