pub mod config;
pub mod dump;
pub mod logger;
