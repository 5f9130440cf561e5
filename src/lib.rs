pub mod cli;
pub mod cms;
pub mod config;
pub mod error;
pub mod report;
pub mod scanner;
