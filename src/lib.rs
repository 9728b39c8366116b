pub mod cli;
pub mod config;
pub mod scan;
pub mod transfer;
pub mod upload;
pub mod utils;
