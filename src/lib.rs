pub mod config;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod ratings;
pub mod search;
pub mod store;
pub mod views;
