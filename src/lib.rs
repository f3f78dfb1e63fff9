pub mod analyzers;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod records;
pub mod report;
pub mod sample;
pub mod validator;
