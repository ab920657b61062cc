pub mod cli;
pub mod core;
pub mod gateway;
pub mod workflow;
