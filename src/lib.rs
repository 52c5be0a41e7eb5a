pub mod bot;
pub mod commands;
pub mod completion;
pub mod config;
pub mod error;
pub mod relay;

pub use bot::run;
