pub mod config;
pub mod daemon;
pub mod history;
pub mod jobs;
pub mod run;
