pub mod cli;
pub mod config;
pub mod logging;
pub mod plotter;
pub mod policy;
pub mod run;
pub mod series;
pub mod stats;
