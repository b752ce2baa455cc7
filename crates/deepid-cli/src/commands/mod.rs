pub mod config;
pub mod evaluate;
pub mod scan;
pub mod setup;
