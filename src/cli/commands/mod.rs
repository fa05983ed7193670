pub mod config;
pub mod doctor;
pub mod parse;
pub mod snapshot;
pub mod version;
