pub mod artifacts;
pub mod crawler;
pub mod error;
