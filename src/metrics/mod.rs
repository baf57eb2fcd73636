pub mod calculators;
pub mod color;
pub mod script;
