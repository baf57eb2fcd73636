pub mod aggregator;
pub mod style_group;
