pub mod classifier;
pub mod element_model;
pub mod extractor;
pub mod lineage;
pub mod visibility;
