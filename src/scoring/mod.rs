pub mod composite;
pub mod score_model;
