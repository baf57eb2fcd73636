pub mod buttons;
pub mod control_model;
pub mod pagination;
