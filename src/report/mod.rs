pub mod console;
pub mod result_model;
pub mod sink;
