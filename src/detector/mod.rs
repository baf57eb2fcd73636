pub mod visual;
