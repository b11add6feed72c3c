pub mod classifier;
pub mod document;
pub mod element_model;
pub mod render;
