pub mod binding;
pub mod registry;
