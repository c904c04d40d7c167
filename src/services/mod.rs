//! External collaborators consumed by the core

pub mod image_store;

pub use image_store::{ImageStore, LocalImageStore};
