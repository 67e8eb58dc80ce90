pub mod registry_loader;

pub use registry_loader::{load_items, load_locator_registry, load_model_locators, load_model_set};
