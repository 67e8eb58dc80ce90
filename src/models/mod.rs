pub mod item;
pub mod loaders;
pub mod locator;
pub mod record;

pub use item::{Item, ModelSet};
pub use loaders::{load_items, load_locator_registry, load_model_locators, load_model_set};
pub use locator::{Locator, LocatorRegistry, ModelLocators, PageLocators, Strategy};
pub use record::{ItemResult, ItemResultSet, RawPanelText, RecordMap, ResultRecord};
