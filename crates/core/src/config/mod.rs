//! Settings resolution and settings file loading

mod loader;
mod settings;

pub use loader::{parse_settings, Config, SettingsFile, ShopifySection};
pub use settings::*;
