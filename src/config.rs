//! Configuration layers: parsing and discovery

pub mod discovery;
pub mod layer;

pub use discovery::{CONFIG_FILE_NAMES, ResolvedConfig, load_config_file, resolve_config};
pub use layer::{ConfigLayer, PrettierSetting, RuleLayer, SpaceSetting};
