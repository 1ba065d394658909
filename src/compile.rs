//! Configuration compilation: merge engine, style translation, presets

pub mod block;
pub mod engine;
pub mod presets;
pub mod prettier;
pub mod style;

pub use block::CompiledConfigBlock;
pub use engine::{TsProjectOptions, compile};
pub use prettier::{FormatterSettings, FormatterSettingsCache, resolve_formatter_settings};
pub use style::style_overrides;
