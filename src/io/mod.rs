/// Command-line interface and run orchestration
pub mod cli;
/// Generation constants and defaults
pub mod configuration;
/// Error types and result alias
pub mod error;
/// PNG export of layouts
pub mod image;
/// Terminal progress for chunked generation
pub mod progress;
/// JSON settings files
pub mod settings;
