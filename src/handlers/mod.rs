// Handler modules
pub mod lint;

pub use lint::{LintOptions, handle_detect, handle_lint, handle_schemas, load_config};
