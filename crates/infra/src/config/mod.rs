//! Console configuration: environment variables first, then a config file
//! next to the working directory or the executable.

pub mod loader;

pub use loader::{load, load_from_env, load_from_file, probe_config_paths, validate};
