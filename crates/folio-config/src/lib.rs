pub mod config;
pub mod paths;

pub use config::AppConfig;
pub use paths::resolve_data_dir;
