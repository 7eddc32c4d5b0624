pub mod config;
pub mod db;

pub use config::AppConfig;
