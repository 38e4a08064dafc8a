pub mod global;
pub mod loader;

pub use global::{RelayConfig, RouterConfig, ServerConfig, SystemConfig};
pub use loader::ConfigLoader;
