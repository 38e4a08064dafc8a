pub mod bus;
pub mod error;
pub mod modules;
pub mod resource;

pub use bus::{ModuleBus, SharedModuleBus};
pub use error::{FluxError, Result};

pub fn init() {
    tracing::info!("Core library initialized");
}
