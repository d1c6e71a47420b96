pub mod bridge;
pub mod module;

pub use bridge::{ApiBridge, LogLevel};
pub use module::Module;
