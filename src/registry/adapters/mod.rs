//! Adapter implementations for the health probe port.

mod command;
mod configured;
mod scripted;

pub use command::CommandHealthProbe;
pub use configured::ConfiguredHealthProbe;
pub use scripted::ScriptedHealthProbe;
