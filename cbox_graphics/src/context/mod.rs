/// Context module - the owned render context and its configuration

pub mod context;

pub use context::*;
