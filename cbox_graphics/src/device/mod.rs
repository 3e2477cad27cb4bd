/// Device module - backend trait, native handles and frame-state types

pub mod device;
pub(crate) mod mock_device;

pub use device::*;

#[cfg(test)]
pub(crate) use mock_device::MockDevice;
