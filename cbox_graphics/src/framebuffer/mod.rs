/// Framebuffer module - render targets and their attachments

pub mod attachment;
pub mod framebuffer;

pub use attachment::*;
pub use framebuffer::*;
