/// Command module - render passes and command recording

pub mod render_pass;
pub mod command_buffer;

pub use render_pass::*;
pub use command_buffer::*;
