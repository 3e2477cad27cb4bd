/*!
# cbox graphics - OpenGL backend

OpenGL 4.2+ implementation of the cbox [`GraphicsDevice`](cbox_graphics::gfx::device::GraphicsDevice)
trait, built on `glow`.

The caller owns window and context creation. Once a context is current, load
it into a [`GlDevice`] and hand the device to the core as an
`Arc<dyn GraphicsDevice>`:

```no_run
use std::sync::Arc;
use cbox_graphics::gfx::device::{GraphicsDevice, RenderApi};
use cbox_graphics::gfx::RenderContext;
use cbox_graphics_gl::GlDevice;

# fn run(loader: impl FnMut(&str) -> *const std::os::raw::c_void) -> cbox_graphics::gfx::Result<()> {
let device: Arc<dyn GraphicsDevice> = Arc::new(unsafe { GlDevice::from_loader_function(loader)? });
let _context = RenderContext::builder(RenderApi::OpenGL).build(&device)?;
# Ok(())
# }
```

With the `gl-debug` feature, driver messages from `GL_KHR_debug` are routed to
the cbox logger under the `cbox::gl` source.
*/

mod gl_convert;
mod gl_debug;
mod gl_device;

pub use gl_device::GlDevice;
pub use gl_debug::{debug_stats, DebugStats};
