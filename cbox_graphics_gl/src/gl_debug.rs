//! GL_KHR_debug output - forwards driver messages to the cbox logger
//!
//! The callback is installed by [`GlDevice::new`](crate::GlDevice::new) when the
//! `gl-debug` feature is enabled and the context supports debug output. Messages
//! are counted per severity so a run can end with a short report.

use std::sync::atomic::{AtomicU32, Ordering};
use cbox_graphics::gfx::Graphics;
use cbox_graphics::gfx::log::LogSeverity;
use glow::HasContext;
use crate::gl_convert::{debug_severity, debug_type_name};

/// Global message counters (thread-safe atomics)
static DEBUG_STATS: DebugStatsTracker = DebugStatsTracker::new();

/// Driver message counts since the callback was installed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugStats {
    pub errors: u32,
    pub warnings: u32,
    pub info: u32,
    pub debug: u32,
}

impl DebugStats {
    /// Total message count
    pub fn total(&self) -> u32 {
        self.errors + self.warnings + self.info + self.debug
    }
}

struct DebugStatsTracker {
    errors: AtomicU32,
    warnings: AtomicU32,
    info: AtomicU32,
    debug: AtomicU32,
}

impl DebugStatsTracker {
    const fn new() -> Self {
        Self {
            errors: AtomicU32::new(0),
            warnings: AtomicU32::new(0),
            info: AtomicU32::new(0),
            debug: AtomicU32::new(0),
        }
    }

    fn record(&self, severity: LogSeverity) {
        let counter = match severity {
            LogSeverity::Error => &self.errors,
            LogSeverity::Warn => &self.warnings,
            LogSeverity::Info => &self.info,
            LogSeverity::Debug | LogSeverity::Trace => &self.debug,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> DebugStats {
        DebugStats {
            errors: self.errors.load(Ordering::Relaxed),
            warnings: self.warnings.load(Ordering::Relaxed),
            info: self.info.load(Ordering::Relaxed),
            debug: self.debug.load(Ordering::Relaxed),
        }
    }

    fn reset(&self) {
        self.errors.store(0, Ordering::Relaxed);
        self.warnings.store(0, Ordering::Relaxed);
        self.info.store(0, Ordering::Relaxed);
        self.debug.store(0, Ordering::Relaxed);
    }
}

/// Current driver message counts
pub fn debug_stats() -> DebugStats {
    DEBUG_STATS.snapshot()
}

/// Install the debug callback on `gl`
///
/// Returns false when the context has no debug output. Resets the counters.
///
/// # Safety
///
/// `gl` must be current on the calling thread.
pub(crate) unsafe fn install(gl: &mut glow::Context) -> bool {
    if !gl.supports_debug() {
        return false;
    }

    DEBUG_STATS.reset();
    gl.enable(glow::DEBUG_OUTPUT);
    // Messages arrive on the thread that issued the failing call
    gl.enable(glow::DEBUG_OUTPUT_SYNCHRONOUS);
    gl.debug_message_callback(forward_message);
    true
}

/// Callback body: count the message and log it under `cbox::gl`
fn forward_message(_source: u32, ty: u32, id: u32, severity: u32, message: &str) {
    let severity = debug_severity(severity);
    DEBUG_STATS.record(severity);
    Graphics::log(
        severity,
        "cbox::gl",
        format!("OpenGL {} [{}]: {}", debug_type_name(ty), id, message),
    );
}

#[cfg(test)]
#[path = "gl_debug_tests.rs"]
mod tests;
