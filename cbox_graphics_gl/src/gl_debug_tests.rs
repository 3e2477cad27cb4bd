use super::*;
use cbox_graphics::gfx::log::{LogEntry, Logger};
use serial_test::serial;
use std::sync::{Arc, Mutex};

struct CaptureLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl Logger for CaptureLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

fn capture() -> Arc<Mutex<Vec<LogEntry>>> {
    let entries = Arc::new(Mutex::new(Vec::new()));
    Graphics::set_logger(CaptureLogger { entries: entries.clone() });
    entries
}

#[test]
#[serial]
fn test_forwarded_message_is_logged_with_mapped_severity() {
    let entries = capture();

    forward_message(glow::DEBUG_SOURCE_API, glow::DEBUG_TYPE_ERROR, 1281, glow::DEBUG_SEVERITY_HIGH, "invalid value");

    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].severity, LogSeverity::Error);
        assert_eq!(captured[0].source, "cbox::gl");
        assert_eq!(captured[0].message, "OpenGL ERROR [1281]: invalid value");
    }

    Graphics::reset_logger();
}

#[test]
#[serial]
fn test_messages_are_counted_per_severity() {
    let _entries = capture();
    DEBUG_STATS.reset();

    forward_message(0, glow::DEBUG_TYPE_PERFORMANCE, 1, glow::DEBUG_SEVERITY_MEDIUM, "slow path");
    forward_message(0, glow::DEBUG_TYPE_OTHER, 2, glow::DEBUG_SEVERITY_NOTIFICATION, "buffer info");
    forward_message(0, glow::DEBUG_TYPE_OTHER, 3, glow::DEBUG_SEVERITY_NOTIFICATION, "buffer info");

    let stats = debug_stats();
    assert_eq!(stats, DebugStats { errors: 0, warnings: 1, info: 0, debug: 2 });
    assert_eq!(stats.total(), 3);

    Graphics::reset_logger();
}
