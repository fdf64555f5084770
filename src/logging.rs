use std::fmt::Write as _;
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

/// Items printed per trace line before wrapping.
const TRACE_LINE_ITEMS: u32 = 50;

pub fn dev_log(message: &str) {
    if !cfg!(debug_assertions) {
        return;
    }

    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let current = thread::current();
    let thread_name = current.name().unwrap_or("unnamed");
    println!("[{ts}ms][{thread_name}] {message}");
}

#[macro_export]
macro_rules! log_dev {
    ($($arg:tt)*) => {
        if cfg!(debug_assertions) {
            $crate::logging::dev_log(&format!($($arg)*));
        }
    };
}

/// Scheduler trace: one character per task step or device payload.
///
/// Disabled tracers record nothing. Output is buffered so the driver decides
/// where it goes; a newline starts every 50 items.
#[derive(Debug, Default)]
pub struct Tracer {
    enabled: bool,
    layout: u32,
    buf: String,
}

impl Tracer {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            layout: 0,
            buf: String::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn trace(&mut self, item: impl std::fmt::Display) {
        if !self.enabled {
            return;
        }
        if self.layout == 0 {
            self.buf.push('\n');
            self.layout = TRACE_LINE_ITEMS;
        }
        self.layout -= 1;
        let _ = write!(self.buf, "{item}");
    }

    /// Hand back everything traced so far and start a fresh buffer.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.buf)
    }
}
