use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use tinysh::console::Console;

/// In-memory writer whose contents stay readable after the `Console`
/// that owns a clone of it has been moved into a session.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        let guard = self.bytes.lock().unwrap();
        String::from_utf8_lossy(&guard).into_owned()
    }

    /// Lines written so far, without their terminators.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    /// Forget everything written so far.
    pub fn clear(&self) {
        self.bytes.lock().unwrap().clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A colourless console writing into two shared buffers: `(console, stdout,
/// stderr)`.
pub fn captured_console() -> (Console, SharedBuffer, SharedBuffer) {
    let out = SharedBuffer::new();
    let err = SharedBuffer::new();
    let console = Console::with_writers(Box::new(out.clone()), Box::new(err.clone()), false);
    (console, out, err)
}
