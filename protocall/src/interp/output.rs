//! Output sink for `print_` and `print_symbols`
//!
//! Output goes to a caller-chosen destination, never through the return
//! channel:
//! - Stdout: the CLI default
//! - Buffer: captured for tests and embedding hosts
//! - Writer: any `io::Write` the host supplies
//! - Silent: discarded

use std::cell::RefCell;
use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

/// Cloneable handle to a captured output buffer.
///
/// The interpreter writes through one clone while the host keeps another to
/// read what was printed.
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    contents: Rc<RefCell<String>>,
}

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything printed so far
    pub fn contents(&self) -> String {
        self.contents.borrow().clone()
    }

    pub fn clear(&self) {
        self.contents.borrow_mut().clear();
    }

    fn push_line(&self, line: &str) {
        let mut buf = self.contents.borrow_mut();
        buf.push_str(line);
        buf.push('\n');
    }
}

/// Output destination, dispatched by enum
#[derive(Default)]
pub enum OutputSink {
    /// Writes to stdout (default)
    #[default]
    Stdout,
    /// Captures to a shared buffer
    Buffer(Buffer),
    /// Writes to a host-supplied writer
    Writer(Box<dyn Write>),
    /// Discards all output
    Silent,
}

impl OutputSink {
    /// A fresh capturing sink plus the handle to read it back
    pub fn buffer() -> (Self, Buffer) {
        let buffer = Buffer::new();
        (OutputSink::Buffer(buffer.clone()), buffer)
    }

    /// Write one line
    pub fn println(&mut self, line: &str) -> io::Result<()> {
        match self {
            OutputSink::Stdout => {
                let stdout = io::stdout();
                let mut lock = stdout.lock();
                writeln!(lock, "{line}")?;
                lock.flush()
            }
            OutputSink::Buffer(buffer) => {
                buffer.push_line(line);
                Ok(())
            }
            OutputSink::Writer(w) => {
                writeln!(w, "{line}")?;
                w.flush()
            }
            OutputSink::Silent => Ok(()),
        }
    }
}

impl fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputSink::Stdout => write!(f, "Stdout"),
            OutputSink::Buffer(_) => write!(f, "Buffer"),
            OutputSink::Writer(_) => write!(f, "Writer"),
            OutputSink::Silent => write!(f, "Silent"),
        }
    }
}
