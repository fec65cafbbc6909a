//! Prefixed terminal output.
//!
//! Every line a captured subprocess produces, and every status line the
//! orchestrator prints itself, goes through one [`OutputSink`]. The sink owns
//! the current [`Prefix`], so the only way to change it is through a
//! `&mut OutputSink` held by the orchestration thread.

mod prefix;

pub use prefix::Prefix;

use colored::*;
use std::fmt;
use std::io::{self, Write};

/// Which of a process's output channels a line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    Stdout,
    Stderr,
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stream::Stdout => f.write_str("stdout"),
            Stream::Stderr => f.write_str("stderr"),
        }
    }
}

pub struct OutputSink {
    prefix: Prefix,
    out: Box<dyn Write + Send>,
    err: Box<dyn Write + Send>,
}

impl OutputSink {
    pub fn new(out: Box<dyn Write + Send>, err: Box<dyn Write + Send>) -> Self {
        Self {
            prefix: Prefix::default(),
            out,
            err,
        }
    }

    /// Sink writing to the real standard output and standard error.
    pub fn stdio() -> Self {
        Self::new(Box::new(io::stdout()), Box::new(io::stderr()))
    }

    pub fn prefix(&self) -> &Prefix {
        &self.prefix
    }

    pub fn prefix_mut(&mut self) -> &mut Prefix {
        &mut self.prefix
    }

    /// Write `text` behind the current prefix. `text` is expected to carry
    /// its own line terminator and is not altered.
    pub fn write(&mut self, stream: Stream, text: &str) -> io::Result<()> {
        let line = format!("{}{}", self.prefix, text);
        let target = match stream {
            Stream::Stdout => &mut self.out,
            Stream::Stderr => &mut self.err,
        };
        target.write_all(line.as_bytes())?;
        target.flush()
    }

    pub fn info(&mut self, message: &str) -> io::Result<()> {
        self.write(Stream::Stdout, &format!("{}\n", message))
    }

    pub fn warn(&mut self, message: &str) -> io::Result<()> {
        self.write(Stream::Stderr, &format!("{} {}\n", "!".yellow(), message))
    }

    pub fn error(&mut self, message: &str) -> io::Result<()> {
        self.write(Stream::Stderr, &format!("{} {}\n", "x".red(), message))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::OutputSink;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    /// Cloneable in-memory writer so tests can inspect what a sink wrote.
    #[derive(Clone, Default)]
    pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }

        pub fn lines(&self) -> Vec<String> {
            self.contents().lines().map(str::to_string).collect()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    pub fn capture_sink() -> (OutputSink, SharedBuffer, SharedBuffer) {
        let out = SharedBuffer::default();
        let err = SharedBuffer::default();
        let sink = OutputSink::new(Box::new(out.clone()), Box::new(err.clone()));
        (sink, out, err)
    }
}
