//! Background readers and non-blocking queue draining.
//!
//! A child's stdout and stderr are separate pipes; reading one synchronously
//! can stall while the child blocks on the other being full. Each stream gets
//! its own reader thread that only pushes lines into a queue, and the
//! orchestration thread forwards whatever has been queued without ever
//! waiting on a pipe itself.

use crate::output::Stream;
use std::io::{self, BufRead, BufReader, Read};
use std::process::ExitStatus;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

/// Notifications the orchestration thread blocks on while a capture runs.
#[derive(Debug)]
pub enum Wake {
    /// A line was pushed onto the queue for this stream.
    Line(Stream),
    /// The stream reached end-of-file (or failed) and its reader has exited.
    Closed(Stream),
    /// The child process has been reaped.
    Exited(io::Result<ExitStatus>),
}

/// FIFO of lines read from one stream of one process.
pub struct OutputQueue {
    stream: Stream,
    lines: Receiver<String>,
}

impl OutputQueue {
    pub fn stream(&self) -> Stream {
        self.stream
    }

    /// Hand every line queued so far to `handler`, in order. Returns as soon
    /// as the queue is empty; never waits for more input.
    pub fn drain<F>(&self, mut handler: F) -> io::Result<usize>
    where
        F: FnMut(Stream, &str) -> io::Result<()>,
    {
        let mut count = 0;
        loop {
            match self.lines.try_recv() {
                Ok(line) => {
                    handler(self.stream, &line)?;
                    count += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return Ok(count),
            }
        }
    }
}

/// Start a thread that reads `reader` line by line into a new queue.
///
/// `wake` receives a [`Wake::Line`] after every queued line and exactly one
/// [`Wake::Closed`] when the reader stops.
pub fn spawn_reader<R>(stream: Stream, reader: R, wake: Sender<Wake>) -> (OutputQueue, JoinHandle<()>)
where
    R: Read + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let handle = thread::spawn(move || {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    let mut line = String::from_utf8_lossy(&buf).into_owned();
                    if !line.ends_with('\n') {
                        line.push('\n');
                    }
                    if tx.send(line).is_err() {
                        break;
                    }
                    // The orchestration thread may already have stopped
                    // listening; the line stays queued for the final drain.
                    let _ = wake.send(Wake::Line(stream));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
        let _ = wake.send(Wake::Closed(stream));
    });

    (OutputQueue { stream, lines: rx }, handle)
}
