use super::drain::{OutputQueue, Wake, spawn_reader};
use crate::errors::BuildError;
use crate::output::{OutputSink, Stream};
use anyhow::{Context, Result};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

/// How long after the child has exited to keep collecting output, when a
/// process it left behind still holds one of the pipes open. Measured from
/// the exit, not from the last line.
pub const EXIT_LINGER: Duration = Duration::from_millis(500);

/// One external process launch.
#[derive(Debug, Clone)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
    interactive: bool,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            interactive: false,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Interactive invocations are wired straight to the terminal: nothing is
    /// captured or prefixed.
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 1);
        argv.push(self.program.clone());
        argv.extend(self.args.iter().cloned());
        argv
    }

    pub fn display(&self) -> String {
        self.argv().join(" ")
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    /// Launch the process and block until it has exited. In captured mode,
    /// every line it printed has been written to `sink` by the time this
    /// returns.
    pub fn run(&self, sink: &mut OutputSink) -> Result<ProcessHandle> {
        let status = if self.interactive {
            Some(self.run_interactive()?)
        } else {
            self.run_captured(sink)?
        };
        Ok(ProcessHandle {
            argv: self.argv(),
            status,
        })
    }

    fn spawn_error(&self, source: std::io::Error) -> BuildError {
        BuildError::Spawn {
            program: self.program.clone(),
            source,
        }
    }

    fn run_interactive(&self) -> Result<ExitStatus> {
        let mut child = self
            .command()
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;
        child
            .wait()
            .with_context(|| format!("Failed to wait for `{}`", self.program))
    }

    fn run_captured(&self, sink: &mut OutputSink) -> Result<Option<ExitStatus>> {
        let mut child = self
            .command()
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let stdout = child.stdout.take().context("child stdout was not piped")?;
        let stderr = child.stderr.take().context("child stderr was not piped")?;

        let (wake_tx, wake_rx) = mpsc::channel();
        // Readers are never joined: once the queues are drained they either
        // have already finished or are stuck behind a pipe someone else holds.
        let (out_queue, _) = spawn_reader(Stream::Stdout, stdout, wake_tx.clone());
        let (err_queue, _) = spawn_reader(Stream::Stderr, stderr, wake_tx.clone());

        let waiter = wake_tx;
        thread::spawn(move || {
            let status = child.wait();
            let _ = waiter.send(Wake::Exited(status));
        });

        collect_output(&self.program, &wake_rx, &out_queue, &err_queue, sink)
    }
}

/// Forward queued output to `sink` until the child has exited and both
/// streams are closed, or until [`EXIT_LINGER`] has passed since the exit.
fn collect_output(
    program: &str,
    wake_rx: &Receiver<Wake>,
    out_queue: &OutputQueue,
    err_queue: &OutputQueue,
    sink: &mut OutputSink,
) -> Result<Option<ExitStatus>> {
    let mut open_streams = 2;
    let mut status = None;
    let mut deadline: Option<Instant> = None;
    loop {
        let event = match deadline {
            Some(deadline) => wake_rx
                .recv_timeout(deadline.saturating_duration_since(Instant::now()))
                .ok(),
            None => wake_rx.recv().ok(),
        };
        match event {
            Some(Wake::Line(_)) => {}
            Some(Wake::Closed(_)) => open_streams -= 1,
            Some(Wake::Exited(Ok(exit))) => {
                status = Some(exit);
                deadline = Some(Instant::now() + EXIT_LINGER);
            }
            Some(Wake::Exited(Err(e))) => {
                forward(out_queue, sink)?;
                forward(err_queue, sink)?;
                return Err(e).with_context(|| format!("Failed to wait for `{}`", program));
            }
            None => break,
        }

        forward(out_queue, sink)?;
        forward(err_queue, sink)?;

        if open_streams == 0 && status.is_some() {
            break;
        }
    }

    // Lines can land between the last wake-up and the loop ending.
    forward(out_queue, sink)?;
    forward(err_queue, sink)?;

    Ok(status)
}

fn forward(queue: &OutputQueue, sink: &mut OutputSink) -> Result<()> {
    queue
        .drain(|stream, line| sink.write(stream, line))
        .with_context(|| format!("Failed to forward child {}", queue.stream()))?;
    Ok(())
}

/// How a finished (or unfinished) invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// No exit status is known yet.
    Running,
    Code(i32),
    /// Terminated by a signal before it could report a code (unix only).
    Signal(i32),
}

#[derive(Debug)]
pub struct ProcessHandle {
    argv: Vec<String>,
    status: Option<ExitStatus>,
}

impl ProcessHandle {
    #[cfg(test)]
    pub(crate) fn pending(argv: Vec<String>) -> Self {
        Self { argv, status: None }
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn program(&self) -> &str {
        self.argv.first().map(String::as_str).unwrap_or_default()
    }

    pub fn status(&self) -> Option<ExitStatus> {
        self.status
    }

    pub fn outcome(&self) -> ExitOutcome {
        let Some(status) = self.status else {
            return ExitOutcome::Running;
        };
        if let Some(code) = status.code() {
            return ExitOutcome::Code(code);
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return ExitOutcome::Signal(signal);
            }
        }
        ExitOutcome::Running
    }
}
