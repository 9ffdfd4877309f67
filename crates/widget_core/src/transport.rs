//! Line-oriented channel to the engine process.

use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use thiserror::Error;

/// Failure to reach or drive the engine process.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to spawn engine process: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("engine process did not expose stdio pipes")]
    Pipes,
    #[error("engine channel closed: {0}")]
    Write(#[source] std::io::Error),
}

/// Outbound half of the engine channel: one protocol line per call.
///
/// Inbound lines travel the other way, from whatever owns the channel to
/// [`crate::Session::on_engine_line`], so the adapter stays a pure state
/// machine that can be driven by tests.
pub trait EngineTransport {
    fn send(&mut self, line: &str) -> Result<(), TransportError>;
}

/// Child-process transport.
///
/// Spawns the engine binary with piped stdio; stdout lines are forwarded by a
/// reader thread into the receiver returned from [`ProcessTransport::spawn`].
/// The child is killed when the transport is dropped.
pub struct ProcessTransport {
    child: Child,
    stdin: BufWriter<std::process::ChildStdin>,
}

impl ProcessTransport {
    pub fn spawn(path: &Path) -> Result<(Self, Receiver<String>), TransportError> {
        let mut child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(TransportError::Spawn)?;

        let stdin = child.stdin.take().ok_or(TransportError::Pipes)?;
        let stdout = child.stdout.take().ok_or(TransportError::Pipes)?;

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || forward_lines(stdout, tx));

        Ok((
            Self {
                child,
                stdin: BufWriter::new(stdin),
            },
            rx,
        ))
    }
}

fn forward_lines(stdout: ChildStdout, tx: Sender<String>) {
    let reader = BufReader::new(stdout);
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(_) => break,
        };
        if tx.send(line).is_err() {
            break;
        }
    }
}

impl EngineTransport for ProcessTransport {
    fn send(&mut self, line: &str) -> Result<(), TransportError> {
        writeln!(self.stdin, "{line}").map_err(TransportError::Write)?;
        self.stdin.flush().map_err(TransportError::Write)
    }
}

impl Drop for ProcessTransport {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
