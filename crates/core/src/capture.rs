//! Output capture and redirection.
//!
//! [`Redirect`] routes a pair of stdout/stderr writers to one of a fixed set
//! of [`Destination`]s. [`Suppress`] swallows output into a buffer so it can
//! be inspected afterwards.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::str::FromStr;

/// Default log file names used by [`Destination::file`].
pub const STDOUT_LOG: &str = "stdout.log";
pub const STDERR_LOG: &str = "stderr.log";

/// Where redirected output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// The process's real stdout/stderr.
    Console,
    /// A pair of log files, truncated on open.
    File { stdout: PathBuf, stderr: PathBuf },
    /// In-memory buffers returned on close.
    Buffer,
}

impl Destination {
    /// `stdout.log` and `stderr.log` in the working directory.
    pub fn file() -> Self {
        Destination::File {
            stdout: PathBuf::from(STDOUT_LOG),
            stderr: PathBuf::from(STDERR_LOG),
        }
    }
}

impl FromStr for Destination {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "console" => Ok(Destination::Console),
            "file" => Ok(Destination::file()),
            "buffer" => Ok(Destination::Buffer),
            other => Err(Error::InvalidDestination(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

enum Sink {
    Console(Stream),
    File(BufWriter<File>),
    Buffer(Vec<u8>),
}

impl Sink {
    fn open(destination: &Destination, stream: Stream) -> io::Result<Self> {
        match destination {
            Destination::Console => Ok(Sink::Console(stream)),
            Destination::File { stdout, stderr } => {
                let path = match stream {
                    Stream::Stdout => stdout,
                    Stream::Stderr => stderr,
                };
                Ok(Sink::File(BufWriter::new(File::create(path)?)))
            }
            Destination::Buffer => Ok(Sink::Buffer(Vec::new())),
        }
    }

    /// Flush and hand back buffered bytes, if this sink buffers.
    fn close(&mut self) -> io::Result<Vec<u8>> {
        match self {
            Sink::Console(_) => {
                self.flush()?;
                Ok(Vec::new())
            }
            Sink::File(file) => {
                file.flush()?;
                Ok(Vec::new())
            }
            Sink::Buffer(buf) => Ok(std::mem::take(buf)),
        }
    }
}

impl Write for Sink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        match self {
            Sink::Console(Stream::Stdout) => io::stdout().write(data),
            Sink::Console(Stream::Stderr) => io::stderr().write(data),
            Sink::File(file) => file.write(data),
            Sink::Buffer(buf) => buf.write(data),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Console(Stream::Stdout) => io::stdout().flush(),
            Sink::Console(Stream::Stderr) => io::stderr().flush(),
            Sink::File(file) => file.flush(),
            Sink::Buffer(_) => Ok(()),
        }
    }
}

/// Text collected by a [`Destination::Buffer`] redirect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captured {
    pub stdout: String,
    pub stderr: String,
}

/// A stdout/stderr writer pair bound to one destination.
pub struct Redirect {
    destination: Destination,
    out: Sink,
    err: Sink,
}

impl Redirect {
    /// Open both streams for `destination`.
    pub fn open(destination: Destination) -> Result<Self> {
        let out = Sink::open(&destination, Stream::Stdout)?;
        let err = Sink::open(&destination, Stream::Stderr)?;
        log::debug!("Redirecting output to {:?}", destination);
        Ok(Self {
            destination,
            out,
            err,
        })
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Writer for standard output.
    pub fn out(&mut self) -> &mut dyn Write {
        &mut self.out
    }

    /// Writer for standard error.
    pub fn err(&mut self) -> &mut dyn Write {
        &mut self.err
    }

    /// Flush both streams. Buffered output is returned; other destinations
    /// return empty strings.
    pub fn close(mut self) -> Result<Captured> {
        let stdout = self.out.close()?;
        let stderr = self.err.close()?;
        Ok(Captured {
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        })
    }
}

impl Drop for Redirect {
    fn drop(&mut self) {
        if let Err(e) = self.out.flush().and_then(|_| self.err.flush()) {
            log::warn!("Failed to flush redirected output: {}", e);
        }
    }
}

/// Swallows output into a buffer.
///
/// ```
/// use std::io::Write;
/// use nbkit_core::Suppress;
///
/// let text = Suppress::capture(|out| writeln!(out, "ERROR")).unwrap();
/// assert_eq!(text, "ERROR");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Suppress {
    buffer: Vec<u8>,
}

impl Suppress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `body` against a fresh buffer and return what it wrote.
    pub fn capture<F>(body: F) -> io::Result<String>
    where
        F: FnOnce(&mut Suppress) -> io::Result<()>,
    {
        let mut suppress = Self::new();
        body(&mut suppress)?;
        Ok(suppress.finish())
    }

    /// Captured text without its final newline.
    pub fn finish(self) -> String {
        let mut text = String::from_utf8_lossy(&self.buffer).into_owned();
        if text.ends_with('\n') {
            text.pop();
        }
        text
    }
}

impl Write for Suppress {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
