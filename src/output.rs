// Process-wide output bindings and run-scoped suppression
//
// Everything the crate prints (forwarded host output, log lines, the final
// report) goes through `stdout()` / `stderr()`. While an `OutputSuppressor`
// is active both bindings point at an in-memory buffer instead of the real
// streams.

use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

type SharedBuffer = Arc<Mutex<Vec<u8>>>;

#[derive(Clone)]
enum Target {
    Stdout,
    Stderr,
    Buffer(SharedBuffer),
}

impl Target {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Target::Stdout => io::stdout().lock().write(buf),
            Target::Stderr => io::stderr().lock().write(buf),
            Target::Buffer(buffer) => {
                lock(buffer).extend_from_slice(buf);
                Ok(buf.len())
            }
        }
    }

    fn flush(&self) -> io::Result<()> {
        match self {
            Target::Stdout => io::stdout().flush(),
            Target::Stderr => io::stderr().flush(),
            Target::Buffer(_) => Ok(()),
        }
    }
}

#[derive(Clone)]
struct Bindings {
    stdout: Target,
    stderr: Target,
}

static BINDINGS: Lazy<Mutex<Bindings>> = Lazy::new(|| {
    Mutex::new(Bindings {
        stdout: Target::Stdout,
        stderr: Target::Stderr,
    })
});

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    Out,
    Err,
}

/// Writer bound to the current process-wide stdout or stderr destination
#[derive(Debug, Clone, Copy)]
pub struct Stream {
    channel: Channel,
}

impl Stream {
    fn target(&self) -> Target {
        let bindings = lock(&BINDINGS);
        match self.channel {
            Channel::Out => bindings.stdout.clone(),
            Channel::Err => bindings.stderr.clone(),
        }
    }
}

impl Write for Stream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.target().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.target().flush()
    }
}

/// Current stdout destination
pub fn stdout() -> Stream {
    Stream {
        channel: Channel::Out,
    }
}

/// Current stderr destination
pub fn stderr() -> Stream {
    Stream {
        channel: Channel::Err,
    }
}

/// Whether stdout currently points at a suppression buffer
pub fn is_suppressed() -> bool {
    matches!(lock(&BINDINGS).stdout, Target::Buffer(_))
}

/// Redirects both output bindings into a buffer between `begin` and `end`.
///
/// The captured bindings are restored at most once, either by `end` or when
/// the suppressor is dropped, so an early return or a panic during a run
/// cannot leave the process writing into the buffer.
#[derive(Default)]
pub struct OutputSuppressor {
    saved: Option<Bindings>,
    buffer: SharedBuffer,
}

impl OutputSuppressor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current bindings and install a fresh buffer.
    /// Calling it again while active does nothing.
    pub fn begin(&mut self) {
        if self.saved.is_some() {
            return;
        }

        let buffer = SharedBuffer::default();
        let mut bindings = lock(&BINDINGS);
        let previous = std::mem::replace(
            &mut *bindings,
            Bindings {
                stdout: Target::Buffer(buffer.clone()),
                stderr: Target::Buffer(buffer.clone()),
            },
        );

        self.saved = Some(previous);
        self.buffer = buffer;
    }

    /// Restore the captured bindings. No-op if nothing was captured.
    pub fn end(&mut self) {
        if let Some(saved) = self.saved.take() {
            *lock(&BINDINGS) = saved;
        }
    }

    pub fn is_active(&self) -> bool {
        self.saved.is_some()
    }

    #[cfg(test)]
    fn suppressed_len(&self) -> usize {
        lock(&self.buffer).len()
    }
}

impl Drop for OutputSuppressor {
    fn drop(&mut self) {
        self.end();
    }
}
