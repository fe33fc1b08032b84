//! Byte transport contract.
//!
//! The session only needs a blocking byte source and sink. The source's
//! `read` doubles as the dispatcher's bounded wait: it blocks until data
//! arrives or the implementation's poll interval elapses, returning
//! `Ok(0)` for "nothing yet, poll again" so the dispatcher can check for
//! shutdown between polls. A closed or failed transport returns `Err`,
//! which terminates dispatch for that session.
//!
//! Implementations here: TCP (always), serial behind the `serial`
//! feature, and an in-memory [`pipe`] used by tests and loopback demos.

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Blocking byte source with a bounded wait.
pub trait ByteSource: Send {
    /// Read available bytes into `buf`. Blocks until at least one byte
    /// arrives or the poll interval elapses; `Ok(0)` means the interval
    /// elapsed with nothing to read.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// Blocking byte sink.
pub trait ByteSink: Send {
    /// Write the whole buffer.
    fn write_all(&mut self, data: &[u8]) -> io::Result<()>;
    /// Push buffered bytes to the device.
    fn flush(&mut self) -> io::Result<()>;
}

// ============================================================================
// TCP
// ============================================================================

/// Reading half of a TCP transport.
pub struct TcpSource {
    stream: TcpStream,
}

/// Writing half of a TCP transport.
pub struct TcpSink {
    stream: TcpStream,
}

/// Connect to a serial-over-TCP bridge, returning the source/sink pair.
/// `poll` bounds how long the dispatcher blocks per read.
pub fn tcp_connect<A: ToSocketAddrs>(addr: A, poll: Duration) -> io::Result<(TcpSource, TcpSink)> {
    let stream = TcpStream::connect(addr)?;
    stream.set_read_timeout(Some(poll))?;
    stream.set_nodelay(true)?;
    let reader = stream.try_clone()?;
    Ok((TcpSource { stream: reader }, TcpSink { stream }))
}

impl ByteSource for TcpSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.stream.read(buf) {
            // A zero-length TCP read means the peer closed the stream.
            Ok(0) => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "transport closed by peer",
            )),
            Ok(n) => Ok(n),
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                Ok(0)
            }
            Err(e) => Err(e),
        }
    }
}

impl ByteSink for TcpSink {
    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        Write::write_all(&mut self.stream, data)
    }

    fn flush(&mut self) -> io::Result<()> {
        Write::flush(&mut self.stream)
    }
}

// ============================================================================
// Serial
// ============================================================================

/// Reading half of a serial transport.
#[cfg(feature = "serial")]
pub struct SerialSource {
    port: Box<dyn serialport::SerialPort>,
}

/// Writing half of a serial transport.
#[cfg(feature = "serial")]
pub struct SerialSink {
    port: Box<dyn serialport::SerialPort>,
}

/// Open a serial port at the given baud rate. `poll` bounds how long the
/// dispatcher blocks per read.
#[cfg(feature = "serial")]
pub fn serial_open(
    path: &str,
    baud_rate: u32,
    poll: Duration,
) -> io::Result<(SerialSource, SerialSink)> {
    let port = serialport::new(path, baud_rate)
        .timeout(poll)
        .open()
        .map_err(io::Error::from)?;
    let reader = port.try_clone().map_err(io::Error::from)?;
    Ok((SerialSource { port: reader }, SerialSink { port }))
}

#[cfg(feature = "serial")]
impl ByteSource for SerialSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.port.read(buf) {
            Ok(n) => Ok(n),
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                Ok(0)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(feature = "serial")]
impl ByteSink for SerialSink {
    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        Write::write_all(&mut self.port, data)
    }

    fn flush(&mut self) -> io::Result<()> {
        Write::flush(&mut self.port)
    }
}

// ============================================================================
// In-memory pipe
// ============================================================================

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};

struct PipeShared {
    state: Mutex<PipeState>,
    cond: Condvar,
}

struct PipeState {
    buf: VecDeque<u8>,
    closed: bool,
}

/// Writing end of an in-memory pipe.
pub struct PipeWriter {
    shared: Arc<PipeShared>,
}

/// Reading end of an in-memory pipe.
pub struct PipeReader {
    shared: Arc<PipeShared>,
    poll: Duration,
}

/// An in-memory unidirectional byte pipe. The reader's `read` behaves
/// like a transport with the given poll interval.
pub fn pipe(poll: Duration) -> (PipeWriter, PipeReader) {
    let shared = Arc::new(PipeShared {
        state: Mutex::new(PipeState {
            buf: VecDeque::new(),
            closed: false,
        }),
        cond: Condvar::new(),
    });
    (
        PipeWriter {
            shared: Arc::clone(&shared),
        },
        PipeReader { shared, poll },
    )
}

impl ByteSink for PipeWriter {
    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        let mut state = self.shared.state.lock().unwrap();
        if state.closed {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
        }
        state.buf.extend(data);
        self.shared.cond.notify_all();
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl PipeWriter {
    /// Close the pipe; the reader sees end-of-stream once drained.
    pub fn close(&self) {
        let mut state = self.shared.state.lock().unwrap();
        state.closed = true;
        self.shared.cond.notify_all();
    }
}

impl Drop for PipeWriter {
    fn drop(&mut self) {
        self.close();
    }
}

impl ByteSource for PipeReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut state = self.shared.state.lock().unwrap();
        if state.buf.is_empty() {
            if state.closed {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "pipe closed",
                ));
            }
            let (guard, _timeout) = self
                .shared
                .cond
                .wait_timeout(state, self.poll)
                .unwrap();
            state = guard;
        }
        let mut n = 0;
        while n < buf.len() {
            match state.buf.pop_front() {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        if n == 0 && state.closed {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "pipe closed"));
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipe_carries_bytes() {
        let (mut writer, mut reader) = pipe(Duration::from_millis(10));
        writer.write_all(&[1, 2, 3]).unwrap();
        let mut buf = [0u8; 8];
        assert_eq!(reader.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], &[1, 2, 3]);
    }

    #[test]
    fn test_pipe_read_polls_when_empty() {
        let (_writer, mut reader) = pipe(Duration::from_millis(5));
        let mut buf = [0u8; 8];
        assert_eq!(reader.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_pipe_close_surfaces_eof() {
        let (writer, mut reader) = pipe(Duration::from_millis(5));
        writer.close();
        let mut buf = [0u8; 8];
        assert!(reader.read(&mut buf).is_err());
    }
}
