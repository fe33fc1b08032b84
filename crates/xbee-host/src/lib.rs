//! Host-side session layer for XBee-family radio modules.
//!
//! [`xbee_protocol`] handles the wire format; this crate adds everything
//! a host application needs to talk to a live module:
//!
//! - [`transport`]: blocking byte source/sink traits with TCP, serial
//!   (behind the `serial` feature), and in-memory pipe implementations,
//! - [`Session`]: a dispatcher thread that parses inbound bytes and
//!   routes every response to the queue, listeners, and the waiter for
//!   its frame id,
//! - [`FrameIdAllocator`]: cyclic correlation ids (1..=255, never 0),
//! - [`ResponseQueue`]: bounded buffer of decoded responses for
//!   applications that poll instead of registering callbacks.
//!
//! ```no_run
//! use std::time::Duration;
//! use xbee_host::{tcp_connect, Session, SessionConfig};
//! use xbee_protocol::{AtCommandName, Request};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (source, sink) = tcp_connect("192.168.1.50:9750", Duration::from_millis(100))?;
//! let session = Session::open(source, sink, SessionConfig::default());
//!
//! let request = Request::AtCommand {
//!     frame_id: session.next_frame_id(),
//!     command: AtCommandName::new("NI")?,
//!     parameter: vec![],
//! };
//! let response = session.send_sync(&request, None)?;
//! println!("{}", response.kind);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod frame_id;
pub mod queue;
pub mod session;
pub mod transport;

pub use error::HostError;
pub use frame_id::FrameIdAllocator;
pub use queue::{ResponseFilter, ResponseQueue, DEFAULT_QUEUE_CAPACITY};
pub use session::{
    ListenerId, ResponseListener, Session, SessionConfig, DEFAULT_SYNC_TIMEOUT,
};
pub use transport::{pipe, tcp_connect, ByteSink, ByteSource, PipeReader, PipeWriter};

#[cfg(feature = "serial")]
pub use transport::serial_open;
