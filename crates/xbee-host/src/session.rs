//! Session dispatcher and request/response correlation.
//!
//! A [`Session`] owns one transport. A dedicated background thread runs
//! the parse loop: read whatever the source produces, feed it to the
//! frame parser, and deliver every completed response in order to three
//! consumers in one step:
//!
//! 1. the bounded response queue (subject to its admission filter),
//! 2. every registered listener, synchronously on the dispatcher thread,
//! 3. the waiter registered for the response's frame id, if any.
//!
//! A listener that blocks stalls all delivery; that is the contract, not
//! a defect to paper over here. Senders share one mutex around
//! encode+write+flush so concurrent requests cannot interleave bytes.
//!
//! Closing the session stops the parse loop (the source's bounded reads
//! guarantee the thread notices promptly), closes the queue, and fails
//! every pending waiter with [`HostError::Closed`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, trace, warn};
use xbee_protocol::{
    encode_frame, FrameParser, ParserOptions, Request, Response, ResponseRegistry,
};

use crate::error::HostError;
use crate::frame_id::FrameIdAllocator;
use crate::queue::{ResponseFilter, ResponseQueue, DEFAULT_QUEUE_CAPACITY};
use crate::transport::{ByteSink, ByteSource};

/// Default deadline for synchronous sends.
pub const DEFAULT_SYNC_TIMEOUT: Duration = Duration::from_millis(5000);

/// Session configuration.
pub struct SessionConfig {
    /// Response queue capacity.
    pub queue_capacity: usize,
    /// Admission filter for the response queue.
    pub queue_filter: Option<ResponseFilter>,
    /// Deadline used by [`Session::send_sync`] when the caller passes `None`.
    pub sync_timeout: Duration,
    /// Treat unescaped reserved bytes inside frames as framing errors
    /// instead of tolerating them as data.
    pub strict_unescape: bool,
    /// Decoder registry for the parser; extend it to handle vendor frames.
    pub registry: ResponseRegistry,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            queue_filter: None,
            sync_timeout: DEFAULT_SYNC_TIMEOUT,
            strict_unescape: false,
            registry: ResponseRegistry::with_defaults(),
        }
    }
}

/// Callback invoked on the dispatcher thread for every response.
pub type ResponseListener = Box<dyn Fn(&Response) + Send>;

/// Handle for removing a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

struct Waiter {
    slot: Mutex<Option<Result<Response, HostError>>>,
    cond: Condvar,
}

impl Waiter {
    fn new() -> Arc<Self> {
        Arc::new(Waiter {
            slot: Mutex::new(None),
            cond: Condvar::new(),
        })
    }

    fn resolve(&self, result: Result<Response, HostError>) {
        let mut slot = self.slot.lock().unwrap();
        if slot.is_none() {
            *slot = Some(result);
            self.cond.notify_one();
        }
    }

    fn wait(&self, deadline: Instant) -> Result<Response, HostError> {
        let mut slot = self.slot.lock().unwrap();
        loop {
            if let Some(result) = slot.take() {
                return result;
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(HostError::Timeout);
            }
            let (guard, _) = self.cond.wait_timeout(slot, deadline - now).unwrap();
            slot = guard;
        }
    }
}

/// State shared between the dispatcher thread and callers.
struct Shared {
    waiters: Mutex<HashMap<u8, Arc<Waiter>>>,
    listeners: Mutex<Vec<(ListenerId, ResponseListener)>>,
    queue: ResponseQueue,
    shutdown: AtomicBool,
}

impl Shared {
    /// One delivery step: queue, listeners, then the matching waiter.
    fn deliver(&self, response: Response) {
        trace!("dispatching {}", response.kind);

        let frame_id = response.frame_id();

        self.queue.push(response.clone());

        let listeners = self.listeners.lock().unwrap();
        for (_, listener) in listeners.iter() {
            listener(&response);
        }
        drop(listeners);

        if let Some(frame_id) = frame_id {
            let waiter = self.waiters.lock().unwrap().remove(&frame_id);
            if let Some(waiter) = waiter {
                debug!("resolving waiter for frame id {}", frame_id);
                waiter.resolve(Ok(response));
            }
        }
    }

    /// Fail every pending waiter; used on shutdown and transport failure.
    fn fail_waiters(&self) {
        let mut waiters = self.waiters.lock().unwrap();
        for (_, waiter) in waiters.drain() {
            waiter.resolve(Err(HostError::Closed));
        }
    }
}

/// An open connection to a radio module.
pub struct Session {
    shared: Arc<Shared>,
    sink: Mutex<Box<dyn ByteSink>>,
    frame_ids: Mutex<FrameIdAllocator>,
    sync_timeout: Duration,
    next_listener_id: AtomicU64,
    reader: Option<JoinHandle<()>>,
}

impl Session {
    /// Open a session over the given transport halves and start the
    /// dispatcher thread.
    pub fn open<R, W>(source: R, sink: W, config: SessionConfig) -> Self
    where
        R: ByteSource + 'static,
        W: ByteSink + 'static,
    {
        let shared = Arc::new(Shared {
            waiters: Mutex::new(HashMap::new()),
            listeners: Mutex::new(Vec::new()),
            queue: ResponseQueue::new(config.queue_capacity, config.queue_filter),
            shutdown: AtomicBool::new(false),
        });

        let parser = FrameParser::with_registry(
            config.registry,
            ParserOptions {
                strict_unescape: config.strict_unescape,
            },
        );

        let reader = {
            let shared = Arc::clone(&shared);
            thread::Builder::new()
                .name("xbee-dispatch".into())
                .spawn(move || parse_loop(source, parser, shared))
                .expect("failed to spawn dispatcher thread")
        };

        Session {
            shared,
            sink: Mutex::new(Box::new(sink)),
            frame_ids: Mutex::new(FrameIdAllocator::new()),
            sync_timeout: config.sync_timeout,
            next_listener_id: AtomicU64::new(1),
            reader: Some(reader),
        }
    }

    /// Allocate the next correlation frame id.
    pub fn next_frame_id(&self) -> u8 {
        self.frame_ids.lock().unwrap().next()
    }

    /// Handle to the response queue for asynchronous consumption.
    pub fn responses(&self) -> ResponseQueue {
        self.shared.queue.clone()
    }

    /// Take the next queued response, waiting up to `timeout` (`None`
    /// blocks until a response arrives or the session closes).
    pub fn get_response(&self, timeout: Option<Duration>) -> Result<Response, HostError> {
        self.shared.queue.recv(timeout)
    }

    /// Register a listener; it runs on the dispatcher thread for every
    /// decoded response.
    pub fn add_listener(&self, listener: ResponseListener) -> ListenerId {
        let id = ListenerId(self.next_listener_id.fetch_add(1, Ordering::Relaxed));
        self.shared.listeners.lock().unwrap().push((id, listener));
        id
    }

    /// Remove a previously registered listener.
    pub fn remove_listener(&self, id: ListenerId) {
        self.shared
            .listeners
            .lock()
            .unwrap()
            .retain(|(lid, _)| *lid != id);
    }

    /// Encode and write a request without waiting for a response. Any
    /// reply surfaces later through the queue and listeners.
    pub fn send_async(&self, request: &Request) -> Result<(), HostError> {
        if self.shared.shutdown.load(Ordering::SeqCst) {
            return Err(HostError::Closed);
        }
        let wire = encode_frame(request)?;
        self.write_frame(&wire)
    }

    /// Send a request and block until the response with the same frame
    /// id arrives, up to `timeout` (`None` uses the configured default).
    ///
    /// Fails fast with [`HostError::NoResponseExpected`] for frame id 0:
    /// the module never answers the sentinel, so waiting would hang.
    pub fn send_sync(
        &self,
        request: &Request,
        timeout: Option<Duration>,
    ) -> Result<Response, HostError> {
        let frame_id = request.frame_id();
        if frame_id == 0 {
            return Err(HostError::NoResponseExpected);
        }
        if self.shared.shutdown.load(Ordering::SeqCst) {
            return Err(HostError::Closed);
        }

        // Validate and encode before registering the waiter.
        let wire = encode_frame(request)?;

        let waiter = Waiter::new();
        {
            let mut waiters = self.shared.waiters.lock().unwrap();
            if let Some(displaced) = waiters.insert(frame_id, Arc::clone(&waiter)) {
                warn!("frame id {} reused, failing the displaced sender", frame_id);
                displaced.resolve(Err(HostError::Superseded));
            }
        }

        let deadline = Instant::now() + timeout.unwrap_or(self.sync_timeout);
        let result = match self.write_frame(&wire) {
            Ok(()) => waiter.wait(deadline),
            Err(e) => Err(e),
        };

        // Always deregister, matched or not.
        self.shared.waiters.lock().unwrap().remove(&frame_id);
        result
    }

    /// Stop the dispatcher, fail pending waiters, and close the queue.
    /// Safe to call more than once; also runs on drop.
    pub fn close(&mut self) {
        self.shared.shutdown.store(true, Ordering::SeqCst);
        if let Some(reader) = self.reader.take() {
            let _ = reader.join();
        }
        self.shared.queue.close();
        self.shared.fail_waiters();
    }

    fn write_frame(&self, wire: &[u8]) -> Result<(), HostError> {
        let mut sink = self.sink.lock().unwrap();
        sink.write_all(wire)?;
        sink.flush()?;
        trace!("wrote {} byte frame", wire.len());
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

/// The dispatcher thread body: read, parse, deliver, until shutdown or
/// transport failure.
fn parse_loop<R: ByteSource>(mut source: R, mut parser: FrameParser, shared: Arc<Shared>) {
    let mut buf = [0u8; 256];
    loop {
        if shared.shutdown.load(Ordering::SeqCst) {
            debug!("dispatcher shutting down");
            break;
        }
        match source.read(&mut buf) {
            // Poll interval elapsed with no data; re-check shutdown.
            Ok(0) => continue,
            Ok(n) => {
                for response in parser.push(&buf[..n]) {
                    shared.deliver(response);
                }
            }
            Err(e) => {
                warn!("transport failed, terminating dispatch: {}", e);
                break;
            }
        }
    }
    shared.queue.close();
    shared.fail_waiters();
}
