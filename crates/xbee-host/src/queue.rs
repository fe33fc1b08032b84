//! Bounded response queue.
//!
//! The dispatcher appends every decoded response here (subject to the
//! admission filter); application code drains it with [`ResponseQueue::recv`].
//! The queue is bounded: when full, the oldest entry is evicted so a
//! slow consumer sees recent traffic rather than stale backlog.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use log::debug;
use xbee_protocol::Response;

use crate::error::HostError;

/// Default queue capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Admission predicate: responses it rejects never enter the queue
/// (listeners and waiters still see them).
pub type ResponseFilter = Box<dyn Fn(&Response) -> bool + Send + Sync>;

struct QueueInner {
    state: Mutex<QueueState>,
    cond: Condvar,
    capacity: usize,
    filter: Option<ResponseFilter>,
}

struct QueueState {
    items: VecDeque<Response>,
    closed: bool,
}

/// Shared handle to the bounded response queue.
#[derive(Clone)]
pub struct ResponseQueue {
    inner: Arc<QueueInner>,
}

impl ResponseQueue {
    /// Queue with the given capacity and optional admission filter.
    pub fn new(capacity: usize, filter: Option<ResponseFilter>) -> Self {
        let capacity = capacity.max(1);
        ResponseQueue {
            inner: Arc::new(QueueInner {
                state: Mutex::new(QueueState {
                    items: VecDeque::with_capacity(capacity),
                    closed: false,
                }),
                cond: Condvar::new(),
                capacity,
                filter,
            }),
        }
    }

    /// Append a response, evicting the oldest entry when full. Responses
    /// rejected by the admission filter are dropped silently.
    pub(crate) fn push(&self, response: Response) {
        if let Some(filter) = &self.inner.filter {
            if !filter(&response) {
                return;
            }
        }
        let mut state = self.inner.state.lock().unwrap();
        if state.closed {
            return;
        }
        if state.items.len() >= self.inner.capacity {
            state.items.pop_front();
            debug!("response queue full, evicting oldest entry");
        }
        state.items.push_back(response);
        self.inner.cond.notify_one();
    }

    /// Take the next response. `Some(timeout)` bounds the wait and fails
    /// with [`HostError::Timeout`]; `None` blocks until a response
    /// arrives or the session closes.
    pub fn recv(&self, timeout: Option<Duration>) -> Result<Response, HostError> {
        let deadline = timeout.map(|t| Instant::now() + t);
        let mut state = self.inner.state.lock().unwrap();
        loop {
            if let Some(response) = state.items.pop_front() {
                return Ok(response);
            }
            if state.closed {
                return Err(HostError::Closed);
            }
            state = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(HostError::Timeout);
                    }
                    let (guard, _) = self
                        .inner
                        .cond
                        .wait_timeout(state, deadline - now)
                        .unwrap();
                    guard
                }
                None => self.inner.cond.wait(state).unwrap(),
            };
        }
    }

    /// Take the next response if one is already queued.
    pub fn try_recv(&self) -> Option<Response> {
        self.inner.state.lock().unwrap().items.pop_front()
    }

    /// Number of queued responses.
    pub fn len(&self) -> usize {
        self.inner.state.lock().unwrap().items.len()
    }

    /// True if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop everything currently queued.
    pub fn clear(&self) {
        self.inner.state.lock().unwrap().items.clear();
    }

    /// Mark the queue closed and wake every blocked receiver.
    pub(crate) fn close(&self) {
        let mut state = self.inner.state.lock().unwrap();
        state.closed = true;
        self.inner.cond.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xbee_protocol::ResponseKind;

    fn response(api_id: u8) -> Response {
        Response {
            api_id,
            length: 1,
            checksum: 0,
            raw: vec![api_id],
            kind: ResponseKind::Generic { payload: vec![] },
        }
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let queue = ResponseQueue::new(3, None);
        for id in 1..=5 {
            queue.push(response(id));
        }
        assert_eq!(queue.len(), 3);
        let ids: Vec<u8> = (0..3).map(|_| queue.try_recv().unwrap().api_id).collect();
        assert_eq!(ids, vec![3, 4, 5]);
    }

    #[test]
    fn test_filter_blocks_admission() {
        let queue = ResponseQueue::new(10, Some(Box::new(|r: &Response| r.api_id != 0x8A)));
        queue.push(response(0x8A));
        queue.push(response(0x88));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.try_recv().unwrap().api_id, 0x88);
    }

    #[test]
    fn test_recv_times_out() {
        let queue = ResponseQueue::new(10, None);
        let err = queue.recv(Some(Duration::from_millis(10))).unwrap_err();
        assert!(matches!(err, HostError::Timeout));
    }

    #[test]
    fn test_recv_unblocks_on_close() {
        let queue = ResponseQueue::new(10, None);
        let waiter = {
            let queue = queue.clone();
            std::thread::spawn(move || queue.recv(None))
        };
        std::thread::sleep(Duration::from_millis(20));
        queue.close();
        assert!(matches!(waiter.join().unwrap(), Err(HostError::Closed)));
    }

    #[test]
    fn test_recv_returns_queued_item() {
        let queue = ResponseQueue::new(10, None);
        queue.push(response(0x90));
        let got = queue.recv(Some(Duration::from_millis(10))).unwrap();
        assert_eq!(got.api_id, 0x90);
    }
}
