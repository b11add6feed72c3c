use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use webgate_sync::protocol::message::{ReadRequest, ReadResponse, WriteAck, WriteRequest};
use webgate_sync::transport::error::BridgeError;
use webgate_sync::transport::http::Transport;

/// Records every request and answers reads from a script.
///
/// Queued responses are used first; once the queue is empty the
/// repeating response (if any) answers, otherwise the read fails.
pub struct MockTransport {
    reads: Mutex<Vec<ReadRequest>>,
    writes: Mutex<Vec<WriteRequest>>,
    queued: Mutex<VecDeque<Result<ReadResponse, BridgeError>>>,
    repeating: Mutex<Option<ReadResponse>>,
    delay: Duration,
    fail_writes: bool,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            reads: Mutex::new(vec![]),
            writes: Mutex::new(vec![]),
            queued: Mutex::new(VecDeque::new()),
            repeating: Mutex::new(None),
            delay: Duration::ZERO,
            fail_writes: false,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn always(self, values: &[&str]) -> Self {
        *self.repeating.lock().unwrap() = Some(ReadResponse::from_values(values.iter().copied()));
        self
    }

    pub fn queue(&self, result: Result<ReadResponse, BridgeError>) {
        self.queued.lock().unwrap().push_back(result);
    }

    pub fn queue_values(&self, values: &[&str]) {
        self.queue(Ok(ReadResponse::from_values(values.iter().copied())));
    }

    pub fn reads(&self) -> Vec<ReadRequest> {
        self.reads.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<WriteRequest> {
        self.writes.lock().unwrap().clone()
    }

    pub fn read_count(&self) -> usize {
        self.reads.lock().unwrap().len()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Transport for MockTransport {
    fn read(&self, request: &ReadRequest) -> Result<ReadResponse, BridgeError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        self.reads.lock().unwrap().push(request.clone());
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }

        let next = self.queued.lock().unwrap().pop_front();
        let result = match next {
            Some(r) => r,
            None => match self.repeating.lock().unwrap().clone() {
                Some(r) => Ok(r),
                None => Err(BridgeError::Protocol("no scripted response".into())),
            },
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn write(&self, request: &WriteRequest) -> Result<WriteAck, BridgeError> {
        self.writes.lock().unwrap().push(request.clone());
        if self.fail_writes {
            return Err(BridgeError::Timeout {
                endpoint: "mock".into(),
                timeout_ms: 2000,
            });
        }
        Ok(WriteAck {
            write: Some(request.write.clone()),
        })
    }
}
