use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Instant;

use crate::page::document::Document;
use crate::protocol::message::{ReadResponse, WriteRequest};
use crate::sync::engine::SyncEngine;
use crate::sync::events::UserAction;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::{SyncTraceEvent, TraceKind};
use crate::transport::error::BridgeError;
use crate::transport::http::Transport;

pub enum LoopMessage {
    User(UserAction),
    ReadCompleted {
        requested: usize,
        result: Result<ReadResponse, BridgeError>,
    },
    /// Wake the loop so the observer runs
    Refresh,
    Shutdown,
}

pub type Observer<D> = Box<dyn FnMut(&SyncEngine<D>)>;

/// Single owner of the engine state.
///
/// Reads and writes run on worker threads and report back through the
/// channel, so bindings and the page are only touched here. The next
/// read is scheduled `interval` after the previous one completed, which
/// keeps at most one read in flight.
pub struct EventLoop<D: Document> {
    engine: SyncEngine<D>,
    transport: Arc<dyn Transport>,
    trace: Arc<TraceLogger>,
    tx: Sender<LoopMessage>,
    rx: Receiver<LoopMessage>,
    observer: Option<Observer<D>>,
}

impl<D: Document> EventLoop<D> {
    pub fn new(engine: SyncEngine<D>, transport: Arc<dyn Transport>) -> Self {
        let (tx, rx) = mpsc::channel();
        let trace = Arc::clone(engine.trace());
        Self {
            engine,
            transport,
            trace,
            tx,
            rx,
            observer: None,
        }
    }

    /// Called with the engine after every processed message.
    pub fn with_observer(mut self, observer: Observer<D>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Handle for feeding user actions or a shutdown into the loop.
    pub fn sender(&self) -> Sender<LoopMessage> {
        self.tx.clone()
    }

    /// Run until `Shutdown`. Returns the engine with its final state.
    pub fn run(mut self) -> SyncEngine<D> {
        let mut next_read = if self.engine.read_request().is_some() {
            Some(Instant::now())
        } else {
            None
        };

        if let Some(observer) = self.observer.as_mut() {
            observer(&self.engine);
        }

        loop {
            let message = match next_read {
                Some(deadline) => {
                    let wait = deadline.saturating_duration_since(Instant::now());
                    match self.rx.recv_timeout(wait) {
                        Ok(m) => m,
                        Err(RecvTimeoutError::Timeout) => {
                            next_read = None;
                            self.start_read();
                            continue;
                        }
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                None => match self.rx.recv() {
                    Ok(m) => m,
                    Err(_) => break,
                },
            };

            match message {
                LoopMessage::User(action) => {
                    for request in self.engine.perform(&action) {
                        self.dispatch_write(request);
                    }
                }
                LoopMessage::ReadCompleted { requested, result } => {
                    self.engine.reconcile(requested, result);
                    if self.engine.registry().polling_enabled() {
                        next_read = Some(Instant::now() + self.engine.registry().interval());
                    }
                }
                LoopMessage::Refresh => {}
                LoopMessage::Shutdown => break,
            }

            if let Some(observer) = self.observer.as_mut() {
                observer(&self.engine);
            }
        }

        self.engine
    }

    fn start_read(&self) {
        let request = match self.engine.read_request() {
            Some(r) => r,
            None => return,
        };

        let transport = Arc::clone(&self.transport);
        let tx = self.tx.clone();

        thread::spawn(move || {
            let result = transport.read(&request);
            // Loop gone means shutdown, nothing left to update
            let _ = tx.send(LoopMessage::ReadCompleted {
                requested: request.len(),
                result,
            });
        });
    }

    /// Fire and forget: the outcome is only traced.
    fn dispatch_write(&self, request: WriteRequest) {
        let transport = Arc::clone(&self.transport);
        let trace = Arc::clone(&self.trace);
        let cycle = self.engine.cycles();

        thread::spawn(move || {
            let pair = request.write.first().cloned();
            let (var, val) = pair
                .map(|p| (p.var, p.val))
                .unwrap_or_default();

            match transport.write(&request) {
                Ok(_) => trace.log(
                    &SyncTraceEvent::now(cycle, TraceKind::WriteSent)
                        .with_variable(&var)
                        .with_value(&val),
                ),
                Err(e) => trace.log(
                    &SyncTraceEvent::now(cycle, TraceKind::WriteFailed)
                        .with_variable(&var)
                        .with_value(&val)
                        .with_error(&e),
                ),
            }
        });
    }
}
