use std::{fs::OpenOptions, io::Write, sync::Mutex};

use crate::trace::trace::SyncTraceEvent;

/// Append-only JSON-lines trace. Shared between the loop and write workers.
pub struct TraceLogger {
    file: Option<Mutex<std::fs::File>>,
    verbose: u8,
}

impl TraceLogger {
    pub fn new(path: &str) -> Self {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path);

        match file {
            Ok(f) => Self {
                file: Some(Mutex::new(f)),
                verbose: 0,
            },
            Err(e) => {
                eprintln!("Warning: could not open trace file '{}': {}", path, e);
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self {
            file: None,
            verbose: 0,
        }
    }

    /// Echo events to stderr at `-vv` and above.
    pub fn with_verbose(mut self, verbose: u8) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn log(&self, event: &SyncTraceEvent) {
        if self.verbose > 1 {
            eprintln!("[trace] {:?}", event);
        }

        let file_mutex = match &self.file {
            Some(f) => f,
            None => return, // tracing disabled
        };

        let json = match serde_json::to_string(event) {
            Ok(j) => j,
            Err(e) => {
                eprintln!("Warning: failed to serialize trace event: {}", e);
                return;
            }
        };

        let mut file = match file_mutex.lock() {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Warning: trace logger lock poisoned: {}", e);
                return;
            }
        };

        if let Err(e) = writeln!(file, "{}", json) {
            eprintln!("Warning: failed to write trace event: {}", e);
        }
    }
}
