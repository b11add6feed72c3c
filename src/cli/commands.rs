use std::io::BufRead;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crate::cli::config::{AppConfig, ConnectionSettings};
use crate::cli::input::{InputCommand, parse_line};
use crate::page::document::MemoryDocument;
use crate::page::render::{format_page, page_fingerprint};
use crate::registry::registry::Registry;
use crate::sync::engine::SyncEngine;
use crate::sync::event_loop::{EventLoop, LoopMessage};
use crate::trace::logger::TraceLogger;
use crate::transport::client::WebgateClient;
use crate::transport::http::HttpTransport;

// ============================================================================
// sync subcommand
// ============================================================================

pub struct SyncOptions {
    pub interval_ms: Option<u64>,
    pub once: bool,
    pub trace: Option<String>,
    pub verbose: u8,
}

pub fn cmd_sync(
    config: &AppConfig,
    connection: &ConnectionSettings,
    options: &SyncOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let transport = HttpTransport::with_timeout(&connection.endpoint, connection.timeout_ms)?;
    let engine = build_engine(config, options);

    if options.verbose > 0 {
        eprintln!(
            "Syncing {} bindings with {} (interval={} ms, polling={})",
            engine.registry().len(),
            connection.endpoint,
            engine.registry().interval().as_millis(),
            engine.registry().polling_enabled()
        );
    }

    if options.once {
        let mut engine = engine;
        let outcome = engine.run_read_cycle(&transport);
        if options.verbose > 0 {
            eprintln!("Read cycle: {:?}", outcome);
        }
        print!("{}", format_page(engine.document().elements(), engine.registry()));
        return Ok(());
    }

    let force_redraw = Arc::new(AtomicBool::new(false));
    let mut last_fingerprint = String::new();
    let redraw = Arc::clone(&force_redraw);

    let event_loop = EventLoop::new(engine, Arc::new(transport)).with_observer(Box::new(
        move |engine: &SyncEngine<MemoryDocument>| {
            let rendered = format_page(engine.document().elements(), engine.registry());
            let fingerprint = page_fingerprint(&rendered);
            if redraw.swap(false, Ordering::SeqCst) || fingerprint != last_fingerprint {
                print!("{}", rendered);
                last_fingerprint = fingerprint;
            }
        },
    ));

    let tx = event_loop.sender();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(l) => l,
                Err(_) => break,
            };

            let message = match parse_line(&line) {
                Ok(Some(InputCommand::Action(action))) => LoopMessage::User(action),
                Ok(Some(InputCommand::Show)) => {
                    force_redraw.store(true, Ordering::SeqCst);
                    LoopMessage::Refresh
                }
                Ok(Some(InputCommand::Quit)) => break,
                Ok(None) => continue,
                Err(e) => {
                    eprintln!("{}", e);
                    continue;
                }
            };

            if tx.send(message).is_err() {
                return;
            }
        }
        let _ = tx.send(LoopMessage::Shutdown);
    });

    let engine = event_loop.run();

    if options.verbose > 0 {
        eprintln!("Stopped after {} read cycles", engine.cycles());
    }

    Ok(())
}

/// Page, registry and engine from the config file.
pub fn build_engine(config: &AppConfig, options: &SyncOptions) -> SyncEngine<MemoryDocument> {
    let trace = match options.trace.as_deref().or(config.trace_file.as_deref()) {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    }
    .with_verbose(options.verbose);

    let interval = options.interval_ms.unwrap_or(config.poll_interval_ms);
    let mut registry = Registry::new();
    if !registry.initialize(config.bindings.iter().cloned(), interval) && options.verbose > 0 {
        eprintln!("No bindings configured, polling disabled");
    }

    let document = MemoryDocument::from_decls(&config.elements);
    SyncEngine::new(registry, document, Arc::new(trace))
}

// ============================================================================
// get / set subcommands
// ============================================================================

pub fn cmd_get(
    connection: &ConnectionSettings,
    variables: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let client = WebgateClient::new(HttpTransport::with_timeout(
        &connection.endpoint,
        connection.timeout_ms,
    )?);

    let names: Vec<&str> = variables.iter().map(String::as_str).collect();
    let values = client.get_values(&names)?;

    for (name, value) in names.iter().zip(values) {
        println!("{} = {}", name, value);
    }

    Ok(())
}

pub fn cmd_set(
    connection: &ConnectionSettings,
    variable: &str,
    value: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = WebgateClient::new(HttpTransport::with_timeout(
        &connection.endpoint,
        connection.timeout_ms,
    )?);

    let stored = client.set_value(variable, value)?;
    println!("{} = {}", variable, stored);

    Ok(())
}
