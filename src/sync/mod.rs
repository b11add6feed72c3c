pub mod engine;
pub mod event_loop;
pub mod events;
