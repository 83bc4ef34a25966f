// Library root: exposes the engine, history store and rendering for the
// binary and for integration tests in `tests/`.
// Production entry point remains `src/main.rs`.

pub mod app;
pub mod backend;
pub mod engine;
pub mod error;
pub mod render;
pub mod store;

// Binary-facing modules. Declared pub so integration tests can reach them.
pub mod cli;
pub mod config;
pub mod logging;
