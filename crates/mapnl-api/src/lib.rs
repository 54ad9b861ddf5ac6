//! mapnl API: natural-language map command interpreter.
//!
//! Re-exports all modules so the binary (`main.rs`) and external crates
//! (e.g. `mapnl-e2e-tests`) can reach `AppState`, `build_router` and the
//! `CommandInterpreter`.

pub mod config;
pub mod error;
pub mod inference;
pub mod routes;
pub mod state;
