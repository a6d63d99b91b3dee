//! Bank operations desk core.
//!
//! Two independent pieces:
//!   - permission model: `permission`, `session`, `event`
//!   - metrics engine:   `engine`, `records`, `metrics`, `segment`,
//!                       `trend`, `alert`
//!
//! Supporting modules: `config`, `context`, `rng`, `sample`, `error`, `types`.

pub mod alert;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod event;
pub mod metrics;
pub mod permission;
pub mod records;
pub mod rng;
pub mod sample;
pub mod segment;
pub mod session;
pub mod trend;
pub mod types;
