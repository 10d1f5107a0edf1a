//! # intentcp-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `DeviceRegistry`: look up device descriptors by logical name
//!   - `BackendClient`: send a command to / read status from a backend target
//! - Define the **driving/inbound** use-case:
//!   - `DispatchService`: single actions, sequences and presets
//! - Provide **in-process infrastructure** that doesn't need IO:
//!   - `SharedRegistry`: swappable registry snapshot
//!   - `StepScheduler`: detached, delayed execution of steps
//!
//! ## Dependency rule
//! Depends on `intentcp-domain` only (plus `tokio` for tasks and timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod registry;
pub mod scheduler;
pub mod services;
