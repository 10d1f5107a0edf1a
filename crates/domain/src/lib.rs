//! # intentcp-domain
//!
//! Pure domain model for the intentcp home control plane.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **device descriptors** (kind, capability flags, backend target ids)
//! - Define **actions** (`on`, `off`, `status`, `brightness`, custom names) and
//!   bounded **delays**
//! - **Resolve** an action against a descriptor into a backend target id and
//!   command code (pure, no IO)
//! - **Parse** compact `device:action?delay=N` step lists into sequences
//! - Define the fixed **presets** and the **outcomes** reported back to callers
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod action;
pub mod delay;
pub mod device;
pub mod outcome;
pub mod preset;
pub mod resolver;
pub mod sequence;
