//! # arbiter: symbolic models of finite-state devices
//!
//! **`arbiter`** is a small construction-time DSL for describing reactive, protocol-style devices:
//! named finite-state variables, named transitions ("messages") guarded by preconditions, and the
//! assignments each message performs.
//!
//! Guards are not closures. They are explicit, inspectable **predicates**, stored as canonical
//! case-split diagrams, so a backend (simulator, prover, code generator) can compare and take them
//! apart cheaply.
//!
//! ## Key Features
//!
//! - **Manager-Centric Architecture**: All operations go through the [`Device`][crate::device::Device].
//!   It owns the namespace, the entity registries and the predicate storage.
//! - **Lightweight handles**: [`Fsm`][crate::types::Fsm], [`State`][crate::types::State],
//!   [`Var`][crate::types::Var], [`Message`][crate::types::Message] and [`Pred`][crate::reference::Pred]
//!   are `Copy` indices into the device.
//! - **Canonical predicates**: case-splits are hash-consed, so structurally equal predicates are the
//!   same [`Pred`][crate::reference::Pred].
//! - **Scoped assignment**: a message is entered as a scope; assignments made while it is active are
//!   recorded on it, and the scope guard always exits.
//!
//! ## Basic Usage
//!
//! ```rust
//! use arbiter::device::Device;
//!
//! # fn main() -> arbiter::error::Result<()> {
//! let mutex = Device::new("mutex");
//! let b = mutex.declare_fsm("bool")?;
//! let f = mutex.declare_state(b, "false")?;
//! let t = mutex.declare_state(b, "true")?;
//! let is_locked = mutex.declare_var("is_locked", b, f)?;
//!
//! let lock = mutex.declare_message("lock")?;
//! {
//!     let scope = mutex.enter_scope(lock);
//!     scope.assign(is_locked, t)?;
//! }
//!
//! let unlock = mutex.declare_message("unlock")?;
//! mutex.set_precondition(unlock, mutex.var_eq(is_locked, t)?)?;
//! mutex.scoped(unlock, |scope| scope.assign(is_locked, f))?;
//!
//! println!("{}", mutex.dump());
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Components
//!
//! - **[`device`]**: the [`Device`][crate::device::Device] manager and its namespace.
//! - **[`cache`]**: predicate storage, canonicalization and the boolean operators.
//! - **[`message`]**: messages, targets and scopes.

pub mod cache;
pub mod computed;
pub mod device;
pub mod dump;
pub mod error;
pub mod eval;
pub mod fsm;
pub mod message;
pub mod node;
pub mod reference;
pub mod sat;
pub mod subtable;
pub mod types;
pub mod utils;
pub mod var;
