//! Thing query signals for twinproto.
//!
//! Provides the typed commands and responses of the protocol and the
//! machinery that moves them across a JSON boundary:
//! - [`Headers`]: immutable correlation and version metadata
//! - [`Signal`]: the render/parse contract every command and response implements
//! - [`commands`] and [`responses`]: the retrieve family
//! - [`TypeRegistry`]: discriminator dispatch to a closed [`ThingSignal`]
//! - [`batch`]: the shared-namespace rule for batch retrieval
//!
//! Transport, authorization and persistence are left to the caller: a
//! signal is rendered with [`Signal::to_json`], carried elsewhere, and
//! turned back into a typed value with [`TypeRegistry::resolve`].

#[macro_use]
mod macros;

pub mod batch;
pub mod commands;
pub mod error;
pub mod fields;
pub mod headers;
pub mod registry;
pub mod responses;
pub mod signal;

pub use commands::ThingQueryCommand;
pub use error::{SignalError, SignalResult};
pub use headers::{Headers, HeadersBuilder};
pub use registry::{ParseFn, ThingSignal, TypeRegistry, TypeRegistryBuilder};
pub use responses::ThingQueryCommandResponse;
pub use signal::{Command, CommandResponse, HttpStatus, Signal, SignalKind};
