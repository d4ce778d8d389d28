//! Generated protobuf and gRPC bindings for the knowledge bank service.
//!
//! The code under `gen/` is committed generator output; regenerate it from
//! the proto definitions rather than editing it by hand.

mod gen;

pub use gen::*;
