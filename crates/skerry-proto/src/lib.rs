//! Generated bindings for the skerry typed RPC protocol.
//!
//! The messages and the `NodeCommand` service are defined in
//! `proto/skerry/v1/cli.proto`; this crate only re-exports what
//! `tonic-build` generates. The server half exists for the node-side engine
//! and for in-process test doubles.

/// Version 1 of the protocol.
pub mod v1 {
    #![allow(missing_docs, reason = "generated code")]
    #![allow(clippy::pedantic, reason = "generated code")]

    tonic::include_proto!("skerry.v1");
}
