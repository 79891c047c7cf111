//! Gateway in front of the Airia pipeline-execution API.
//!
//! One `analyze` operation, two transport surfaces (JSON-over-HTTP and an
//! RPC tool), one upstream client, and a shared response normalizer that
//! copes with the two envelope shapes the upstream has used over time.

pub mod adapters;
pub mod config;
pub mod error;
pub mod http;
pub mod normalize;
pub mod schemas;
pub mod server;
pub mod tools;
pub mod upstream;
