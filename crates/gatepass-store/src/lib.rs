// gatepass-store: async client for the hosted record store.
//
// The store is a PostgREST-style table API: every entity lives in a table
// under `/rest/v1/{table}`, filtered with `{field}=eq.{value}` query
// parameters. This crate speaks that wire format and nothing else --
// domain types and verification logic live in gatepass-core.

pub mod client;
pub mod error;
pub mod transport;

pub use client::StoreClient;
pub use error::Error;
pub use transport::TransportConfig;
