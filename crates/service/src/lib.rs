//! Persistence layer for an OAuth2/OIDC authorization server.
//! - `contracts`: the store traits the server runtime calls, one per entity type.
//! - `memory`: in-process implementations; authorizations and tokens can be mirrored to JSON files.
//! - `storage`: the shared collection and snapshot-file primitives.
//! - `bootstrap`: seeding of applications and scopes at startup.

pub mod bootstrap;
pub mod contracts;
pub mod errors;
pub mod memory;
pub mod storage;
pub mod stores;

pub use errors::StoreError;
pub use stores::Stores;
