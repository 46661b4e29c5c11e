//! Entity model for the authorization-server store.
//! - Plain records for applications, scopes, authorizations and tokens.
//! - Property blob encoding shared by authorizations, scopes and tokens.
//! - Field names on the wire are the stable snake_case aliases used in storage files.

pub mod errors;
pub mod id;
pub mod properties;
pub mod application;
pub mod scope;
pub mod authorization;
pub mod token;

pub use application::Application;
pub use authorization::Authorization;
pub use errors::ModelError;
pub use properties::PropertyMap;
pub use scope::Scope;
pub use token::Token;

/// Anything stored in a collection: identified by a non-empty, immutable string Id.
pub trait Entity: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
}
