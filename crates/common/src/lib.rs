//! Shared runtime helpers: logging setup and environment checks.

pub mod env;

pub mod utils {
    pub mod logging;
}
