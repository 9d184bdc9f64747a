//! koyomi calendar engine - integration test support.
//!
//! Re-exports the workspace crates so integration tests can use `koyomi::`
//! paths.

pub mod core {
    pub use koyomi_core::*;
}

pub mod engine {
    pub use koyomi_engine::*;
}
