//! Block Shock (workspace facade crate).
//!
//! Re-exports the simulation core and the shared types so collaborators can
//! depend on one package while the implementation lives in `crates/`.

pub use block_shock_core as core;
pub use block_shock_types as types;
