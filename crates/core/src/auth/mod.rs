//! Role capability table and authorization checks.
//!
//! Every mutation receives an [`Actor`] with a closed [`Role`]. There is no
//! default role: a caller that cannot produce a role cannot construct an
//! actor, and an unrecognized role string at the boundary is an
//! authorization failure, never a fallback.

pub mod role;

#[cfg(test)]
mod tests;

pub use role::{Actor, AuthError, Capabilities, Role, Scope};
