//! Cryptographic signing primitives.
//!
//! Pure and stateless: no network, no shared state. The minters in
//! `infrastructure::credentials` build on these.

pub mod rs256;
pub mod sigv4;
