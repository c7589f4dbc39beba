//! Email verification adapters.

mod in_memory;

pub use in_memory::InMemoryEmailVerifier;
