//! Session adapters.
//!
//! Implementations of the `SessionProvider` port:
//!
//! - `static_session` - In-process session set by the binary or by tests

mod static_session;

pub use static_session::StaticSessionProvider;
