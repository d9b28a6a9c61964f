//! Cross-tick state encoding for tide.
//!
//! The venue hands back whatever string the previous tick returned. This
//! crate turns the in-memory [`PersistedState`] into that string and back,
//! inside a versioned envelope that fails closed on anything it does not
//! recognize.

pub mod codec;
pub mod error;

pub use codec::{PersistedState, StateCodec, STATE_VERSION};
pub use error::{PersistenceError, PersistenceResult};
