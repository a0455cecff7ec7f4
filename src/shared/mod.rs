//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält die Laufzeit-Optionen, die `app` und die Binary gemeinsam nutzen.

pub mod options;

pub use options::NetworkOptions;
pub use options::{HELPER_BLOCK_SIZE, NEW_CONNECTOR_NAME, SOCKET_HIT_RADIUS};
