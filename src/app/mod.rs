//! Application-Layer: Editor-Controller, State, Events und Use-Cases.

pub mod controller;
pub mod events;
/// Editor-State
///
/// Haelt das Netzwerk, die Optionen sowie laufende Zieh- und Verbindungs-Sitzungen.
pub mod state;
pub mod use_cases;

pub use crate::core::{ConnectorId, Network, SegmentRef};
pub use controller::NetworkEditor;
pub use events::{EditorCommand, EditorEvent};
pub use state::{EditorState, PendingConnection, SegmentDrag};
