//! BlockMod Network Editor Library.
//! Core-Funktionalität als Library exportiert für Tests und Wiederverwendung.

pub mod app;
pub mod core;
pub mod shared;
pub mod xml;

pub use app::{EditorCommand, EditorEvent, EditorState, NetworkEditor};
pub use core::{
    Block, BlockId, Connector, ConnectorId, GridLine, Network, NetworkError, Orientation,
    Segment, SegmentRef, Socket, SocketRef, GRID_SPACING,
};
pub use shared::NetworkOptions;
pub use xml::{parse_network, read_network_file, write_network, write_network_file};
