//! Core-Domänentypen: Blocks, Sockets, Connectors, Netzwerk und Segment-Routing.

pub mod block;
pub mod connector;
pub mod error;
pub mod geometry;
/// Core-Datenmodell eines Block-Netzwerks
///
/// - Network: Container fuer alle Blocks und Connectors
/// - Block: Rechteck mit Sockets am Rand
/// - Connector: orthogonaler Pfad von einem Ausgang zu einem Eingang
pub mod network;
pub mod routing;
pub mod socket;
pub mod socket_ref;

pub use block::{
    Block, BlockProperties, SocketLayoutReport, SocketSlot, SocketSpots, HELPER_BLOCK_NAME,
};
pub use connector::{Connector, Segment, CONNECTOR_COLOR, CONNECTOR_LINE_WIDTH};
pub use error::{NetworkError, Result};
pub use geometry::{
    near_equal, near_zero, points_near_equal, snap_to_grid, truncate_to_grid, GridLine,
    Orientation, GRID_SPACING,
};
pub use network::{
    BlockId, ConnectorGeometry, ConnectorId, GeometryChange, Network, SocketHandle, SocketUpdate,
};
pub use routing::{is_normalized, merge_segments, move_segment, SegmentMerge, SegmentRef};
pub use socket::{Socket, SocketDirection};
pub use socket_ref::{SocketRef, SOCKET_REF_SEPARATOR};
