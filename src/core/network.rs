//! Das Netzwerk: Arena aller Blocks und Connectors mit Namensaufloesung.

use super::block::{Block, SocketLayoutReport, HELPER_BLOCK_NAME};
use super::connector::{Connector, Segment};
use super::error::{NetworkError, Result};
use super::geometry::{near_zero, points_near_equal, GridLine, Orientation};
use super::routing::{self, SegmentMerge, SegmentRef};
use super::socket::Socket;
use super::socket_ref::{SocketRef, SOCKET_REF_SEPARATOR};
use glam::DVec2;
use indexmap::IndexMap;
use std::collections::HashSet;

/// Stabiler Handle eines Blocks (wird nie wiederverwendet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u64);

/// Stabiler Handle eines Connectors (wird nie wiederverwendet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectorId(pub u64);

/// Aufgeloester Socket: Block-Handle plus Index in `Block::sockets`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SocketHandle {
    /// Besitzender Block
    pub block: BlockId,
    /// Index des Sockets im Block
    pub socket: usize,
}

/// Ergebnis eines Geometrie-Abgleichs mehrerer Connectors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryChange {
    /// Connectors, deren Segmente geaendert wurden
    pub adjusted: Vec<ConnectorId>,
    /// Connectors, die nicht angepasst werden konnten
    pub failures: Vec<(ConnectorId, NetworkError)>,
}

impl GeometryChange {
    /// True, wenn alle Connectors angepasst werden konnten.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn absorb(&mut self, other: GeometryChange) {
        self.adjusted.extend(other.adjusted);
        self.failures.extend(other.failures);
    }
}

/// Ergebnis von [`Network::update_block_sockets`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SocketUpdate {
    /// Aenderungen am Socket-Layout
    pub layout: SocketLayoutReport,
    /// Connectors, deren Socket entfernt wurde (mitsamt Daten)
    pub removed_connectors: Vec<(ConnectorId, Connector)>,
    /// Abgleich der verbleibenden Connectors
    pub geometry: GeometryChange,
}

/// Vollstaendige Geometrie eines Connectors in Szenen-Koordinaten.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorGeometry {
    /// Verlaengerungslinie am Quell-Socket (Anker → Endpunkt)
    pub start_line: GridLine,
    /// Mittlere Segmente in Pfad-Reihenfolge
    pub segments: Vec<GridLine>,
    /// Verlaengerungslinie am Ziel-Socket (Endpunkt → Anker)
    pub end_line: GridLine,
}

impl ConnectorGeometry {
    /// True, wenn der Pfad am Ende der Ziel-Verlaengerung ankommt.
    pub fn is_closed(&self) -> bool {
        let end = self
            .segments
            .last()
            .map(|line| line.p2)
            .unwrap_or(self.start_line.p2);
        points_near_equal(end, self.end_line.p1)
    }

    /// Alle Linien in Zeichen-Reihenfolge.
    pub fn lines(&self) -> impl Iterator<Item = &GridLine> {
        std::iter::once(&self.start_line)
            .chain(self.segments.iter())
            .chain(std::iter::once(&self.end_line))
    }
}

/// Container fuer alle Blocks und Connectors
#[derive(Debug, Clone, Default)]
pub struct Network {
    blocks: IndexMap<BlockId, Block>,
    connectors: IndexMap<ConnectorId, Connector>,
    next_block_id: u64,
    next_connector_id: u64,
}

impl Network {
    /// Erstellt ein leeres Netzwerk
    pub fn new() -> Self {
        Self::default()
    }

    // --- Blocks ---

    /// Fuegt einen Block nach Pruefung des Namens hinzu.
    pub fn add_block(&mut self, block: Block) -> Result<BlockId> {
        if !block.is_connection_helper() {
            self.validate_block_name(&block.name, None)?;
            check_unique_socket_names(&block)?;
        }
        Ok(self.push_block(block))
    }

    /// Fuegt einen Block ohne Pruefung hinzu (z.B. beim Laden, vor `check_names`).
    pub fn push_block(&mut self, block: Block) -> BlockId {
        let id = BlockId(self.next_block_id);
        self.next_block_id += 1;
        self.blocks.insert(id, block);
        id
    }

    /// Gibt einen Block zurueck
    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(&id)
    }

    /// Mutabler Zugriff; Namensaenderungen bitte ueber [`Network::rename_block`].
    pub fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.get_mut(&id)
    }

    /// Alle Blocks in Einfuege-Reihenfolge
    pub fn blocks(&self) -> impl Iterator<Item = (BlockId, &Block)> {
        self.blocks.iter().map(|(id, block)| (*id, block))
    }

    /// Anzahl der Blocks (inklusive Hilfsblock)
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Sucht einen Block per Name
    pub fn find_block(&self, name: &str) -> Option<BlockId> {
        self.blocks
            .iter()
            .find(|(_, block)| block.name == name)
            .map(|(id, _)| *id)
    }

    /// Entfernt einen Block samt aller Connectors, die ihn beruehren.
    pub fn remove_block(&mut self, id: BlockId) -> Result<(Block, Vec<(ConnectorId, Connector)>)> {
        let block = self
            .blocks
            .shift_remove(&id)
            .ok_or(NetworkError::UnknownBlockId(id))?;

        let touching: Vec<ConnectorId> = self
            .connectors
            .iter()
            .filter(|(_, con)| con.touches_block(&block.name))
            .map(|(cid, _)| *cid)
            .collect();
        let removed = touching
            .into_iter()
            .filter_map(|cid| self.connectors.shift_remove(&cid).map(|con| (cid, con)))
            .collect::<Vec<_>>();

        log::debug!(
            "Block '{}' entfernt ({} Connectors)",
            block.name,
            removed.len()
        );
        Ok((block, removed))
    }

    /// Benennt einen Block um und passt alle Socket-Referenzen an.
    pub fn rename_block(&mut self, id: BlockId, new_name: &str) -> Result<()> {
        let old_name = self
            .blocks
            .get(&id)
            .ok_or(NetworkError::UnknownBlockId(id))?
            .name
            .clone();
        if old_name == new_name {
            return Ok(());
        }
        self.validate_block_name(new_name, Some(id))?;

        for con in self.connectors.values_mut() {
            rewrite_block_ref(&mut con.source, &old_name, new_name);
            rewrite_block_ref(&mut con.target, &old_name, new_name);
        }
        if let Some(block) = self.blocks.get_mut(&id) {
            block.name = new_name.to_string();
        }
        Ok(())
    }

    /// Verschiebt einen Block und gleicht die beruehrten Connectors ab.
    pub fn move_block(&mut self, id: BlockId, position: DVec2) -> Result<GeometryChange> {
        let block = self
            .blocks
            .get_mut(&id)
            .ok_or(NetworkError::UnknownBlockId(id))?;
        block.position = position;
        Ok(self.adjust_block_connectors(id))
    }

    /// Aendert die Block-Groesse und gleicht die beruehrten Connectors ab.
    pub fn resize_block(&mut self, id: BlockId, width: f64, height: f64) -> Result<GeometryChange> {
        let block = self
            .blocks
            .get_mut(&id)
            .ok_or(NetworkError::UnknownBlockId(id))?;
        block.resize(width, height);
        Ok(self.adjust_block_connectors(id))
    }

    /// Gleicht die Sockets eines Blocks an die Namenslisten an.
    ///
    /// Connectors an entfernten Sockets werden mit entfernt, die uebrigen abgeglichen.
    pub fn update_block_sockets<S: AsRef<str>>(
        &mut self,
        id: BlockId,
        inlet_names: &[S],
        outlet_names: &[S],
    ) -> Result<SocketUpdate> {
        let block = self
            .blocks
            .get_mut(&id)
            .ok_or(NetworkError::UnknownBlockId(id))?;
        let layout = block.auto_update_sockets(inlet_names, outlet_names);
        let block_name = block.name.clone();

        let mut removed_connectors = Vec::new();
        for socket_name in &layout.removed {
            let flat = SocketRef::new(block_name.as_str(), socket_name.as_str());
            let doomed: Vec<ConnectorId> = self
                .connectors
                .iter()
                .filter(|(_, con)| refers_to(&con.source, &flat) || refers_to(&con.target, &flat))
                .map(|(cid, _)| *cid)
                .collect();
            for cid in doomed {
                if let Some(con) = self.connectors.shift_remove(&cid) {
                    log::warn!(
                        "Connector '{}' entfernt: Socket '{}' existiert nicht mehr",
                        con.name,
                        flat
                    );
                    removed_connectors.push((cid, con));
                }
            }
        }

        let geometry = self.adjust_block_connectors(id);
        Ok(SocketUpdate {
            layout,
            removed_connectors,
            geometry,
        })
    }

    // --- Connectors ---

    /// Fuegt einen Connector nach Topologie-Pruefung hinzu und passt seine Segmente an.
    pub fn add_connector(&mut self, connector: Connector) -> Result<ConnectorId> {
        let source = self.lookup_block_and_socket(&connector.source)?;
        if self.socket_at(source).is_some_and(|s| s.inlet) {
            return Err(NetworkError::SourceNotOutlet(connector.source.clone()));
        }
        let target = self.lookup_block_and_socket(&connector.target)?;
        if !self.socket_at(target).is_some_and(|s| s.inlet) {
            return Err(NetworkError::TargetNotInlet(connector.target.clone()));
        }
        if self.is_connected_socket(target) {
            return Err(NetworkError::InletAlreadyConnected(connector.target.clone()));
        }

        let id = self.push_connector(connector);
        self.adjust_connector(id)?;
        Ok(id)
    }

    /// Fuegt einen Connector ohne Pruefung und ohne Abgleich hinzu.
    pub fn push_connector(&mut self, connector: Connector) -> ConnectorId {
        let id = ConnectorId(self.next_connector_id);
        self.next_connector_id += 1;
        self.connectors.insert(id, connector);
        id
    }

    /// Entfernt einen Connector
    pub fn remove_connector(&mut self, id: ConnectorId) -> Result<Connector> {
        self.connectors
            .shift_remove(&id)
            .ok_or(NetworkError::UnknownConnectorId(id))
    }

    /// Gibt einen Connector zurueck
    pub fn connector(&self, id: ConnectorId) -> Option<&Connector> {
        self.connectors.get(&id)
    }

    /// Mutabler Zugriff auf einen Connector
    pub fn connector_mut(&mut self, id: ConnectorId) -> Option<&mut Connector> {
        self.connectors.get_mut(&id)
    }

    /// Alle Connectors in Einfuege-Reihenfolge
    pub fn connectors(&self) -> impl Iterator<Item = (ConnectorId, &Connector)> {
        self.connectors.iter().map(|(id, con)| (*id, con))
    }

    /// Anzahl der Connectors
    pub fn connector_count(&self) -> usize {
        self.connectors.len()
    }

    /// Alle Connectors, deren Quelle oder Ziel auf dem Block liegt.
    pub fn connectors_of_block(&self, id: BlockId) -> Vec<ConnectorId> {
        let Some(block) = self.blocks.get(&id) else {
            return Vec::new();
        };
        self.connectors
            .iter()
            .filter(|(_, con)| con.touches_block(&block.name))
            .map(|(cid, _)| *cid)
            .collect()
    }

    // --- Namensaufloesung ---

    /// Loest `block.socket` auf.
    pub fn lookup_block_and_socket(&self, flat_name: &str) -> Result<SocketHandle> {
        let socket_ref = SocketRef::parse(flat_name)?;
        let block_id = self
            .find_block(&socket_ref.block)
            .ok_or_else(|| NetworkError::UnknownBlock(socket_ref.block.clone()))?;
        let socket = self
            .blocks
            .get(&block_id)
            .and_then(|block| block.socket_index(&socket_ref.socket))
            .ok_or_else(|| NetworkError::UnknownSocket {
                block: socket_ref.block.clone(),
                socket: socket_ref.socket.clone(),
            })?;
        Ok(SocketHandle {
            block: block_id,
            socket,
        })
    }

    /// Block und Socket zu einem Handle
    pub fn socket(&self, handle: SocketHandle) -> Option<(&Block, &Socket)> {
        let block = self.blocks.get(&handle.block)?;
        let socket = block.sockets.get(handle.socket)?;
        Some((block, socket))
    }

    fn socket_at(&self, handle: SocketHandle) -> Option<&Socket> {
        self.socket(handle).map(|(_, socket)| socket)
    }

    /// True, wenn `block.socket` existiert und die Polaritaet passt.
    pub fn have_socket(&self, flat_name: &str, inlet: bool) -> bool {
        self.lookup_block_and_socket(flat_name)
            .ok()
            .and_then(|handle| self.socket_at(handle))
            .is_some_and(|socket| socket.inlet == inlet)
    }

    /// True, wenn ein Connector an diesem Socket beginnt oder endet.
    pub fn is_connected_socket(&self, handle: SocketHandle) -> bool {
        let Some((block, socket)) = self.socket(handle) else {
            return false;
        };
        let flat = SocketRef::new(block.name.as_str(), socket.name.as_str());
        self.connectors
            .values()
            .any(|con| refers_to(&con.source, &flat) || refers_to(&con.target, &flat))
    }

    /// Verlaengerungslinie des Sockets `block.socket` in Szenen-Koordinaten.
    pub fn socket_start_line(&self, flat_name: &str) -> Result<GridLine> {
        let handle = self.lookup_block_and_socket(flat_name)?;
        let (block, socket) = self
            .socket(handle)
            .ok_or(NetworkError::UnknownBlockId(handle.block))?;
        Ok(block.socket_start_line(socket))
    }

    // --- Validierung ---

    /// Prueft Block-Namen, Socket-Namen und anschliessend die Topologie.
    ///
    /// Der Hilfsblock ist von den Namensregeln ausgenommen.
    pub fn check_names(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for block in self.blocks.values() {
            if block.is_connection_helper() {
                continue;
            }
            check_block_name_syntax(&block.name)?;
            if !seen.insert(block.name.as_str()) {
                return Err(NetworkError::DuplicateBlockName(block.name.clone()));
            }
            check_unique_socket_names(block)?;
        }
        self.check_topology()
    }

    /// Prueft jede Verbindung: Quelle Ausgang, Ziel Eingang, jeder Eingang hoechstens einmal.
    pub fn check_topology(&self) -> Result<()> {
        let mut connected_inlets = HashSet::new();
        for con in self.connectors.values() {
            let source = self.lookup_block_and_socket(&con.source)?;
            if self.socket_at(source).is_some_and(|s| s.inlet) {
                return Err(NetworkError::SourceNotOutlet(con.source.clone()));
            }
            let target = self.lookup_block_and_socket(&con.target)?;
            if !self.socket_at(target).is_some_and(|s| s.inlet) {
                return Err(NetworkError::TargetNotInlet(con.target.clone()));
            }
            if !connected_inlets.insert(target) {
                return Err(NetworkError::InletAlreadyConnected(con.target.clone()));
            }
        }
        Ok(())
    }

    fn validate_block_name(&self, name: &str, renamed: Option<BlockId>) -> Result<()> {
        check_block_name_syntax(name)?;
        if name == HELPER_BLOCK_NAME {
            return Err(NetworkError::InvalidBlockName(name.to_string()));
        }
        let taken = self
            .blocks
            .iter()
            .any(|(id, block)| Some(*id) != renamed && block.name == name);
        if taken {
            return Err(NetworkError::DuplicateBlockName(name.to_string()));
        }
        Ok(())
    }

    // --- Geometrie ---

    /// Gleicht die Segmente eines Connectors an die aktuelle Socket-Lage an.
    ///
    /// Die fehlende vertikale Differenz landet im ersten vertikalen Segment
    /// (sonst neu angehaengt), danach die horizontale im ersten horizontalen.
    /// Liefert `true`, wenn sich die Segmente geaendert haben; idempotent.
    pub fn adjust_connector(&mut self, id: ConnectorId) -> Result<bool> {
        let con = self
            .connectors
            .get(&id)
            .ok_or(NetworkError::UnknownConnectorId(id))?;
        let gap = self.connector_gap(con).map_err(|source| NetworkError::GeometryInconsistency {
            connector: con.name.clone(),
            source: Box::new(source),
        })?;

        let Some(con) = self.connectors.get_mut(&id) else {
            return Err(NetworkError::UnknownConnectorId(id));
        };
        let mut changed = false;
        for direction in [Orientation::Vertical, Orientation::Horizontal] {
            let amount = match direction {
                Orientation::Horizontal => gap.x,
                Orientation::Vertical => gap.y,
            };
            if near_zero(amount) {
                continue;
            }
            match con.segments.iter_mut().find(|s| s.direction == direction) {
                Some(segment) => segment.offset += amount,
                None => con.segments.push(Segment::new(direction, amount)),
            }
            changed = true;
        }
        Ok(changed)
    }

    /// Differenz zwischen Soll-Ende (Ziel-Verlaengerung) und Ist-Ende des Pfads.
    fn connector_gap(&self, con: &Connector) -> Result<DVec2> {
        let start = self.socket_start_line(&con.source)?.p2;
        let end = self.socket_start_line(&con.target)?.p2;
        Ok(end - start - con.total_offset())
    }

    /// Gleicht alle Connectors ab; Fehler einzelner Connectors brechen nicht ab.
    pub fn adjust_connectors(&mut self) -> GeometryChange {
        let ids: Vec<ConnectorId> = self.connectors.keys().copied().collect();
        self.adjust_many(ids)
    }

    /// Gleicht alle Connectors ab, die den Block beruehren.
    pub fn adjust_block_connectors(&mut self, id: BlockId) -> GeometryChange {
        let ids = self.connectors_of_block(id);
        self.adjust_many(ids)
    }

    fn adjust_many(&mut self, ids: Vec<ConnectorId>) -> GeometryChange {
        let mut change = GeometryChange::default();
        for id in ids {
            match self.adjust_connector(id) {
                Ok(true) => change.adjusted.push(id),
                Ok(false) => {}
                Err(e) => {
                    log::warn!("{}", e);
                    change.failures.push((id, e));
                }
            }
        }
        change
    }

    /// Berechnet die vollstaendige Linien-Geometrie eines Connectors.
    pub fn connector_geometry(&self, id: ConnectorId) -> Result<ConnectorGeometry> {
        let con = self
            .connectors
            .get(&id)
            .ok_or(NetworkError::UnknownConnectorId(id))?;
        let start_line = self.socket_start_line(&con.source)?;
        let target_line = self.socket_start_line(&con.target)?;
        Ok(ConnectorGeometry {
            start_line,
            segments: con.segment_lines(start_line.p2),
            end_line: GridLine::new(target_line.p2, target_line.p1),
        })
    }

    /// Verschiebt ein mittleres Segment eines Connectors (siehe [`routing::move_segment`]).
    pub fn move_connector_segment(
        &mut self,
        id: ConnectorId,
        segment: SegmentRef,
        delta: DVec2,
    ) -> Result<usize> {
        let con = self
            .connectors
            .get_mut(&id)
            .ok_or(NetworkError::UnknownConnectorId(id))?;
        routing::move_segment(con, segment, delta)
    }

    /// Fasst die Segmente eines Connectors zusammen (siehe [`routing::merge_segments`]).
    pub fn merge_connector_segments(&mut self, id: ConnectorId) -> Result<SegmentMerge> {
        let con = self
            .connectors
            .get_mut(&id)
            .ok_or(NetworkError::UnknownConnectorId(id))?;
        Ok(routing::merge_segments(con))
    }

    /// Tauscht den gesamten Inhalt mit einem anderen Netzwerk.
    pub fn swap(&mut self, other: &mut Network) {
        std::mem::swap(self, other);
    }

    /// True, wenn das Netzwerk weder Blocks noch Connectors enthaelt.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty() && self.connectors.is_empty()
    }
}

fn check_block_name_syntax(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(NetworkError::EmptyBlockName);
    }
    if name.contains(SOCKET_REF_SEPARATOR) {
        return Err(NetworkError::InvalidBlockName(name.to_string()));
    }
    Ok(())
}

fn check_unique_socket_names(block: &Block) -> Result<()> {
    let mut seen = HashSet::new();
    for socket in &block.sockets {
        if !seen.insert(socket.name.as_str()) {
            return Err(NetworkError::DuplicateSocketName {
                block: block.name.clone(),
                socket: socket.name.clone(),
            });
        }
    }
    Ok(())
}

/// Vergleicht eine flache Referenz (getrimmt) mit einer zerlegten.
fn refers_to(flat_name: &str, socket_ref: &SocketRef) -> bool {
    SocketRef::parse(flat_name).is_ok_and(|r| &r == socket_ref)
}

fn rewrite_block_ref(flat_name: &mut String, old_block: &str, new_block: &str) {
    if let Ok(socket_ref) = SocketRef::parse(flat_name) {
        if socket_ref.block == old_block {
            *flat_name = SocketRef::new(new_block, socket_ref.socket).flat_name();
        }
    }
}
