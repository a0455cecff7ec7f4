//! Block mit Rechteck-Geometrie, Sockets und automatischem Socket-Layout.

use super::geometry::{near_equal, near_zero, GridLine, Orientation, GRID_SPACING};
use super::socket::{Socket, SocketDirection};
use glam::DVec2;
use indexmap::IndexMap;

/// Reservierter Name des unsichtbaren Hilfsblocks beim interaktiven Verbinden.
pub const HELPER_BLOCK_NAME: &str = "[(-I am invisible-)]";

/// Bekannte und offene Block-Eigenschaften
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockProperties {
    /// Pixmap anstelle des Rechtecks anzeigen (nur gesetzt, wenn in der Datei vorhanden)
    pub show_pixmap: Option<bool>,
    /// Unbekannte Eigenschaften in Original-Reihenfolge (fuer verlustfreies Speichern)
    pub extra: IndexMap<String, String>,
}

/// Freier Platz fuer einen neuen Socket am Block-Rand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SocketSlot {
    /// Block-lokale Position auf dem Rand
    pub position: DVec2,
    /// Passende Orientierung fuer diese Kante
    pub orientation: Orientation,
}

/// Ergebnis von [`Block::auto_update_sockets`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SocketLayoutReport {
    /// Neu angelegte Sockets (in Anlage-Reihenfolge)
    pub added: Vec<String>,
    /// Entfernte Sockets
    pub removed: Vec<String>,
    /// Sockets, fuer die kein freier Platz existierte (Notfall-Position, ggf. ueberlappend)
    pub forced: Vec<String>,
}

impl SocketLayoutReport {
    /// True, wenn mindestens ein Socket auf die Notfall-Position gesetzt wurde.
    pub fn is_degenerate(&self) -> bool {
        !self.forced.is_empty()
    }
}

/// Belegung der Rasterplaetze je Kante (Index = Zeile bzw. Spalte).
#[derive(Debug, Clone, PartialEq)]
pub struct SocketSpots {
    /// Linke Kante, je Zeile
    pub left: Vec<bool>,
    /// Obere Kante, je Spalte
    pub top: Vec<bool>,
    /// Rechte Kante, je Zeile
    pub right: Vec<bool>,
    /// Untere Kante, je Spalte
    pub bottom: Vec<bool>,
}

/// Ein Block im Netzwerk
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Name (eindeutig im Netzwerk, ohne '.')
    pub name: String,
    /// Position der linken oberen Ecke (Szenen-Koordinaten)
    pub position: DVec2,
    /// Breite (x) und Hoehe (y)
    pub size: DVec2,
    /// Sockets in Anlage-Reihenfolge
    pub sockets: Vec<Socket>,
    /// Zusatz-Eigenschaften
    pub properties: BlockProperties,
}

impl Block {
    /// Erstellt einen Block ohne Sockets
    pub fn new(name: impl Into<String>, position: DVec2, size: DVec2) -> Self {
        Self {
            name: name.into(),
            position,
            size,
            sockets: Vec::new(),
            properties: BlockProperties::default(),
        }
    }

    /// Erstellt den Hilfsblock fuer eine laufende Verbindung.
    ///
    /// Er besitzt genau einen horizontalen Eingang an (0,0); seine
    /// Verlaengerungslinie ist entartet (Laenge Null).
    pub fn connection_helper(position: DVec2, size: DVec2) -> Self {
        let mut block = Self::new(HELPER_BLOCK_NAME, position, size);
        block.sockets.push(Socket::new(
            HELPER_BLOCK_NAME,
            DVec2::ZERO,
            Orientation::Horizontal,
            true,
        ));
        block
    }

    /// True fuer den Hilfsblock einer laufenden Verbindung.
    pub fn is_connection_helper(&self) -> bool {
        self.name == HELPER_BLOCK_NAME
    }

    /// Breite
    pub fn width(&self) -> f64 {
        self.size.x
    }

    /// Hoehe
    pub fn height(&self) -> f64 {
        self.size.y
    }

    /// Findet einen Socket per Name
    pub fn socket(&self, name: &str) -> Option<&Socket> {
        self.sockets.iter().find(|s| s.name == name)
    }

    /// Index eines Sockets per Name
    pub fn socket_index(&self, name: &str) -> Option<usize> {
        self.sockets.iter().position(|s| s.name == name)
    }

    /// Alle Eingaenge (`inlet == true`) bzw. Ausgaenge.
    pub fn filter_sockets(&self, inlet: bool) -> impl Iterator<Item = &Socket> {
        self.sockets.iter().filter(move |s| s.inlet == inlet)
    }

    /// Anker eines Sockets in Szenen-Koordinaten.
    pub fn socket_anchor(&self, socket: &Socket) -> DVec2 {
        self.position + socket.position
    }

    /// Verlaengerungslinie eines Sockets: vom Anker zwei Rasterzellen nach aussen.
    ///
    /// Der Endpunkt `p2` ist der feste Start-/Endpunkt jedes Connector-Pfads.
    pub fn socket_start_line(&self, socket: &Socket) -> GridLine {
        let anchor = self.socket_anchor(socket);
        if self.is_connection_helper() {
            return GridLine::point(anchor);
        }
        let extension = socket.direction().outward() * (2.0 * GRID_SPACING);
        GridLine::new(anchor, anchor + extension)
    }

    /// Aendert die Groesse; Sockets am rechten/unteren Rand wandern mit.
    ///
    /// Sockets, die nach dem Verkleinern ueber das Kantenende hinausragen,
    /// werden auf das Kantenende gesetzt. Liefert deren Namen.
    pub fn resize(&mut self, width: f64, height: f64) -> Vec<String> {
        self.size = DVec2::new(width, height);
        let mut clamped = Vec::new();
        for socket in &mut self.sockets {
            let (along, extent) = match socket.orientation {
                Orientation::Horizontal => {
                    if !near_zero(socket.position.x) {
                        socket.position.x = width;
                    }
                    (&mut socket.position.y, height)
                }
                Orientation::Vertical => {
                    if !near_zero(socket.position.y) {
                        socket.position.y = height;
                    }
                    (&mut socket.position.x, width)
                }
            };
            if !within_edge(*along, extent) {
                *along = along.clamp(0.0, extent.max(0.0));
                clamped.push(socket.name.clone());
            }
        }
        if !clamped.is_empty() {
            log::warn!(
                "Block '{}': Socket(s) {:?} auf das Kantenende gesetzt",
                self.name,
                clamped
            );
        }
        clamped
    }

    /// Sucht einen Eingang, dessen Anker im Manhattan-Abstand `radius` um `scene_pos` liegt.
    pub fn inlet_socket_accepting_connection(&self, scene_pos: DVec2, radius: f64) -> Option<usize> {
        self.sockets.iter().position(|socket| {
            if !socket.inlet {
                return false;
            }
            let d = self.socket_anchor(socket) - scene_pos;
            d.x.abs() + d.y.abs() < radius
        })
    }

    /// Anzahl Rasterzeilen bzw. -spalten (gerundet).
    fn grid_counts(&self) -> (usize, usize) {
        (grid_count(self.height()), grid_count(self.width()))
    }

    /// Belegte Rasterplaetze je Kante aller vorhandenen Sockets.
    ///
    /// Eckplaetze (Index 0) werden nie als belegt markiert und nie vergeben.
    pub fn unused_socket_spots(&self) -> SocketSpots {
        let (row_count, col_count) = self.grid_counts();
        let mut spots = SocketSpots {
            left: vec![false; row_count],
            top: vec![false; col_count],
            right: vec![false; row_count],
            bottom: vec![false; col_count],
        };

        for socket in &self.sockets {
            let col = grid_index(socket.position.x);
            let row = grid_index(socket.position.y);
            let row_valid = row > 0 && (row as usize) < row_count;
            let col_valid = col > 0 && (col as usize) < col_count;

            if near_zero(socket.position.x) && row_valid {
                spots.left[row as usize] = true;
            } else if near_equal(socket.position.x, self.width()) && row_valid {
                spots.right[row as usize] = true;
            } else if near_zero(socket.position.y) && col_valid {
                spots.top[col as usize] = true;
            } else if near_equal(socket.position.y, self.height()) && col_valid {
                spots.bottom[col as usize] = true;
            }
        }

        spots
    }

    /// Freier Platz fuer einen manuell eingefuegten Socket.
    ///
    /// Bevorzugt die linke Kante (oben nach unten), dann die obere Kante
    /// (links nach rechts); sonst der letzte Platz der unteren Kante rechts.
    pub fn find_socket_insert_position(&self) -> SocketSlot {
        let spots = self.unused_socket_spots();

        if let Some(row) = first_free(&spots.left) {
            return SocketSlot {
                position: DVec2::new(0.0, row as f64 * GRID_SPACING),
                orientation: Orientation::Horizontal,
            };
        }
        if let Some(col) = first_free(&spots.top) {
            return SocketSlot {
                position: DVec2::new(col as f64 * GRID_SPACING, 0.0),
                orientation: Orientation::Vertical,
            };
        }
        SocketSlot {
            position: DVec2::new((self.width() - GRID_SPACING).max(0.0), self.height()),
            orientation: Orientation::Vertical,
        }
    }

    /// Gleicht die Sockets mit den geforderten Ein-/Ausgangsnamen ab.
    ///
    /// Vorhandene Sockets mit passendem Namen und passender Polaritaet bleiben
    /// unveraendert; alle anderen entfallen. Fehlende Sockets werden angelegt:
    /// Eingaenge links, dann oben; Ausgaenge rechts, dann unten. Ist kein Platz
    /// frei, landet der Socket auf `breite - raster` oben (Eingang) bzw. unten
    /// (Ausgang) und wird im Report als `forced` gemeldet.
    ///
    /// Die Suche beginnt je Kante bei Rasterplatz 1, nicht 0: der Eckplatz
    /// bleibt frei, der erste Eingang eines leeren Blocks landet also auf
    /// (0, raster) und nicht auf (0, 0).
    pub fn auto_update_sockets<S: AsRef<str>>(
        &mut self,
        inlet_names: &[S],
        outlet_names: &[S],
    ) -> SocketLayoutReport {
        let is_inlet_name = |name: &str| inlet_names.iter().any(|n| n.as_ref() == name);
        let is_outlet_name = |name: &str| outlet_names.iter().any(|n| n.as_ref() == name);

        let mut report = SocketLayoutReport::default();
        let (kept, removed): (Vec<Socket>, Vec<Socket>) =
            std::mem::take(&mut self.sockets).into_iter().partition(|s| {
                if s.inlet {
                    is_inlet_name(&s.name)
                } else {
                    is_outlet_name(&s.name)
                }
            });
        self.sockets = kept;
        report.removed = removed.into_iter().map(|s| s.name).collect();

        let mut spots = self.unused_socket_spots();

        let required = inlet_names
            .iter()
            .map(|n| n.as_ref())
            .chain(outlet_names.iter().map(|n| n.as_ref()));

        for name in required {
            if self.socket(name).is_some() {
                continue;
            }
            let inlet = is_inlet_name(name);
            let (row_spots, col_spots) = if inlet {
                (&mut spots.left, &mut spots.top)
            } else {
                (&mut spots.right, &mut spots.bottom)
            };

            let socket = if let Some(row) = first_free(row_spots) {
                row_spots[row] = true;
                let x = if inlet { 0.0 } else { self.width() };
                Socket::new(
                    name,
                    DVec2::new(x, row as f64 * GRID_SPACING),
                    Orientation::Horizontal,
                    inlet,
                )
            } else if let Some(col) = first_free(col_spots) {
                col_spots[col] = true;
                let y = if inlet { 0.0 } else { self.height() };
                Socket::new(
                    name,
                    DVec2::new(col as f64 * GRID_SPACING, y),
                    Orientation::Vertical,
                    inlet,
                )
            } else {
                let y = if inlet { 0.0 } else { self.height() };
                log::warn!(
                    "Block '{}': kein freier Platz fuer Socket '{}', Notfall-Position",
                    self.name,
                    name
                );
                report.forced.push(name.to_string());
                Socket::new(
                    name,
                    DVec2::new((self.width() - GRID_SPACING).max(0.0), y),
                    Orientation::Vertical,
                    inlet,
                )
            };

            report.added.push(socket.name.clone());
            self.sockets.push(socket);
        }

        report
    }

    /// Namen aller Sockets, die auf derselben Position wie ein frueherer Socket liegen.
    pub fn overlapping_sockets(&self) -> Vec<String> {
        self.sockets
            .iter()
            .enumerate()
            .filter(|(i, socket)| {
                self.sockets[..*i].iter().any(|other| {
                    near_equal(other.position.x, socket.position.x)
                        && near_equal(other.position.y, socket.position.y)
                })
            })
            .map(|(_, socket)| socket.name.clone())
            .collect()
    }

    /// Prueft, ob jeder Socket auf dem Block-Rand liegt (Kante und Kantenbereich).
    pub fn sockets_on_boundary(&self) -> bool {
        self.sockets.iter().all(|s| match s.direction() {
            SocketDirection::Left => {
                near_zero(s.position.x) && within_edge(s.position.y, self.height())
            }
            SocketDirection::Right => {
                near_equal(s.position.x, self.width()) && within_edge(s.position.y, self.height())
            }
            SocketDirection::Top => {
                near_zero(s.position.y) && within_edge(s.position.x, self.width())
            }
            SocketDirection::Bottom => {
                near_equal(s.position.y, self.height()) && within_edge(s.position.x, self.width())
            }
        })
    }
}

/// Liegt die Koordinate (mit Raster-Toleranz) in `0..=extent`?
fn within_edge(coordinate: f64, extent: f64) -> bool {
    (coordinate >= 0.0 || near_zero(coordinate))
        && (coordinate <= extent || near_equal(coordinate, extent))
}

/// Anzahl ganzer Rasterzellen einer Ausdehnung (kaufmaennisch gerundet).
fn grid_count(extent: f64) -> usize {
    ((extent / GRID_SPACING) + 0.5).floor().max(0.0) as usize
}

/// Rasterindex einer Koordinate (gerundet).
fn grid_index(coordinate: f64) -> i64 {
    ((coordinate / GRID_SPACING) + 0.5).floor() as i64
}

/// Erster freier Platz ohne Eckplatz (Index 0).
fn first_free(spots: &[bool]) -> Option<usize> {
    spots
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, used)| !**used)
        .map(|(i, _)| i)
}
