//! Repräsentiert einen Anschlusspunkt (Socket) am Rand eines Blocks.

use super::geometry::{near_zero, Orientation};
use glam::DVec2;

/// Seite des Blocks, von der ein Socket nach aussen zeigt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketDirection {
    /// Linker Rand, Verlaengerung nach links
    Left,
    /// Rechter Rand, Verlaengerung nach rechts
    Right,
    /// Oberer Rand, Verlaengerung nach oben
    Top,
    /// Unterer Rand, Verlaengerung nach unten
    Bottom,
}

impl SocketDirection {
    /// Einheitsvektor nach aussen (Szenen-Koordinaten, y waechst nach unten).
    pub fn outward(self) -> DVec2 {
        match self {
            SocketDirection::Left => DVec2::new(-1.0, 0.0),
            SocketDirection::Right => DVec2::new(1.0, 0.0),
            SocketDirection::Top => DVec2::new(0.0, -1.0),
            SocketDirection::Bottom => DVec2::new(0.0, 1.0),
        }
    }
}

/// Benannter Anschlusspunkt eines Blocks
#[derive(Debug, Clone, PartialEq)]
pub struct Socket {
    /// Name (eindeutig innerhalb des Blocks)
    pub name: String,
    /// Position relativ zur linken oberen Block-Ecke
    pub position: DVec2,
    /// Achse der Verlaengerungslinie
    pub orientation: Orientation,
    /// Eingang (true) oder Ausgang (false)
    pub inlet: bool,
}

impl Socket {
    /// Erstellt einen neuen Socket
    pub fn new(
        name: impl Into<String>,
        position: DVec2,
        orientation: Orientation,
        inlet: bool,
    ) -> Self {
        Self {
            name: name.into(),
            position,
            orientation,
            inlet,
        }
    }

    /// Leitet die Richtung aus Orientierung und Position ab.
    ///
    /// Horizontal mit x == 0 zeigt nach links, sonst nach rechts;
    /// vertikal mit y == 0 nach oben, sonst nach unten.
    pub fn direction(&self) -> SocketDirection {
        match self.orientation {
            Orientation::Horizontal => {
                if near_zero(self.position.x) {
                    SocketDirection::Left
                } else {
                    SocketDirection::Right
                }
            }
            Orientation::Vertical => {
                if near_zero(self.position.y) {
                    SocketDirection::Top
                } else {
                    SocketDirection::Bottom
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_follows_orientation_and_zero_coordinate() {
        let cases = [
            (Orientation::Horizontal, DVec2::new(0.0, 16.0), SocketDirection::Left),
            (Orientation::Horizontal, DVec2::new(64.0, 16.0), SocketDirection::Right),
            (Orientation::Vertical, DVec2::new(16.0, 0.0), SocketDirection::Top),
            (Orientation::Vertical, DVec2::new(16.0, 40.0), SocketDirection::Bottom),
        ];
        for (orientation, position, expected) in cases {
            let socket = Socket::new("s", position, orientation, true);
            assert_eq!(socket.direction(), expected, "{orientation:?} @ {position}");
        }
    }

    #[test]
    fn direction_ignores_polarity() {
        let inlet = Socket::new("a", DVec2::new(0.0, 8.0), Orientation::Horizontal, true);
        let outlet = Socket::new("a", DVec2::new(0.0, 8.0), Orientation::Horizontal, false);
        assert_eq!(inlet.direction(), outlet.direction());
    }
}
