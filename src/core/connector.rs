//! Repräsentiert eine orthogonale Verbindung zwischen Ausgang und Eingang.

use super::geometry::{GridLine, Orientation};
use super::socket_ref::SocketRef;
use glam::DVec2;

/// Standard-Linienstaerke eines Connectors.
pub const CONNECTOR_LINE_WIDTH: f64 = 0.8;
/// Standard-Farbe eines Connectors (RGBA: Schwarz).
pub const CONNECTOR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Achsparalleles Teilstueck eines Connector-Pfads
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Achse
    pub direction: Orientation,
    /// Vorzeichenbehaftete Laenge entlang der Achse
    pub offset: f64,
}

impl Segment {
    /// Erstellt ein neues Segment
    pub fn new(direction: Orientation, offset: f64) -> Self {
        Self { direction, offset }
    }

    /// Horizontales Segment
    pub fn horizontal(offset: f64) -> Self {
        Self::new(Orientation::Horizontal, offset)
    }

    /// Vertikales Segment
    pub fn vertical(offset: f64) -> Self {
        Self::new(Orientation::Vertical, offset)
    }

    /// Verschiebung, die dieses Segment zum Pfad beitraegt.
    pub fn vector(&self) -> DVec2 {
        self.direction.offset_vector(self.offset)
    }
}

/// Eine Verbindung zwischen zwei Sockets
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    /// Anzeigename
    pub name: String,
    /// Quelle als `block.socket` (Ausgang)
    pub source: String,
    /// Ziel als `block.socket` (Eingang)
    pub target: String,
    /// Segmente zwischen Start- und End-Verlaengerungslinie
    pub segments: Vec<Segment>,
    /// Beschriftung (am mittleren Segment)
    pub text: String,
    /// Linienstaerke
    pub line_width: f64,
    /// Linienfarbe (RGBA)
    pub color: [f32; 4],
}

impl Connector {
    /// Erstellt einen Connector ohne Segmente
    pub fn new(
        name: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            target: target.into(),
            segments: Vec::new(),
            text: String::new(),
            line_width: CONNECTOR_LINE_WIDTH,
            color: CONNECTOR_COLOR,
        }
    }

    /// Summe aller Segment-Verschiebungen (x: horizontal, y: vertikal).
    pub fn total_offset(&self) -> DVec2 {
        self.segments.iter().map(Segment::vector).sum()
    }

    /// Endpunkt des Pfads, wenn er bei `start` beginnt.
    pub fn end_point(&self, start: DVec2) -> DVec2 {
        start + self.total_offset()
    }

    /// Linien aller Segmente, beginnend bei `start` (Ende der Start-Verlaengerung).
    pub fn segment_lines(&self, start: DVec2) -> Vec<GridLine> {
        let mut current = start;
        self.segments
            .iter()
            .map(|segment| {
                let next = current + segment.vector();
                let line = GridLine::new(current, next);
                current = next;
                line
            })
            .collect()
    }

    /// Index des Segments, an dem die Beschriftung steht.
    pub fn central_segment_index(&self) -> usize {
        let count = self.segments.len();
        if count <= 2 {
            0
        } else {
            (count - 2) / 2 + 1
        }
    }

    /// True, wenn der Connector den Block `block` (per Name) beruehrt.
    pub fn touches_block(&self, block: &str) -> bool {
        SocketRef::refers_to_block(&self.source, block)
            || SocketRef::refers_to_block(&self.target, block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_lines_chain_from_start() {
        let mut con = Connector::new("c", "A.out", "B.in");
        con.segments = vec![
            Segment::horizontal(24.0),
            Segment::vertical(-16.0),
            Segment::horizontal(8.0),
        ];
        let lines = con.segment_lines(DVec2::new(10.0, 10.0));

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], GridLine::new(DVec2::new(10.0, 10.0), DVec2::new(34.0, 10.0)));
        assert_eq!(lines[1].p2, DVec2::new(34.0, -6.0));
        assert_eq!(lines[2].p2, DVec2::new(42.0, -6.0));
        assert_eq!(con.end_point(DVec2::new(10.0, 10.0)), DVec2::new(42.0, -6.0));
    }

    #[test]
    fn central_segment_for_label() {
        let mut con = Connector::new("c", "A.out", "B.in");
        assert_eq!(con.central_segment_index(), 0);
        con.segments = vec![Segment::horizontal(8.0); 2];
        assert_eq!(con.central_segment_index(), 0);
        con.segments = vec![Segment::horizontal(8.0); 3];
        assert_eq!(con.central_segment_index(), 1);
        con.segments = vec![Segment::horizontal(8.0); 6];
        assert_eq!(con.central_segment_index(), 3);
    }

    #[test]
    fn new_connector_uses_default_style() {
        let con = Connector::new("c", "A.out", "B.in");
        assert_eq!(con.line_width, CONNECTOR_LINE_WIDTH);
        assert_eq!(con.color, CONNECTOR_COLOR);
        assert!(con.touches_block("A"));
        assert!(con.touches_block("B"));
        assert!(!con.touches_block("C"));
    }
}
