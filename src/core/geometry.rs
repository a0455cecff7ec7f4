//! Geometrie-Grundtypen: Raster, achsparallele Linien, Orientierung.

use glam::DVec2;

/// Rasterabstand in Szenen-Einheiten. Alle platzierten Geometrien liegen auf Vielfachen davon.
pub const GRID_SPACING: f64 = 8.0;

/// Relative Toleranz (bezogen auf eine Rasterzelle) fuer Null-Vergleiche.
const GRID_EPSILON: f64 = 1e-6;

/// Prueft, ob eine Distanz (relativ zum Raster) praktisch Null ist.
///
/// Faengt Rundungsfehler aus Gleitkomma-Rechnungen ab.
pub fn near_zero(grid_distance: f64) -> bool {
    (grid_distance / GRID_SPACING).abs() < GRID_EPSILON
}

/// Vergleicht zwei Werte mit Raster-Toleranz.
pub fn near_equal(a: f64, b: f64) -> bool {
    near_zero(a - b)
}

/// Rundet einen Punkt auf den naechsten Rasterpunkt (Block-Verschiebung).
pub fn snap_to_grid(point: DVec2) -> DVec2 {
    DVec2::new(
        ((point.x + 0.5 * GRID_SPACING) / GRID_SPACING).floor() * GRID_SPACING,
        ((point.y + 0.5 * GRID_SPACING) / GRID_SPACING).floor() * GRID_SPACING,
    )
}

/// Schneidet einen Punkt auf das Raster ab (Richtung Null), wie beim Segment-Ziehen.
pub fn truncate_to_grid(point: DVec2) -> DVec2 {
    DVec2::new(
        (point.x / GRID_SPACING).trunc() * GRID_SPACING,
        (point.y / GRID_SPACING).trunc() * GRID_SPACING,
    )
}

/// Achse eines Sockets oder Segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Horizontal (links/rechts)
    #[default]
    Horizontal,
    /// Vertikal (oben/unten)
    Vertical,
}

impl Orientation {
    /// Name wie im XML-Format.
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Horizontal => "Horizontal",
            Orientation::Vertical => "Vertical",
        }
    }

    /// Parst den XML-Namen; unbekannte Werte liefern `None`.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "Horizontal" => Some(Orientation::Horizontal),
            "Vertical" => Some(Orientation::Vertical),
            _ => None,
        }
    }

    /// Verschiebungsvektor fuer einen vorzeichenbehafteten Offset entlang dieser Achse.
    pub fn offset_vector(self, offset: f64) -> DVec2 {
        match self {
            Orientation::Horizontal => DVec2::new(offset, 0.0),
            Orientation::Vertical => DVec2::new(0.0, offset),
        }
    }
}

/// Achsparalleles Linienstueck in Szenen-Koordinaten.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GridLine {
    /// Startpunkt
    pub p1: DVec2,
    /// Endpunkt
    pub p2: DVec2,
}

impl GridLine {
    /// Erstellt eine neue Linie.
    pub fn new(p1: DVec2, p2: DVec2) -> Self {
        Self { p1, p2 }
    }

    /// Linie der Laenge Null an einem Punkt.
    pub fn point(p: DVec2) -> Self {
        Self { p1: p, p2: p }
    }

    /// Horizontale Ausdehnung (vorzeichenbehaftet).
    pub fn dx(&self) -> f64 {
        self.p2.x - self.p1.x
    }

    /// Vertikale Ausdehnung (vorzeichenbehaftet).
    pub fn dy(&self) -> f64 {
        self.p2.y - self.p1.y
    }

    /// Euklidische Laenge.
    pub fn length(&self) -> f64 {
        self.p1.distance(self.p2)
    }

    /// True, wenn Start- und Endpunkt zusammenfallen.
    pub fn is_null(&self) -> bool {
        near_zero(self.length())
    }
}

/// Vergleicht zwei Punkte mit Raster-Toleranz.
pub fn points_near_equal(a: DVec2, b: DVec2) -> bool {
    near_equal(a.x, b.x) && near_equal(a.y, b.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn near_zero_is_grid_relative() {
        assert!(near_zero(0.0));
        assert!(near_zero(1e-7));
        assert!(!near_zero(1e-3));
        assert!(!near_zero(-GRID_SPACING));
    }

    #[test]
    fn snap_rounds_to_nearest_grid_point() {
        assert_eq!(snap_to_grid(DVec2::new(3.9, 4.1)), DVec2::new(0.0, 8.0));
        assert_eq!(snap_to_grid(DVec2::new(-3.9, 12.0)), DVec2::new(0.0, 16.0));
        assert_eq!(snap_to_grid(DVec2::new(-4.1, 0.0)), DVec2::new(-8.0, 0.0));
    }

    #[test]
    fn truncate_cuts_towards_zero() {
        assert_eq!(
            truncate_to_grid(DVec2::new(15.9, -15.9)),
            DVec2::new(8.0, -8.0)
        );
    }

    #[test]
    fn orientation_parse_roundtrip() {
        for o in [Orientation::Horizontal, Orientation::Vertical] {
            assert_eq!(Orientation::parse(o.as_str()), Some(o));
        }
        assert_eq!(Orientation::parse("Diagonal"), None);
    }

    #[test]
    fn grid_line_metrics() {
        let line = GridLine::new(DVec2::new(0.0, 0.0), DVec2::new(0.0, -16.0));
        assert_eq!(line.dx(), 0.0);
        assert_eq!(line.dy(), -16.0);
        assert_eq!(line.length(), 16.0);
        assert!(GridLine::point(DVec2::new(3.0, 4.0)).is_null());
    }
}
