//! Segment-Bearbeitung: interaktives Verschieben und Zusammenfassen.
//!
//! Beide Operationen arbeiten nur auf der Segmentliste eines Connectors.
//! Sie halten die Summe der horizontalen und vertikalen Offsets konstant,
//! damit der Pfad weiterhin zwischen den beiden Verlaengerungslinien schliesst.

use super::connector::{Connector, Segment};
use super::error::{NetworkError, Result};
use super::geometry::{near_zero, Orientation};
use glam::DVec2;

/// Adresse eines Pfadstuecks, wie sie die Darstellung verwendet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentRef {
    /// Verlaengerungslinie am Quell-Socket (fest)
    StartLine,
    /// Verlaengerungslinie am Ziel-Socket (fest)
    EndLine,
    /// Verschiebbares Segment mit Index in `Connector::segments`
    Middle(usize),
}

impl SegmentRef {
    /// Index fuer verschiebbare Segmente, sonst `None`.
    pub fn middle_index(self) -> Option<usize> {
        match self {
            SegmentRef::Middle(index) => Some(index),
            SegmentRef::StartLine | SegmentRef::EndLine => None,
        }
    }
}

/// Ergebnis von [`merge_segments`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentMerge {
    /// Alter Index → neuer Index (`None`: Segment entfernt oder eingefaltet)
    pub index_map: Vec<Option<usize>>,
    /// True, wenn sich die Segmentliste geaendert hat
    pub changed: bool,
}

impl SegmentMerge {
    /// Neuer Index eines Segments nach dem Zusammenfassen.
    pub fn new_index(&self, old_index: usize) -> Option<usize> {
        self.index_map.get(old_index).copied().flatten()
    }
}

/// Verschiebt ein mittleres Segment um `delta` und repariert die Topologie.
///
/// Links vom Segment nimmt jeweils das naechste Segment gleicher Achse die
/// Verschiebung auf; bleibt etwas uebrig, nimmt es das Segment selbst auf
/// (gleiche Achse) oder es wird direkt davor ein neues Segment eingefuegt.
/// Rechts wird mit umgekehrtem Vorzeichen ausgeglichen, Reste werden am
/// Ende angehaengt. Liefert den (ggf. verschobenen) Index des Segments.
pub fn move_segment(connector: &mut Connector, segment: SegmentRef, delta: DVec2) -> Result<usize> {
    let mut index = segment
        .middle_index()
        .ok_or(NetworkError::SegmentNotDraggable)?;
    let segments = &mut connector.segments;
    if index >= segments.len() {
        return Err(NetworkError::SegmentOutOfRange {
            index,
            len: segments.len(),
        });
    }

    // Links: naechstes Segment gleicher Achse uebernimmt die Verschiebung
    let mut pending = delta;
    for segment in segments[..index].iter_mut().rev() {
        if near_zero(pending.x) && near_zero(pending.y) {
            break;
        }
        absorb(segment, &mut pending, 1.0);
    }

    for direction in [Orientation::Horizontal, Orientation::Vertical] {
        let amount = axis_component(pending, direction);
        if near_zero(amount) {
            continue;
        }
        if segments[index].direction == direction {
            segments[index].offset += amount;
        } else {
            segments.insert(index, Segment::new(direction, amount));
            index += 1;
        }
    }

    // Rechts: Ausgleich mit umgekehrtem Vorzeichen
    let mut pending = delta;
    for segment in segments[index + 1..].iter_mut() {
        if near_zero(pending.x) && near_zero(pending.y) {
            break;
        }
        absorb(segment, &mut pending, -1.0);
    }

    for direction in [Orientation::Horizontal, Orientation::Vertical] {
        let amount = axis_component(pending, direction);
        if !near_zero(amount) {
            segments.push(Segment::new(direction, -amount));
        }
    }

    Ok(index)
}

/// Uebertraegt den passenden Anteil von `pending` auf `segment` und setzt ihn auf Null.
fn absorb(segment: &mut Segment, pending: &mut DVec2, sign: f64) {
    match segment.direction {
        Orientation::Horizontal if !near_zero(pending.x) => {
            segment.offset += sign * pending.x;
            pending.x = 0.0;
        }
        Orientation::Vertical if !near_zero(pending.y) => {
            segment.offset += sign * pending.y;
            pending.y = 0.0;
        }
        _ => {}
    }
}

fn axis_component(v: DVec2, direction: Orientation) -> f64 {
    match direction {
        Orientation::Horizontal => v.x,
        Orientation::Vertical => v.y,
    }
}

/// Fasst benachbarte Segmente gleicher Achse zusammen und entfernt Null-Segmente.
///
/// Wiederholt den Durchlauf von vorne, bis sich nichts mehr aendert.
pub fn merge_segments(connector: &mut Connector) -> SegmentMerge {
    let segments = &mut connector.segments;
    let original_len = segments.len();
    // origin[i] = urspruenglicher Index des Segments an Position i
    let mut origin: Vec<usize> = (0..original_len).collect();
    let mut changed = false;

    loop {
        let mut fold_at = None;
        let mut remove_at = None;
        for i in 0..segments.len() {
            if i > 0 && segments[i - 1].direction == segments[i].direction {
                fold_at = Some(i);
                break;
            }
            if near_zero(segments[i].offset) {
                remove_at = Some(i);
                break;
            }
        }

        if let Some(i) = fold_at {
            segments[i - 1].offset += segments[i].offset;
            segments.remove(i);
            origin.remove(i);
        } else if let Some(i) = remove_at {
            segments.remove(i);
            origin.remove(i);
        } else {
            break;
        }
        changed = true;
    }

    let mut index_map = vec![None; original_len];
    for (new_index, old_index) in origin.into_iter().enumerate() {
        index_map[old_index] = Some(new_index);
    }

    if changed {
        log::debug!(
            "Connector '{}': {} -> {} Segmente",
            connector.name,
            original_len,
            connector.segments.len()
        );
    }

    SegmentMerge { index_map, changed }
}

/// True, wenn keine Nachbarn gleicher Achse und keine Null-Segmente existieren.
pub fn is_normalized(segments: &[Segment]) -> bool {
    segments.iter().all(|s| !near_zero(s.offset))
        && segments.windows(2).all(|w| w[0].direction != w[1].direction)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connector(segments: Vec<Segment>) -> Connector {
        let mut con = Connector::new("c", "A.out", "B.in");
        con.segments = segments;
        con
    }

    #[test]
    fn extension_lines_are_not_draggable() {
        let mut con = connector(vec![Segment::horizontal(8.0)]);
        for fixed in [SegmentRef::StartLine, SegmentRef::EndLine] {
            let err = move_segment(&mut con, fixed, DVec2::new(8.0, 0.0)).expect_err("fest");
            assert_eq!(err, NetworkError::SegmentNotDraggable);
        }
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut con = connector(vec![Segment::horizontal(8.0)]);
        let err = move_segment(&mut con, SegmentRef::Middle(3), DVec2::new(8.0, 0.0))
            .expect_err("ausserhalb");
        assert_eq!(err, NetworkError::SegmentOutOfRange { index: 3, len: 1 });
    }

    #[test]
    fn perpendicular_drag_is_absorbed_by_neighbours() {
        let mut con = connector(vec![
            Segment::horizontal(40.0),
            Segment::vertical(24.0),
            Segment::horizontal(40.0),
        ]);
        let index = move_segment(&mut con, SegmentRef::Middle(1), DVec2::new(8.0, 0.0))
            .expect("verschiebbar");

        assert_eq!(index, 1);
        assert_eq!(
            con.segments,
            vec![
                Segment::horizontal(48.0),
                Segment::vertical(24.0),
                Segment::horizontal(32.0),
            ]
        );
    }

    #[test]
    fn drag_without_neighbours_inserts_before_and_appends() {
        let mut con = connector(vec![Segment::vertical(24.0)]);
        let index = move_segment(&mut con, SegmentRef::Middle(0), DVec2::new(8.0, 0.0))
            .expect("verschiebbar");

        assert_eq!(index, 1);
        assert_eq!(
            con.segments,
            vec![
                Segment::horizontal(8.0),
                Segment::vertical(24.0),
                Segment::horizontal(-8.0),
            ]
        );
    }

    #[test]
    fn insert_goes_directly_before_dragged_segment() {
        let mut con = connector(vec![
            Segment::vertical(16.0),
            Segment::vertical(8.0),
            Segment::horizontal(32.0),
        ]);
        // kein horizontales Segment links von Index 1
        let index = move_segment(&mut con, SegmentRef::Middle(1), DVec2::new(8.0, 0.0))
            .expect("verschiebbar");

        assert_eq!(index, 2);
        assert_eq!(
            con.segments,
            vec![
                Segment::vertical(16.0),
                Segment::horizontal(8.0),
                Segment::vertical(8.0),
                Segment::horizontal(24.0),
            ]
        );
    }

    #[test]
    fn diagonal_drag_uses_own_axis_and_appends() {
        let mut con = connector(vec![
            Segment::horizontal(40.0),
            Segment::vertical(24.0),
            Segment::horizontal(40.0),
        ]);
        move_segment(&mut con, SegmentRef::Middle(1), DVec2::new(8.0, 8.0)).expect("ok");

        assert_eq!(
            con.segments,
            vec![
                Segment::horizontal(48.0),
                Segment::vertical(32.0),
                Segment::horizontal(32.0),
                Segment::vertical(-8.0),
            ]
        );
    }

    #[test]
    fn merge_folds_same_direction_and_drops_zero() {
        let mut con = connector(vec![
            Segment::horizontal(8.0),
            Segment::horizontal(16.0),
            Segment::vertical(0.0),
            Segment::horizontal(8.0),
            Segment::vertical(-24.0),
        ]);
        let merge = merge_segments(&mut con);

        assert!(merge.changed);
        assert_eq!(
            con.segments,
            vec![Segment::horizontal(32.0), Segment::vertical(-24.0)]
        );
        assert_eq!(
            merge.index_map,
            vec![Some(0), None, None, None, Some(1)]
        );
    }

    #[test]
    fn merge_reindexes_after_head_and_tail_removal() {
        let mut con = connector(vec![
            Segment::vertical(0.0),
            Segment::horizontal(16.0),
            Segment::vertical(8.0),
            Segment::horizontal(0.0),
        ]);
        let merge = merge_segments(&mut con);

        assert_eq!(con.segments, vec![Segment::horizontal(16.0), Segment::vertical(8.0)]);
        assert_eq!(merge.new_index(0), None);
        assert_eq!(merge.new_index(1), Some(0));
        assert_eq!(merge.new_index(2), Some(1));
        assert_eq!(merge.new_index(3), None);
    }

    #[test]
    fn merge_of_cancelling_pair_removes_both() {
        let mut con = connector(vec![
            Segment::vertical(8.0),
            Segment::vertical(-8.0),
            Segment::horizontal(16.0),
        ]);
        merge_segments(&mut con);
        assert_eq!(con.segments, vec![Segment::horizontal(16.0)]);
    }

    #[test]
    fn merge_is_a_fixed_point() {
        let mut con = connector(vec![
            Segment::horizontal(16.0),
            Segment::vertical(8.0),
            Segment::horizontal(-8.0),
        ]);
        let merge = merge_segments(&mut con);
        assert!(!merge.changed);
        assert_eq!(merge.index_map, vec![Some(0), Some(1), Some(2)]);
    }
}
