//! Text-Werte des BlockMod-Formats: Punkte, Wahrheitswerte, Orientierungen, Zahlen.

use crate::core::Orientation;
use anyhow::{bail, Context, Result};
use glam::DVec2;

/// Parst einen Punkt im Format `x,y`.
pub(super) fn parse_point(text: &str) -> Result<DVec2> {
    let Some((x, y)) = text.split_once(',') else {
        bail!(
            "Ungueltiger Punkt '{}', erwartet 'x,y'",
            truncate_for_error(text)
        );
    };
    let x = parse_float(x).context("Fehler beim Parsen der X-Koordinate")?;
    let y = parse_float(y).context("Fehler beim Parsen der Y-Koordinate")?;
    Ok(DVec2::new(x, y))
}

/// Parst eine endliche Gleitkommazahl.
pub(super) fn parse_float(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    let value = trimmed.parse::<f64>().with_context(|| {
        format!(
            "Wert '{}' konnte nicht geparst werden",
            truncate_for_error(trimmed)
        )
    })?;
    if !value.is_finite() {
        bail!("Wert '{}' muss endlich sein", truncate_for_error(trimmed));
    }
    Ok(value)
}

/// Parst `true` / `false` (strikt).
pub(super) fn parse_bool(text: &str) -> Result<bool> {
    match text.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => bail!(
            "Ungueltiger Wahrheitswert '{}', erwartet 'true' oder 'false'",
            truncate_for_error(other)
        ),
    }
}

/// Parst `Horizontal` / `Vertical`.
pub(super) fn parse_orientation(text: &str) -> Result<Orientation> {
    Orientation::parse(text.trim()).with_context(|| {
        format!(
            "Ungueltige Orientierung '{}', erwartet 'Horizontal' oder 'Vertical'",
            truncate_for_error(text.trim())
        )
    })
}

/// Kürzt einen String für Fehlermeldungen auf max. 40 Zeichen
fn truncate_for_error(s: &str) -> &str {
    match s.char_indices().nth(40) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}
