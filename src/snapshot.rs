//! Save/load of the whole session as a JSON document.
//!
//! The document layout is shared with hosts that were writing it before
//! this crate existed, so the reader is lenient: multipliers and dice
//! inputs may arrive as numbers or strings, wheel items may arrive as a
//! single newline-separated string, and unknown tab types are skipped.
//! A document that does not parse at all is rejected before the live
//! session is touched.

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod snapshot_test;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::chip::{Chip, parse_multiplier};
use crate::dice::{DiceRoller, DiceSettings};
use crate::session::{Session, TabKind, Widget};
use crate::wheel::Wheel;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("invalid session document: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("failed to encode session: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Root of the persisted document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDocument {
    #[serde(default)]
    pub tabs: Vec<TabSnapshot>,
    #[serde(default)]
    pub active_tab_id: Option<String>,
}

/// One saved tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabSnapshot {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: SnapshotKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<SavedItems>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dice_count: Option<NumberOrText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dice_sides: Option<NumberOrText>,
}

/// The `type` field. Anything missing or unrecognized reads as `Unknown`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotKind {
    Wheel,
    Dice,
    #[default]
    #[serde(other)]
    Unknown,
}

impl From<TabKind> for SnapshotKind {
    fn from(kind: TabKind) -> Self {
        match kind {
            TabKind::Wheel => Self::Wheel,
            TabKind::Dice => Self::Dice,
        }
    }
}

/// Wheel items: the current list form, or the legacy one-chip-per-line text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SavedItems {
    List(Vec<SavedChip>),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedChip {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub multiplier: Option<NumberOrText>,
}

/// A numeric field that older writers stored as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Int(u64),
    Float(f64),
    Text(String),
}

impl NumberOrText {
    fn to_input(&self) -> String {
        match self {
            Self::Int(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => s.clone(),
        }
    }

    fn multiplier(&self) -> u32 {
        match self {
            Self::Int(n) => u32::try_from(*n).unwrap_or(u32::MAX),
            Self::Float(_) | Self::Text(_) => parse_multiplier(&self.to_input()).unwrap_or(1),
        }
    }
}

// =============================================================================
// Save
// =============================================================================

/// Describe every open tab in display order.
#[must_use]
pub fn capture(session: &Session) -> SessionDocument {
    let tabs = session
        .tabs()
        .iter()
        .map(|tab| {
            let mut snap = TabSnapshot {
                id: tab.id.clone(),
                name: tab.name.clone(),
                kind: tab.widget.kind().into(),
                items: None,
                dice_count: None,
                dice_sides: None,
            };
            match &tab.widget {
                Widget::Wheel(wheel) => {
                    let chips = wheel
                        .chips()
                        .iter()
                        .map(|chip| SavedChip {
                            label: chip.label.clone(),
                            multiplier: Some(NumberOrText::Int(u64::from(chip.multiplier))),
                        })
                        .collect();
                    snap.items = Some(SavedItems::List(chips));
                }
                Widget::Dice(roller) => {
                    let settings = roller.settings();
                    snap.dice_count = Some(NumberOrText::Text(settings.count.to_string()));
                    snap.dice_sides = Some(NumberOrText::Text(settings.sides.to_string()));
                }
            }
            snap
        })
        .collect();

    SessionDocument { tabs, active_tab_id: session.active_id().map(str::to_owned) }
}

/// Serialize the session as two-space indented JSON.
///
/// # Errors
///
/// Returns [`SnapshotError::Encode`] if serialization fails.
pub fn save_json(session: &Session) -> Result<String, SnapshotError> {
    serde_json::to_string_pretty(&capture(session)).map_err(SnapshotError::Encode)
}

// =============================================================================
// Load
// =============================================================================

/// Parse a saved document.
///
/// # Errors
///
/// Returns [`SnapshotError::Parse`] for malformed JSON or a document of the
/// wrong shape.
pub fn parse(text: &str) -> Result<SessionDocument, SnapshotError> {
    serde_json::from_str(text).map_err(SnapshotError::Parse)
}

/// Build a fresh session from `doc`, sharing `like`'s settings.
pub fn restore<R: Rng + ?Sized>(like: &Session, doc: &SessionDocument, rng: &mut R) -> Session {
    let mut session = like.empty_like();
    for snap in &doc.tabs {
        session.reserve_id(&snap.id);
    }

    for (position, snap) in (1_u32..).zip(&doc.tabs) {
        let kind = match snap.kind {
            SnapshotKind::Wheel => TabKind::Wheel,
            SnapshotKind::Dice => TabKind::Dice,
            SnapshotKind::Unknown => {
                log::warn!("skipping tab {:?} of unknown type", snap.id);
                continue;
            }
        };

        let widget = match kind {
            TabKind::Wheel => Widget::Wheel(restore_wheel(&session, snap, rng)),
            TabKind::Dice => Widget::Dice(restore_dice(&session, snap)),
        };

        let id = if snap.id.trim().is_empty() { session.next_tab_id() } else { snap.id.clone() };
        let name = match snap.name.trim() {
            "" => kind.default_name(position),
            name => name.to_owned(),
        };
        if !session.insert_tab(id, name, widget) {
            log::warn!("skipping duplicate tab id {:?}", snap.id);
        }
    }

    session.activate_or_first(doc.active_tab_id.as_deref());
    session
}

fn restore_wheel<R: Rng + ?Sized>(session: &Session, snap: &TabSnapshot, rng: &mut R) -> Wheel {
    let chips: Vec<Chip> = match &snap.items {
        None => Vec::new(),
        Some(SavedItems::Text(text)) => text.lines().filter_map(Chip::parse).collect(),
        Some(SavedItems::List(items)) => items
            .iter()
            .filter(|item| !item.label.trim().is_empty())
            .map(|item| {
                let multiplier = item.multiplier.as_ref().map_or(1, NumberOrText::multiplier);
                Chip::new(item.label.trim(), multiplier)
            })
            .collect(),
    };
    Wheel::with_chips(session.spin_params(), chips, rng)
}

fn restore_dice(session: &Session, snap: &TabSnapshot) -> DiceRoller {
    let count = snap.dice_count.as_ref().map(NumberOrText::to_input).unwrap_or_default();
    let sides = snap.dice_sides.as_ref().map(NumberOrText::to_input).unwrap_or_default();
    DiceRoller::new(DiceSettings::from_inputs(&count, &sides), session.dice_timing())
}

/// Replace the session with the one described by `text`.
///
/// On error the session is left exactly as it was.
///
/// # Errors
///
/// Returns [`SnapshotError::Parse`] if `text` is not a valid document.
pub fn load_json<R: Rng + ?Sized>(session: &mut Session, text: &str, rng: &mut R) -> Result<(), SnapshotError> {
    let doc = parse(text).inspect_err(|e| log::error!("load failed: {e}"))?;
    let restored = restore(session, &doc, rng);
    log::info!("loaded {} tab(s)", restored.len());
    session.replace_with(restored);
    Ok(())
}
