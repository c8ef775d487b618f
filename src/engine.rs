use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::chip::Chip;
use crate::config::Settings;
use crate::dice::{DiceFrame, DiceRoll, DiceSettings};
use crate::sector::Sector;
use crate::session::{Session, TabId, TabKind, Widget};
use crate::snapshot::{self, SnapshotError};
use crate::wheel::{ButtonFace, SpinOutcome, SpinResult};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Tab strip entry sent to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabSummary {
    pub id: TabId,
    pub name: String,
    pub kind: TabKind,
}

/// Actions returned from operations for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Action {
    /// The tab strip (order, names, or membership) changed.
    TabsChanged { tabs: Vec<TabSummary> },
    /// A different tab is now visible.
    ActiveTabChanged { id: TabId },
    /// A wheel's chips or drawn sectors changed; redraw it.
    SectorsChanged { tab: TabId, chips: Vec<Chip>, sectors: Vec<Sector>, button: ButtonFace },
    /// The pointer crossed a sector boundary; play the tick.
    Detent { tab: TabId, index: usize },
    /// A wheel came to rest. The host should dismiss the banner after the
    /// configured delay, quoting `result.seq`.
    SpinSettled { tab: TabId, result: SpinResult },
    ResultDismissed { tab: TabId },
    /// Decorative dice values; not a result.
    DiceRolling { tab: TabId, values: Vec<u32> },
    /// A dice tab's count and sides, normalized. The host shows these in
    /// its inputs.
    DiceConfigured { tab: TabId, settings: DiceSettings },
    DiceSettled { tab: TabId, roll: DiceRoll },
}

/// Core engine state: the session plus everything that doesn't depend on the DOM.
///
/// Separated from the browser wrapper so it can be tested natively.
pub struct EngineCore<R: Rng = StdRng> {
    settings: Settings,
    session: Session,
    rng: R,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl EngineCore {
    /// Engine with one empty wheel tab, seeded from the OS.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self::with_rng(settings, StdRng::from_os_rng())
    }
}

impl<R: Rng> EngineCore<R> {
    /// Engine with one empty wheel tab and a caller-supplied random source.
    /// Out-of-range settings are replaced with defaults.
    pub fn with_rng(settings: Settings, rng: R) -> Self {
        let settings = settings.sanitized();
        let session = Session::with_default_tab(&settings);
        Self { settings, session, rng }
    }

    // --- Tabs ---

    pub fn add_wheel_tab(&mut self) -> Vec<Action> {
        let id = self.session.add_wheel_tab();
        let mut actions = vec![self.tabs_changed(), Action::ActiveTabChanged { id: id.clone() }];
        actions.extend(self.sectors_changed(&id));
        actions
    }

    pub fn add_dice_tab(&mut self) -> Vec<Action> {
        let id = self.session.add_dice_tab();
        let mut actions = vec![self.tabs_changed(), Action::ActiveTabChanged { id: id.clone() }];
        actions.extend(self.dice_configured(&id));
        actions
    }

    /// Close a tab. If it was visible, the first remaining tab is shown.
    pub fn close_tab(&mut self, id: &str) -> Vec<Action> {
        let was_active = self.session.active_id() == Some(id);
        if !self.session.close_tab(id) {
            return Vec::new();
        }
        let mut actions = vec![self.tabs_changed()];
        if was_active {
            if let Some(next) = self.session.active_id() {
                actions.push(Action::ActiveTabChanged { id: next.to_owned() });
            }
        }
        actions
    }

    pub fn activate_tab(&mut self, id: &str) -> Vec<Action> {
        if self.session.active_id() == Some(id) || !self.session.activate(id) {
            return Vec::new();
        }
        vec![Action::ActiveTabChanged { id: id.to_owned() }]
    }

    pub fn rename_tab(&mut self, id: &str, name: &str) -> Vec<Action> {
        if !self.session.rename(id, name) {
            return Vec::new();
        }
        vec![self.tabs_changed()]
    }

    // --- Wheel ---

    /// Add chip text such as `"Apple, 3"` to a wheel.
    pub fn add_chip(&mut self, tab: &str, text: &str) -> Vec<Action> {
        let Some(wheel) = self.session.wheel_mut(tab) else {
            return Vec::new();
        };
        if !wheel.add_chip_text(text, &mut self.rng) {
            return Vec::new();
        }
        self.sectors_changed(tab).into_iter().collect()
    }

    pub fn remove_chip(&mut self, tab: &str, index: usize) -> Vec<Action> {
        let Some(wheel) = self.session.wheel_mut(tab) else {
            return Vec::new();
        };
        if wheel.remove_chip(index, &mut self.rng).is_none() {
            return Vec::new();
        }
        self.sectors_changed(tab).into_iter().collect()
    }

    /// Backspace in an empty chip input.
    pub fn remove_last_chip(&mut self, tab: &str) -> Vec<Action> {
        let Some(wheel) = self.session.wheel_mut(tab) else {
            return Vec::new();
        };
        if wheel.remove_last_chip(&mut self.rng).is_none() {
            return Vec::new();
        }
        self.sectors_changed(tab).into_iter().collect()
    }

    pub fn clear_chips(&mut self, tab: &str) -> Vec<Action> {
        let Some(wheel) = self.session.wheel_mut(tab) else {
            return Vec::new();
        };
        if !wheel.clear_chips(&mut self.rng) {
            return Vec::new();
        }
        self.sectors_changed(tab).into_iter().collect()
    }

    /// Spin button pressed. Returns `None` for a tab that isn't a wheel.
    pub fn spin(&mut self, tab: &str) -> Option<SpinOutcome> {
        let wheel = self.session.wheel_mut(tab)?;
        Some(wheel.spin(&mut self.rng))
    }

    /// Hide a wheel's result banner. `seq` limits the dismissal to one result.
    pub fn dismiss_result(&mut self, tab: &str, seq: Option<u64>) -> Vec<Action> {
        let Some(wheel) = self.session.wheel_mut(tab) else {
            return Vec::new();
        };
        if !wheel.dismiss_result(seq) {
            return Vec::new();
        }
        vec![Action::ResultDismissed { tab: tab.to_owned() }]
    }

    // --- Dice ---

    /// Apply the count/sides inputs. Returns the normalized settings.
    pub fn set_dice(&mut self, tab: &str, count: &str, sides: &str) -> Option<DiceSettings> {
        let roller = self.session.dice_mut(tab)?;
        let settings = DiceSettings::from_inputs(count, sides);
        roller.set_settings(settings);
        Some(settings)
    }

    /// Begin a roll. The host then calls [`EngineCore::step_roll`] every
    /// `settings().dice.step_ms` until it yields [`Action::DiceSettled`].
    pub fn start_roll(&mut self, tab: &str) -> bool {
        let Some(roller) = self.session.dice_mut(tab) else {
            return false;
        };
        roller.start();
        true
    }

    pub fn step_roll(&mut self, tab: &str) -> Vec<Action> {
        let Some(roller) = self.session.dice_mut(tab) else {
            return Vec::new();
        };
        let tab = tab.to_owned();
        match roller.step(&mut self.rng) {
            Some(DiceFrame::Rolling(values)) => vec![Action::DiceRolling { tab, values }],
            Some(DiceFrame::Final(roll)) => vec![Action::DiceSettled { tab, roll }],
            None => Vec::new(),
        }
    }

    // --- Animation ---

    /// Advance every wheel one frame, hidden tabs included.
    pub fn frame(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        for (tab, frame) in self.session.tick_wheels() {
            if frame.detent {
                if let Some(wheel) = self.session.wheel(&tab) {
                    actions.push(Action::Detent { tab: tab.clone(), index: wheel.spin_state().current_index() });
                }
            }
            if let Some(result) = frame.settled {
                actions.push(Action::SpinSettled { tab: tab.clone(), result });
            }
            if frame.sectors_changed {
                actions.extend(self.sectors_changed(&tab));
            }
        }
        actions
    }

    /// Whether any wheel is still moving.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.session.tabs().iter().any(|t| matches!(&t.widget, Widget::Wheel(w) if w.is_spinning()))
    }

    // --- Persistence ---

    /// Serialize every tab as a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Encode`] if serialization fails.
    pub fn save_state(&self) -> Result<String, SnapshotError> {
        snapshot::save_json(&self.session)
    }

    /// Replace all tabs with those in `text`. On error nothing changes.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Parse`] if `text` is not a valid document.
    pub fn load_state(&mut self, text: &str) -> Result<Vec<Action>, SnapshotError> {
        snapshot::load_json(&mut self.session, text, &mut self.rng)?;
        Ok(self.full_sync())
    }

    /// Everything a freshly attached host needs to draw the session.
    #[must_use]
    pub fn full_sync(&self) -> Vec<Action> {
        let mut actions = vec![self.tabs_changed()];
        if let Some(id) = self.session.active_id() {
            actions.push(Action::ActiveTabChanged { id: id.to_owned() });
        }
        for tab in self.session.tabs() {
            actions.extend(match tab.widget {
                Widget::Wheel(_) => self.sectors_changed(&tab.id),
                Widget::Dice(_) => self.dice_configured(&tab.id),
            });
        }
        actions
    }

    // --- Queries ---

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    // --- Helpers ---

    fn tabs_changed(&self) -> Action {
        let tabs = self
            .session
            .tabs()
            .iter()
            .map(|t| TabSummary { id: t.id.clone(), name: t.name.clone(), kind: t.widget.kind() })
            .collect();
        Action::TabsChanged { tabs }
    }

    /// `None` if `tab` is not a dice tab.
    fn dice_configured(&self, tab: &str) -> Option<Action> {
        let roller = self.session.dice(tab)?;
        Some(Action::DiceConfigured { tab: tab.to_owned(), settings: roller.settings() })
    }

    /// `None` if `tab` is not a wheel.
    fn sectors_changed(&self, tab: &str) -> Option<Action> {
        let wheel = self.session.wheel(tab)?;
        Some(Action::SectorsChanged {
            tab: tab.to_owned(),
            chips: wheel.chips().to_vec(),
            sectors: wheel.sectors().to_vec(),
            button: wheel.button_face(),
        })
    }
}
