//! Session registry: the ordered set of open tabs and which one is active.
//!
//! Each tab owns exactly one widget instance. Tabs are created and destroyed
//! only through the methods here; there is no ambient per-type map of live
//! widgets. Exactly one tab is active whenever at least one tab exists.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use serde::{Deserialize, Serialize};

use crate::config::{DiceTiming, Settings};
use crate::consts::TAB_ID_PREFIX;
use crate::dice::{DiceRoller, DiceSettings};
use crate::spin::SpinParams;
use crate::wheel::{Wheel, WheelFrame};

/// Identifier of a tab, e.g. `"tab-3"`. Saved ids are preserved verbatim on load.
pub type TabId = String;

/// Widget type hosted by a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabKind {
    Wheel,
    Dice,
}

impl TabKind {
    /// Default display name for the `n`th tab of this kind.
    #[must_use]
    pub fn default_name(self, n: u32) -> String {
        match self {
            Self::Wheel => format!("Wheel {n}"),
            Self::Dice => format!("Dice {n}"),
        }
    }
}

/// A live widget instance.
#[derive(Debug, Clone)]
pub enum Widget {
    Wheel(Wheel),
    Dice(DiceRoller),
}

impl Widget {
    #[must_use]
    pub fn kind(&self) -> TabKind {
        match self {
            Self::Wheel(_) => TabKind::Wheel,
            Self::Dice(_) => TabKind::Dice,
        }
    }
}

/// One open tab.
#[derive(Debug, Clone)]
pub struct Tab {
    pub id: TabId,
    pub name: String,
    pub widget: Widget,
}

/// All open tabs, in display order.
#[derive(Debug, Clone)]
pub struct Session {
    tabs: Vec<Tab>,
    active: Option<TabId>,
    counter: u32,
    spin_params: SpinParams,
    dice_timing: DiceTiming,
}

impl Session {
    /// An empty session with no tabs.
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        Self {
            tabs: Vec::new(),
            active: None,
            counter: 0,
            spin_params: SpinParams::from(&settings.wheel),
            dice_timing: settings.dice,
        }
    }

    /// The start-up session: a single empty wheel tab.
    #[must_use]
    pub fn with_default_tab(settings: &Settings) -> Self {
        let mut session = Self::new(settings);
        session.add_wheel_tab();
        session
    }

    // --- Lifecycle ---

    /// Open a new empty wheel tab and make it active.
    pub fn add_wheel_tab(&mut self) -> TabId {
        let wheel = Wheel::new(self.spin_params);
        self.add_tab(Widget::Wheel(wheel))
    }

    /// Open a new dice tab with default settings and make it active.
    pub fn add_dice_tab(&mut self) -> TabId {
        let roller = DiceRoller::new(DiceSettings::default(), self.dice_timing);
        self.add_tab(Widget::Dice(roller))
    }

    fn add_tab(&mut self, widget: Widget) -> TabId {
        let id = self.next_tab_id();
        let name = widget.kind().default_name(self.counter);
        log::info!("opened {name} ({id})");
        self.tabs.push(Tab { id: id.clone(), name, widget });
        self.active = Some(id.clone());
        id
    }

    /// Allocate the next unused `tab-N` id.
    pub fn next_tab_id(&mut self) -> TabId {
        self.counter += 1;
        format!("{TAB_ID_PREFIX}{}", self.counter)
    }

    /// Make sure ids generated from now on sort after `id`.
    pub fn reserve_id(&mut self, id: &str) {
        if let Some(n) = numeric_suffix(id) {
            self.counter = self.counter.max(n);
        }
    }

    /// Append a tab with a caller-chosen id and name (used when loading).
    /// Does not change the active tab. Returns `false` if the id is taken.
    pub fn insert_tab(&mut self, id: TabId, name: String, widget: Widget) -> bool {
        if self.position(&id).is_some() {
            return false;
        }
        self.reserve_id(&id);
        self.tabs.push(Tab { id, name, widget });
        self.counter = self.counter.max(u32::try_from(self.tabs.len()).unwrap_or(u32::MAX));
        true
    }

    /// Close a tab. If it was active, the first remaining tab takes over.
    pub fn close_tab(&mut self, id: &str) -> bool {
        let Some(pos) = self.position(id) else {
            return false;
        };
        let tab = self.tabs.remove(pos);
        log::info!("closed {} ({})", tab.name, tab.id);
        if self.active.as_deref() == Some(id) {
            self.active = self.tabs.first().map(|t| t.id.clone());
        }
        true
    }

    /// Make `id` the visible tab. Unknown ids are ignored.
    pub fn activate(&mut self, id: &str) -> bool {
        if self.position(id).is_none() {
            return false;
        }
        self.active = Some(id.to_owned());
        true
    }

    /// Rename a tab. Blank names keep the current name.
    pub fn rename(&mut self, id: &str, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        let Some(tab) = self.get_mut(id) else {
            return false;
        };
        tab.name = name.to_owned();
        true
    }

    /// Remove every tab.
    pub fn clear(&mut self) {
        self.tabs.clear();
        self.active = None;
        self.counter = 0;
    }

    // --- Queries ---

    #[must_use]
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    #[must_use]
    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id == id)
    }

    #[must_use]
    pub fn wheel(&self, id: &str) -> Option<&Wheel> {
        match &self.get(id)?.widget {
            Widget::Wheel(wheel) => Some(wheel),
            Widget::Dice(_) => None,
        }
    }

    #[must_use]
    pub fn dice(&self, id: &str) -> Option<&DiceRoller> {
        match &self.get(id)?.widget {
            Widget::Dice(roller) => Some(roller),
            Widget::Wheel(_) => None,
        }
    }

    pub fn wheel_mut(&mut self, id: &str) -> Option<&mut Wheel> {
        match &mut self.get_mut(id)?.widget {
            Widget::Wheel(wheel) => Some(wheel),
            Widget::Dice(_) => None,
        }
    }

    pub fn dice_mut(&mut self, id: &str) -> Option<&mut DiceRoller> {
        match &mut self.get_mut(id)?.widget {
            Widget::Dice(roller) => Some(roller),
            Widget::Wheel(_) => None,
        }
    }

    /// Spin physics every new wheel is created with.
    #[must_use]
    pub fn spin_params(&self) -> SpinParams {
        self.spin_params
    }

    /// Dice timing every new roller is created with.
    #[must_use]
    pub fn dice_timing(&self) -> DiceTiming {
        self.dice_timing
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }

    // --- Animation ---

    /// Advance every wheel by one frame, hidden tabs included.
    pub fn tick_wheels(&mut self) -> Vec<(TabId, WheelFrame)> {
        self.tabs
            .iter_mut()
            .filter_map(|tab| match &mut tab.widget {
                Widget::Wheel(wheel) => Some((tab.id.clone(), wheel.tick())),
                Widget::Dice(_) => None,
            })
            .collect()
    }

    /// An empty session sharing this one's settings.
    #[must_use]
    pub fn empty_like(&self) -> Self {
        Self {
            tabs: Vec::new(),
            active: None,
            counter: 0,
            spin_params: self.spin_params,
            dice_timing: self.dice_timing,
        }
    }

    /// Replace this session's tabs with `other`'s, keeping the settings.
    pub fn replace_with(&mut self, other: Session) {
        self.tabs = other.tabs;
        self.active = other.active;
        self.counter = other.counter;
    }

    /// Activate `preferred` if present, else the first tab.
    pub fn activate_or_first(&mut self, preferred: Option<&str>) {
        self.active = preferred
            .filter(|id| self.position(id).is_some())
            .map(str::to_owned)
            .or_else(|| self.tabs.first().map(|t| t.id.clone()));
    }
}

/// `"tab-12"` -> `Some(12)`.
fn numeric_suffix(id: &str) -> Option<u32> {
    let Ok(n) = id.strip_prefix(TAB_ID_PREFIX)?.parse::<u32>() else {
        return None;
    };
    Some(n)
}
