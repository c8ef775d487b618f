//! Browser entry point: wraps [`EngineCore`] for JavaScript.
//!
//! The host page owns the DOM for the tab strip, chip list, dice display,
//! and result banner. It hands this wrapper a canvas and spin button per
//! wheel tab and a listener that receives every [`Action`] as a JSON
//! string. This wrapper drives the animation loop, plays detent ticks,
//! keeps wheel canvases and buttons in sync, and owns the dice and
//! banner timers.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use gloo_timers::callback::{Interval, Timeout};
use wasm_bindgen::prelude::*;
use wasm_bindgen::{JsCast, closure::Closure};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement};

use crate::audio::TickSound;
use crate::config::Settings;
use crate::consts::STATE_FILE_NAME;
use crate::dice::DiceRoller;
use crate::engine::{Action, EngineCore};
use crate::render;
use crate::session::TabId;
use crate::wheel::SpinOutcome;

/// DOM elements bound to one wheel tab.
struct WheelView {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    button: HtmlElement,
}

struct Inner {
    core: EngineCore,
    views: HashMap<TabId, WheelView>,
    tick: TickSound,
    listener: Option<js_sys::Function>,
    dice_timers: HashMap<TabId, Interval>,
    dismiss_timers: HashMap<TabId, Timeout>,
    raf_pending: bool,
}

impl Inner {
    fn redraw(&self, tab: &str) -> Result<(), JsValue> {
        let (Some(view), Some(wheel)) = (self.views.get(tab), self.core.session().wheel(tab)) else {
            return Ok(());
        };
        render::draw_wheel(&view.canvas, &view.ctx, wheel.sectors(), &self.core.settings().wheel)?;
        render::apply_rotation(&view.canvas, wheel.rotation())?;
        render::apply_button_face(&view.button, &wheel.button_face())
    }

    /// Update rotation and button text of every attached wheel.
    fn sync_motion(&self) -> Result<(), JsValue> {
        for (tab, view) in &self.views {
            let Some(wheel) = self.core.session().wheel(tab) else {
                continue;
            };
            render::apply_rotation(&view.canvas, wheel.rotation())?;
            render::apply_button_face(&view.button, &wheel.button_face())?;
        }
        Ok(())
    }

    /// Forget views and timers for tabs that no longer exist.
    fn prune(&mut self) {
        let session = self.core.session();
        self.views.retain(|tab, _| session.get(tab).is_some());
        self.dice_timers.retain(|tab, _| session.get(tab).is_some());
        self.dismiss_timers.retain(|tab, _| session.get(tab).is_some());
    }
}

/// The spin wheel / dice session, as exposed to JavaScript.
#[wasm_bindgen]
pub struct App {
    inner: Rc<RefCell<Inner>>,
}

#[wasm_bindgen]
impl App {
    /// Create the app from a (possibly empty) settings JSON object.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the settings do not parse.
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: &str) -> Result<App, JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            log::debug!("logger already installed");
        }

        let settings = Settings::from_json(settings_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let tick = TickSound::new(settings.tick);
        let inner = Inner {
            core: EngineCore::new(settings),
            views: HashMap::new(),
            tick,
            listener: None,
            dice_timers: HashMap::new(),
            dismiss_timers: HashMap::new(),
            raf_pending: false,
        };
        Ok(App { inner: Rc::new(RefCell::new(inner)) })
    }

    /// Register the callback that receives each action as a JSON string.
    #[wasm_bindgen(js_name = setListener)]
    pub fn set_listener(&self, listener: js_sys::Function) {
        self.inner.borrow_mut().listener = Some(listener);
    }

    /// Replay the whole session through the listener.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the listener throws.
    pub fn sync(&self) -> Result<(), JsValue> {
        let actions = self.inner.borrow().core.full_sync();
        dispatch(&self.inner, actions)
    }

    /// Bind a wheel tab to its canvas and spin button and draw it.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the canvas has no 2D context or drawing fails.
    #[wasm_bindgen(js_name = attachWheel)]
    pub fn attach_wheel(&self, tab: &str, canvas: HtmlCanvasElement, button: HtmlElement) -> Result<(), JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let mut inner = self.inner.borrow_mut();
        inner.views.insert(tab.to_owned(), WheelView { canvas, ctx, button });
        inner.redraw(tab)
    }

    // --- Tabs ---

    /// # Errors
    ///
    /// Returns `Err` if the listener throws or drawing fails.
    #[wasm_bindgen(js_name = addWheelTab)]
    pub fn add_wheel_tab(&self) -> Result<(), JsValue> {
        let actions = self.inner.borrow_mut().core.add_wheel_tab();
        dispatch(&self.inner, actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if the listener throws.
    #[wasm_bindgen(js_name = addDiceTab)]
    pub fn add_dice_tab(&self) -> Result<(), JsValue> {
        let actions = self.inner.borrow_mut().core.add_dice_tab();
        dispatch(&self.inner, actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if the listener throws.
    #[wasm_bindgen(js_name = closeTab)]
    pub fn close_tab(&self, tab: &str) -> Result<(), JsValue> {
        let actions = self.inner.borrow_mut().core.close_tab(tab);
        dispatch(&self.inner, actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if the listener throws.
    #[wasm_bindgen(js_name = activateTab)]
    pub fn activate_tab(&self, tab: &str) -> Result<(), JsValue> {
        let actions = self.inner.borrow_mut().core.activate_tab(tab);
        dispatch(&self.inner, actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if the listener throws.
    #[wasm_bindgen(js_name = renameTab)]
    pub fn rename_tab(&self, tab: &str, name: &str) -> Result<(), JsValue> {
        let actions = self.inner.borrow_mut().core.rename_tab(tab, name);
        dispatch(&self.inner, actions)
    }

    // --- Wheel ---

    /// # Errors
    ///
    /// Returns `Err` if the listener throws or drawing fails.
    #[wasm_bindgen(js_name = addChip)]
    pub fn add_chip(&self, tab: &str, text: &str) -> Result<(), JsValue> {
        let actions = self.inner.borrow_mut().core.add_chip(tab, text);
        dispatch(&self.inner, actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if the listener throws or drawing fails.
    #[wasm_bindgen(js_name = removeChip)]
    pub fn remove_chip(&self, tab: &str, index: usize) -> Result<(), JsValue> {
        let actions = self.inner.borrow_mut().core.remove_chip(tab, index);
        dispatch(&self.inner, actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if the listener throws or drawing fails.
    #[wasm_bindgen(js_name = removeLastChip)]
    pub fn remove_last_chip(&self, tab: &str) -> Result<(), JsValue> {
        let actions = self.inner.borrow_mut().core.remove_last_chip(tab);
        dispatch(&self.inner, actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if the listener throws or drawing fails.
    #[wasm_bindgen(js_name = clearChips)]
    pub fn clear_chips(&self, tab: &str) -> Result<(), JsValue> {
        let actions = self.inner.borrow_mut().core.clear_chips(tab);
        dispatch(&self.inner, actions)
    }

    /// Spin button pressed. Returns `"started"`, `"alreadySpinning"`,
    /// `"nothingToSpin"`, or `"notAWheel"`.
    pub fn spin(&self, tab: &str) -> String {
        let outcome = self.inner.borrow_mut().core.spin(tab);
        let label = match outcome {
            Some(SpinOutcome::Started) => "started",
            Some(SpinOutcome::AlreadySpinning) => "alreadySpinning",
            Some(SpinOutcome::NothingToSpin) => "nothingToSpin",
            None => "notAWheel",
        };
        if matches!(outcome, Some(SpinOutcome::Started | SpinOutcome::AlreadySpinning)) {
            request_frame(&self.inner);
        }
        label.to_owned()
    }

    /// Hide a wheel's result banner now.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the listener throws.
    #[wasm_bindgen(js_name = dismissResult)]
    pub fn dismiss_result(&self, tab: &str) -> Result<(), JsValue> {
        let actions = {
            let mut inner = self.inner.borrow_mut();
            inner.dismiss_timers.remove(tab);
            inner.core.dismiss_result(tab, None)
        };
        dispatch(&self.inner, actions)
    }

    // --- Dice ---

    /// Apply the count/sides inputs. The normalized values come back through
    /// the listener as `diceConfigured`. Returns `false` for a non-dice tab.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the listener throws.
    #[wasm_bindgen(js_name = setDice)]
    pub fn set_dice(&self, tab: &str, count: &str, sides: &str) -> Result<bool, JsValue> {
        let Some(settings) = self.inner.borrow_mut().core.set_dice(tab, count, sides) else {
            return Ok(false);
        };
        dispatch(&self.inner, vec![Action::DiceConfigured { tab: tab.to_owned(), settings }])?;
        Ok(true)
    }

    /// Start a roll; decorative values then the result arrive via the listener.
    pub fn roll(&self, tab: &str) -> bool {
        let step_ms = {
            let mut inner = self.inner.borrow_mut();
            if !inner.core.start_roll(tab) {
                return false;
            }
            inner.core.session().dice(tab).map_or(inner.core.settings().dice.step_ms, DiceRoller::step_ms)
        };

        let app = Rc::clone(&self.inner);
        let owned = tab.to_owned();
        let interval = Interval::new(step_ms, move || {
            let actions = app.borrow_mut().core.step_roll(&owned);
            if let Err(e) = dispatch(&app, actions) {
                log::warn!("dice step failed: {e:?}");
            }
        });
        // Replacing an interval cancels the previous roll's timer.
        self.inner.borrow_mut().dice_timers.insert(tab.to_owned(), interval);
        true
    }

    // --- Persistence ---

    /// Suggested file name for a saved session.
    #[wasm_bindgen(js_name = stateFileName)]
    #[must_use]
    pub fn state_file_name() -> String {
        STATE_FILE_NAME.to_owned()
    }

    /// # Errors
    ///
    /// Returns `Err` if the session cannot be encoded.
    #[wasm_bindgen(js_name = saveState)]
    pub fn save_state(&self) -> Result<String, JsValue> {
        self.inner.borrow().core.save_state().map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Replace every tab with the saved document. On error nothing changes.
    ///
    /// Existing canvas bindings are dropped; the host rebuilds its tab DOM
    /// from the replayed actions and calls [`App::attach_wheel`] again.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `text` is not a valid session document.
    #[wasm_bindgen(js_name = loadState)]
    pub fn load_state(&self, text: &str) -> Result<(), JsValue> {
        let actions = {
            let mut inner = self.inner.borrow_mut();
            let actions = inner.core.load_state(text).map_err(|e| JsValue::from_str(&e.to_string()))?;
            inner.views.clear();
            inner.dice_timers.clear();
            inner.dismiss_timers.clear();
            actions
        };
        dispatch(&self.inner, actions)
    }
}

/// Apply each action's side effects, then forward it to the listener.
///
/// The `RefCell` borrow is released before the listener runs so the host
/// may call back into [`App`] from inside it.
fn dispatch(inner: &Rc<RefCell<Inner>>, actions: Vec<Action>) -> Result<(), JsValue> {
    for action in actions {
        let listener = {
            let mut state = inner.borrow_mut();
            apply(inner, &mut state, &action)?;
            state.listener.clone()
        };
        let Some(listener) = listener else {
            continue;
        };
        let json = serde_json::to_string(&action).map_err(|e| JsValue::from_str(&e.to_string()))?;
        listener.call1(&JsValue::NULL, &JsValue::from_str(&json))?;
    }
    Ok(())
}

fn apply(rc: &Rc<RefCell<Inner>>, state: &mut Inner, action: &Action) -> Result<(), JsValue> {
    match action {
        Action::TabsChanged { .. } => state.prune(),
        Action::SectorsChanged { tab, .. } => state.redraw(tab)?,
        Action::Detent { .. } => {
            if let Err(e) = state.tick.play() {
                log::warn!("tick sound failed: {e:?}");
            }
        }
        Action::SpinSettled { tab, result } => {
            let app = Rc::clone(rc);
            let owned = tab.clone();
            let seq = result.seq;
            let timeout = Timeout::new(state.core.settings().wheel.result_dismiss_ms, move || {
                let actions = app.borrow_mut().core.dismiss_result(&owned, Some(seq));
                if let Err(e) = dispatch(&app, actions) {
                    log::warn!("result dismiss failed: {e:?}");
                }
            });
            state.dismiss_timers.insert(tab.clone(), timeout);
        }
        Action::DiceSettled { tab, .. } => {
            // The interval is still on the stack; drop it on the next turn.
            let app = Rc::clone(rc);
            let owned = tab.clone();
            Timeout::new(0, move || {
                let mut state = app.borrow_mut();
                if !state.core.session().dice(&owned).is_some_and(DiceRoller::is_rolling) {
                    state.dice_timers.remove(&owned);
                }
            })
            .forget();
        }
        Action::ActiveTabChanged { .. }
        | Action::ResultDismissed { .. }
        | Action::DiceRolling { .. }
        | Action::DiceConfigured { .. } => {}
    }
    Ok(())
}

/// Schedule one animation frame unless one is already pending. The frame
/// reschedules itself while any wheel is moving.
fn request_frame(inner: &Rc<RefCell<Inner>>) {
    if inner.borrow().raf_pending {
        return;
    }
    let Some(window) = web_sys::window() else {
        log::warn!("no window; wheel animation unavailable");
        return;
    };
    inner.borrow_mut().raf_pending = true;

    let app = Rc::clone(inner);
    let holder: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let holder_for_cb = Rc::clone(&holder);
    let cb = Closure::wrap(Box::new(move |_ts: f64| {
        let actions = {
            let mut state = app.borrow_mut();
            state.raf_pending = false;
            state.core.frame()
        };
        if let Err(e) = app.borrow().sync_motion() {
            log::warn!("wheel redraw failed: {e:?}");
        }
        if let Err(e) = dispatch(&app, actions) {
            log::warn!("frame dispatch failed: {e:?}");
        }
        if app.borrow().core.is_animating() {
            request_frame(&app);
        }
        holder_for_cb.borrow_mut().take();
    }) as Box<dyn FnMut(f64)>);

    if window.request_animation_frame(cb.as_ref().unchecked_ref()).is_ok() {
        *holder.borrow_mut() = Some(cb);
    } else {
        inner.borrow_mut().raf_pending = false;
        log::warn!("requestAnimationFrame failed");
    }
}
