//! Tick sound played each time the pointer crosses a sector boundary.

use wasm_bindgen::JsValue;
use web_sys::{AudioContext, GainNode, OscillatorType};

use crate::config::TickSettings;

/// Lazily created audio output. Browsers only allow an `AudioContext` to
/// start after a user gesture, so nothing is created until the first tick.
pub struct TickSound {
    settings: TickSettings,
    ctx: Option<AudioContext>,
}

impl TickSound {
    #[must_use]
    pub fn new(settings: TickSettings) -> Self {
        Self { settings, ctx: None }
    }

    fn context(&mut self) -> Result<&AudioContext, JsValue> {
        if self.ctx.is_none() {
            self.ctx = Some(AudioContext::new()?);
        }
        self.ctx.as_ref().ok_or_else(|| JsValue::from_str("audio context unavailable"))
    }

    /// Play one short sine blip.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the audio graph cannot be built or started.
    pub fn play(&mut self) -> Result<(), JsValue> {
        if !self.settings.enabled {
            return Ok(());
        }
        let TickSettings { frequency_hz, gain, duration_s, .. } = self.settings;
        let ctx = self.context()?;
        let now = ctx.current_time();

        let osc = ctx.create_oscillator()?;
        let amp: GainNode = ctx.create_gain()?;
        osc.set_type(OscillatorType::Sine);
        osc.frequency().set_value_at_time(frequency_hz, now)?;
        amp.gain().set_value_at_time(gain, now)?;

        osc.connect_with_audio_node(&amp)?;
        amp.connect_with_audio_node(&ctx.destination())?;
        osc.start_with_when(now)?;
        osc.stop_with_when(now + duration_s)?;
        Ok(())
    }
}
