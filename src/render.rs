//! Rendering: draws a wheel's sectors to a 2D context and styles the
//! spin button.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It receives read-only views of wheel state and produces pixels; it does
//! not mutate any application state.
//!
//! The sectors are drawn once per sector-list change. Spinning never
//! redraws the canvas: it only updates the element's CSS rotation.
//!
//! All fallible DOM calls propagate errors via `Result<(), JsValue>`.

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement};

use crate::chip::truncate_label;
use crate::config::WheelSettings;
use crate::sector::{Sector, sector_arc};
use crate::wheel::ButtonFace;

/// Distance from the rim to the right edge of a label, in pixels.
const LABEL_INSET_PX: f64 = 10.0;
/// Baseline offset of a label from the sector bisector, in pixels.
const LABEL_BASELINE_PX: f64 = 10.0;

/// Clear the canvas and draw every sector.
///
/// Sector `i` spans `[arc * i, arc * (i + 1))` measured from the canvas'
/// positive x axis. Labels are truncated for display only.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails.
pub fn draw_wheel(
    canvas: &HtmlCanvasElement,
    ctx: &CanvasRenderingContext2d,
    sectors: &[Sector],
    style: &WheelSettings,
) -> Result<(), JsValue> {
    let diameter = f64::from(canvas.width());
    let rad = diameter / 2.0;
    let arc = sector_arc(sectors.len());

    ctx.clear_rect(0.0, 0.0, diameter, diameter);
    for (i, sector) in sectors.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let start = arc * i as f64;
        draw_sector(ctx, sector, rad, start, arc, style)?;
    }
    Ok(())
}

fn draw_sector(
    ctx: &CanvasRenderingContext2d,
    sector: &Sector,
    rad: f64,
    start: f64,
    arc: f64,
    style: &WheelSettings,
) -> Result<(), JsValue> {
    ctx.begin_path();
    ctx.move_to(rad, rad);
    ctx.arc(rad, rad, rad, start, start + arc)?;
    ctx.close_path();
    ctx.set_fill_style_str(&sector.color.to_string());
    ctx.fill();

    ctx.save();
    ctx.translate(rad, rad)?;
    ctx.rotate(start + arc / 2.0)?;
    ctx.set_font(&format!("bold {} {}", style.font_size, style.font_family));
    ctx.set_text_align("right");
    ctx.set_fill_style_str(&sector.text_color.to_string());
    ctx.fill_text(&truncate_label(&sector.label), rad - LABEL_INSET_PX, LABEL_BASELINE_PX)?;
    ctx.restore();
    Ok(())
}

/// Rotate the drawn wheel so the sector under the pointer lines up.
///
/// # Errors
///
/// Returns `Err` if the style property cannot be set.
pub fn apply_rotation(canvas: &HtmlCanvasElement, rotation: f64) -> Result<(), JsValue> {
    canvas.style().set_property("transform", &format!("rotate({rotation}rad)"))
}

/// Show `face` on the spin button.
///
/// # Errors
///
/// Returns `Err` if a style property cannot be set.
pub fn apply_button_face(button: &HtmlElement, face: &ButtonFace) -> Result<(), JsValue> {
    button.set_text_content(Some(&face.text));
    let style = button.style();
    style.set_property("background", &face.background.to_string())?;
    style.set_property("color", &face.foreground.to_string())
}
