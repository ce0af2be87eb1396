//! Plumbing shared by the canvas games: held-key capture on the window and
//! 2D drawing helpers.

use std::f64::consts::TAU;

use glam::Vec2;
use gloo::events::{EventListener, EventListenerOptions};
use gloo::utils::window;
use multigame_core::arcade::{KeyBindings, Weather};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent};
use yew::prelude::*;

/// Window `keydown`/`keyup` listeners reporting `(key, pressed)`. Keys used by
/// any of `bindings` do not scroll the page.
pub(super) fn key_listeners(
    on_key: Callback<(String, bool)>,
    bindings: Vec<KeyBindings>,
) -> [EventListener; 2] {
    let listen = |event_type: &'static str, pressed: bool| {
        let on_key = on_key.clone();
        let bindings = bindings.clone();
        EventListener::new_with_options(
            &window(),
            event_type,
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                let key = event.key();
                if bindings.iter().any(|b| b.binds(&key)) {
                    event.prevent_default();
                }
                on_key.emit((key, pressed));
            },
        )
    };
    [listen("keydown", true), listen("keyup", false)]
}

pub(super) fn context_2d(canvas: &NodeRef) -> Option<CanvasRenderingContext2d> {
    canvas
        .cast::<HtmlCanvasElement>()?
        .get_context("2d")
        .ok()
        .flatten()?
        .dyn_into()
        .ok()
}

/// Line dash pattern; an empty slice draws solid lines.
pub(super) fn dash(segments: &[f64]) -> JsValue {
    segments
        .iter()
        .map(|&s| JsValue::from_f64(s))
        .collect::<js_sys::Array>()
        .into()
}

/// Starts a new path holding a single circle, ready to fill or stroke.
pub(super) fn circle(
    ctx: &CanvasRenderingContext2d,
    center: Vec2,
    radius: f32,
) -> Result<(), JsValue> {
    ctx.begin_path();
    ctx.arc(
        f64::from(center.x),
        f64::from(center.y),
        f64::from(radius),
        0.0,
        TAU,
    )
}

/// Paints the weather over a finished frame. `drift` scrolls rain and snow.
pub(super) fn draw_weather(
    ctx: &CanvasRenderingContext2d,
    weather: Weather,
    width: f64,
    height: f64,
    drift: f32,
) {
    let drift = f64::from(drift);
    match weather {
        Weather::Sunny => {}
        Weather::Night => {
            ctx.set_fill_style_str("rgba(2, 6, 23, 0.55)");
            ctx.fill_rect(0.0, 0.0, width, height);
        }
        Weather::Dawn => {
            ctx.set_fill_style_str("rgba(251, 146, 60, 0.18)");
            ctx.fill_rect(0.0, 0.0, width, height);
        }
        Weather::Rainy => {
            ctx.set_stroke_style_str("rgba(174, 194, 224, 0.6)");
            ctx.set_line_width(1.0);
            ctx.begin_path();
            for i in 0..80 {
                let i = f64::from(i);
                let x = (i * 97.0 + drift * 0.2).rem_euclid(width);
                let y = (i * 61.0 + drift * 2.0).rem_euclid(height);
                ctx.move_to(x, y);
                ctx.line_to(x - 2.0, y + 12.0);
            }
            ctx.stroke();
        }
        Weather::Snowy => {
            ctx.set_fill_style_str("rgba(255, 255, 255, 0.85)");
            for i in 0..60 {
                let i = f64::from(i);
                let x = (i * 89.0 + (drift * 0.01 + i).sin() * 8.0).rem_euclid(width);
                let y = (i * 53.0 + drift * 0.5).rem_euclid(height);
                ctx.fill_rect(x, y, 3.0, 3.0);
            }
        }
    }
}
