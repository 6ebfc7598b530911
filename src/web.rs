use std::cell::RefCell;
use std::rc::Rc;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{KeyboardEvent, Request, RequestInit, RequestMode, Response, Window};
use crate::game::config::GameConfig;
use crate::game::player::Direction;
use crate::game::progress::Progress;
use crate::game::Game;

// Long frames (tab in background) are clamped so nothing tunnels through a lane.
const MAX_FRAME_DT: f64 = 0.1;

struct Runtime {
    game: Game,
    progress: Progress,
    last_frame: Option<f64>,
}

thread_local! {
    static RUNTIME: RefCell<Option<Runtime>> = RefCell::new(None);
}

#[wasm_bindgen]
pub async fn init_game() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    // A second init_game keeps the logger already installed.
    console_log::init_with_level(log::Level::Debug).ok();
    let window = web_sys::window().ok_or("No window")?;

    let config = match fetch_config(&window).await {
        Ok(config) => config,
        Err(err) => {
            warn!("using default config: {:?}", err);
            GameConfig::default()
        }
    };
    let seed = config.seed.unwrap_or_else(|| (js_sys::Math::random() * u32::MAX as f64) as u64);
    info!("starting run with seed {}", seed);

    let progress = Progress::new(&config.progress);
    let game = Game::with_seed(config, seed).map_err(|err| JsValue::from_str(&err.to_string()))?;
    RUNTIME.with(|r| *r.borrow_mut() = Some(Runtime { game, progress, last_frame: None }));

    // Input handling
    let closure = Closure::wrap(Box::new(move |event: KeyboardEvent| {
        let handled = match event.key().as_str() {
            "ArrowUp" | "w" | "W" => { submit(Direction::Up); true },
            "ArrowDown" | "s" | "S" => { submit(Direction::Down); true },
            "ArrowLeft" | "a" | "A" => { submit(Direction::Left); true },
            "ArrowRight" | "d" | "D" => { submit(Direction::Right); true },
            "Enter" | " " | "r" | "R" => { restart(); true },
            _ => false,
        };
        if handled {
            event.prevent_default();
        }
    }) as Box<dyn FnMut(_)>);

    window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
    closure.forget();

    // Game loop
    let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
        RUNTIME.with(|runtime| {
            if let Some(runtime) = runtime.borrow_mut().as_mut() {
                frame(runtime, now);
            }
        });
        if let Some(callback) = f.borrow().as_ref() {
            request_animation_frame(callback);
        }
    }) as Box<dyn FnMut(f64)>));

    if let Some(callback) = g.borrow().as_ref() {
        request_animation_frame(callback);
    }

    Ok(())
}

async fn fetch_config(window: &Window) -> Result<GameConfig, JsValue> {
    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let request = Request::new_with_str_and_init("/assets/config.json", &opts)?;
    let resp: Response = JsFuture::from(window.fetch_with_request(&request)).await?.dyn_into()?;
    if !resp.ok() {
        return Err(JsValue::from_str(&format!("config fetch failed with status {}", resp.status())));
    }
    let text = JsFuture::from(resp.text()?).await?;
    let text = text.as_string().ok_or("config is not text")?;
    GameConfig::from_json(&text).map_err(|err| JsValue::from_str(&err.to_string()))
}

fn frame(runtime: &mut Runtime, now: f64) {
    let dt = match runtime.last_frame {
        Some(last) => ((now - last) / 1000.0).clamp(0.0, MAX_FRAME_DT),
        None => 0.0,
    };
    runtime.last_frame = Some(now);

    let report = runtime.game.tick(dt as f32);
    for event in &report.events {
        if let Some(level) = runtime.progress.apply(event) {
            info!("reached level {}", level);
        }
    }
    update_ui(&runtime.progress, runtime.game.is_over());
}

fn submit(direction: Direction) {
    RUNTIME.with(|r| {
        if let Some(runtime) = r.borrow_mut().as_mut() {
            runtime.game.submit_move_intent(direction);
        }
    });
}

fn restart() {
    RUNTIME.with(|r| {
        if let Some(runtime) = r.borrow_mut().as_mut() {
            if runtime.game.is_over() {
                runtime.game.restart();
                runtime.progress.reset();
            }
        }
    });
}

fn request_animation_frame(f: &Closure<dyn FnMut(f64)>) {
    if let Some(window) = web_sys::window() {
        if let Err(err) = window.request_animation_frame(f.as_ref().unchecked_ref()) {
            warn!("requestAnimationFrame failed: {:?}", err);
        }
    }
}

fn update_ui(progress: &Progress, game_over: bool) {
    if let Some(window) = web_sys::window() {
        if let Some(document) = window.document() {
            if let Some(score_el) = document.get_element_by_id("score") {
                score_el.set_inner_html(&format!(
                    "Score: {} | HI {} | Level {} ({}/{} XP)",
                    progress.score, progress.high_score, progress.level, progress.xp, progress.xp_to_next
                ));
            }
            if let Some(gameover_el) = document.get_element_by_id("gameover") {
                if game_over {
                    gameover_el.set_attribute("style", "display: block;").ok();
                } else {
                    gameover_el.set_attribute("style", "display: none;").ok();
                }
            }
        }
    }
}

/// Current frame for the JavaScript renderer.
#[wasm_bindgen]
pub fn snapshot() -> Result<JsValue, JsValue> {
    RUNTIME.with(|r| match r.borrow().as_ref() {
        Some(runtime) => serde_wasm_bindgen::to_value(&runtime.game.snapshot_for_render()).map_err(JsValue::from),
        None => Ok(JsValue::NULL),
    })
}

#[wasm_bindgen]
pub fn touch_up() {
    submit(Direction::Up);
}

#[wasm_bindgen]
pub fn touch_down() {
    submit(Direction::Down);
}

#[wasm_bindgen]
pub fn touch_left() {
    submit(Direction::Left);
}

#[wasm_bindgen]
pub fn touch_right() {
    submit(Direction::Right);
}

#[wasm_bindgen]
pub fn touch_restart() {
    restart();
}
