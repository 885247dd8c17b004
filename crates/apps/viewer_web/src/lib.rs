use console_error_panic_hook::set_once;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use layers::{Layer, LayerCatalog, LayerKey, LayerVisibility};
use scene::{PipelineOutcome, SelectionPipeline};
use serde::Serialize;

pub mod bridge;
pub mod config;
pub mod engine;
pub mod host;

use config::{DEFAULT_LOG_FILTER, ViewerConfig};
use engine::{CesiumEngine, load_imagery, load_vector};
use host::WorkspaceConnector;

/// Session state shared by the exported entry points and in-flight tasks.
struct App {
    base_url: String,
    catalog: LayerCatalog,
    pipeline: SelectionPipeline,
    engine: RefCell<CesiumEngine>,
    visibility: RefCell<LayerVisibility>,
}

thread_local! {
    static APP: RefCell<Option<Rc<App>>> = const { RefCell::new(None) };
}

fn app() -> Result<Rc<App>, JsValue> {
    APP.with(|app| app.borrow().clone())
        .ok_or_else(|| JsValue::from_str("viewer is not initialized; call init() first"))
}

fn to_js(e: impl ToString) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn env_filter(filter: &str) -> EnvFilter {
    EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[cfg(target_arch = "wasm32")]
fn init_logging(filter: &str) {
    use tracing_subscriber::layer::SubscriberExt as _;

    let subscriber = tracing_subscriber::Registry::default()
        .with(env_filter(filter))
        .with(tracing_wasm::WASMLayer::new(
            tracing_wasm::WASMLayerConfig::default(),
        ));
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        web_sys::console::warn_1(&JsValue::from_str("tracing subscriber already installed"));
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn init_logging(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(filter))
        .try_init();
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Creates the 3D viewer and starts loading the overlays.
///
/// `config_json` is a `ViewerConfig` as JSON; `""` or `"{}"` uses defaults.
#[wasm_bindgen]
pub fn init(config_json: &str) -> Result<(), JsValue> {
    if APP.with(|app| app.borrow().is_some()) {
        return Err(JsValue::from_str("viewer is already initialized"));
    }
    let config = ViewerConfig::from_json(config_json).map_err(to_js)?;
    init_logging(&config.log_filter);

    let projector = config.projector().map_err(to_js)?;
    if config.ion_token().is_none() {
        warn!("no ion access token configured, ion layers use the engine default");
    }
    let engine = CesiumEngine::create(&config)?;

    let app = Rc::new(App {
        base_url: config.base_url.clone(),
        catalog: config.catalog(),
        pipeline: SelectionPipeline::new(projector),
        engine: RefCell::new(engine),
        visibility: RefCell::new(LayerVisibility::new()),
    });
    APP.with(|slot| *slot.borrow_mut() = Some(Rc::clone(&app)));
    info!(
        layers = app.catalog.len(),
        terrain = ?config.terrain(),
        "viewer initialized"
    );

    load_layers(&app);
    Ok(())
}

fn load_layers(app: &Rc<App>) {
    let viewer = app.engine.borrow().viewer().clone();

    for layer in app.catalog.vector.iter().cloned() {
        let app = Rc::clone(app);
        let viewer = viewer.clone();
        spawn_local(async move {
            let key = layer.key(&app.base_url);
            match load_vector(&viewer, &layer, &app.base_url).await {
                Ok(handle) => on_layer_loaded(&app, key, handle),
                Err(err) => error!(
                    %key,
                    "could not load layer `{}`: {}",
                    layer.name,
                    bridge::js_error_message(&err)
                ),
            }
        });
    }

    for layer in app.catalog.imagery.iter().cloned() {
        let app = Rc::clone(app);
        let viewer = viewer.clone();
        spawn_local(async move {
            let key = layer.key(&app.base_url);
            match load_imagery(&viewer, &layer).await {
                Ok(handle) => on_layer_loaded(&app, key, handle),
                Err(err) => error!(
                    %key,
                    "could not load imagery `{}`: {}",
                    layer.name,
                    bridge::js_error_message(&err)
                ),
            }
        });
    }
}

fn on_layer_loaded(app: &App, key: LayerKey, handle: JsValue) {
    let mut engine = app.engine.borrow_mut();
    engine.attach(key.clone(), handle);
    app.visibility
        .borrow_mut()
        .register_loaded(key.clone(), &mut *engine);
    info!(%key, "layer loaded");
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum FetchReport {
    Applied {
        longitude_deg: f64,
        latitude_deg: f64,
        height_m: f64,
    },
    Superseded {
        request: u64,
    },
    Failed {
        kind: &'static str,
        message: String,
    },
}

/// Flies the camera to the host's current selection.
///
/// Resolves to a JSON report. Selection failures are reported, not thrown;
/// the promise only rejects when the viewer was never initialized.
#[wasm_bindgen]
pub async fn fetch_selection() -> Result<JsValue, JsValue> {
    let app = app()?;
    let report = match app.pipeline.run(&WorkspaceConnector, &app.engine).await {
        Ok(PipelineOutcome::Applied(cmd)) => FetchReport::Applied {
            longitude_deg: cmd.target.longitude_deg,
            latitude_deg: cmd.target.latitude_deg,
            height_m: cmd.target.height_m,
        },
        Ok(PipelineOutcome::Superseded(token)) => FetchReport::Superseded {
            request: token.get(),
        },
        Err(err) => FetchReport::Failed {
            kind: err.kind(),
            message: err.to_string(),
        },
    };
    serde_json::to_string(&report)
        .map(|s| JsValue::from_str(&s))
        .map_err(to_js)
}

/// Shows or hides a catalog layer. Keys outside the catalog are rejected.
#[wasm_bindgen]
pub fn set_layer_visible(key: &str, visible: bool) -> Result<(), JsValue> {
    let app = app()?;
    if !app.catalog.contains_key(&app.base_url, key) {
        return Err(JsValue::from_str(&format!("unknown layer `{key}`")));
    }
    let key = LayerKey::from(key);
    let mut engine = app.engine.borrow_mut();
    app.visibility
        .borrow_mut()
        .set_visible(&key, visible, &mut *engine);
    Ok(())
}

#[wasm_bindgen]
pub fn is_layer_visible(key: &str) -> Result<bool, JsValue> {
    Ok(app()?.visibility.borrow().is_visible(key))
}

#[derive(Serialize)]
struct LayerEntry {
    key: LayerKey,
    name: String,
    loaded: bool,
    visible: bool,
}

/// Every catalog layer with its display name and state, as JSON.
#[wasm_bindgen]
pub fn layer_entries() -> Result<String, JsValue> {
    let app = app()?;
    let engine = app.engine.borrow();
    let visibility = app.visibility.borrow();
    let entries: Vec<LayerEntry> = app
        .catalog
        .keys(&app.base_url)
        .into_iter()
        .map(|(key, name)| LayerEntry {
            loaded: engine.is_loaded(&key),
            visible: visibility.is_visible(key.as_str()),
            key,
            name,
        })
        .collect();
    serde_json::to_string(&entries).map_err(to_js)
}

#[derive(Serialize)]
struct EventEntry {
    request: Option<u64>,
    kind: &'static str,
    message: String,
}

/// Recent selection events for an operator panel, oldest first, as JSON.
#[wasm_bindgen]
pub fn recent_events() -> Result<String, JsValue> {
    let events: Vec<EventEntry> = app()?
        .pipeline
        .recent_events()
        .into_iter()
        .map(|e| EventEntry {
            request: e.request.map(|t| t.get()),
            kind: e.kind,
            message: e.message,
        })
        .collect();
    serde_json::to_string(&events).map_err(to_js)
}
