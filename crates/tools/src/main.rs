use std::env;
use std::fs;

use canvas::MapCanvas;
use config::AppConfig;
use layers::{LoadProgress, TileEvent, TileLayerRegistry};
use runtime::NoticeBus;
use session::{MapSession, FIT_DEBOUNCE_MS};
use tracks::{
    LiveSnapshot, MemoryStore, PersistedTrack, TrackInput, TrackProperties, TrackRenderer,
    TrackStore,
};

fn main() {
    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(usage());
    }

    match args[1].as_str() {
        "validate" => cmd_validate(&args[2..]),
        "replay" => cmd_replay(&args[2..]),
        _ => Err(usage()),
    }
}

fn usage() -> String {
    [
        "usage:",
        "  mapctl validate <config.json>   check a configuration file",
        "  mapctl replay [config.json]     run a scripted map session",
    ]
    .join("\n")
}

fn load_config(path: Option<&String>) -> Result<AppConfig, String> {
    match path {
        Some(p) => {
            let raw = fs::read_to_string(p).map_err(|e| format!("{p}: {e}"))?;
            AppConfig::from_json(&raw).map_err(|e| e.to_string())
        }
        None => Ok(demo_config()),
    }
}

fn demo_config() -> AppConfig {
    AppConfig::from_json(
        r#"{
            "view": { "bbox": [5.9, 45.8, 10.5, 47.8] },
            "tile_sources": [
                { "name": "base", "url_template": "https://tiles.test/base/{z}/{x}/{y}.png" },
                { "name": "aerial", "url_template": "https://tiles.test/aerial/{z}/{x}/{y}.png" }
            ],
            "flow_line": { "enabled": true }
        }"#,
    )
    .unwrap_or_default()
}

fn cmd_validate(args: &[String]) -> Result<(), String> {
    let path = args.first().ok_or_else(usage)?;
    load_config(Some(path))?;
    println!("{path}: ok");
    Ok(())
}

/// Drives every component through one scripted session and prints the
/// notices they emit, so changes in behavior are visible from the shell.
fn cmd_replay(args: &[String]) -> Result<(), String> {
    let cfg = load_config(args.first())?;
    let mut canvas = MapCanvas::new([1024.0, 768.0]);
    let mut bus = NoticeBus::new();
    let mut now: u64 = 0;

    let mut session = MapSession::new(cfg.view.clone());
    session.initialize(&mut canvas, now);

    let mut registry = TileLayerRegistry::new();
    registry
        .build(&mut canvas, &cfg.tile_sources)
        .map_err(|e| e.to_string())?;
    println!(
        "layers: {} (selector {})",
        registry.layer_ids().len(),
        if registry.show_selector() { "shown" } else { "hidden" }
    );

    let mut progress = LoadProgress::new();
    progress.activate(&canvas, true);

    now += FIT_DEBOUNCE_MS;
    session.tick(now, &mut canvas).map_err(|e| e.to_string())?;

    if let Some(&layer) = registry.layer_ids().first() {
        for _ in 0..4 {
            progress.on_tile_event(layer, TileEvent::LoadStart, now, &mut canvas, &mut bus);
        }
        for i in 0..4 {
            now += 50;
            let event = if i == 3 {
                TileEvent::LoadError
            } else {
                TileEvent::LoadEnd
            };
            progress.on_tile_event(layer, event, now, &mut canvas, &mut bus);
        }
    }
    now += 1_000;
    progress.tick(now);

    let mut renderer = TrackRenderer::new();
    let track = TrackInput {
        id: "73649".to_string(),
        altitudes: vec![420.0, 980.0, 1720.0],
        coordinates: vec![
            [738_000.0, 5_860_000.0],
            [739_500.0, 5_862_000.0],
            [741_000.0, 5_861_000.0],
        ],
        ..TrackInput::default()
    };
    renderer
        .sync(Some(&track), Some(&mut canvas), &cfg, &mut bus)
        .map_err(|e| e.to_string())?;

    canvas.complete_render();
    renderer
        .on_render_complete(&mut canvas)
        .map_err(|e| e.to_string())?;
    session.on_render_frame(&canvas, &mut bus);

    let snapshot = LiveSnapshot {
        location: Some([739_500.0, 5_862_000.0, 1_000.0]),
        track: track.clone(),
    };
    renderer
        .update_live(Some(&snapshot), &mut canvas, &cfg, &mut bus)
        .map_err(|e| e.to_string())?;

    let store = TrackStore::new();
    let mut storage = MemoryStore::new();
    store
        .save(
            &mut storage,
            &PersistedTrack {
                coordinates: vec![[6.632, 46.519], [6.64, 46.53]],
                properties: TrackProperties {
                    id: "drawn".to_string(),
                    color: Some(cfg.track_color.clone()),
                    altitude: vec![400.0, 450.0],
                    name: None,
                },
            },
            &mut bus,
        )
        .map_err(|e| e.to_string())?;
    let restored = store.load(&storage);
    println!("restored tracks: {}", restored.len());

    for notice in bus.drain() {
        println!("[{}] {}", notice.kind, notice.message);
    }
    println!(
        "fits applied: {}, frames: {}, resyncs: {}",
        canvas.fit_log().len(),
        canvas.frame_index(),
        canvas.viewport_resyncs()
    );
    Ok(())
}
