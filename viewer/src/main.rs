extern crate nalgebra as na;
extern crate inequality_graph as kernel;

mod canvas;
mod editor;

use kernel::{EngineConfig, GraphEngine, GraphSnapshot};

use anyhow::Context;
use eframe::egui;

use std::path::{Path, PathBuf};

/// Environment variable naming an optional JSON file with an [`EngineConfig`].
const CONFIG_ENV: &str = "GRAPH_VIEWER_CONFIG";

pub fn run(editor: editor::GraphEditor) -> anyhow::Result<()> {
    let native_options = eframe::NativeOptions::default();
    eframe::run_native("Inequality graph", native_options, Box::new(move |_cc| Box::new(App::new(editor))))
        .map_err(|e| anyhow::anyhow!("{}", e))
}

pub struct App {
    editor: editor::GraphEditor,
}

impl App {
    fn new(editor: editor::GraphEditor) -> Self {
        Self {
            editor,
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.editor.show(ui);
        });
    }
}

fn load_config() -> anyhow::Result<EngineConfig> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {:?}", path))?;
            Ok(EngineConfig::from_json(&json).context("parsing config")?)
        }
        None => Ok(EngineConfig::default()),
    }
}

fn load_engine(path: Option<&Path>, config: EngineConfig) -> anyhow::Result<GraphEngine> {
    let path = match path.filter(|p| p.exists()) {
        Some(path) => path,
        None => return Ok(GraphEngine::new(config)),
    };

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let snapshot = GraphSnapshot::from_json(&json)
        .with_context(|| format!("parsing {}", path.display()))?;

    log::info!("loaded {} lines from {}", snapshot.lines.len(), path.display());
    Ok(GraphEngine::from_snapshot_with_config(&snapshot, config))
}

pub fn main() -> anyhow::Result<()> {
    env_logger::init();

    let snapshot_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = load_config()?;
    let engine = load_engine(snapshot_path.as_deref(), config)?;

    run(editor::GraphEditor::new(engine, snapshot_path))
}
