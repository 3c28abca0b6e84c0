//! Application state: one editor driving one shared diagram scene.

use cardlink_core::{DiagramSnapshot, Editor, EditorConfig, EditorEvent};
use cardlink_render::DiagramScene;
use std::cell::{Ref, RefCell};
use std::path::Path;
use std::rc::Rc;
use thiserror::Error;

/// Errors surfaced by the application shell.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] cardlink_core::ConfigError),
    #[error("Invalid event script: {0}")]
    Script(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome counts for a replayed script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub applied: usize,
    pub rejected: usize,
}

type SharedScene = Rc<RefCell<DiagramScene>>;

/// The application.
pub struct App {
    scene: SharedScene,
    editor: Editor<SharedScene, SharedScene>,
}

impl App {
    /// Create the app with an unmounted scene; call [`App::mount`] once the
    /// host is ready.
    pub fn new(config: EditorConfig) -> Self {
        let scene = Rc::new(RefCell::new(DiagramScene::unmounted()));
        let editor = Editor::new(config, scene.clone(), scene.clone());
        Self { scene, editor }
    }

    /// Create the app from an optional JSON config file.
    pub fn from_config_path(path: Option<&Path>) -> Result<Self, AppError> {
        let config = match path {
            Some(path) => EditorConfig::load(path)?,
            None => EditorConfig::default(),
        };
        Ok(Self::new(config))
    }

    /// Mount the scene and flush registrations queued before it existed.
    pub fn mount(&mut self) {
        self.scene.borrow_mut().mount();
        self.editor.sync_surfaces();
    }

    pub fn editor(&self) -> &Editor<SharedScene, SharedScene> {
        &self.editor
    }

    pub fn scene(&self) -> Ref<'_, DiagramScene> {
        self.scene.borrow()
    }

    /// Apply events in order. A rejected event is logged and skipped, the
    /// way a UI drops an invalid gesture.
    pub fn replay(&mut self, events: impl IntoIterator<Item = EditorEvent>) -> ReplayReport {
        let mut report = ReplayReport::default();
        for event in events {
            match self.editor.handle(event) {
                Ok(response) => {
                    log::debug!("{:?}", response);
                    report.applied += 1;
                }
                Err(err) => {
                    log::warn!("Event rejected: {}", err);
                    report.rejected += 1;
                }
            }
        }
        log::info!(
            "Replayed {} events ({} rejected), {} connectors drawn",
            report.applied + report.rejected,
            report.rejected,
            self.scene.borrow().connectors().len()
        );
        report
    }

    /// Parse a JSON array of events and replay it.
    pub fn replay_json(&mut self, script: &str) -> Result<ReplayReport, AppError> {
        let events: Vec<EditorEvent> = serde_json::from_str(script)?;
        Ok(self.replay(events))
    }

    pub fn snapshot(&self) -> DiagramSnapshot {
        self.editor.snapshot()
    }

    pub fn snapshot_json(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }
}
