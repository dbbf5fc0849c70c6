//! Plan controller with a load/save lifecycle.
//!
//! [`PlanStore`] owns everything a running editor needs: the configuration,
//! the plan image, the [`Workspace`] and the [`Editor`]. The snapshot is read
//! once in [`PlanStore::open`] and written back through a [`KeyValueStore`]
//! after every mutating batch while an image is loaded. Write failures
//! (storage quota) are logged and swallowed: in-memory state stays
//! authoritative for the rest of the session.

use std::collections::HashMap;

use crate::config::EditorConfig;
use crate::editor::{EditResult, Editor};
use crate::error::{ImageError, ImportError, StorageError};
use crate::format::{self, PlanSnapshot};
use crate::image_info;
use crate::render::FlattenPlan;
use crate::workspace::Workspace;

/// String key-value persistence backend.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory backend, used natively and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Browser `localStorage` backend.
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn open() -> Result<Self, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Backend("No window object available".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| js_error("localStorage access error", e))?
            .ok_or_else(|| StorageError::Backend("localStorage not available".to_string()))?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
fn js_error(context: &str, err: wasm_bindgen::JsValue) -> StorageError {
    StorageError::Backend(format!("{}: {:?}", context, err))
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|e| js_error("Failed to read from localStorage", e))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| js_error("Failed to save to localStorage", e))
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|e| js_error("Failed to remove from localStorage", e))
    }
}

/// Owner of the loaded plan and its persistence.
pub struct PlanStore<S> {
    backend: S,
    config: EditorConfig,
    /// Plan image as a data URI; nothing is persisted without one.
    image: Option<String>,
    workspace: Workspace,
    editor: Editor,
}

impl<S: KeyValueStore> PlanStore<S> {
    /// Open the store, restoring the persisted plan if there is a usable one.
    pub fn open(backend: S, config: EditorConfig) -> Self {
        let mut store = Self {
            backend,
            workspace: Workspace::new(config.clone()),
            config,
            image: None,
            editor: Editor::new(),
        };

        match store.backend.get(&store.config.storage_key) {
            Ok(Some(json)) => match format::import_json(&json, &store.config) {
                Ok(plan) => {
                    log::info!(
                        "Restored plan: {} markers, {} paths, {} areas",
                        plan.workspace.marker_count(),
                        plan.workspace.path_count(),
                        plan.workspace.area_count()
                    );
                    store.image = Some(plan.image);
                    store.workspace = plan.workspace;
                }
                Err(e) => log::warn!("Ignoring unreadable saved plan: {}", e),
            },
            Ok(None) => log::debug!("No saved plan found"),
            Err(e) => log::warn!("Failed to read saved plan: {}", e),
        }
        store
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Start a new plan on `data_uri`, discarding the current annotations.
    ///
    /// An image that fails to decode is still accepted; its size stays unknown
    /// and area boxes are left unclamped.
    pub fn load_image(&mut self, data_uri: String) {
        let image_size = match image_info::image_dimensions(&data_uri) {
            Ok(size) => Some(size),
            Err(e) => {
                log::warn!("Could not read image dimensions: {}", e);
                None
            }
        };
        log::info!("Loaded new plan image");

        self.workspace = Workspace::new(self.config.clone());
        self.workspace.set_image_size(image_size);
        self.editor = Editor::new();
        self.image = Some(data_uri);
        self.commit();
    }

    /// Replace the current plan with an imported one.
    ///
    /// On error nothing changes.
    pub fn import_json(&mut self, json: &str) -> Result<(), ImportError> {
        let plan = format::import_json(json, &self.config)?;
        self.image = Some(plan.image);
        self.workspace = plan.workspace;
        self.editor = Editor::new();
        self.commit();
        Ok(())
    }

    /// The current plan as a JSON snapshot (empty image when none is loaded).
    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        format::export_json(&self.workspace, self.image.as_deref().unwrap_or_default())
    }

    pub fn script_table(&self) -> String {
        format::script_table(&self.workspace)
    }

    /// Draw list for a flattened export of the visible plan.
    pub fn flatten_plan(&self) -> Result<FlattenPlan, ImageError> {
        let image = self.image.as_deref().ok_or(ImageError::UnknownDimensions)?;
        FlattenPlan::build(&self.workspace, image)
    }

    /// Run an editing step and persist if it changed the workspace.
    pub fn edit<F>(&mut self, step: F) -> EditResult
    where
        F: FnOnce(&mut Editor, &mut Workspace) -> EditResult,
    {
        let changed = step(&mut self.editor, &mut self.workspace)?;
        if changed {
            self.commit();
        }
        Ok(changed)
    }

    /// Run an editor step that never mutates the workspace (tool changes,
    /// selection, linking mode).
    pub fn with_editor<R>(&mut self, step: impl FnOnce(&mut Editor, &Workspace) -> R) -> R {
        step(&mut self.editor, &self.workspace)
    }

    /// Persist the current plan. Returns whether a snapshot was written.
    ///
    /// Nothing is written before an image is loaded; failures are logged.
    pub fn commit(&mut self) -> bool {
        let Some(image) = self.image.as_deref() else {
            return false;
        };
        let key = &self.config.storage_key;
        let saved = PlanSnapshot::capture(&self.workspace, image)
            .to_json()
            .map_err(StorageError::from)
            .and_then(|json| self.backend.set(key, &json));

        match saved {
            Ok(()) => {
                log::debug!("Saved plan to {}", key);
                true
            }
            Err(e) => {
                log::warn!("Failed to save plan: {}", e);
                false
            }
        }
    }

    /// Forget the plan, both in memory and in storage.
    pub fn clear(&mut self) {
        if let Err(e) = self.backend.remove(&self.config.storage_key) {
            log::warn!("Failed to clear saved plan: {}", e);
        }
        self.image = None;
        self.workspace = Workspace::new(self.config.clone());
        self.editor = Editor::new();
    }
}
