//! # Configuration
//!
//! The configuration holds both the global settings and every project's marks.
//! It is resolved once per session from four layers, lowest precedence first:
//!
//! 1. **Compiled defaults** ([`GlobalSettings::default`]).
//! 2. **Cache file**: `<data dir>/grapple.json`, written by grapple on save.
//! 3. **User file**: `<config dir>/grapple.json`, hand-edited, never written.
//! 4. **Runtime overrides**: supplied by the caller (CLI flags).
//!
//! Layers are read as [`ConfigLayer`]s (every field optional) and folded with
//! [`merge_tables`]. A layer that is missing or fails to parse counts as empty;
//! that is logged and never fails the load.
//!
//! ## Repair pass
//!
//! After merging, [`ConfigStore`] makes sure the active project exists with a
//! `mark.marks` list, coerces legacy bare-string marks to records and
//! normalizes the active project's filenames.
//!
//! ## Saving: refresh-merge
//!
//! Several editor sessions may share one cache file. Before writing, the store
//! re-reads the cache and takes **every other project** from disk, keeping only
//! the active project and the global settings from memory. A session therefore
//! never overwrites marks another session saved for an unrelated project.
//! There is no locking: two sessions saving at the same moment still race, and
//! the last writer wins.

use crate::error::Result;
use crate::marks::ProjectMarks;
use crate::merge::{merge_nested, merge_tables, replace, Merge};
use crate::model::{Config, Cursor, GlobalSettings, Mark, MarkConfig, Project, Slot};
use crate::paths::ProjectContext;
use crate::store::{Layer, LayerStore};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, warn};

/// A mark as found in a config file.
///
/// Positions are read as signed integers; values that do not fit a cursor
/// fall back to the default position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawMark {
    /// Legacy form: just the filename.
    Legacy(String),
    Record {
        #[serde(default)]
        filename: Option<String>,
        #[serde(default)]
        row: Option<i64>,
        #[serde(default)]
        col: Option<i64>,
    },
}

impl RawMark {
    fn into_slot(self) -> Slot {
        let (filename, row, col) = match self {
            RawMark::Legacy(filename) => (filename, None, None),
            RawMark::Record { filename, row, col } => (filename.unwrap_or_default(), row, col),
        };
        if filename.is_empty() {
            return Slot::Tombstone;
        }
        let default = Cursor::default();
        let row = position(row).filter(|r| *r >= 1).unwrap_or(default.row);
        let col = position(col).unwrap_or(default.col);
        Slot::Occupied(Mark::new(filename, Cursor::new(row, col)))
    }

    fn from_slot(slot: &Slot) -> Option<Self> {
        slot.mark().map(|mark| RawMark::Record {
            filename: Some(mark.filename.clone()),
            row: i64::try_from(mark.row).ok(),
            col: i64::try_from(mark.col).ok(),
        })
    }
}

fn position(value: Option<i64>) -> Option<usize> {
    value.and_then(|v| usize::try_from(v).ok())
}

/// Reads a marks list entry by entry. An entry that is not a mark becomes a
/// hole, so one bad value never discards the rest of the layer.
fn lenient_marks<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Vec<Option<RawMark>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(raw.map(|entries| {
        entries
            .into_iter()
            .map(|entry| match serde_json::from_value::<Option<RawMark>>(entry) {
                Ok(mark) => mark,
                Err(e) => {
                    warn!(error = %e, "ignoring malformed mark");
                    None
                }
            })
            .collect()
    }))
}

/// Reads projects one by one, skipping (with a warning) any that do not parse.
fn lenient_projects<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<BTreeMap<String, ProjectLayer>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Value>> = Option::deserialize(deserializer)?;
    Ok(raw.map(|projects| {
        projects
            .into_iter()
            .filter_map(|(key, value)| match serde_json::from_value(value) {
                Ok(project) => Some((key, project)),
                Err(e) => {
                    warn!(project = %key, error = %e, "ignoring malformed project");
                    None
                }
            })
            .collect()
    }))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkLayer {
    /// `null` entries are holes.
    #[serde(
        default,
        deserialize_with = "lenient_marks",
        skip_serializing_if = "Option::is_none"
    )]
    pub marks: Option<Vec<Option<RawMark>>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectLayer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mark: Option<MarkLayer>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsLayer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mark_branch: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_on_toggle: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_on_change: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excluded_filetypes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zero_index: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One partially specified configuration source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigLayer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_settings: Option<SettingsLayer>,
    #[serde(
        default,
        deserialize_with = "lenient_projects",
        skip_serializing_if = "Option::is_none"
    )]
    pub projects: Option<BTreeMap<String, ProjectLayer>>,
}

impl Merge for MarkLayer {
    fn merge(&mut self, higher: Self) {
        replace(&mut self.marks, higher.marks);
        self.extra.merge(higher.extra);
    }
}

impl Merge for ProjectLayer {
    fn merge(&mut self, higher: Self) {
        merge_nested(&mut self.mark, higher.mark);
        self.extra.merge(higher.extra);
    }
}

impl Merge for SettingsLayer {
    fn merge(&mut self, higher: Self) {
        replace(&mut self.mark_branch, higher.mark_branch);
        replace(&mut self.save_on_toggle, higher.save_on_toggle);
        replace(&mut self.save_on_change, higher.save_on_change);
        replace(&mut self.excluded_filetypes, higher.excluded_filetypes);
        replace(&mut self.zero_index, higher.zero_index);
        self.extra.merge(higher.extra);
    }
}

impl Merge for ConfigLayer {
    fn merge(&mut self, higher: Self) {
        merge_nested(&mut self.global_settings, higher.global_settings);
        merge_nested(&mut self.projects, higher.projects);
    }
}

impl From<&GlobalSettings> for SettingsLayer {
    fn from(settings: &GlobalSettings) -> Self {
        Self {
            mark_branch: Some(settings.mark_branch),
            save_on_toggle: Some(settings.save_on_toggle),
            save_on_change: Some(settings.save_on_change),
            excluded_filetypes: Some(settings.excluded_filetypes.iter().cloned().collect()),
            zero_index: Some(settings.zero_index),
            extra: settings.extra.clone(),
        }
    }
}

impl From<SettingsLayer> for GlobalSettings {
    fn from(layer: SettingsLayer) -> Self {
        let defaults = GlobalSettings::default();
        Self {
            mark_branch: layer.mark_branch.unwrap_or(defaults.mark_branch),
            save_on_toggle: layer.save_on_toggle.unwrap_or(defaults.save_on_toggle),
            save_on_change: layer.save_on_change.unwrap_or(defaults.save_on_change),
            excluded_filetypes: layer
                .excluded_filetypes
                .map(|types| types.into_iter().collect())
                .unwrap_or(defaults.excluded_filetypes),
            zero_index: layer.zero_index.unwrap_or(defaults.zero_index),
            extra: layer.extra,
        }
    }
}

impl From<&Project> for ProjectLayer {
    fn from(project: &Project) -> Self {
        Self {
            mark: Some(MarkLayer {
                marks: Some(
                    project
                        .mark
                        .marks
                        .slots()
                        .iter()
                        .map(RawMark::from_slot)
                        .collect(),
                ),
                extra: Map::new(),
            }),
            extra: project.extra.clone(),
        }
    }
}

impl From<ProjectLayer> for Project {
    fn from(layer: ProjectLayer) -> Self {
        // Only `marks` lives under `mark`; anything else there is dropped.
        let marks = layer
            .mark
            .and_then(|mark| mark.marks)
            .unwrap_or_default();
        let slots = marks
            .into_iter()
            .map(|raw| raw.map(RawMark::into_slot).unwrap_or(Slot::Tombstone))
            .collect();
        Self {
            mark: MarkConfig {
                marks: ProjectMarks::from_slots(slots),
            },
            extra: layer.extra,
        }
    }
}

impl ConfigLayer {
    /// The compiled-in defaults as the lowest layer.
    pub fn defaults() -> Self {
        Self {
            global_settings: Some(SettingsLayer::from(&GlobalSettings::default())),
            projects: Some(BTreeMap::new()),
        }
    }

    /// Runtime override flipping `mark_branch`.
    pub fn mark_branch(enabled: bool) -> Self {
        Self {
            global_settings: Some(SettingsLayer {
                mark_branch: Some(enabled),
                ..Default::default()
            }),
            projects: None,
        }
    }

    /// Resolves the layer into a complete configuration, filling in defaults.
    pub fn resolve(self) -> Config {
        Config {
            global_settings: self
                .global_settings
                .map(GlobalSettings::from)
                .unwrap_or_default(),
            projects: self
                .projects
                .unwrap_or_default()
                .into_iter()
                .map(|(key, project)| (key, Project::from(project)))
                .collect(),
        }
    }
}

impl From<&Config> for ConfigLayer {
    fn from(config: &Config) -> Self {
        Self {
            global_settings: Some(SettingsLayer::from(&config.global_settings)),
            projects: Some(
                config
                    .projects
                    .iter()
                    .map(|(key, project)| (key.clone(), ProjectLayer::from(project)))
                    .collect(),
            ),
        }
    }
}

/// Parses a layer, treating malformed JSON as an empty layer.
pub fn parse_layer(contents: &str, layer: Layer) -> ConfigLayer {
    if contents.trim().is_empty() {
        return ConfigLayer::default();
    }
    match serde_json::from_str(contents) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(%layer, error = %e, "ignoring malformed config layer");
            ConfigLayer::default()
        }
    }
}

fn read_layer<S: LayerStore>(backend: &S, layer: Layer) -> ConfigLayer {
    match backend.read(layer) {
        Ok(Some(contents)) => parse_layer(&contents, layer),
        Ok(None) => {
            debug!(%layer, "config layer not found");
            ConfigLayer::default()
        }
        Err(e) => {
            warn!(%layer, error = %e, "could not read config layer");
            ConfigLayer::default()
        }
    }
}

/// Expands `~` in project keys and cleans them so that `~/code/app` and
/// `/home/me/code/app/` address the same project. Colliding keys merge.
fn expand_dir(mut layer: ConfigLayer, context: &ProjectContext) -> ConfigLayer {
    if let Some(projects) = layer.projects.take() {
        let mut expanded: BTreeMap<String, ProjectLayer> = BTreeMap::new();
        for (key, project) in projects {
            expanded.merge(BTreeMap::from([(context.expand_key(&key), project)]));
        }
        layer.projects = Some(expanded);
    }
    layer
}

/// Guarantees the active project exists and its filenames are normalized.
///
/// Normalizing can make two entries equal (`./a` and `a`); later duplicates
/// become holes.
pub fn ensure_correct_config(config: &mut Config, key: &str, context: &ProjectContext) {
    let project = config.projects.entry(key.to_string()).or_default();
    let mut seen = HashSet::new();
    let slots = project
        .mark
        .marks
        .slots()
        .iter()
        .map(|slot| match slot {
            Slot::Occupied(mark) => {
                let filename = context.normalize_path(&mark.filename);
                if seen.insert(filename.clone()) {
                    Slot::Occupied(Mark::new(filename, mark.cursor()))
                } else {
                    Slot::Tombstone
                }
            }
            Slot::Tombstone => Slot::Tombstone,
        })
        .collect();
    project.mark.marks = ProjectMarks::from_slots(slots);
}

/// Owns the in-memory configuration and its persistence.
pub struct ConfigStore<S: LayerStore> {
    backend: S,
    context: ProjectContext,
    overrides: ConfigLayer,
    config: Config,
    key: String,
}

impl<S: LayerStore> ConfigStore<S> {
    /// Reads and merges all layers, then repairs the active project.
    pub fn load(backend: S, context: ProjectContext, overrides: ConfigLayer) -> Self {
        let mut store = Self {
            backend,
            context,
            overrides,
            config: Config::default(),
            key: String::new(),
        };
        store.reload();
        store
    }

    /// Re-reads both layers from the backend, replacing in-memory state.
    pub fn reload(&mut self) {
        let cache = expand_dir(read_layer(&self.backend, Layer::Cache), &self.context);
        let user = expand_dir(read_layer(&self.backend, Layer::User), &self.context);
        let overrides = expand_dir(self.overrides.clone(), &self.context);

        let merged: ConfigLayer = merge_tables([ConfigLayer::defaults(), cache, user, overrides]);
        self.config = merged.resolve();
        self.key = self.context.mark_key(&self.config.global_settings);
        ensure_correct_config(&mut self.config, &self.key, &self.context);
        info!(
            project = %self.key,
            marks = self.marks().len(),
            "configuration loaded"
        );
    }

    /// Applies new runtime overrides on top of the current settings.
    ///
    /// The active project key is recomputed, so switching `mark_branch` moves
    /// the session to the branch's marks.
    pub fn reconfigure(&mut self, overrides: ConfigLayer) {
        let current = ConfigLayer::from(&self.config);
        let higher = expand_dir(overrides.clone(), &self.context);
        self.overrides.merge(overrides);

        let merged: ConfigLayer = merge_tables([current, higher]);
        self.config = merged.resolve();
        self.key = self.context.mark_key(&self.config.global_settings);
        ensure_correct_config(&mut self.config, &self.key, &self.context);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn settings(&self) -> &GlobalSettings {
        &self.config.global_settings
    }

    pub fn context(&self) -> &ProjectContext {
        &self.context
    }

    pub fn active_key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    /// The active project's marks.
    pub fn marks(&self) -> &ProjectMarks {
        static EMPTY: ProjectMarks = ProjectMarks::new();
        self.config
            .projects
            .get(&self.key)
            .map(|project| &project.mark.marks)
            .unwrap_or(&EMPTY)
    }

    /// Mutable access to the active project's marks, creating the project
    /// entry if needed.
    pub fn marks_mut(&mut self) -> &mut ProjectMarks {
        &mut self
            .config
            .projects
            .entry(self.key.clone())
            .or_default()
            .mark
            .marks
    }

    /// Splits the store into what a mutating command needs.
    pub fn scope_mut(&mut self) -> MarkScope<'_> {
        let marks = &mut self
            .config
            .projects
            .entry(self.key.clone())
            .or_default()
            .mark
            .marks;
        MarkScope {
            marks,
            settings: &self.config.global_settings,
            context: &self.context,
        }
    }

    /// Re-reads other projects from the cache file so a save does not clobber
    /// them. The active project and the global settings come from memory.
    pub fn refresh_projects(&mut self) {
        let key = self.key.clone();
        let mut disk = expand_dir(read_layer(&self.backend, Layer::Cache), &self.context);
        let mut others = disk.projects.take().unwrap_or_default();
        others.remove(&key);

        let current = ConfigLayer::from(&self.config);
        let active = current
            .projects
            .and_then(|mut projects| projects.remove(&key))
            .unwrap_or_default();

        let merged: ConfigLayer = merge_tables([
            ConfigLayer {
                global_settings: current.global_settings,
                projects: None,
            },
            ConfigLayer {
                global_settings: None,
                projects: Some(others),
            },
            ConfigLayer {
                global_settings: None,
                projects: Some(BTreeMap::from([(key.clone(), active)])),
            },
        ]);

        self.config = merged.resolve();
        ensure_correct_config(&mut self.config, &key, &self.context);
    }

    /// Refresh-merges and writes the cache layer. Write failures propagate.
    pub fn save(&mut self) -> Result<()> {
        self.refresh_projects();
        let contents = serde_json::to_string_pretty(&self.config)?;
        self.backend.write_cache(&contents)?;
        debug!(project = %self.key, "configuration saved");
        Ok(())
    }
}

/// Borrowed view of the active project for command functions.
pub struct MarkScope<'a> {
    pub marks: &'a mut ProjectMarks,
    pub settings: &'a GlobalSettings,
    pub context: &'a ProjectContext,
}
