//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for all grapple operations, whichever client drives them (the
//! bundled CLI or an editor plugin).
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function with the active
//!   project's marks
//! - **Normalizes inputs** (user-typed ids become [`MarkId`]s)
//! - **Notifies** change listeners after every mutation, saving first when
//!   `save_on_change` is set
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **Presentation concerns**: Returns data structures, not strings
//!
//! ## Generic Over LayerStore
//!
//! `GrappleApi<S: LayerStore>` is generic over the storage backend:
//! - Production: `GrappleApi<FileStore>`
//! - Testing: `GrappleApi<InMemoryStore>`

use crate::commands;
use crate::config::{ConfigLayer, ConfigStore};
use crate::error::{GrappleError, Result};
use crate::events::{ChangeEvent, Listeners};
use crate::index::MarkId;
use crate::menu::{MenuAction, MenuSession};
use crate::model::{Cursor, GlobalSettings};
use crate::store::LayerStore;
use std::str::FromStr;
use tracing::debug;

pub struct GrappleApi<S: LayerStore> {
    store: ConfigStore<S>,
    listeners: Listeners,
}

impl<S: LayerStore> GrappleApi<S> {
    pub fn new(store: ConfigStore<S>) -> Self {
        Self {
            store,
            listeners: Listeners::new(),
        }
    }

    /// Registers a listener run after every change to the active project.
    pub fn on_changed<F>(&mut self, listener: F)
    where
        F: FnMut(&ChangeEvent) + 'static,
    {
        self.listeners.on_changed(listener);
    }

    pub fn add_mark(&mut self, focus: &Focus) -> Result<CmdResult> {
        let result = commands::add::run(self.store.scope_mut(), focus)?;
        self.finish(result)
    }

    pub fn remove_mark(&mut self, id: &str) -> Result<CmdResult> {
        let id = parse_id(id)?;
        let result = commands::remove::run(self.store.scope_mut(), &id)?;
        self.finish(result)
    }

    pub fn toggle_mark(&mut self, focus: &Focus) -> Result<CmdResult> {
        let result = commands::toggle::run(self.store.scope_mut(), focus)?;
        self.finish(result)
    }

    pub fn clear_marks(&mut self) -> Result<CmdResult> {
        let result = commands::clear::run(self.store.scope_mut())?;
        self.finish(result)
    }

    pub fn list_marks(&self) -> Result<CmdResult> {
        commands::list::run(self.store.marks())
    }

    pub fn length(&self) -> usize {
        commands::list::length(self.store.marks())
    }

    pub fn get_mark(&self, id: &str) -> Result<CmdResult> {
        let id = parse_id(id)?;
        commands::get::run(
            self.store.marks(),
            self.store.context(),
            self.settings().zero_index,
            &id,
        )
    }

    pub fn replace_marks<I: AsRef<str>>(&mut self, entries: &[I], cursor: Cursor) -> Result<CmdResult> {
        let result = commands::replace::run(self.store.scope_mut(), entries, cursor)?;
        self.finish(result)
    }

    pub fn store_cursor_offset(&mut self, focus: &Focus) -> Result<CmdResult> {
        let result = commands::offset::run(self.store.scope_mut(), focus)?;
        self.finish(result)
    }

    pub fn set_current_at(&mut self, index: usize, focus: &Focus) -> Result<CmdResult> {
        let result = commands::place::run(self.store.scope_mut(), index, focus)?;
        self.finish(result)
    }

    pub fn export(&self) -> Result<CmdResult> {
        commands::export::run(self.store.marks())
    }

    pub fn nav_file(&self, id: &str) -> Result<CmdResult> {
        let id = parse_id(id)?;
        commands::jump::goto(
            self.store.marks(),
            self.store.context(),
            self.settings().zero_index,
            &id,
        )
    }

    pub fn nav_next(&self, current: &str) -> Result<CmdResult> {
        commands::jump::next(self.store.marks(), self.store.context(), current)
    }

    pub fn nav_prev(&self, current: &str) -> Result<CmdResult> {
        commands::jump::prev(self.store.marks(), self.store.context(), current)
    }

    pub fn status(&self, filename: &str) -> Result<CmdResult> {
        commands::status::run(self.store.marks(), self.store.context(), filename)
    }

    pub fn current_index(&self, filename: &str) -> Option<usize> {
        commands::status::current_index(self.store.marks(), self.store.context(), filename)
    }

    pub fn show_config(&self) -> Result<CmdResult> {
        commands::config::run(self.store.config(), self.store.active_key())
    }

    /// Starts a list-editor session for the active project.
    pub fn open_menu(&self) -> MenuSession {
        MenuSession::open(self.store.active_key(), self.store.marks())
    }

    /// Ends a list-editor session. Written buffers always apply; closed ones
    /// only with `save_on_toggle`. An unmodified buffer changes nothing, so
    /// holes survive opening and closing the list.
    pub fn apply_menu(&mut self, session: &MenuSession, action: MenuAction) -> Result<CmdResult> {
        if session.project() != self.store.active_key() {
            return Err(GrappleError::Api(format!(
                "List was opened for project {}",
                session.project()
            )));
        }

        let mut result = CmdResult::default();
        if !action.applies(self.settings()) {
            result.add_message(CmdMessage::info("List closed without saving"));
            return Ok(result);
        }
        if !session.is_modified() {
            result.add_message(CmdMessage::info("No changes to the mark list"));
            return Ok(result);
        }
        let items = session.items();
        self.replace_marks(&items[..], Cursor::default())
    }

    /// Applies runtime overrides, e.g. switching to branch-scoped marks.
    pub fn reconfigure(&mut self, overrides: ConfigLayer) {
        self.store.reconfigure(overrides);
    }

    pub fn save(&mut self) -> Result<()> {
        self.store.save()
    }

    pub fn settings(&self) -> &GlobalSettings {
        self.store.settings()
    }

    pub fn active_key(&self) -> &str {
        self.store.active_key()
    }

    pub fn store(&self) -> &ConfigStore<S> {
        &self.store
    }

    /// Saves (with `save_on_change`) and notifies listeners for mutations.
    fn finish(&mut self, result: CmdResult) -> Result<CmdResult> {
        let Some(kind) = result.change.clone() else {
            return Ok(result);
        };
        if self.settings().save_on_change {
            self.store.save()?;
        }
        let event = ChangeEvent {
            project: self.store.active_key().to_string(),
            kind,
        };
        debug!(project = %event.project, change = ?event.kind, "marks changed");
        self.listeners.emit(&event);
        Ok(result)
    }
}

fn parse_id(input: &str) -> Result<MarkId> {
    MarkId::from_str(input).map_err(GrappleError::InvalidInput)
}

pub use crate::commands::helpers::Focus;
pub use crate::commands::{CmdMessage, CmdResult, MessageLevel};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ChangeKind;
    use crate::paths::ProjectContext;
    use crate::store::memory::InMemoryStore;
    use crate::store::Layer;
    use serde_json::{json, Value};
    use std::cell::RefCell;
    use std::rc::Rc;

    const ROOT: &str = "/work/app";

    fn api_with(backend: InMemoryStore) -> GrappleApi<InMemoryStore> {
        let context = ProjectContext::new(ROOT).with_home(None);
        GrappleApi::new(ConfigStore::load(backend, context, ConfigLayer::default()))
    }

    fn api() -> GrappleApi<InMemoryStore> {
        api_with(InMemoryStore::new())
    }

    fn recorded(api: &mut GrappleApi<InMemoryStore>) -> Rc<RefCell<Vec<ChangeKind>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        api.on_changed(move |e| sink.borrow_mut().push(e.kind.clone()));
        log
    }

    fn filenames(api: &GrappleApi<InMemoryStore>) -> Vec<String> {
        api.list_marks()
            .unwrap()
            .listed_marks
            .iter()
            .map(|dm| dm.slot.filename().to_string())
            .collect()
    }

    #[test]
    fn mutations_notify_listeners_in_order() {
        let mut api = api();
        let log = recorded(&mut api);

        api.add_mark(&Focus::new("a.rs")).unwrap();
        api.toggle_mark(&Focus::new("b.rs")).unwrap();
        api.remove_mark("1").unwrap();
        api.clear_marks().unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                ChangeKind::Added(1),
                ChangeKind::Added(2),
                ChangeKind::Removed(1),
                ChangeKind::Cleared
            ]
        );
    }

    #[test]
    fn no_op_mutations_are_silent() {
        let mut api = api();
        api.add_mark(&Focus::new("a.rs")).unwrap();
        let log = recorded(&mut api);

        api.add_mark(&Focus::new("a.rs")).unwrap();
        api.remove_mark("7").unwrap();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn save_on_change_writes_before_notifying() {
        let mut api = api();
        api.add_mark(&Focus::new("a.rs")).unwrap();
        assert_eq!(api.store().backend().writes(), 1);

        let saved: Value =
            serde_json::from_str(api.store().backend().layer(Layer::Cache).unwrap()).unwrap();
        assert_eq!(
            saved["projects"][ROOT]["mark"]["marks"],
            json!([{"filename": "a.rs", "row": 1, "col": 0}])
        );
    }

    #[test]
    fn without_save_on_change_nothing_is_written() {
        let backend = InMemoryStore::new().with_layer(
            Layer::User,
            json!({"global_settings": {"save_on_change": false}}).to_string(),
        );
        let mut api = api_with(backend);
        api.add_mark(&Focus::new("a.rs")).unwrap();
        assert_eq!(api.store().backend().writes(), 0);

        api.save().unwrap();
        assert_eq!(api.store().backend().writes(), 1);
    }

    #[test]
    fn cursor_offset_always_notifies() {
        let mut api = api();
        let log = recorded(&mut api);
        api.store_cursor_offset(&Focus::new("unmarked.rs")).unwrap();
        assert_eq!(*log.borrow(), vec![ChangeKind::CursorStored]);
    }

    #[test]
    fn invalid_ids_are_rejected() {
        let mut api = api();
        assert!(matches!(api.remove_mark("  "), Err(GrappleError::InvalidInput(_))));
        assert!(matches!(api.get_mark(""), Err(GrappleError::InvalidInput(_))));
    }

    #[test]
    fn get_and_nav_use_zero_index_setting() {
        let backend = InMemoryStore::new().with_layer(
            Layer::User,
            json!({"global_settings": {"zero_index": true}}).to_string(),
        );
        let mut api = api_with(backend);
        api.add_mark(&Focus::new("a.rs")).unwrap();

        assert_eq!(api.get_mark("0").unwrap().mark.unwrap().filename, "a.rs");
        assert_eq!(api.nav_file("0").unwrap().target.unwrap().filename, "a.rs");
        assert!(api.get_mark("1").unwrap().mark.is_none());
    }

    #[test]
    fn menu_write_applies_and_close_respects_save_on_toggle() {
        let mut api = api();
        for name in ["a.rs", "b.rs"] {
            api.add_mark(&Focus::new(name)).unwrap();
        }

        let mut session = api.open_menu();
        session.set_contents("b.rs\n");
        api.apply_menu(&session, MenuAction::Close).unwrap();
        assert_eq!(filenames(&api), vec!["a.rs", "b.rs"]);

        api.apply_menu(&session, MenuAction::Write).unwrap();
        assert_eq!(filenames(&api), vec!["b.rs"]);

        api.reconfigure(ConfigLayer {
            global_settings: Some(crate::config::SettingsLayer {
                save_on_toggle: Some(true),
                ..Default::default()
            }),
            projects: None,
        });
        let mut session = api.open_menu();
        session.set_contents("c.rs\nb.rs\n");
        api.apply_menu(&session, MenuAction::Close).unwrap();
        assert_eq!(filenames(&api), vec!["c.rs", "b.rs"]);
    }

    #[test]
    fn unmodified_menu_keeps_holes() {
        let mut api = api();
        for name in ["a.rs", "b.rs", "c.rs"] {
            api.add_mark(&Focus::new(name)).unwrap();
        }
        api.remove_mark("2").unwrap();

        let session = api.open_menu();
        let result = api.apply_menu(&session, MenuAction::Write).unwrap();
        assert_eq!(result.change, None);
        assert_eq!(filenames(&api), vec!["a.rs", "", "c.rs"]);
    }

    #[test]
    fn scenario_remove_then_add_reuses_the_hole() {
        let mut api = api();
        api.add_mark(&Focus::new("/work/app/x.lua").with_cursor(Cursor::new(10, 4)))
            .unwrap();
        api.add_mark(&Focus::new("/work/app/y.lua").with_cursor(Cursor::new(1, 0)))
            .unwrap();
        assert_eq!(api.length(), 2);

        api.remove_mark("1").unwrap();
        assert_eq!(api.length(), 2);
        assert_eq!(api.get_mark("1").unwrap().mark.unwrap().filename, "");

        api.add_mark(&Focus::new("/work/app/z.lua")).unwrap();
        assert_eq!(filenames(&api), vec!["z.lua", "y.lua"]);
        assert_eq!(api.current_index("/work/app/y.lua"), Some(2));
        assert_eq!(api.status("y.lua").unwrap().status.as_deref(), Some("M2"));
    }

    #[test]
    fn show_config_lists_the_active_project() {
        let api = api();
        let result = api.show_config().unwrap();
        assert_eq!(result.projects, vec![ROOT]);
        assert!(result.settings.unwrap().save_on_change);
    }
}
