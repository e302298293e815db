use crate::error::{GrappleError, Result};
use crate::index::MarkId;
use crate::model::{Cursor, GlobalSettings, LIST_FILETYPE};
use crate::paths::ProjectContext;

/// The buffer a command acts on: what the editor has focused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Focus {
    pub filename: String,
    pub filetype: Option<String>,
    pub cursor: Cursor,
}

impl Focus {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            filetype: None,
            cursor: Cursor::default(),
        }
    }

    pub fn with_cursor(mut self, cursor: Cursor) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn with_filetype(mut self, filetype: impl Into<String>) -> Self {
        self.filetype = Some(filetype.into());
        self
    }
}

/// Rejects the list view itself and excluded filetypes.
pub fn check_markable(settings: &GlobalSettings, focus: &Focus) -> Result<()> {
    let Some(filetype) = focus.filetype.as_deref() else {
        return Ok(());
    };
    if filetype == LIST_FILETYPE {
        return Err(GrappleError::ListBuffer);
    }
    if settings.is_excluded(filetype) {
        return Err(GrappleError::ExcludedFiletype(filetype.to_string()));
    }
    Ok(())
}

/// A stable index as the user would type it.
pub fn display_index(settings: &GlobalSettings, index: usize) -> usize {
    if settings.zero_index {
        index.saturating_sub(1)
    } else {
        index
    }
}

/// `1 mark`, `3 marks`.
pub fn mark_count(count: usize) -> String {
    if count == 1 {
        "1 mark".to_string()
    } else {
        format!("{} marks", count)
    }
}

/// Normalizes filename ids; index ids pass through.
pub fn normalized_id(context: &ProjectContext, id: &MarkId) -> MarkId {
    match id {
        MarkId::Filename(name) => MarkId::Filename(normalized(context, name)),
        MarkId::Index(_) => id.clone(),
    }
}

/// The focused filename as stored in the mark list.
///
/// Blank names pass through untouched so the engine rejects them instead of
/// normalizing them to `.`.
pub fn normalized(context: &ProjectContext, filename: &str) -> String {
    if filename.trim().is_empty() {
        filename.to_string()
    } else {
        context.normalize_path(filename)
    }
}

#[cfg(test)]
pub(crate) mod sandbox {
    use crate::commands::MarkScope;
    use crate::marks::ProjectMarks;
    use crate::model::GlobalSettings;
    use crate::paths::ProjectContext;

    pub const ROOT: &str = "/work/app";

    /// Owns what a [`MarkScope`] borrows, for command tests.
    pub struct Sandbox {
        pub marks: ProjectMarks,
        pub settings: GlobalSettings,
        pub context: ProjectContext,
    }

    impl Sandbox {
        pub fn new() -> Self {
            Self {
                marks: ProjectMarks::new(),
                settings: GlobalSettings::default(),
                context: ProjectContext::new(ROOT).with_home(None),
            }
        }

        pub fn scope(&mut self) -> MarkScope<'_> {
            MarkScope {
                marks: &mut self.marks,
                settings: &self.settings,
                context: &self.context,
            }
        }

        pub fn filenames(&self) -> Vec<String> {
            self.marks
                .slots()
                .iter()
                .map(|slot| slot.filename().to_string())
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_view_is_rejected_before_exclusions() {
        let mut settings = GlobalSettings::default();
        settings.excluded_filetypes.clear();
        let focus = Focus::new("marks").with_filetype(LIST_FILETYPE);
        assert!(matches!(
            check_markable(&settings, &focus),
            Err(GrappleError::ListBuffer)
        ));
    }

    #[test]
    fn excluded_filetypes_are_rejected() {
        let mut settings = GlobalSettings::default();
        settings.excluded_filetypes.insert("netrw".to_string());
        let focus = Focus::new("/tmp").with_filetype("netrw");
        assert!(matches!(
            check_markable(&settings, &focus),
            Err(GrappleError::ExcludedFiletype(ft)) if ft == "netrw"
        ));
        assert!(check_markable(&settings, &Focus::new("a.rs").with_filetype("rust")).is_ok());
        assert!(check_markable(&settings, &Focus::new("a.rs")).is_ok());
    }

    #[test]
    fn mark_count_agrees_with_the_number() {
        assert_eq!(mark_count(0), "0 marks");
        assert_eq!(mark_count(1), "1 mark");
        assert_eq!(mark_count(2), "2 marks");
    }

    #[test]
    fn blank_names_are_not_normalized() {
        let context = ProjectContext::new("/p").with_home(None);
        assert_eq!(normalized(&context, "  "), "  ");
        assert_eq!(normalized(&context, "/p/./a.rs"), "a.rs");
    }
}
