use crate::commands::CmdResult;
use crate::error::Result;
use crate::marks::ProjectMarks;
use crate::paths::ProjectContext;

use super::helpers::normalized;

/// Statusline tag for `filename`: `M<index>`, or empty when unmarked.
pub fn run(marks: &ProjectMarks, context: &ProjectContext, filename: &str) -> Result<CmdResult> {
    let status = marks.status(&normalized(context, filename));
    Ok(CmdResult {
        status: Some(status),
        ..Default::default()
    })
}

pub fn current_index(marks: &ProjectMarks, context: &ProjectContext, filename: &str) -> Option<usize> {
    marks.index_of(&normalized(context, filename))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::MarkId;
    use crate::model::Cursor;

    #[test]
    fn status_uses_the_stable_index() {
        let mut marks = ProjectMarks::new();
        marks.add("a.rs", Cursor::default()).unwrap();
        marks.add("b.rs", Cursor::default()).unwrap();
        marks.remove(&MarkId::Index(1), false).unwrap();
        let context = ProjectContext::new("/work/app").with_home(None);

        assert_eq!(run(&marks, &context, "/work/app/b.rs").unwrap().status.as_deref(), Some("M2"));
        assert_eq!(run(&marks, &context, "a.rs").unwrap().status.as_deref(), Some(""));
        assert_eq!(current_index(&marks, &context, "./b.rs"), Some(2));
        assert_eq!(current_index(&marks, &context, "a.rs"), None);
    }
}
