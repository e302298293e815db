use crate::commands::{CmdMessage, CmdResult, MarkScope};
use crate::error::Result;
use crate::events::ChangeKind;
use crate::marks::Toggled;

use super::helpers::{check_markable, normalized, Focus};

pub fn run(scope: MarkScope<'_>, focus: &Focus) -> Result<CmdResult> {
    check_markable(scope.settings, focus)?;
    let filename = normalized(scope.context, &focus.filename);
    let mut result = CmdResult::default();

    let change = match scope.marks.toggle(&filename, focus.cursor)? {
        Toggled::Added(index) => {
            result.add_message(CmdMessage::success("Mark added"));
            ChangeKind::Added(index)
        }
        Toggled::Removed(index) => {
            result.add_message(CmdMessage::success("Mark removed"));
            ChangeKind::Removed(index)
        }
    };
    Ok(result.with_change(change))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::helpers::sandbox::Sandbox;
    use crate::error::GrappleError;
    use crate::model::Cursor;

    #[test]
    fn toggling_twice_restores_the_list() {
        let mut sb = Sandbox::new();
        sb.marks.add("a.rs", Cursor::default()).unwrap();
        let before = sb.marks.clone();

        let added = run(sb.scope(), &Focus::new("b.rs")).unwrap();
        assert_eq!(added.messages[0].content, "Mark added");
        assert_eq!(added.change, Some(ChangeKind::Added(2)));

        let removed = run(sb.scope(), &Focus::new("./b.rs")).unwrap();
        assert_eq!(removed.messages[0].content, "Mark removed");
        assert_eq!(removed.change, Some(ChangeKind::Removed(2)));

        assert_eq!(sb.marks, before);
    }

    #[test]
    fn toggling_an_interior_mark_leaves_a_hole() {
        let mut sb = Sandbox::new();
        for name in ["a.rs", "b.rs", "c.rs"] {
            sb.marks.add(name, Cursor::default()).unwrap();
        }
        run(sb.scope(), &Focus::new("b.rs")).unwrap();
        assert_eq!(sb.filenames(), vec!["a.rs", "", "c.rs"]);
    }

    #[test]
    fn excluded_filetype_is_rejected() {
        let mut sb = Sandbox::new();
        let err = run(sb.scope(), &Focus::new("list").with_filetype("grapple")).unwrap_err();
        assert!(matches!(err, GrappleError::ListBuffer));
    }
}
