use crate::commands::{CmdMessage, CmdResult, MarkScope};
use crate::error::Result;
use crate::events::ChangeKind;

use super::helpers::{check_markable, display_index, normalized, Focus};

pub fn run(scope: MarkScope<'_>, focus: &Focus) -> Result<CmdResult> {
    check_markable(scope.settings, focus)?;
    let filename = normalized(scope.context, &focus.filename);
    let (index, added) = scope.marks.add(&filename, focus.cursor)?;
    let shown = display_index(scope.settings, index);

    let mut result = CmdResult::default();
    if added {
        result.add_message(CmdMessage::success(format!(
            "Marked {} as {}",
            filename, shown
        )));
        Ok(result.with_change(ChangeKind::Added(index)))
    } else {
        result.add_message(CmdMessage::info(format!(
            "{} is already mark {}",
            filename, shown
        )));
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::helpers::sandbox::Sandbox;
    use crate::error::GrappleError;
    use crate::index::MarkId;
    use crate::model::{Cursor, Mark, LIST_FILETYPE};

    #[test]
    fn adds_normalized_filename_with_cursor() {
        let mut sb = Sandbox::new();
        let focus = Focus::new("/work/app/./src/main.rs").with_cursor(Cursor::new(7, 2));
        let result = run(sb.scope(), &focus).unwrap();

        assert_eq!(result.change, Some(ChangeKind::Added(1)));
        assert_eq!(
            sb.marks.get(&MarkId::Index(1), false),
            Some(Mark::new("src/main.rs", Cursor::new(7, 2)))
        );
    }

    #[test]
    fn adding_twice_is_a_no_op() {
        let mut sb = Sandbox::new();
        run(sb.scope(), &Focus::new("a.rs")).unwrap();
        let again = run(sb.scope(), &Focus::new("./a.rs").with_cursor(Cursor::new(9, 9))).unwrap();

        assert_eq!(again.change, None);
        assert_eq!(sb.marks.len(), 1);
        assert_eq!(sb.marks.get(&MarkId::Index(1), false).unwrap().row, 1);
    }

    #[test]
    fn fills_the_lowest_hole() {
        let mut sb = Sandbox::new();
        for name in ["a.rs", "b.rs", "c.rs"] {
            run(sb.scope(), &Focus::new(name)).unwrap();
        }
        sb.marks.remove(&MarkId::Index(1), false).unwrap();

        let result = run(sb.scope(), &Focus::new("d.rs")).unwrap();
        assert_eq!(result.change, Some(ChangeKind::Added(1)));
        assert_eq!(sb.filenames(), vec!["d.rs", "b.rs", "c.rs"]);
    }

    #[test]
    fn rejects_excluded_and_list_buffers_without_mutating() {
        let mut sb = Sandbox::new();
        sb.settings.excluded_filetypes.insert("help".to_string());

        let err = run(sb.scope(), &Focus::new("doc.txt").with_filetype("help")).unwrap_err();
        assert!(matches!(err, GrappleError::ExcludedFiletype(_)));
        let err = run(sb.scope(), &Focus::new("x").with_filetype(LIST_FILETYPE)).unwrap_err();
        assert!(matches!(err, GrappleError::ListBuffer));
        assert!(sb.marks.is_empty());
    }

    #[test]
    fn rejects_empty_filename() {
        let mut sb = Sandbox::new();
        let err = run(sb.scope(), &Focus::new("")).unwrap_err();
        assert!(matches!(err, GrappleError::InvalidInput(_)));
    }

    #[test]
    fn message_uses_zero_based_index_when_configured() {
        let mut sb = Sandbox::new();
        sb.settings.zero_index = true;
        let result = run(sb.scope(), &Focus::new("a.rs")).unwrap();
        assert_eq!(result.messages[0].content, "Marked a.rs as 0");
    }
}
