use crate::commands::{CmdMessage, CmdResult, MarkScope};
use crate::error::Result;
use crate::events::ChangeKind;

use super::helpers::mark_count;

pub fn run(scope: MarkScope<'_>) -> Result<CmdResult> {
    let count = scope.marks.marks().count();
    scope.marks.clear();

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Cleared {}", mark_count(count))));
    Ok(result.with_change(ChangeKind::Cleared))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::helpers::sandbox::Sandbox;
    use crate::index::MarkId;
    use crate::model::Cursor;

    #[test]
    fn clear_empties_the_list_holes_included() {
        let mut sb = Sandbox::new();
        for name in ["a.rs", "b.rs"] {
            sb.marks.add(name, Cursor::default()).unwrap();
        }
        sb.marks.remove(&MarkId::Index(1), false).unwrap();

        let result = run(sb.scope()).unwrap();
        assert_eq!(result.messages[0].content, "Cleared 1 mark");
        assert_eq!(result.change, Some(ChangeKind::Cleared));
        assert!(sb.marks.is_empty());
    }

    #[test]
    fn message_counts_marks_in_the_plural() {
        let mut sb = Sandbox::new();
        for name in ["a.rs", "b.rs", "c.rs"] {
            sb.marks.add(name, Cursor::default()).unwrap();
        }
        let result = run(sb.scope()).unwrap();
        assert_eq!(result.messages[0].content, "Cleared 3 marks");
    }
}
