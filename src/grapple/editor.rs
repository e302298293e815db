use crate::error::{GrappleError, Result};
use std::env;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Text returned from an editor round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorOutcome {
    pub contents: String,
    /// The editor exited successfully. Editors such as vim exit non-zero on
    /// `:cq`, which is how a user abandons the buffer.
    pub saved: bool,
}

/// Picks the editor from `$EDITOR`, then `$VISUAL`. Empty values are skipped.
pub fn pick_editor(editor: Option<String>, visual: Option<String>) -> Option<String> {
    editor
        .filter(|e| !e.trim().is_empty())
        .or_else(|| visual.filter(|v| !v.trim().is_empty()))
}

/// Gets the editor command from environment.
/// Checks $EDITOR, then $VISUAL, then falls back to common editors.
pub fn get_editor() -> Result<String> {
    if let Some(editor) = pick_editor(env::var("EDITOR").ok(), env::var("VISUAL").ok()) {
        return Ok(editor);
    }

    for fallback in &["vim", "vi", "nano"] {
        if Command::new("which")
            .arg(fallback)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
        {
            return Ok((*fallback).to_string());
        }
    }

    Err(GrappleError::Editor(
        "No editor found. Set $EDITOR environment variable.".to_string(),
    ))
}

/// Builds the command line for `editor`, which may carry its own arguments
/// (`code --wait`). With a row, `+<row>` goes before the path, which vi, vim,
/// nano and emacs all understand.
pub fn editor_command(editor: &str, path: &Path, row: Option<usize>) -> Result<Command> {
    let mut parts = editor.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| GrappleError::Editor("Editor command is empty".to_string()))?;

    let mut command = Command::new(program);
    command.args(parts);
    if let Some(row) = row {
        command.arg(format!("+{}", row));
    }
    command.arg(path);
    Ok(command)
}

fn run_editor(editor: &str, path: &Path, row: Option<usize>) -> Result<bool> {
    debug!(%editor, path = %path.display(), "launching editor");

    let status = editor_command(editor, path, row)?
        .status()
        .map_err(|e| GrappleError::Editor(format!("Failed to launch editor '{}': {}", editor, e)))?;
    Ok(status.success())
}

/// Opens a file at `row` and waits for the editor to close.
pub fn open_at<P: AsRef<Path>>(file_path: P, row: usize) -> Result<()> {
    let path = file_path.as_ref();
    if run_editor(&get_editor()?, path, Some(row))? {
        Ok(())
    } else {
        Err(GrappleError::Editor(format!(
            "Editor exited with non-zero status for {}",
            path.display()
        )))
    }
}

/// Opens a file in the user's editor and waits for it to close.
/// Returns the contents of the file after editing.
pub fn open_in_editor<P: AsRef<Path>>(file_path: P) -> Result<EditorOutcome> {
    edit_file_with(&get_editor()?, file_path.as_ref())
}

fn edit_file_with(editor: &str, path: &Path) -> Result<EditorOutcome> {
    let saved = run_editor(editor, path, None)?;
    let contents = fs::read_to_string(path)?;
    Ok(EditorOutcome { contents, saved })
}

/// Round-trips `initial` through the user's editor.
pub fn edit_text(initial: &str) -> Result<EditorOutcome> {
    edit_text_with(&get_editor()?, initial)
}

/// Round-trips `initial` through `editor` using a temporary file that is
/// removed when the editor returns, whatever the outcome.
pub fn edit_text_with(editor: &str, initial: &str) -> Result<EditorOutcome> {
    let mut file = tempfile::Builder::new()
        .prefix("grapple_list_")
        .suffix(".txt")
        .tempfile()?;
    file.write_all(initial.as_bytes())?;
    file.flush()?;

    edit_file_with(editor, file.path())
}
