use std::path::Path;

use rustyline::{Config, Editor, Result};
use tracing::debug;

pub const PROMPT: &str = "PAPI> ";

pub fn generate_prompt(custom_prompt: Option<&str>) -> String {
    custom_prompt.unwrap_or(PROMPT).to_string()
}

pub fn rl(history_path: Option<&Path>) -> Result<Editor<()>> {
    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(false)
        .build();
    let mut editor = Editor::with_config(config)?;

    if let Some(path) = history_path {
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                debug!("Could not create history directory {}: {}", parent.display(), e);
            }
        }
        // First run has no history file yet.
        if let Err(e) = editor.load_history(path) {
            debug!("Could not load input history from {}: {}", path.display(), e);
        }
    }

    Ok(editor)
}
