use std::path::Path;

use eyre::{Result, eyre};
use tokio::process::Command;

/// Hand an audio file to an external player.
///
/// `player` is a command line such as `mpv --no-video`; the file path is
/// appended as the last argument. The player is started in the background
/// and not waited on, so the chat continues while the clip plays.
///
/// # Errors
///
/// Returns an error if the player command is empty or cannot be spawned.
pub fn play_clip(player: &str, path: &Path) -> Result<()> {
    let mut parts = player.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| eyre!("Audio player command cannot be empty"))?;

    tracing::debug!("Playing {} with {}", path.display(), player);

    Command::new(program)
        .args(parts)
        .arg(path)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .map_err(|e| eyre!("Failed to start audio player '{}': {}", program, e))?;

    Ok(())
}
