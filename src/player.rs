//! Audio playback dispatch.
//!
//! Two backends behind one capability trait: "system" hands the file to the
//! OS default media handler (start/open/xdg-open), "builtin" decodes and
//! plays it in-process through rodio. Backend is chosen from config at
//! startup, so the pipeline never touches platform branching.

use std::path::Path;
use std::process::Command;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::PlayerConfig;
use crate::errors::PlaybackError;

pub trait AudioPlayer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Start playback of the file at `path`.
    fn play(&self, path: &Path) -> Result<(), PlaybackError>;
}

/// Opens the file with the platform's default media handler. Whether the
/// handler actually plays anything is not observed; only the launch itself
/// can fail.
pub struct SystemPlayer {
    program: String,
    base_args: Vec<String>,
}

impl SystemPlayer {
    pub fn new() -> Self {
        let (program, base_args) = default_handler();
        Self { program, base_args }
    }

    #[cfg(test)]
    fn with_command(program: &str, base_args: &[&str]) -> Self {
        Self {
            program: program.into(),
            base_args: base_args.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for SystemPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioPlayer for SystemPlayer {
    fn name(&self) -> &'static str {
        "system"
    }

    fn play(&self, path: &Path) -> Result<(), PlaybackError> {
        debug!("Launching default media handler for {}", path.display());
        let child = Command::new(&self.program)
            .args(&self.base_args)
            .arg(path)
            .spawn()
            .map_err(|e| PlaybackError::Spawn(e.to_string()))?;

        // Reap the handler in the background so it never lingers as a
        // zombie; its exit status is not part of the contract and is
        // never inspected.
        std::thread::spawn(move || {
            let mut child = child;
            let _ = child.wait();
        });
        Ok(())
    }
}

#[cfg(target_os = "windows")]
fn default_handler() -> (String, Vec<String>) {
    (
        "cmd".into(),
        vec!["/C".into(), "start".into(), String::new()],
    )
}

#[cfg(target_os = "macos")]
fn default_handler() -> (String, Vec<String>) {
    ("open".into(), Vec::new())
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn default_handler() -> (String, Vec<String>) {
    ("xdg-open".into(), Vec::new())
}

/// Decodes the file and plays it on the default output device, blocking
/// until the sink drains.
pub struct RodioPlayer;

impl AudioPlayer for RodioPlayer {
    fn name(&self) -> &'static str {
        "builtin"
    }

    fn play(&self, path: &Path) -> Result<(), PlaybackError> {
        use rodio::{Decoder, OutputStreamBuilder, Sink};
        use std::fs::File;
        use std::io::BufReader;

        let stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| PlaybackError::Builtin(format!("failed to open audio output: {e}")))?;
        let sink = Sink::connect_new(stream.mixer());

        let file = File::open(path)
            .map_err(|e| PlaybackError::Builtin(format!("failed to open audio file: {e}")))?;
        let source = Decoder::new(BufReader::new(file))
            .map_err(|e| PlaybackError::Builtin(format!("failed to decode audio: {e}")))?;

        sink.append(source);
        sink.sleep_until_end();
        debug!("Finished builtin playback of {}", path.display());
        Ok(())
    }
}

/// Select a player backend from config, the same way the typing backend
/// would be: unknown names fall back to the system handler.
pub fn from_config(config: &PlayerConfig) -> Arc<dyn AudioPlayer> {
    let player: Arc<dyn AudioPlayer> = match config.backend.as_str() {
        "builtin" => Arc::new(RodioPlayer),
        "system" => Arc::new(SystemPlayer::new()),
        other => {
            warn!("Unknown player backend '{other}', using system handler");
            Arc::new(SystemPlayer::new())
        }
    };
    info!("Audio player initialized (backend: {})", player.name());
    player
}
