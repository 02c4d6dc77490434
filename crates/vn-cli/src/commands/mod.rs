pub mod check;
pub mod play;
pub mod trace;

use std::path::Path;

use vn_core::PresentationConfig;
use vn_stage::{Script, Stage};

use crate::voice::{ConsoleVoice, Gesture};

/// A stage whose cues and music are console voices.
pub type ConsoleStage = Stage<ConsoleVoice, ConsoleVoice>;

fn load_script(path: &Path) -> Result<Script, String> {
    Script::load(path).map_err(|e| e.to_string())
}

/// Load the configuration file if one was given, otherwise the defaults.
fn load_config(path: Option<&Path>) -> Result<PresentationConfig, String> {
    match path {
        Some(path) => PresentationConfig::load(path).map_err(|e| e.to_string()),
        None => Ok(PresentationConfig::default()),
    }
}

/// Build a stage with one console voice per cue slot plus the music channel.
fn build_stage(
    script: Script,
    config: PresentationConfig,
    gesture: &Gesture,
) -> Result<ConsoleStage, String> {
    let cues = (0..config.cue_pool_size)
        .map(|_| ConsoleVoice::new(gesture.clone()))
        .collect();
    Stage::new(script, config, cues, ConsoleVoice::new(gesture.clone())).map_err(|e| e.to_string())
}
