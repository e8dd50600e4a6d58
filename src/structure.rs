use std::{fs, path::Path};

use anyhow::{Context, Error};
use log::info;

use crate::{
    effect::EffectId,
    show::{Cue, SerializableShow},
};

pub const SHOWS_DIR: &str = "shows";
pub const DEMO_SHOW: &str = "all-effects";

pub struct FileStructure {}

impl FileStructure {
    /// Make sure `dir` holds a shows folder, writing a demo show that walks
    /// through every effect slot if the folder is new or empty
    pub fn verify(dir: impl AsRef<Path>) -> Result<(), Error> {
        let shows = dir.as_ref().join(SHOWS_DIR);
        if !shows.exists() {
            fs::create_dir_all(&shows)
                .with_context(|| format!("creating {}", shows.display()))?;
        }

        let has_shows = fs::read_dir(&shows)?
            .filter_map(Result::ok)
            .any(|entry| entry.path().extension().and_then(|ext| ext.to_str()) == Some("json"));

        if !has_shows {
            let name = shows.join(format!("{}.json", DEMO_SHOW));
            info!("Writing demo show to {}", name.display());
            fs::write(&name, serde_json::to_string_pretty(&FileStructure::demo_show())?)
                .with_context(|| format!("writing {}", name.display()))?;
        }

        Ok(())
    }

    /// Every slot in turn with its fixed timing
    pub fn demo_show() -> SerializableShow {
        SerializableShow {
            name: DEMO_SHOW.to_string(),
            looping: true,
            cues: EffectId::ALL
                .iter()
                .map(|id| Cue {
                    effect: *id,
                    duration_ms: None,
                    color: None,
                    color_mode: None,
                })
                .collect(),
        }
    }
}
