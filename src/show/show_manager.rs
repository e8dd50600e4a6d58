use std::{collections::HashMap, path::Path, time::Duration};

use anyhow::{anyhow, bail, Context, Error};
use log::{error, info, warn};
use rand::seq::IteratorRandom;
use tokio::{sync::mpsc, time::sleep};

use super::{cue_messages, SerializableShow};
use crate::InternalMessage;

pub type ShowName = String;
pub type ShowMap = HashMap<ShowName, SerializableShow>;

/// Pause before picking again after a show failed to play
const RETRY_DELAY: Duration = Duration::from_millis(100);

/// The ShowManager turns stored shows into a stream of requests for the
/// laser controller. It never talks to the hardware itself; the controller
/// works through the queue in order, so a full channel is what paces a show.
pub struct ShowManager {
    pub shows: ShowMap,
    pub last_show_name: Option<ShowName>,
    pub message_queue: mpsc::Sender<InternalMessage>,
}

#[derive(Debug, Clone)]
pub enum ShowChoice {
    Name(ShowName),
    Random {
        // Option to not choose the last show
        last_show: Option<ShowName>,
    },
}

impl ShowManager {
    pub fn new(shows: ShowMap, sender: mpsc::Sender<InternalMessage>) -> Self {
        Self {
            shows,
            last_show_name: None,
            message_queue: sender,
        }
    }

    pub fn load_show_file(path: impl AsRef<Path>) -> Result<SerializableShow, Error> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading show {}", path.display()))?;

        serde_json::from_str(&contents).with_context(|| format!("parsing show {}", path.display()))
    }

    /// Load every `.json` show in `dir`, keyed by file name without the
    /// extension. Files that fail to parse or have no cues are skipped.
    pub fn load_shows(dir: impl AsRef<Path>) -> Result<ShowMap, Error> {
        let dir = dir.as_ref();
        let mut shows = ShowMap::new();

        for entry in std::fs::read_dir(dir)
            .with_context(|| format!("reading show folder {}", dir.display()))?
        {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            let name = match path.file_stem().and_then(|s| s.to_str()) {
                Some(name) => name.to_string(),
                None => continue,
            };

            match ShowManager::load_show_file(&path) {
                Ok(show) if show.cues.is_empty() => {
                    warn!("Skipping show {}: it has no cues", path.display())
                }
                Ok(show) => {
                    shows.insert(name, show);
                }
                Err(e) => warn!("Skipping show: {:#}", e),
            }
        }

        let mut names = shows.keys().collect::<Vec<_>>();
        names.sort();
        info!("Found shows: {:?}", names);

        Ok(shows)
    }

    pub fn choose(&self, choice: &ShowChoice) -> Option<(ShowName, SerializableShow)> {
        match choice {
            ShowChoice::Name(name) => self
                .shows
                .get(name)
                .map(|show| (name.clone(), show.clone())),
            ShowChoice::Random { last_show } => {
                let mut rng = rand::thread_rng();

                // Only avoid a repeat when there is something else to play
                let pick = self
                    .shows
                    .iter()
                    .filter(|(name, _)| self.shows.len() < 2 || Some(*name) != last_show.as_ref())
                    .choose(&mut rng);

                pick.map(|(name, show)| (name.clone(), show.clone()))
            }
        }
    }

    /// Queue every cue of `show`. A looping show only returns once the
    /// controller has gone away.
    pub async fn play(&mut self, show: &SerializableShow) -> Result<(), Error> {
        loop {
            self.play_once(show).await?;

            if !show.looping {
                return Ok(());
            }
        }
    }

    /// Queue a single pass of `show`, ignoring its looping flag
    pub async fn play_once(&mut self, show: &SerializableShow) -> Result<(), Error> {
        if show.cues.is_empty() {
            bail!("show {} has no cues", show.name);
        }

        info!(
            "Playing show {} ({} cues, {}ms timed)",
            show.name,
            show.cues.len(),
            show.timed_runtime_ms()
        );

        for cue in &show.cues {
            for message in cue_messages(cue) {
                self.message_queue
                    .send(message)
                    .await
                    .map_err(|_| anyhow!("laser controller has stopped"))?;
            }
        }

        Ok(())
    }

    pub async fn play_named(&mut self, name: &str) -> Result<(), Error> {
        let (name, show) = self
            .choose(&ShowChoice::Name(name.to_string()))
            .ok_or_else(|| anyhow!("show {} not found", name))?;

        self.play(&show).await?;
        self.last_show_name = Some(name);
        Ok(())
    }

    /// Keep picking random shows, never the same one twice in a row, until
    /// the controller stops listening. Each pick plays one pass, looping
    /// shows included.
    pub async fn run_random(&mut self) -> Result<(), Error> {
        if self.shows.is_empty() {
            bail!("no shows loaded");
        }

        loop {
            let choice = ShowChoice::Random {
                last_show: self.last_show_name.clone(),
            };
            let (name, show) = self
                .choose(&choice)
                .ok_or_else(|| anyhow!("no show to choose from"))?;

            if let Err(e) = self.play_once(&show).await {
                if self.message_queue.is_closed() {
                    return Err(e);
                }
                error!("Show {} failed: {:#}", name, e);
                sleep(RETRY_DELAY).await;
            }

            self.last_show_name = Some(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use common::{
        color::{ColorMode, LaserColor},
        effect::EffectId,
    };

    use crate::show::Cue;

    fn cue(effect: EffectId, duration_ms: Option<u64>) -> Cue {
        Cue {
            effect,
            duration_ms,
            color: None,
            color_mode: None,
        }
    }

    fn show(name: &str, looping: bool, cues: Vec<Cue>) -> SerializableShow {
        SerializableShow {
            name: name.to_string(),
            looping,
            cues,
        }
    }

    fn manager(shows: &[SerializableShow]) -> (ShowManager, mpsc::Receiver<InternalMessage>) {
        let (tx, rx) = mpsc::channel(100);
        let shows = shows
            .iter()
            .map(|show| (show.name.clone(), show.clone()))
            .collect();
        (ShowManager::new(shows, tx), rx)
    }

    #[test]
    fn test_load_shows() {
        let dir = std::env::temp_dir().join("laser-control-test-shows");
        std::fs::remove_dir_all(&dir).ok();
        std::fs::create_dir_all(&dir).unwrap();

        let opening = show("opening", true, vec![cue(EffectId::Square, Some(1000))]);
        std::fs::write(
            dir.join("opening.json"),
            serde_json::to_string(&opening).unwrap(),
        )
        .unwrap();
        std::fs::write(dir.join("broken.json"), "{ not json").unwrap();
        std::fs::write(dir.join("empty.json"), r#"{"name": "empty", "cues": []}"#).unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let shows = ShowManager::load_shows(&dir).unwrap();
        assert_eq!(shows.len(), 1);
        assert_eq!(shows.get("opening"), Some(&opening));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_show_folder() {
        let dir = std::env::temp_dir().join("laser-control-test-no-such-folder");
        assert!(ShowManager::load_shows(dir).is_err());
    }

    #[test]
    fn test_choose() {
        let (manager, _rx) = manager(&[
            show("a", false, vec![cue(EffectId::Square, None)]),
            show("b", false, vec![cue(EffectId::Heart, None)]),
        ]);

        let (name, _) = manager.choose(&ShowChoice::Name("b".to_string())).unwrap();
        assert_eq!(name, "b");
        assert!(manager
            .choose(&ShowChoice::Name("c".to_string()))
            .is_none());

        for _ in 0..20 {
            let (name, _) = manager
                .choose(&ShowChoice::Random {
                    last_show: Some("a".to_string()),
                })
                .unwrap();
            assert_eq!(name, "b");
        }
    }

    #[test]
    fn test_random_with_one_show_repeats() {
        let (manager, _rx) = manager(&[show("only", false, vec![cue(EffectId::Square, None)])]);

        let (name, _) = manager
            .choose(&ShowChoice::Random {
                last_show: Some("only".to_string()),
            })
            .unwrap();
        assert_eq!(name, "only");
    }

    #[tokio::test]
    async fn test_play_queues_cues_in_order() {
        let mut colored = cue(EffectId::Heart, Some(200));
        colored.color = Some(LaserColor::RED);
        colored.color_mode = Some(ColorMode::Rave);

        let opening = show("opening", false, vec![cue(EffectId::Square, None), colored]);
        let (mut manager, mut rx) = manager(&[opening]);

        manager.play_named("opening").await.unwrap();
        assert_eq!(manager.last_show_name.as_deref(), Some("opening"));

        let mut received = Vec::new();
        while let Ok(message) = rx.try_recv() {
            received.push(message);
        }

        assert_eq!(received.len(), 4);
        assert!(matches!(
            received[0],
            InternalMessage::Effect {
                id: EffectId::Square,
                duration: None
            }
        ));
        assert!(matches!(
            received[1],
            InternalMessage::SetColor(Some(LaserColor::RED))
        ));
        assert!(matches!(
            received[2],
            InternalMessage::SetColorMode(ColorMode::Rave)
        ));
        assert!(matches!(
            received[3],
            InternalMessage::Effect {
                id: EffectId::Heart,
                duration: Some(d)
            } if d == Duration::from_millis(200)
        ));
    }

    #[tokio::test]
    async fn test_empty_show_is_rejected() {
        let (mut manager, _rx) = manager(&[]);
        assert!(manager.play(&show("empty", false, vec![])).await.is_err());
        assert!(manager.play_named("missing").await.is_err());
        assert!(manager.run_random().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_random_backs_off_on_bad_show() {
        let (mut manager, _rx) = manager(&[show("empty", false, vec![])]);

        // Keeps retrying without hogging the runtime, so the timeout can fire
        let result = tokio::time::timeout(Duration::from_millis(500), manager.run_random()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_random_moves_past_looping_shows() {
        let (mut manager, mut rx) = manager(&[
            show("a", true, vec![cue(EffectId::Square, Some(10))]),
            show("b", true, vec![cue(EffectId::Heart, Some(10))]),
        ]);

        let reader = tokio::spawn(async move {
            let mut ids = Vec::new();
            while ids.len() < 6 {
                if let Some(InternalMessage::Effect { id, .. }) = rx.recv().await {
                    ids.push(id);
                }
            }
            ids
        });

        assert!(manager.run_random().await.is_err());
        let ids = reader.await.unwrap();
        assert!(ids.windows(2).all(|pair| pair[0] != pair[1]), "{:?}", ids);
    }

    #[tokio::test]
    async fn test_looping_show_stops_with_controller() {
        let looping = show("loop", true, vec![cue(EffectId::Effect7, Some(10))]);
        let (mut manager, mut rx) = manager(&[]);

        let reader = tokio::spawn(async move {
            for _ in 0..250 {
                rx.recv().await.unwrap();
            }
        });

        assert!(manager.play(&looping).await.is_err());
        reader.await.unwrap();
    }
}
