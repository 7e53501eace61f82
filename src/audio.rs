//! Sound cues. Playback is best-effort: every cue returns a `Result`, and the
//! game hands it to [`discard`], which logs a failure and moves on.

use log::{debug, info, warn};
use thiserror::Error;

use crate::config::AudioConfig;

// Only the rodio backend produces these outside tests
#[cfg_attr(not(feature = "audio"), allow(dead_code))]
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output available: {0}")]
    Unavailable(String),
    #[error("failed to open sound file {path}: {reason}")]
    Asset { path: String, reason: String },
    #[error("playback failed: {0}")]
    Playback(String),
}

pub trait AudioCues {
    fn play_food(&mut self) -> Result<(), AudioError>;
    fn play_game_over(&mut self) -> Result<(), AudioError>;
    /// Start the background loop from the beginning
    fn play_music(&mut self) -> Result<(), AudioError>;
    fn pause_music(&mut self) -> Result<(), AudioError>;
}

impl<A: AudioCues + ?Sized> AudioCues for Box<A> {
    fn play_food(&mut self) -> Result<(), AudioError> {
        (**self).play_food()
    }

    fn play_game_over(&mut self) -> Result<(), AudioError> {
        (**self).play_game_over()
    }

    fn play_music(&mut self) -> Result<(), AudioError> {
        (**self).play_music()
    }

    fn pause_music(&mut self) -> Result<(), AudioError> {
        (**self).pause_music()
    }
}

/// Swallow a cue result, logging failures.
pub fn discard(cue: &str, result: Result<(), AudioError>) {
    if let Err(err) = result {
        warn!("{} cue failed: {}", cue, err);
    }
}

/// Plays nothing.
#[derive(Debug, Default)]
pub struct SilentAudio;

impl AudioCues for SilentAudio {
    fn play_food(&mut self) -> Result<(), AudioError> {
        debug!("(silent) food");
        Ok(())
    }

    fn play_game_over(&mut self) -> Result<(), AudioError> {
        debug!("(silent) game over");
        Ok(())
    }

    fn play_music(&mut self) -> Result<(), AudioError> {
        debug!("(silent) music on");
        Ok(())
    }

    fn pause_music(&mut self) -> Result<(), AudioError> {
        debug!("(silent) music off");
        Ok(())
    }
}

/// Pick the best available backend for `config`. Never fails; falls back to silence.
pub fn open(config: &AudioConfig) -> Box<dyn AudioCues> {
    if config.muted {
        info!("Sound muted");
        return Box::new(SilentAudio);
    }

    #[cfg(feature = "audio")]
    {
        match device::RodioAudio::new(config.clone()) {
            Ok(audio) => return Box::new(audio),
            Err(err) => warn!("Continuing without sound: {}", err),
        }
    }

    #[cfg(not(feature = "audio"))]
    info!("Built without the `audio` feature, sound disabled");

    Box::new(SilentAudio)
}

#[cfg(feature = "audio")]
mod device {
    use std::fs::File;
    use std::io::BufReader;
    use std::path::Path;
    use std::time::Duration;

    use rodio::source::{self, SineWave};
    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

    use super::{AudioCues, AudioError};
    use crate::config::AudioConfig;

    const MUSIC_VOLUME: f32 = 0.3;
    const TONE_VOLUME: f32 = 0.2;

    // (frequency Hz, length ms)
    const FOOD_TONE: &[(f32, u64)] = &[(660.0, 60), (990.0, 90)];
    const GAME_OVER_TONE: &[(f32, u64)] = &[(392.0, 150), (311.0, 150), (233.0, 300)];
    const MUSIC_NOTES: [f32; 8] = [262.0, 330.0, 392.0, 330.0, 294.0, 349.0, 440.0, 349.0];
    const MUSIC_NOTE_MS: u64 = 220;

    pub struct RodioAudio {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        music: Option<Sink>,
        config: AudioConfig,
    }

    impl RodioAudio {
        pub fn new(config: AudioConfig) -> Result<Self, AudioError> {
            let (stream, handle) =
                OutputStream::try_default().map_err(|e| AudioError::Unavailable(e.to_string()))?;
            Ok(RodioAudio { _stream: stream, handle, music: None, config })
        }

        fn new_sink(&self) -> Result<Sink, AudioError> {
            Sink::try_new(&self.handle).map_err(|e| AudioError::Playback(e.to_string()))
        }

        fn play_effect(&self, asset: Option<&Path>, tone: &[(f32, u64)]) -> Result<(), AudioError> {
            let sink = self.new_sink()?;

            match asset {
                Some(path) => sink.append(open_asset(path)?),
                None => {
                    for &(freq, ms) in tone {
                        sink.append(
                            SineWave::new(freq)
                                .take_duration(Duration::from_millis(ms))
                                .amplify(TONE_VOLUME),
                        );
                    }
                }
            }

            sink.detach();
            Ok(())
        }
    }

    impl AudioCues for RodioAudio {
        fn play_food(&mut self) -> Result<(), AudioError> {
            self.play_effect(self.config.food.as_deref(), FOOD_TONE)
        }

        fn play_game_over(&mut self) -> Result<(), AudioError> {
            self.play_effect(self.config.game_over.as_deref(), GAME_OVER_TONE)
        }

        fn play_music(&mut self) -> Result<(), AudioError> {
            if let Some(old) = self.music.take() {
                old.stop();
            }

            let sink = self.new_sink()?;
            sink.set_volume(MUSIC_VOLUME);

            match self.config.music.as_deref() {
                Some(path) => sink.append(open_asset(path)?.repeat_infinite()),
                None => sink.append(synth_music().repeat_infinite()),
            }

            self.music = Some(sink);
            Ok(())
        }

        fn pause_music(&mut self) -> Result<(), AudioError> {
            if let Some(sink) = &self.music {
                sink.pause();
            }
            Ok(())
        }
    }

    fn open_asset(path: &Path) -> Result<Decoder<BufReader<File>>, AudioError> {
        let asset_err = |reason: String| AudioError::Asset { path: path.display().to_string(), reason };

        let file = File::open(path).map_err(|e| asset_err(e.to_string()))?;
        Decoder::new(BufReader::new(file)).map_err(|e| asset_err(e.to_string()))
    }

    fn synth_music() -> impl Source<Item = f32> + Send + 'static {
        source::from_iter(MUSIC_NOTES.into_iter().map(|freq| {
            SineWave::new(freq)
                .take_duration(Duration::from_millis(MUSIC_NOTE_MS))
                .amplify(TONE_VOLUME)
        }))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Cue {
        Food,
        GameOver,
        MusicOn,
        MusicOff,
    }

    /// Records every cue; can be told to fail them all, like a blocked output device.
    #[derive(Debug, Default)]
    pub struct RecordingAudio {
        pub cues: Vec<Cue>,
        pub fail: bool,
    }

    impl RecordingAudio {
        pub fn failing() -> Self {
            RecordingAudio { cues: vec![], fail: true }
        }

        fn record(&mut self, cue: Cue) -> Result<(), AudioError> {
            self.cues.push(cue);
            if self.fail {
                Err(AudioError::Playback("blocked".to_string()))
            } else {
                Ok(())
            }
        }
    }

    impl AudioCues for RecordingAudio {
        fn play_food(&mut self) -> Result<(), AudioError> {
            self.record(Cue::Food)
        }

        fn play_game_over(&mut self) -> Result<(), AudioError> {
            self.record(Cue::GameOver)
        }

        fn play_music(&mut self) -> Result<(), AudioError> {
            self.record(Cue::MusicOn)
        }

        fn pause_music(&mut self) -> Result<(), AudioError> {
            self.record(Cue::MusicOff)
        }
    }
}
