//! Audio system
//!
//! The simulation only asks for sounds through `GameEvent::PlaySound` and
//! `GameEvent::PlayMusic`. The front end hands those events to a
//! `SoundPlayer`; in the browser that is an `AudioManager` playing the game's
//! mp3 clips through `HtmlAudioElement`.

use crate::settings::Settings;
use crate::sim::{GameEvent, SoundKey};

/// Anything that can play a named clip at a volume (0.0 - 1.0)
pub trait SoundPlayer {
    fn play(&mut self, sound: SoundKey, volume: f32);
    /// Loop `sound` until the next call replaces it
    fn play_music(&mut self, sound: SoundKey, volume: f32);
}

/// Play every sound and music request in `events`, returning how many were played
pub fn play_events(player: &mut dyn SoundPlayer, events: &[GameEvent]) -> usize {
    let mut played = 0;
    for event in events {
        match *event {
            GameEvent::PlaySound { sound, volume } => player.play(sound, volume),
            GameEvent::PlayMusic { sound, volume } => player.play_music(sound, volume),
            _ => continue,
        }
        played += 1;
    }
    played
}

/// Audio manager for the game
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    /// Track currently looping and the volume it was requested at
    music: Option<(SoundKey, f32)>,
    #[cfg(target_arch = "wasm32")]
    music_clip: Option<web_sys::HtmlAudioElement>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            music: None,
            #[cfg(target_arch = "wasm32")]
            music_clip: None,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut audio = Self::new();
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);
        audio
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
        self.refresh_music();
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
        self.refresh_music();
    }

    /// Mute/unmute all audio, including the music loop
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.refresh_music();
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Track currently looping, if any
    pub fn music(&self) -> Option<SoundKey> {
        self.music.map(|(sound, _)| sound)
    }

    /// Volume the music loop is playing at right now
    pub fn music_volume(&self) -> f32 {
        self.music
            .map_or(0.0, |(_, volume)| self.effective_volume(volume))
    }

    /// Final volume for a clip requested at `volume`
    fn effective_volume(&self, volume: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            (volume * self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn play_clip(&self, sound: SoundKey, vol: f32) {
        use web_sys::HtmlAudioElement;

        // A fresh element per play so overlapping sounds don't cut each other off
        let Ok(clip) = HtmlAudioElement::new_with_src(sound.url()) else {
            log::warn!("Failed to create audio element for {}", sound.url());
            return;
        };
        clip.set_volume(vol as f64);
        if clip.play().is_err() {
            log::warn!("Browser refused to play {}", sound.url());
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn play_clip(&self, sound: SoundKey, vol: f32) {
        log::debug!("Sound {:?} at volume {:.2}", sound, vol);
    }

    /// Swap the looping element for a new one. Started even when muted so
    /// unmuting brings the music back.
    #[cfg(target_arch = "wasm32")]
    fn start_music_clip(&mut self, sound: SoundKey) {
        use web_sys::HtmlAudioElement;

        if let Some(old) = self.music_clip.take() {
            let _ = old.pause();
        }
        let Ok(clip) = HtmlAudioElement::new_with_src(sound.url()) else {
            log::warn!("Failed to create audio element for {}", sound.url());
            return;
        };
        clip.set_loop(true);
        clip.set_volume(self.music_volume() as f64);
        if clip.play().is_err() {
            log::warn!("Browser refused to play {}", sound.url());
        }
        self.music_clip = Some(clip);
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn start_music_clip(&mut self, sound: SoundKey) {
        log::debug!("Music {:?} at volume {:.2}", sound, self.music_volume());
    }

    #[cfg(target_arch = "wasm32")]
    fn refresh_music(&self) {
        if let Some(clip) = &self.music_clip {
            clip.set_volume(self.music_volume() as f64);
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn refresh_music(&self) {}
}

impl SoundPlayer for AudioManager {
    fn play(&mut self, sound: SoundKey, volume: f32) {
        let vol = self.effective_volume(volume);
        if vol <= 0.0 {
            return;
        }
        self.play_clip(sound, vol);
    }

    fn play_music(&mut self, sound: SoundKey, volume: f32) {
        self.music = Some((sound, volume));
        self.start_music_clip(sound);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        played: Vec<(SoundKey, f32)>,
        music: Vec<SoundKey>,
    }

    impl SoundPlayer for Recorder {
        fn play(&mut self, sound: SoundKey, volume: f32) {
            self.played.push((sound, volume));
        }

        fn play_music(&mut self, sound: SoundKey, _volume: f32) {
            self.music.push(sound);
        }
    }

    #[test]
    fn test_play_events_only_plays_sounds() {
        let events = [
            GameEvent::SpeedChanged { speed: 11.0 },
            GameEvent::PlaySound {
                sound: SoundKey::Crash,
                volume: 0.5,
            },
            GameEvent::SkierCaught,
            GameEvent::PlaySound {
                sound: SoundKey::RhinoEat,
                volume: 0.5,
            },
        ];
        let mut recorder = Recorder::default();
        assert_eq!(play_events(&mut recorder, &events), 2);
        assert_eq!(
            recorder.played,
            vec![(SoundKey::Crash, 0.5), (SoundKey::RhinoEat, 0.5)]
        );
    }

    #[test]
    fn test_play_events_starts_music() {
        let events = [
            GameEvent::PlayMusic {
                sound: SoundKey::Run,
                volume: 0.5,
            },
            GameEvent::PlaySound {
                sound: SoundKey::RhinoRun,
                volume: 0.5,
            },
        ];
        let mut recorder = Recorder::default();
        assert_eq!(play_events(&mut recorder, &events), 2);
        assert_eq!(recorder.music, vec![SoundKey::Run]);
        assert_eq!(recorder.played, vec![(SoundKey::RhinoRun, 0.5)]);
    }

    #[test]
    fn test_music_follows_mute_and_volume() {
        let mut audio = AudioManager::new();
        assert_eq!(audio.music(), None);
        assert_eq!(audio.music_volume(), 0.0);

        audio.set_master_volume(1.0);
        audio.play_music(SoundKey::Run, 0.5);
        assert_eq!(audio.music(), Some(SoundKey::Run));
        assert!((audio.music_volume() - 0.5).abs() < 1e-6);

        audio.set_muted(true);
        assert_eq!(audio.music_volume(), 0.0);
        assert_eq!(audio.music(), Some(SoundKey::Run));

        audio.set_muted(false);
        audio.set_master_volume(0.5);
        assert!((audio.music_volume() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_effective_volume() {
        let mut audio = AudioManager::new();
        audio.set_master_volume(0.5);
        audio.set_sfx_volume(2.0);
        assert!((audio.effective_volume(0.5) - 0.25).abs() < 1e-6);

        audio.set_muted(true);
        assert_eq!(audio.effective_volume(0.5), 0.0);
    }

    #[test]
    fn test_from_settings() {
        let settings = Settings {
            muted: true,
            master_volume: 0.3,
            ..Settings::default()
        };
        let audio = AudioManager::from_settings(&settings);
        assert!(audio.is_muted());
        assert_eq!(audio.master_volume, 0.3);
    }
}
