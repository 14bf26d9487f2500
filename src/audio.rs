//! Sound cue dispatch
//!
//! The game never synthesizes or loads audio itself. Session events are
//! mapped to cues and handed to a `CueSink`, which the host application
//! backs with whatever audio stack it has. Everything is fire-and-forget.

use crate::sim::state::{GameEvent, Outcome};

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Bullet fired
    Fire,
    /// Meteor broke into pieces
    MeteorSplit,
    /// Meteor destroyed outright
    MeteorDestroyed,
    /// Ship destroyed
    ShipExplode,
    /// Ship back in play
    Respawn,
    /// Field cleared
    LevelClear,
    /// Looping engine noise while thrusting
    Thrust,
    /// Match won
    Victory,
    /// Match lost or drawn
    GameOver,
}

/// Where cues go
pub trait CueSink {
    fn play(&mut self, cue: SoundCue);
    fn stop(&mut self, cue: SoundCue);
}

/// Sink that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogSink {
    pub played: usize,
}

impl CueSink for LogSink {
    fn play(&mut self, cue: SoundCue) {
        self.played += 1;
        log::trace!("cue play {cue:?}");
    }

    fn stop(&mut self, cue: SoundCue) {
        log::trace!("cue stop {cue:?}");
    }
}

/// Cue for a session event, if it makes a sound
pub fn cue_for(event: &GameEvent) -> Option<SoundCue> {
    match event {
        GameEvent::ShotFired { .. } => Some(SoundCue::Fire),
        GameEvent::MeteorSplit { .. } => Some(SoundCue::MeteorSplit),
        GameEvent::MeteorDestroyed { .. } => Some(SoundCue::MeteorDestroyed),
        GameEvent::ShipDestroyed { .. } => Some(SoundCue::ShipExplode),
        GameEvent::ShipRespawned { .. } => Some(SoundCue::Respawn),
        GameEvent::LevelCleared { .. } => Some(SoundCue::LevelClear),
        GameEvent::MatchOver {
            outcome: Outcome::Winner { .. },
        } => Some(SoundCue::Victory),
        GameEvent::MatchOver { .. } => Some(SoundCue::GameOver),
        GameEvent::ShipEliminated { .. } | GameEvent::FieldReseeded { .. } | GameEvent::VersusReset => {
            None
        }
    }
}

/// Audio gate in front of a sink
pub struct AudioManager<S: CueSink> {
    sink: S,
    enabled: bool,
    thrusting: bool,
}

impl<S: CueSink> AudioManager<S> {
    pub fn new(sink: S, enabled: bool) -> Self {
        Self {
            sink,
            enabled,
            thrusting: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable/disable all audio; disabling silences the engine loop
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled && self.thrusting {
            self.sink.stop(SoundCue::Thrust);
            self.thrusting = false;
        }
        self.enabled = enabled;
    }

    pub fn play(&mut self, cue: SoundCue) {
        if self.enabled {
            self.sink.play(cue);
        }
    }

    /// Play the cues for a batch of drained events
    pub fn dispatch(&mut self, events: &[GameEvent]) {
        for cue in events.iter().filter_map(cue_for) {
            self.play(cue);
        }
    }

    /// Start or stop the engine loop on edges only
    pub fn set_thrusting(&mut self, thrusting: bool) {
        if !self.enabled || thrusting == self.thrusting {
            return;
        }
        self.thrusting = thrusting;
        if thrusting {
            self.sink.play(SoundCue::Thrust);
        } else {
            self.sink.stop(SoundCue::Thrust);
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        played: Vec<SoundCue>,
        stopped: Vec<SoundCue>,
    }

    impl CueSink for Recorder {
        fn play(&mut self, cue: SoundCue) {
            self.played.push(cue);
        }

        fn stop(&mut self, cue: SoundCue) {
            self.stopped.push(cue);
        }
    }

    #[test]
    fn test_events_map_to_cues() {
        let mut audio = AudioManager::new(Recorder::default(), true);
        audio.dispatch(&[
            GameEvent::ShotFired { ship: 1 },
            GameEvent::FieldReseeded { count: 3 },
            GameEvent::MatchOver {
                outcome: Outcome::Draw,
            },
        ]);
        assert_eq!(audio.sink().played, vec![SoundCue::Fire, SoundCue::GameOver]);
    }

    #[test]
    fn test_disabled_audio_is_silent() {
        let mut audio = AudioManager::new(Recorder::default(), false);
        audio.dispatch(&[GameEvent::ShotFired { ship: 1 }]);
        audio.set_thrusting(true);
        assert!(audio.sink().played.is_empty());
    }

    #[test]
    fn test_thrust_loop_edges() {
        let mut audio = AudioManager::new(Recorder::default(), true);
        audio.set_thrusting(true);
        audio.set_thrusting(true);
        audio.set_thrusting(false);
        assert_eq!(audio.sink().played, vec![SoundCue::Thrust]);
        assert_eq!(audio.sink().stopped, vec![SoundCue::Thrust]);

        audio.set_thrusting(true);
        audio.set_enabled(false);
        assert_eq!(audio.sink().stopped.len(), 2);
    }
}
