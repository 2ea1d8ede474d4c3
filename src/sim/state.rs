//! Game state and session control
//!
//! `GameState` owns everything the frame loop mutates: the entity store,
//! the wave timer, the hand trail and the session (phase + score).

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::fruit::FruitKind;
use super::spawn::{FruitSelection, Spawner};
use super::store::{EntityId, EntityStore, Membership};
use super::trail::{TrailBuffer, blade_color};
use super::view::{Frame, FruitView, ParticleView};
use crate::Viewport;
use crate::gesture::Gesture;
use crate::tuning::{Tuning, TuningError};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    Paused,
    /// A bomb was sliced
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Menu => "MENU",
            GamePhase::Playing => "PLAYING",
            GamePhase::Paused => "PAUSED",
            GamePhase::GameOver => "GAME_OVER",
        }
    }
}

/// Something the host may want to react to (sound, HUD)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    WaveSpawned { count: usize },
    FruitSliced { id: EntityId, kind: FruitKind, points: i64 },
    BombDetonated { id: EntityId },
    /// Fell out of view unsliced
    FruitMissed { id: EntityId },
    GameOver { score: i64 },
}

/// Phase machine and score
///
/// Score only changes while playing. Start/pause/resume come from the UI;
/// game over comes from a bomb slice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    phase: GamePhase,
    score: i64,
    selection: FruitSelection,
}

impl Session {
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn selection(&self) -> FruitSelection {
        self.selection
    }

    pub fn set_selection(&mut self, selection: FruitSelection) {
        self.selection = selection;
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Menu/Paused/GameOver -> Playing. Leaving GameOver resets the score.
    /// Returns the phase that was left, or `None` if already playing.
    pub fn start(&mut self) -> Option<GamePhase> {
        let previous = self.phase;
        match previous {
            GamePhase::Playing => return None,
            GamePhase::GameOver => self.score = 0,
            GamePhase::Menu | GamePhase::Paused => {}
        }
        self.phase = GamePhase::Playing;
        Some(previous)
    }

    pub fn pause(&mut self) -> bool {
        self.transition(GamePhase::Playing, GamePhase::Paused)
    }

    pub fn resume(&mut self) -> bool {
        self.transition(GamePhase::Paused, GamePhase::Playing)
    }

    pub fn game_over(&mut self) -> bool {
        self.transition(GamePhase::Playing, GamePhase::GameOver)
    }

    fn transition(&mut self, from: GamePhase, to: GamePhase) -> bool {
        if self.phase != from {
            return false;
        }
        self.phase = to;
        true
    }

    /// Add points (ignored outside Playing)
    pub fn add_score(&mut self, points: i64) -> bool {
        if !self.is_playing() {
            return false;
        }
        self.score += points;
        true
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub session: Session,
    pub store: EntityStore,
    pub spawner: Spawner,
    pub trail: TrailBuffer,
    pub tuning: Tuning,
    pub viewport: Viewport,
    /// Seconds of simulated time
    pub clock: f32,
    /// Gesture from the most recent tick (blade tint)
    pub gesture: Gesture,
}

impl GameState {
    pub fn new(seed: u64) -> Self {
        Self::build(seed, Tuning::default())
    }

    /// Start from custom tuning. Values the spawner cannot sample from are
    /// rejected here rather than on the first wave.
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::build(seed, tuning))
    }

    fn build(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            session: Session::default(),
            store: EntityStore::new(),
            spawner: Spawner::new(tuning.initial_spawn_delay),
            trail: TrailBuffer::new(tuning.trail_max_len),
            tuning,
            viewport: Viewport::default(),
            clock: 0.0,
            gesture: Gesture::None,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase()
    }

    pub fn score(&self) -> i64 {
        self.session.score()
    }

    /// Begin or continue play. Restarting after game over also clears the
    /// field and the wave timer.
    pub fn start(&mut self) -> bool {
        match self.session.start() {
            Some(GamePhase::GameOver) => {
                self.store.clear();
                self.spawner = Spawner::new(self.tuning.initial_spawn_delay);
                log::info!("Restarting after game over");
                true
            }
            Some(previous) => {
                log::info!("Game started from {}", previous.as_str());
                true
            }
            None => false,
        }
    }

    pub fn pause(&mut self) -> bool {
        let paused = self.session.pause();
        if paused {
            log::info!("Game paused (score {})", self.score());
        }
        paused
    }

    pub fn resume(&mut self) -> bool {
        let resumed = self.session.resume();
        if resumed {
            log::info!("Game resumed");
        }
        resumed
    }

    pub fn set_selection(&mut self, selection: FruitSelection) {
        self.session.set_selection(selection);
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Id sets for the renderer
    pub fn membership(&self) -> Membership {
        self.store.membership()
    }

    /// By-value snapshot of everything drawable
    pub fn frame(&self) -> Frame {
        Frame {
            fruits: self.store.fruits().map(FruitView::from).collect(),
            particles: self.store.particles().map(ParticleView::from).collect(),
            trail: self.trail.snapshot(),
            blade_color: blade_color(self.gesture),
        }
    }

    pub fn trail_points(&self) -> Vec<Vec3> {
        self.trail.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_transitions() {
        let mut session = Session::default();
        assert_eq!(session.phase(), GamePhase::Menu);
        assert!(!session.pause());
        assert!(!session.game_over());

        assert_eq!(session.start(), Some(GamePhase::Menu));
        assert_eq!(session.start(), None);
        assert!(session.pause());
        assert!(!session.pause());
        assert!(session.resume());
        assert!(session.game_over());
        assert!(!session.resume());
        assert_eq!(session.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_score_only_while_playing() {
        let mut session = Session::default();
        assert!(!session.add_score(10));
        session.start();
        assert!(session.add_score(10));
        session.pause();
        assert!(!session.add_score(10));
        session.resume();
        assert!(session.add_score(-25));
        assert_eq!(session.score(), -15);
    }

    #[test]
    fn test_score_reset_only_after_game_over() {
        let mut session = Session::default();
        session.start();
        session.add_score(30);
        session.pause();
        session.start();
        assert_eq!(session.score(), 30);

        session.game_over();
        session.start();
        assert_eq!(session.score(), 0);
        assert!(session.is_playing());
    }

    #[test]
    fn test_restart_clears_field() {
        let mut state = GameState::new(1);
        state.start();
        let id = state.store.next_entity_id().unwrap();
        state.store.insert_fruit(crate::sim::FruitEntity::new(
            id,
            FruitKind::Apple,
            Vec3::ZERO,
            Vec3::ZERO,
            0.0,
        ));
        state.session.game_over();

        assert!(state.start());
        assert_eq!(state.store.fruit_count(), 0);
        assert_eq!(state.spawner.interval(), state.tuning.initial_spawn_delay);
    }

    #[test]
    fn test_with_tuning_rejects_unusable_values() {
        let inverted = Tuning {
            wave_min: 3,
            wave_max: 1,
            ..Tuning::default()
        };
        assert!(matches!(
            GameState::with_tuning(1, inverted),
            Err(TuningError::WaveSize { min: 3, max: 1 })
        ));

        let bad_odds = Tuning {
            bomb_probability: 1.5,
            ..Tuning::default()
        };
        assert!(matches!(
            GameState::with_tuning(1, bad_odds),
            Err(TuningError::BombProbability(_))
        ));

        let state = GameState::with_tuning(1, Tuning { wave_max: 5, ..Tuning::default() }).unwrap();
        assert_eq!(state.tuning.wave_max, 5);
    }
}
