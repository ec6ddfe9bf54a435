//! Combat engine
//!
//! Advances a round by delta-time ticks. Each tick runs, in order: timers,
//! phase handling, enemy AI scheduling, the strike window, the recovery
//! window, continuous distance, and the position broadcast. Player input is
//! resolved immediately against whatever windows are open at that instant.
//!
//! Every guard is a silent no-op. Events always follow the mutation they
//! describe.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::action::{CombatAction, EnemyAction};
use super::behavior::EnemyBehavior;
use super::difficulty::{Difficulty, DifficultyConfig};
use super::event::{CombatEvent, EventSink};
use super::fighter::FighterState;
use super::range::RangeState;
use super::state::{CombatState, RoundPhase, RoundResult};
use crate::consts::*;

/// An enemy action waiting for its countdown
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingAction {
    pub action: EnemyAction,
    /// Seconds left before it executes
    pub countdown: f32,
}

/// Round orchestrator.
///
/// Owns the [`CombatState`] exclusively; collaborators read it via
/// [`CombatEngine::state`] and observe changes through the sink `S`.
pub struct CombatEngine<S: EventSink> {
    state: CombatState,
    config: DifficultyConfig,
    behavior: Box<dyn EnemyBehavior>,
    rng: Pcg32,
    sink: S,
    /// Seconds until the player may attack again
    attack_cooldown: f32,
    /// Guard input currently held
    guarding: bool,
    pending: Option<PendingAction>,
    /// Seconds left to block or dodge the enemy's strike
    strike_window: Option<f32>,
    /// Seconds left in the enemy's post-strike vulnerability
    recovery_window: Option<f32>,
}

impl<S: EventSink> CombatEngine<S> {
    /// Engine for a difficulty tier, seeded from entropy
    pub fn new(difficulty: Difficulty, sink: S) -> Self {
        Self::with_seed(difficulty, sink, rand::random())
    }

    /// Engine for a difficulty tier with an explicit RNG seed
    pub fn with_seed(difficulty: Difficulty, sink: S, seed: u64) -> Self {
        Self::with_behavior(difficulty.behavior(), difficulty.config(), sink, seed)
    }

    /// Engine with a custom behavior and timing
    pub fn with_behavior(
        behavior: Box<dyn EnemyBehavior>,
        config: DifficultyConfig,
        sink: S,
        seed: u64,
    ) -> Self {
        log::debug!(
            "Combat engine created (behavior: {}, seed: {})",
            behavior.name(),
            seed
        );
        Self {
            state: CombatState::default(),
            config,
            behavior,
            rng: Pcg32::seed_from_u64(seed),
            sink,
            attack_cooldown: 0.0,
            guarding: false,
            pending: None,
            strike_window: None,
            recovery_window: None,
        }
    }

    /// Read-only view of the round
    pub fn state(&self) -> &CombatState {
        &self.state
    }

    pub fn config(&self) -> &DifficultyConfig {
        &self.config
    }

    pub fn behavior(&self) -> &dyn EnemyBehavior {
        self.behavior.as_ref()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn pending_action(&self) -> Option<PendingAction> {
        self.pending
    }

    pub fn is_strike_window_open(&self) -> bool {
        self.strike_window.is_some()
    }

    pub fn is_recovery_window_open(&self) -> bool {
        self.recovery_window.is_some()
    }

    pub fn attack_cooldown(&self) -> f32 {
        self.attack_cooldown
    }

    pub fn is_guarding(&self) -> bool {
        self.guarding
    }

    /// Throw away the current round and start a fresh one
    pub fn start_round(&mut self) {
        self.state.reset();
        self.attack_cooldown = 0.0;
        self.guarding = false;
        self.pending = None;
        self.strike_window = None;
        self.recovery_window = None;
        log::info!("Round started ({})", self.behavior.name());
        self.emit(CombatEvent::PhaseChanged {
            phase: RoundPhase::TensionStart,
        });
    }

    /// Advance the round by `dt` seconds (negative deltas count as zero)
    pub fn update(&mut self, dt: f32) {
        if self.state.is_resolved() {
            return;
        }
        let dt = dt.max(0.0);

        self.state.elapsed_time += dt;
        self.state.phase_time += dt;
        self.attack_cooldown = (self.attack_cooldown - dt).max(0.0);

        // Guarding has no timer; only guard release ends it. A guard held
        // through an attack or sidestep takes over when the move finishes.
        if self.state.player.tick_timer(dt) && self.state.player.state != FighterState::Guarding {
            let next = if self.guarding {
                FighterState::Guarding
            } else {
                FighterState::Idle
            };
            self.state.player.enter(next, 0.0);
        }
        // Enemy returns to idle through the AI, not its timer
        self.state.enemy.tick_timer(dt);

        match self.state.phase {
            RoundPhase::TensionStart => {
                if self.state.phase_time >= TENSION_DURATION {
                    self.begin_active();
                }
            }
            RoundPhase::Active => self.tick_active(dt),
            RoundPhase::Resolved => {}
        }
    }

    /// Apply a player input. Ignored outside the active phase.
    pub fn handle_player_action(&mut self, action: CombatAction) {
        if self.state.phase != RoundPhase::Active {
            return;
        }

        match action {
            CombatAction::Attack => self.player_attack(),
            CombatAction::GuardStart => self.player_guard_start(),
            CombatAction::GuardEnd => self.player_guard_end(),
            CombatAction::Sidestep => self.player_sidestep(),
        }
    }

    fn emit(&mut self, event: CombatEvent) {
        self.sink.handle(&event);
    }

    fn begin_active(&mut self) {
        self.state.set_phase(RoundPhase::Active);
        log::info!("Phase: {}", RoundPhase::Active.as_str());
        self.emit(CombatEvent::PhaseChanged {
            phase: RoundPhase::Active,
        });
        self.schedule_next_action();
    }

    fn tick_active(&mut self, dt: f32) {
        // --- ENEMY AI SCHEDULING ---
        if self.strike_window.is_none() && self.recovery_window.is_none() {
            if let Some(pending) = self.pending.as_mut() {
                pending.countdown -= dt;
                if pending.countdown <= 0.0 {
                    let action = pending.action;
                    self.pending = None;
                    self.execute_enemy_action(action);
                }
            }
        }

        // --- STRIKE WINDOW ---
        if let Some(remaining) = self.strike_window {
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                // Neither blocked nor dodged in time
                self.strike_window = None;
                if self.resolve_hit_on_player() {
                    return;
                }
                self.open_recovery();
            } else {
                self.strike_window = Some(remaining);
            }
        }

        // --- RECOVERY WINDOW ---
        if let Some(remaining) = self.recovery_window {
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                self.recovery_window = None;
                self.finish_recovery();
            } else {
                self.recovery_window = Some(remaining);
            }
        }

        // --- CONTINUOUS DISTANCE ---
        self.state.approach_target_distance(dt, DISTANCE_LERP_RATE);

        self.emit_position();
    }

    fn emit_position(&mut self) {
        self.emit(CombatEvent::PositionUpdated {
            range: self.state.range,
            direction: self.state.enemy_direction,
            distance: self.state.enemy_distance,
        });
    }

    fn schedule_next_action(&mut self) {
        let action = self.behavior.next_action(&self.state, &mut self.rng);
        let countdown = self.behavior.reaction_delay(action, &mut self.rng);
        log::debug!(
            "AI chose {:?} in {:.2}s (range: {}, enemy: {})",
            action,
            countdown,
            self.state.range.as_str(),
            self.state.enemy.state.as_str()
        );
        self.pending = Some(PendingAction { action, countdown });
    }

    fn execute_enemy_action(&mut self, action: EnemyAction) {
        log::debug!("Enemy executes {:?}", action);
        match action {
            EnemyAction::Approach => {
                if self.state.player.state == FighterState::Sidestepping {
                    log::debug!("Approach negated by sidestep");
                } else {
                    let previous = self.state.range;
                    self.state.range = previous.closer();
                    if self.state.range > previous {
                        self.emit(CombatEvent::RangeChanged {
                            range: self.state.range,
                        });
                    }
                }
                self.schedule_next_action();
            }
            EnemyAction::Tell(tell) => {
                let tell_duration = self.config.tell_duration;
                log::debug!("Enemy tells {} for {:.2}s", tell.as_str(), tell_duration);
                self.state.enemy.enter(FighterState::Telling, tell_duration);
                self.emit(CombatEvent::EnemyTold {
                    tell,
                    direction: self.state.enemy_direction,
                });
                // The tell and its follow-up share one pending slot
                let follow_up = if tell.is_fake() {
                    EnemyAction::Wait
                } else {
                    EnemyAction::Strike
                };
                self.pending = Some(PendingAction {
                    action: follow_up,
                    countdown: tell_duration,
                });
            }
            EnemyAction::Strike => {
                if self.state.range != RangeState::Close {
                    // Player escaped before the strike came out
                    self.state.enemy.enter(FighterState::Idle, 0.0);
                    self.schedule_next_action();
                    return;
                }
                let window = self.config.reaction_window;
                self.state.enemy.enter(FighterState::Attacking, window);
                self.emit(CombatEvent::EnemyStruck {
                    direction: self.state.enemy_direction,
                });
                self.strike_window = Some(window);
                if self.player_is_guarding() {
                    self.resolve_block();
                }
            }
            EnemyAction::Wait => {
                self.state.enemy.enter(FighterState::Idle, 0.0);
                self.schedule_next_action();
            }
            EnemyAction::Reposition => {
                self.state.enemy_direction = self.rng.random_range(-1.0..=1.0);
                self.emit_position();
                self.schedule_next_action();
            }
        }
    }

    fn player_is_guarding(&self) -> bool {
        self.guarding
    }

    fn player_can_act(&self) -> bool {
        matches!(
            self.state.player.state,
            FighterState::Idle | FighterState::Guarding
        )
    }

    fn player_attack(&mut self) {
        if self.attack_cooldown > 0.0 || !self.player_can_act() {
            return;
        }
        self.attack_cooldown = ATTACK_COOLDOWN;
        self.guarding = false;
        self.state
            .player
            .enter(FighterState::Attacking, PLAYER_ATTACK_DURATION);

        if self.state.range != RangeState::Close {
            self.emit(CombatEvent::AttackWhiffed);
            return;
        }

        if self.strike_window.is_some() {
            self.resolve_trade();
            return;
        }

        match self.state.enemy.state {
            FighterState::Telling => {
                // Interrupt: drop the queued strike and decide again
                self.state.enemy.enter(FighterState::Idle, 0.0);
                self.pending = None;
                if !self.resolve_hit_on_enemy() {
                    self.schedule_next_action();
                }
            }
            // Recovering, idle or anything else at close range: it lands
            _ => {
                self.resolve_hit_on_enemy();
            }
        }
    }

    /// Always latches the guard; a running attack or sidestep finishes first
    fn player_guard_start(&mut self) {
        self.guarding = true;
        if self.player_can_act() {
            self.state.player.enter(FighterState::Guarding, 0.0);
        }
        if self.strike_window.is_some() {
            self.resolve_block();
        }
    }

    fn player_guard_end(&mut self) {
        self.guarding = false;
        if self.state.player.state == FighterState::Guarding {
            self.state.player.enter(FighterState::Idle, 0.0);
        }
    }

    fn player_sidestep(&mut self) {
        if !self.player_can_act() {
            return;
        }
        self.guarding = false;
        self.state
            .player
            .enter(FighterState::Sidestepping, SIDESTEP_DURATION);

        if self.strike_window.take().is_some() {
            self.emit(CombatEvent::PlayerDodged);
            self.open_recovery();
        }
    }

    fn open_recovery(&mut self) {
        let duration = self.config.recovery_duration;
        self.state.enemy.enter(FighterState::Recovering, duration);
        self.recovery_window = Some(duration);
        self.pending = None;
    }

    fn finish_recovery(&mut self) {
        self.state.enemy.enter(FighterState::Idle, 0.0);

        let previous = self.state.range;
        let mut range = previous.farther();
        if self.rng.random_bool(SECOND_RETREAT_CHANCE) {
            range = range.farther();
        }
        self.state.range = range;
        if range != previous {
            log::debug!("Enemy retreats {} -> {}", previous.as_str(), range.as_str());
            self.emit(CombatEvent::RangeChanged { range });
        }

        self.schedule_next_action();
    }

    /// Returns true if the round ended
    fn resolve_hit_on_enemy(&mut self) -> bool {
        self.state.enemy.take_damage();
        self.emit(CombatEvent::EnemyDamaged {
            hp: self.state.enemy.hp(),
        });
        self.check_round_end()
    }

    /// Returns true if the round ended
    fn resolve_hit_on_player(&mut self) -> bool {
        self.state.player.take_damage();
        self.emit(CombatEvent::PlayerDamaged {
            hp: self.state.player.hp(),
        });
        self.check_round_end()
    }

    fn resolve_trade(&mut self) {
        self.strike_window = None;
        self.state.player.take_damage();
        self.state.enemy.take_damage();
        self.emit(CombatEvent::PlayerDamaged {
            hp: self.state.player.hp(),
        });
        self.emit(CombatEvent::EnemyDamaged {
            hp: self.state.enemy.hp(),
        });
        if !self.check_round_end() {
            // Enemy is left mid-swing; recovery gets the scheduler going again
            self.open_recovery();
        }
    }

    fn resolve_block(&mut self) {
        self.strike_window = None;
        self.emit(CombatEvent::PlayerBlocked);
        self.open_recovery();
    }

    /// Player death is checked first, so a trade that drops both fighters
    /// to zero is a loss.
    fn check_round_end(&mut self) -> bool {
        let result = if !self.state.player.is_alive() {
            RoundResult::PlayerLost
        } else if !self.state.enemy.is_alive() {
            RoundResult::PlayerWon
        } else {
            return false;
        };

        self.pending = None;
        self.strike_window = None;
        self.recovery_window = None;
        self.state.result = Some(result);
        self.state.set_phase(RoundPhase::Resolved);
        log::info!(
            "Round {} after {:.1}s (player hp {}, enemy hp {})",
            result.as_str(),
            self.state.elapsed_time,
            self.state.player.hp(),
            self.state.enemy.hp()
        );
        self.emit(CombatEvent::PhaseChanged {
            phase: RoundPhase::Resolved,
        });
        self.emit(CombatEvent::RoundEnded { result });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::action::TellType;

    type TestEngine = CombatEngine<Vec<CombatEvent>>;

    fn engine(difficulty: Difficulty) -> TestEngine {
        CombatEngine::with_seed(difficulty, Vec::new(), 42)
    }

    /// Active round with the AI queue emptied so only the test drives the enemy
    fn active_engine(difficulty: Difficulty) -> TestEngine {
        let mut e = engine(difficulty);
        e.update(TENSION_DURATION);
        assert_eq!(e.state.phase, RoundPhase::Active);
        e.pending = None;
        e.sink.clear();
        e
    }

    fn active_at_close(difficulty: Difficulty) -> TestEngine {
        let mut e = active_engine(difficulty);
        e.state.range = RangeState::Close;
        e.state.enemy_distance = CLOSE_DISTANCE;
        e
    }

    fn count(e: &TestEngine, wanted: impl Fn(&CombatEvent) -> bool) -> usize {
        e.sink.iter().filter(|ev| wanted(ev)).count()
    }

    fn has(e: &TestEngine, event: CombatEvent) -> bool {
        e.sink.contains(&event)
    }

    #[test]
    fn test_start_round_resets() {
        let mut e = active_at_close(Difficulty::Normal);
        e.handle_player_action(CombatAction::Attack);
        assert_eq!(e.state.enemy.hp(), DEFAULT_MAX_HP - 1);

        e.start_round();
        let s = e.state();
        assert_eq!(s.player.hp(), DEFAULT_MAX_HP);
        assert_eq!(s.enemy.hp(), DEFAULT_MAX_HP);
        assert_eq!(s.range, RangeState::Far);
        assert_eq!(s.phase, RoundPhase::TensionStart);
        assert_eq!(s.phase_time, 0.0);
        assert!(e.pending_action().is_none());
        assert_eq!(e.attack_cooldown(), 0.0);
        assert!(has(&e, CombatEvent::PhaseChanged { phase: RoundPhase::TensionStart }));
    }

    #[test]
    fn test_tension_to_active_once() {
        let mut e = engine(Difficulty::Normal);
        e.update(0.5);
        assert_eq!(e.state.phase, RoundPhase::TensionStart);
        assert!(e.pending_action().is_none());

        e.update(0.5);
        assert_eq!(e.state.phase, RoundPhase::Active);
        assert_eq!(e.state.phase_time, 0.0);
        assert!(e.pending_action().is_some());

        for _ in 0..20 {
            e.update(0.1);
        }
        let activations = count(&e, |ev| {
            *ev == CombatEvent::PhaseChanged {
                phase: RoundPhase::Active,
            }
        });
        assert_eq!(activations, 1);
    }

    #[test]
    fn test_actions_ignored_before_active() {
        let mut e = engine(Difficulty::Normal);
        for action in [
            CombatAction::GuardStart,
            CombatAction::Sidestep,
            CombatAction::Attack,
        ] {
            e.handle_player_action(action);
            assert_eq!(e.state.player.state, FighterState::Idle);
        }
        assert_eq!(e.attack_cooldown(), 0.0);
    }

    #[test]
    fn test_attack_at_far_whiffs() {
        let mut e = active_engine(Difficulty::Normal);
        assert_eq!(e.state.range, RangeState::Far);
        e.handle_player_action(CombatAction::Attack);
        assert_eq!(e.state.enemy.hp(), DEFAULT_MAX_HP);
        assert_eq!(e.state.player.state, FighterState::Attacking);
        assert!(has(&e, CombatEvent::AttackWhiffed));
    }

    #[test]
    fn test_attack_cooldown() {
        let mut e = active_at_close(Difficulty::Normal);
        e.handle_player_action(CombatAction::Attack);
        e.handle_player_action(CombatAction::Attack);
        assert_eq!(e.state.enemy.hp(), DEFAULT_MAX_HP - 1);

        // Attack state (0.2s) has ended but the cooldown (0.3s) has not
        e.update(0.25);
        assert_eq!(e.state.player.state, FighterState::Idle);
        e.handle_player_action(CombatAction::Attack);
        assert_eq!(e.state.enemy.hp(), DEFAULT_MAX_HP - 1);

        e.update(0.1);
        e.handle_player_action(CombatAction::Attack);
        assert_eq!(e.state.enemy.hp(), DEFAULT_MAX_HP - 2);
    }

    #[test]
    fn test_guard_toggle() {
        let mut e = active_engine(Difficulty::Normal);
        e.handle_player_action(CombatAction::GuardStart);
        assert_eq!(e.state.player.state, FighterState::Guarding);
        assert!(e.is_guarding());

        // Guarding never times out
        e.update(0.5);
        assert_eq!(e.state.player.state, FighterState::Guarding);

        e.handle_player_action(CombatAction::GuardEnd);
        assert_eq!(e.state.player.state, FighterState::Idle);
        assert!(!e.is_guarding());
    }

    #[test]
    fn test_guard_released_during_attack_returns_idle() {
        let mut e = active_engine(Difficulty::Normal);
        e.handle_player_action(CombatAction::Attack);
        e.handle_player_action(CombatAction::GuardStart);
        e.handle_player_action(CombatAction::GuardEnd);
        assert_eq!(e.state.player.state, FighterState::Attacking);
        assert!(!e.is_guarding());

        e.update(PLAYER_ATTACK_DURATION + 0.05);
        assert_eq!(e.state.player.state, FighterState::Idle);
    }

    #[test]
    fn test_guard_held_through_attack_blocks() {
        let mut e = active_at_close(Difficulty::Normal);
        e.handle_player_action(CombatAction::Attack);
        assert_eq!(e.state.enemy.hp(), DEFAULT_MAX_HP - 1);

        e.update(0.05);
        e.handle_player_action(CombatAction::GuardStart);
        assert!(e.is_guarding());
        // The swing plays out before the guard comes up
        assert_eq!(e.state.player.state, FighterState::Attacking);

        e.update(0.3);
        assert_eq!(e.state.player.state, FighterState::Guarding);

        e.execute_enemy_action(EnemyAction::Strike);
        assert!(has(&e, CombatEvent::PlayerBlocked));
        assert!(!e.is_strike_window_open());
        e.update(0.35);
        assert_eq!(e.state.player.hp(), DEFAULT_MAX_HP);
    }

    #[test]
    fn test_guard_held_through_sidestep() {
        let mut e = active_engine(Difficulty::Normal);
        e.handle_player_action(CombatAction::Sidestep);
        e.handle_player_action(CombatAction::GuardStart);
        assert_eq!(e.state.player.state, FighterState::Sidestepping);

        e.update(SIDESTEP_DURATION + 0.05);
        assert_eq!(e.state.player.state, FighterState::Guarding);
        assert!(e.is_guarding());
    }

    #[test]
    fn test_sidestep_dodges_open_strike() {
        let mut e = active_at_close(Difficulty::Normal);
        e.execute_enemy_action(EnemyAction::Strike);
        assert!(e.is_strike_window_open());
        assert_eq!(e.state.enemy.state, FighterState::Attacking);
        assert!(has(&e, CombatEvent::EnemyStruck { direction: 0.0 }));

        e.handle_player_action(CombatAction::Sidestep);
        assert!(!e.is_strike_window_open());
        assert_eq!(e.state.enemy.state, FighterState::Recovering);
        assert_eq!(e.state.player.state, FighterState::Sidestepping);
        assert!(has(&e, CombatEvent::PlayerDodged));

        e.update(0.5);
        assert_eq!(e.state.player.hp(), DEFAULT_MAX_HP);
        assert_eq!(count(&e, |ev| matches!(ev, CombatEvent::PlayerDamaged { .. })), 0);
    }

    #[test]
    fn test_sidestep_ignored_while_attacking() {
        let mut e = active_engine(Difficulty::Normal);
        e.handle_player_action(CombatAction::Attack);
        e.handle_player_action(CombatAction::Sidestep);
        assert_eq!(e.state.player.state, FighterState::Attacking);
    }

    #[test]
    fn test_attack_into_open_strike_trades() {
        let mut e = active_at_close(Difficulty::Normal);
        e.execute_enemy_action(EnemyAction::Strike);
        e.handle_player_action(CombatAction::Attack);

        assert_eq!(e.state.player.hp(), DEFAULT_MAX_HP - 1);
        assert_eq!(e.state.enemy.hp(), DEFAULT_MAX_HP - 1);
        assert!(!e.is_strike_window_open());
        assert!(e.is_recovery_window_open());
        assert!(has(&e, CombatEvent::PlayerDamaged { hp: DEFAULT_MAX_HP - 1 }));
        assert!(has(&e, CombatEvent::EnemyDamaged { hp: DEFAULT_MAX_HP - 1 }));

        // The window is gone, so no second hit lands later
        e.update(0.5);
        assert_eq!(e.state.player.hp(), DEFAULT_MAX_HP - 1);
    }

    #[test]
    fn test_unanswered_strike_hits_then_recovers() {
        let mut e = active_at_close(Difficulty::Normal);
        e.execute_enemy_action(EnemyAction::Strike);
        e.update(0.2);
        assert!(e.is_strike_window_open());
        assert_eq!(e.state.player.hp(), DEFAULT_MAX_HP);

        e.update(0.15);
        assert!(!e.is_strike_window_open());
        assert_eq!(e.state.player.hp(), DEFAULT_MAX_HP - 1);
        assert_eq!(e.state.enemy.state, FighterState::Recovering);
        assert!(has(&e, CombatEvent::PlayerDamaged { hp: DEFAULT_MAX_HP - 1 }));
    }

    #[test]
    fn test_strike_into_held_guard_blocks() {
        let mut e = active_at_close(Difficulty::Normal);
        e.handle_player_action(CombatAction::GuardStart);
        e.execute_enemy_action(EnemyAction::Strike);
        assert!(!e.is_strike_window_open());
        assert!(has(&e, CombatEvent::PlayerBlocked));
        assert_eq!(e.state.enemy.state, FighterState::Recovering);
    }

    #[test]
    fn test_guard_during_open_window_blocks() {
        let mut e = active_at_close(Difficulty::Normal);
        e.execute_enemy_action(EnemyAction::Strike);
        e.update(0.1);
        e.handle_player_action(CombatAction::GuardStart);
        assert!(!e.is_strike_window_open());
        assert!(has(&e, CombatEvent::PlayerBlocked));
        e.update(0.5);
        assert_eq!(e.state.player.hp(), DEFAULT_MAX_HP);
    }

    #[test]
    fn test_inhale_tell_then_guard_blocks() {
        // Normal: tell 0.4s, reaction window 0.3s
        let mut e = active_at_close(Difficulty::Normal);
        e.execute_enemy_action(EnemyAction::Tell(TellType::Inhale));
        assert_eq!(e.state.enemy.state, FighterState::Telling);
        assert!(has(
            &e,
            CombatEvent::EnemyTold {
                tell: TellType::Inhale,
                direction: 0.0
            }
        ));
        let pending = e.pending_action().expect("strike queued");
        assert_eq!(pending.action, EnemyAction::Strike);
        assert!((pending.countdown - 0.4).abs() < 1e-6);

        e.update(0.1);
        e.handle_player_action(CombatAction::GuardStart);
        assert!(!e.is_strike_window_open());

        for _ in 0..8 {
            e.update(0.05);
        }
        assert!(has(&e, CombatEvent::EnemyStruck { direction: 0.0 }));
        assert!(has(&e, CombatEvent::PlayerBlocked));
        assert_eq!(e.state.player.hp(), DEFAULT_MAX_HP);
        assert_eq!(e.state.enemy.state, FighterState::Recovering);
        assert_eq!(count(&e, |ev| matches!(ev, CombatEvent::PlayerDamaged { .. })), 0);
    }

    #[test]
    fn test_fake_tell_never_strikes() {
        let mut e = active_at_close(Difficulty::Hard);
        e.execute_enemy_action(EnemyAction::Tell(TellType::Fake));
        assert_eq!(e.pending_action().map(|p| p.action), Some(EnemyAction::Wait));

        e.update(0.26);
        assert_eq!(e.state.enemy.state, FighterState::Idle);
        assert!(!e.is_strike_window_open());
        assert_eq!(count(&e, |ev| matches!(ev, CombatEvent::EnemyStruck { .. })), 0);
        assert!(e.pending_action().is_some());
    }

    #[test]
    fn test_strike_aborts_out_of_range() {
        let mut e = active_engine(Difficulty::Normal);
        e.state.range = RangeState::Mid;
        e.state.enemy.enter(FighterState::Telling, 0.0);
        e.execute_enemy_action(EnemyAction::Strike);
        assert!(!e.is_strike_window_open());
        assert_eq!(e.state.enemy.state, FighterState::Idle);
        assert!(e.pending_action().is_some());
        assert_eq!(count(&e, |ev| matches!(ev, CombatEvent::EnemyStruck { .. })), 0);
    }

    #[test]
    fn test_sidestep_negates_approach() {
        let mut e = active_engine(Difficulty::Normal);
        e.state.range = RangeState::Mid;
        e.handle_player_action(CombatAction::Sidestep);
        e.execute_enemy_action(EnemyAction::Approach);
        assert_eq!(e.state.range, RangeState::Mid);
        assert_eq!(count(&e, |ev| matches!(ev, CombatEvent::RangeChanged { .. })), 0);
        assert!(e.pending_action().is_some());

        e.update(SIDESTEP_DURATION);
        assert_eq!(e.state.player.state, FighterState::Idle);
        e.execute_enemy_action(EnemyAction::Approach);
        assert_eq!(e.state.range, RangeState::Close);
        assert!(has(&e, CombatEvent::RangeChanged { range: RangeState::Close }));
    }

    #[test]
    fn test_recovery_retreats_and_reschedules() {
        let mut e = active_at_close(Difficulty::Normal);
        e.execute_enemy_action(EnemyAction::Strike);
        e.handle_player_action(CombatAction::Sidestep);
        assert!(e.is_recovery_window_open());
        assert!(e.pending_action().is_none());

        e.update(0.75);
        assert!(!e.is_recovery_window_open());
        assert_eq!(e.state.enemy.state, FighterState::Idle);
        assert!(e.state.range < RangeState::Close);
        assert!(has(&e, CombatEvent::RangeChanged { range: e.state.range }));
        assert!(e.pending_action().is_some());
    }

    #[test]
    fn test_recovery_sometimes_retreats_twice() {
        let mut e = active_engine(Difficulty::Normal);
        let trials = 1000;
        let mut to_far = 0;
        for _ in 0..trials {
            e.state.range = RangeState::Close;
            e.sink.clear();
            e.open_recovery();
            e.finish_recovery();

            let changes = count(&e, |ev| matches!(ev, CombatEvent::RangeChanged { .. }));
            assert_eq!(changes, 1);
            match e.state.range {
                RangeState::Far => {
                    to_far += 1;
                    assert!(has(&e, CombatEvent::RangeChanged { range: RangeState::Far }));
                }
                RangeState::Mid => {
                    assert!(has(&e, CombatEvent::RangeChanged { range: RangeState::Mid }));
                }
                RangeState::Close => panic!("recovery must retreat"),
            }
        }
        let rate = to_far as f64 / trials as f64;
        assert!((0.2..0.4).contains(&rate), "double retreat rate {rate}");
    }

    #[test]
    fn test_ai_paused_during_recovery() {
        let mut e = active_at_close(Difficulty::Normal);
        e.execute_enemy_action(EnemyAction::Strike);
        e.handle_player_action(CombatAction::Sidestep);
        e.pending = Some(PendingAction {
            action: EnemyAction::Wait,
            countdown: 0.1,
        });
        e.update(0.3);
        let pending = e.pending_action().expect("still queued");
        assert!((pending.countdown - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_hit_on_recovering_enemy() {
        let mut e = active_at_close(Difficulty::Normal);
        e.execute_enemy_action(EnemyAction::Strike);
        e.handle_player_action(CombatAction::GuardStart);
        assert_eq!(e.state.enemy.state, FighterState::Recovering);

        e.handle_player_action(CombatAction::Attack);
        assert_eq!(e.state.enemy.hp(), DEFAULT_MAX_HP - 1);
        assert!(!e.is_guarding());
        assert!(e.is_recovery_window_open());
    }

    #[test]
    fn test_hit_interrupts_tell() {
        let mut e = active_at_close(Difficulty::Normal);
        e.execute_enemy_action(EnemyAction::Tell(TellType::Scrape));
        e.handle_player_action(CombatAction::Attack);

        assert_eq!(e.state.enemy.hp(), DEFAULT_MAX_HP - 1);
        assert_eq!(e.state.enemy.state, FighterState::Idle);
        let pending = e.pending_action().expect("fresh decision");
        assert_ne!(pending.action, EnemyAction::Strike);
    }

    #[test]
    fn test_reposition_moves_direction() {
        let mut e = active_engine(Difficulty::Normal);
        e.execute_enemy_action(EnemyAction::Reposition);
        let direction = e.state.enemy_direction;
        assert!((-1.0..=1.0).contains(&direction));
        assert!(has(
            &e,
            CombatEvent::PositionUpdated {
                range: RangeState::Far,
                direction,
                distance: e.state.enemy_distance,
            }
        ));
    }

    #[test]
    fn test_position_stream_every_active_tick() {
        let mut e = active_engine(Difficulty::Normal);
        e.state.range = RangeState::Mid;
        for _ in 0..10 {
            e.update(0.1);
        }
        let updates = count(&e, |ev| matches!(ev, CombatEvent::PositionUpdated { .. }));
        assert_eq!(updates, 10);
        // 1.0 -> 0.5 at 0.7/s for one second lands on the target
        assert!((e.state.enemy_distance - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_player_loses_at_zero_hp() {
        let mut e = active_at_close(Difficulty::Normal);
        for _ in 0..DEFAULT_MAX_HP - 1 {
            e.state.player.take_damage();
        }
        e.execute_enemy_action(EnemyAction::Strike);
        e.update(0.35);

        assert_eq!(e.state.player.hp(), 0);
        assert_eq!(e.state.phase, RoundPhase::Resolved);
        assert_eq!(e.state.result, Some(RoundResult::PlayerLost));
        assert!(has(&e, CombatEvent::PhaseChanged { phase: RoundPhase::Resolved }));
        assert!(has(&e, CombatEvent::RoundEnded { result: RoundResult::PlayerLost }));
        assert!(!e.is_recovery_window_open());

        // Frozen
        let elapsed = e.state.elapsed_time;
        let events = e.sink.len();
        e.update(5.0);
        e.handle_player_action(CombatAction::Attack);
        assert_eq!(e.state.elapsed_time, elapsed);
        assert_eq!(e.sink.len(), events);
        assert_eq!(e.state.enemy.hp(), DEFAULT_MAX_HP);
    }

    #[test]
    fn test_player_wins_at_enemy_zero_hp() {
        let mut e = active_at_close(Difficulty::Normal);
        for _ in 0..DEFAULT_MAX_HP - 1 {
            e.state.enemy.take_damage();
        }
        e.handle_player_action(CombatAction::Attack);
        assert_eq!(e.state.result, Some(RoundResult::PlayerWon));
        assert_eq!(e.state.phase, RoundPhase::Resolved);
        assert!(has(&e, CombatEvent::RoundEnded { result: RoundResult::PlayerWon }));
    }

    #[test]
    fn test_double_knockout_is_a_loss() {
        let mut e = active_at_close(Difficulty::Normal);
        for _ in 0..DEFAULT_MAX_HP - 1 {
            e.state.player.take_damage();
            e.state.enemy.take_damage();
        }
        e.execute_enemy_action(EnemyAction::Strike);
        e.handle_player_action(CombatAction::Attack);
        assert_eq!(e.state.player.hp(), 0);
        assert_eq!(e.state.enemy.hp(), 0);
        assert_eq!(e.state.result, Some(RoundResult::PlayerLost));
    }

    #[test]
    fn test_damage_event_follows_mutation() {
        let mut hp_seen = None;
        let mut e = CombatEngine::with_seed(Difficulty::Normal, |ev: &CombatEvent| {
            if let CombatEvent::EnemyDamaged { hp } = ev {
                hp_seen = Some(*hp);
            }
        }, 3);
        e.update(TENSION_DURATION);
        e.pending = None;
        e.state.range = RangeState::Close;
        e.handle_player_action(CombatAction::Attack);
        let enemy_hp = e.state().enemy.hp();
        drop(e);
        assert_eq!(hp_seen, Some(enemy_hp));
        assert_eq!(enemy_hp, DEFAULT_MAX_HP - 1);
    }

    #[test]
    fn test_aggressive_player_finishes_round() {
        let mut e = CombatEngine::with_seed(Difficulty::Normal, (), 7);
        let dt = 1.0 / 60.0;
        let mut since_attack = 0.0;
        let mut last_elapsed = 0.0;
        for _ in 0..(120 * 60) {
            e.update(dt);
            assert!(e.state().elapsed_time >= last_elapsed);
            last_elapsed = e.state().elapsed_time;
            since_attack += dt;
            if e.state().range == RangeState::Close && since_attack >= 0.5 {
                e.handle_player_action(CombatAction::Attack);
                since_attack = 0.0;
            }
            if e.state().is_resolved() {
                break;
            }
        }
        assert!(e.state().is_resolved());
        assert!(e.state().result.is_some());
    }
}
