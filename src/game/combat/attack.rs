// Attack timing state machine: combo chaining, charge-and-release and the
// buffered attack input that links them together.

use glam::Vec3;
use log::{debug, warn};

use super::cache::InputCache;
use super::config::{AttackConfig, ConfigError};
use super::damage::{ActorId, DamageTargets, DealtDamage};
use super::trace::{MeleeHitTester, SweepQuery};
use crate::engine::animation::{AnimationDriver, MontageName, SectionName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttackState {
    Idle,
    ComboAttacking,
    ChargedAttacking,
}

/// Collaborators for a single controller call
pub struct AttackContext<'a> {
    /// Simulation clock, in seconds
    pub now: f32,
    /// Montage playback; `None` turns animation side effects into no-ops
    pub animation: Option<&'a mut dyn AnimationDriver>,
}

impl<'a> AttackContext<'a> {
    pub fn new(now: f32, animation: &'a mut dyn AnimationDriver) -> Self {
        Self {
            now,
            animation: Some(animation),
        }
    }

    pub fn without_animation(now: f32) -> Self {
        Self {
            now,
            animation: None,
        }
    }
}

/// Drives combo and charged attacks for one character
#[derive(Debug, Clone)]
pub struct AttackController {
    config: AttackConfig,
    state: AttackState,

    /// True while any attack montage is playing
    is_attacking: bool,
    /// True while the charged attack button is held
    is_charging_attack: bool,
    /// True once the charge loop has been reached in the current charged attack
    has_looped_charged_attack: bool,

    /// Index into the combo sections
    combo_count: usize,

    cached_input: InputCache,
}

impl AttackController {
    pub fn new(config: AttackConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            state: AttackState::Idle,
            is_attacking: false,
            is_charging_attack: false,
            has_looped_charged_attack: false,
            combo_count: 0,
            cached_input: InputCache::new(),
        })
    }

    pub fn config(&self) -> &AttackConfig {
        &self.config
    }

    pub fn state(&self) -> AttackState {
        self.state
    }

    pub fn is_attacking(&self) -> bool {
        self.is_attacking
    }

    pub fn is_charging_attack(&self) -> bool {
        self.is_charging_attack
    }

    pub fn has_looped_charged_attack(&self) -> bool {
        self.has_looped_charged_attack
    }

    pub fn combo_count(&self) -> usize {
        self.combo_count
    }

    /// Time of the buffered attack press, if any
    pub fn cached_input_time(&self) -> Option<f32> {
        self.cached_input.last_input_time()
    }

    /// Forget any attack in progress, the held button and the buffered press
    pub fn reset(&mut self) {
        self.settle_idle();
        self.is_charging_attack = false;
        self.has_looped_charged_attack = false;
        self.combo_count = 0;
        self.cached_input.clear();
    }

    /// Combo attack button pressed
    pub fn do_combo_attack_start(&mut self, ctx: &mut AttackContext<'_>) {
        if self.is_attacking {
            self.buffer_input(ctx.now);
            return;
        }

        self.combo_attack(ctx);
    }

    /// Charged attack button pressed
    pub fn do_charged_attack_start(&mut self, ctx: &mut AttackContext<'_>) {
        self.is_charging_attack = true;

        if self.is_attacking {
            self.buffer_input(ctx.now);
            return;
        }

        self.charged_attack(ctx);
    }

    /// Charged attack button released
    pub fn do_charged_attack_end(&mut self, ctx: &mut AttackContext<'_>) {
        self.is_charging_attack = false;

        // Once the loop has been reached the release is resolved right away,
        // otherwise the first CheckChargedAttack picks the attack section
        if self.has_looped_charged_attack {
            self.check_charged_attack(ctx);
        }
    }

    /// End of an attack montage, completed or interrupted
    pub fn on_montage_ended(
        &mut self,
        ctx: &mut AttackContext<'_>,
        montage: &MontageName,
        interrupted: bool,
    ) {
        debug!(
            "Attack montage {} ended (interrupted: {}), combo count {}",
            montage, interrupted, self.combo_count
        );
        self.is_attacking = false;
        self.state = AttackState::Idle;

        if self
            .cached_input
            .take_if_fresh(ctx.now, self.config.attack_input_cache_tolerance)
        {
            if self.is_charging_attack {
                self.charged_attack(ctx);
            } else {
                self.combo_attack(ctx);
            }
        }
    }

    /// Combo window notify: continue the string if a fresh press is buffered
    pub fn check_combo(&mut self, ctx: &mut AttackContext<'_>) {
        if !self.is_attacking || self.is_charging_attack {
            return;
        }

        if !self
            .cached_input
            .take_if_fresh(ctx.now, self.config.combo_input_cache_tolerance)
        {
            return;
        }

        self.combo_count = self.combo_count.saturating_add(1);

        let Some(section) = self.config.combo_section_names.get(self.combo_count) else {
            debug!("Combo string finished at {}", self.combo_count);
            return;
        };

        debug!("Combo continues to {}", section);
        if let Some(animation) = ctx.animation.as_deref_mut() {
            animation.montage_jump_to_section(section, &self.config.combo_montage);
        }
    }

    /// Charge loop notify: loop again while held, release otherwise
    pub fn check_charged_attack(&mut self, ctx: &mut AttackContext<'_>) {
        self.has_looped_charged_attack = true;

        let section = if self.is_charging_attack {
            &self.config.charge_loop_section
        } else {
            &self.config.charge_attack_section
        };

        debug!("Charged attack jumps to {}", section);
        if let Some(animation) = ctx.animation.as_deref_mut() {
            animation.montage_jump_to_section(section, &self.config.charged_montage);
        }
    }

    /// Sweep in front of the attacker and damage every damageable target hit.
    /// Returns the damage dealt, one entry per damageable hit.
    pub fn do_attack_trace(
        &self,
        attacker: ActorId,
        origin: Vec3,
        forward: Vec3,
        hit_tester: &dyn MeleeHitTester,
        targets: &mut dyn DamageTargets,
    ) -> Vec<DealtDamage> {
        let query = SweepQuery {
            origin,
            forward: forward.normalize_or_zero(),
            distance: self.config.melee_trace_distance,
            radius: self.config.melee_trace_radius,
            ignore: Some(attacker),
            max_hits: self.config.max_trace_hits,
        };

        let mut dealt = Vec::new();
        for hit in hit_tester.sweep(&query) {
            if hit.actor == attacker {
                continue;
            }
            let Some(target) = targets.damageable_mut(hit.actor) else {
                continue;
            };

            // Knock upwards and away from the impact normal
            let impulse = hit.impact_normal * -self.config.melee_knockback_impulse
                + Vec3::Y * self.config.melee_launch_impulse;

            let applied =
                target.apply_damage(self.config.melee_damage, attacker, hit.impact_point, impulse);
            debug!(
                "Actor {} hit actor {} for {} (applied {})",
                attacker, hit.actor, self.config.melee_damage, applied
            );

            dealt.push(DealtDamage {
                target: hit.actor,
                damage: self.config.melee_damage,
                applied,
                location: hit.impact_point,
                impulse,
            });
        }

        dealt
    }

    fn buffer_input(&mut self, now: f32) {
        debug!("Attack input buffered at {:.3}", now);
        self.cached_input.record(now);
    }

    fn combo_attack(&mut self, ctx: &mut AttackContext<'_>) {
        self.is_attacking = true;
        self.combo_count = 0;
        self.state = AttackState::ComboAttacking;

        let montage = self.config.combo_montage.clone();
        let start = self.config.combo_section_names.first().cloned();
        self.play(ctx, &montage, self.config.combo_play_rate, start.as_ref());
    }

    fn charged_attack(&mut self, ctx: &mut AttackContext<'_>) {
        self.is_attacking = true;
        self.has_looped_charged_attack = false;
        self.state = AttackState::ChargedAttacking;

        let montage = self.config.charged_montage.clone();
        self.play(ctx, &montage, self.config.charged_play_rate, None);
    }

    /// Play an attack montage and subscribe to its end. Without a running
    /// montage no end will ever arrive, so the controller falls back to Idle.
    fn play(
        &mut self,
        ctx: &mut AttackContext<'_>,
        montage: &MontageName,
        rate: f32,
        start_section: Option<&SectionName>,
    ) {
        let Some(animation) = ctx.animation.as_deref_mut() else {
            warn!("No animation driver, cannot play {}", montage);
            self.settle_idle();
            return;
        };

        let length = animation.montage_play(montage, rate, start_section);
        if length > 0.0 {
            animation.montage_set_end_delegate(montage);
            debug!("{:?}: playing {} ({:.2}s)", self.state, montage, length);
        } else {
            warn!("Montage {} failed to play", montage);
            self.settle_idle();
        }
    }

    fn settle_idle(&mut self) {
        self.is_attacking = false;
        self.state = AttackState::Idle;
    }
}
