// Character entity and management

use glam::Vec3;
use log::{debug, info};
use rapier3d::prelude::{LockedAxes, QueryFilter, Rotation};

use crate::core::math::{clamp, from_vector, rotate_towards, to_point, to_vector, wrap_angle, yaw_forward, yaw_of};
use crate::engine::animation::{AnimNotify, AnimationError, MontageEvent, MontagePlayer};
use crate::engine::input::{Action, PlayerInput};
use crate::engine::physics::{body::presets, ColliderHandle, PhysicsWorld, RigidBodyHandle};
use crate::game::combat::{
    Actor, ActorId, AttackConfig, AttackContext, AttackController, CombatEvent, ConfigError,
    DamageTargets, Damageable, DealtDamage, Health,
};

use super::montages;
use super::ragdoll::{MeshTransform, RagdollState};
use super::skeleton::Skeleton;
use super::state::{MovementState, MovementStateMachine};
use super::stats::CharacterStats;

/// Unique identifier for a character
pub type CharacterId = ActorId;

/// Tag carried by player-controlled characters
pub const PLAYER_TAG: &str = "Player";

/// Movement input below this length is ignored
const INPUT_DEADZONE: f32 = 0.01;

/// Camera pitch limit (radians)
const MAX_PITCH: f32 = 1.4;

#[derive(Debug, thiserror::Error)]
pub enum SpawnError {
    #[error("Invalid attack config: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid attack montage: {0}")]
    Animation(#[from] AnimationError),

    #[error("Player {0} already controls a character")]
    PlayerTaken(usize),
}

/// Impulses received between movement steps
#[derive(Debug, Clone, Copy, PartialEq)]
enum PendingImpulse {
    /// Velocity change on the movement body
    Velocity(Vec3),
    /// Ragdoll impulse at a world point, scaled by body mass when applied
    AtPoint { impulse: Vec3, point: Vec3 },
}

/// A third-person melee character, player-controlled or not
#[derive(Debug)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    /// Player index controlling this character, `None` when nothing possesses it
    pub player_index: Option<usize>,
    pub tags: Vec<String>,

    // Physics
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,

    pub stats: CharacterStats,
    pub state_machine: MovementStateMachine,

    // Combat and animation
    pub attack: AttackController,
    pub animation: MontagePlayer,
    pub skeleton: Skeleton,
    pub ragdoll: RagdollState,
    health: Health,

    // Movement
    /// Facing of the mesh (radians, 0 = +Z)
    yaw: f32,
    /// Camera yaw and pitch owned by the controller
    control_yaw: f32,
    control_pitch: f32,
    /// Current speed cap, walk or run
    max_walk_speed: f32,
    /// World-space movement input accumulated this step
    movement_input: Vec3,
    jump_requested: bool,
    movement_enabled: bool,
    was_grounded: bool,
    pending_impulses: Vec<PendingImpulse>,

    /// Feedback raised since the last `take_events`
    events: Vec<CombatEvent>,
}

impl Character {
    /// Create a new character and add it to the physics world
    pub fn new(
        id: CharacterId,
        name: &str,
        player_index: Option<usize>,
        stats: CharacterStats,
        attack_config: AttackConfig,
        physics: &mut PhysicsWorld,
        spawn: Vec3,
    ) -> Result<Self, SpawnError> {
        let attack = AttackController::new(attack_config)?;
        let animation = montages::standard_player(attack.config())?;

        let body_handle = physics.add_rigid_body(presets::character_body(spawn.x, spawn.y, spawn.z));
        let collider = presets::character_collider(
            stats.capsule_cylinder_half_height(),
            stats.capsule_radius,
        );
        let collider_handle = physics.add_collider(collider, body_handle);
        physics.set_entity_mapping(body_handle, id);

        // The mesh sits at the bottom of the capsule
        let mut ragdoll = RagdollState::new();
        ragdoll.set_mesh_transform(MeshTransform {
            offset: Vec3::new(0.0, -stats.capsule_half_height, 0.0),
            yaw: 0.0,
        });

        let tags = if player_index.is_some() {
            vec![PLAYER_TAG.to_string()]
        } else {
            Vec::new()
        };

        let mut character = Self {
            id,
            name: name.to_string(),
            player_index,
            tags,
            body_handle,
            collider_handle,
            health: Health::new(stats.max_hp),
            max_walk_speed: stats.walk_speed,
            stats,
            state_machine: MovementStateMachine::new(),
            attack,
            animation,
            skeleton: Skeleton::humanoid(),
            ragdoll,
            yaw: 0.0,
            control_yaw: 0.0,
            control_pitch: 0.0,
            movement_input: Vec3::ZERO,
            jump_requested: false,
            movement_enabled: true,
            was_grounded: false,
            pending_impulses: Vec::new(),
            events: Vec::new(),
        };
        character.begin_play();
        Ok(character)
    }

    fn begin_play(&mut self) {
        self.ragdoll.save_mesh_transform();
        self.reset_hp();
        info!("Character '{}' ({}) spawned", self.name, self.id);
    }

    /// Route one step of player input to the character's actions
    pub fn handle_input(&mut self, input: &PlayerInput, now: f32) {
        // Releases always go through so a button let go while dead is not
        // still held after respawn
        if self.is_alive() {
            if input.just_pressed(Action::ComboAttack) {
                self.do_combo_attack_start(now);
            }
            if input.just_pressed(Action::ChargedAttack) {
                self.do_charged_attack_start(now);
            }
        }
        if input.just_released(Action::ChargedAttack) {
            self.do_charged_attack_end(now);
        }

        let (right, forward) = input.get_direction();
        if right != 0.0 || forward != 0.0 {
            self.do_move(right, forward);
        }

        let (yaw, pitch) = input.look_axis();
        if yaw != 0.0 || pitch != 0.0 {
            self.do_look(yaw, pitch);
        }

        if input.is_pressed(Action::Run) {
            self.do_run_start();
        } else if input.just_released(Action::Run) {
            self.do_run_end();
        }

        if input.just_pressed(Action::Jump) {
            self.do_jump_start();
        }
        if input.just_released(Action::Jump) {
            self.do_jump_end();
        }
    }

    /// Camera-relative movement input
    pub fn do_move(&mut self, right: f32, forward: f32) {
        if self.player_index.is_none() {
            return;
        }

        let forward_dir = yaw_forward(self.control_yaw);
        let right_dir = Vec3::Y.cross(forward_dir);
        self.movement_input += forward_dir * forward + right_dir * right;
    }

    /// Camera look input (radians)
    pub fn do_look(&mut self, yaw: f32, pitch: f32) {
        if self.player_index.is_none() {
            return;
        }

        self.control_yaw = wrap_angle(self.control_yaw + yaw);
        self.control_pitch = clamp(self.control_pitch + pitch, -MAX_PITCH, MAX_PITCH);
    }

    pub fn do_run_start(&mut self) {
        self.max_walk_speed = self.stats.run_speed;
    }

    pub fn do_run_end(&mut self) {
        self.max_walk_speed = self.stats.walk_speed;
    }

    pub fn do_jump_start(&mut self) {
        self.jump_requested = true;
    }

    pub fn do_jump_end(&mut self) {
        self.jump_requested = false;
    }

    pub fn do_combo_attack_start(&mut self, now: f32) {
        self.attack
            .do_combo_attack_start(&mut AttackContext::new(now, &mut self.animation));
    }

    pub fn do_charged_attack_start(&mut self, now: f32) {
        self.attack
            .do_charged_attack_start(&mut AttackContext::new(now, &mut self.animation));
    }

    pub fn do_charged_attack_end(&mut self, now: f32) {
        self.attack
            .do_charged_attack_end(&mut AttackContext::new(now, &mut self.animation));
    }

    /// Update character movement from accumulated input (called every step)
    pub fn update_movement(&mut self, physics: &mut PhysicsWorld, dt: f32) {
        self.apply_pending_impulses(physics);
        self.sync_ragdoll_body(physics);

        let is_grounded = self.is_grounded_check(physics);
        let Some(velocity) = self.velocity(physics) else {
            return;
        };

        let horizontal = Vec3::new(velocity.x, 0.0, velocity.z);
        let landing = is_grounded
            && (!self.was_grounded || (self.state().is_airborne() && velocity.y <= 0.0));
        self.was_grounded = is_grounded;
        if landing {
            self.landed(horizontal.length());
        }

        let input = std::mem::take(&mut self.movement_input).clamp_length_max(1.0);
        let jump = std::mem::take(&mut self.jump_requested);

        if !self.movement_enabled || !self.state().can_move() {
            return;
        }

        let mut horizontal = horizontal;
        let mut velocity_y = velocity.y;
        let input_length = input.length();

        if input_length > INPUT_DEADZONE {
            let direction = input / input_length;
            let speed = (input_length * self.max_walk_speed)
                .max(self.stats.min_analog_walk_speed)
                .min(self.max_walk_speed);
            let acceleration = if is_grounded {
                self.stats.max_acceleration
            } else {
                self.stats.max_acceleration * self.stats.air_control
            };
            horizontal = move_towards(horizontal, direction * speed, acceleration * dt);

            // Orient rotation to movement
            self.yaw = rotate_towards(
                self.yaw,
                yaw_of(direction),
                self.stats.rotation_rate_radians() * dt,
            );
        } else {
            let braking = if is_grounded {
                self.stats.braking_walking
            } else {
                self.stats.braking_falling
            };
            horizontal = move_towards(horizontal, Vec3::ZERO, braking * dt);
        }

        if jump && is_grounded && self.state().can_jump() {
            velocity_y = self.stats.jump_velocity;
            self.state_machine.jump();
        }

        if let Some(body) = physics.get_rigid_body_mut(self.body_handle) {
            body.set_linvel(
                to_vector(Vec3::new(horizontal.x, velocity_y, horizontal.z)),
                true,
            );
        }

        self.state_machine.update(
            dt,
            is_grounded,
            horizontal.length(),
            velocity_y,
            self.is_running(),
        );
    }

    fn apply_pending_impulses(&mut self, physics: &mut PhysicsWorld) {
        if self.pending_impulses.is_empty() {
            return;
        }
        let Some(body) = physics.get_rigid_body_mut(self.body_handle) else {
            self.pending_impulses.clear();
            return;
        };

        for impulse in self.pending_impulses.drain(..) {
            match impulse {
                PendingImpulse::Velocity(change) => {
                    let linvel = *body.linvel() + to_vector(change);
                    body.set_linvel(linvel, true);
                }
                PendingImpulse::AtPoint { impulse, point } => {
                    let mass = body.mass();
                    body.apply_impulse_at_point(to_vector(impulse * mass), to_point(point), true);
                }
            }
        }
    }

    /// Upright capsule while animated, free rotation while fully ragdolled
    fn sync_ragdoll_body(&self, physics: &mut PhysicsWorld) {
        let Some(body) = physics.get_rigid_body_mut(self.body_handle) else {
            return;
        };

        let locked = body.locked_axes().contains(LockedAxes::ROTATION_LOCKED);
        if self.ragdoll.is_simulating() && locked {
            body.set_locked_axes(LockedAxes::empty(), true);
        } else if !self.ragdoll.is_simulating() && !locked {
            body.set_rotation(Rotation::identity(), true);
            body.set_angvel(to_vector(Vec3::ZERO), true);
            body.set_locked_axes(LockedAxes::ROTATION_LOCKED, true);
        }
    }

    /// Check if character is on the ground using a downward raycast
    fn is_grounded_check(&self, physics: &PhysicsWorld) -> bool {
        let Some(center) = self.position(physics) else {
            return false;
        };

        physics
            .raycast(
                to_point(center),
                to_vector(Vec3::NEG_Y),
                self.stats.capsule_half_height + self.stats.ground_probe_distance,
                true,
                QueryFilter::default().exclude_rigid_body(self.body_handle),
            )
            .is_some()
    }

    /// Called when character lands on ground
    pub fn landed(&mut self, horizontal_speed: f32) {
        // Zero HP still counts as alive here
        if self.health.current_hp() >= 0.0 {
            self.ragdoll.clear_blend();
        }

        self.state_machine
            .set_grounded(horizontal_speed, self.is_running());
    }

    /// Advance attack montages and react to their notifies.
    /// `start` is the world time at the beginning of the step.
    /// Returns the sockets of attack traces that fired during the step.
    pub fn advance_animation(&mut self, start: f32, dt: f32) -> Vec<String> {
        let mut budget = dt;
        let mut traces = Vec::new();

        while let Some(event) = self.animation.advance(&mut budget) {
            let mut ctx = AttackContext::new(start + (dt - budget), &mut self.animation);
            match event {
                MontageEvent::Notify { notify, .. } => match notify {
                    AnimNotify::CheckCombo => self.attack.check_combo(&mut ctx),
                    AnimNotify::CheckChargedAttack => self.attack.check_charged_attack(&mut ctx),
                    AnimNotify::AttackTrace { bone } => traces.push(bone),
                },
                MontageEvent::Ended {
                    montage,
                    interrupted,
                } => self.attack.on_montage_ended(&mut ctx, &montage, interrupted),
            }
        }

        traces
    }

    /// Sweep from `socket` along the facing direction and damage what it hits
    pub fn do_attack_trace(
        &mut self,
        socket: &str,
        physics: &PhysicsWorld,
        targets: &mut dyn DamageTargets,
    ) -> Vec<DealtDamage> {
        let Some(center) = self.position(physics) else {
            return Vec::new();
        };
        let origin = self.skeleton.socket_location(socket, center, self.yaw);

        let dealt = self
            .attack
            .do_attack_trace(self.id, origin, self.forward(), physics, targets);
        for hit in &dealt {
            self.events.push(CombatEvent::DealtDamage {
                damage: hit.damage,
                location: hit.location,
            });
        }
        dealt
    }

    /// Subtract damage from HP. Returns the damage applied (0 when already dead).
    pub fn take_damage(&mut self, damage: f32) -> f32 {
        if self.health.is_dead() {
            return 0.0;
        }

        let outcome = self.health.take_damage(damage);
        info!(
            "'{}' took {} damage ({} / {} HP)",
            self.name,
            outcome.applied,
            self.health.current_hp(),
            self.health.max_hp()
        );

        if outcome.died {
            self.handle_death();
        } else {
            // Partial ragdoll, the pelvis stays upright
            self.ragdoll.enable_partial(self.stats.partial_ragdoll_blend);
        }

        outcome.applied
    }

    pub fn reset_hp(&mut self) {
        self.health.reset();
    }

    /// Respawn the character at a given position
    pub fn respawn(&mut self, physics: &mut PhysicsWorld, position: Vec3) {
        self.set_position(physics, position);
        self.reset_hp();
        self.ragdoll.reset();
        self.sync_ragdoll_body(physics);
        self.pending_impulses.clear();
        self.movement_enabled = true;
        self.was_grounded = false;
        self.max_walk_speed = self.stats.walk_speed;
        self.state_machine.respawn();
        self.animation.stop();
        // The interrupted end belongs to the previous life
        let mut budget = 0.0;
        while self.animation.advance(&mut budget).is_some() {}
        self.attack.reset();
        self.events.push(CombatEvent::Respawned);
        info!("Character '{}' respawned", self.name);
    }

    /// Get character's current position (capsule center)
    pub fn position(&self, physics: &PhysicsWorld) -> Option<Vec3> {
        physics
            .get_rigid_body(self.body_handle)
            .map(|body| from_vector(body.translation()))
    }

    /// Get character's current velocity
    pub fn velocity(&self, physics: &PhysicsWorld) -> Option<Vec3> {
        physics
            .get_rigid_body(self.body_handle)
            .map(|body| from_vector(body.linvel()))
    }

    /// Set character position (for teleporting/respawning)
    pub fn set_position(&self, physics: &mut PhysicsWorld, position: Vec3) {
        if let Some(body) = physics.get_rigid_body_mut(self.body_handle) {
            body.set_translation(to_vector(position), true);
            body.set_linvel(to_vector(Vec3::ZERO), true);
        }
    }

    /// Facing direction on the ground plane
    pub fn forward(&self) -> Vec3 {
        yaw_forward(self.yaw)
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        self.yaw = wrap_angle(yaw);
    }

    /// Camera yaw and pitch
    pub fn control_rotation(&self) -> (f32, f32) {
        (self.control_yaw, self.control_pitch)
    }

    pub fn max_walk_speed(&self) -> f32 {
        self.max_walk_speed
    }

    pub fn is_running(&self) -> bool {
        self.max_walk_speed >= self.stats.run_speed
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    pub fn current_hp(&self) -> f32 {
        self.health.current_hp()
    }

    pub fn is_alive(&self) -> bool {
        !self.health.is_dead()
    }

    pub fn movement_enabled(&self) -> bool {
        self.movement_enabled
    }

    pub fn is_grounded(&self, physics: &PhysicsWorld) -> bool {
        self.is_grounded_check(physics)
    }

    pub fn state(&self) -> MovementState {
        self.state_machine.state()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Drain feedback events raised since the last call
    pub fn take_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Damageable for Character {
    fn apply_damage(&mut self, damage: f32, causer: ActorId, location: Vec3, impulse: Vec3) -> f32 {
        let applied = self.take_damage(damage);

        // Only react to damage that actually landed
        if applied > 0.0 {
            self.pending_impulses.push(PendingImpulse::Velocity(impulse));

            if self.ragdoll.is_simulating() {
                self.pending_impulses.push(PendingImpulse::AtPoint {
                    impulse,
                    point: location,
                });
            }

            debug!("'{}' damaged by actor {}", self.name, causer);
            self.events.push(CombatEvent::ReceivedDamage {
                damage: applied,
                location,
                direction: impulse.normalize_or_zero(),
            });
        }

        applied
    }

    fn handle_death(&mut self) {
        info!("Character '{}' died", self.name);
        self.movement_enabled = false;
        self.state_machine.die();
        self.ragdoll.enable_full();
        self.events.push(CombatEvent::Died);
    }
}

impl Actor for Character {
    fn actor_id(&self) -> ActorId {
        self.id
    }

    fn as_damageable_mut(&mut self) -> Option<&mut dyn Damageable> {
        Some(self)
    }
}

/// Move `current` toward `target` by at most `max_delta`
fn move_towards(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let delta = target - current;
    let distance = delta.length();
    if distance <= max_delta || distance <= f32::EPSILON {
        target
    } else {
        current + delta / distance * max_delta
    }
}

/// Manages all characters in the game
#[derive(Debug, Default)]
pub struct CharacterManager {
    characters: Vec<Character>,
}

impl CharacterManager {
    pub fn new() -> Self {
        Self {
            characters: Vec::new(),
        }
    }

    /// Add a spawned character
    pub fn add(&mut self, character: Character) -> CharacterId {
        let id = character.id;
        self.characters.push(character);
        id
    }

    pub fn get(&self, id: CharacterId) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.characters.iter_mut().find(|c| c.id == id)
    }

    pub fn get_by_player(&self, player_index: usize) -> Option<&Character> {
        self.characters
            .iter()
            .find(|c| c.player_index == Some(player_index))
    }

    pub fn get_by_player_mut(&mut self, player_index: usize) -> Option<&mut Character> {
        self.characters
            .iter_mut()
            .find(|c| c.player_index == Some(player_index))
    }

    pub fn all(&self) -> &[Character] {
        &self.characters
    }

    pub fn all_mut(&mut self) -> &mut [Character] {
        &mut self.characters
    }

    /// Borrow one character mutably alongside every other character
    pub fn split_attacker(
        &mut self,
        id: CharacterId,
    ) -> Option<(&mut Character, Vec<&mut Character>)> {
        let index = self.characters.iter().position(|c| c.id == id)?;
        let (before, rest) = self.characters.split_at_mut(index);
        let (attacker, after) = rest.split_first_mut()?;
        let others = before.iter_mut().chain(after.iter_mut()).collect();
        Some((attacker, others))
    }

    /// Remove a character by ID
    pub fn remove(&mut self, id: CharacterId) -> Option<Character> {
        let pos = self.characters.iter().position(|c| c.id == id)?;
        Some(self.characters.remove(pos))
    }

    pub fn count(&self) -> usize {
        self.characters.len()
    }

    pub fn alive_count(&self) -> usize {
        self.characters.iter().filter(|c| c.is_alive()).count()
    }

    /// Check if a player index is already taken
    pub fn is_player_taken(&self, player_index: usize) -> bool {
        self.characters
            .iter()
            .any(|c| c.player_index == Some(player_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::animation::SectionName;
    use crate::game::combat::{ActorSet, AttackState};
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 60.0;

    fn world_with_floor() -> PhysicsWorld {
        let mut physics = PhysicsWorld::new();
        let floor = physics.add_rigid_body(presets::static_body(0.0, -0.5, 0.0));
        physics.add_collider(presets::static_collider(20.0, 0.5, 20.0), floor);
        physics
    }

    fn spawn(
        physics: &mut PhysicsWorld,
        id: CharacterId,
        player_index: Option<usize>,
        position: Vec3,
    ) -> Character {
        Character::new(
            id,
            "test",
            player_index,
            CharacterStats::standard(),
            AttackConfig::default(),
            physics,
            position,
        )
        .unwrap()
    }

    fn standing(z: f32) -> Vec3 {
        Vec3::new(0.0, 0.9, z)
    }

    #[test]
    fn test_spawn() {
        let mut physics = PhysicsWorld::new();
        let player = spawn(&mut physics, 1, Some(0), standing(0.0));
        let dummy = spawn(&mut physics, 2, None, standing(2.0));

        assert_eq!(player.current_hp(), 5.0);
        assert!(player.has_tag(PLAYER_TAG));
        assert!(!dummy.has_tag(PLAYER_TAG));
        assert_eq!(physics.get_entity_id(player.body_handle), Some(1));
        assert_eq!(player.state(), MovementState::Idle);
    }

    #[test]
    fn test_bad_attack_config_fails_spawn() {
        let mut physics = PhysicsWorld::new();
        let result = Character::new(
            1,
            "broken",
            None,
            CharacterStats::standard(),
            AttackConfig::default().with_combo_sections(Vec::<&str>::new()),
            &mut physics,
            Vec3::ZERO,
        );
        assert!(matches!(result, Err(SpawnError::Config(_))));
    }

    #[test]
    fn test_survived_hit_enables_partial_ragdoll() {
        let mut physics = PhysicsWorld::new();
        let mut dummy = spawn(&mut physics, 2, None, standing(0.0));

        let applied = dummy.apply_damage(1.0, 1, Vec3::ZERO, Vec3::new(0.0, 3.0, 2.5));

        assert_eq!(applied, 1.0);
        assert_eq!(dummy.current_hp(), 4.0);
        assert_eq!(dummy.ragdoll.blend_weight(), 0.5);
        assert!(!dummy.ragdoll.is_simulating());
        assert!(matches!(
            dummy.take_events().as_slice(),
            [CombatEvent::ReceivedDamage { damage, .. }] if *damage == 1.0
        ));
    }

    #[test]
    fn test_death_runs_once() {
        let mut physics = PhysicsWorld::new();
        let mut dummy = spawn(&mut physics, 2, None, standing(0.0));

        for _ in 0..7 {
            dummy.apply_damage(1.0, 1, Vec3::ZERO, Vec3::Y);
        }

        let events = dummy.take_events();
        let deaths = events.iter().filter(|e| **e == CombatEvent::Died).count();
        let received = events
            .iter()
            .filter(|e| matches!(e, CombatEvent::ReceivedDamage { .. }))
            .count();
        assert_eq!(deaths, 1);
        assert_eq!(received, 5);
        assert!(!dummy.is_alive());
        assert!(!dummy.movement_enabled());
        assert!(dummy.ragdoll.is_simulating());
        assert_eq!(dummy.state(), MovementState::Dead);
    }

    #[test]
    fn test_dead_character_takes_no_damage() {
        let mut physics = PhysicsWorld::new();
        let mut dummy = spawn(&mut physics, 2, None, standing(0.0));
        dummy.take_damage(10.0);
        dummy.take_events();

        assert_eq!(dummy.apply_damage(1.0, 1, Vec3::ZERO, Vec3::Y), 0.0);
        assert!(dummy.take_events().is_empty());
    }

    #[test]
    fn test_landing_clears_blend_at_zero_hp() {
        let mut physics = PhysicsWorld::new();
        let mut dummy = spawn(&mut physics, 2, None, standing(0.0));

        // Exactly zero HP: dead, and still counted as alive on landing
        dummy.take_damage(5.0);
        assert_eq!(dummy.current_hp(), 0.0);
        assert!(!dummy.is_alive());
        dummy.landed(0.0);
        assert_eq!(dummy.ragdoll.blend_weight(), 0.0);
    }

    #[test]
    fn test_landing_keeps_blend_below_zero_hp() {
        let mut physics = PhysicsWorld::new();
        let mut dummy = spawn(&mut physics, 2, None, standing(0.0));

        dummy.take_damage(6.0);
        dummy.landed(0.0);
        assert_eq!(dummy.ragdoll.blend_weight(), 1.0);
    }

    #[test]
    fn test_landing_clears_partial_blend() {
        let mut physics = PhysicsWorld::new();
        let mut dummy = spawn(&mut physics, 2, None, standing(0.0));

        dummy.take_damage(1.0);
        dummy.landed(0.0);
        assert_eq!(dummy.ragdoll.blend_weight(), 0.0);
    }

    #[test]
    fn test_knockback_applied_on_next_step() {
        let mut physics = world_with_floor();
        let mut dummy = spawn(&mut physics, 2, None, standing(0.0));
        physics.step();

        dummy.apply_damage(1.0, 1, Vec3::ZERO, Vec3::new(0.0, 3.0, 2.5));
        dummy.update_movement(&mut physics, DT);

        let velocity = dummy.velocity(&physics).unwrap();
        assert!(velocity.z > 2.0);
        assert!(velocity.y > 2.0);
    }

    #[test]
    fn test_death_unlocks_rotation() {
        let mut physics = world_with_floor();
        let mut dummy = spawn(&mut physics, 2, None, standing(0.0));
        dummy.take_damage(5.0);
        dummy.update_movement(&mut physics, DT);

        let body = physics.get_rigid_body(dummy.body_handle).unwrap();
        assert!(!body.locked_axes().contains(LockedAxes::ROTATION_LOCKED));
    }

    #[test]
    fn test_respawn_restores_character() {
        let mut physics = world_with_floor();
        let mut dummy = spawn(&mut physics, 2, None, standing(0.0));
        let rest = dummy.ragdoll.mesh_transform();

        dummy.take_damage(5.0);
        dummy.update_movement(&mut physics, DT);
        dummy.respawn(&mut physics, Vec3::new(2.0, 1.0, 2.0));

        assert_eq!(dummy.current_hp(), 5.0);
        assert!(dummy.movement_enabled());
        assert!(!dummy.ragdoll.is_simulating());
        assert_eq!(dummy.ragdoll.mesh_transform(), rest);
        assert_eq!(dummy.state(), MovementState::Falling);
        assert_eq!(dummy.position(&physics).unwrap(), Vec3::new(2.0, 1.0, 2.0));

        let body = physics.get_rigid_body(dummy.body_handle).unwrap();
        assert!(body.locked_axes().contains(LockedAxes::ROTATION_LOCKED));
        assert!(dummy.take_events().contains(&CombatEvent::Respawned));
    }

    #[test]
    fn test_respawn_clears_attack_in_progress() {
        let mut physics = world_with_floor();
        let mut player = spawn(&mut physics, 1, Some(0), standing(0.0));

        player.do_charged_attack_start(0.0);
        player.advance_animation(0.0, 1.0);
        player.take_damage(10.0);
        player.respawn(&mut physics, standing(0.0));

        assert!(!player.animation.is_playing());
        assert_eq!(player.attack.state(), AttackState::Idle);
        assert!(!player.attack.is_charging_attack());

        // The old montage's end must not cancel a fresh combo
        player.do_combo_attack_start(2.0);
        player.advance_animation(2.0, DT);
        assert_eq!(player.attack.state(), AttackState::ComboAttacking);
        assert!(player.animation.is_playing());
    }

    #[test]
    fn test_move_and_look_need_controller() {
        let mut physics = PhysicsWorld::new();
        let mut dummy = spawn(&mut physics, 2, None, standing(0.0));

        dummy.do_move(1.0, 1.0);
        dummy.do_look(0.5, 0.5);
        assert_eq!(dummy.movement_input, Vec3::ZERO);
        assert_eq!(dummy.control_rotation(), (0.0, 0.0));
    }

    #[test]
    fn test_move_is_camera_relative() {
        let mut physics = PhysicsWorld::new();
        let mut player = spawn(&mut physics, 1, Some(0), standing(0.0));

        player.do_look(std::f32::consts::FRAC_PI_2, 0.0);
        player.do_move(0.0, 1.0);
        assert_relative_eq!(player.movement_input.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(player.movement_input.z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_pitch_clamped() {
        let mut physics = PhysicsWorld::new();
        let mut player = spawn(&mut physics, 1, Some(0), standing(0.0));
        player.do_look(0.0, 10.0);
        assert_eq!(player.control_rotation().1, MAX_PITCH);
    }

    #[test]
    fn test_run_toggles_speed() {
        let mut physics = PhysicsWorld::new();
        let mut player = spawn(&mut physics, 1, Some(0), standing(0.0));

        player.do_run_start();
        assert_eq!(player.max_walk_speed(), 7.5);
        assert!(player.is_running());
        player.do_run_end();
        assert_eq!(player.max_walk_speed(), 4.0);
    }

    #[test]
    fn test_walks_and_turns_toward_input() {
        let mut physics = world_with_floor();
        let mut player = spawn(&mut physics, 1, Some(0), standing(0.0));
        physics.step();

        for _ in 0..60 {
            player.do_move(1.0, 0.0);
            player.update_movement(&mut physics, DT);
            physics.step();
        }

        let velocity = player.velocity(&physics).unwrap();
        assert!(velocity.x > 3.5);
        assert_relative_eq!(player.yaw(), std::f32::consts::FRAC_PI_2, epsilon = 1e-3);
        assert_eq!(player.state(), MovementState::Walking);
    }

    #[test]
    fn test_jump_from_ground() {
        let mut physics = world_with_floor();
        let mut player = spawn(&mut physics, 1, Some(0), standing(0.0));
        physics.step();
        player.update_movement(&mut physics, DT);
        physics.step();

        player.do_jump_start();
        player.update_movement(&mut physics, DT);

        assert_eq!(player.state(), MovementState::Jumping);
        assert_relative_eq!(player.velocity(&physics).unwrap().y, 5.0);
    }

    #[test]
    fn test_combo_chain_through_montages() {
        let mut physics = PhysicsWorld::new();
        let mut player = spawn(&mut physics, 1, Some(0), standing(0.0));

        player.do_combo_attack_start(0.0);
        assert_eq!(player.attack.state(), AttackState::ComboAttacking);

        let traces = player.advance_animation(0.0, 0.3);
        assert_eq!(traces, vec!["hand_r".to_string()]);

        // Buffered press, then the combo window at 0.45 moves on
        player.do_combo_attack_start(0.3);
        player.advance_animation(0.3, 0.2);
        assert_eq!(player.attack.combo_count(), 1);
        assert_eq!(
            player.animation.current_section(),
            Some(&SectionName::new("Combo2"))
        );
    }

    #[test]
    fn test_unanswered_combo_ends_attack() {
        let mut physics = PhysicsWorld::new();
        let mut player = spawn(&mut physics, 1, Some(0), standing(0.0));

        player.do_combo_attack_start(0.0);
        player.advance_animation(0.0, 0.7);

        assert_eq!(player.attack.state(), AttackState::Idle);
        assert!(!player.animation.is_playing());
    }

    #[test]
    fn test_charge_hold_and_release() {
        let mut physics = PhysicsWorld::new();
        let mut player = spawn(&mut physics, 1, Some(0), standing(0.0));

        player.do_charged_attack_start(0.0);
        // ChargeStart (0.3) then the loop check at 0.78
        player.advance_animation(0.0, 1.0);
        assert!(player.attack.has_looped_charged_attack());
        assert_eq!(
            player.animation.current_section(),
            Some(&SectionName::new("ChargeLoop"))
        );

        player.do_charged_attack_end(1.0);
        assert_eq!(
            player.animation.current_section(),
            Some(&SectionName::new("ChargeAttack"))
        );

        let traces = player.advance_animation(1.0, 0.4);
        assert_eq!(traces.len(), 1);

        player.advance_animation(1.4, 0.3);
        assert_eq!(player.attack.state(), AttackState::Idle);
    }

    #[test]
    fn test_attack_trace_damages_character_in_front() {
        let mut physics = world_with_floor();
        let mut manager = CharacterManager::new();
        manager.add(spawn(&mut physics, 1, Some(0), standing(0.0)));
        manager.add(spawn(&mut physics, 2, None, standing(1.0)));
        manager.add(spawn(&mut physics, 3, None, standing(-3.0)));
        physics.step();

        let (attacker, others) = manager.split_attacker(1).unwrap();
        let mut targets = ActorSet::new();
        targets.extend(others.into_iter().map(|c| c as &mut dyn Actor));

        let dealt = attacker.do_attack_trace("hand_r", &physics, &mut targets);
        drop(targets);

        assert_eq!(dealt.len(), 1);
        assert_eq!(dealt[0].target, 2);
        assert!(matches!(
            manager.get_mut(1).unwrap().take_events().as_slice(),
            [CombatEvent::DealtDamage { .. }]
        ));
        assert_eq!(manager.get(2).unwrap().current_hp(), 4.0);
        assert_eq!(manager.get(3).unwrap().current_hp(), 5.0);
        assert_eq!(manager.get(1).unwrap().current_hp(), 5.0);
    }

    #[test]
    fn test_manager_lookup() {
        let mut physics = PhysicsWorld::new();
        let mut manager = CharacterManager::new();
        manager.add(spawn(&mut physics, 1, Some(0), standing(0.0)));
        manager.add(spawn(&mut physics, 2, None, standing(2.0)));

        assert_eq!(manager.count(), 2);
        assert!(manager.is_player_taken(0));
        assert_eq!(manager.get_by_player(0).unwrap().id, 1);
        assert!(manager.split_attacker(9).is_none());

        manager.get_mut(2).unwrap().take_damage(9.0);
        assert_eq!(manager.alive_count(), 1);

        assert!(manager.remove(2).is_some());
        assert_eq!(manager.count(), 1);
    }
}
