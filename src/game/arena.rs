// Arena - the simulated world: physics, characters, props, input and clock

use std::time::Duration;

use glam::Vec3;
use log::{debug, info};

use crate::engine::game_loop::GameLoop;
use crate::engine::input::{Action, InputManager};
use crate::engine::physics::{body::presets, ColliderHandle, PhysicsWorld, RigidBodyHandle};
use crate::game::characters::{Character, CharacterId, CharacterManager, CharacterStats, SpawnError};
use crate::game::combat::{Actor, ActorId, ActorSet, AttackConfig, CombatEvent};

/// A movable physics object. Melee sweeps hit it, but it takes no damage.
#[derive(Debug)]
pub struct Prop {
    pub id: ActorId,
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
}

impl Actor for Prop {
    fn actor_id(&self) -> ActorId {
        self.id
    }
}

pub struct Arena {
    pub physics: PhysicsWorld,
    pub characters: CharacterManager,
    pub props: Vec<Prop>,
    pub input: InputManager,
    pub game_loop: GameLoop,
    next_actor_id: ActorId,
}

impl Arena {
    pub fn new(max_players: usize) -> Self {
        let game_loop = GameLoop::new();
        let mut physics = PhysicsWorld::new();
        physics.set_timestep(game_loop.fixed_timestep());

        Self {
            physics,
            characters: CharacterManager::new(),
            props: Vec::new(),
            input: InputManager::new(max_players),
            game_loop,
            next_actor_id: 1,
        }
    }

    fn allocate_id(&mut self) -> ActorId {
        let id = self.next_actor_id;
        self.next_actor_id += 1;
        id
    }

    /// Add a static floor slab whose top face sits at y = 0
    pub fn spawn_floor(&mut self, half_x: f32, half_z: f32) {
        let body = self.physics.add_rigid_body(presets::static_body(0.0, -0.5, 0.0));
        self.physics
            .add_collider(presets::static_collider(half_x, 0.5, half_z), body);
    }

    /// Spawn a character possessed by `player_index`
    pub fn spawn_player(
        &mut self,
        player_index: usize,
        name: &str,
        position: Vec3,
    ) -> Result<CharacterId, SpawnError> {
        if self.characters.is_player_taken(player_index) {
            return Err(SpawnError::PlayerTaken(player_index));
        }
        self.spawn_character(name, Some(player_index), position)
    }

    /// Spawn an unpossessed training dummy
    pub fn spawn_dummy(&mut self, name: &str, position: Vec3) -> Result<CharacterId, SpawnError> {
        self.spawn_character(name, None, position)
    }

    fn spawn_character(
        &mut self,
        name: &str,
        player_index: Option<usize>,
        position: Vec3,
    ) -> Result<CharacterId, SpawnError> {
        let id = self.allocate_id();
        let character = Character::new(
            id,
            name,
            player_index,
            CharacterStats::standard(),
            AttackConfig::default(),
            &mut self.physics,
            position,
        )?;
        Ok(self.characters.add(character))
    }

    /// Spawn a movable crate
    pub fn spawn_prop(&mut self, position: Vec3, half_extent: f32) -> ActorId {
        let id = self.allocate_id();
        let body_handle = self
            .physics
            .add_rigid_body(presets::prop_body(position.x, position.y, position.z));
        let collider_handle = self
            .physics
            .add_collider(presets::prop_collider(half_extent), body_handle);
        self.physics.set_entity_mapping(body_handle, id);

        self.props.push(Prop {
            id,
            body_handle,
            collider_handle,
        });
        debug!("Prop {} spawned at {:?}", id, position);
        id
    }

    /// Run one wall-clock frame. Returns the number of fixed steps taken.
    /// A pause press consumes the input of its frame.
    pub fn run_frame(&mut self, frame_time: Duration) -> u32 {
        if self.input.any_player_just_pressed(Action::Pause) {
            self.game_loop.toggle_pause();
            self.input.update();
        }

        let steps = self.game_loop.begin_frame_with(frame_time);
        for _ in 0..steps {
            self.tick();
        }

        if self.game_loop.is_paused() {
            self.input.update();
        }
        steps
    }

    /// Advance the world by one fixed step
    pub fn tick(&mut self) {
        let dt = self.game_loop.fixed_timestep();
        let start = self.game_loop.world_time();

        for character in self.characters.all_mut() {
            if let Some(input) = character
                .player_index
                .and_then(|index| self.input.player(index))
            {
                character.handle_input(input, start);
            }
        }

        for character in self.characters.all_mut() {
            character.update_movement(&mut self.physics, dt);
        }

        self.physics.step();

        let traces: Vec<(CharacterId, Vec<String>)> = self
            .characters
            .all_mut()
            .iter_mut()
            .map(|character| (character.id, character.advance_animation(start, dt)))
            .filter(|(_, sockets)| !sockets.is_empty())
            .collect();

        for (attacker_id, sockets) in traces {
            self.resolve_traces(attacker_id, &sockets);
        }

        self.input.update();
        self.game_loop.fixed_update();
    }

    fn resolve_traces(&mut self, attacker_id: CharacterId, sockets: &[String]) {
        let Some((attacker, others)) = self.characters.split_attacker(attacker_id) else {
            return;
        };
        if !attacker.is_alive() {
            return;
        }

        let mut targets = ActorSet::new();
        targets.extend(others.into_iter().map(|c| c as &mut dyn Actor));
        targets.extend(self.props.iter_mut().map(|p| p as &mut dyn Actor));

        for socket in sockets {
            let dealt = attacker.do_attack_trace(socket, &self.physics, &mut targets);
            if dealt.is_empty() {
                debug!("'{}' swung at nothing", attacker.name);
            }
        }
    }

    /// Bring a character back at `position`
    pub fn respawn(&mut self, id: CharacterId, position: Vec3) -> bool {
        match self.characters.get_mut(id) {
            Some(character) => {
                character.respawn(&mut self.physics, position);
                true
            }
            None => false,
        }
    }

    /// Collect the feedback events of every character since the last drain
    pub fn drain_events(&mut self) -> Vec<(CharacterId, CombatEvent)> {
        let mut events = Vec::new();
        for character in self.characters.all_mut() {
            let id = character.id;
            events.extend(character.take_events().into_iter().map(|e| (id, e)));
        }
        events
    }

    pub fn world_time(&self) -> f32 {
        self.game_loop.world_time()
    }

    pub fn is_paused(&self) -> bool {
        self.game_loop.is_paused()
    }

    /// Log a one-line status of every character
    pub fn log_status(&self) {
        for character in self.characters.all() {
            info!(
                "{} '{}': {:.1} HP, {:?}, attack {:?}",
                character.id,
                character.name,
                character.current_hp(),
                character.state(),
                character.attack.state()
            );
        }
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(1)
    }
}
