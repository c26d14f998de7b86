// Damage capability - health pools, damage sinks and actor lookup

use glam::Vec3;

/// Identifier shared by physics entity mappings and game actors
pub type ActorId = u64;

/// Anything that can receive melee damage
pub trait Damageable {
    /// Apply damage with a knockback impulse at a world location.
    /// Returns the damage that was actually applied (0 when already dead).
    fn apply_damage(&mut self, damage: f32, causer: ActorId, location: Vec3, impulse: Vec3) -> f32;

    /// Called exactly once when health crosses zero
    fn handle_death(&mut self);
}

/// Every game object a trace can hit
pub trait Actor {
    fn actor_id(&self) -> ActorId;

    /// Capability query; actors that cannot be damaged keep the default
    fn as_damageable_mut(&mut self) -> Option<&mut dyn Damageable> {
        None
    }
}

/// Lookup of damage sinks by actor id
pub trait DamageTargets {
    fn damageable_mut(&mut self, id: ActorId) -> Option<&mut dyn Damageable>;
}

/// Borrowed view over a group of actors, used as the target side of a trace
#[derive(Default)]
pub struct ActorSet<'a> {
    actors: Vec<&'a mut dyn Actor>,
}

impl<'a> ActorSet<'a> {
    pub fn new() -> Self {
        Self { actors: Vec::new() }
    }

    pub fn push(&mut self, actor: &'a mut dyn Actor) {
        self.actors.push(actor);
    }

    pub fn extend<I>(&mut self, actors: I)
    where
        I: IntoIterator<Item = &'a mut dyn Actor>,
    {
        self.actors.extend(actors);
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

impl DamageTargets for ActorSet<'_> {
    fn damageable_mut(&mut self, id: ActorId) -> Option<&mut dyn Damageable> {
        self.actors
            .iter_mut()
            .find(|actor| actor.actor_id() == id)
            .and_then(|actor| actor.as_damageable_mut())
    }
}

/// Result of subtracting damage from a health pool
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    pub applied: f32,
    /// True only on the hit that crossed zero
    pub died: bool,
}

/// Hit points of a damageable actor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    max_hp: f32,
    current_hp: f32,
}

impl Health {
    pub fn new(max_hp: f32) -> Self {
        Self {
            max_hp,
            current_hp: max_hp,
        }
    }

    pub fn max_hp(&self) -> f32 {
        self.max_hp
    }

    pub fn current_hp(&self) -> f32 {
        self.current_hp
    }

    pub fn is_dead(&self) -> bool {
        self.current_hp <= 0.0
    }

    pub fn reset(&mut self) {
        self.current_hp = self.max_hp;
    }

    /// Subtract `amount`. Nothing is applied once the pool is at or below zero.
    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if self.is_dead() {
            return DamageOutcome {
                applied: 0.0,
                died: false,
            };
        }

        self.current_hp -= amount;
        DamageOutcome {
            applied: amount,
            died: self.is_dead(),
        }
    }
}

/// Damage dealt by one trace to one target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DealtDamage {
    pub target: ActorId,
    /// Damage the trace tried to deal
    pub damage: f32,
    /// Damage the target accepted
    pub applied: f32,
    pub location: Vec3,
    pub impulse: Vec3,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dummy {
        id: ActorId,
        health: Health,
        deaths: u32,
    }

    impl Damageable for Dummy {
        fn apply_damage(&mut self, damage: f32, _: ActorId, _: Vec3, _: Vec3) -> f32 {
            let outcome = self.health.take_damage(damage);
            if outcome.died {
                self.handle_death();
            }
            outcome.applied
        }

        fn handle_death(&mut self) {
            self.deaths += 1;
        }
    }

    impl Actor for Dummy {
        fn actor_id(&self) -> ActorId {
            self.id
        }

        fn as_damageable_mut(&mut self) -> Option<&mut dyn Damageable> {
            Some(self)
        }
    }

    struct Crate {
        id: ActorId,
    }

    impl Actor for Crate {
        fn actor_id(&self) -> ActorId {
            self.id
        }
    }

    #[test]
    fn test_health_damage_and_death() {
        let mut health = Health::new(2.0);
        let first = health.take_damage(1.0);
        assert_eq!(first.applied, 1.0);
        assert!(!first.died);

        let second = health.take_damage(1.0);
        assert!(second.died);
        assert_eq!(health.current_hp(), 0.0);
    }

    #[test]
    fn test_dead_health_applies_nothing() {
        let mut health = Health::new(1.0);
        health.take_damage(3.0);
        let outcome = health.take_damage(1.0);
        assert_eq!(outcome.applied, 0.0);
        assert!(!outcome.died);
        assert_eq!(health.current_hp(), -2.0);
    }

    #[test]
    fn test_health_reset() {
        let mut health = Health::new(5.0);
        health.take_damage(5.0);
        health.reset();
        assert_eq!(health.current_hp(), 5.0);
        assert!(!health.is_dead());
    }

    #[test]
    fn test_death_handler_runs_once() {
        let mut dummy = Dummy {
            id: 1,
            health: Health::new(1.0),
            deaths: 0,
        };
        for _ in 0..3 {
            dummy.apply_damage(1.0, 0, Vec3::ZERO, Vec3::ZERO);
        }
        assert_eq!(dummy.deaths, 1);
    }

    #[test]
    fn test_actor_set_capability_query() {
        let mut dummy = Dummy {
            id: 1,
            health: Health::new(5.0),
            deaths: 0,
        };
        let mut prop = Crate { id: 2 };

        let mut set = ActorSet::new();
        set.push(&mut dummy);
        set.push(&mut prop);
        assert_eq!(set.len(), 2);

        assert!(set.damageable_mut(1).is_some());
        assert!(set.damageable_mut(2).is_none());
        assert!(set.damageable_mut(3).is_none());
    }
}
