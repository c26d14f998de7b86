// Combat: attack timing, input buffering, melee traces and damage

pub mod attack;
pub mod cache;
pub mod config;
pub mod damage;
pub mod events;
pub mod trace;

pub use attack::{AttackContext, AttackController, AttackState};
pub use cache::InputCache;
pub use config::{AttackConfig, ConfigError};
pub use damage::{
    Actor, ActorId, ActorSet, DamageOutcome, DamageTargets, Damageable, DealtDamage, Health,
};
pub use events::CombatEvent;
pub use trace::{melee_object_types, MeleeHit, MeleeHitTester, SweepQuery};
