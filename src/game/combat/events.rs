use glam::Vec3;

/// Feedback raised by characters for effects, UI and logging
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CombatEvent {
    /// This character's trace hit a damageable target
    DealtDamage { damage: f32, location: Vec3 },
    /// This character accepted damage; `direction` is the normalized impulse
    ReceivedDamage {
        damage: f32,
        location: Vec3,
        direction: Vec3,
    },
    Died,
    Respawned,
}
