// Standard attack montages

use crate::engine::animation::{AnimNotify, AnimationError, Montage, MontagePlayer};
use crate::game::combat::AttackConfig;

/// Socket that deals damage in the standard montages
pub const WEAPON_SOCKET: &str = "hand_r";

const COMBO_SECTION_LENGTH: f32 = 0.6;
const COMBO_TRACE_TIME: f32 = 0.25;
const COMBO_CHECK_TIME: f32 = 0.45;

/// Three-hit combo: every section traces once, then opens the combo window.
/// Sections are not linked, an unanswered window ends the montage.
pub fn combo_montage(config: &AttackConfig) -> Result<Montage, AnimationError> {
    let mut builder = Montage::builder(config.combo_montage.as_str());
    for section in &config.combo_section_names {
        builder = builder
            .section(section.as_str(), COMBO_SECTION_LENGTH)
            .notify(COMBO_TRACE_TIME, AnimNotify::attack_trace(WEAPON_SOCKET))
            .notify(COMBO_CHECK_TIME, AnimNotify::CheckCombo);
    }
    builder.build()
}

/// Wind-up, a loop that re-checks the button every pass, and the release swing
pub fn charged_montage(config: &AttackConfig) -> Result<Montage, AnimationError> {
    let loop_section = config.charge_loop_section.as_str();

    Montage::builder(config.charged_montage.as_str())
        .section("ChargeStart", 0.3)
        .next(loop_section)
        .section(loop_section, 0.5)
        .notify(0.48, AnimNotify::CheckChargedAttack)
        .looping()
        .section(config.charge_attack_section.as_str(), 0.6)
        .notify(0.3, AnimNotify::attack_trace(WEAPON_SOCKET))
        .build()
}

/// Montage player loaded with both attack montages
pub fn standard_player(config: &AttackConfig) -> Result<MontagePlayer, AnimationError> {
    let mut player = MontagePlayer::new();
    player.add_montage(combo_montage(config)?);
    player.add_montage(charged_montage(config)?);
    Ok(player)
}
