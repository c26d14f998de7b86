// Attack tuning - montage names, cache windows and melee trace parameters

use crate::engine::animation::{MontageName, SectionName};

/// Configuration errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Attack config needs at least one combo section")]
    NoComboSections,

    #[error("Empty name for {0}")]
    EmptyName(&'static str),

    #[error("Negative cache tolerance for {name}: {value}")]
    NegativeTolerance { name: &'static str, value: f32 },

    #[error("Melee trace {name} must be positive, got {value}")]
    InvalidTrace { name: &'static str, value: f32 },

    #[error("Play rate for {name} must be positive and finite, got {value}")]
    InvalidPlayRate { name: &'static str, value: f32 },
}

/// Per-character attack configuration, fixed once the controller is built
#[derive(Debug, Clone, PartialEq)]
pub struct AttackConfig {
    // Combo string
    pub combo_montage: MontageName,
    /// Ordered combo sections; index 0 starts every fresh combo
    pub combo_section_names: Vec<SectionName>,
    pub combo_play_rate: f32,

    // Charged attack
    pub charged_montage: MontageName,
    /// Section to jump to while the charge button is still held
    pub charge_loop_section: SectionName,
    /// Section to jump to once the charge is released
    pub charge_attack_section: SectionName,
    pub charged_play_rate: f32,

    // Input buffering (seconds)
    /// How long a buffered press may re-trigger an attack on montage end
    pub attack_input_cache_tolerance: f32,
    /// How long a buffered press may continue the combo string
    pub combo_input_cache_tolerance: f32,

    // Melee trace
    /// Sweep length along the attacker's forward vector (meters)
    pub melee_trace_distance: f32,
    /// Sweep sphere radius (meters)
    pub melee_trace_radius: f32,
    pub melee_damage: f32,
    /// Impulse away from the impact normal
    pub melee_knockback_impulse: f32,
    /// Upward impulse added to every hit
    pub melee_launch_impulse: f32,
    /// Upper bound on targets a single trace may report
    pub max_trace_hits: usize,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            combo_montage: MontageName::new("ComboAttack"),
            combo_section_names: vec![
                SectionName::new("Combo1"),
                SectionName::new("Combo2"),
                SectionName::new("Combo3"),
            ],
            combo_play_rate: 1.0,

            charged_montage: MontageName::new("ChargedAttack"),
            charge_loop_section: SectionName::new("ChargeLoop"),
            charge_attack_section: SectionName::new("ChargeAttack"),
            charged_play_rate: 1.0,

            attack_input_cache_tolerance: 1.0,
            combo_input_cache_tolerance: 0.45,

            melee_trace_distance: 0.75,
            melee_trace_radius: 0.75,
            melee_damage: 1.0,
            melee_knockback_impulse: 2.5,
            melee_launch_impulse: 3.0,
            max_trace_hits: 16,
        }
    }
}

impl AttackConfig {
    pub fn with_combo_sections<I, S>(mut self, sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SectionName>,
    {
        self.combo_section_names = sections.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_attack_tolerance(mut self, seconds: f32) -> Self {
        self.attack_input_cache_tolerance = seconds;
        self
    }

    pub fn with_combo_tolerance(mut self, seconds: f32) -> Self {
        self.combo_input_cache_tolerance = seconds;
        self
    }

    pub fn with_melee_trace(mut self, distance: f32, radius: f32) -> Self {
        self.melee_trace_distance = distance;
        self.melee_trace_radius = radius;
        self
    }

    pub fn with_melee_damage(mut self, damage: f32) -> Self {
        self.melee_damage = damage;
        self
    }

    pub fn with_impulses(mut self, knockback: f32, launch: f32) -> Self {
        self.melee_knockback_impulse = knockback;
        self.melee_launch_impulse = launch;
        self
    }

    /// Number of sections in the combo string
    pub fn combo_length(&self) -> usize {
        self.combo_section_names.len()
    }

    /// Check the config for values the controller cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.combo_section_names.is_empty() {
            return Err(ConfigError::NoComboSections);
        }

        let names = [
            ("combo montage", self.combo_montage.as_str()),
            ("charged montage", self.charged_montage.as_str()),
            ("charge loop section", self.charge_loop_section.as_str()),
            ("charge attack section", self.charge_attack_section.as_str()),
        ];
        for (what, name) in names {
            if name.is_empty() {
                return Err(ConfigError::EmptyName(what));
            }
        }
        if self.combo_section_names.iter().any(|s| s.as_str().is_empty()) {
            return Err(ConfigError::EmptyName("combo section"));
        }

        for (name, value) in [
            ("attack", self.attack_input_cache_tolerance),
            ("combo", self.combo_input_cache_tolerance),
        ] {
            if !(value >= 0.0) {
                return Err(ConfigError::NegativeTolerance { name, value });
            }
        }

        for (name, value) in [
            ("distance", self.melee_trace_distance),
            ("radius", self.melee_trace_radius),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::InvalidTrace { name, value });
            }
        }

        for (name, value) in [
            ("combo", self.combo_play_rate),
            ("charged", self.charged_play_rate),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::InvalidPlayRate { name, value });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AttackConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.combo_length(), 3);
        assert_eq!(config.attack_input_cache_tolerance, 1.0);
        assert_eq!(config.combo_input_cache_tolerance, 0.45);
        assert_eq!(config.melee_trace_radius, 0.75);
    }

    #[test]
    fn test_builder_overrides() {
        let config = AttackConfig::default()
            .with_combo_sections(["A", "B"])
            .with_attack_tolerance(0.5)
            .with_combo_tolerance(0.5)
            .with_melee_damage(2.0);

        assert_eq!(config.combo_section_names[1].as_str(), "B");
        assert_eq!(config.combo_length(), 2);
        assert_eq!(config.melee_damage, 2.0);
    }

    #[test]
    fn test_empty_combo_rejected() {
        let config = AttackConfig::default().with_combo_sections(Vec::<&str>::new());
        assert_eq!(config.validate(), Err(ConfigError::NoComboSections));
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        let config = AttackConfig::default().with_combo_tolerance(-0.1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NegativeTolerance { name: "combo", .. })
        ));
    }

    #[test]
    fn test_zero_tolerance_allowed() {
        let config = AttackConfig::default().with_attack_tolerance(0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_trace_rejected() {
        let config = AttackConfig::default().with_melee_trace(0.75, 0.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTrace { name: "radius", .. })
        ));
    }

    #[test]
    fn test_non_finite_play_rate_rejected() {
        let mut config = AttackConfig::default();
        config.charged_play_rate = f32::INFINITY;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPlayRate { name: "charged", .. })
        ));

        config.charged_play_rate = 1.0;
        config.combo_play_rate = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPlayRate { name: "combo", .. })
        ));
    }

    #[test]
    fn test_empty_section_name_rejected() {
        let config = AttackConfig::default().with_combo_sections(["Combo1", ""]);
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyName("combo section"))
        );
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::NoComboSections;
        assert_eq!(err.to_string(), "Attack config needs at least one combo section");
    }
}
