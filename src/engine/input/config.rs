// Input configuration and remapping system

use super::action::{default_p1_bindings, global_bindings, Action, InputSource};
use std::collections::HashMap;

/// Input configuration for a single player
/// Maps input sources (keys/buttons) to game actions
#[derive(Debug, Clone)]
pub struct InputConfig {
    /// Player ID this config is for
    player_id: usize,

    /// Mapping from input sources to actions
    bindings: HashMap<InputSource, Action>,

    /// Reverse mapping (action -> all sources)
    action_to_sources: HashMap<Action, Vec<InputSource>>,
}

impl InputConfig {
    pub fn new(player_id: usize) -> Self {
        Self {
            player_id,
            bindings: HashMap::new(),
            action_to_sources: HashMap::new(),
        }
    }

    /// Create a configuration from a list of bindings
    pub fn from_bindings(player_id: usize, bindings: Vec<(InputSource, Action)>) -> Self {
        let mut config = Self::new(player_id);
        for (source, action) in bindings {
            config.bind(source, action);
        }
        config
    }

    pub fn player_id(&self) -> usize {
        self.player_id
    }

    /// Bind an input source to an action.
    /// Returns the action the source was bound to before, if any.
    pub fn bind(&mut self, source: InputSource, action: Action) -> Option<Action> {
        let previous = self.unbind_source(source);

        self.bindings.insert(source, action);
        self.action_to_sources
            .entry(action)
            .or_default()
            .push(source);

        previous
    }

    /// Unbind an input source, returning the action it was bound to
    pub fn unbind_source(&mut self, source: InputSource) -> Option<Action> {
        let action = self.bindings.remove(&source)?;
        if let Some(sources) = self.action_to_sources.get_mut(&action) {
            sources.retain(|s| *s != source);
            if sources.is_empty() {
                self.action_to_sources.remove(&action);
            }
        }
        Some(action)
    }

    /// Unbind all sources for an action
    pub fn unbind_action(&mut self, action: Action) {
        if let Some(sources) = self.action_to_sources.remove(&action) {
            for source in sources {
                self.bindings.remove(&source);
            }
        }
    }

    /// Get the action bound to an input source
    pub fn get_action(&self, source: InputSource) -> Option<Action> {
        self.bindings.get(&source).copied()
    }

    /// Get all input sources bound to an action
    pub fn get_sources(&self, action: Action) -> &[InputSource] {
        self.action_to_sources
            .get(&action)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Check if an action has any bindings
    pub fn has_binding(&self, action: Action) -> bool {
        self.action_to_sources.contains_key(&action)
    }

    /// Clear all bindings
    pub fn clear(&mut self) {
        self.bindings.clear();
        self.action_to_sources.clear();
    }

    /// Reset to default bindings for this player
    pub fn reset_to_defaults(&mut self) {
        self.clear();
        // Only the first player has local defaults
        if self.player_id == 0 {
            for (source, action) in default_p1_bindings() {
                self.bind(source, action);
            }
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Manager for all player input configurations
#[derive(Debug)]
pub struct InputConfigManager {
    configs: Vec<InputConfig>,

    /// Bindings shared by every player
    global_config: InputConfig,
}

impl InputConfigManager {
    /// Create a config manager with default configurations for `max_players`
    pub fn new(max_players: usize) -> Self {
        let configs = (0..max_players)
            .map(|player_id| {
                let mut config = InputConfig::new(player_id);
                config.reset_to_defaults();
                config
            })
            .collect();

        Self {
            configs,
            global_config: InputConfig::from_bindings(usize::MAX, global_bindings()),
        }
    }

    pub fn get_config(&self, player_id: usize) -> Option<&InputConfig> {
        self.configs.get(player_id)
    }

    pub fn get_config_mut(&mut self, player_id: usize) -> Option<&mut InputConfig> {
        self.configs.get_mut(player_id)
    }

    pub fn global_config(&self) -> &InputConfig {
        &self.global_config
    }

    /// Get the action for a given input source and player.
    /// Player bindings win over global bindings.
    pub fn get_action(&self, player_id: usize, source: InputSource) -> Option<Action> {
        self.get_config(player_id)
            .and_then(|config| config.get_action(source))
            .or_else(|| self.global_config.get_action(source))
    }

    /// Reset all configurations to defaults
    pub fn reset_all_to_defaults(&mut self) {
        for config in &mut self.configs {
            config.reset_to_defaults();
        }
    }
}

impl Default for InputConfigManager {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::event::MouseButton;
    use winit::keyboard::KeyCode;

    #[test]
    fn test_bind_and_lookup() {
        let mut config = InputConfig::new(0);
        let source = InputSource::mouse(MouseButton::Left);
        assert_eq!(config.bind(source, Action::ComboAttack), None);
        assert_eq!(config.get_action(source), Some(Action::ComboAttack));
    }

    #[test]
    fn test_rebind_source_returns_previous() {
        let mut config = InputConfig::new(0);
        let source = InputSource::key(KeyCode::KeyJ);

        config.bind(source, Action::ComboAttack);
        let previous = config.bind(source, Action::ChargedAttack);

        assert_eq!(previous, Some(Action::ComboAttack));
        assert_eq!(config.get_action(source), Some(Action::ChargedAttack));
        assert!(!config.has_binding(Action::ComboAttack));
    }

    #[test]
    fn test_unbind_action_removes_every_source() {
        let mut config = InputConfig::new(0);
        let mouse = InputSource::mouse(MouseButton::Right);
        let key = InputSource::key(KeyCode::KeyK);

        config.bind(mouse, Action::ChargedAttack);
        config.bind(key, Action::ChargedAttack);
        assert_eq!(config.get_sources(Action::ChargedAttack).len(), 2);

        config.unbind_action(Action::ChargedAttack);
        assert_eq!(config.get_action(mouse), None);
        assert_eq!(config.get_action(key), None);
        assert!(config.get_sources(Action::ChargedAttack).is_empty());
    }

    #[test]
    fn test_unbind_source() {
        let mut config = InputConfig::new(0);
        let source = InputSource::key(KeyCode::KeyA);
        config.bind(source, Action::MoveLeft);

        assert_eq!(config.unbind_source(source), Some(Action::MoveLeft));
        assert_eq!(config.unbind_source(source), None);
    }

    #[test]
    fn test_reset_to_defaults() {
        let mut config = InputConfig::new(0);
        config.clear();
        config.reset_to_defaults();

        assert!(config.has_binding(Action::ComboAttack));
        assert!(config.has_binding(Action::ChargedAttack));
        assert!(config.has_binding(Action::Run));

        // Other players start unbound
        let mut remote = InputConfig::new(1);
        remote.reset_to_defaults();
        assert!(!remote.has_binding(Action::ComboAttack));
    }

    #[test]
    fn test_manager_player_then_global() {
        let mut manager = InputConfigManager::new(2);
        let pause = InputSource::key(KeyCode::KeyP);

        assert_eq!(manager.get_action(0, pause), Some(Action::Pause));
        assert_eq!(manager.get_action(1, pause), Some(Action::Pause));

        // A player binding shadows the global one
        manager
            .get_config_mut(0)
            .unwrap()
            .bind(pause, Action::ComboAttack);
        assert_eq!(manager.get_action(0, pause), Some(Action::ComboAttack));
        assert_eq!(manager.get_action(1, pause), Some(Action::Pause));

        manager.reset_all_to_defaults();
        assert_eq!(manager.get_action(0, pause), Some(Action::Pause));
    }

    #[test]
    fn test_manager_bounds() {
        let manager = InputConfigManager::new(2);
        assert!(manager.get_config(1).is_some());
        assert!(manager.get_config(2).is_none());
    }
}
