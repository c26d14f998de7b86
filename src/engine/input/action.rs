// Game action definitions and mappings

use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Represents all possible in-game actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Movement
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    Jump,
    Run,

    // Combat
    ComboAttack,
    ChargedAttack,

    // Meta actions
    Pause,
}

/// Represents an input source (keyboard key or mouse button)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Keyboard(KeyCode),
    Mouse(MouseButton),
}

impl InputSource {
    /// Create a keyboard input source
    pub fn key(code: KeyCode) -> Self {
        Self::Keyboard(code)
    }

    /// Create a mouse button input source
    pub fn mouse(button: MouseButton) -> Self {
        Self::Mouse(button)
    }
}

/// Default keyboard/mouse bindings for Player 1
pub fn default_p1_bindings() -> Vec<(InputSource, Action)> {
    vec![
        // Movement (WASD)
        (InputSource::key(KeyCode::KeyW), Action::MoveForward),
        (InputSource::key(KeyCode::KeyS), Action::MoveBackward),
        (InputSource::key(KeyCode::KeyA), Action::MoveLeft),
        (InputSource::key(KeyCode::KeyD), Action::MoveRight),
        (InputSource::key(KeyCode::Space), Action::Jump),
        (InputSource::key(KeyCode::ShiftLeft), Action::Run),
        // Attacks (mouse buttons, with keyboard fallbacks)
        (InputSource::mouse(MouseButton::Left), Action::ComboAttack),
        (InputSource::mouse(MouseButton::Right), Action::ChargedAttack),
        (InputSource::key(KeyCode::KeyJ), Action::ComboAttack),
        (InputSource::key(KeyCode::KeyK), Action::ChargedAttack),
    ]
}

/// Global bindings (not player-specific)
pub fn global_bindings() -> Vec<(InputSource, Action)> {
    vec![
        (InputSource::key(KeyCode::KeyP), Action::Pause),
        (InputSource::key(KeyCode::Escape), Action::Pause),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_equality() {
        assert_eq!(Action::Jump, Action::Jump);
        assert_ne!(Action::ComboAttack, Action::ChargedAttack);
    }

    #[test]
    fn test_input_source_creation() {
        assert_eq!(
            InputSource::key(KeyCode::KeyA),
            InputSource::Keyboard(KeyCode::KeyA)
        );
        assert_eq!(
            InputSource::mouse(MouseButton::Left),
            InputSource::Mouse(MouseButton::Left)
        );
    }

    #[test]
    fn test_default_p1_bindings_cover_attacks() {
        let bindings = default_p1_bindings();

        let combo = bindings
            .iter()
            .find(|(source, _)| *source == InputSource::Mouse(MouseButton::Left));
        let charged = bindings
            .iter()
            .find(|(source, _)| *source == InputSource::Mouse(MouseButton::Right));

        assert!(matches!(combo, Some((_, Action::ComboAttack))));
        assert!(matches!(charged, Some((_, Action::ChargedAttack))));
    }

    #[test]
    fn test_global_bindings_exist() {
        let bindings = global_bindings();
        assert!(bindings.iter().all(|(_, action)| *action == Action::Pause));
    }

    #[test]
    fn test_no_duplicate_inputs_in_p1() {
        let bindings = default_p1_bindings();
        let mut seen_sources = std::collections::HashSet::new();
        for (source, _) in bindings {
            assert!(
                seen_sources.insert(source),
                "Duplicate input source found in P1 bindings"
            );
        }
    }
}
