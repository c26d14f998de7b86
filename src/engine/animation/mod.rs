// Montage animation system
//
// A montage is an ordered set of named sections with time-stamped notifies.
// Gameplay code talks to it through the `AnimationDriver` trait; the
// `MontagePlayer` is the concrete driver that advances time and reports
// notifies and montage-end events back to its owner.

mod montage;
mod player;

pub use montage::{AnimNotify, Montage, MontageBuilder, MontageSection, NotifyTrack};
pub use player::{MontageEvent, MontagePlayer};

use std::fmt;

/// Name of a montage asset
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MontageName(String);

impl MontageName {
    pub fn new(name: &str) -> Self {
        Self(name.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MontageName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for MontageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of a section inside a montage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SectionName(String);

impl SectionName {
    pub fn new(name: &str) -> Self {
        Self(name.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SectionName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Montage playback as seen by gameplay code
pub trait AnimationDriver {
    /// Start playing a montage. Returns the montage length in seconds,
    /// or a non-positive value if nothing was played.
    fn montage_play(
        &mut self,
        montage: &MontageName,
        rate: f32,
        start_section: Option<&SectionName>,
    ) -> f32;

    /// Jump the playing montage to the start of a section
    fn montage_jump_to_section(&mut self, section: &SectionName, montage: &MontageName);

    /// Subscribe to the end (completed or interrupted) of the current play of `montage`.
    /// Fires at most once for that play.
    fn montage_set_end_delegate(&mut self, montage: &MontageName);
}

/// Montage construction errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnimationError {
    #[error("Montage '{0}' has no sections")]
    EmptyMontage(String),

    #[error("Montage '{montage}' has duplicate section '{section}'")]
    DuplicateSection { montage: String, section: String },

    #[error("Section '{section}' links to unknown section '{next}'")]
    UnknownNextSection { section: String, next: String },

    #[error("Section '{section}' has non-positive length {length}")]
    InvalidLength { section: String, length: f32 },

    #[error("Notify at {time}s lies outside section '{section}'")]
    NotifyOutOfRange { section: String, time: f32 },
}
