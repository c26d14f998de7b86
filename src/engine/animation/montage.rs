// Montage data: sections, links and notifies

use super::{AnimationError, MontageName, SectionName};

/// Gameplay callback fired at a point on a section's timeline
#[derive(Debug, Clone, PartialEq)]
pub enum AnimNotify {
    /// Sweep for hits from the named bone/socket
    AttackTrace { bone: String },
    /// Decide whether the combo string continues
    CheckCombo,
    /// Decide whether to keep looping the charge or release it
    CheckChargedAttack,
}

impl AnimNotify {
    pub fn attack_trace(bone: &str) -> Self {
        Self::AttackTrace {
            bone: bone.to_string(),
        }
    }
}

/// A notify placed on a section timeline
#[derive(Debug, Clone, PartialEq)]
pub struct NotifyTrack {
    /// Seconds from the start of the section
    pub time: f32,
    pub notify: AnimNotify,
}

/// One named section of a montage
#[derive(Debug, Clone)]
pub struct MontageSection {
    pub name: SectionName,
    /// Length in seconds at rate 1.0
    pub length: f32,
    /// Index of the section that plays after this one; `None` ends the montage
    pub next: Option<usize>,
    /// Notifies sorted by time
    pub notifies: Vec<NotifyTrack>,
}

/// A montage asset
#[derive(Debug, Clone)]
pub struct Montage {
    name: MontageName,
    sections: Vec<MontageSection>,
}

impl Montage {
    /// Start building a montage
    pub fn builder(name: &str) -> MontageBuilder {
        MontageBuilder::new(name)
    }

    pub fn name(&self) -> &MontageName {
        &self.name
    }

    pub fn sections(&self) -> &[MontageSection] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<&MontageSection> {
        self.sections.get(index)
    }

    /// Find a section index by name
    pub fn section_index(&self, name: &SectionName) -> Option<usize> {
        self.sections.iter().position(|s| &s.name == name)
    }

    /// Sum of all section lengths
    pub fn total_length(&self) -> f32 {
        self.sections.iter().map(|s| s.length).sum()
    }
}

struct PendingSection {
    name: String,
    length: f32,
    next: Option<String>,
    notifies: Vec<NotifyTrack>,
}

/// Builder for montages; sections are added in order, notifies and links
/// apply to the most recently added section
pub struct MontageBuilder {
    name: String,
    sections: Vec<PendingSection>,
}

impl MontageBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            sections: Vec::new(),
        }
    }

    /// Add a section
    pub fn section(mut self, name: &str, length: f32) -> Self {
        self.sections.push(PendingSection {
            name: name.to_string(),
            length,
            next: None,
            notifies: Vec::new(),
        });
        self
    }

    /// Place a notify on the last section
    pub fn notify(mut self, time: f32, notify: AnimNotify) -> Self {
        if let Some(section) = self.sections.last_mut() {
            section.notifies.push(NotifyTrack { time, notify });
        }
        self
    }

    /// Link the last section to another section by name
    pub fn next(mut self, next: &str) -> Self {
        if let Some(section) = self.sections.last_mut() {
            section.next = Some(next.to_string());
        }
        self
    }

    /// Make the last section loop onto itself
    pub fn looping(self) -> Self {
        let name = self.sections.last().map(|s| s.name.clone());
        match name {
            Some(name) => self.next(&name),
            None => self,
        }
    }

    /// Validate and build the montage
    pub fn build(self) -> Result<Montage, AnimationError> {
        if self.sections.is_empty() {
            return Err(AnimationError::EmptyMontage(self.name));
        }

        for (i, section) in self.sections.iter().enumerate() {
            if self.sections[..i].iter().any(|s| s.name == section.name) {
                return Err(AnimationError::DuplicateSection {
                    montage: self.name.clone(),
                    section: section.name.clone(),
                });
            }
            if !(section.length > 0.0) {
                return Err(AnimationError::InvalidLength {
                    section: section.name.clone(),
                    length: section.length,
                });
            }
            if let Some(track) = section
                .notifies
                .iter()
                .find(|n| n.time < 0.0 || n.time > section.length)
            {
                return Err(AnimationError::NotifyOutOfRange {
                    section: section.name.clone(),
                    time: track.time,
                });
            }
        }

        let mut sections = Vec::with_capacity(self.sections.len());
        for pending in &self.sections {
            let next = match &pending.next {
                Some(next) => Some(
                    self.sections
                        .iter()
                        .position(|s| &s.name == next)
                        .ok_or_else(|| AnimationError::UnknownNextSection {
                            section: pending.name.clone(),
                            next: next.clone(),
                        })?,
                ),
                None => None,
            };

            let mut notifies = pending.notifies.clone();
            notifies.sort_by(|a, b| a.time.total_cmp(&b.time));

            sections.push(MontageSection {
                name: SectionName::new(&pending.name),
                length: pending.length,
                next,
                notifies,
            });
        }

        Ok(Montage {
            name: MontageName::new(&self.name),
            sections,
        })
    }
}
