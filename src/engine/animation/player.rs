// Montage playback

use std::collections::{HashMap, VecDeque};

use super::montage::{AnimNotify, Montage};
use super::{AnimationDriver, MontageName, SectionName};

/// Events `advance` may return in a row without spending any budget
const MAX_EVENTS_WITHOUT_PROGRESS: u32 = 64;

/// Something the owner has to react to while time advances
#[derive(Debug, Clone, PartialEq)]
pub enum MontageEvent {
    /// A notify on the active section was reached
    Notify {
        montage: MontageName,
        notify: AnimNotify,
    },
    /// A subscribed play finished or was interrupted
    Ended {
        montage: MontageName,
        interrupted: bool,
    },
}

/// Playback state of the active montage
#[derive(Debug, Clone)]
struct ActiveMontage {
    montage: MontageName,
    section: usize,
    /// Seconds into the current section
    position: f32,
    /// Index of the next notify to fire in the current section
    next_notify: usize,
    rate: f32,
    end_delegate: bool,
}

/// Plays one montage at a time for a character
#[derive(Debug, Default)]
pub struct MontagePlayer {
    /// All available montages
    montages: HashMap<MontageName, Montage>,
    /// Currently playing montage
    active: Option<ActiveMontage>,
    /// Events raised outside of `advance` (interruptions)
    pending: VecDeque<MontageEvent>,
    /// Consecutive events returned without the budget shrinking
    events_without_progress: u32,
}

impl MontagePlayer {
    pub fn new() -> Self {
        Self {
            montages: HashMap::new(),
            active: None,
            pending: VecDeque::new(),
            events_without_progress: 0,
        }
    }

    /// Register a montage
    pub fn add_montage(&mut self, montage: Montage) {
        self.montages.insert(montage.name().clone(), montage);
    }

    /// Look up a registered montage
    pub fn montage(&self, name: &MontageName) -> Option<&Montage> {
        self.montages.get(name)
    }

    /// Name of the playing montage
    pub fn current_montage(&self) -> Option<&MontageName> {
        self.active.as_ref().map(|a| &a.montage)
    }

    /// Name of the playing section
    pub fn current_section(&self) -> Option<&SectionName> {
        let active = self.active.as_ref()?;
        self.montages
            .get(&active.montage)?
            .section(active.section)
            .map(|s| &s.name)
    }

    /// Seconds into the playing section
    pub fn section_position(&self) -> Option<f32> {
        self.active.as_ref().map(|a| a.position)
    }

    /// Check if any montage is playing
    pub fn is_playing(&self) -> bool {
        self.active.is_some()
    }

    /// Stop the playing montage, reporting it as interrupted
    pub fn stop(&mut self) {
        self.interrupt_active();
    }

    fn interrupt_active(&mut self) {
        if let Some(active) = self.active.take() {
            log::debug!("Montage '{}' interrupted", active.montage);
            if active.end_delegate {
                self.pending.push_back(MontageEvent::Ended {
                    montage: active.montage,
                    interrupted: true,
                });
            }
        }
    }

    /// Advance playback by up to `budget` seconds.
    ///
    /// Returns at the first notify or subscribed montage end, leaving the
    /// unspent time in `budget`. Call repeatedly until it returns `None`;
    /// the owner may play or jump sections between calls.
    ///
    /// Playback that cannot spend the budget (a rate so high that section
    /// time rounds to nothing) drops the rest of the budget instead of
    /// returning events forever.
    pub fn advance(&mut self, budget: &mut f32) -> Option<MontageEvent> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }

        let before = *budget;
        let Some(event) = self.advance_active(budget) else {
            self.events_without_progress = 0;
            return None;
        };

        if *budget < before {
            self.events_without_progress = 0;
        } else {
            self.events_without_progress += 1;
            if self.events_without_progress > MAX_EVENTS_WITHOUT_PROGRESS {
                log::warn!("Montage playback is not consuming time, dropping {:.4}s", *budget);
                self.events_without_progress = 0;
                *budget = 0.0;
                return None;
            }
        }
        Some(event)
    }

    fn advance_active(&mut self, budget: &mut f32) -> Option<MontageEvent> {
        // Budget left when the last section boundary was crossed
        let mut budget_at_boundary = None;

        loop {
            let active = self.active.as_mut()?;
            let Some(montage) = self.montages.get(&active.montage) else {
                self.active = None;
                return None;
            };
            let Some(section) = montage.section(active.section) else {
                self.active = None;
                return None;
            };

            let target = (active.position + budget.max(0.0) * active.rate).min(section.length);

            if let Some(track) = section.notifies.get(active.next_notify) {
                if track.time <= target {
                    let spent = (track.time - active.position).max(0.0) / active.rate;
                    *budget = (*budget - spent).max(0.0);
                    active.position = track.time.max(active.position);
                    active.next_notify += 1;
                    return Some(MontageEvent::Notify {
                        montage: active.montage.clone(),
                        notify: track.notify.clone(),
                    });
                }
            }

            if target < section.length {
                active.position = target;
                *budget = 0.0;
                return None;
            }

            // Reached the end of the section
            let spent = (section.length - active.position) / active.rate;
            *budget = (*budget - spent).max(0.0);

            match section.next {
                Some(next) => {
                    // A whole section pass spent nothing
                    if budget_at_boundary == Some(*budget) {
                        log::warn!("Montage '{}' is not consuming time", active.montage);
                        *budget = 0.0;
                        return None;
                    }
                    budget_at_boundary = Some(*budget);

                    active.section = next;
                    active.position = 0.0;
                    active.next_notify = 0;
                }
                None => {
                    let finished = self.active.take()?;
                    log::debug!("Montage '{}' completed", finished.montage);
                    if finished.end_delegate {
                        return Some(MontageEvent::Ended {
                            montage: finished.montage,
                            interrupted: false,
                        });
                    }
                    return None;
                }
            }
        }
    }
}

impl AnimationDriver for MontagePlayer {
    fn montage_play(
        &mut self,
        montage: &MontageName,
        rate: f32,
        start_section: Option<&SectionName>,
    ) -> f32 {
        if !(rate > 0.0 && rate.is_finite()) {
            log::warn!("Refusing to play '{}' at rate {}", montage, rate);
            return 0.0;
        }

        let Some(asset) = self.montages.get(montage) else {
            log::warn!("Montage '{}' is not registered", montage);
            return 0.0;
        };

        let section = start_section
            .and_then(|name| asset.section_index(name))
            .unwrap_or(0);
        let length = asset.total_length();

        self.interrupt_active();
        self.active = Some(ActiveMontage {
            montage: montage.clone(),
            section,
            position: 0.0,
            next_notify: 0,
            rate,
            end_delegate: false,
        });

        log::debug!("Playing montage '{}' ({:.2}s)", montage, length);
        length
    }

    fn montage_jump_to_section(&mut self, section: &SectionName, montage: &MontageName) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if &active.montage != montage {
            return;
        }
        let Some(index) = self
            .montages
            .get(montage)
            .and_then(|m| m.section_index(section))
        else {
            log::warn!("Montage '{}' has no section '{}'", montage, section);
            return;
        };

        active.section = index;
        active.position = 0.0;
        active.next_notify = 0;
    }

    fn montage_set_end_delegate(&mut self, montage: &MontageName) {
        if let Some(active) = self.active.as_mut() {
            if &active.montage == montage {
                active.end_delegate = true;
            }
        }
    }
}
