#![forbid(unsafe_code)]

//! Live section height resize.
//!
//! ```text
//! Idle -> Resizing(section, start_pointer_y, start_height) -> Idle
//! ```
//!
//! Every pointer move commits a new height computed from the session-start
//! snapshot:
//!
//! ```text
//! deltaRows = round((y - startY) / (cellHeight + gap))
//! height    = max(minRows, startHeight + deltaRows)
//! ```
//!
//! Pointer-up anywhere ends the session. There is no rollback: the last
//! committed height stands, including on cancel.

use gridpage_layout::{PageTree, SectionId};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::grid_state::GridGeometry;
use crate::session::{CancelReason, NoopReason, TransitionCounter};

/// Section resize lifecycle state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SectionResizeState {
    #[default]
    Idle,
    Resizing {
        section: SectionId,
        start_pointer_y: f64,
        start_height: u32,
    },
}

impl SectionResizeState {
    #[must_use]
    pub fn section(&self) -> Option<&SectionId> {
        match self {
            Self::Idle => None,
            Self::Resizing { section, .. } => Some(section),
        }
    }
}

/// Host input for a section resize. `pointer_y` is in any fixed vertical
/// frame; only differences are used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SectionResizeEvent {
    Start { section: SectionId, pointer_y: f64 },
    Move { pointer_y: f64 },
    End,
}

/// Effect of one section resize transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum SectionResizeEffect {
    Started {
        section: SectionId,
        start_height: u32,
    },
    Superseded {
        previous: SectionId,
        section: SectionId,
    },
    /// The owner writes `height` through `PageTree::set_section_height`.
    HeightCommitted {
        section: SectionId,
        height: u32,
    },
    Ended {
        section: SectionId,
    },
    Canceled {
        section: SectionId,
        reason: CancelReason,
    },
    Noop {
        reason: NoopReason,
    },
}

/// One section resize transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionResizeTransition {
    pub transition_id: u64,
    pub from: SectionResizeState,
    pub to: SectionResizeState,
    pub effect: SectionResizeEffect,
}

/// Section resize state machine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionResizeSession {
    state: SectionResizeState,
    transitions: TransitionCounter,
}

impl SectionResizeSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> &SectionResizeState {
        &self.state
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self.state, SectionResizeState::Idle)
    }

    pub fn apply_event(
        &mut self,
        event: &SectionResizeEvent,
        geometry: &GridGeometry,
        tree: &PageTree,
    ) -> SectionResizeTransition {
        match (self.state.clone(), event) {
            (from, SectionResizeEvent::Start { section, pointer_y }) => {
                if geometry.mapper.is_none() {
                    return self.noop(NoopReason::MetricsNotReady);
                }
                if !pointer_y.is_finite() {
                    return self.noop(NoopReason::NonFinitePosition);
                }
                let Some(current) = tree.section(section) else {
                    return self.noop(NoopReason::UnknownSection);
                };
                let start_height = current.height;
                let effect = match from.section() {
                    Some(previous) => SectionResizeEffect::Superseded {
                        previous: previous.clone(),
                        section: section.clone(),
                    },
                    None => SectionResizeEffect::Started {
                        section: section.clone(),
                        start_height,
                    },
                };
                self.transition(
                    SectionResizeState::Resizing {
                        section: section.clone(),
                        start_pointer_y: *pointer_y,
                        start_height,
                    },
                    effect,
                )
            }

            (SectionResizeState::Idle, _) => self.noop(NoopReason::IdleWithoutActiveSession),

            (
                SectionResizeState::Resizing {
                    section,
                    start_pointer_y,
                    start_height,
                },
                SectionResizeEvent::Move { pointer_y },
            ) => {
                if tree.section(&section).is_none() {
                    return self.cancel(section, CancelReason::TargetRemoved);
                }
                let Some(mapper) = geometry.mapper else {
                    return self.noop(NoopReason::MetricsNotReady);
                };
                if !pointer_y.is_finite() {
                    return self.noop(NoopReason::NonFinitePosition);
                }
                let delta_rows = mapper.rows_for_pixel_delta(pointer_y - start_pointer_y);
                let height = resized_height(start_height, delta_rows, geometry.min_section_rows);
                let to = self.state.clone();
                self.transition(to, SectionResizeEffect::HeightCommitted { section, height })
            }

            (SectionResizeState::Resizing { section, .. }, SectionResizeEvent::End) => {
                self.transition(SectionResizeState::Idle, SectionResizeEffect::Ended { section })
            }
        }
    }

    /// End an open resize. The last committed height stands.
    pub fn force_cancel(&mut self) -> Option<SectionResizeTransition> {
        let section = self.state.section()?.clone();
        Some(self.cancel(section, CancelReason::Programmatic))
    }

    fn cancel(&mut self, section: SectionId, reason: CancelReason) -> SectionResizeTransition {
        self.transition(
            SectionResizeState::Idle,
            SectionResizeEffect::Canceled { section, reason },
        )
    }

    fn noop(&mut self, reason: NoopReason) -> SectionResizeTransition {
        trace!(?reason, state = ?self.state, "section resize event ignored");
        let transition_id = self.transitions.next();
        SectionResizeTransition {
            transition_id,
            from: self.state.clone(),
            to: self.state.clone(),
            effect: SectionResizeEffect::Noop { reason },
        }
    }

    fn transition(
        &mut self,
        to: SectionResizeState,
        effect: SectionResizeEffect,
    ) -> SectionResizeTransition {
        let transition_id = self.transitions.next();
        let from = std::mem::replace(&mut self.state, to.clone());
        debug!(transition_id, effect = ?effect, "section resize transition");
        SectionResizeTransition {
            transition_id,
            from,
            to,
            effect,
        }
    }
}

/// `max(min_rows, start + delta)`, saturating at `u32::MAX`.
#[must_use]
pub fn resized_height(start_height: u32, delta_rows: i64, min_rows: u32) -> u32 {
    let rows = i64::from(start_height).saturating_add(delta_rows);
    let rows = u32::try_from(rows.max(0)).unwrap_or(u32::MAX);
    rows.max(min_rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use gridpage_core::{CellMetrics, CoordinateMapper, ViewContext};
    use gridpage_layout::{GridContext, LayoutRules};

    fn geometry() -> GridGeometry {
        GridGeometry {
            mapper: CoordinateMapper::new(CellMetrics::new(40.0, 25.0), 8.0),
            grid: GridContext::new(ViewContext::Desktop, 24),
            min_section_rows: 12,
        }
    }

    fn setup() -> (PageTree, SectionId, SectionResizeSession) {
        let tree = PageTree::new(Arc::new(LayoutRules::default()));
        let section = tree.sections()[0].id.clone();
        (tree, section, SectionResizeSession::new())
    }

    fn committed(t: &SectionResizeTransition) -> Option<u32> {
        match &t.effect {
            SectionResizeEffect::HeightCommitted { height, .. } => Some(*height),
            _ => None,
        }
    }

    #[test]
    fn drag_up_fifteen_rows_stops_at_the_floor() {
        let (tree, section, mut session) = setup();
        session.apply_event(
            &SectionResizeEvent::Start {
                section,
                pointer_y: 800.0,
            },
            &geometry(),
            &tree,
        );
        // 15 rows * 33px
        let t = session.apply_event(
            &SectionResizeEvent::Move {
                pointer_y: 800.0 - 495.0,
            },
            &geometry(),
            &tree,
        );
        assert_eq!(committed(&t), Some(12));
    }

    #[test]
    fn every_move_commits_from_the_start_snapshot() {
        let (tree, section, mut session) = setup();
        session.apply_event(
            &SectionResizeEvent::Start {
                section,
                pointer_y: 100.0,
            },
            &geometry(),
            &tree,
        );
        let heights: Vec<_> = [116.0, 150.0, 200.0, 166.0, 100.0]
            .into_iter()
            .map(|y| {
                let t = session.apply_event(
                    &SectionResizeEvent::Move { pointer_y: y },
                    &geometry(),
                    &tree,
                );
                committed(&t)
            })
            .collect();
        // 16/33 = 0.48 -> 0; 50/33 = 1.5 -> 2; 100/33 = 3.03 -> 3; 66/33 -> 2; 0
        assert_eq!(
            heights,
            vec![Some(24), Some(26), Some(27), Some(26), Some(24)]
        );
    }

    #[test]
    fn end_keeps_last_height_and_returns_to_idle() {
        let (tree, section, mut session) = setup();
        session.apply_event(
            &SectionResizeEvent::Start {
                section: section.clone(),
                pointer_y: 0.0,
            },
            &geometry(),
            &tree,
        );
        let t = session.apply_event(&SectionResizeEvent::End, &geometry(), &tree);
        assert_eq!(t.effect, SectionResizeEffect::Ended { section });
        assert!(!session.is_active());
        let t = session.apply_event(&SectionResizeEvent::Move { pointer_y: 50.0 }, &geometry(), &tree);
        assert_eq!(
            t.effect,
            SectionResizeEffect::Noop {
                reason: NoopReason::IdleWithoutActiveSession
            }
        );
    }

    #[test]
    fn unmeasured_grid_never_starts() {
        let (tree, section, mut session) = setup();
        let t = session.apply_event(
            &SectionResizeEvent::Start {
                section,
                pointer_y: 0.0,
            },
            &GridGeometry {
                mapper: None,
                ..geometry()
            },
            &tree,
        );
        assert_eq!(
            t.effect,
            SectionResizeEffect::Noop {
                reason: NoopReason::MetricsNotReady
            }
        );
        assert!(!session.is_active());
    }

    #[test]
    fn restart_on_another_section_supersedes() {
        let (tree, first, mut session) = setup();
        let tree = tree.add_section();
        let second = tree.sections()[1].id.clone();
        session.apply_event(
            &SectionResizeEvent::Start {
                section: first.clone(),
                pointer_y: 0.0,
            },
            &geometry(),
            &tree,
        );
        let t = session.apply_event(
            &SectionResizeEvent::Start {
                section: second.clone(),
                pointer_y: 0.0,
            },
            &geometry(),
            &tree,
        );
        assert_eq!(
            t.effect,
            SectionResizeEffect::Superseded {
                previous: first,
                section: second.clone()
            }
        );
        assert_eq!(session.state().section(), Some(&second));
    }

    #[test]
    fn deleted_section_cancels() {
        let (tree, first, mut session) = setup();
        let tree = tree.add_section();
        session.apply_event(
            &SectionResizeEvent::Start {
                section: first.clone(),
                pointer_y: 0.0,
            },
            &geometry(),
            &tree,
        );
        let tree = tree.delete_section(&first);
        let t = session.apply_event(&SectionResizeEvent::Move { pointer_y: 40.0 }, &geometry(), &tree);
        assert_eq!(
            t.effect,
            SectionResizeEffect::Canceled {
                section: first,
                reason: CancelReason::TargetRemoved
            }
        );
    }

    #[test]
    fn resized_height_saturates() {
        assert_eq!(resized_height(24, -15, 12), 12);
        assert_eq!(resized_height(24, i64::MIN, 12), 12);
        assert_eq!(resized_height(u32::MAX, i64::MAX, 12), u32::MAX);
        assert_eq!(resized_height(30, 5, 12), 35);
    }
}
