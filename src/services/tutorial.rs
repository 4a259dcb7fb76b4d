// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Guided onboarding tour.
//!
//! The tour is a fixed sequence of steps. Some wait for the user to click a
//! specific element; the others advance on "Next". The instruction card is
//! placed next to the highlighted element.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// How a step is completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum Advance {
    Next,
    Click,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorialStep {
    pub id: &'static str,
    /// CSS selector of the highlighted element
    pub target: Option<&'static str>,
    pub advance: Advance,
}

pub static STEPS: [TutorialStep; 10] = [
    TutorialStep {
        id: "welcome",
        target: None,
        advance: Advance::Next,
    },
    TutorialStep {
        id: "map_selector",
        target: Some("#map-selector-button"),
        advance: Advance::Click,
    },
    TutorialStep {
        id: "search",
        target: Some("#search-button"),
        advance: Advance::Click,
    },
    TutorialStep {
        id: "filter",
        target: Some("#filter-button"),
        advance: Advance::Click,
    },
    TutorialStep {
        id: "add_restaurant",
        target: Some("#add-restaurant-button"),
        advance: Advance::Click,
    },
    TutorialStep {
        id: "locate",
        target: Some("#locate-button"),
        advance: Advance::Next,
    },
    TutorialStep {
        id: "notifications",
        target: Some("#notification-bell"),
        advance: Advance::Click,
    },
    TutorialStep {
        id: "menu",
        target: Some("#menu-button"),
        advance: Advance::Click,
    },
    TutorialStep {
        id: "info",
        target: Some("#info-button"),
        advance: Advance::Next,
    },
    TutorialStep {
        id: "finish",
        target: None,
        advance: Advance::Next,
    },
];

/// Result of an input while the tour is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Moved to the step at this index.
    Advanced(usize),
    /// The last step was completed.
    Finished,
    /// Input does not complete the current step.
    Ignored,
}

/// One run through the tour. Dropping it closes the tour.
#[derive(Debug, Clone, Default)]
pub struct TutorialSession {
    index: usize,
    finished: bool,
}

impl TutorialSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&'static TutorialStep> {
        if self.finished {
            None
        } else {
            STEPS.get(self.index)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// "Next" pressed. Click steps ignore it.
    pub fn next(&mut self) -> StepOutcome {
        match self.current() {
            Some(step) if step.advance == Advance::Next => self.advance(),
            _ => StepOutcome::Ignored,
        }
    }

    /// The user clicked the element matching `selector`. The overlay then
    /// forwards the click to the real element.
    pub fn target_clicked(&mut self, selector: &str) -> StepOutcome {
        match self.current() {
            Some(step) if step.advance == Advance::Click && step.target == Some(selector) => {
                self.advance()
            }
            _ => StepOutcome::Ignored,
        }
    }

    /// Close button; ends the tour at any step.
    pub fn close(&mut self) {
        self.finished = true;
    }

    fn advance(&mut self) -> StepOutcome {
        if self.index + 1 >= STEPS.len() {
            self.finished = true;
            StepOutcome::Finished
        } else {
            self.index += 1;
            StepOutcome::Advanced(self.index)
        }
    }
}

// ─── Card placement ──────────────────────────────────────────

/// Gap between the highlighted element and the card.
const CARD_GAP: f64 = 16.0;
/// Minimum distance from the card to the viewport edge.
const VIEWPORT_MARGIN: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardSide {
    Above,
    Below,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardPlacement {
    pub left: f64,
    pub top: f64,
    pub side: CardSide,
}

/// Position the card for a target rectangle inside a `viewport_w` x
/// `viewport_h` viewport.
///
/// Targets in the lower half get the card above them, the rest below.
pub fn place_card(
    target: Option<Rect>,
    viewport_w: f64,
    viewport_h: f64,
    card_w: f64,
    card_h: f64,
) -> CardPlacement {
    let Some(target) = target else {
        return CardPlacement {
            left: ((viewport_w - card_w) / 2.0).max(0.0),
            top: ((viewport_h - card_h) / 2.0).max(0.0),
            side: CardSide::Center,
        };
    };

    let (side, top) = if target.center_y() > viewport_h / 2.0 {
        (CardSide::Above, target.y - CARD_GAP - card_h)
    } else {
        (CardSide::Below, target.bottom() + CARD_GAP)
    };

    let left = target.center_x() - card_w / 2.0;

    CardPlacement {
        left: clamp_axis(left, card_w, viewport_w),
        top: clamp_axis(top, card_h, viewport_h),
        side,
    }
}

fn clamp_axis(pos: f64, size: f64, extent: f64) -> f64 {
    let max = extent - size - VIEWPORT_MARGIN;
    if max < VIEWPORT_MARGIN {
        // Card larger than the viewport: pin to the margin.
        return VIEWPORT_MARGIN;
    }
    pos.clamp(VIEWPORT_MARGIN, max)
}
