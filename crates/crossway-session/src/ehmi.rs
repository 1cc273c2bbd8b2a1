//! Client-side eHMI display control
//!
//! Exactly one display variant is active at a time. Activation is always
//! disable-all then enable-one, never incremental.

use tracing::{debug, warn};

use crossway_core::{Condition, EhmiDisplay, WhomIndicator};

use crate::{DisplayElement, DisplaySink};

/// Applies condition broadcasts and AV activation events to a DisplaySink
#[derive(Debug, Default)]
pub struct EhmiController {
    current: Option<Condition>,
}

impl EhmiController {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last condition this controller accepted
    pub fn current(&self) -> Option<Condition> {
        self.current
    }

    /// Turn off every eHMI element, including the backplate
    pub fn disable_all(&self, sink: &mut dyn DisplaySink) {
        sink.set_active(DisplayElement::Backplate, false);
        for &variant in EhmiDisplay::all() {
            sink.set_active(DisplayElement::Variant(variant), false);
        }
        for &indicator in WhomIndicator::all() {
            sink.set_active(DisplayElement::Indicator(indicator), false);
        }
    }

    /// Apply a condition broadcast: disable everything, then enable the
    /// variant the condition maps to. Unrecognized numbers leave every
    /// element off and log a warning.
    pub fn apply_condition(&mut self, condition_num: i32, sink: &mut dyn DisplaySink) {
        debug!(condition = condition_num, "condition received");
        self.disable_all(sink);

        match Condition::new(condition_num) {
            Some(condition) => {
                self.current = Some(condition);
                sink.set_active(DisplayElement::Variant(condition.display()), true);
                sink.set_active(DisplayElement::Backplate, true);
            }
            None => {
                warn!(condition = condition_num, "invalid condition number received");
            }
        }
    }

    /// Apply a one-shot AV activation: show the display variant plus the
    /// whom-group indicators the condition designates.
    pub fn apply_activation(
        &self,
        display: EhmiDisplay,
        indicators: &[WhomIndicator],
        sink: &mut dyn DisplaySink,
    ) {
        self.disable_all(sink);
        sink.set_active(DisplayElement::Variant(display), true);
        sink.set_active(DisplayElement::Backplate, true);
        for &indicator in indicators {
            sink.set_active(DisplayElement::Indicator(indicator), true);
        }
    }
}
