//! Range command router.
//!
//! Filters raw interaction events down to range knob steps and forwards them
//! to the map's range controller, but only while the map is awake. Commands
//! arriving while asleep are dropped, never queued.

use super::surface::{RangeController, RenderSurface};
use super::types::RangeDelta;
use crate::config::RangeEventConfig;

/// Stateless filter from interaction codes to range commands.
#[derive(Debug, Clone)]
pub struct RangeCommandRouter {
    increment: String,
    decrement: String,
}

impl RangeCommandRouter {
    /// Creates a router recognizing the configured codes.
    #[must_use]
    pub fn new(codes: &RangeEventConfig) -> Self {
        Self {
            increment: codes.increment.clone(),
            decrement: codes.decrement.clone(),
        }
    }

    /// Maps an interaction code to a range step.
    #[must_use]
    pub fn decode(&self, code: &str) -> Option<RangeDelta> {
        if code == self.increment {
            Some(RangeDelta::Increment)
        } else if code == self.decrement {
            Some(RangeDelta::Decrement)
        } else {
            None
        }
    }

    /// Routes an interaction event.
    ///
    /// Returns the forwarded step, or `None` if the map is asleep or the code
    /// is not a range code.
    pub fn route(
        &self,
        code: &str,
        surface: &dyn RenderSurface,
        controller: &mut dyn RangeController,
    ) -> Option<RangeDelta> {
        if !surface.is_awake() {
            return None;
        }

        let delta = self.decode(code)?;
        tracing::debug!(code, delta = delta.value(), "overlay: forwarding range command");
        controller.change_range_index(delta);
        Some(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OverlayConfig;
    use crate::overlay::surface::InsetSurface;

    #[derive(Default)]
    struct RecordingController {
        calls: Vec<RangeDelta>,
    }

    impl RangeController for RecordingController {
        fn change_range_index(&mut self, delta: RangeDelta) { self.calls.push(delta); }
    }

    fn make_router() -> RangeCommandRouter { RangeCommandRouter::new(&RangeEventConfig::default()) }

    #[test]
    fn test_decode_known_codes() {
        let router = make_router();
        assert_eq!(router.decode("AS1000_PFD_RANGE_INC"), Some(RangeDelta::Increment));
        assert_eq!(router.decode("AS1000_PFD_RANGE_DEC"), Some(RangeDelta::Decrement));
        assert_eq!(router.decode("AS1000_PFD_SOFTKEYS_1"), None);
        assert_eq!(router.decode(""), None);
    }

    #[test]
    fn test_route_drops_commands_while_asleep() {
        let router = make_router();
        let mut surface = InsetSurface::new(&OverlayConfig::default());
        surface.sleep();
        let mut controller = RecordingController::default();

        assert_eq!(router.route("AS1000_PFD_RANGE_INC", &surface, &mut controller), None);
        assert!(controller.calls.is_empty());
    }

    #[test]
    fn test_route_forwards_while_awake() {
        let router = make_router();
        let surface = InsetSurface::new(&OverlayConfig::default());
        let mut controller = RecordingController::default();

        router.route("AS1000_PFD_RANGE_INC", &surface, &mut controller);
        router.route("AS1000_PFD_RANGE_DEC", &surface, &mut controller);
        router.route("AS1000_PFD_NAV_SWAP", &surface, &mut controller);

        assert_eq!(controller.calls, vec![RangeDelta::Increment, RangeDelta::Decrement]);
    }

    #[test]
    fn test_never_forwards_when_asleep_for_any_interleaving() {
        // Every sequence of 6 steps over {wake, sleep, inc, dec}
        let router = make_router();
        let steps = ["wake", "sleep", "AS1000_PFD_RANGE_INC", "AS1000_PFD_RANGE_DEC"];

        for mut seed in 0..4usize.pow(6) {
            let mut surface = InsetSurface::new(&OverlayConfig::default());
            surface.sleep();
            let mut controller = RecordingController::default();
            let mut expected = Vec::new();

            for _ in 0..6 {
                let step = steps[seed % 4];
                seed /= 4;
                match step {
                    "wake" => surface.wake(),
                    "sleep" => surface.sleep(),
                    code => {
                        let awake = surface.is_awake();
                        let routed = router.route(code, &surface, &mut controller);
                        assert_eq!(routed.is_some(), awake);
                        if let Some(delta) = routed {
                            expected.push(delta);
                        }
                    }
                }
            }

            assert_eq!(controller.calls, expected);
        }
    }

    #[test]
    fn test_custom_codes() {
        let router = RangeCommandRouter::new(&RangeEventConfig {
            increment: "KNOB_CW".to_string(),
            decrement: "KNOB_CCW".to_string(),
        });
        assert_eq!(router.decode("KNOB_CW"), Some(RangeDelta::Increment));
        assert_eq!(router.decode("AS1000_PFD_RANGE_INC"), None);
    }
}
