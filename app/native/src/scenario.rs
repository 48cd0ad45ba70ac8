//! Timed event scenarios.
//!
//! A scenario is a JSONC file listing stream notifications at fixed offsets.
//! Replaying it drives a real [`OverlayController`] over the default surface
//! and records the overlay state after every step.
//!
//! ```jsonc
//! {
//!   "initialLayout": "OFF",
//!   "steps": [
//!     { "atMs": 0, "event": { "mapLayout": "TFC" } },
//!     { "atMs": 100, "event": { "screenState": { "current": "reversionary" } } },
//!     { "atMs": 1500, "event": { "companionPower": true } },
//!     { "atMs": 3000, "event": { "interaction": "AS1000_PFD_RANGE_INC" } },
//!     { "atMs": 3100, "event": "toggleTrafficMap" }
//!   ]
//! }
//! ```
//!
//! A bare array of steps is accepted as well.

use std::io::Read;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::OverlayConfig;
use crate::error::OverlayError;
use crate::overlay::{
    EventBus, IndexedRangeController, InsetNode, InsetSurface, LayoutSetting, OverlayController,
    OverlaySnapshot, ScreenStateEvent,
};

/// Time given to the forwarder and actor to drain after each step.
const STEP_DRAIN: Duration = Duration::from_millis(1);

/// Extra time after the settle delay before the final read-out.
const TAIL_MARGIN_MS: u64 = 100;

/// A single input applied during a replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScenarioEvent {
    /// Set the map layout setting.
    MapLayout(LayoutSetting),
    /// Publish a screen state change.
    ScreenState(ScreenStateEvent),
    /// Publish a companion power notification.
    CompanionPower(bool),
    /// Publish an interaction event code.
    Interaction(String),
    /// Toggle between the traffic map and no map.
    ToggleTrafficMap,
    /// Select the traffic map layout.
    SelectTrafficMap,
    /// Force visibility through the host call.
    SetVisible(bool),
}

impl std::fmt::Display for ScenarioEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MapLayout(setting) => write!(f, "mapLayout {setting:?}"),
            Self::ScreenState(event) => write!(f, "screenState {:?}", event.current),
            Self::CompanionPower(powered) => write!(f, "companionPower {powered}"),
            Self::Interaction(code) => write!(f, "interaction {code}"),
            Self::ToggleTrafficMap => write!(f, "toggleTrafficMap"),
            Self::SelectTrafficMap => write!(f, "selectTrafficMap"),
            Self::SetVisible(visible) => write!(f, "setVisible {visible}"),
        }
    }
}

/// An event at an offset from the start of the replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Offset in milliseconds.
    #[serde(default)]
    pub at_ms: u64,
    /// Event to apply.
    pub event: ScenarioEvent,
}

/// A parsed scenario.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    /// Layout setting before the first step.
    #[serde(default)]
    pub initial_layout: LayoutSetting,
    /// Steps in time order.
    pub steps: Vec<Step>,
    /// Wait after the last step before the final read-out. Defaults to the
    /// settle delay plus a small margin.
    #[serde(default)]
    pub tail_ms: Option<u64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScenarioFile {
    Steps(Vec<Step>),
    Full(Scenario),
}

impl Scenario {
    /// Parses a scenario from JSONC text.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::ScenarioError`] if the text is not a valid
    /// scenario or the steps are not in time order.
    pub fn parse(text: &str) -> Result<Self, OverlayError> {
        let mut stripped = String::new();
        json_comments::StripComments::new(text.as_bytes())
            .read_to_string(&mut stripped)
            .map_err(|e| OverlayError::ScenarioError(e.to_string()))?;

        let scenario = match serde_json::from_str(&stripped)
            .map_err(|e| OverlayError::ScenarioError(e.to_string()))?
        {
            ScenarioFile::Steps(steps) => Self { steps, ..Self::default() },
            ScenarioFile::Full(scenario) => scenario,
        };

        scenario.validate()?;
        Ok(scenario)
    }

    /// Reads and parses a scenario file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, OverlayError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            OverlayError::ScenarioError(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::parse(&text)
    }

    fn validate(&self) -> Result<(), OverlayError> {
        if let Some(pair) = self.steps.windows(2).find(|pair| pair[1].at_ms < pair[0].at_ms) {
            return Err(OverlayError::ScenarioError(format!(
                "steps out of order: {}ms after {}ms",
                pair[1].at_ms, pair[0].at_ms
            )));
        }
        Ok(())
    }

    fn tail(&self, config: &OverlayConfig) -> Duration {
        Duration::from_millis(
            self.tail_ms.unwrap_or_else(|| config.settle_delay_ms + TAIL_MARGIN_MS),
        )
    }
}

/// State after one replayed step.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    /// Offset the step was applied at.
    pub at_ms: u64,
    /// The applied event.
    pub event: ScenarioEvent,
    /// Overlay state after the step.
    pub snapshot: OverlaySnapshot,
    /// Render node after the step.
    pub node: InsetNode,
    /// Map range index after the step.
    pub range_index: u32,
}

/// Outcome of a replay.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    /// One record per step.
    pub steps: Vec<StepRecord>,
    /// State after the tail wait.
    pub final_snapshot: OverlaySnapshot,
    /// Render node after the tail wait.
    pub final_node: InsetNode,
    /// Map range index after the tail wait.
    pub range_index: u32,
}

/// Replays a scenario against a fresh overlay.
///
/// Must run inside a tokio runtime with the time driver enabled.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the overlay stops
/// unexpectedly.
pub async fn replay(
    scenario: &Scenario,
    config: &OverlayConfig,
) -> Result<ReplayReport, OverlayError> {
    let bus = EventBus::with_layout(scenario.initial_layout);
    let range = IndexedRangeController::new(&config.map);
    let range_reader = range.clone();

    let mut controller = OverlayController::new(
        config.clone(),
        Box::new(InsetSurface::new(config)),
        Box::new(range),
        bus.streams(),
    )?;
    controller.activate()?;
    tracing::debug!(steps = scenario.steps.len(), "overlay: replaying scenario");

    let start = tokio::time::Instant::now();
    let mut records = Vec::with_capacity(scenario.steps.len());

    for step in &scenario.steps {
        tokio::time::sleep_until(start + Duration::from_millis(step.at_ms)).await;
        apply(&bus, &controller, &step.event)?;
        tokio::time::sleep(STEP_DRAIN).await;

        records.push(StepRecord {
            at_ms: step.at_ms,
            event: step.event.clone(),
            snapshot: controller.sync().await?,
            node: controller.render(),
            range_index: range_reader.index(),
        });
    }

    tokio::time::sleep(scenario.tail(config)).await;
    let final_snapshot = controller.sync().await?;
    let final_node = controller.render();
    controller.shutdown();

    Ok(ReplayReport {
        steps: records,
        final_snapshot,
        final_node,
        range_index: range_reader.index(),
    })
}

fn apply(
    bus: &EventBus,
    controller: &OverlayController,
    event: &ScenarioEvent,
) -> Result<(), OverlayError> {
    match event {
        ScenarioEvent::MapLayout(setting) => bus.set_map_layout(*setting),
        ScenarioEvent::ScreenState(event) => {
            bus.publish_screen_state(*event);
        }
        ScenarioEvent::CompanionPower(powered) => {
            bus.publish_companion_power(*powered);
        }
        ScenarioEvent::Interaction(code) => {
            bus.publish_interaction(code.clone());
        }
        ScenarioEvent::ToggleTrafficMap => {
            bus.toggle_traffic_map();
        }
        ScenarioEvent::SelectTrafficMap => bus.select_traffic_map(),
        ScenarioEvent::SetVisible(visible) => controller.set_visible(*visible)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InsetSize;
    use crate::overlay::ScreenMode;

    const SAMPLE: &str = r#"{
        // Reversionary failure with the MFD coming back later
        "initialLayout": "TFC",
        "steps": [
            { "atMs": 0, "event": { "screenState": { "current": "reversionary" } } },
            { "atMs": 1500, "event": { "companionPower": true } },
            { "atMs": 3000, "event": { "interaction": "AS1000_PFD_RANGE_INC" } },
            { "atMs": 3100, "event": "toggleTrafficMap" },
            { "atMs": 3200, "event": { "interaction": "AS1000_PFD_RANGE_INC" } }
        ]
    }"#;

    #[test]
    fn test_parse_full_scenario() {
        let scenario = Scenario::parse(SAMPLE).unwrap();
        assert_eq!(scenario.initial_layout, LayoutSetting::Tfc);
        assert_eq!(scenario.steps.len(), 5);
        assert_eq!(
            scenario.steps[0].event,
            ScenarioEvent::ScreenState(ScreenStateEvent::to(ScreenMode::Reversionary))
        );
        assert_eq!(scenario.steps[3].event, ScenarioEvent::ToggleTrafficMap);
    }

    #[test]
    fn test_parse_bare_step_list() {
        let scenario = Scenario::parse(
            r#"[
                { "atMs": 0, "event": { "mapLayout": "TFC" } },
                { "atMs": 10, "event": { "setVisible": false } }
            ]"#,
        )
        .unwrap();
        assert_eq!(scenario.initial_layout, LayoutSetting::Off);
        assert_eq!(scenario.steps[1].event, ScenarioEvent::SetVisible(false));
    }

    #[test]
    fn test_parse_rejects_out_of_order_steps() {
        let result = Scenario::parse(
            r#"[
                { "atMs": 10, "event": "toggleTrafficMap" },
                { "atMs": 5, "event": "toggleTrafficMap" }
            ]"#,
        );
        assert!(matches!(result, Err(OverlayError::ScenarioError(_))));
    }

    #[test]
    fn test_parse_unrecognised_screen_mode() {
        let scenario = Scenario::parse(
            r#"[{ "atMs": 0, "event": { "screenState": { "previous": "normal", "current": "selfTest" } } }]"#,
        )
        .unwrap();
        assert_eq!(
            scenario.steps[0].event,
            ScenarioEvent::ScreenState(ScreenStateEvent {
                previous: Some(ScreenMode::Normal),
                current: ScreenMode::Unknown,
            })
        );
    }

    #[test]
    fn test_parse_rejects_unknown_event() {
        let result = Scenario::parse(r#"[{ "atMs": 0, "event": "selfDestruct" }]"#);
        assert!(matches!(result, Err(OverlayError::ScenarioError(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Scenario::load(Path::new("/nonexistent/scenario.jsonc"));
        assert!(matches!(result, Err(OverlayError::ScenarioError(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_replay_sample() {
        let scenario = Scenario::parse(SAMPLE).unwrap();
        let config = OverlayConfig::default();
        let report = replay(&scenario, &config).await.unwrap();

        // Expansion still pending right after the screen state change
        let first = &report.steps[0];
        assert!(first.snapshot.visible);
        assert_eq!(first.node.size(), InsetSize::new(242, 230));
        assert!(first.snapshot.waiting_for_power);

        // Expanded by the time power arrives, revert pending
        let second = &report.steps[1];
        assert_eq!(second.node.size(), InsetSize::new(312, 230));
        assert!(second.node.has_class("reversionary"));
        assert!(!second.snapshot.waiting_for_power);

        // Range step forwarded while visible, dropped after the toggle
        assert_eq!(report.steps[2].range_index, config.map.initial_range_index + 1);
        assert!(!report.steps[3].snapshot.visible);
        assert_eq!(report.range_index, config.map.initial_range_index + 1);

        assert_eq!(report.final_node.size(), InsetSize::new(242, 230));
        assert!(!report.final_node.has_class("reversionary"));
    }
}
