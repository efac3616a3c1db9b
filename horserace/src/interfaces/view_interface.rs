use crate::core::horse::Horse;
use crate::core::round::Round;
use crate::core::state_handler::State;
use crate::error::StoreError;
use crate::post::race_result::RoundResult;
use serde::Serialize;

/// (Hz) Maximum number of round states sent to a viewer per simulated second.
pub const MAX_VIEW_UPDATE_FREQUENCY: f64 = 20.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub fn parse(color: &str) -> Result<RgbColor, StoreError> {
        let tmp_color = color
            .parse::<css_color_parser::Color>()
            .map_err(|_| StoreError::Configuration(format!("Could not parse color {:?}", color)))?;

        Ok(RgbColor {
            r: tmp_color.r,
            g: tmp_color.g,
            b: tmp_color.b,
        })
    }
}

/// HorseRunnerState describes one lane of the track.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HorseRunnerState {
    pub horse_id: u32,
    pub name: String,
    pub color: RgbColor,
    pub progress: f64, // covered fraction of the distance in [0, 1]
    pub finished: bool,
}

/// RoundState is what a track view needs to draw the running round.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoundState {
    pub round_id: u32,
    pub distance: u32,
    pub race_time: f64,
    pub runners: Vec<HorseRunnerState>,

    // sent once when the round is over
    pub final_result: Option<RoundResult>,
}

/// StoreSnapshot bundles all read projections of the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreSnapshot {
    pub horses: Vec<Horse>,
    pub schedule: Vec<Round>,
    pub results: Vec<RoundResult>,
    pub current_round: Option<Round>,
    pub current_round_idx: usize,
    pub is_race_running: bool,
    pub is_race_finished: bool,
    pub state: State,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        let color = RgbColor::parse("#123abc").unwrap();
        assert_eq!(color, RgbColor { r: 18, g: 58, b: 188 });
    }

    #[test]
    fn test_parse_named_color() {
        let color = RgbColor::parse("red").unwrap();
        assert_eq!(color, RgbColor { r: 255, g: 0, b: 0 });
    }

    #[test]
    fn test_parse_invalid_color() {
        assert!(matches!(
            RgbColor::parse("no-such-color"),
            Err(StoreError::Configuration(_))
        ));
    }
}
