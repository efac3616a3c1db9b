use crate::core::horse::Horse;
use crate::core::round::Round;
use crate::error::StoreError;
use crate::interfaces::view_interface::{HorseRunnerState, RgbColor, RoundState};
use crate::post::race_result::RoundResult;
use helpers::general::{argsort, SortOrder};
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// (m/s) Speed of a horse in condition 0.
pub const BASE_SPEED: f64 = 15.0;

/// (m/s) Speed gained per condition point.
pub const CONDITION_SPEED_GAIN: f64 = 0.05;

/// (m/s) Standard deviation of the per-timestep speed perturbation.
pub const SPEED_STD_DEV: f64 = 1.5;

/// (m/s) Lower speed bound, keeps every horse moving.
pub const MIN_SPEED: f64 = 1.0;

/// RoundRace simulates a single round time-discretely. Every horse runs at a base speed derived
/// from its condition, perturbed by Gaussian noise in every timestep.
#[derive(Debug)]
pub struct RoundRace {
    pub timestep_size: f64,
    pub cur_racetime: f64,
    pub round_id: u32,
    pub distance: f64,
    horses: Vec<Horse>,
    colors: Vec<RgbColor>,
    base_speeds: Vec<f64>,
    s_tracks: Vec<f64>,
    finish_times: Vec<f64>,
    race_finished: Vec<bool>,
    speed_noise: Normal<f64>,
}

impl RoundRace {
    pub fn new(round: &Round, timestep_size: f64) -> Result<RoundRace, StoreError> {
        if !(timestep_size > 0.0 && timestep_size.is_finite()) {
            return Err(StoreError::Configuration(format!(
                "Timestep size must be positive, but is {}",
                timestep_size
            )));
        }

        let speed_noise = Normal::new(0.0, SPEED_STD_DEV)
            .map_err(|e| StoreError::Configuration(format!("Invalid speed noise: {}", e)))?;

        let no_horses = round.horses.len();

        Ok(RoundRace {
            timestep_size,
            cur_racetime: 0.0,
            round_id: round.id,
            distance: round.distance as f64,
            horses: round.horses.to_owned(),
            colors: round
                .horses
                .iter()
                .map(|h| RgbColor::parse(&h.color).unwrap_or_default())
                .collect(),
            base_speeds: round
                .horses
                .iter()
                .map(|h| calc_base_speed(h.condition))
                .collect(),
            s_tracks: vec![0.0; no_horses],
            finish_times: vec![f64::INFINITY; no_horses],
            race_finished: vec![false; no_horses],
            speed_noise,
        })
    }

    /// simulate_timestep advances every running horse by one timestep. A horse crossing the line
    /// gets its finish time interpolated within the step.
    pub fn simulate_timestep<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let t_step_start = self.cur_racetime;
        self.cur_racetime += self.timestep_size;

        for i in 0..self.horses.len() {
            if self.race_finished[i] {
                continue;
            }

            let speed = (self.base_speeds[i] + self.speed_noise.sample(rng)).max(MIN_SPEED);
            let s_track_next = self.s_tracks[i] + speed * self.timestep_size;

            if s_track_next >= self.distance {
                self.finish_times[i] = t_step_start + (self.distance - self.s_tracks[i]) / speed;
                self.s_tracks[i] = self.distance;
                self.race_finished[i] = true;
            } else {
                self.s_tracks[i] = s_track_next;
            }
        }
    }

    pub fn get_all_finished(&self) -> bool {
        self.race_finished.iter().all(|&x| x)
    }

    /// get_round_result returns the horses ordered by finish time. Horses still running are
    /// ranked behind the finished ones by covered distance, equal values keep lane order.
    pub fn get_round_result(&self) -> RoundResult {
        let order: Vec<usize> = if self.get_all_finished() {
            argsort(&self.finish_times, SortOrder::Ascending)
        } else {
            let keys: Vec<(f64, f64)> = self
                .finish_times
                .iter()
                .zip(self.s_tracks.iter())
                .map(|(&t, &s)| (t, -s))
                .collect();
            argsort(&keys, SortOrder::Ascending)
        };

        RoundResult {
            round_id: self.round_id,
            distance: self.distance as u32,
            positions: order.iter().map(|&i| self.horses[i].to_owned()).collect(),
            finish_times: order
                .iter()
                .map(|&i| self.finish_times[i])
                .filter(|t| t.is_finite())
                .collect(),
        }
    }

    /// get_round_state returns the current progress of all lanes for a track view.
    pub fn get_round_state(&self) -> RoundState {
        RoundState {
            round_id: self.round_id,
            distance: self.distance as u32,
            race_time: self.cur_racetime,
            runners: self
                .horses
                .iter()
                .enumerate()
                .map(|(i, horse)| HorseRunnerState {
                    horse_id: horse.id,
                    name: horse.name.to_owned(),
                    color: self.colors[i],
                    progress: (self.s_tracks[i] / self.distance).min(1.0),
                    finished: self.race_finished[i],
                })
                .collect(),
            final_result: None,
        }
    }

    pub fn get_leader(&self) -> Option<&Horse> {
        argsort(&self.s_tracks, SortOrder::Descending)
            .first()
            .map(|&i| &self.horses[i])
    }
}

/// calc_base_speed maps a condition in [1, 100] to a speed in m/s.
pub fn calc_base_speed(condition: u32) -> f64 {
    BASE_SPEED + condition as f64 * CONDITION_SPEED_GAIN
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn horse(id: u32, condition: u32) -> Horse {
        Horse {
            id,
            name: format!("Horse {}", id),
            color: "#123abc".to_owned(),
            condition,
        }
    }

    fn round(horses: Vec<Horse>, distance: u32) -> Round {
        Round {
            id: 2,
            distance,
            horses,
        }
    }

    fn run(race: &mut RoundRace, rng: &mut StdRng) {
        while !race.get_all_finished() {
            race.simulate_timestep(rng);
        }
    }

    #[test]
    fn test_base_speed() {
        assert_relative_eq!(calc_base_speed(1), 15.05);
        assert_relative_eq!(calc_base_speed(100), 20.0);
    }

    #[test]
    fn test_invalid_timestep() {
        let r = round(vec![horse(1, 50)], 1200);
        assert!(RoundRace::new(&r, 0.0).is_err());
        assert!(RoundRace::new(&r, -0.1).is_err());
        assert!(RoundRace::new(&r, f64::NAN).is_err());
    }

    #[test]
    fn test_every_horse_finishes_once() {
        let horses: Vec<Horse> = (1..=10).map(|id| horse(id, id * 10)).collect();
        let r = round(horses.clone(), 1200);
        let mut race = RoundRace::new(&r, 0.1).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        run(&mut race, &mut rng);
        let result = race.get_round_result();

        assert_eq!(result.round_id, 2);
        assert_eq!(result.distance, 1200);
        assert_eq!(result.positions.len(), 10);
        assert_eq!(result.finish_times.len(), 10);
        assert!(horses.iter().all(|h| result.positions.contains(h)));
        assert!(result.finish_times.windows(2).all(|w| w[0] <= w[1]));

        // 1200m at roughly 15-20m/s
        assert!(result.finish_times[0] > 1200.0 / 25.0);
        assert!(result.finish_times[9] < 1200.0 / 10.0);
    }

    #[test]
    fn test_finish_time_is_interpolated() {
        let r = round(vec![horse(1, 100)], 1000);
        let mut race = RoundRace::new(&r, 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        run(&mut race, &mut rng);
        let result = race.get_round_result();

        assert!(result.finish_times[0] <= race.cur_racetime);
        assert!(result.finish_times[0] > race.cur_racetime - race.timestep_size);
    }

    #[test]
    fn test_condition_matters() {
        let r = round(vec![horse(1, 1), horse(2, 100)], 2000);
        let mut rng = StdRng::seed_from_u64(99);

        let mut wins_strong = 0;
        for _ in 0..20 {
            let mut race = RoundRace::new(&r, 0.1).unwrap();
            run(&mut race, &mut rng);
            if race.get_round_result().positions[0].id == 2 {
                wins_strong += 1;
            }
        }
        assert!(wins_strong >= 18);
    }

    #[test]
    fn test_empty_lineup_is_finished() {
        let r = round(Vec::new(), 1200);
        let race = RoundRace::new(&r, 0.1).unwrap();

        assert!(race.get_all_finished());
        let result = race.get_round_result();
        assert!(result.positions.is_empty());
        assert!(race.get_leader().is_none());
    }

    #[test]
    fn test_round_state_and_partial_result() {
        let r = round(vec![horse(1, 10), horse(2, 90)], 1200);
        let mut race = RoundRace::new(&r, 0.1).unwrap();
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..100 {
            race.simulate_timestep(&mut rng);
        }
        assert_relative_eq!(race.cur_racetime, 10.0, epsilon = 1e-9);

        let state = race.get_round_state();
        assert_eq!(state.runners.len(), 2);
        assert_eq!(state.runners[0].color, RgbColor { r: 18, g: 58, b: 188 });
        assert!(state.runners.iter().all(|h| h.progress > 0.0 && h.progress < 1.0));
        assert!(state.runners.iter().all(|h| !h.finished));
        assert!(state.final_result.is_none());

        let leader_id = race.get_leader().unwrap().id;
        let result = race.get_round_result();
        assert_eq!(result.positions[0].id, leader_id);
        assert!(result.finish_times.is_empty());
    }
}
