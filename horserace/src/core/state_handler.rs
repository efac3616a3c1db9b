use crate::error::StoreError;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum State {
    Idle,     // no schedule
    Ready,    // schedule exists, next round waits for its start
    Running,  // current round is being raced
    Finished, // all rounds raced, terminal until the next schedule
}

/// StateHandler tracks the progress of a program through its rounds. It only knows the number of
/// scheduled rounds, the rounds themselves live in the store.
#[derive(Debug, Clone, Default)]
pub struct StateHandler {
    cur_round_idx: usize,
    race_running: bool,
    race_finished: bool,
}

impl StateHandler {
    /// get_state derives the state machine state for a schedule with `schedule_len` rounds.
    pub fn get_state(&self, schedule_len: usize) -> State {
        if self.race_running {
            State::Running
        } else if self.race_finished {
            State::Finished
        } else if schedule_len == 0 {
            State::Idle
        } else {
            State::Ready
        }
    }

    /// reset returns to the first round, neither running nor finished.
    pub fn reset(&mut self) {
        self.cur_round_idx = 0;
        self.race_running = false;
        self.race_finished = false;
    }

    /// start_race sets the running flag for the current round.
    pub fn start_race(&mut self, schedule_len: usize) -> Result<(), StoreError> {
        match self.get_state(schedule_len) {
            State::Ready => {
                self.race_running = true;
                Ok(())
            }
            State::Idle => Err(StoreError::PreconditionViolation(
                "Cannot start a race without a schedule".to_owned(),
            )),
            State::Running => Err(StoreError::PreconditionViolation(
                "Race is already running".to_owned(),
            )),
            State::Finished => Err(StoreError::PreconditionViolation(
                "All rounds are finished, generate a new schedule first".to_owned(),
            )),
        }
    }

    /// finish_round ends the running round. Below `last_round_idx` the handler advances to the
    /// next round, at `last_round_idx` it becomes finished and keeps its index. Returns whether
    /// the program is finished afterwards.
    pub fn finish_round(&mut self, last_round_idx: usize) -> Result<bool, StoreError> {
        if !self.race_running {
            return Err(StoreError::PreconditionViolation(format!(
                "Cannot finish round {} while no race is running",
                self.cur_round_idx + 1
            )));
        }

        self.race_running = false;
        if self.cur_round_idx < last_round_idx {
            self.cur_round_idx += 1;
        } else {
            self.race_finished = true;
        }

        Ok(self.race_finished)
    }

    pub fn get_cur_round_idx(&self) -> usize {
        self.cur_round_idx
    }

    pub fn get_race_running(&self) -> bool {
        self.race_running
    }

    pub fn get_race_finished(&self) -> bool {
        self.race_finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_states() {
        let mut sh = StateHandler::default();
        assert_eq!(sh.get_state(0), State::Idle);
        assert_eq!(sh.get_state(3), State::Ready);

        sh.start_race(3).unwrap();
        assert_eq!(sh.get_state(3), State::Running);

        sh.finish_round(2).unwrap();
        assert_eq!(sh.get_state(3), State::Ready);
        assert_eq!(sh.get_cur_round_idx(), 1);
    }

    #[test]
    fn test_runs_to_finished() {
        let mut sh = StateHandler::default();
        for idx in 0..3 {
            assert_eq!(sh.get_cur_round_idx(), idx);
            sh.start_race(3).unwrap();
            let finished = sh.finish_round(2).unwrap();
            assert_eq!(finished, idx == 2);
        }
        assert_eq!(sh.get_state(3), State::Finished);
        assert_eq!(sh.get_cur_round_idx(), 2);
        assert!(!sh.get_race_running());
    }

    #[test]
    fn test_guarded_transitions() {
        let mut sh = StateHandler::default();
        assert!(sh.start_race(0).is_err());
        assert!(sh.finish_round(0).is_err());

        sh.start_race(1).unwrap();
        assert!(sh.start_race(1).is_err());
        sh.finish_round(0).unwrap();

        assert!(sh.get_race_finished());
        assert!(sh.start_race(1).is_err());
        assert!(sh.finish_round(0).is_err());
    }

    #[test]
    fn test_reset_from_any_state() {
        let mut sh = StateHandler::default();
        sh.start_race(2).unwrap();
        sh.reset();
        assert_eq!(sh.get_state(2), State::Ready);

        sh.start_race(1).unwrap();
        sh.finish_round(0).unwrap();
        sh.reset();
        assert_eq!(sh.get_state(1), State::Ready);
        assert_eq!(sh.get_cur_round_idx(), 0);
        assert!(!sh.get_race_finished());
    }
}
