use super::types::{GameOutcome, Mark};
use crate::proto;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreTally {
    pub x_wins: u32,
    pub o_wins: u32,
    pub draws: u32,
}

impl ScoreTally {
    pub fn record(&mut self, outcome: GameOutcome) {
        match outcome {
            GameOutcome::Win(Mark::X) => self.x_wins += 1,
            GameOutcome::Win(Mark::O) => self.o_wins += 1,
            GameOutcome::Draw => self.draws += 1,
            GameOutcome::InProgress => {}
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn to_proto(&self) -> proto::ScoreTally {
        proto::ScoreTally {
            x_wins: self.x_wins,
            o_wins: self.o_wins,
            draws: self.draws,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts_each_outcome() {
        let mut tally = ScoreTally::default();
        tally.record(GameOutcome::Win(Mark::X));
        tally.record(GameOutcome::Win(Mark::X));
        tally.record(GameOutcome::Win(Mark::O));
        tally.record(GameOutcome::Draw);
        tally.record(GameOutcome::InProgress);

        assert_eq!(
            tally,
            ScoreTally {
                x_wins: 2,
                o_wins: 1,
                draws: 1,
            }
        );
    }

    #[test]
    fn test_reset_zeroes_everything() {
        let mut tally = ScoreTally {
            x_wins: 3,
            o_wins: 2,
            draws: 5,
        };
        tally.reset();
        assert_eq!(tally, ScoreTally::default());
    }
}
