//! Session statistics

use serde::{Deserialize, Serialize};

use crate::paytable::WinResult;

/// Session statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_spins: u64,
    pub turbo_spins: u64,
    pub total_bet: f64,
    pub total_win: f64,
    pub wins: u64,
    pub losses: u64,
    /// Wins containing at least one full row
    pub five_line_wins: u64,
    /// Wins made only of partial rows and diagonals
    pub three_line_wins: u64,
    pub max_win: f64,
}

impl SessionStats {
    /// Record one resolved spin
    pub fn record(&mut self, debited: f64, result: &WinResult, turbo: bool) {
        self.total_spins += 1;
        if turbo {
            self.turbo_spins += 1;
        }
        self.total_bet += debited;
        self.total_win += result.total;

        if result.is_win() {
            self.wins += 1;
            if result.has_five_line() {
                self.five_line_wins += 1;
            } else {
                self.three_line_wins += 1;
            }
            self.max_win = self.max_win.max(result.total);
        } else {
            self.losses += 1;
        }
    }

    /// Calculate RTP
    pub fn rtp(&self) -> f64 {
        if self.total_bet > 0.0 {
            (self.total_win / self.total_bet) * 100.0
        } else {
            0.0
        }
    }

    /// Calculate hit rate
    pub fn hit_rate(&self) -> f64 {
        if self.total_spins > 0 {
            (self.wins as f64 / self.total_spins as f64) * 100.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    use crate::extract::ResultGrid;
    use crate::paytable::PayTable;

    #[test]
    fn test_record_and_rates() {
        let table = PayTable::standard();
        let five = table.evaluate(
            &ResultGrid::from_rows(vec![
                vec![1, 1, 1, 1, 1],
                vec![2, 3, 4, 5, 6],
                vec![7, 8, 9, 10, 11],
            ])
            .unwrap(),
        );
        let nothing = WinResult::default();

        let mut stats = SessionStats::default();
        stats.record(20.0, &five, false);
        stats.record(20.0, &nothing, true);
        stats.record(20.0, &nothing, true);
        stats.record(20.0, &nothing, false);

        assert_eq!(stats.total_spins, 4);
        assert_eq!(stats.turbo_spins, 2);
        assert_eq!(stats.wins, 1);
        assert_eq!(stats.losses, 3);
        assert_eq!(stats.five_line_wins, 1);
        assert_eq!(stats.three_line_wins, 0);
        assert_eq!(stats.max_win, 5.0);
        assert_relative_eq!(stats.hit_rate(), 25.0);
        assert_relative_eq!(stats.rtp(), 5.0 / 80.0 * 100.0);
    }

    #[test]
    fn test_empty_rates() {
        let stats = SessionStats::default();
        assert_eq!(stats.rtp(), 0.0);
        assert_eq!(stats.hit_rate(), 0.0);
    }
}
