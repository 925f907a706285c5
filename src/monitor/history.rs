use std::collections::VecDeque;

/// Rolling statistics over the offers made during a run.
pub struct RunHistory {
    recent_scores: VecDeque<f64>,
    capacity: usize,
    saves: usize,
    skips: usize,
    total_records: usize, // lifetime count, never capped
}

impl RunHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        RunHistory {
            recent_scores: VecDeque::with_capacity(capacity),
            capacity,
            saves: 0,
            skips: 0,
            total_records: 0,
        }
    }

    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    pub fn record_offer(&mut self, score: f64, saved: bool) {
        self.total_records += 1;
        if saved {
            self.saves += 1;
        } else {
            self.skips += 1;
        }
        self.recent_scores.push_back(score);
        if self.recent_scores.len() > self.capacity {
            self.recent_scores.pop_front();
        }
    }

    /// Average score over the last N records.
    pub fn average_score(&self, last_n: usize) -> f64 {
        let n = self.recent_scores.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        let sum: f64 = self.recent_scores.iter().rev().take(n).sum();
        sum / n as f64
    }

    pub fn saves(&self) -> usize {
        self.saves
    }

    pub fn skips(&self) -> usize {
        self.skips
    }

    pub fn total_records(&self) -> usize {
        self.total_records
    }
}

impl Default for RunHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_saves_and_skips() {
        let mut h = RunHistory::new();
        h.record_offer(0.5, true);
        h.record_offer(0.4, false);
        h.record_offer(0.6, true);

        assert_eq!(h.saves(), 2);
        assert_eq!(h.skips(), 1);
        assert_eq!(h.total_records(), 3);
    }

    #[test]
    fn test_average_score_last_n() {
        let mut h = RunHistory::new();
        h.record_offer(0.2, true);
        h.record_offer(0.4, false);
        h.record_offer(0.6, false);

        assert!((h.average_score(2) - 0.5).abs() < 1e-9);
        assert!((h.average_score(10) - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_window_caps_scores_but_not_totals() {
        let mut h = RunHistory::with_capacity(2);
        for i in 0..5 {
            h.record_offer(i as f64, false);
        }
        assert_eq!(h.total_records(), 5);
        // Window holds only the last two scores: 3.0 and 4.0
        assert!((h.average_score(10) - 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_average_score_empty() {
        let h = RunHistory::new();
        assert_eq!(h.average_score(10), 0.0);
    }
}
