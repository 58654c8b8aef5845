use crate::status::FolderState;

pub const DEFAULT_BAR_WIDTH: usize = 20;

const FILLED: char = '█';
const EMPTY: char = '░';

/// Counts per state plus the rendered progress bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSummary {
    pub completed: usize,
    pub in_progress: usize,
    pub not_started: usize,
    pub total: usize,
    pub bar: String,
}

impl ProgressSummary {
    pub fn aggregate<'a, I>(states: I, width: usize) -> Self
    where
        I: IntoIterator<Item = &'a FolderState>,
    {
        let mut completed = 0;
        let mut in_progress = 0;
        let mut not_started = 0;

        for state in states {
            match state {
                FolderState::Completed => completed += 1,
                FolderState::InProgress => in_progress += 1,
                FolderState::NotStarted => not_started += 1,
            }
        }

        let total = completed + in_progress + not_started;

        Self {
            completed,
            in_progress,
            not_started,
            total,
            bar: render_bar(completed, total, width),
        }
    }

    pub fn percentage(&self) -> usize {
        percentage(self.completed, self.total)
    }
}

/// `[████░░░░] 2/5 chủ đề (40%)`
pub fn render_bar(completed: usize, total: usize, width: usize) -> String {
    let filled = filled_segments(completed, total, width);

    let mut bar = String::with_capacity(width * 3 + 32);
    bar.push('[');
    bar.extend(std::iter::repeat(FILLED).take(filled));
    bar.extend(std::iter::repeat(EMPTY).take(width - filled));
    bar.push_str(&format!("] {}/{} chủ đề ({}%)", completed, total, percentage(completed, total)));
    bar
}

pub fn percentage(completed: usize, total: usize) -> usize {
    ratio_rounded(completed, total, 100)
}

fn filled_segments(completed: usize, total: usize, width: usize) -> usize {
    ratio_rounded(completed, total, width).min(width)
}

/// round(scale * part / whole) with ties to even; 0 when whole is 0.
fn ratio_rounded(part: usize, whole: usize, scale: usize) -> usize {
    if whole == 0 {
        return 0;
    }
    let scaled = scale * part;
    let quotient = scaled / whole;
    let twice_rem = 2 * (scaled % whole);

    if twice_rem > whole || (twice_rem == whole && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn state_strategy() -> impl Strategy<Value = FolderState> {
        prop_oneof![
            Just(FolderState::NotStarted),
            Just(FolderState::InProgress),
            Just(FolderState::Completed),
        ]
    }

    #[test]
    fn test_empty_list() {
        let states: [FolderState; 0] = [];
        let summary = ProgressSummary::aggregate(&states, DEFAULT_BAR_WIDTH);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.percentage(), 0);
        assert_eq!(summary.bar, format!("[{}] 0/0 chủ đề (0%)", "░".repeat(20)));
    }

    #[test]
    fn test_mixed_counts() {
        let states = [
            FolderState::Completed,
            FolderState::InProgress,
            FolderState::NotStarted,
            FolderState::Completed,
            FolderState::NotStarted,
        ];
        let summary = ProgressSummary::aggregate(&states, 10);
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.in_progress, 1);
        assert_eq!(summary.not_started, 2);
        assert_eq!(summary.total, 5);
        assert_eq!(summary.bar, "[████░░░░░░] 2/5 chủ đề (40%)");
    }

    #[test]
    fn test_all_completed() {
        let summary = ProgressSummary::aggregate(&[FolderState::Completed], DEFAULT_BAR_WIDTH);
        assert_eq!(summary.bar, format!("[{}] 1/1 chủ đề (100%)", "█".repeat(20)));
    }

    #[test]
    fn test_rounding() {
        // 1/3 of 20 = 6.67 -> 7 segments, 33%
        assert_eq!(render_bar(1, 3, 20), format!("[{}{}] 1/3 chủ đề (33%)", "█".repeat(7), "░".repeat(13)));
        assert_eq!(percentage(2, 3), 67);
    }

    #[test]
    fn test_halves_round_to_even() {
        assert_eq!(percentage(1, 8), 12);
        assert_eq!(percentage(3, 8), 38);
        assert_eq!(percentage(5, 8), 62);
        assert_eq!(percentage(1, 200), 0);
        assert_eq!(percentage(3, 200), 2);

        // 20 * 1/8 = 2.5 -> 2, 20 * 3/8 = 7.5 -> 8
        assert_eq!(render_bar(1, 8, 20), format!("[{}{}] 1/8 chủ đề (12%)", "█".repeat(2), "░".repeat(18)));
        assert_eq!(filled_segments(3, 8, 20), 8);
        assert_eq!(filled_segments(1, 4, 10), 2);
        assert_eq!(filled_segments(3, 4, 10), 8);
    }

    proptest! {
        #[test]
        fn prop_counts_sum_to_total(states in prop::collection::vec(state_strategy(), 0..64),
                                    width in 1usize..80) {
            let summary = ProgressSummary::aggregate(&states, width);
            prop_assert_eq!(summary.completed + summary.in_progress + summary.not_started, summary.total);
            prop_assert_eq!(summary.total, states.len());
            prop_assert!(summary.percentage() <= 100);

            let glyphs = summary.bar.chars().filter(|c| *c == FILLED || *c == EMPTY).count();
            prop_assert_eq!(glyphs, width);
        }
    }
}
