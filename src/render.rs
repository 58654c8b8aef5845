//! Markdown rendering of the progress block.
//!
//! Column widths are part of the output format: the README diff stays quiet
//! between runs only if every row is padded exactly the same way.

use chrono::{DateTime, FixedOffset, Utc};
use crate::config::Topic;
use crate::error::{Error, Result};
use crate::progress::ProgressSummary;
use crate::readme::{END_MARKER, START_MARKER};
use crate::status::FolderState;

const ID_WIDTH: usize = 2;
const WEEK_WIDTH: usize = 10;
const TITLE_WIDTH: usize = 52;
const STATUS_WIDTH: usize = 19;

const HEADING: &str = "## 📊 Tracking Tiến Độ Học Tập";
const SUMMARY_HEADING: &str = "### 📈 Tổng quan";
const LEGEND_HEADING: &str = "### Chú thích";
const BAR_LABEL: &str = "Tiến độ:";

pub const TIMESTAMP_PREFIX: &str = "> **Cập nhật lần cuối:**";

const LEGEND: &str = "\
| Icon | Ý nghĩa        |
|------|-----------------|
| ⬜   | Chưa bắt đầu   |
| 🔄   | Đang học        |
| ✅   | Hoàn thành      |
";

/// Icon and label shown for a state.
pub fn status_icon(state: FolderState) -> &'static str {
    match state {
        FolderState::Completed => "✅",
        FolderState::InProgress => "🔄",
        FolderState::NotStarted => "⬜",
    }
}

pub fn status_label(state: FolderState) -> &'static str {
    match state {
        FolderState::Completed => "Hoàn thành",
        FolderState::InProgress => "Đang học",
        FolderState::NotStarted => "Chưa bắt đầu",
    }
}

pub fn status_cell(state: FolderState) -> String {
    format!("{} {}", status_icon(state), status_label(state))
}

pub fn utc_offset(hours: i32) -> Result<FixedOffset> {
    FixedOffset::east_opt(hours * 3600)
        .ok_or_else(|| Error::Config(format!("Invalid UTC offset: {} hours", hours)))
}

pub fn now_in(offset: FixedOffset) -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&offset)
}

/// `16/10/2026 09:30 (UTC+7)`
pub fn format_timestamp(timestamp: &DateTime<FixedOffset>) -> String {
    format!(
        "{} ({})",
        timestamp.format("%d/%m/%Y %H:%M"),
        offset_label(timestamp.offset())
    )
}

fn offset_label(offset: &FixedOffset) -> String {
    let seconds = offset.local_minus_utc();
    let sign = if seconds < 0 { '-' } else { '+' };
    let hours = seconds.abs() / 3600;
    let minutes = (seconds.abs() % 3600) / 60;

    if minutes == 0 {
        format!("UTC{}{}", sign, hours)
    } else {
        format!("UTC{}{}:{:02}", sign, hours, minutes)
    }
}

/// Render the whole marker-delimited block, markers included.
///
/// `states[i]` belongs to `topics[i]`.
pub fn render(
    topics: &[Topic],
    states: &[FolderState],
    summary: &ProgressSummary,
    timestamp: &DateTime<FixedOffset>,
) -> String {
    debug_assert_eq!(topics.len(), states.len());

    let rows: Vec<String> = topics
        .iter()
        .zip(states)
        .map(|(topic, state)| row(topic, *state))
        .collect();

    let mut text = String::new();

    text.push_str(START_MARKER);
    text.push('\n');
    text.push_str(HEADING);
    text.push_str("\n\n");
    text.push_str(&format!("{} `{}`\n\n", TIMESTAMP_PREFIX, format_timestamp(timestamp)));

    text.push_str(&table_header());
    text.push('\n');
    text.push_str(&separator());
    text.push('\n');
    text.push_str(&rows.join("\n"));
    text.push_str("\n\n");

    text.push_str(SUMMARY_HEADING);
    text.push_str("\n\n```text\n");
    text.push_str(&format!("{} {}\n", BAR_LABEL, summary.bar));
    text.push_str("```\n\n");

    text.push_str(LEGEND_HEADING);
    text.push_str("\n\n");
    text.push_str(LEGEND);
    text.push_str(END_MARKER);
    text
}

/// Two characters narrower than the rows in the title column.
fn table_header() -> String {
    format!(
        "| #  | Tuần       | Chủ đề{}| Trạng thái          | Ghi chú |",
        " ".repeat(45)
    )
}

fn separator() -> String {
    format!(
        "|{}|{}|{}|{}|{}|",
        "-".repeat(ID_WIDTH + 2),
        "-".repeat(WEEK_WIDTH + 2),
        "-".repeat(TITLE_WIDTH + 2),
        "-".repeat(STATUS_WIDTH + 2),
        "-".repeat(9)
    )
}

fn row(topic: &Topic, state: FolderState) -> String {
    format!(
        "| {:<id_w$} | {:<week_w$} | {:<title_w$} | {:<status_w$} |         |",
        topic.id,
        topic.week,
        topic.title,
        status_cell(state),
        id_w = ID_WIDTH,
        week_w = WEEK_WIDTH,
        title_w = TITLE_WIDTH,
        status_w = STATUS_WIDTH,
    )
}

/// Drop the timestamp line so two blocks can be compared for content.
pub fn strip_timestamp(block: &str) -> String {
    block
        .lines()
        .filter(|line| !line.starts_with(TIMESTAMP_PREFIX))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn topic(id: u32, week: &str, title: &str) -> Topic {
        Topic {
            id,
            week: week.to_string(),
            title: title.to_string(),
            folder: format!("week-{:02}", id),
        }
    }

    fn timestamp() -> DateTime<FixedOffset> {
        utc_offset(7).unwrap().with_ymd_and_hms(2026, 10, 16, 9, 5, 0).unwrap()
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(&timestamp()), "16/10/2026 09:05 (UTC+7)");

        let utc = Utc.with_ymd_and_hms(2026, 1, 2, 20, 0, 0).unwrap();
        assert_eq!(
            format_timestamp(&utc.with_timezone(&utc_offset(7).unwrap())),
            "03/01/2026 03:00 (UTC+7)"
        );
        assert_eq!(
            format_timestamp(&utc.with_timezone(&utc_offset(-5).unwrap())),
            "02/01/2026 15:00 (UTC-5)"
        );
    }

    #[test]
    fn test_status_cells() {
        assert_eq!(status_cell(FolderState::Completed), "✅ Hoàn thành");
        assert_eq!(status_cell(FolderState::InProgress), "🔄 Đang học");
        assert_eq!(status_cell(FolderState::NotStarted), "⬜ Chưa bắt đầu");
    }

    #[test]
    fn test_row_padding() {
        let line = row(&topic(1, "Week 1", "Intro"), FolderState::Completed);
        let expected = format!(
            "| 1  | Week 1     | Intro{} | ✅ Hoàn thành{} |         |",
            " ".repeat(52 - 5),
            " ".repeat(19 - 12),
        );
        assert_eq!(line, expected);
    }

    #[test]
    fn test_long_values_are_not_truncated() {
        let title = "x".repeat(60);
        let line = row(&topic(12, "Week 12", &title), FolderState::NotStarted);
        assert!(line.contains(&title));
        assert!(line.starts_with("| 12 | Week 12    | "));
    }

    #[test]
    fn test_separator_matches_rows() {
        let line = row(&topic(1, "Week 1", "Intro"), FolderState::InProgress);
        let sep = separator();
        assert_eq!(line.chars().count(), sep.chars().count());
        assert_eq!(
            sep,
            format!(
                "|{}|{}|{}|{}|{}|",
                "-".repeat(4),
                "-".repeat(12),
                "-".repeat(54),
                "-".repeat(21),
                "-".repeat(9)
            )
        );
        assert_eq!(table_header().chars().count(), sep.chars().count() - 2);
    }

    #[test]
    fn test_render_exact_block() {
        let topics = vec![topic(1, "Tuần 1", "Biến và kiểu dữ liệu"), topic(2, "Tuần 2", "Ownership")];
        let states = vec![FolderState::Completed, FolderState::InProgress];
        let summary = ProgressSummary::aggregate(&states, 20);

        let block = render(&topics, &states, &summary, &timestamp());

        let expected = [
            "<!-- PROGRESS:START - Tự động cập nhật bởi GitHub Actions, KHÔNG sửa tay phần này -->",
            "## 📊 Tracking Tiến Độ Học Tập",
            "",
            "> **Cập nhật lần cuối:** `16/10/2026 09:05 (UTC+7)`",
            "",
            "| #  | Tuần       | Chủ đề                                             | Trạng thái          | Ghi chú |",
            "|----|------------|------------------------------------------------------|---------------------|---------|",
            "| 1  | Tuần 1     | Biến và kiểu dữ liệu                                 | ✅ Hoàn thành        |         |",
            "| 2  | Tuần 2     | Ownership                                            | 🔄 Đang học          |         |",
            "",
            "### 📈 Tổng quan",
            "",
            "```text",
            "Tiến độ: [██████████░░░░░░░░░░] 1/2 chủ đề (50%)",
            "```",
            "",
            "### Chú thích",
            "",
            "| Icon | Ý nghĩa        |",
            "|------|-----------------|",
            "| ⬜   | Chưa bắt đầu   |",
            "| 🔄   | Đang học        |",
            "| ✅   | Hoàn thành      |",
            "<!-- PROGRESS:END -->",
        ]
        .join("\n");

        assert_eq!(block, expected);
    }

    #[test]
    fn test_render_empty_topics() {
        let summary = ProgressSummary::aggregate(&[] as &[FolderState], 20);
        let block = render(&[], &[], &summary, &timestamp());
        assert!(block.contains(&format!("|---------|\n\n\n{}", SUMMARY_HEADING)));
        assert!(block.contains("Tiến độ: [░░░░░░░░░░░░░░░░░░░░] 0/0 chủ đề (0%)"));
        assert!(block.ends_with(END_MARKER));
    }

    #[test]
    fn test_strip_timestamp() {
        let topics = vec![topic(1, "Week 1", "Intro")];
        let states = vec![FolderState::InProgress];
        let summary = ProgressSummary::aggregate(&states, 20);

        let earlier = render(&topics, &states, &summary, &timestamp());
        let later_ts = timestamp() + chrono::Duration::hours(3);
        let later = render(&topics, &states, &summary, &later_ts);

        assert_ne!(earlier, later);
        assert_eq!(strip_timestamp(&earlier), strip_timestamp(&later));
        assert!(!strip_timestamp(&earlier).contains(TIMESTAMP_PREFIX));
    }
}
