/// Format a second count as `MM:SS` for the countdown displays.
///
/// Minutes are not capped at 99; a 2-hour drill renders as `120:00`.
pub fn format_mmss(total_seconds: u32) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::format_mmss;

    #[test]
    fn pads_both_fields() {
        assert_eq!(format_mmss(0), "00:00");
        assert_eq!(format_mmss(5), "00:05");
        assert_eq!(format_mmss(65), "01:05");
        assert_eq!(format_mmss(600), "10:00");
    }

    #[test]
    fn minutes_can_exceed_two_digits() {
        assert_eq!(format_mmss(7200), "120:00");
    }
}
