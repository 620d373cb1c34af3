/// Format whole seconds as `M:SS` for timers and result summaries.
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    let minutes = seconds / 60;
    let remainder = seconds % 60;
    format!("{minutes}:{remainder:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_seconds_but_not_minutes() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(9), "0:09");
        assert_eq!(format_clock(95), "1:35");
        assert_eq!(format_clock(600), "10:00");
    }
}
