//! Property tests for lesson duration conversion

use course_studio::curriculum::LessonDuration;
use proptest::prelude::*;

proptest! {
    #[test]
    fn minutes_survive_the_wire_format(minutes in 0u32..10_000_000) {
        let wire = LessonDuration::from_minutes(minutes).to_wire();
        let parsed = LessonDuration::parse_wire(&wire);
        prop_assert_eq!(parsed.map(|d| d.minutes()), Some(minutes));
    }

    #[test]
    fn wire_format_always_has_zero_seconds(minutes in 0u32..10_000_000) {
        let wire = LessonDuration::from_minutes(minutes).to_wire();
        prop_assert!(wire.ends_with(":00"));
        let minute_part = wire.split(':').nth(1).unwrap_or_default();
        prop_assert_eq!(minute_part.len(), 2);
    }

    #[test]
    fn bare_minute_counts_parse(minutes in 0u32..100_000) {
        let parsed: LessonDuration = minutes.to_string().parse().unwrap();
        prop_assert_eq!(parsed.minutes(), minutes);
    }
}
