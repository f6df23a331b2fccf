use proptest::prelude::*;

use xwalk_match::part_distance;

proptest! {
    // Exact matches must rank strictly better than the same string plus an
    // extra unmatched token. The generated tokens avoid 'z' so the appended
    // noise can never perfectly match an existing part.
    #[test]
    fn exact_match_beats_appended_noise(s in "[a-y0-9]{1,8}( [a-y0-9]{1,8}){0,3}") {
        let noisy = format!("{s} zzz");
        prop_assert!(part_distance(&s, &s) < part_distance(&s, &noisy));
    }

    #[test]
    fn scoring_is_symmetric(a in ".{0,20}", b in ".{0,20}") {
        prop_assert_eq!(part_distance(&a, &b), part_distance(&b, &a));
    }

    // Scoring is a total function: arbitrary inputs never panic.
    #[test]
    fn scoring_is_total(a in ".{0,40}", b in ".{0,40}") {
        let _ = part_distance(&a, &b);
    }

    #[test]
    fn self_score_only_rewards(s in ".{0,30}") {
        prop_assert!(part_distance(&s, &s) <= 0);
    }
}
