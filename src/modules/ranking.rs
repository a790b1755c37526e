use log::error;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{CustomResult, Error};
use crate::modules::models::entry::LapEntry;

/// 1-2 digit minutes, exactly 2 digit seconds below 60, 1-3 digit fraction
const LAP_TIME_PATTERN: &str = r"^(\d{1,2}):([0-5]\d)\.(\d{1,3})$";

/// # parse a lap time string into milliseconds
/// the canonical format is `M:SS.mmm` or `MM:SS.mmm`. the fraction may be
/// 1 to 3 digits and holds the leading milliseconds, so `.4` is 400ms and
/// `.45` is 450ms.
///
/// ## Arguments
/// * `display` - The lap time string to parse
///
/// ## Returns
/// * `i64` - The total lap time in milliseconds
pub fn parse_lap_time(display: &str) -> CustomResult<i64> {
    let pattern = Regex::new(LAP_TIME_PATTERN).unwrap();

    let captures = match pattern.captures(display) {
        Some(captures) => captures,
        None => {
            return Err(Error::ParseError {
                input: display.to_string(),
            });
        }
    };

    let minutes: i64 = captures[1].parse().unwrap();
    let seconds: i64 = captures[2].parse().unwrap();

    let fraction = &captures[3];
    let millis: i64 = fraction.parse::<i64>().unwrap() * 10_i64.pow(3 - fraction.len() as u32);

    Ok(minutes * 60_000 + seconds * 1_000 + millis)
}

/// # format milliseconds as a lap time string
/// renders the canonical `M:SS.mmm` format with a 3 digit fraction.
/// formatting the result of `parse_lap_time` reparses to the same value.
pub fn format_lap_time(millis: i64) -> String {
    format!(
        "{}:{:02}.{:03}",
        millis / 60_000,
        (millis % 60_000) / 1_000,
        millis % 1_000
    )
}

/// # format the gap to the leader
/// renders a positive delta in the same units as lap times:
/// `+0.mmm` below one second, `+S.mmm` below one minute, `+M:SS.mmm` above.
/// a zero delta renders as `+0.000`; the literal `-` is reserved for the
/// leader itself and written by `rank`, not here.
pub fn format_gap(delta_millis: i64) -> String {
    if delta_millis < 1_000 {
        format!("+0.{:03}", delta_millis)
    } else if delta_millis < 60_000 {
        format!("+{}.{:03}", delta_millis / 1_000, delta_millis % 1_000)
    } else {
        format!(
            "+{}:{:02}.{:03}",
            delta_millis / 60_000,
            (delta_millis % 60_000) / 1_000,
            delta_millis % 1_000
        )
    }
}

/// a lap entry annotated with its leaderboard position and gap to the
/// leader. built by `rank`, never persisted.
#[derive(Clone, Serialize, PartialEq, Deserialize, Debug)]
pub struct RankedEntry {
    pub rank: usize,
    pub gap: String,
    pub lap_time_ms: i64,
    pub entry: LapEntry,
}

/// # rank lap entries into a leaderboard
/// sorts the entries ascending by parsed lap time and annotates each with
/// its 1-based rank and formatted gap to the leader. the sort is stable,
/// so entries with identical times keep the order they were passed in
/// (callers pass creation order). every display string is re-parsed on
/// every call, the stored millisecond value may be stale after an edit.
///
/// the input is not modified. ranking an unchanged input twice gives an
/// identical result.
///
/// ## Arguments
/// * `entries` - The entries to rank, in creation order
///
/// ## Returns
/// * `Vec<RankedEntry>` - The leaderboard, fastest first
pub fn rank(entries: &[LapEntry]) -> CustomResult<Vec<RankedEntry>> {
    let mut parsed: Vec<(i64, LapEntry)> = Vec::with_capacity(entries.len());
    for entry in entries {
        match parse_lap_time(&entry.lap_time_display) {
            Ok(millis) => parsed.push((millis, entry.clone())),
            Err(_) => {
                error!(
                    target: "ranking:rank",
                    "stored entry has an unparsable lap time: (entry: {}, lap_time: {})",
                    entry.id, entry.lap_time_display
                );
                return Err(Error::ValidationError {
                    entry_id: entry.id.clone(),
                    input: entry.lap_time_display.clone(),
                });
            }
        }
    }

    // sort_by_key is stable: equal times keep their input order
    parsed.sort_by_key(|(millis, _)| *millis);

    let leader_millis = parsed.first().map(|(millis, _)| *millis).unwrap_or(0);

    Ok(parsed
        .into_iter()
        .enumerate()
        .map(|(position, (millis, entry))| RankedEntry {
            rank: position + 1,
            gap: if position == 0 {
                "-".to_string()
            } else {
                format_gap(millis - leader_millis)
            },
            lap_time_ms: millis,
            entry,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, lap_time: &str) -> LapEntry {
        LapEntry {
            id: id.to_string(),
            event_id: "event".to_string(),
            driver_name: format!("driver {}", id),
            team: None,
            email: None,
            lap_time_display: lap_time.to_string(),
            // deliberately stale: rank must re-parse the display string
            lap_time_ms: 0,
            created_at: chrono::NaiveDateTime::default(),
        }
    }

    #[test]
    fn parse_accepts_canonical_times() {
        assert_eq!(parse_lap_time("1:23.456").unwrap(), 83_456);
        assert_eq!(parse_lap_time("0:59.1").unwrap(), 59_100);
        assert_eq!(parse_lap_time("0:59.45").unwrap(), 59_450);
        assert_eq!(parse_lap_time("12:00.00").unwrap(), 720_000);
        assert_eq!(parse_lap_time("99:59.999").unwrap(), 5_999_999);
    }

    #[test]
    fn parse_rejects_malformed_times() {
        // seconds must be exactly 2 digits
        assert!(parse_lap_time("1:2.456").is_err());
        // fraction is at most 3 digits
        assert!(parse_lap_time("1:23.4567").is_err());
        // seconds are below 60
        assert!(parse_lap_time("1:60.000").is_err());
        assert!(parse_lap_time("1:23").is_err());
        assert!(parse_lap_time("1.23.456").is_err());
        assert!(parse_lap_time("123:00.000").is_err());
        assert!(parse_lap_time(" 1:23.456").is_err());
        assert!(parse_lap_time("1:23.456 ").is_err());
        assert!(parse_lap_time("").is_err());
    }

    #[test]
    fn short_fractions_hold_the_leading_milliseconds() {
        assert_eq!(parse_lap_time("0:00.4").unwrap(), 400);
        assert_eq!(parse_lap_time("0:00.45").unwrap(), 450);
        assert_eq!(parse_lap_time("0:00.456").unwrap(), 456);
    }

    #[test]
    fn format_round_trips_through_parse() {
        for display in ["1:23.456", "0:59.1", "12:00.00", "0:00.4", "99:59.999"] {
            let millis = parse_lap_time(display).unwrap();
            assert_eq!(parse_lap_time(&format_lap_time(millis)).unwrap(), millis);
        }
    }

    #[test]
    fn gap_formatting_scales_with_the_delta() {
        assert_eq!(format_gap(0), "+0.000");
        assert_eq!(format_gap(544), "+0.544");
        assert_eq!(format_gap(1_544), "+1.544");
        assert_eq!(format_gap(59_999), "+59.999");
        assert_eq!(format_gap(61_544), "+1:01.544");
    }

    #[test]
    fn rank_of_nothing_is_nothing() {
        assert_eq!(rank(&[]).unwrap(), vec![]);
    }

    #[test]
    fn single_entry_leads_with_no_gap() {
        let ranked = rank(&[entry("a", "1:30.000")]).unwrap();

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].gap, "-");
        assert_eq!(ranked[0].lap_time_ms, 90_000);
        assert_eq!(ranked[0].entry.id, "a");
    }

    #[test]
    fn ties_keep_creation_order() {
        let entries = [
            entry("a", "1:24.000"),
            entry("b", "1:23.456"),
            entry("c", "1:23.456"),
        ];

        let ranked = rank(&entries).unwrap();

        assert_eq!(ranked[0].entry.id, "b");
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].gap, "-");

        assert_eq!(ranked[1].entry.id, "c");
        assert_eq!(ranked[1].rank, 2);
        assert_eq!(ranked[1].gap, "+0.000");

        assert_eq!(ranked[2].entry.id, "a");
        assert_eq!(ranked[2].rank, 3);
        assert_eq!(ranked[2].gap, "+0.544");
    }

    #[test]
    fn ranking_is_deterministic() {
        let entries = [
            entry("a", "1:24.000"),
            entry("b", "1:23.456"),
            entry("c", "1:25.100"),
        ];

        assert_eq!(rank(&entries).unwrap(), rank(&entries).unwrap());
    }

    #[test]
    fn ranks_are_contiguous_from_one() {
        let entries: Vec<LapEntry> = (0..25i64)
            .map(|n| entry(&format!("e{}", n), &format_lap_time(80_000 + (n * 37) % 7 * 250)))
            .collect();

        let ranked = rank(&entries).unwrap();
        let mut ranks: Vec<usize> = ranked.iter().map(|r| r.rank).collect();
        ranks.sort();

        assert_eq!(ranks, (1..=25).collect::<Vec<usize>>());
    }

    #[test]
    fn one_bad_entry_fails_the_whole_call() {
        let entries = [
            entry("a", "1:24.000"),
            entry("broken", "not a time"),
            entry("c", "1:25.100"),
        ];

        match rank(&entries) {
            Err(Error::ValidationError { entry_id, .. }) => assert_eq!(entry_id, "broken"),
            other => panic!("expected a validation error, got {:?}", other),
        }
    }

    #[test]
    fn input_order_does_not_leak_into_ranks() {
        let forward = [entry("a", "1:20.000"), entry("b", "1:21.000")];
        let backward = [entry("b", "1:21.000"), entry("a", "1:20.000")];

        let ranked_forward = rank(&forward).unwrap();
        let ranked_backward = rank(&backward).unwrap();

        assert_eq!(ranked_forward[0].entry.id, "a");
        assert_eq!(ranked_backward[0].entry.id, "a");
        assert_eq!(ranked_backward[1].gap, "+1.000");
    }
}
