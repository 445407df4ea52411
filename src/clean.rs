// src/clean.rs

use tracing::{info, instrument, warn};

use crate::{
    config::CleanConfig,
    error::{Result, UcpdError},
    table::RawTable,
};

pub const DATE_TIME: &str = "Date/Time";
pub const GENDER: &str = "Gender";
pub const RACE: &str = "Race";
pub const DATE: &str = "Date";
pub const TIME: &str = "Time";

/// Census-style race labels, checked in order; the first rule with a
/// matching keyword wins.
const RACE_RULES: &[(&[&str], &str)] = &[
    (
        &["AMERICAN INDIAN", "ALASKA", "NATIVE AMERICAN"],
        "NATIVE AMERICAN / ALASKAN NATIVE",
    ),
    (&["AFRICAN", "BLACK"], "BLACK / AFRICAN AMERICAN"),
    (&["CAUCASIAN", "WHITE"], "WHITE AMERICAN / CAUCASIAN"),
    (
        &["HAWAIIAN", "PACIFIC"],
        "NATIVE HAWAIIAN / OTHER PACIFIC ISLANDER",
    ),
    (&["HISPANIC"], "HISPANIC"),
];

/// Race values that are really a gender that landed in the wrong column.
const GENDER_LABELS: &[&str] = &["MALE", "FEMALE"];

/// Map a free-text race entry to its canonical label, or return it
/// uppercased if no rule matches.
pub fn standardize_race(race: &str) -> String {
    let upper = race.to_uppercase();
    RACE_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| upper.contains(k)))
        .map(|(_, label)| label.to_string())
        .unwrap_or(upper)
}

pub fn standardize_gender(gender: &str) -> String {
    gender.to_uppercase()
}

/// True if `date_time` contains any of the placeholder substrings.
pub fn is_placeholder(date_time: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|p| date_time.contains(p.as_str()))
}

/// Split on the first whitespace character: `"06/01/2020 3:00 PM"` →
/// `("06/01/2020", "3:00 PM")`. `None` unless both halves are non-empty.
pub fn split_date_time(date_time: &str) -> Option<(&str, &str)> {
    date_time
        .split_once(char::is_whitespace)
        .filter(|(date, time)| !date.is_empty() && !time.is_empty())
}

/// What a cleaning pass did with each raw row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanStats {
    pub raw: usize,
    pub placeholders: usize,
    pub gender_in_race: usize,
    pub malformed: usize,
    pub kept: usize,
}

/// Turn a raw scrape into a cleaned table.
///
/// Output columns are the input columns without `Date/Time`, followed by
/// `Date` and `Time`. Requires `Date/Time`, `Gender` and `Race` columns,
/// except for a table with neither columns nor rows (a query that returned
/// zero pages), which cleans to an empty `Date`/`Time` table.
#[instrument(level = "info", skip_all, fields(rows = raw.len()))]
pub fn clean_table(raw: &RawTable, cfg: &CleanConfig) -> Result<(RawTable, CleanStats)> {
    if raw.headers.is_empty() && raw.rows.is_empty() {
        info!("no columns or rows; nothing to clean");
        let out = RawTable::new(vec![DATE.to_string(), TIME.to_string()]);
        return Ok((out, CleanStats::default()));
    }

    let dt_idx = raw.require_column(DATE_TIME)?;
    let gender_idx = raw.require_column(GENDER)?;
    let race_idx = raw.require_column(RACE)?;

    let mut headers: Vec<String> = raw
        .headers
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != dt_idx)
        .map(|(_, h)| h.clone())
        .collect();
    headers.push(DATE.to_string());
    headers.push(TIME.to_string());
    let mut out = RawTable::new(headers);

    let mut stats = CleanStats {
        raw: raw.len(),
        ..CleanStats::default()
    };

    for (row_idx, row) in raw.rows.iter().enumerate() {
        let date_time = row.get(dt_idx).map(String::as_str).unwrap_or_default();
        if is_placeholder(date_time, &cfg.placeholder_patterns) {
            stats.placeholders += 1;
            continue;
        }

        let race = standardize_race(row.get(race_idx).map(String::as_str).unwrap_or_default());
        if cfg.drop_gender_in_race && GENDER_LABELS.contains(&race.as_str()) {
            stats.gender_in_race += 1;
            continue;
        }

        let (date, time) = match split_date_time(date_time) {
            Some(parts) => parts,
            None if cfg.skip_malformed => {
                warn!(row = row_idx, value = %date_time, "skipping unsplittable Date/Time");
                stats.malformed += 1;
                continue;
            }
            None => {
                return Err(UcpdError::MalformedDateTime {
                    row: row_idx,
                    value: date_time.to_string(),
                })
            }
        };

        let mut cleaned = Vec::with_capacity(out.headers.len());
        for (i, cell) in row.iter().enumerate() {
            if i == dt_idx {
                continue;
            } else if i == gender_idx {
                cleaned.push(standardize_gender(cell));
            } else if i == race_idx {
                cleaned.push(race.clone());
            } else {
                cleaned.push(cell.clone());
            }
        }
        cleaned.push(date.to_string());
        cleaned.push(time.to_string());
        out.rows.push(cleaned);
    }

    stats.kept = out.len();
    info!(
        raw = stats.raw,
        placeholders = stats.placeholders,
        gender_in_race = stats.gender_in_race,
        malformed = stats.malformed,
        kept = stats.kept,
        "cleaned table"
    );
    Ok((out, stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(rows: &[[&str; 4]]) -> RawTable {
        RawTable {
            headers: vec![
                "Date/Time".into(),
                "Location".into(),
                "Gender".into(),
                "Race".into(),
            ],
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn race_priority_and_aliases() {
        assert_eq!(standardize_race("Black Caucasian"), "BLACK / AFRICAN AMERICAN");
        assert_eq!(standardize_race("Other"), "OTHER");
        assert_eq!(
            standardize_race("alaska native"),
            "NATIVE AMERICAN / ALASKAN NATIVE"
        );
        assert_eq!(
            standardize_race("American Indian"),
            "NATIVE AMERICAN / ALASKAN NATIVE"
        );
        assert_eq!(
            standardize_race("hawaiian"),
            "NATIVE HAWAIIAN / OTHER PACIFIC ISLANDER"
        );
        assert_eq!(
            standardize_race("Pacific Islander"),
            "NATIVE HAWAIIAN / OTHER PACIFIC ISLANDER"
        );
        assert_eq!(standardize_race("White, non-Hispanic"), "WHITE AMERICAN / CAUCASIAN");
        assert_eq!(standardize_race("hispanic"), "HISPANIC");
        assert_eq!(standardize_race("African American"), "BLACK / AFRICAN AMERICAN");
    }

    #[test]
    fn race_is_total_and_idempotent() {
        let inputs = [
            "",
            "Other",
            "asian",
            "black/african american",
            "WHITE, NON-HISPANIC",
            "Native Hawaiian",
            "alaska native",
            "Hispanic or Latino",
            "male",
            "Straße",
        ];
        let labels: Vec<&str> = RACE_RULES.iter().map(|(_, l)| *l).collect();
        for input in inputs {
            let once = standardize_race(input);
            assert_eq!(standardize_race(&once), once, "not idempotent for {:?}", input);
            assert!(
                labels.contains(&once.as_str()) || once == input.to_uppercase(),
                "{:?} -> {:?}",
                input,
                once
            );
        }
    }

    #[test]
    fn placeholders_are_substring_matches() {
        let patterns = CleanConfig::default().placeholder_patterns;
        assert!(is_placeholder("No traffic stops found", &patterns));
        assert!(is_placeholder("There were no field interviews", &patterns));
        assert!(is_placeholder("Unknown", &patterns));
        assert!(!is_placeholder("06/01/2020 3:00 PM", &patterns));
        assert!(!is_placeholder("NO RESULTS", &patterns));
    }

    #[test]
    fn split_on_first_whitespace() {
        assert_eq!(
            split_date_time("06/01/2020 3:00 PM"),
            Some(("06/01/2020", "3:00 PM"))
        );
        assert_eq!(split_date_time("06/01/2020\t15:00"), Some(("06/01/2020", "15:00")));
        assert_eq!(split_date_time("06/01/2020"), None);
        assert_eq!(split_date_time("06/01/2020 "), None);
    }

    #[test]
    fn end_to_end_three_rows() {
        let table = raw(&[
            ["no field interviews", "no field interviews", "no field interviews", "no field interviews"],
            ["06/01/2020 3:00 PM", "5500 S. Ellis", "male", "WHITE, NON-HISPANIC"],
            ["06/02/2020 11:15 AM", "E. 55th St.", "Female", "black/african american"],
        ]);

        let (out, stats) = clean_table(&table, &CleanConfig::default()).unwrap();

        assert_eq!(out.headers, vec!["Location", "Gender", "Race", "Date", "Time"]);
        assert!(out.column_index(DATE_TIME).is_none());
        assert_eq!(out.len(), 2);
        assert_eq!(
            out.rows[0],
            vec!["5500 S. Ellis", "MALE", "WHITE AMERICAN / CAUCASIAN", "06/01/2020", "3:00 PM"]
        );
        assert_eq!(
            out.rows[1],
            vec!["E. 55th St.", "FEMALE", "BLACK / AFRICAN AMERICAN", "06/02/2020", "11:15 AM"]
        );
        assert_eq!(
            stats,
            CleanStats {
                raw: 3,
                placeholders: 1,
                gender_in_race: 0,
                malformed: 0,
                kept: 2
            }
        );
    }

    #[test]
    fn row_count_is_raw_minus_placeholders() {
        let table = raw(&[
            ["No traffic stops found", "", "", ""],
            ["06/01/2020 3:00 PM", "a", "m", "white"],
            ["traffic stops: none", "", "", ""],
            ["06/03/2020 1:00 AM", "b", "f", "asian"],
        ]);
        let (out, stats) = clean_table(&table, &CleanConfig::default()).unwrap();
        assert!(out.len() <= table.len());
        assert_eq!(out.len(), table.len() - 2);
        assert_eq!(stats.placeholders, 2);
        assert!(out.rows.iter().all(|r| !r.contains(&"No traffic stops found".to_string())));
        assert_eq!(out.rows[1][2], "ASIAN");
    }

    #[test]
    fn gender_in_race_is_kept_unless_enabled() {
        let table = raw(&[
            ["06/01/2020 3:00 PM", "a", "White", "Male"],
            ["06/01/2020 4:00 PM", "b", "female", "Black"],
        ]);

        let (kept, _) = clean_table(&table, &CleanConfig::default()).unwrap();
        assert_eq!(kept.len(), 2);
        assert_eq!(kept.rows[0][2], "MALE");

        let cfg = CleanConfig {
            drop_gender_in_race: true,
            ..CleanConfig::default()
        };
        let (dropped, stats) = clean_table(&table, &cfg).unwrap();
        assert_eq!(dropped.len(), 1);
        assert_eq!(stats.gender_in_race, 1);
        assert_eq!(dropped.rows[0][0], "b");
    }

    #[test]
    fn malformed_date_time_fails_or_skips() {
        let table = raw(&[
            ["06/01/2020 3:00 PM", "a", "m", "white"],
            ["06/02/2020", "b", "f", "black"],
        ]);

        match clean_table(&table, &CleanConfig::default()) {
            Err(UcpdError::MalformedDateTime { row, value }) => {
                assert_eq!(row, 1);
                assert_eq!(value, "06/02/2020");
            }
            other => panic!("unexpected {:?}", other),
        }

        let cfg = CleanConfig {
            skip_malformed: true,
            ..CleanConfig::default()
        };
        let (out, stats) = clean_table(&table, &cfg).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(stats.malformed, 1);
    }

    #[test]
    fn empty_scrape_cleans_to_empty_table() {
        let (out, stats) = clean_table(&RawTable::default(), &CleanConfig::default()).unwrap();
        assert_eq!(out.headers, vec!["Date", "Time"]);
        assert!(out.is_empty());
        assert_eq!(stats, CleanStats::default());
    }

    #[test]
    fn missing_race_column() {
        let table = RawTable {
            headers: vec!["Date/Time".into(), "Gender".into()],
            rows: vec![],
        };
        assert!(matches!(
            clean_table(&table, &CleanConfig::default()),
            Err(UcpdError::MissingColumn(c)) if c == "Race"
        ));
    }
}
