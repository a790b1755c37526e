use crate::modules::ranking::RankedEntry;

/// column headers of the exported leaderboard, in print order
const HEADERS: &str = "Platz,Fahrer,Team,Rundenzeit,Abstand";

/// # render a ranked leaderboard as csv
/// one row per entry in rank order, crlf line endings so spreadsheet
/// imports behave.
pub fn render_leaderboard(ranked: &[RankedEntry]) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(ranked.len() + 1);
    lines.push(HEADERS.to_string());

    for entry in ranked {
        lines.push(format!(
            "{},{},{},{},{}",
            entry.rank,
            escape(&entry.entry.driver_name),
            escape(entry.entry.team.as_deref().unwrap_or("")),
            entry.entry.lap_time_display,
            entry.gap,
        ));
    }

    lines.join("\r\n") + "\r\n"
}

/// quote a field when it would break the row
fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::models::entry::LapEntry;
    use crate::modules::ranking;

    fn entry(driver: &str, team: Option<&str>, lap_time: &str) -> LapEntry {
        LapEntry {
            id: driver.to_string(),
            event_id: "event".to_string(),
            driver_name: driver.to_string(),
            team: team.map(|t| t.to_string()),
            email: None,
            lap_time_display: lap_time.to_string(),
            lap_time_ms: 0,
            created_at: chrono::NaiveDateTime::default(),
        }
    }

    #[test]
    fn renders_header_and_ranked_rows() {
        let ranked = ranking::rank(&[
            entry("Lando", Some("Papaya"), "1:24.000"),
            entry("Max", None, "1:23.456"),
        ])
        .unwrap();

        let csv = render_leaderboard(&ranked);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Platz,Fahrer,Team,Rundenzeit,Abstand");
        assert_eq!(lines[1], "1,Max,,1:23.456,-");
        assert_eq!(lines[2], "2,Lando,Papaya,1:24.000,+0.544");
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        assert_eq!(escape("Racing, Inc"), "\"Racing, Inc\"");
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn empty_board_is_just_the_header() {
        assert_eq!(render_leaderboard(&[]), "Platz,Fahrer,Team,Rundenzeit,Abstand\r\n");
    }
}
