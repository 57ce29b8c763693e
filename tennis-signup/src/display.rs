use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::schedule::{court_label, Player, Schedule, SessionClock};

/// Schedule transposed for display: one row per session, one column per court
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ScheduleTable {
    pub fn from_schedule(schedule: &Schedule, clock: &SessionClock) -> Self {
        let mut header = vec!["Time".to_string()];
        header.extend((0..schedule.num_courts()).map(court_label));

        let rows = schedule
            .sessions()
            .iter()
            .map(|session| {
                let mut row = vec![clock.label(session.index)];
                row.extend(session.courts.iter().map(|court| court.to_string()));
                row
            })
            .collect();

        ScheduleTable { header, rows }
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.header.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths
    }

    /// Renders as aligned plain text, columns separated by " | "
    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let widths = self.column_widths();
        let line = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        };

        writeln!(out, "{}", line(&self.header[..]))?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(out, "{}", rule.join("-+-"))?;
        for row in &self.rows {
            writeln!(out, "{}", line(&row[..]))?;
        }
        Ok(())
    }
}

pub fn format_substitutes(substitutes: &[Player]) -> String {
    substitutes
        .iter()
        .map(Player::name)
        .collect::<Vec<_>>()
        .join(", ")
}

fn write_report<W: Write>(
    out: &mut W,
    title: &str,
    table: &ScheduleTable,
    substitutes: &[Player],
) -> io::Result<()> {
    writeln!(out, "** {} **", title)?;
    table.render(out)?;
    if !substitutes.is_empty() {
        writeln!(out, "Substitutes: {}", format_substitutes(substitutes))?;
    }
    Ok(())
}

/// Writes the schedule table, headed by the event title, to a text file
pub fn write_schedule_to_file(
    title: &str,
    table: &ScheduleTable,
    substitutes: &[Player],
    path: &Path,
) -> io::Result<()> {
    let mut file = File::create(path)?;
    write_report(&mut file, title, table, substitutes)
}

/// Prints the schedule table in a readable format
pub fn print_schedule(title: &str, table: &ScheduleTable, substitutes: &[Player]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out)?;
    write_report(&mut out, title, table, substitutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ScheduleGenerator;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn table() -> (Schedule, ScheduleTable) {
        let players: Vec<Player> = (1..=8).map(|i| Player::new(format!("P{}", i))).collect();
        let schedule = ScheduleGenerator::default()
            .generate(&players, 2, &mut StdRng::seed_from_u64(11))
            .unwrap();
        let table = ScheduleTable::from_schedule(&schedule, &SessionClock::default());
        (schedule, table)
    }

    #[test]
    fn table_is_transposed() {
        let (schedule, table) = table();
        assert_eq!(table.header, vec!["Time", "Court A", "Court B"]);
        assert_eq!(table.rows.len(), 4);
        assert_eq!(table.rows[0][0], "4:00-4:30 PM");
        assert_eq!(table.rows[3][0], "5:30-6:00 PM");

        let first = &schedule.sessions()[1].courts[1];
        let [a, b, c, d] = first.players();
        assert_eq!(table.rows[1][2], format!("{} & {} vs {} & {}", a, b, c, d));
    }

    #[test]
    fn report_lists_substitutes() {
        let (_, table) = table();
        let mut out = Vec::new();
        write_report(
            &mut out,
            "Saturday, June 01, 2024",
            &table,
            &[Player::new("Sub One"), Player::new("Sub Two")],
        )
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "** Saturday, June 01, 2024 **");
        assert!(lines[1].starts_with("Time"));
        assert!(lines[1].contains("| Court A"));
        assert_eq!(lines.len(), 1 + 2 + 4 + 1);
        assert_eq!(lines[7], "Substitutes: Sub One, Sub Two");
    }

    #[test]
    fn file_report_omits_empty_substitutes() {
        let (_, table) = table();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.txt");
        write_schedule_to_file("Event", &table, &[], &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains("Substitutes"));
        assert_eq!(text.lines().count(), 1 + 2 + 4);
    }
}
