//! Team report.
//!
//! Renders a selection as the plain-text team sheet: one line per roster
//! member (captain first), then the points and value totals.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::fmt;
use std::path::Path;
use tracing::info;

use crate::selection::roles::RoleMultipliers;
use crate::selection::Selection;
use crate::types::{CallUp, Country, Position};

/// Role annotation on a report line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Captain,
    Supersub,
}

impl Role {
    fn prefix(&self) -> &'static str {
        match self {
            Role::Captain => "Captain: ",
            Role::Supersub => "Supersub: ",
        }
    }
}

/// One roster member as printed.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    pub role: Option<Role>,
    pub name: String,
    pub country: Country,
    pub position: Position,
    pub call_up: CallUp,
    pub value: Decimal,
    pub points: i64,
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} ({}), Position: {}, Call-up: {}, Value: {}, Points: {}",
            self.role.map_or("", |r| r.prefix()),
            self.name,
            self.country,
            self.position,
            self.call_up,
            self.value.normalize(),
            self.points,
        )
    }
}

/// The full team sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamReport {
    pub lines: Vec<ReportLine>,
    /// Roster points with captain and supersub bonuses applied.
    pub total_points: i64,
    pub total_value: Decimal,
}

impl fmt::Display for TeamReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Selected Team:")?;
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        writeln!(f, "Total Points of the Selected Team: {}", self.total_points)?;
        writeln!(f, "Total Value of the Selected Team: {}", self.total_value.normalize())
    }
}

impl TeamReport {
    pub fn build(selection: &Selection, roles: &RoleMultipliers) -> Self {
        let lines = selection
            .roster
            .iter()
            .map(|s| {
                let role = if selection.is_captain(s.pool_index) {
                    Some(Role::Captain)
                } else if selection.is_supersub(s.pool_index) {
                    Some(Role::Supersub)
                } else {
                    None
                };
                ReportLine {
                    role,
                    name: s.player.name.clone(),
                    country: s.player.country.clone(),
                    position: s.player.position.clone(),
                    call_up: s.player.call_up,
                    value: s.player.value,
                    points: s.points,
                }
            })
            .collect();

        TeamReport {
            lines,
            total_points: roles.team_points(selection),
            total_value: selection.total_spent,
        }
    }

    /// Write the rendered report to `path`, replacing any existing file.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_string())
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        info!(
            path = %path.display(),
            lines = self.lines.len(),
            total_points = self.total_points,
            "Team report written"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::{SelectedPlayer, SquadSelector};
    use crate::types::{Player, Stats};
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn make_selected(index: usize, name: &str, position: Position, call_up: CallUp, points: i64) -> SelectedPlayer {
        SelectedPlayer {
            pool_index: index,
            player: Player::new(name, Country::Scotland, dec!(7.5), position, call_up),
            points,
        }
    }

    #[test]
    fn test_line_format_plain() {
        let line = ReportLine {
            role: None,
            name: "J. Doe".into(),
            country: Country::Italy,
            position: Position::ScrumHalf,
            call_up: CallUp::Start,
            value: dec!(12.0),
            points: 17,
        };
        assert_eq!(
            line.to_string(),
            "J. Doe (Italy), Position: scrum_half, Call-up: start, Value: 12, Points: 17"
        );
    }

    #[test]
    fn test_line_format_with_role_prefix() {
        let line = ReportLine {
            role: Some(Role::Supersub),
            name: "B. Bench".into(),
            country: Country::Wales,
            position: Position::BackRow,
            call_up: CallUp::Sub,
            value: dec!(6.5),
            points: 4,
        };
        assert_eq!(
            line.to_string(),
            "Supersub: B. Bench (Wales), Position: back_row, Call-up: sub, Value: 6.5, Points: 4"
        );
    }

    #[test]
    fn test_report_labels_and_totals() {
        let captain = make_selected(0, "Cap", Position::FlyHalf, CallUp::Start, 30);
        let plain = make_selected(1, "Plain", Position::Prop, CallUp::Start, 10);
        let sub = make_selected(2, "Sub", Position::BackRow, CallUp::Sub, 5);
        let selection = Selection {
            roster: vec![captain.clone(), plain, sub.clone()],
            captain: Some(captain),
            supersub: Some(sub),
            budget: dec!(100),
            total_spent: dec!(22.5),
            country_tally: BTreeMap::new(),
        };

        let report = TeamReport::build(&selection, &RoleMultipliers::default());
        assert_eq!(report.lines[0].role, Some(Role::Captain));
        assert_eq!(report.lines[1].role, None);
        assert_eq!(report.lines[2].role, Some(Role::Supersub));
        // 45 + captain 30 + supersub 5 * 4
        assert_eq!(report.total_points, 95);

        let text = report.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Selected Team:");
        assert!(lines[1].starts_with("Captain: Cap (Scotland)"));
        assert!(lines[3].starts_with("Supersub: Sub"));
        assert_eq!(lines[4], "Total Points of the Selected Team: 95");
        assert_eq!(lines[5], "Total Value of the Selected Team: 22.5");
    }

    #[test]
    fn test_report_empty_selection() {
        let selection = SquadSelector::default().select(&[], dec!(239.8));
        let report = TeamReport::build(&selection, &RoleMultipliers::default());
        assert_eq!(
            report.to_string(),
            "Selected Team:\nTotal Points of the Selected Team: 0\nTotal Value of the Selected Team: 0\n"
        );
    }

    #[test]
    fn test_report_from_selector_output() {
        let pool = vec![
            Player::new("A", Country::England, dec!(10), Position::Hooker, CallUp::Start)
                .with_stats(Stats { tries: 2, ..Default::default() }),
            Player::new("B", Country::England, dec!(10), Position::Prop, CallUp::Start)
                .with_stats(Stats { tackles: 5, ..Default::default() }),
            Player::new("S", Country::France, dec!(3), Position::Prop, CallUp::Sub)
                .with_stats(Stats { tackles: 2, ..Default::default() }),
        ];
        let selection = SquadSelector::default().select(&pool, dec!(50));
        let report = TeamReport::build(&selection, &RoleMultipliers::default());
        // Roster A (captain), B. Supersub S sits outside the roster.
        assert_eq!(report.lines.len(), 2);
        assert_eq!(report.total_points, 20 + 5 + 20 + 8);
        assert_eq!(report.total_value, dec!(23));
    }

    #[test]
    fn test_write_to_file() {
        let mut path = std::env::temp_dir();
        path.push(format!("fantasy_report_{}.txt", uuid::Uuid::new_v4()));
        let selection = SquadSelector::default().select(&[], dec!(10));
        let report = TeamReport::build(&selection, &RoleMultipliers::default());
        report.write_to(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Selected Team:"));
        std::fs::remove_file(&path).unwrap();
    }
}
