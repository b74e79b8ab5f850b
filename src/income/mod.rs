//! Monthly income report over the trailing twelve months.
//!
//! Income is attributed to the month of a completed project's deadline. Projects that
//! are still active, whose deadline is not a `YYYY-MM-DD` date, or whose deadline
//! month lies outside the window are left out of the report without error.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{Project, ProjectStatus};

/// Number of months covered by a report.
pub const WINDOW_MONTHS: usize = 12;

/// Income earned in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthIncome {
    /// Display label such as `"Jan 2024"`.
    pub label: String,
    pub year: i32,
    /// Calendar month, 1 to 12.
    pub month: u32,
    pub income: f64,
    /// One `"name ($cost)"` entry per contributing project.
    pub projects: Vec<String>,
}

/// Income per month for the trailing window, oldest month first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeReport {
    pub months: Vec<MonthIncome>,
    /// Largest monthly income, used to scale charts. Zero for an empty report.
    pub max: f64,
    pub total: f64,
    /// `total` spread over every month of the window, including empty ones.
    pub average: f64,
}

impl IncomeReport {
    pub fn month(&self, year: i32, month: u32) -> Option<&MonthIncome> {
        self.months
            .iter()
            .find(|m| m.year == year && m.month == month)
    }
}

/// Build the report for the twelve months ending with the month of `today`.
pub fn monthly_income<'a>(
    projects: impl IntoIterator<Item = &'a Project>,
    today: NaiveDate,
) -> IncomeReport {
    let last = month_index(today.year(), today.month());
    let first = last - (WINDOW_MONTHS as i32 - 1);

    let mut months: Vec<MonthIncome> = (first..=last)
        .map(|index| {
            let (year, month) = (index.div_euclid(12), index.rem_euclid(12) as u32 + 1);
            MonthIncome {
                label: NaiveDate::from_ymd_opt(year, month, 1)
                    .map(|d| d.format("%b %Y").to_string())
                    .unwrap_or_default(),
                year,
                month,
                income: 0.0,
                projects: Vec::new(),
            }
        })
        .collect();

    for project in projects {
        if project.status != ProjectStatus::Completed {
            continue;
        }
        let Ok(deadline) = NaiveDate::parse_from_str(&project.deadline, "%Y-%m-%d") else {
            tracing::debug!(
                "Skipping project {} with unparseable deadline {:?}",
                project.id,
                project.deadline
            );
            continue;
        };

        let index = month_index(deadline.year(), deadline.month());
        if !(first..=last).contains(&index) {
            continue;
        }

        let bucket = &mut months[(index - first) as usize];
        bucket.income += project.cost;
        bucket
            .projects
            .push(format!("{} (${:.2})", project.name, project.cost));
    }

    let max = months.iter().map(|m| m.income).fold(0.0, f64::max);
    let total: f64 = months.iter().map(|m| m.income).sum();

    IncomeReport {
        months,
        max,
        total,
        average: total / WINDOW_MONTHS as f64,
    }
}

/// [`monthly_income`] for the current local date.
pub fn monthly_income_now<'a>(projects: impl IntoIterator<Item = &'a Project>) -> IncomeReport {
    monthly_income(projects, Local::now().date_naive())
}

/// Months since year zero, so consecutive calendar months differ by one.
fn month_index(year: i32, month: u32) -> i32 {
    year * 12 + month as i32 - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn project(id: u32, name: &str, cost: f64, deadline: &str, status: ProjectStatus) -> Project {
        Project {
            id,
            name: name.to_string(),
            client: "Client".to_string(),
            cost,
            deadline: deadline.to_string(),
            status,
            created_at: Utc::now(),
            tasks: Vec::new(),
            last_task_id: 0,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_labels_oldest_first() {
        let report = monthly_income(&Vec::<Project>::new(), date(2024, 3, 31));
        let labels: Vec<&str> = report.months.iter().map(|m| m.label.as_str()).collect();

        assert_eq!(labels.len(), WINDOW_MONTHS);
        assert_eq!(labels[0], "Apr 2023");
        assert_eq!(labels[10], "Feb 2024");
        assert_eq!(labels[11], "Mar 2024");
    }

    #[test]
    fn test_window_crosses_year_boundary_in_january() {
        let report = monthly_income(&Vec::<Project>::new(), date(2025, 1, 1));
        assert_eq!(report.months[0].label, "Feb 2024");
        assert_eq!(report.months[10].label, "Dec 2024");
        assert_eq!(report.months[11].label, "Jan 2025");
    }

    #[test]
    fn test_completed_project_counts_in_deadline_month() {
        let projects = vec![project(1, "Website", 500.0, "2024-03-15", ProjectStatus::Completed)];
        let report = monthly_income(&projects, date(2024, 6, 10));

        let march = report.month(2024, 3).unwrap();
        assert_eq!(march.income, 500.0);
        assert_eq!(march.projects, vec!["Website ($500.00)".to_string()]);
        assert_eq!(report.max, 500.0);
        assert_eq!(report.total, 500.0);
    }

    #[test]
    fn test_active_project_contributes_nothing() {
        let projects = vec![project(1, "Website", 500.0, "2024-03-15", ProjectStatus::Active)];
        let report = monthly_income(&projects, date(2024, 6, 10));

        assert_eq!(report.month(2024, 3).unwrap().income, 0.0);
        assert!(report.month(2024, 3).unwrap().projects.is_empty());
        assert_eq!(report.max, 0.0);
        assert_eq!(report.total, 0.0);
    }

    #[test]
    fn test_skips_bad_and_out_of_window_deadlines() {
        let projects = vec![
            project(1, "Garbled", 100.0, "15/03/2024", ProjectStatus::Completed),
            project(2, "Empty", 100.0, "", ProjectStatus::Completed),
            project(3, "Too old", 100.0, "2023-03-31", ProjectStatus::Completed),
            project(4, "Future", 100.0, "2024-04-01", ProjectStatus::Completed),
        ];
        let report = monthly_income(&projects, date(2024, 3, 1));

        assert_eq!(report.total, 0.0);
        assert!(report.months.iter().all(|m| m.projects.is_empty()));
    }

    #[test]
    fn test_totals_and_average_over_twelve_months() {
        let projects = vec![
            project(1, "A", 1200.0, "2024-01-05", ProjectStatus::Completed),
            project(2, "B", 300.5, "2024-01-20", ProjectStatus::Completed),
            project(3, "C", 900.0, "2023-11-30", ProjectStatus::Completed),
        ];
        let report = monthly_income(&projects, date(2024, 2, 29));

        let january = report.month(2024, 1).unwrap();
        assert_eq!(january.income, 1500.5);
        assert_eq!(
            january.projects,
            vec!["A ($1200.00)".to_string(), "B ($300.50)".to_string()]
        );
        assert_eq!(report.max, 1500.5);
        assert_eq!(report.total, 2400.5);
        assert_eq!(report.average, 2400.5 / 12.0);
    }
}
