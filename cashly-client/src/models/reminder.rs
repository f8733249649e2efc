use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[cfg(feature = "graphql")]
use async_graphql::{Enum, SimpleObject};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[cfg_attr(feature = "graphql", derive(Enum))]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReminderKind {
    /// Money the user owes
    Payment,
    /// Money owed to the user
    Receivable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(SimpleObject))]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: i64,
    pub title: String,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub kind: ReminderKind,
    #[serde(default)]
    pub is_done: bool,
}

impl Reminder {
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_done && self.due_date < today
    }

    pub fn days_left(&self, today: NaiveDate) -> i64 {
        (self.due_date - today).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reminder(due_date: &str, is_done: bool) -> Reminder {
        Reminder {
            id: 1,
            title: "Rent".to_string(),
            amount: 750.0,
            due_date: NaiveDate::parse_from_str(due_date, "%Y-%m-%d").unwrap(),
            kind: ReminderKind::Payment,
            is_done,
        }
    }

    #[test]
    fn test_overdue_only_when_not_done() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();

        assert!(reminder("2024-03-01", false).is_overdue(today));
        assert!(!reminder("2024-03-01", true).is_overdue(today));
        assert!(!reminder("2024-03-15", false).is_overdue(today));
        assert_eq!(reminder("2024-03-15", false).days_left(today), 5);
    }

    #[test]
    fn test_deserialize_receivable() {
        let reminder: Reminder = serde_json::from_str(
            r#"{ "id": 3, "title": "Loan to Sam", "amount": 50, "dueDate": "2024-04-01", "kind": "receivable" }"#,
        )
        .unwrap();

        assert_eq!(reminder.kind, ReminderKind::Receivable);
        assert!(!reminder.is_done);
    }
}
