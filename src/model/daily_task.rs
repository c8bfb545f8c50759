use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Partial,
    Done,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct DailyTask {
    pub id: u64,
    pub seamstress_id: u64,
    pub seamstress_name: Option<String>,
    pub task_date: NaiveDate,
    pub task_description: String,
    pub notes: Option<String>,
    #[schema(example = "pending")]
    pub status: String,
    pub created_by: u64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct TaskCounts {
    pub done: usize,
    pub partial: usize,
    pub pending: usize,
}

impl TaskCounts {
    /// Unknown status strings count as pending.
    pub fn tally<'a, I: IntoIterator<Item = &'a DailyTask>>(tasks: I) -> Self {
        tasks.into_iter().fold(Self::default(), |mut acc, t| {
            match t.status.parse::<TaskStatus>() {
                Ok(TaskStatus::Done) => acc.done += 1,
                Ok(TaskStatus::Partial) => acc.partial += 1,
                _ => acc.pending += 1,
            }
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(status: &str) -> DailyTask {
        let at = NaiveDate::from_ymd_opt(2025, 6, 2)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        DailyTask {
            id: 1,
            seamstress_id: 4,
            seamstress_name: None,
            task_date: at.date(),
            task_description: "Hem 40 skirts".into(),
            notes: None,
            status: status.into(),
            created_by: 1,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn tally_by_status() {
        let tasks = vec![task("done"), task("partial"), task("pending"), task("done"), task("??")];
        assert_eq!(
            TaskCounts::tally(&tasks),
            TaskCounts {
                done: 2,
                partial: 1,
                pending: 2
            }
        );
    }
}
