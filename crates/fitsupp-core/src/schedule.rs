/// Weekly schedule: each of the seven weekdays holds a workout id or rests.
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::workout::WorkoutId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Weekday {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Weekday::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| CoreError::UnknownDay(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScheduleStats {
    pub active_workout_days: usize,
    pub rest_days: usize,
    pub unique_workouts_used: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklySchedule {
    days: [Option<WorkoutId>; 7],
}

impl WeeklySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, day: Weekday) -> Option<&WorkoutId> {
        self.days[day.index()].as_ref()
    }

    /// Assign a workout to `day`, replacing whatever was there.
    pub fn assign(&mut self, day: Weekday, workout_id: impl Into<WorkoutId>) {
        self.days[day.index()] = Some(workout_id.into());
    }

    /// Make `day` a rest day.
    pub fn clear(&mut self, day: Weekday) {
        self.days[day.index()] = None;
    }

    /// Rest every day that references `workout_id`. Returns how many days changed.
    pub fn clear_workout(&mut self, workout_id: &str) -> usize {
        let mut cleared = 0;
        for slot in self.days.iter_mut() {
            if slot.as_deref() == Some(workout_id) {
                *slot = None;
                cleared += 1;
            }
        }
        cleared
    }

    /// Monday first.
    pub fn entries(&self) -> impl Iterator<Item = (Weekday, Option<&WorkoutId>)> {
        Weekday::ALL
            .into_iter()
            .zip(self.days.iter())
            .map(|(day, slot)| (day, slot.as_ref()))
    }

    pub fn stats(&self) -> ScheduleStats {
        let assigned: Vec<&WorkoutId> = self.days.iter().flatten().collect();
        let unique: HashSet<&WorkoutId> = assigned.iter().copied().collect();
        ScheduleStats {
            active_workout_days: assigned.len(),
            rest_days: self.days.len() - assigned.len(),
            unique_workouts_used: unique.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_schedule_is_all_rest() {
        let schedule = WeeklySchedule::new();
        assert_eq!(schedule.entries().count(), 7);
        assert!(schedule.entries().all(|(_, w)| w.is_none()));
        assert_eq!(
            schedule.stats(),
            ScheduleStats {
                active_workout_days: 0,
                rest_days: 7,
                unique_workouts_used: 0,
            }
        );
    }

    #[test]
    fn stats_partition_the_week_for_every_combination() {
        for mask in 0u32..(1 << 7) {
            let mut schedule = WeeklySchedule::new();
            for (i, day) in Weekday::ALL.into_iter().enumerate() {
                if mask & (1 << i) != 0 {
                    // Alternate between two workouts to exercise the distinct count.
                    schedule.assign(day, if i % 2 == 0 { "push" } else { "pull" });
                }
            }
            let stats = schedule.stats();
            assert_eq!(stats.active_workout_days + stats.rest_days, 7);
            assert_eq!(stats.active_workout_days, mask.count_ones() as usize);
            assert!(stats.unique_workouts_used <= 2);
        }
    }

    #[test]
    fn unique_workouts_counts_distinct_ids() {
        let mut schedule = WeeklySchedule::new();
        schedule.assign(Weekday::Monday, "upper");
        schedule.assign(Weekday::Wednesday, "lower");
        schedule.assign(Weekday::Friday, "upper");
        let stats = schedule.stats();
        assert_eq!(stats.active_workout_days, 3);
        assert_eq!(stats.rest_days, 4);
        assert_eq!(stats.unique_workouts_used, 2);
    }

    #[test]
    fn assign_then_clear_round_trips() {
        let mut schedule = WeeklySchedule::new();
        schedule.assign(Weekday::Tuesday, "legs");
        let before = schedule.clone();

        schedule.assign(Weekday::Thursday, "arms");
        schedule.clear(Weekday::Thursday);
        assert_eq!(schedule, before);
    }

    #[test]
    fn assign_overwrites() {
        let mut schedule = WeeklySchedule::new();
        schedule.assign(Weekday::Sunday, "a");
        schedule.assign(Weekday::Sunday, "b");
        assert_eq!(schedule.get(Weekday::Sunday).map(String::as_str), Some("b"));
        assert_eq!(schedule.stats().active_workout_days, 1);
    }

    #[test]
    fn clear_workout_removes_every_reference() {
        let mut schedule = WeeklySchedule::new();
        schedule.assign(Weekday::Monday, "full-body");
        schedule.assign(Weekday::Thursday, "full-body");
        schedule.assign(Weekday::Saturday, "cardio");
        assert_eq!(schedule.clear_workout("full-body"), 2);
        assert_eq!(schedule.stats().active_workout_days, 1);
        assert_eq!(schedule.clear_workout("missing"), 0);
    }

    #[test]
    fn weekday_parsing() {
        assert_eq!("monday".parse::<Weekday>(), Ok(Weekday::Monday));
        assert_eq!(" SUNDAY ".parse::<Weekday>(), Ok(Weekday::Sunday));
        assert_eq!(
            "Funday".parse::<Weekday>(),
            Err(CoreError::UnknownDay("Funday".to_string()))
        );
    }
}
