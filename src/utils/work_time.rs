use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::model::attendance::{ClockIn, ClockOut};

/// Length of one shift, truncated to whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftLength {
    pub hours: i64,
    pub minutes: i64,
}

impl ShiftLength {
    pub fn between(clock_in: DateTime<Utc>, clock_out: DateTime<Utc>) -> Self {
        let total_minutes = (clock_out - clock_in).num_minutes();
        Self {
            hours: total_minutes / 60,
            minutes: total_minutes % 60,
        }
    }

    /// Text stored in `working_hours.hours_worked`.
    pub fn describe(&self) -> String {
        format!("{} hour(s) {} minute(s)", self.hours, self.minutes)
    }
}

/// Fractional hours between two instants.
pub fn elapsed_hours(clock_in: DateTime<Utc>, clock_out: DateTime<Utc>) -> f64 {
    (clock_out - clock_in).num_milliseconds() as f64 / 3_600_000.0
}

/// Sums elapsed hours over every clock-in that has a matching clock-out.
/// A clock-in pairs with the first clock-out referencing it; open shifts add nothing.
pub fn total_hours(clock_ins: &[ClockIn], clock_outs: &[ClockOut]) -> f64 {
    let mut closed: HashMap<u64, &ClockOut> = HashMap::with_capacity(clock_outs.len());
    for out in clock_outs {
        closed.entry(out.clock_in_id).or_insert(out);
    }

    clock_ins
        .iter()
        .filter_map(|cin| {
            closed
                .get(&cin.id)
                .map(|out| elapsed_hours(cin.clock_in_time, out.clock_out_time))
        })
        .sum()
}
