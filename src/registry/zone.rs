use std::collections::HashMap;

use chrono::{DateTime, Offset, TimeZone, Utc};
use chrono_tz::{Tz, TZ_VARIANTS};
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct Zone {
    pub id: &'static str,
    pub name: String,
    /// Offset from UTC in minutes at the time the list was built.
    pub offset: i32,
}

/// Every zone in the tz database.
pub struct Zones {
    by_id: HashMap<&'static str, Tz>,
}

impl Zones {
    pub fn new() -> Self {
        let by_id = TZ_VARIANTS.iter().map(|tz| (tz.name(), *tz)).collect();
        Self { by_id }
    }

    pub fn by_id(&self, id: &str) -> Option<Tz> {
        self.by_id.get(id).copied()
    }

    /// All zones with their offsets at `now`, ordered by offset, then id.
    pub fn list(&self, now: DateTime<Utc>) -> Vec<Zone> {
        let mut list: Vec<Zone> = self
            .by_id
            .values()
            .map(|tz| {
                let offset = tz
                    .offset_from_utc_datetime(&now.naive_utc())
                    .fix()
                    .local_minus_utc()
                    / 60;
                Zone {
                    id: tz.name(),
                    name: format!("(UTC{}) {}", format_offset(offset), tz.name().replace('_', " ")),
                    offset,
                }
            })
            .collect();
        list.sort_by(|a, b| a.offset.cmp(&b.offset).then_with(|| a.id.cmp(b.id)));
        list
    }
}

fn format_offset(minutes: i32) -> String {
    let sign = if minutes < 0 { '-' } else { '+' };
    let abs = minutes.abs();
    format!("{}{:02}:{:02}", sign, abs / 60, abs % 60)
}
