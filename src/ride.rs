//! Daily bus ridership records and queries over them.

use crate::error::{Result, TabulateError};
use crate::record::{FromRow, Row, expect_int, expect_text, take_values};
use crate::value::{FieldType, Value};
use std::collections::HashSet;

/// Ridership for one route on one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ride {
    pub route: String,
    pub date: String,
    pub daytype: String,
    pub rides: u64,
}

impl FromRow for Ride {
    const FIELDS: &'static [&'static str] = &["route", "date", "daytype", "rides"];
    const TYPES: &'static [FieldType] = &[
        FieldType::Text,
        FieldType::Text,
        FieldType::Text,
        FieldType::Integer,
    ];

    fn from_values(values: Vec<Value>) -> Result<Self> {
        let [route, date, daytype, rides] = take_values(values)?;
        let rides = expect_int("rides", rides)?;
        let rides = u64::try_from(rides).map_err(|_| TabulateError::InvalidFieldValue {
            field: "rides",
            reason: format!("rides must be >= 0, got {rides}"),
        })?;
        Ok(Ride {
            route: expect_text("route", route)?,
            date: expect_text("date", date)?,
            daytype: expect_text("daytype", daytype)?,
            rides,
        })
    }

    fn to_row(&self) -> Row {
        Row::new()
            .with("route", self.route.as_str())
            .with("date", self.date.as_str())
            .with("daytype", self.daytype.as_str())
            .with("rides", self.rides as i64)
    }
}

/// Number of distinct routes.
pub fn route_count(rides: &[Ride]) -> usize {
    rides
        .iter()
        .map(|r| r.route.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Total rides on `route`, optionally limited to one `date`.
pub fn rides_on_route(rides: &[Ride], route: &str, date: Option<&str>) -> u64 {
    rides
        .iter()
        .filter(|r| r.route == route && date.is_none_or(|d| r.date == d))
        .map(|r| r.rides)
        .sum()
}
