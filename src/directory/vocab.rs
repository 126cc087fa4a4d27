//! Known schedule, shift and role codes with their Russian display labels.

use std::borrow::Cow;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Types with a human-readable label.
pub trait Labeled {
    fn label(&self) -> &'static str;
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum WorkSchedule {
    Default,
    ShiftSchedule,
}

impl Labeled for WorkSchedule {
    fn label(&self) -> &'static str {
        match self {
            Self::Default => "Стандартный",
            Self::ShiftSchedule => "Сменный",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ShiftPreference {
    Morning,
    Day,
    Night,
    Mixed,
}

impl Labeled for ShiftPreference {
    fn label(&self) -> &'static str {
        match self {
            Self::Morning => "Утренняя",
            Self::Day => "Дневная",
            Self::Night => "Ночная",
            Self::Mixed => "Любая",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Employee,
    Teamlead,
    Intern,
}

impl Labeled for UserRole {
    fn label(&self) -> &'static str {
        match self {
            Self::Employee => "Сотрудник",
            Self::Teamlead => "Тимлид",
            Self::Intern => "Стажёр",
        }
    }
}

/// Label for a wire code, or the code itself when it is not a known `T`.
pub fn label_for<T>(value: &str) -> Cow<'_, str>
where
    T: FromStr + Labeled,
{
    match value.parse::<T>() {
        Ok(known) => Cow::Borrowed(known.label()),
        Err(_) => Cow::Borrowed(value),
    }
}
