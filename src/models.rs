//! Record kinds managed by the roster.

use chrono::{Local, NaiveDateTime};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::input::parse_datetime;
use crate::schema::{unknown_field, FieldDescriptor, FieldType, FieldValue, Record};
use crate::Result;

/// Reads `null` as the type's zero value.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts RFC 3339 with any fraction length (offset dropped) or a naive timestamp.
fn lenient_datetime<'de, D>(deserializer: D) -> std::result::Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(NaiveDateTime::default()),
        Some(raw) if raw.trim().is_empty() => Ok(NaiveDateTime::default()),
        Some(raw) => parse_datetime(raw.trim())
            .ok_or_else(|| de::Error::custom(format!("invalid date and time {:?}", raw))),
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct Player {
    #[serde(rename = "Player_Id", deserialize_with = "null_as_default")]
    pub player_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub team: String,
    #[serde(deserialize_with = "null_as_default")]
    pub age: i64,
    #[serde(deserialize_with = "lenient_datetime")]
    pub date_added: NaiveDateTime,
}

const PLAYER_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("Player_Id", FieldType::Integer)
        .with_prompt("Id")
        .required()
        .ignored()
        .key(),
    FieldDescriptor::new("FirstName", FieldType::Text)
        .with_prompt("First Name")
        .required(),
    FieldDescriptor::new("LastName", FieldType::Text)
        .with_prompt("Last Name")
        .required(),
    FieldDescriptor::new("Team", FieldType::Text).required(),
    FieldDescriptor::new("Age", FieldType::Integer)
        .required()
        .with_min_value(1),
    FieldDescriptor::new("DateAdded", FieldType::DateTime)
        .with_prompt("Date Added")
        .required()
        .ignored(),
];

impl Record for Player {
    const KIND: &'static str = "Player";

    fn fields() -> &'static [FieldDescriptor] {
        PLAYER_FIELDS
    }

    fn field_value(&self, name: &str) -> Option<FieldValue> {
        match name {
            "Player_Id" => Some(FieldValue::Integer(self.player_id)),
            "FirstName" => Some(FieldValue::Text(self.first_name.clone())),
            "LastName" => Some(FieldValue::Text(self.last_name.clone())),
            "Team" => Some(FieldValue::Text(self.team.clone())),
            "Age" => Some(FieldValue::Integer(self.age)),
            "DateAdded" => Some(FieldValue::DateTime(self.date_added)),
            _ => None,
        }
    }

    fn set_field_value(&mut self, name: &str, value: FieldValue) -> Result<()> {
        match (name, value) {
            ("Player_Id", FieldValue::Integer(v)) => self.player_id = v,
            ("FirstName", FieldValue::Text(v)) => self.first_name = v,
            ("LastName", FieldValue::Text(v)) => self.last_name = v,
            ("Team", FieldValue::Text(v)) => self.team = v,
            ("Age", FieldValue::Integer(v)) => self.age = v,
            ("DateAdded", FieldValue::DateTime(v)) => self.date_added = v,
            (field, _) => return Err(unknown_field::<Self>(field)),
        }
        Ok(())
    }

    fn before_add(&mut self) {
        self.date_added = Local::now().naive_local();
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct Team {
    #[serde(rename = "Team_Id", deserialize_with = "null_as_default")]
    pub team_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub team_name: String,
}

const TEAM_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("Team_Id", FieldType::Integer)
        .with_prompt("Id")
        .required()
        .ignored()
        .key(),
    FieldDescriptor::new("TeamName", FieldType::Text),
];

impl Record for Team {
    const KIND: &'static str = "Team";

    fn fields() -> &'static [FieldDescriptor] {
        TEAM_FIELDS
    }

    fn field_value(&self, name: &str) -> Option<FieldValue> {
        match name {
            "Team_Id" => Some(FieldValue::Integer(self.team_id)),
            "TeamName" => Some(FieldValue::Text(self.team_name.clone())),
            _ => None,
        }
    }

    fn set_field_value(&mut self, name: &str, value: FieldValue) -> Result<()> {
        match (name, value) {
            ("Team_Id", FieldValue::Integer(v)) => self.team_id = v,
            ("TeamName", FieldValue::Text(v)) => self.team_name = v,
            (field, _) => return Err(unknown_field::<Self>(field)),
        }
        Ok(())
    }
}
