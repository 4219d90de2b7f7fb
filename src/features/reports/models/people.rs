use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Department an employee belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Department {
    Mantenimiento,
    Sistemas,
}

impl Department {
    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Mantenimiento => "mantenimiento",
            Department::Sistemas => "sistemas",
        }
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Department {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mantenimiento" => Ok(Department::Mantenimiento),
            "sistemas" => Ok(Department::Sistemas),
            other => Err(format!("Unknown department '{}'", other)),
        }
    }
}

/// The user who filed a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Requester {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Maintenance or systems employee that reports are assigned to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department: Department,
    pub title: String,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.last_name).trim().to_string()
    }
}
