// Upstream payload shapes. Unknown fields are ignored throughout.

use serde::{Deserialize, Serialize};

/// A user as returned by the auth admin API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: String,
    /// Null for phone-only users
    #[serde(default)]
    pub email: Option<String>,
    /// Enrolled MFA factors; the API omits the field for users with none
    #[serde(default)]
    pub factors: Option<Vec<Factor>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub factor_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub friendly_name: Option<String>,
}

/// One page of `GET /auth/v1/admin/users`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPage {
    #[serde(default)]
    pub users: Vec<User>,
}

/// A project as listed by the management API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Row of `SELECT tablename, rowsecurity FROM pg_catalog.pg_tables`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub tablename: String,
    pub rowsecurity: bool,
}

/// `GET /v1/projects/{ref}/database/backups`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackupStatus {
    #[serde(default)]
    pub pitr_enabled: Option<bool>,
}
