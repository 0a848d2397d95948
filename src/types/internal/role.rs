use poem_openapi::Enum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The five account roles known to the application
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[oai(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    Inspector,
    Founder,
    Admin,
    /// Surveillant Général (general supervisor)
    Sg,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Teacher,
        Role::Inspector,
        Role::Founder,
        Role::Admin,
        Role::Sg,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Teacher => "teacher",
            Role::Inspector => "inspector",
            Role::Founder => "founder",
            Role::Admin => "admin",
            Role::Sg => "sg",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Dashboard a user lands on after login
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardRoute {
    Teacher,
    Inspector,
    Founder,
    Admin,
    Sg,
    /// Role string did not match any known role; sends the user back to login
    Unrecognized,
}

impl DashboardRoute {
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Teacher => DashboardRoute::Teacher,
            Role::Inspector => DashboardRoute::Inspector,
            Role::Founder => DashboardRoute::Founder,
            Role::Admin => DashboardRoute::Admin,
            Role::Sg => DashboardRoute::Sg,
        }
    }

    pub fn for_role_str(raw: &str) -> Self {
        raw.parse::<Role>()
            .map(Self::for_role)
            .unwrap_or(DashboardRoute::Unrecognized)
    }

    pub fn path(&self) -> &'static str {
        match self {
            DashboardRoute::Teacher => "/teacher",
            DashboardRoute::Inspector => "/inspector",
            DashboardRoute::Founder => "/founder",
            DashboardRoute::Admin => "/admin",
            DashboardRoute::Sg => "/sg",
            DashboardRoute::Unrecognized => "/login",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        assert!("principal".parse::<Role>().is_err());
        assert!("Admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_each_role_has_its_own_dashboard() {
        let paths: Vec<&str> = Role::ALL
            .into_iter()
            .map(|role| DashboardRoute::for_role(role).path())
            .collect();

        assert_eq!(paths, vec!["/teacher", "/inspector", "/founder", "/admin", "/sg"]);
    }

    #[test]
    fn test_unrecognized_role_falls_back_to_login() {
        assert_eq!(DashboardRoute::for_role_str("janitor"), DashboardRoute::Unrecognized);
        assert_eq!(DashboardRoute::for_role_str(""), DashboardRoute::Unrecognized);
        assert_eq!(DashboardRoute::Unrecognized.path(), "/login");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Sg).unwrap(), "\"sg\"");
        assert_eq!(serde_json::from_str::<Role>("\"founder\"").unwrap(), Role::Founder);
    }
}
