use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

/// Permission level carried by every employee and every token.
#[derive(
    Debug,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }
}

// Lets sqlx decode the VARCHAR `role` column straight into the enum.
impl TryFrom<String> for Role {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_uses_lowercase_names_everywhere() {
        assert_eq!(Role::Admin.as_ref(), "admin");
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(Role::try_from("superuser".to_string()).is_err());
        assert!(serde_json::from_str::<Role>("true").is_err());
    }
}
