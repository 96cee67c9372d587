use std::fmt;

use crate::error::FetchError;

pub const USERNAME_VAR: &str = "NGENIX_USERNAME";
pub const PASSWORD_VAR: &str = "NGENIX_PASSWORD";
pub const CONFIG_ID_VAR: &str = "NGENIX_CONFIG_ID";

/// Basic-auth pair plus the upstream configuration being queried.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub config_id: u64,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("config_id", &self.config_id)
            .finish()
    }
}

/// Where a poller gets its credentials from on every tick.
pub trait CredentialSource: Send + Sync + 'static {
    fn load(&self) -> Result<Credentials, FetchError>;
}

impl CredentialSource for Credentials {
    fn load(&self) -> Result<Credentials, FetchError> {
        Ok(self.clone())
    }
}

type Lookup = fn(&str) -> Option<String>;

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Reads `NGENIX_*` variables each time it is asked, so credentials can be
/// rotated without a restart.
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    lookup: Lookup,
    config_id_override: Option<u64>,
}

impl EnvCredentials {
    pub fn new(config_id_override: Option<u64>) -> Self {
        Self::with_lookup(process_env, config_id_override)
    }

    pub fn with_lookup(lookup: Lookup, config_id_override: Option<u64>) -> Self {
        Self {
            lookup,
            config_id_override,
        }
    }

    fn var(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.is_empty())
    }
}

impl CredentialSource for EnvCredentials {
    fn load(&self) -> Result<Credentials, FetchError> {
        let (Some(username), Some(password)) = (self.var(USERNAME_VAR), self.var(PASSWORD_VAR))
        else {
            return Err(FetchError::MissingCredentials);
        };

        let config_id = match self.config_id_override {
            Some(id) => id,
            None => {
                let raw = self.var(CONFIG_ID_VAR).ok_or(FetchError::MissingConfigId)?;
                raw.trim()
                    .parse()
                    .map_err(|_| FetchError::InvalidConfigId(raw))?
            }
        };

        Ok(Credentials {
            username,
            password,
            config_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full(key: &str) -> Option<String> {
        match key {
            USERNAME_VAR => Some("user".into()),
            PASSWORD_VAR => Some("secret".into()),
            CONFIG_ID_VAR => Some("91051".into()),
            _ => None,
        }
    }

    fn no_password(key: &str) -> Option<String> {
        match key {
            PASSWORD_VAR => Some(String::new()),
            other => full(other),
        }
    }

    fn no_config_id(key: &str) -> Option<String> {
        match key {
            CONFIG_ID_VAR => None,
            other => full(other),
        }
    }

    fn bad_config_id(key: &str) -> Option<String> {
        match key {
            CONFIG_ID_VAR => Some("abc".into()),
            other => full(other),
        }
    }

    #[test]
    fn loads_all_three_values() {
        let creds = EnvCredentials::with_lookup(full, None).load().unwrap();
        assert_eq!(creds.username, "user");
        assert_eq!(creds.password, "secret");
        assert_eq!(creds.config_id, 91051);
    }

    #[test]
    fn empty_password_counts_as_missing() {
        let err = EnvCredentials::with_lookup(no_password, None).load().unwrap_err();
        assert!(matches!(err, FetchError::MissingCredentials));
    }

    #[test]
    fn missing_config_id_is_an_error() {
        let err = EnvCredentials::with_lookup(no_config_id, None).load().unwrap_err();
        assert!(matches!(err, FetchError::MissingConfigId));
    }

    #[test]
    fn override_replaces_env_config_id() {
        let creds = EnvCredentials::with_lookup(no_config_id, Some(7)).load().unwrap();
        assert_eq!(creds.config_id, 7);
    }

    #[test]
    fn non_numeric_config_id_is_rejected() {
        let err = EnvCredentials::with_lookup(bad_config_id, None).load().unwrap_err();
        assert!(matches!(err, FetchError::InvalidConfigId(ref raw) if raw == "abc"));
    }

    #[test]
    fn debug_output_hides_password() {
        let creds = EnvCredentials::with_lookup(full, None).load().unwrap();
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
