//! Request credentials.
//!
//! A signer asks a [`Credentials`] value for its key pair. Absent keys mean
//! the request goes out unsigned; [`AnonymousCredentials`] is the value that
//! always answers that way.

use crate::ClientError;

/// Environment variable holding the access key id.
pub const ACCESS_KEY_ENV: &str = "AWS_ACCESS_KEY_ID";

/// Environment variable holding the secret key.
pub const SECRET_KEY_ENV: &str = "AWS_SECRET_ACCESS_KEY";

/// Older name of [`SECRET_KEY_ENV`], still honored.
pub const ALTERNATE_SECRET_KEY_ENV: &str = "AWS_SECRET_KEY";

/// Capability of supplying an access key pair.
pub trait Credentials: Send + Sync {
    /// Access key id, or `None` for anonymous access.
    fn access_key_id(&self) -> Option<&str>;

    /// Secret access key, or `None` for anonymous access.
    fn secret_key(&self) -> Option<&str>;
}

/// Whether a request made with `credentials` should be signed.
pub fn should_sign(credentials: &dyn Credentials) -> bool {
    credentials.access_key_id().is_some() && credentials.secret_key().is_some()
}

/// Credentials that never sign.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnonymousCredentials;

impl Credentials for AnonymousCredentials {
    fn access_key_id(&self) -> Option<&str> {
        None
    }

    fn secret_key(&self) -> Option<&str> {
        None
    }
}

/// A fixed key pair.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    access_key_id: String,
    secret_key: String,
}

impl BasicCredentials {
    pub fn new<A: Into<String>, S: Into<String>>(access_key_id: A, secret_key: S) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_key: secret_key.into(),
        }
    }
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_key", &"***")
            .finish()
    }
}

impl Credentials for BasicCredentials {
    fn access_key_id(&self) -> Option<&str> {
        Some(&self.access_key_id)
    }

    fn secret_key(&self) -> Option<&str> {
        Some(&self.secret_key)
    }
}

/// Key pair read from the process environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnvironmentCredentials(BasicCredentials);

impl EnvironmentCredentials {
    /// Read `AWS_ACCESS_KEY_ID` and `AWS_SECRET_ACCESS_KEY` (or `AWS_SECRET_KEY`).
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the key pair through `lookup`, which maps a variable name to its value.
    ///
    /// Values are trimmed; blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let access_key_id = read(ACCESS_KEY_ENV);
        let secret_key = read(SECRET_KEY_ENV).or_else(|| read(ALTERNATE_SECRET_KEY_ENV));

        match (access_key_id, secret_key) {
            (Some(access_key_id), Some(secret_key)) => {
                Ok(Self(BasicCredentials::new(access_key_id, secret_key)))
            }
            _ => Err(ClientError::invalid_argument(format!(
                "unable to load credentials from environment variables \
                 ({ACCESS_KEY_ENV} and {SECRET_KEY_ENV} or {ALTERNATE_SECRET_KEY_ENV})"
            ))),
        }
    }
}

impl Credentials for EnvironmentCredentials {
    fn access_key_id(&self) -> Option<&str> {
        self.0.access_key_id()
    }

    fn secret_key(&self) -> Option<&str> {
        self.0.secret_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_anonymous_never_signs() {
        assert!(AnonymousCredentials.access_key_id().is_none());
        assert!(AnonymousCredentials.secret_key().is_none());
        assert!(!should_sign(&AnonymousCredentials));
    }

    #[test]
    fn test_basic_signs_and_hides_secret() {
        let credentials = BasicCredentials::new("AKID", "SECRET");
        assert!(should_sign(&credentials));
        assert_eq!(credentials.access_key_id(), Some("AKID"));
        assert!(!format!("{credentials:?}").contains("SECRET"));
    }

    #[test]
    fn test_environment_credentials() {
        let credentials = EnvironmentCredentials::from_lookup(env(&[
            ("AWS_ACCESS_KEY_ID", " AKID "),
            ("AWS_SECRET_ACCESS_KEY", "SECRET"),
        ]))
        .unwrap();
        assert_eq!(credentials.access_key_id(), Some("AKID"));
        assert_eq!(credentials.secret_key(), Some("SECRET"));
    }

    #[test]
    fn test_environment_credentials_alternate_secret() {
        let credentials = EnvironmentCredentials::from_lookup(env(&[
            ("AWS_ACCESS_KEY_ID", "AKID"),
            ("AWS_SECRET_KEY", "OLD"),
        ]))
        .unwrap();
        assert_eq!(credentials.secret_key(), Some("OLD"));
    }

    #[test]
    fn test_environment_credentials_missing() {
        let err = EnvironmentCredentials::from_lookup(env(&[
            ("AWS_ACCESS_KEY_ID", "AKID"),
            ("AWS_SECRET_ACCESS_KEY", "  "),
        ]))
        .unwrap_err();
        assert!(matches!(err, ClientError::InvalidArgument(_)));
    }
}
