//! OAuth redirect handling.
//!
//! After Google sign-in the backend redirects to the client's callback
//! route with the session credential and profile as query parameters.
//! [`OAuthCallback`] parses that redirect and writes it into the session
//! store.

use reqwest::Url;

use crate::error::ClientError;
use crate::session::{
    SessionStore, KEY_AUTH_TOKEN, KEY_USER_EMAIL, KEY_USER_NAME, KEY_USER_PICTURE_URL,
};

/// Identity carried by an OAuth callback redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthCallback {
    pub token: String,
    pub name: String,
    pub email: String,
    pub picture_url: Option<String>,
}

impl OAuthCallback {
    /// Parse a callback URL such as
    /// `http://localhost:3000/OAuthCallback?token=..&name=..&email=..`.
    ///
    /// Missing `name` / `email` become empty strings. A missing or empty
    /// `token` rejects the callback.
    pub fn from_url(url: &str) -> Result<Self, ClientError> {
        let parsed = Url::parse(url).map_err(|e| {
            ClientError::Session(format!("Invalid callback URL '{url}': {e}"))
        })?;

        let mut token = None;
        let mut name = String::new();
        let mut email = String::new();
        let mut picture_url = None;

        for (key, value) in parsed.query_pairs() {
            match key.as_ref() {
                "token" => token = Some(value.into_owned()),
                "name" => name = value.into_owned(),
                "email" => email = value.into_owned(),
                "picture" => picture_url = Some(value.into_owned()),
                _ => {}
            }
        }

        let token = token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ClientError::Session("Callback URL carries no token".to_string()))?;

        Ok(Self {
            token,
            name,
            email,
            picture_url: picture_url.filter(|p| !p.is_empty()),
        })
    }

    /// Write the identity into the session store.
    pub fn store(&self, session: &dyn SessionStore) -> Result<(), ClientError> {
        session.set(KEY_AUTH_TOKEN, &self.token)?;
        session.set(KEY_USER_NAME, &self.name)?;
        session.set(KEY_USER_EMAIL, &self.email)?;
        if let Some(picture) = &self.picture_url {
            session.set(KEY_USER_PICTURE_URL, picture)?;
        }
        tracing::info!(user = %self.name, "Signed in");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;

    #[test]
    fn full_callback_parses_and_stores() {
        let cb = OAuthCallback::from_url(
            "http://localhost:3000/OAuthCallback?token=jwt.abc&name=Ada%20L&email=ada%40example.com&picture=https%3A%2F%2Fpics%2Fa.png",
        )
        .unwrap();
        assert_eq!(cb.token, "jwt.abc");
        assert_eq!(cb.name, "Ada L");
        assert_eq!(cb.email, "ada@example.com");

        let store = MemorySessionStore::new();
        cb.store(&store).unwrap();
        assert_eq!(store.auth_token().as_deref(), Some("jwt.abc"));
        assert_eq!(store.get(KEY_USER_NAME).as_deref(), Some("Ada L"));
        assert_eq!(
            store.get(KEY_USER_PICTURE_URL).as_deref(),
            Some("https://pics/a.png")
        );
    }

    #[test]
    fn missing_profile_fields_become_empty() {
        let cb = OAuthCallback::from_url("http://h/OAuthCallback?token=t").unwrap();
        assert_eq!(cb.name, "");
        assert_eq!(cb.email, "");
        assert_eq!(cb.picture_url, None);

        let store = MemorySessionStore::new();
        cb.store(&store).unwrap();
        assert_eq!(store.get(KEY_USER_EMAIL).as_deref(), Some(""));
        assert_eq!(store.get(KEY_USER_PICTURE_URL), None);
    }

    #[test]
    fn callback_without_token_rejected() {
        assert!(OAuthCallback::from_url("http://h/OAuthCallback?name=Ada").is_err());
        assert!(OAuthCallback::from_url("http://h/OAuthCallback?token=").is_err());
    }

    #[test]
    fn malformed_url_rejected() {
        assert!(OAuthCallback::from_url("not a url").is_err());
    }
}
