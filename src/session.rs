//! Cookie-backed token store.
//!
//! The server keeps no token state of its own: the access token, refresh
//! token, and expiry timestamp all round-trip through client cookies.

use axum_extra::extract::cookie::{Cookie, CookieJar};
use chrono::Utc;

use crate::config::Config;
use crate::spotify::{SpotifyClient, TokenResponse};

pub const ACCESS_TOKEN_COOKIE: &str = "spotify_access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "spotify_refresh_token";
pub const EXPIRES_AT_COOKIE: &str = "spotify_expires_at";

const REFRESH_TOKEN_TTL_SECS: i64 = 30 * 24 * 60 * 60;

// Refresh this long before the recorded expiry to avoid racing it.
const EXPIRY_MARGIN_MS: i64 = 5_000;

/// The token triple as read from a request's cookies.
#[derive(Debug, Default)]
pub struct TokenCookies {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_at: i64,
}

pub fn read_tokens(jar: &CookieJar) -> TokenCookies {
    TokenCookies {
        access_token: jar.get(ACCESS_TOKEN_COOKIE).map(|c| c.value().to_string()),
        refresh_token: jar.get(REFRESH_TOKEN_COOKIE).map(|c| c.value().to_string()),
        expires_at: jar
            .get(EXPIRES_AT_COOKIE)
            .and_then(|c| c.value().parse().ok())
            .unwrap_or(0),
    }
}

fn token_is_fresh(expires_at: i64, now_ms: i64) -> bool {
    now_ms < expires_at - EXPIRY_MARGIN_MS
}

fn auth_cookie(
    config: &Config,
    name: &'static str,
    value: String,
    max_age_secs: i64,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(config.cookie_same_site)
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}

/// Write the token triple. The refresh cookie is only rewritten when a
/// refresh token is present, with its own long lifetime.
pub fn set_auth_cookies(jar: CookieJar, config: &Config, tokens: &TokenResponse) -> CookieJar {
    let expires_at = Utc::now().timestamp_millis() + tokens.expires_in * 1000;
    let mut jar = jar
        .add(auth_cookie(
            config,
            ACCESS_TOKEN_COOKIE,
            tokens.access_token.clone(),
            tokens.expires_in,
        ))
        .add(auth_cookie(
            config,
            EXPIRES_AT_COOKIE,
            expires_at.to_string(),
            tokens.expires_in,
        ));
    if let Some(refresh_token) = &tokens.refresh_token {
        jar = jar.add(auth_cookie(
            config,
            REFRESH_TOKEN_COOKIE,
            refresh_token.clone(),
            REFRESH_TOKEN_TTL_SECS,
        ));
    }
    jar
}

/// Overwrite all three cookies with empty values and zero lifetime.
pub fn clear_auth_cookies(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(ACCESS_TOKEN_COOKIE).path("/").build())
        .remove(Cookie::build(REFRESH_TOKEN_COOKIE).path("/").build())
        .remove(Cookie::build(EXPIRES_AT_COOKIE).path("/").build())
}

/// Return a usable access token, refreshing through the provider when the
/// stored one is expired. A failed refresh clears the session and yields
/// `None`; that is the only recovery path for a revoked refresh token.
pub async fn get_valid_access_token(
    jar: CookieJar,
    config: &Config,
    spotify: &SpotifyClient,
) -> (CookieJar, Option<String>) {
    let tokens = read_tokens(&jar);

    if let Some(access_token) = &tokens.access_token {
        if token_is_fresh(tokens.expires_at, Utc::now().timestamp_millis()) {
            return (jar, Some(access_token.clone()));
        }
    }

    let Some(refresh_token) = tokens.refresh_token else {
        return (jar, None);
    };

    match spotify.refresh_access_token(&refresh_token).await {
        Ok(mut refreshed) => {
            // The provider may omit a rotated refresh token; keep the old one.
            if refreshed.refresh_token.is_none() {
                refreshed.refresh_token = Some(refresh_token);
            }
            let access_token = refreshed.access_token.clone();
            (set_auth_cookies(jar, config, &refreshed), Some(access_token))
        }
        Err(err) => {
            tracing::warn!("token refresh failed, clearing session: {}", err);
            (clear_auth_cookies(jar), None)
        }
    }
}

#[cfg(test)]
mod tests {
    use axum_extra::extract::cookie::SameSite;

    use super::*;

    fn test_config() -> Config {
        Config {
            port: 5000,
            frontend_url: "http://localhost:5173".to_string(),
            spotify_client_id: Some("client-id".to_string()),
            spotify_client_secret: Some("client-secret".to_string()),
            redirect_uri: "http://localhost:5000/auth/callback".to_string(),
            accounts_url: "https://accounts.spotify.com".to_string(),
            api_url: "https://api.spotify.com/v1".to_string(),
            production: false,
            cookie_secure: false,
            cookie_same_site: SameSite::Lax,
        }
    }

    fn token_response(refresh_token: Option<&str>) -> TokenResponse {
        TokenResponse {
            access_token: "access-token".to_string(),
            refresh_token: refresh_token.map(|t| t.to_string()),
            expires_in: 3600,
            scope: None,
            token_type: Some("Bearer".to_string()),
        }
    }

    #[test]
    fn read_tokens_defaults_missing_fields() {
        let jar = CookieJar::new();
        let tokens = read_tokens(&jar);
        assert!(tokens.access_token.is_none());
        assert!(tokens.refresh_token.is_none());
        assert_eq!(tokens.expires_at, 0);

        let jar = jar.add(Cookie::new(ACCESS_TOKEN_COOKIE, "tok"));
        let tokens = read_tokens(&jar);
        assert_eq!(tokens.access_token.as_deref(), Some("tok"));
        assert_eq!(tokens.expires_at, 0);
    }

    #[test]
    fn read_tokens_ignores_unparseable_expiry() {
        let jar = CookieJar::new().add(Cookie::new(EXPIRES_AT_COOKIE, "not-a-number"));
        assert_eq!(read_tokens(&jar).expires_at, 0);
    }

    #[test]
    fn freshness_respects_the_margin() {
        let now = 1_000_000;
        assert!(token_is_fresh(now + EXPIRY_MARGIN_MS + 1, now));
        // Exactly at the margin counts as expired.
        assert!(!token_is_fresh(now + EXPIRY_MARGIN_MS, now));
        assert!(!token_is_fresh(now, now));
        assert!(!token_is_fresh(0, now));
    }

    #[test]
    fn set_auth_cookies_writes_the_triple_with_attributes() {
        let config = test_config();
        let jar = set_auth_cookies(CookieJar::new(), &config, &token_response(Some("refresh")));

        let access = jar.get(ACCESS_TOKEN_COOKIE).unwrap();
        assert_eq!(access.value(), "access-token");
        assert_eq!(access.http_only(), Some(true));
        assert_eq!(access.path(), Some("/"));
        assert_eq!(access.same_site(), Some(SameSite::Lax));
        assert_eq!(access.max_age(), Some(time::Duration::seconds(3600)));

        let refresh = jar.get(REFRESH_TOKEN_COOKIE).unwrap();
        assert_eq!(refresh.value(), "refresh");
        assert_eq!(
            refresh.max_age(),
            Some(time::Duration::seconds(REFRESH_TOKEN_TTL_SECS))
        );

        let expires_at: i64 = jar.get(EXPIRES_AT_COOKIE).unwrap().value().parse().unwrap();
        assert!(expires_at > Utc::now().timestamp_millis());
    }

    #[test]
    fn set_auth_cookies_leaves_refresh_cookie_alone_when_absent() {
        let config = test_config();
        let jar = set_auth_cookies(CookieJar::new(), &config, &token_response(None));
        assert!(jar.get(REFRESH_TOKEN_COOKIE).is_none());
        assert!(jar.get(ACCESS_TOKEN_COOKIE).is_some());
    }

    #[test]
    fn clear_auth_cookies_drops_all_three() {
        let jar = CookieJar::new()
            .add(Cookie::new(ACCESS_TOKEN_COOKIE, "a"))
            .add(Cookie::new(REFRESH_TOKEN_COOKIE, "r"))
            .add(Cookie::new(EXPIRES_AT_COOKIE, "1"));
        let jar = clear_auth_cookies(jar);
        assert!(jar.get(ACCESS_TOKEN_COOKIE).is_none());
        assert!(jar.get(REFRESH_TOKEN_COOKIE).is_none());
        assert!(jar.get(EXPIRES_AT_COOKIE).is_none());
    }

    #[test]
    fn clearing_an_empty_jar_is_harmless() {
        let jar = clear_auth_cookies(CookieJar::new());
        assert!(jar.get(ACCESS_TOKEN_COOKIE).is_none());
    }
}
