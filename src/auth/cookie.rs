//! Session cookie handling
//!
//! One canonical cookie policy shared by every issuance path and logout:
//! HttpOnly, SameSite=None, Secure in production, 30-day max-age, Path=/.

/// How session cookies are built for this deployment
#[derive(Debug, Clone)]
pub struct CookieOptions {
    /// Cookie name carrying the session token
    pub name: String,
    /// Whether to set the Secure attribute (production only)
    pub secure: bool,
    /// Cookie lifetime in seconds
    pub max_age_secs: i64,
}

impl CookieOptions {
    pub fn new(name: impl Into<String>, secure: bool, ttl_days: i64) -> Self {
        Self {
            name: name.into(),
            secure,
            max_age_secs: ttl_days * 24 * 60 * 60,
        }
    }

    /// Set-Cookie value attaching a session token
    pub fn session_cookie(&self, token: &str) -> String {
        let mut cookie = format!(
            "{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=None",
            self.name, token, self.max_age_secs
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// Set-Cookie value clearing the session cookie
    pub fn clearing_cookie(&self) -> String {
        let mut cookie = format!("{}=; Max-Age=0; Path=/; HttpOnly; SameSite=None", self.name);
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// Pull the session token out of a Cookie request header, if present
    pub fn token_from_header(&self, cookie_header: &str) -> Option<String> {
        let prefix = format!("{}=", self.name);
        cookie_header
            .split(';')
            .filter_map(|part| part.trim().strip_prefix(prefix.as_str()))
            .map(|t| t.to_string())
            .next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let opts = CookieOptions::new("token", false, 30);
        let cookie = opts.session_cookie("abc.def.ghi");
        assert!(cookie.starts_with("token=abc.def.ghi;"));
        assert!(cookie.contains("Max-Age=2592000"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=None"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn test_secure_flag_in_production() {
        let opts = CookieOptions::new("token", true, 30);
        assert!(opts.session_cookie("t").ends_with("; Secure"));
        assert!(opts.clearing_cookie().ends_with("; Secure"));
    }

    #[test]
    fn test_clearing_cookie_expires_immediately() {
        let opts = CookieOptions::new("token", false, 30);
        let cookie = opts.clearing_cookie();
        assert!(cookie.starts_with("token=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("Path=/"));
    }

    #[test]
    fn test_token_extraction() {
        let opts = CookieOptions::new("token", false, 30);
        assert_eq!(
            opts.token_from_header("theme=dark; token=abc; lang=en"),
            Some("abc".to_string())
        );
        assert_eq!(opts.token_from_header("theme=dark"), None);
        // A different cookie whose name merely ends with "token" must not match
        assert_eq!(opts.token_from_header("csrftoken=zzz"), None);
    }
}
