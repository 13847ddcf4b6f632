/// Logged-in user identifier.
pub const USER_ID: &str = "user_id";
/// Set to `true` by a successful login, `false` by logout.
pub const LOGIN_SUCCESS: &str = "login_success";
/// Pending success flash messages.
pub const SUCCESS: &str = "success";
/// Pending error flash messages.
pub const ERRORS: &str = "errors";

/// Keys owned by the facade. Hidden from, and unwritable through, the
/// generic data accessors.
pub const RESERVED_KEYS: [&str; 4] = [USER_ID, LOGIN_SUCCESS, SUCCESS, ERRORS];

/// Returns true if `key` is one of [`RESERVED_KEYS`].
pub fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved() {
        for key in RESERVED_KEYS {
            assert!(is_reserved(key));
        }
        assert!(!is_reserved("foo"));
        assert!(!is_reserved("USER_ID"));
        assert!(!is_reserved(""));
    }
}
