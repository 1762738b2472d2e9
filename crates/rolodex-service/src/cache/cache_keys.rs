//! Cache key generators for consistent key naming.

/// Prefix for all cache keys to namespace them.
const CACHE_PREFIX: &str = "rolodex:cache";

/// Cache key for the user whose access-token subject is `username`.
///
/// Usernames are case-sensitive, so the key is too.
#[must_use]
pub fn user_by_username(username: &str) -> String {
    format!("{}:user:username:{}", CACHE_PREFIX, username)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_by_username_key() {
        assert_eq!(user_by_username("alice"), "rolodex:cache:user:username:alice");
    }

    #[test]
    fn test_keys_differ_per_user() {
        assert_ne!(user_by_username("alice"), user_by_username("bob"));
        assert_ne!(user_by_username("alice"), user_by_username("Alice"));
    }
}
