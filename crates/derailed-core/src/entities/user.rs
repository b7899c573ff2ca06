//! User entity - represents a platform account

use crate::value_objects::Snowflake;

/// User entity as stored by the backing store.
///
/// `password` holds the stored credential hash. It never leaves the server:
/// outbound payloads are built from the public fields only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar: Option<String>,
    pub banner: Option<String>,
    pub flags: i64,
    pub bot: bool,
    pub system: bool,
    pub email: String,
    pub password: String,
}

impl User {
    /// Create a new User with required fields
    pub fn new(id: Snowflake, username: String, email: String, password: String) -> Self {
        Self {
            id,
            username,
            display_name: None,
            avatar: None,
            banner: None,
            flags: 0,
            bot: false,
            system: false,
            email,
            password,
        }
    }
}
