//! User database model

use derailed_core::{Snowflake, User};
use sqlx::FromRow;

/// Database model for users table
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
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

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: Snowflake::new(model.id),
            username: model.username,
            display_name: model.display_name,
            avatar: model.avatar,
            banner: model.banner,
            flags: model.flags,
            bot: model.bot,
            system: model.system,
            email: model.email,
            password: model.password,
        }
    }
}
