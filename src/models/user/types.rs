/// Internal user struct for authentication, including the password hash.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub display_name: String,
}

/// A user offered in the "invite" picker. `label` is what the picker shows.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UserOption {
    pub id: i64,
    pub username: String,
    pub label: String,
}

/// New user data for creation. `password` is already hashed.
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub display_name: String,
}
