use super::resource::Resource;

/// `users` table, same shape as `posts` with `name` and `bio`.
pub static USERS: Resource = Resource {
    name: "user",
    table: "users",
    fields: &["name", "bio"],
};
