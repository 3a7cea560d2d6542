use super::resource::Resource;

/// `posts` table: `id SERIAL`, `title TEXT`, `contents TEXT`.
pub static POSTS: Resource = Resource {
    name: "post",
    table: "posts",
    fields: &["title", "contents"],
};
