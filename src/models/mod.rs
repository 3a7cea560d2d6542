pub mod post;
pub mod resource;
pub mod user;

pub use post::POSTS;
pub use resource::Resource;
pub use user::USERS;

/// Every resource the service exposes, in mount order.
pub static RESOURCES: [&Resource; 2] = [&POSTS, &USERS];
