pub mod comments;
pub mod photos;
pub mod social_media;
pub mod users;

pub use comments::{CommentRepository, PgCommentRepository};
pub use photos::{PgPhotoRepository, PhotoRepository};
pub use social_media::{PgSocialMediaRepository, SocialMediaRepository};
pub use users::{PgUserRepository, UserRepository};
