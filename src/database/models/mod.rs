pub mod comment;
pub mod photo;
pub mod social_media;
pub mod user;

pub use comment::{Comment, CommentDetails, NewComment};
pub use photo::{Photo, PhotoFields, PhotoSummary, PhotoWithOwner};
pub use social_media::{SocialMedia, SocialMediaFields, SocialMediaWithOwner};
pub use user::{NewUser, User, UserChanges, UserSummary};
