// Protected handlers: every route takes `Authenticated` or `Owned<_>`,
// so the token (and ownership) gates run before any handler body.
pub mod comments;
pub mod photos;
pub mod social_medias;
pub mod users;
