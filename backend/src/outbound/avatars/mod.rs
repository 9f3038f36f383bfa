//! Avatar adapters: a deterministic default for new accounts and an image
//! host for uploads.

mod cloudinary;
mod gravatar;

pub use cloudinary::{CloudinaryAvatarStore, CloudinaryCredentials};
pub use gravatar::GravatarDefaultAvatar;
