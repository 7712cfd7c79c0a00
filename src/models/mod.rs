mod comment;
mod label;
mod media_item;
mod project;

pub use comment::Comment;
pub use label::Label;
pub use media_item::{MediaItem, MediaKind};
pub use project::{Project, ProjectDetails};
