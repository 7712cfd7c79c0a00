pub mod comments;
pub mod labels;
pub mod media_items;
pub mod projects;
pub mod stats;
