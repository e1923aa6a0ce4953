pub mod events;
pub mod notice;

pub use notice::{Notice, NoticeLevel};
