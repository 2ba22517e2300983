pub mod category;
pub mod comment;
pub mod event;
pub mod user;

pub use category::Category;
pub use comment::Comment;
pub use event::Event;
pub use user::User;
