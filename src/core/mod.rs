//! Question flow: validation, random draws and note appending

pub mod notes;
pub mod picker;
pub mod validator;

pub use notes::append_note;
pub use picker::{pick_random_question, pick_random_question_with};
pub use validator::validate;
