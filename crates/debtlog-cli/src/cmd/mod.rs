pub mod completions;
pub mod guide;
pub mod score;
pub mod session;
pub mod views;
