pub mod candidate;
pub mod conversation;
