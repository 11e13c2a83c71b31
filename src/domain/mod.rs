pub mod comment;
pub mod commands;
pub mod id;
pub mod post;
pub mod user;
