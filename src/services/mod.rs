pub mod aggregate_folder;
pub mod background;
pub mod comment_service;
pub mod image_service;
pub mod post_service;
pub mod response;
pub mod schemas;
