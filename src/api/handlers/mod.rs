mod admin;
mod carousel;
mod pages;
mod static_files;

pub use admin::health;
pub use carousel::{list_items, move_item, remove_item, update_caption, upload_item};
pub use pages::{admin_index, login, logout, public_index};
pub use static_files::serve_upload;
