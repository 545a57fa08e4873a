pub mod local_picture_store;

pub use local_picture_store::{ALLOWED_EXTENSIONS, LocalPictureStore};
