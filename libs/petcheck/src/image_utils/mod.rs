mod utils;

pub use utils::allowed_file;
pub use utils::decode_image_bytes;
pub use utils::file_extension;
pub use utils::load_image_from_path;
pub use utils::fit_factor;
pub use utils::scale_by;
pub use utils::ALLOWED_EXTENSIONS;
