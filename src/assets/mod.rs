pub mod codec;

pub use codec::{ImageFormat, decode_image, encode_image, read_image, write_image};
