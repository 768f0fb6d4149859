use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::foundation::error::{SketchError, SketchResult};

/// Raster formats the runtime reads or writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
}

impl ImageFormat {
    /// Format named by a file extension, case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "gif" => Some(Self::Gif),
            "bmp" => Some(Self::Bmp),
            "tif" | "tiff" => Some(Self::Tiff),
            _ => None,
        }
    }

    /// Identify encoded bytes by their leading magic number.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"\x89PNG") {
            Some(Self::Png)
        } else if bytes.starts_with(b"\xff\xd8\xff") {
            Some(Self::Jpeg)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(Self::Gif)
        } else if bytes.starts_with(b"BM") {
            Some(Self::Bmp)
        } else if bytes.starts_with(b"II\x2a\x00") || bytes.starts_with(b"MM\x00\x2a") {
            Some(Self::Tiff)
        } else {
            None
        }
    }

    /// Screenshots are only written as PNG, JPEG or GIF.
    pub fn can_encode(self) -> bool {
        matches!(self, Self::Png | Self::Jpeg | Self::Gif)
    }

    /// Encoder for `path`, falling back to PNG (with a warning) for anything unrecognized.
    pub fn for_output(path: &Path) -> Self {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match Self::from_extension(ext) {
            Some(fmt) if fmt.can_encode() => fmt,
            _ => {
                tracing::warn!(
                    path = %path.display(),
                    extension = ext,
                    "unknown screenshot extension, using png"
                );
                Self::Png
            }
        }
    }

    fn to_image(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Gif => image::ImageFormat::Gif,
            Self::Bmp => image::ImageFormat::Bmp,
            Self::Tiff => image::ImageFormat::Tiff,
        }
    }
}

/// Encode straight-alpha pixels into `format`.
pub fn encode_image(img: &image::RgbaImage, format: ImageFormat) -> SketchResult<Vec<u8>> {
    if !format.can_encode() {
        return Err(SketchError::encode(format!(
            "{format:?} is not a supported output format"
        )));
    }

    let mut out = Cursor::new(Vec::new());
    let res = match format {
        // JPEG has no alpha channel.
        ImageFormat::Jpeg => image::DynamicImage::ImageRgba8(img.clone())
            .to_rgb8()
            .write_to(&mut out, format.to_image()),
        _ => img.write_to(&mut out, format.to_image()),
    };
    res.map_err(|e| SketchError::encode(format!("encode {format:?}: {e}")))?;
    Ok(out.into_inner())
}

/// Decode bytes whose format is identified by magic number, not by name.
pub fn decode_image(bytes: &[u8], label: &str) -> SketchResult<image::RgbaImage> {
    let Some(format) = ImageFormat::sniff(bytes) else {
        let head = &bytes[..bytes.len().min(4)];
        return Err(SketchError::UnknownImageFormat(format!(
            "unknown image header for '{label}' (hdr={head:02x?})"
        )));
    };
    let img = image::load_from_memory_with_format(bytes, format.to_image())
        .map_err(|e| SketchError::decode(format!("'{label}' as {format:?}: {e}")))?;
    Ok(img.to_rgba8())
}

/// Read and decode a BMP, JPEG, GIF, PNG or TIFF file.
pub fn read_image(path: &Path) -> SketchResult<image::RgbaImage> {
    let bytes = std::fs::read(path).map_err(|e| SketchError::io(path, e))?;
    decode_image(&bytes, &path.display().to_string())
}

/// Encode `img` by the extension of `path` and write it atomically.
///
/// The bytes go to a sibling temporary file that is renamed into place, so a failure never
/// leaves a partial file at `path`. Returns the format actually written.
pub fn write_image(path: &Path, img: &image::RgbaImage) -> SketchResult<ImageFormat> {
    let format = ImageFormat::for_output(path);
    let bytes = encode_image(img, format)?;

    let tmp = temp_sibling(path);
    let res = std::fs::write(&tmp, &bytes)
        .and_then(|()| std::fs::rename(&tmp, path))
        .map_err(|e| SketchError::io(path, e));
    if res.is_err() {
        remove_temp(&tmp);
    }
    res.map(|()| format)
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    path.with_file_name(format!(".{name}.{}.tmp", std::process::id()))
}

fn remove_temp(tmp: &Path) {
    match std::fs::remove_file(tmp) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(path = %tmp.display(), error = %e, "could not remove temporary image file");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/codec.rs"]
mod tests;
