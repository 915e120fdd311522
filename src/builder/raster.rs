//! Raster image previews using the `image` crate

use crate::builder::mimetype::detect_mimetype;
use crate::builder::traits::{BuildTarget, BuilderFamily, PreviewBuilder};
use crate::cache::publish_atomically;
use crate::error::{PreviewError, PreviewResult};
use crate::preview::{ImgDims, PreviewKind};
use image::imageops::{self, FilterType};
use image::{ColorType, DynamicImage, ImageFormat, ImageReader, Rgba, RgbaImage};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

const IMAGE_MIMETYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/gif",
    "image/bmp",
    "image/x-ms-bmp",
    "image/tiff",
    "image/webp",
    "image/x-icon",
    "image/vnd.microsoft.icon",
    "image/x-portable-anymap",
    "image/x-tga",
];

const IMAGE_CAPABILITIES: &[PreviewKind] = &[PreviewKind::Jpeg, PreviewKind::Json];

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Scale `image` to fit inside `size` (aspect ratio kept) and centre it on a
/// white canvas of exactly `size`. With no size the native dimensions are
/// kept. Transparency is flattened onto white either way.
pub(crate) fn fit_and_pad(image: &DynamicImage, size: Option<ImgDims>) -> PreviewResult<DynamicImage> {
    let (canvas_w, canvas_h, placed) = match size {
        Some(size) => {
            if size.width == 0 || size.height == 0 {
                return Err(PreviewError::Internal(format!(
                    "invalid preview size {}",
                    size
                )));
            }
            let resized = image.resize(size.width, size.height, FilterType::Triangle);
            (size.width, size.height, resized)
        }
        None => (image.width(), image.height(), image.clone()),
    };

    let mut canvas = RgbaImage::from_pixel(canvas_w, canvas_h, WHITE);
    let x = (canvas_w.saturating_sub(placed.width()) / 2) as i64;
    let y = (canvas_h.saturating_sub(placed.height()) / 2) as i64;
    imageops::overlay(&mut canvas, &placed.to_rgba8(), x, y);

    Ok(DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8()))
}

/// Encode `image` as a JPEG artifact at `target`
pub(crate) fn write_jpeg(
    image: &DynamicImage,
    size: Option<ImgDims>,
    target: &Path,
) -> PreviewResult<()> {
    let preview = fit_and_pad(image, size)?;
    publish_atomically(target, |tmp| {
        preview.save_with_format(tmp, ImageFormat::Jpeg)?;
        Ok(())
    })
}

/// Open and decode an image, guessing the format from content
fn open_image(path: &Path) -> PreviewResult<(DynamicImage, Option<ImageFormat>)> {
    let reader = ImageReader::open(path)
        .map_err(|e| PreviewError::io(format!("opening image {}", path.display()), e))?
        .with_guessed_format()
        .map_err(|e| PreviewError::io(format!("reading image {}", path.display()), e))?;
    let format = reader.format();
    Ok((reader.decode()?, format))
}

/// Colour mode label in the style of common imaging tools
fn mode_name(color: ColorType) -> String {
    match color {
        ColorType::L8 => "L".to_string(),
        ColorType::La8 => "LA".to_string(),
        ColorType::Rgb8 => "RGB".to_string(),
        ColorType::Rgba8 => "RGBA".to_string(),
        ColorType::L16 => "I;16".to_string(),
        other => format!("{:?}", other).to_uppercase(),
    }
}

/// JSON metadata written for images
#[derive(Debug, Serialize)]
struct ImageMetadata {
    width: u32,
    height: u32,
    size: u64,
    mode: String,
    format: Option<String>,
    mimetype: String,
}

/// Builder for raster image formats
#[derive(Debug, Default)]
pub struct ImagePreviewBuilder;

impl ImagePreviewBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl PreviewBuilder for ImagePreviewBuilder {
    fn name(&self) -> &'static str {
        "image"
    }

    fn family(&self) -> BuilderFamily {
        BuilderFamily::Image
    }

    fn mimetypes(&self) -> &'static [&'static str] {
        IMAGE_MIMETYPES
    }

    fn capabilities(&self) -> &'static [PreviewKind] {
        IMAGE_CAPABILITIES
    }

    fn get_original_size(&self, path: &Path, _page: Option<u32>) -> PreviewResult<ImgDims> {
        let (width, height) = image::image_dimensions(path)?;
        Ok(ImgDims::new(width, height))
    }

    fn get_page_number(&self, _path: &Path, _cache_key: &str, _cache_dir: &Path) -> PreviewResult<u32> {
        Ok(1)
    }

    fn build_jpeg_preview(
        &self,
        path: &Path,
        target: &BuildTarget<'_>,
        _page: Option<u32>,
        size: Option<ImgDims>,
    ) -> PreviewResult<()> {
        let (image, _) = open_image(path)?;
        let out = target.path();
        write_jpeg(&image, size, &out)?;
        info!("Built JPEG preview {} from {}", out.display(), path.display());
        Ok(())
    }

    fn build_json_preview(&self, path: &Path, target: &BuildTarget<'_>) -> PreviewResult<()> {
        let (image, format) = open_image(path)?;
        let size = fs::metadata(path)
            .map_err(|e| PreviewError::io(format!("reading metadata of {}", path.display()), e))?
            .len();

        let metadata = ImageMetadata {
            width: image.width(),
            height: image.height(),
            size,
            mode: mode_name(image.color()),
            format: format.map(|f| format!("{:?}", f).to_uppercase()),
            mimetype: detect_mimetype(path),
        };
        let content = serde_json::to_vec_pretty(&metadata)?;

        let out = target.path();
        publish_atomically(&out, |tmp| {
            fs::write(tmp, &content)
                .map_err(|e| PreviewError::io(format!("writing {}", tmp.display()), e))
        })?;
        info!("Built JSON preview {} from {}", out.display(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};
    use tempfile::TempDir;

    fn sample_png(dir: &Path, width: u32, height: u32) -> std::path::PathBuf {
        let path = dir.join("sample.png");
        let img = ImageBuffer::from_fn(width, height, |x, _y| Rgb([(x % 255) as u8, 20_u8, 30_u8]));
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn jpeg_has_exact_requested_size() {
        let dir = TempDir::new().unwrap();
        let src = sample_png(dir.path(), 520, 206);
        let target = BuildTarget::new("key", dir.path(), ".jpeg");

        ImagePreviewBuilder
            .build_jpeg_preview(&src, &target, None, Some(ImgDims::new(512, 256)))
            .unwrap();

        let out = target.path();
        assert!(fs::metadata(&out).unwrap().len() > 0);
        assert_eq!(image::image_dimensions(&out).unwrap(), (512, 256));
    }

    #[test]
    fn jpeg_without_size_keeps_native_dimensions() {
        let dir = TempDir::new().unwrap();
        let src = sample_png(dir.path(), 520, 206);
        let target = BuildTarget::new("key", dir.path(), ".jpeg");

        ImagePreviewBuilder
            .build_jpeg_preview(&src, &target, None, None)
            .unwrap();

        assert_eq!(image::image_dimensions(target.path()).unwrap(), (520, 206));
    }

    #[test]
    fn fit_and_pad_centres_on_white() {
        let img = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(100, 50, Rgb([0, 0, 0])));
        let out = fit_and_pad(&img, Some(ImgDims::new(100, 100))).unwrap().to_rgb8();

        assert_eq!(out.dimensions(), (100, 100));
        assert_eq!(out.get_pixel(50, 2), &Rgb([255, 255, 255]));
        assert_eq!(out.get_pixel(50, 50), &Rgb([0, 0, 0]));
    }

    #[test]
    fn fit_and_pad_rejects_zero_size() {
        let img = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(10, 10, Rgb([0, 0, 0])));
        assert!(fit_and_pad(&img, Some(ImgDims::new(0, 10))).is_err());
    }

    #[test]
    fn original_size_from_header() {
        let dir = TempDir::new().unwrap();
        let src = sample_png(dir.path(), 520, 206);
        assert_eq!(
            ImagePreviewBuilder.get_original_size(&src, None).unwrap(),
            ImgDims::new(520, 206)
        );
        assert_eq!(
            ImagePreviewBuilder
                .get_page_number(&src, "key", dir.path())
                .unwrap(),
            1
        );
    }

    #[test]
    fn json_metadata_fields() {
        let dir = TempDir::new().unwrap();
        let src = sample_png(dir.path(), 520, 206);
        let target = BuildTarget::new("key", dir.path(), ".json");

        ImagePreviewBuilder.build_json_preview(&src, &target).unwrap();

        let data: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(target.path()).unwrap()).unwrap();
        assert_eq!(data["width"], 520);
        assert_eq!(data["height"], 206);
        assert_eq!(data["size"], fs::metadata(&src).unwrap().len());
        assert_eq!(data["mode"], "RGB");
        assert_eq!(data["format"], "PNG");
        assert_eq!(data["mimetype"], "image/png");
    }

    #[test]
    fn pdf_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let src = sample_png(dir.path(), 10, 10);
        let target = BuildTarget::new("key", dir.path(), ".pdf");

        let err = ImagePreviewBuilder
            .build_pdf_preview(&src, &target, None)
            .unwrap_err();
        assert!(matches!(err, PreviewError::UnavailablePreviewType { .. }));
        assert!(!target.path().exists());
    }
}
