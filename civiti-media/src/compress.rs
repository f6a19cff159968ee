use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::ImageReader;
use tracing::debug;
use uuid::Uuid;

use crate::{ImageAsset, MediaConfig, MediaError, MediaResult};

/// How one asset is re-encoded
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionPlan {
    /// Target width when the image must shrink, aspect ratio preserved
    pub resize_width: Option<u32>,
    /// JPEG quality, 0.0 - 1.0
    pub quality: f32,
}

impl CompressionPlan {
    /// Quality as the encoder's 1-100 scale
    pub fn encoder_quality(&self) -> u8 {
        ((self.quality * 100.0).round() as i32).clamp(1, 100) as u8
    }
}

/// Decide how to re-encode `asset`.
///
/// Small files are only re-encoded at full quality to drop metadata. Larger
/// files are recompressed, and scaled down when known to be wider than
/// `max_width`.
pub fn plan_compression(asset: &ImageAsset, config: &MediaConfig) -> CompressionPlan {
    let is_small = asset
        .file_size
        .is_some_and(|size| size < config.small_file_threshold);
    if is_small {
        return CompressionPlan {
            resize_width: None,
            quality: 1.0,
        };
    }

    let needs_resize = asset.width.is_some_and(|width| width > config.max_width);
    CompressionPlan {
        resize_width: needs_resize.then_some(config.max_width),
        quality: config.jpeg_quality,
    }
}

/// Temporary JPEG produced from a picked image, owned by the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedAsset {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl CompressedAsset {
    /// Delete the temporary file. Best effort.
    pub async fn discard(self) {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => debug!(path = %self.path.display(), "failed to remove temp file: {}", e),
        }
    }
}

/// Image transform primitive: writes a new JPEG, never touches `source`
#[async_trait]
pub trait ImageTransformer: Send + Sync {
    async fn transform(&self, source: &Path, plan: &CompressionPlan) -> MediaResult<CompressedAsset>;
}

/// JPEG re-encoder. Decoding and encoding drop EXIF and other metadata.
#[derive(Debug, Clone)]
pub struct JpegTransformer {
    temp_dir: PathBuf,
}

impl JpegTransformer {
    pub fn new<P: Into<PathBuf>>(temp_dir: P) -> Self {
        Self {
            temp_dir: temp_dir.into(),
        }
    }

    pub fn from_config(config: &MediaConfig) -> Self {
        Self::new(config.temp_dir.clone())
    }
}

#[async_trait]
impl ImageTransformer for JpegTransformer {
    async fn transform(&self, source: &Path, plan: &CompressionPlan) -> MediaResult<CompressedAsset> {
        let source = source.to_path_buf();
        let target = self.temp_dir.join(format!("civiti-{}.jpg", Uuid::new_v4().simple()));
        let plan = *plan;

        tokio::task::spawn_blocking(move || {
            let result = encode_jpeg(&source, &target, &plan);
            if result.is_err() {
                let _ = std::fs::remove_file(&target);
            }
            result
        })
        .await
        .map_err(|e| MediaError::compression(format!("encoder task failed: {}", e)))?
    }
}

fn encode_jpeg(source: &Path, target: &Path, plan: &CompressionPlan) -> MediaResult<CompressedAsset> {
    let mut image = ImageReader::open(source)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| MediaError::compression(e.to_string()))?;

    if let Some(max_width) = plan.resize_width {
        if image.width() > max_width {
            let height = (u64::from(image.height()) * u64::from(max_width) / u64::from(image.width())).max(1);
            image = image.resize_exact(max_width, height as u32, FilterType::Lanczos3);
        }
    }

    // JPEG has no alpha channel
    let rgb = image.to_rgb8();
    let writer = BufWriter::new(File::create(target)?);
    let encoder = JpegEncoder::new_with_quality(writer, plan.encoder_quality());
    rgb.write_with_encoder(encoder)
        .map_err(|e| MediaError::compression(e.to_string()))?;

    debug!(
        source = %source.display(),
        width = rgb.width(),
        height = rgb.height(),
        quality = plan.encoder_quality(),
        "image re-encoded"
    );

    Ok(CompressedAsset {
        path: target.to_path_buf(),
        width: rgb.width(),
        height: rgb.height(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const KB: u64 = 1024;

    #[test]
    fn test_small_file_is_not_resized() {
        let asset = ImageAsset::new("a.jpg").with_file_size(400 * KB).with_width(4000);
        let plan = plan_compression(&asset, &MediaConfig::default());
        assert_eq!(plan.resize_width, None);
        assert_eq!(plan.quality, 1.0);
        assert_eq!(plan.encoder_quality(), 100);
    }

    #[test]
    fn test_large_wide_file_is_resized() {
        let asset = ImageAsset::new("a.jpg").with_file_size(2 * KB * KB).with_width(3000);
        let plan = plan_compression(&asset, &MediaConfig::default());
        assert_eq!(plan.resize_width, Some(1920));
        assert!(plan.quality <= 0.85);
    }

    #[test]
    fn test_unknown_width_recompresses_only() {
        let asset = ImageAsset::new("a.jpg").with_file_size(2 * KB * KB);
        let plan = plan_compression(&asset, &MediaConfig::default());
        assert_eq!(plan.resize_width, None);
        assert_eq!(plan.quality, 0.85);
    }

    #[test]
    fn test_unknown_size_follows_width() {
        let config = MediaConfig::default();
        let narrow = plan_compression(&ImageAsset::new("a.jpg").with_width(1920), &config);
        assert_eq!(narrow.resize_width, None);

        let wide = plan_compression(&ImageAsset::new("a.jpg").with_width(1921), &config);
        assert_eq!(wide.resize_width, Some(1920));
        assert_eq!(wide.quality, 0.85);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let config = MediaConfig::default();
        let asset = ImageAsset::new("a.jpg").with_file_size(500 * KB).with_width(3000);
        assert_eq!(plan_compression(&asset, &config).resize_width, Some(1920));
    }
}
