//! # 载体图像模块
//!
//! 负责在无损图像文件与扁平通道序列之间转换。图像统一转换为 8 位 RGB，
//! 通道按光栅顺序交错排列：`R0 G0 B0 R1 G1 B1 ...`。Alpha 通道不会保留。

use crate::capacity::{CapacityReport, compute_report};
use crate::error::{Result, StegoError};
use crate::steganography::{Utf8Policy, embed, extract_with_policy};
use image::{ImageFormat, RgbImage};
use std::path::Path;

/// 已解码的 RGB 载体图像。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carrier {
    image: RgbImage,
}

impl Carrier {
    /// 读取并解码图像文件。
    pub fn open(path: &Path) -> Result<Self> {
        let image = image::open(path)?.to_rgb8();
        Ok(Self::from_rgb(image))
    }

    /// 从内存中的 RGB 图像构造载体。
    pub fn from_rgb(image: RgbImage) -> Self {
        Self { image }
    }

    /// 返回内部 RGB 图像的副本。
    pub fn to_rgb(&self) -> RgbImage {
        self.image.clone()
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// 光栅顺序的通道序列。
    pub fn channels(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// 返回嵌入了 `message` 的新载体，自身保持不变。
    pub fn embed(&self, message: &str) -> Result<Self> {
        let channels = embed(self.channels(), message)?;
        let mut image = self.image.clone();
        // embed 保证输出与输入等长
        image.copy_from_slice(&channels);
        Ok(Self { image })
    }

    /// 提取隐藏的消息。
    pub fn extract(&self, policy: Utf8Policy) -> Result<String> {
        extract_with_policy(self.channels(), policy)
    }

    /// 针对该图像尺寸和消息字节数的容量报告。
    pub fn report(&self, message_len: usize) -> CapacityReport {
        compute_report(self.width(), self.height(), message_len)
    }

    /// 以无损格式编码并写入文件，格式由扩展名决定。
    ///
    /// # Errors
    ///
    /// 扩展名不是无损格式时返回 [`StegoError::LossyFormat`]，
    /// 编码失败时返回 [`StegoError::Image`]。
    pub fn save(&self, path: &Path) -> Result<()> {
        let format = ensure_lossless(path)?;
        self.image.save_with_format(path, format)?;
        Ok(())
    }
}

/// 检查输出路径的扩展名是否对应一种能保留 LSB 的无损格式。
pub fn ensure_lossless(path: &Path) -> Result<ImageFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    match ImageFormat::from_extension(&extension) {
        Some(
            format @ (ImageFormat::Png
            | ImageFormat::Bmp
            | ImageFormat::Tiff
            | ImageFormat::WebP
            | ImageFormat::Qoi),
        ) => Ok(format),
        _ => Err(StegoError::LossyFormat { extension }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use tempfile::tempdir;

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 7) as u8, (y * 13) as u8, (x + y) as u8])
        })
    }

    #[test]
    fn channels_are_raster_ordered_rgb() {
        let carrier = Carrier::from_rgb(gradient(3, 2));
        assert_eq!(carrier.channels().len(), 3 * 2 * 3);
        // 第二行第一个像素 (x=0, y=1)
        assert_eq!(&carrier.channels()[9..12], &[0, 13, 1]);
    }

    #[test]
    fn to_rgb_returns_the_decoded_image() {
        let carrier = Carrier::from_rgb(gradient(5, 4));
        assert_eq!(carrier.to_rgb(), gradient(5, 4));
        assert_eq!((carrier.width(), carrier.height()), (5, 4));

        let stego = carrier.embed("").unwrap().to_rgb();
        assert_eq!(stego.dimensions(), (5, 4));
        assert_eq!(stego.as_raw().len(), carrier.channels().len());
    }

    #[test]
    fn embed_does_not_modify_self() {
        let carrier = Carrier::from_rgb(gradient(20, 20));
        let stego = carrier.embed("hello").unwrap();
        assert_eq!(carrier, Carrier::from_rgb(gradient(20, 20)));
        assert_eq!(stego.extract(Utf8Policy::Lossy).unwrap(), "hello");
    }

    #[test]
    fn save_and_open_preserve_lsbs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stego.png");

        let stego = Carrier::from_rgb(gradient(32, 32))
            .embed("survives png")
            .unwrap();
        stego.save(&path).unwrap();

        let reopened = Carrier::open(&path).unwrap();
        assert_eq!(reopened.to_rgb(), stego.to_rgb());
        assert_eq!(reopened.extract(Utf8Policy::Strict).unwrap(), "survives png");
    }

    #[test]
    fn report_uses_image_dimensions() {
        let report = Carrier::from_rgb(gradient(100, 100)).report(6);
        assert_eq!(report.capacity_bytes, 3_750);
        assert!(report.fits);
    }

    #[test]
    fn lossless_formats_are_accepted() {
        for name in ["a.png", "b.BMP", "c.tiff", "d.tif", "e.webp", "f.qoi"] {
            assert!(ensure_lossless(Path::new(name)).is_ok(), "{name}");
        }
    }

    #[test]
    fn lossy_or_unknown_formats_are_rejected() {
        for name in ["a.jpg", "b.jpeg", "c.gif", "d.txt", "no_extension"] {
            assert!(
                matches!(
                    ensure_lossless(Path::new(name)),
                    Err(StegoError::LossyFormat { .. })
                ),
                "{name}"
            );
        }
    }
}
