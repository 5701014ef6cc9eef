//! # 图像质量指标模块
//!
//! 计算载体图像与隐写图像之间的 SSIM 和 PSNR，只用于评估隐写结果，
//! 不参与嵌入过程。像素值统一缩放到 [0, 1]。
//!
//! SSIM 使用 7x7 均匀窗口、样本协方差，只在窗口完全位于图像内部的像素上取平均，
//! 最后对 R、G、B 三个通道求均值。

use crate::constants::{CHANNELS_PER_PIXEL, SSIM_K1, SSIM_K2, SSIM_WINDOW};
use crate::error::{Result, StegoError};
use image::RgbImage;
use serde::Serialize;

const DATA_RANGE: f64 = 1.0;

/// 一对图像的质量评估结果。
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityReport {
    pub ssim: f64,
    /// 单位 dB，两幅图像完全相同时为正无穷。
    pub psnr: f64,
}

/// 同时计算 SSIM 和 PSNR。
pub fn compare(reference: &RgbImage, stego: &RgbImage) -> Result<QualityReport> {
    Ok(QualityReport {
        ssim: ssim(reference, stego)?,
        psnr: psnr(reference, stego)?,
    })
}

/// 峰值信噪比 (dB)。
///
/// # Errors
///
/// 两幅图像尺寸不同时返回 [`StegoError::DimensionMismatch`]。
pub fn psnr(reference: &RgbImage, stego: &RgbImage) -> Result<f64> {
    ensure_same_shape(reference, stego)?;

    let samples = reference.as_raw().len();
    let squared_error: f64 = reference
        .as_raw()
        .iter()
        .zip(stego.as_raw())
        .map(|(&a, &b)| (normalize(a) - normalize(b)).powi(2))
        .sum();

    if samples == 0 || squared_error == 0.0 {
        return Ok(f64::INFINITY);
    }

    let mse = squared_error / samples as f64;
    Ok(10.0 * (DATA_RANGE * DATA_RANGE / mse).log10())
}

/// 结构相似性指数，取值不超过 1，完全相同时为 1。
///
/// # Errors
///
/// * [`StegoError::DimensionMismatch`] - 两幅图像尺寸不同。
/// * [`StegoError::ImageTooSmall`] - 宽或高小于 7 像素。
pub fn ssim(reference: &RgbImage, stego: &RgbImage) -> Result<f64> {
    ensure_same_shape(reference, stego)?;

    let (width, height) = reference.dimensions();
    if (width as usize) < SSIM_WINDOW || (height as usize) < SSIM_WINDOW {
        return Err(StegoError::ImageTooSmall {
            width,
            height,
            window: SSIM_WINDOW,
        });
    }

    let channels = CHANNELS_PER_PIXEL as usize;
    let total: f64 = (0..channels)
        .map(|channel| channel_ssim(reference, stego, channel))
        .sum();

    Ok(total / channels as f64)
}

fn ensure_same_shape(reference: &RgbImage, stego: &RgbImage) -> Result<()> {
    if reference.dimensions() != stego.dimensions() {
        return Err(StegoError::DimensionMismatch {
            reference: reference.dimensions(),
            stego: stego.dimensions(),
        });
    }
    Ok(())
}

fn normalize(value: u8) -> f64 {
    f64::from(value) / 255.0
}

fn plane(image: &RgbImage, channel: usize) -> Vec<f64> {
    image
        .as_raw()
        .iter()
        .skip(channel)
        .step_by(CHANNELS_PER_PIXEL as usize)
        .map(|&value| normalize(value))
        .collect()
}

fn channel_ssim(reference: &RgbImage, stego: &RgbImage, channel: usize) -> f64 {
    let (width, height) = reference.dimensions();
    let (width, height) = (width as usize, height as usize);

    let x = plane(reference, channel);
    let y = plane(stego, channel);

    let sum_x = SummedArea::new(width, height, |i| x[i]);
    let sum_y = SummedArea::new(width, height, |i| y[i]);
    let sum_xx = SummedArea::new(width, height, |i| x[i] * x[i]);
    let sum_yy = SummedArea::new(width, height, |i| y[i] * y[i]);
    let sum_xy = SummedArea::new(width, height, |i| x[i] * y[i]);

    let np = (SSIM_WINDOW * SSIM_WINDOW) as f64;
    let cov_norm = np / (np - 1.0);
    let c1 = (SSIM_K1 * DATA_RANGE).powi(2);
    let c2 = (SSIM_K2 * DATA_RANGE).powi(2);

    let mut total = 0.0;
    let mut count = 0usize;
    for top in 0..=height - SSIM_WINDOW {
        for left in 0..=width - SSIM_WINDOW {
            let ux = sum_x.window(left, top) / np;
            let uy = sum_y.window(left, top) / np;
            let uxx = sum_xx.window(left, top) / np;
            let uyy = sum_yy.window(left, top) / np;
            let uxy = sum_xy.window(left, top) / np;

            let vx = cov_norm * (uxx - ux * ux);
            let vy = cov_norm * (uyy - uy * uy);
            let vxy = cov_norm * (uxy - ux * uy);

            let numerator = (2.0 * ux * uy + c1) * (2.0 * vxy + c2);
            let denominator = (ux * ux + uy * uy + c1) * (vx + vy + c2);
            total += numerator / denominator;
            count += 1;
        }
    }

    total / count as f64
}

/// 积分图，用于 O(1) 求任意 SSIM 窗口内的和。
struct SummedArea {
    stride: usize,
    table: Vec<f64>,
}

impl SummedArea {
    fn new(width: usize, height: usize, value: impl Fn(usize) -> f64) -> Self {
        let stride = width + 1;
        let mut table = vec![0.0; stride * (height + 1)];
        for row in 0..height {
            let mut running = 0.0;
            for col in 0..width {
                running += value(row * width + col);
                table[(row + 1) * stride + col + 1] = table[row * stride + col + 1] + running;
            }
        }
        Self { stride, table }
    }

    fn window(&self, left: usize, top: usize) -> f64 {
        let right = left + SSIM_WINDOW;
        let bottom = top + SSIM_WINDOW;
        self.table[bottom * self.stride + right]
            - self.table[top * self.stride + right]
            - self.table[bottom * self.stride + left]
            + self.table[top * self.stride + left]
    }
}
