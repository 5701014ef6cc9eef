//! # 容量估算模块
//!
//! 纯算术：根据图像尺寸和消息字节数计算隐写容量与比特占用 (bpp)。
//! 可独立于实际嵌入操作使用，作为嵌入前的预检。

use crate::constants::{BITS_PER_BYTE, BITS_PER_CHANNEL, CHANNELS_PER_PIXEL, HEADER_BITS};
use serde::Serialize;

/// 一次容量预检的结果快照，构造后不再修改。
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CapacityReport {
    pub width: u32,
    pub height: u32,
    pub pixels: u64,
    pub capacity_bits: u64,
    pub capacity_bytes: u64,
    pub header_bits: u64,
    pub payload_bits: u64,
    pub total_bits: u64,
    /// 实际使用的比特数与像素总数之比。
    pub used_bpp: f64,
    pub fits: bool,
}

/// 计算图像可隐藏的比特总数：`width * height * channels_per_pixel * bits_per_channel`。
///
/// 0 像素的图像返回 0。结果超出 `u64` 时饱和为 `u64::MAX`，从不失败。
pub fn compute_capacity(
    width: u32,
    height: u32,
    channels_per_pixel: u32,
    bits_per_channel: u32,
) -> u64 {
    pixel_count(width, height)
        .saturating_mul(u64::from(channels_per_pixel))
        .saturating_mul(u64::from(bits_per_channel))
}

// (2^32 - 1)^2 < 2^64，像素数本身不会溢出
fn pixel_count(width: u32, height: u32) -> u64 {
    u64::from(width) * u64::from(height)
}

/// 为给定尺寸的 RGB 图像和消息字节长度生成容量报告。
///
/// 按每个 RGB 通道 1 个 LSB 计算，头部固定为 32 bit。
pub fn compute_report(width: u32, height: u32, message_len: usize) -> CapacityReport {
    let pixels = pixel_count(width, height);
    let capacity_bits = compute_capacity(width, height, CHANNELS_PER_PIXEL, BITS_PER_CHANNEL);
    let header_bits = HEADER_BITS as u64;
    let payload_bits = (message_len as u64).saturating_mul(BITS_PER_BYTE as u64);
    let total_bits = header_bits.saturating_add(payload_bits);
    let used_bpp = if pixels == 0 {
        0.0
    } else {
        total_bits as f64 / pixels as f64
    };

    CapacityReport {
        width,
        height,
        pixels,
        capacity_bits,
        capacity_bytes: capacity_bits / BITS_PER_BYTE as u64,
        header_bits,
        payload_bits,
        total_bits,
        used_bpp,
        fits: total_bits <= capacity_bits,
    }
}
