//! # 错误类型模块
//!
//! 定义隐写编解码核心及其协作模块 (载体图像、质量指标) 的全部错误类型。
//! 所有错误都在检测点同步返回，不做任何重试。

use thiserror::Error;

/// 核心操作的 `Result` 别名。
pub type Result<T> = std::result::Result<T, StegoError>;

/// 隐写嵌入、提取及评估过程中可能出现的错误。
#[derive(Debug, Error)]
pub enum StegoError {
    /// 消息长度超出 32 位无符号整数的表示范围。
    #[error("message length {length} does not fit in 32 bits (max {max})", max = u32::MAX)]
    LengthOutOfRange { length: usize },

    /// 长度头部缓冲区不是恰好 4 个字节。
    #[error("invalid length header: expected 4 bytes, got {actual}")]
    InvalidHeader { actual: usize },

    /// 帧的比特数超过可用的通道数量，嵌入在修改任何数据之前中止。
    #[error(
        "message too large for image: capacity={capacity_bytes} bytes, needed={required_bytes} bytes"
    )]
    CapacityExceeded {
        capacity_bytes: usize,
        required_bytes: usize,
    },

    /// 可用比特少于头部或声明的消息长度所需。
    #[error(
        "image does not contain a complete message: {available_bits} bits available, {required_bits} required"
    )]
    TruncatedData {
        available_bits: u64,
        required_bits: u64,
    },

    /// 严格模式下，提取出的负载不是合法的 UTF-8。
    #[error("extracted payload is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// 参与比较的两幅图像尺寸不同。
    #[error("image shapes differ: {reference:?} vs {stego:?}")]
    DimensionMismatch {
        reference: (u32, u32),
        stego: (u32, u32),
    },

    /// 图像小于 SSIM 窗口。
    #[error("image {width}x{height} is smaller than the {window}x{window} SSIM window")]
    ImageTooSmall {
        width: u32,
        height: u32,
        window: usize,
    },

    /// 输出路径不是无损图像格式。
    #[error("'{extension}' is not a lossless image format; use png, bmp, tiff, webp or qoi")]
    LossyFormat { extension: String },

    /// 图像解码或编码失败。
    #[error(transparent)]
    Image(#[from] image::ImageError),
}
