//! # 长度头部模块
//!
//! 消息帧最前面的 32 位大端长度字段。

use crate::constants::HEADER_BYTES;
use crate::error::{Result, StegoError};

/// 将消息字节长度编码为 4 字节大端序。
///
/// # Errors
///
/// 长度超过 `u32::MAX` 时返回 [`StegoError::LengthOutOfRange`]。
pub fn encode_length(length: usize) -> Result<[u8; HEADER_BYTES]> {
    u32::try_from(length)
        .map(u32::to_be_bytes)
        .map_err(|_| StegoError::LengthOutOfRange { length })
}

/// 从恰好 4 个字节的大端缓冲区中解码消息长度。
///
/// # Errors
///
/// 输入不是 4 个字节时返回 [`StegoError::InvalidHeader`]。
pub fn decode_length(bytes: &[u8]) -> Result<u32> {
    <[u8; HEADER_BYTES]>::try_from(bytes)
        .map(u32::from_be_bytes)
        .map_err(|_| StegoError::InvalidHeader {
            actual: bytes.len(),
        })
}
