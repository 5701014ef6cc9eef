//! # 隐写核心算法模块
//!
//! 在扁平的通道序列 (R, G, B 交错，光栅顺序) 的最低有效位中写入和读取消息帧：
//!
//! ```text
//! [32 bit 大端消息长度][length 字节的 UTF-8 消息]
//! ```
//!
//! 每个通道值承载 1 bit。两个操作都是无状态的纯函数，不保留对输入的引用。

use crate::bits::{Bit, pack_bits, unpack_bits};
use crate::constants::{BITS_PER_BYTE, HEADER_BITS, HEADER_BYTES, LSB_CLEAR_MASK};
use crate::error::{Result, StegoError};
use crate::header::{decode_length, encode_length};
use log::debug;

/// 提取时对非法 UTF-8 负载的处理策略。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Utf8Policy {
    /// 非法字节序列替换为 U+FFFD。
    #[default]
    Lossy,
    /// 非法字节序列视为错误。
    Strict,
}

/// 将 `message` 隐藏到通道序列的最低有效位中，返回一个新的通道序列。
///
/// 只有前 `32 + 8 * message.len()` 个通道的 LSB 会被改写，其余通道原样复制。
/// 输入序列永远不会被修改，因此失败时调用者的数据保持不变。
///
/// # Errors
///
/// * [`StegoError::LengthOutOfRange`] - 消息字节数超过 `u32::MAX`。
/// * [`StegoError::CapacityExceeded`] - 帧的比特数超过通道数量。
pub fn embed(channels: &[u8], message: &str) -> Result<Vec<u8>> {
    let payload = message.as_bytes();

    let mut frame = Vec::with_capacity(HEADER_BYTES + payload.len());
    frame.extend_from_slice(&encode_length(payload.len())?);
    frame.extend_from_slice(payload);

    let bits = pack_bits(&frame);

    if bits.len() > channels.len() {
        return Err(StegoError::CapacityExceeded {
            capacity_bytes: channels.len() / BITS_PER_BYTE,
            required_bytes: bits.len().div_ceil(BITS_PER_BYTE),
        });
    }

    debug!(
        "embedding {} payload bytes ({} bits) into {} channels",
        payload.len(),
        bits.len(),
        channels.len()
    );

    let mut output = channels.to_vec();
    for (channel, &bit) in output.iter_mut().zip(&bits) {
        *channel = (*channel & LSB_CLEAR_MASK) | bit;
    }

    Ok(output)
}

/// 从通道序列中恢复隐藏的消息，非法 UTF-8 以替换字符表示。
///
/// # Errors
///
/// 通道数量不足以容纳头部或声明的消息长度时返回 [`StegoError::TruncatedData`]。
pub fn extract(channels: &[u8]) -> Result<String> {
    extract_with_policy(channels, Utf8Policy::Lossy)
}

/// 按指定的 UTF-8 策略从通道序列中恢复隐藏的消息。
///
/// 要么返回完整的消息，要么返回错误，不会返回截断的文本。
///
/// # Errors
///
/// * [`StegoError::TruncatedData`] - 少于 32 个通道，或剩余比特少于声明的消息长度。
/// * [`StegoError::InvalidUtf8`] - 仅在 [`Utf8Policy::Strict`] 下，负载不是合法 UTF-8。
pub fn extract_with_policy(channels: &[u8], policy: Utf8Policy) -> Result<String> {
    if channels.len() < HEADER_BITS {
        return Err(StegoError::TruncatedData {
            available_bits: channels.len() as u64,
            required_bits: HEADER_BITS as u64,
        });
    }

    let header = unpack_bits(&read_lsbs(&channels[..HEADER_BITS]));
    let length = decode_length(&header)?;

    let required_bits = u64::from(length) * BITS_PER_BYTE as u64;
    let available_bits = (channels.len() - HEADER_BITS) as u64;
    if available_bits < required_bits {
        return Err(StegoError::TruncatedData {
            available_bits,
            required_bits,
        });
    }

    debug!("header declares {length} bytes, {available_bits} bits available");

    // required_bits <= available_bits，因此不会越界
    let end = HEADER_BITS + required_bits as usize;
    let payload = unpack_bits(&read_lsbs(&channels[HEADER_BITS..end]));

    match policy {
        Utf8Policy::Lossy => Ok(String::from_utf8_lossy(&payload).into_owned()),
        Utf8Policy::Strict => Ok(String::from_utf8(payload)?),
    }
}

fn read_lsbs(channels: &[u8]) -> Vec<Bit> {
    channels.iter().map(|&channel| channel & 1).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 生成 LSB 混杂的确定性通道序列。
    fn cover(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 37 + 11) as u8).collect()
    }

    /// 构造一个直接写入指定帧字节的通道序列。
    fn with_frame(frame: &[u8], len: usize) -> Vec<u8> {
        let mut channels = cover(len);
        for (channel, bit) in channels.iter_mut().zip(pack_bits(frame)) {
            *channel = (*channel & LSB_CLEAR_MASK) | bit;
        }
        channels
    }

    #[test]
    fn round_trip_various_messages() {
        let channels = cover(3 * 64 * 64);
        let messages = [
            "secret",
            "",
            "a",
            "Ünïcödé ✓",
            "隐写术测试",
            "emoji 🦀🔒",
            "line\nbreak\0nul",
        ];
        for message in messages {
            let stego = embed(&channels, message).unwrap();
            assert_eq!(extract(&stego).unwrap(), message);
        }
    }

    #[test]
    fn tiny_image_cannot_hold_header() {
        // 2x2 像素，12 个通道
        let channels = cover(12);
        let err = embed(&channels, "").unwrap_err();
        assert!(matches!(
            err,
            StegoError::CapacityExceeded {
                capacity_bytes: 1,
                required_bytes: 4
            }
        ));
    }

    #[test]
    fn secret_fits_in_100x100() {
        let channels = cover(100 * 100 * 3);
        let stego = embed(&channels, "secret").unwrap();
        assert_eq!(stego.len(), channels.len());
        assert_eq!(extract(&stego).unwrap(), "secret");
    }

    #[test]
    fn capacity_boundary_is_exact() {
        // "ab" 需要 32 + 16 = 48 bit
        let stego = embed(&cover(48), "ab").unwrap();
        assert_eq!(extract(&stego).unwrap(), "ab");

        let err = embed(&cover(47), "ab").unwrap_err();
        assert!(matches!(
            err,
            StegoError::CapacityExceeded {
                capacity_bytes: 5,
                required_bytes: 6
            }
        ));
    }

    #[test]
    fn failed_embed_leaves_input_untouched() {
        let channels = cover(40);
        let before = channels.clone();
        assert!(embed(&channels, "too long for forty channels").is_err());
        assert_eq!(channels, before);
    }

    #[test]
    fn only_frame_lsbs_change() {
        let channels = cover(3 * 32 * 32);
        let message = "tail must survive";
        let stego = embed(&channels, message).unwrap();
        let total_bits = HEADER_BITS + message.len() * BITS_PER_BYTE;

        for (i, (&before, &after)) in channels.iter().zip(&stego).enumerate() {
            if i < total_bits {
                assert_eq!(before & LSB_CLEAR_MASK, after & LSB_CLEAR_MASK, "channel {i}");
            } else {
                assert_eq!(before, after, "channel {i}");
            }
        }
    }

    #[test]
    fn empty_message_writes_zero_header() {
        let channels = vec![0xFF; 64];
        let stego = embed(&channels, "").unwrap();
        assert!(stego[..HEADER_BITS].iter().all(|&c| c == 0xFE));
        assert!(stego[HEADER_BITS..].iter().all(|&c| c == 0xFF));
        assert_eq!(extract(&stego).unwrap(), "");
    }

    #[test]
    fn extract_rejects_missing_header() {
        let err = extract(&cover(31)).unwrap_err();
        assert!(matches!(
            err,
            StegoError::TruncatedData {
                available_bits: 31,
                required_bits: 32
            }
        ));
    }

    #[test]
    fn extract_rejects_truncated_message() {
        // 头部声明 10 字节，但只剩 8 字节的空间
        let channels = with_frame(&[0, 0, 0, 10], HEADER_BITS + 64);
        let err = extract(&channels).unwrap_err();
        assert!(matches!(
            err,
            StegoError::TruncatedData {
                available_bits: 64,
                required_bits: 80
            }
        ));
    }

    #[test]
    fn extract_rejects_huge_declared_length() {
        let channels = with_frame(&[0xFF, 0xFF, 0xFF, 0xFF], 1024);
        assert!(matches!(
            extract(&channels),
            Err(StegoError::TruncatedData { .. })
        ));
    }

    #[test]
    fn invalid_utf8_is_replaced_by_default() {
        let channels = with_frame(&[0, 0, 0, 3, b'o', 0xFF, b'k'], 128);
        assert_eq!(extract(&channels).unwrap(), "o\u{FFFD}k");
    }

    #[test]
    fn invalid_utf8_fails_in_strict_mode() {
        let channels = with_frame(&[0, 0, 0, 2, 0xC3, 0x28], 128);
        assert!(matches!(
            extract_with_policy(&channels, Utf8Policy::Strict),
            Err(StegoError::InvalidUtf8(_))
        ));

        let stego = embed(&cover(256), "ok ✓").unwrap();
        assert_eq!(extract_with_policy(&stego, Utf8Policy::Strict).unwrap(), "ok ✓");
    }
}
