//! # 比特编解码模块
//!
//! 字节序列与比特序列之间的转换。每个字节按最高有效位在前 (MSB-first) 展开。

use crate::constants::BITS_PER_BYTE;

/// 单个比特，取值只能是 0 或 1。
pub type Bit = u8;

/// 将字节序列展开为比特序列，每个字节产生 8 个比特，最高位在前。
///
/// 输出长度恒为 `8 * bytes.len()`。
pub fn pack_bits(bytes: &[u8]) -> Vec<Bit> {
    bytes
        .iter()
        .flat_map(|&byte| (0..BITS_PER_BYTE).rev().map(move |shift| (byte >> shift) & 1))
        .collect()
}

/// 将比特序列按 8 个一组重新组装为字节，最高位在前。
///
/// 末尾不足 8 个的比特会被直接丢弃，不会补零。
/// 输入中只考虑每个元素的最低位。
pub fn unpack_bits(bits: &[Bit]) -> Vec<u8> {
    bits.chunks_exact(BITS_PER_BYTE)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | (bit & 1)))
        .collect()
}
