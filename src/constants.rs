/// 长度头部占用的比特数。
/// 消息长度以 32 位大端无符号整数写入，每个通道的 LSB 存储 1 bit，
/// 因此需要 32 个通道值来隐藏长度。
pub const HEADER_BITS: usize = 32;

/// 长度头部的字节数 (`u32`)。
pub const HEADER_BYTES: usize = HEADER_BITS / 8;

/// 每个字节展开后的比特数。
pub const BITS_PER_BYTE: usize = 8;

/// 每个像素参与隐写的颜色通道数 (R, G, B)。
pub const CHANNELS_PER_PIXEL: u32 = 3;

/// 每个通道用于隐写的比特数，本方案只改写最低有效位。
pub const BITS_PER_CHANNEL: u32 = 1;

/// 清除最低有效位的掩码。
pub const LSB_CLEAR_MASK: u8 = 0xFE;

/// SSIM 滑动窗口的边长 (均匀窗口 7x7)。
pub const SSIM_WINDOW: usize = 7;

/// SSIM 稳定常数 K1。
pub const SSIM_K1: f64 = 0.01;

/// SSIM 稳定常数 K2。
pub const SSIM_K2: f64 = 0.03;

/// 默认输出图像的文件名后缀：`<stem>_stego.png`。
pub const STEGO_SUFFIX: &str = "_stego";
