//! # lsb_stego 库
//!
//! 本库包含 LSB 文本隐写工具的核心逻辑：
//!
//! * [`bits`]、[`header`]、[`capacity`]、[`steganography`] - 纯函数编解码核心，不涉及任何 I/O。
//! * [`carrier`]、[`metrics`] - 图像解码/编码以及 SSIM/PSNR 质量评估。
//! * [`cli`]、[`handler`]、[`logging`] - 命令行前端。
//!
//! ```
//! use lsb_stego::{embed, extract};
//!
//! let cover = vec![0x80u8; 300];
//! let stego = embed(&cover, "secret").unwrap();
//! assert_eq!(extract(&stego).unwrap(), "secret");
//! ```

// 声明库包含的所有模块。

pub mod bits;
pub mod capacity;
pub mod carrier;
pub mod cli;
pub mod constants;
pub mod error;
pub mod handler;
pub mod header;
pub mod logging;
pub mod metrics;
pub mod steganography;

pub use capacity::{CapacityReport, compute_capacity, compute_report};
pub use carrier::Carrier;
pub use error::{Result, StegoError};
pub use metrics::QualityReport;
pub use steganography::{Utf8Policy, embed, extract, extract_with_policy};
