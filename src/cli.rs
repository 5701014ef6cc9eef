//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在无损格式图像 (如 PNG, BMP) 的 RGB 通道中隐藏或恢复 UTF-8 文本。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在无损格式图像 (如 PNG, BMP) 的 RGB 通道中隐藏或恢复 UTF-8 文本。\n每个颜色通道只改写 1 bit，消息前带有 32 bit 长度头部。"
)]
pub struct Cli {
    /// 提高日志详细程度 (-v info, -vv debug, -vvv trace)，`RUST_LOG` 优先。
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令。
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 在无损格式图像中隐藏文本。
    Hide(HideArgs),

    /// 从经过隐写的图像中恢复隐藏的文本。
    Recover(RecoverArgs),

    /// 估算图像容量以及消息占用的比特数 (bpp)，不修改任何文件。
    Capacity(CapacityArgs),

    /// 计算载体图像与隐写图像之间的 SSIM 和 PSNR。
    Metrics(MetricsArgs),
}

/// 待隐藏文本的来源：文本文件或命令行字符串，二选一。
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct MessageSource {
    /// 要隐藏的文本内容的文件路径 (UTF-8)。
    #[arg(short, long)]
    pub text: Option<PathBuf>,

    /// 直接在命令行中给出的文本。
    #[arg(short, long)]
    pub message: Option<String>,
}

/// 'hide' 命令所需的参数。
#[derive(Args, Debug)]
pub struct HideArgs {
    /// 用于隐写的输入图像文件路径 (如 PNG, BMP)。
    #[arg(short, long)]
    pub image: PathBuf,

    #[command(flatten)]
    pub source: MessageSource,

    /// 隐写完成后，保存结果图像的输出路径。默认为输入图像旁的 `<名称>_stego.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'recover' 命令所需的参数。
#[derive(Args, Debug)]
pub struct RecoverArgs {
    /// 已隐藏文本数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复文本后，保存文本内容的输出路径。省略时输出到标准输出。
    #[arg(short, long)]
    pub text: Option<PathBuf>,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,

    /// 负载不是合法 UTF-8 时报错，而不是用替换字符代替。
    #[arg(long)]
    pub strict: bool,
}

/// 'capacity' 命令所需的参数。
#[derive(Args, Debug)]
pub struct CapacityArgs {
    /// 载体图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    #[command(flatten)]
    pub source: MessageSource,

    /// 以 JSON 格式输出报告。
    #[arg(long)]
    pub json: bool,
}

/// 'metrics' 命令所需的参数。
#[derive(Args, Debug)]
pub struct MetricsArgs {
    /// 参考图像 (原始载体) 路径。
    #[arg(short, long)]
    pub reference: PathBuf,

    /// 待比较的隐写图像路径。
    #[arg(short, long)]
    pub stego: PathBuf,

    /// 以 JSON 格式输出结果。
    #[arg(long)]
    pub json: bool,
}
