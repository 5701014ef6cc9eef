//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`recover`、`capacity` 和 `metrics` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心隐写算法以及向用户报告结果。

use crate::capacity::{CapacityReport, compute_report};
use crate::carrier::{Carrier, ensure_lossless};
use crate::cli::{CapacityArgs, HideArgs, MessageSource, MetricsArgs, RecoverArgs};
use crate::constants::{BITS_PER_BYTE, STEGO_SUFFIX};
use crate::metrics::{self, QualityReport};
use crate::steganography::Utf8Policy;
use anyhow::{Context, Result};
use colored::Colorize;
use image::RgbImage;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取载体图像和待隐藏文本、检查隐写空间是否足够、调用核心嵌入函数，
/// 最后将结果以无损格式写入目标图像文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径和文本来源的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像或文本文件。
/// * 目标路径不是无损格式，或目标文件已存在且未指定 `--force`。
/// * 图像没有足够的空间来隐藏文本。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let message = read_message(&args.source)?;
    let dest = args.dest.unwrap_or_else(|| default_dest(&args.image));

    ensure_lossless(&dest).with_context(|| {
        format!(
            "Refusing to write stego image to: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;
    ensure_writable(&dest, args.force)?;

    let cover = Carrier::open(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let report = cover.report(message.len());
    debug!(
        "{}x{} cover, {} of {} bits required",
        report.width, report.height, report.total_bits, report.capacity_bits
    );

    anyhow::ensure!(
        report.fits,
        "Not enough space in the image to hide the text. \nRequired: {} bytes, Available: {} bytes",
        report
            .total_bits
            .div_ceil(BITS_PER_BYTE as u64)
            .to_string()
            .red()
            .bold(),
        report.capacity_bytes.to_string().green().bold()
    );

    let stego = cover
        .embed(&message)
        .context("Failed to hide the message in the image.")?;

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).with_context(|| {
            format!(
                "Unable to create output directory: {}",
                parent.to_string_lossy().red().bold()
            )
        })?;
    }

    stego.save(&dest).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    info!("embedded {} bytes ({:.4} bpp)", message.len(), report.used_bpp);
    println!(
        "Embedded {} bytes into {}",
        message.len().to_string().green().bold(),
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、调用核心提取函数恢复文本，
/// 然后将文本写入目标文件，或在未指定目标文件时输出到标准输出。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像文件。
/// * 图像中没有完整的隐藏消息 (或严格模式下负载不是合法 UTF-8)。
/// * 目标文件已存在且未指定 `--force`，或无法写入。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    if let Some(text) = &args.text {
        ensure_writable(text, args.force)?;
    }

    let policy = if args.strict {
        Utf8Policy::Strict
    } else {
        Utf8Policy::Lossy
    };

    let carrier = Carrier::open(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let message = carrier.extract(policy).with_context(|| {
        format!(
            "Failed to recover the hidden text from '{}'. \nThe image may not contain a hidden message or is corrupted.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    info!("recovered {} bytes", message.len());

    match args.text {
        Some(path) => {
            fs::write(&path, &message).with_context(|| {
                format!(
                    "Unable to write to target text file: {}",
                    path.to_string_lossy().red().bold()
                )
            })?;
            println!(
                "The text has been successfully recovered and saved: {}",
                path.to_string_lossy().green().bold()
            );
        }
        None => println!("{message}"),
    }

    Ok(())
}

/// 处理 'Capacity' 命令的执行逻辑。
///
/// 只读取图像头部获取尺寸，不解码像素，也不修改任何文件。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let message = read_message(&args.source)?;

    let (width, height) = image::image_dimensions(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let report = compute_report(width, height, message.len());
    if !report.fits {
        warn!(
            "message does not fit: {} bits needed, {} available",
            report.total_bits, report.capacity_bits
        );
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", format_capacity(&args.image, &report));
    }

    Ok(())
}

/// 处理 'Metrics' 命令的执行逻辑。
pub fn handle_metrics(args: MetricsArgs) -> Result<()> {
    let reference = load_rgb(&args.reference)?;
    let stego = load_rgb(&args.stego)?;

    let report = metrics::compare(&reference, &stego).with_context(|| {
        format!(
            "Unable to compare {} with {}",
            args.reference.to_string_lossy().red().bold(),
            args.stego.to_string_lossy().red().bold()
        )
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", format_quality(&report));
    }

    Ok(())
}

/// 按人类可读的格式渲染容量报告。
pub fn format_capacity(image: &Path, report: &CapacityReport) -> String {
    let fits = if report.fits {
        "yes".green().bold()
    } else {
        "no".red().bold()
    };

    format!(
        "Image: {} ({}x{}, pixels={})\n\
         Capacity: {} bits ({} bytes)\n\
         Payload: {} bits + header {} bits\n\
         Total used: {} bits ({:.4} bpp)\n\
         Fits: {}",
        image.to_string_lossy(),
        report.width,
        report.height,
        report.pixels,
        report.capacity_bits,
        report.capacity_bytes,
        report.payload_bits,
        report.header_bits,
        report.total_bits,
        report.used_bpp,
        fits
    )
}

pub fn format_quality(report: &QualityReport) -> String {
    format!("SSIM: {:.6}\nPSNR: {:.2} dB", report.ssim, report.psnr)
}

/// 默认输出路径：与输入图像同目录的 `<名称>_stego.png`。
pub fn default_dest(image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    image.with_file_name(format!("{stem}{STEGO_SUFFIX}.png"))
}

fn read_message(source: &MessageSource) -> Result<String> {
    match (&source.text, &source.message) {
        (Some(path), _) => fs::read_to_string(path).with_context(|| {
            format!(
                "Unable to read text file: {}",
                path.to_string_lossy().red().bold()
            )
        }),
        (None, Some(message)) => Ok(message.clone()),
        (None, None) => anyhow::bail!("No text given. Use --text <file> or --message <text>."),
    }
}

fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

fn load_rgb(path: &Path) -> Result<RgbImage> {
    let carrier = Carrier::open(path).with_context(|| {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;
    Ok(carrier.to_rgb())
}
