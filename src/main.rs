use clap::Parser;

use lsb_stego::{
    cli::{Cli, Commands},
    handler::{handle_capacity, handle_hide, handle_metrics, handle_recover},
    logging::init_logger,
};

/// 程序的主入口点
///
/// 负责解析命令行参数、初始化日志，并根据指定的子命令
/// 将执行分派到相应的处理函数
fn main() -> anyhow::Result<()> {
    // 解析命令行参数
    let cli = Cli::parse();

    init_logger(cli.verbose);

    // 根据子命令调用相应的处理函数
    match cli.command {
        Commands::Hide(args) => handle_hide(args),
        Commands::Recover(args) => handle_recover(args),
        Commands::Capacity(args) => handle_capacity(args),
        Commands::Metrics(args) => handle_metrics(args),
    }
}
