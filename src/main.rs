use anyhow::{Context, Result};
use clap::Parser;
use hospital_exporter::config::{Cli, Commands, Config};
use hospital_exporter::export;
use hospital_exporter::health::Provider;
use std::path::Path;

fn main() -> Result<()> {
    // 解析命令行参数
    let cli = Cli::parse();

    // 加载配置
    let config = Config::load_with_cli(&cli)?;

    // 初始化日志系统
    let _guard = config.init_logging()?;

    handle_command(&cli.command, &config)
}

fn handle_command(command: &Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Export {
            providers, stop, ..
        } => {
            let providers = load_providers(providers)?;
            let run_marker = stop.unwrap_or_else(|| chrono::Utc::now().timestamp_millis());

            tracing::info!("开始导出 {} 个机构，运行标记: {}", providers.len(), run_marker);

            match export::export(&providers, &config.exporter, run_marker)? {
                Some(path) => println!("已导出: {}", path.display()),
                None => println!("医院信息导出已禁用"),
            }
        }
        Commands::PrintConfig => {
            println!("{}", config.to_toml()?);
        }
        Commands::ResetConfig => {
            // 重置配置
            let default_config = Config::default();
            if let Some(config_path) = Config::get_user_config_path() {
                default_config.save_to_file(&config_path)?;
                println!("配置已重置到: {}", config_path.display());
            } else {
                println!("无法确定配置文件路径");
            }
        }
    }

    Ok(())
}

/// 读取模拟结束后交出的机构列表
fn load_providers(path: &Path) -> Result<Vec<Provider>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("无法读取机构文件: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("机构文件格式错误: {}", path.display()))
}
