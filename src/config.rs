//! 配置系统模块
//!
//! 统一处理 TOML 配置文件、环境变量、命令行参数

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use config::{Config as ConfigBuilder, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// 命令行参数
#[derive(Parser, Debug, Clone)]
#[command(name = "hospital-exporter")]
#[command(about = "医院利用率导出器 - 输出 FHIR STU3 Organization 资源")]
#[command(version)]
pub struct Cli {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 日志级别
    #[arg(short, long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// 输出根目录
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// 子命令
    #[command(subcommand)]
    pub command: Commands,
}

/// 支持的命令
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// 导出医院信息
    Export {
        /// 机构列表 JSON 文件
        #[arg(short, long)]
        providers: PathBuf,
        /// 模拟结束时间，用于区分输出文件名（默认当前毫秒时间戳）
        #[arg(short, long)]
        stop: Option<i64>,
        /// 使用 NDJSON 批量数据格式
        #[arg(long)]
        bulk_data: bool,
        /// 输出 COLLECTION 而非 BATCH Bundle
        #[arg(long)]
        no_transaction_bundle: bool,
    },
    /// 打印当前生效的配置
    PrintConfig,
    /// 重置配置
    ResetConfig,
}

/// 日志级别
#[derive(clap::ValueEnum, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

/// 主配置结构
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// 导出配置
    pub exporter: ExporterConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// 导出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExporterConfig {
    /// 输出根目录
    pub base_directory: PathBuf,
    /// 医院信息导出开关
    pub hospital: HospitalExportConfig,
    /// FHIR 通用选项
    pub fhir: FhirExportConfig,
}

/// 医院信息导出开关
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HospitalExportConfig {
    /// 是否导出 FHIR STU3 医院信息
    pub fhir_stu3_export: bool,
}

/// FHIR 通用选项
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FhirExportConfig {
    /// true 输出 BATCH Bundle，false 输出 COLLECTION
    pub transaction_bundle: bool,
    /// 使用 NDJSON 批量数据格式
    pub bulk_data: bool,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: LogLevel,
    /// 日志格式
    pub format: LogFormat,
    /// 日志输出目录
    pub directory: Option<PathBuf>,
}

/// 日志格式
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// 简洁格式
    Compact,
    /// 详细格式
    Full,
    /// JSON 格式
    Json,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            base_directory: PathBuf::from("output"),
            hospital: HospitalExportConfig::default(),
            fhir: FhirExportConfig::default(),
        }
    }
}

impl Default for HospitalExportConfig {
    fn default() -> Self {
        Self {
            fhir_stu3_export: true,
        }
    }
}

impl Default for FhirExportConfig {
    fn default() -> Self {
        Self {
            transaction_bundle: true,
            bulk_data: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
            directory: None,
        }
    }
}

impl Config {
    /// 使用指定的 CLI 参数加载配置
    pub fn load_with_cli(cli: &Cli) -> Result<Self> {
        let mut builder = ConfigBuilder::builder();

        // 1. 首先加载默认配置
        builder = builder.add_source(config::Config::try_from(&Config::default())?);

        // 2. 加载系统配置文件
        if let Some(system_config) = Self::get_system_config_path() {
            if system_config.exists() {
                builder = builder.add_source(File::from(system_config));
            }
        }

        // 3. 加载用户配置文件
        if let Some(user_config) = Self::get_user_config_path() {
            if user_config.exists() {
                builder = builder.add_source(File::from(user_config));
            }
        }

        // 4. 加载指定的配置文件
        if let Some(config_path) = &cli.config {
            if config_path.exists() {
                builder = builder.add_source(File::from(config_path.clone()));
            } else {
                return Err(anyhow!("配置文件不存在: {}", config_path.display()));
            }
        }

        // 5. 加载环境变量（前缀 HOSPITAL_EXPORTER_）
        builder = builder.add_source(
            Environment::with_prefix("HOSPITAL_EXPORTER")
                .prefix_separator("_")
                .separator("__"),
        );

        // 6. 构建配置
        let mut config: Config = builder.build()?.try_deserialize()?;

        // 7. 应用命令行参数覆盖
        config.apply_cli(cli);

        // 8. 验证配置
        config.validate()?;

        Ok(config)
    }

    /// 将命令行参数覆盖到已加载的配置上
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(log_level) = cli.log_level.clone() {
            self.logging.level = log_level;
        }

        if let Some(output_dir) = &cli.output_dir {
            self.exporter.base_directory = output_dir.clone();
        }

        if let Commands::Export {
            bulk_data,
            no_transaction_bundle,
            ..
        } = &cli.command
        {
            if *bulk_data {
                self.exporter.fhir.bulk_data = true;
            }
            if *no_transaction_bundle {
                self.exporter.fhir.transaction_bundle = false;
            }
        }
    }

    /// 获取系统配置文件路径
    pub fn get_system_config_path() -> Option<PathBuf> {
        Some(PathBuf::from("/etc/hospital-exporter/config.toml"))
    }

    /// 获取用户配置文件路径
    pub fn get_user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "hospital-exporter")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// 生成默认配置文件
    pub fn generate_default_config() -> Result<String> {
        Config::default().to_toml()
    }

    /// 渲染为 TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| anyhow!("序列化配置失败: {}", e))
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, path: &PathBuf) -> Result<()> {
        let content = self.to_toml()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// 验证配置
    fn validate(&self) -> Result<()> {
        if self.exporter.base_directory.as_os_str().is_empty() {
            return Err(anyhow!("输出目录不能为空"));
        }

        if let Some(log_dir) = &self.logging.directory {
            if !log_dir.exists() {
                std::fs::create_dir_all(log_dir)?;
            }
        }

        Ok(())
    }

    /// 初始化日志系统
    ///
    /// 配置了日志目录时返回文件写入线程的 guard，调用方需持有到进程结束。
    pub fn init_logging(&self) -> Result<Option<WorkerGuard>> {
        let level_filter = EnvFilter::builder()
            .with_default_directive(Level::from(self.logging.level.clone()).into())
            .from_env_lossy();

        let (file_writer, guard) = match &self.logging.directory {
            Some(log_dir) => {
                std::fs::create_dir_all(log_dir)?;
                let file_appender =
                    tracing_appender::rolling::daily(log_dir, "hospital-exporter.log");
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
                (Some(non_blocking), Some(guard))
            }
            None => (None, None),
        };

        let registry = tracing_subscriber::registry().with(level_filter);

        // 根据格式选择不同的输出层
        match self.logging.format {
            LogFormat::Compact => {
                let file_layer = file_writer
                    .map(|writer| fmt::layer().compact().with_ansi(false).with_writer(writer));
                registry
                    .with(fmt::layer().compact())
                    .with(file_layer)
                    .try_init()?;
            }
            LogFormat::Full => {
                let file_layer =
                    file_writer.map(|writer| fmt::layer().with_ansi(false).with_writer(writer));
                registry.with(fmt::layer()).with(file_layer).try_init()?;
            }
            LogFormat::Json => {
                let file_layer =
                    file_writer.map(|writer| fmt::layer().json().with_writer(writer));
                registry
                    .with(fmt::layer().json().with_target(true).with_level(true))
                    .with(file_layer)
                    .try_init()?;
            }
        }

        tracing::info!("日志系统已初始化，级别: {:?}", self.logging.level);
        Ok(guard)
    }
}
