//! Hospital Exporter - 医院利用率导出器
//!
//! 将模拟运行中记录的机构利用率计数导出为 FHIR STU3 Organization 资源

pub mod config;
pub mod export;
pub mod health;

pub use anyhow::Result;
