//! 医院信息导出模块
//!
//! 汇总机构利用率计数，组装 FHIR STU3 Bundle 并写入磁盘

pub mod assembler;
pub mod error;
pub mod extensions;
pub mod resource;
pub mod writer;

pub use assembler::assemble;
pub use error::{ExportError, ExportResult};
pub use extensions::build_extensions;
pub use resource::{OrganizationBuilder, ResourceBuilder};

use crate::config::ExporterConfig;
use crate::health::Provider;
use std::path::PathBuf;

/// 使用默认 Organization 映射导出医院信息
pub fn export(
    providers: &[Provider],
    config: &ExporterConfig,
    run_marker: i64,
) -> ExportResult<Option<PathBuf>> {
    export_with(providers, config, run_marker, &OrganizationBuilder)
}

/// 导出医院信息
///
/// 导出被禁用时直接返回 `None`，不产生任何副作用；否则返回写入的文件路径。
pub fn export_with<B: ResourceBuilder + ?Sized>(
    providers: &[Provider],
    config: &ExporterConfig,
    run_marker: i64,
    builder: &B,
) -> ExportResult<Option<PathBuf>> {
    if !config.hospital.fhir_stu3_export {
        tracing::info!("医院信息导出已禁用，跳过");
        return Ok(None);
    }

    let bundle = assemble(providers, config.fhir.transaction_bundle, builder);
    let folder = writer::output_folder(&config.base_directory, writer::FHIR_STU3_FOLDER)?;
    let path = writer::write(&bundle, run_marker, config.fhir.bulk_data, &folder)?;

    Ok(Some(path))
}
