//! 集成测试
//!
//! 测试完整导出流程：计数汇总、过滤、Bundle 组装以及两种输出格式

use anyhow::Result;
use hospital_exporter::config::{ExporterConfig, FhirExportConfig, HospitalExportConfig};
use hospital_exporter::export;
use hospital_exporter::health::{CounterKind, Provider, UtilizationRecorder};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;

/// 创建测试配置
fn create_test_config(temp_dir: &TempDir, transaction_bundle: bool, bulk_data: bool) -> ExporterConfig {
    ExporterConfig {
        base_directory: temp_dir.path().join("output"),
        hospital: HospitalExportConfig {
            fhir_stu3_export: true,
        },
        fhir: FhirExportConfig {
            transaction_bundle,
            bulk_data,
        },
    }
}

/// 三个机构，其中一个没有就诊记录
fn sample_providers() -> Vec<Provider> {
    vec![
        Provider::with_id("idle", "Idle Clinic")
            .record(2020, CounterKind::Encounters, 0)
            .record(2020, CounterKind::Procedures, 3),
        Provider::with_id("mercy", "Mercy Hospital")
            .record(2019, CounterKind::Encounters, 2)
            .record(2020, CounterKind::Encounters, 3)
            .record(2020, CounterKind::Procedures, 2)
            .record(2020, CounterKind::Prescriptions, 1)
            .bed_count(10),
        Provider::with_id("general", "General Hospital")
            .record(2021, CounterKind::Encounters, 7)
            .record(2021, CounterKind::Labs, 4),
    ]
}

fn extension_values(resource: &Value) -> Vec<u64> {
    resource["extension"]
        .as_array()
        .unwrap()
        .iter()
        .map(|ext| ext["valueInteger"].as_u64().unwrap())
        .collect()
}

#[test]
fn test_bundle_file_export() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = create_test_config(&temp_dir, true, false);

    let path = export::export(&sample_providers(), &config, 1_700_000_000)?.unwrap();
    assert_eq!(
        path,
        config
            .base_directory
            .join("fhir_stu3")
            .join("hospitalInformation1700000000.json")
    );

    let files: Vec<_> = std::fs::read_dir(config.base_directory.join("fhir_stu3"))?.collect();
    assert_eq!(files.len(), 1);

    let bundle: Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    assert_eq!(bundle["resourceType"], "Bundle");
    assert_eq!(bundle["type"], "batch");

    let entries = bundle["entry"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["resource"]["id"], "mercy");
    assert_eq!(entries[1]["resource"]["id"], "general");
    assert_eq!(entries[0]["fullUrl"], "urn:uuid:mercy");
    assert_eq!(entries[0]["request"]["url"], "Organization");

    assert_eq!(extension_values(&entries[0]["resource"]), [5, 2, 0, 1, 10]);
    assert_eq!(extension_values(&entries[1]["resource"]), [7, 0, 4, 0]);

    Ok(())
}

#[test]
fn test_collection_bundle_export() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = create_test_config(&temp_dir, false, false);

    let path = export::export(&sample_providers(), &config, 9)?.unwrap();
    let bundle: Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;

    assert_eq!(bundle["type"], "collection");
    assert!(bundle["entry"][0].get("request").is_none());

    Ok(())
}

#[test]
fn test_ndjson_export() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = create_test_config(&temp_dir, true, true);

    let path = export::export(&sample_providers(), &config, 42)?.unwrap();
    assert!(path.ends_with("fhir_stu3/Organization.42.ndjson"));

    let content = std::fs::read_to_string(&path)?;
    let lines: Vec<Value> = content
        .lines()
        .map(serde_json::from_str::<Value>)
        .collect::<Result<_, _>>()?;

    assert_eq!(lines.len(), 2);
    for line in &lines {
        assert_eq!(line["resourceType"], "Organization");
        assert!(line.get("entry").is_none());
    }
    assert_eq!(lines[0]["name"], "Mercy Hospital");
    assert_eq!(extension_values(&lines[1]), [7, 0, 4, 0]);

    Ok(())
}

#[test]
fn test_disabled_export_writes_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut config = create_test_config(&temp_dir, true, false);
    config.hospital.fhir_stu3_export = false;

    assert!(export::export(&sample_providers(), &config, 1)?.is_none());
    assert!(!config.base_directory.exists());

    Ok(())
}

#[test]
fn test_no_active_providers_yields_empty_bundle() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = create_test_config(&temp_dir, false, false);
    let providers = vec![Provider::with_id("a", "A"), Provider::with_id("b", "B")];

    let path = export::export(&providers, &config, 2)?.unwrap();
    let bundle: Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    assert!(bundle["entry"].as_array().unwrap().is_empty());

    Ok(())
}

#[test]
fn test_recorder_snapshot_feeds_export() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = create_test_config(&temp_dir, true, true);

    // 模拟多个工作线程并发计数
    let recorder = Arc::new(UtilizationRecorder::new());
    let workers: Vec<_> = (0..4)
        .map(|_| {
            let recorder = Arc::clone(&recorder);
            std::thread::spawn(move || {
                for year in 2018..2021 {
                    recorder.increment(year, CounterKind::Encounters);
                    recorder.add(year, CounterKind::Labs, 2);
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().expect("worker panicked");
    }

    let mut provider = Provider::with_id("busy", "Busy Hospital");
    provider.utilization = recorder.snapshot();

    let path = export::export(&[provider], &config, 3)?.unwrap();
    let line: Value = serde_json::from_str(std::fs::read_to_string(path)?.trim_end())?;
    assert_eq!(extension_values(&line), [12, 0, 24, 0]);

    Ok(())
}

#[test]
fn test_ndjson_export_without_active_providers() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = create_test_config(&temp_dir, true, true);
    let providers = vec![Provider::with_id("idle", "Idle Clinic")
        .record(2020, CounterKind::Procedures, 4)];

    let path = export::export(&providers, &config, 1)?.unwrap();
    assert!(path.is_file());
    assert_eq!(std::fs::read_to_string(path)?.lines().count(), 0);

    Ok(())
}
