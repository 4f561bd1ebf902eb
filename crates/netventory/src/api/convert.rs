//! Core types to wire types

use netventory_api::{DeviceResponse, IngestReportResponse, ReportEntry};
use netventory_core::{DeviceRecord, IngestStatus, IngestionOutcome, IngestionReport};

pub fn device_response(record: DeviceRecord) -> DeviceResponse {
    DeviceResponse {
        hostname: record.hostname,
        ip: record.address,
        chassis: record.chassis_model,
        serialnum: record.serial_number,
        version: record.software_version,
        device_type: record.device_type,
        vendor: record.vendor,
        discovered_at: record.discovered_at,
    }
}

fn report_entry(outcome: &IngestionOutcome) -> ReportEntry {
    ReportEntry {
        address: outcome.address.clone(),
        hostname: outcome.hostname.clone(),
        reason: outcome.reason.clone(),
    }
}

pub fn report_response(report: &IngestionReport) -> IngestReportResponse {
    let bucket = |status| report.bucket(status).iter().map(report_entry).collect();
    IngestReportResponse {
        success: bucket(IngestStatus::Success),
        already_present: bucket(IngestStatus::AlreadyPresent),
        connection_failure: bucket(IngestStatus::ConnectionFailure),
    }
}
