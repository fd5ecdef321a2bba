//! JSON Output

use crate::ReportError;
use crate::report::{CurveReport, SweepReport};

/// Generate a prettified JSON sweep report.
pub fn generate_sweep_json(report: &SweepReport) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Generate a prettified JSON precision-recall report.
pub fn generate_curve_json(report: &CurveReport) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sweepbench_core::ThresholdPoint;

    #[test]
    fn test_curve_json_fields() {
        let report = CurveReport {
            timestamp: Utc::now(),
            input: "PrecisionRecall.txt".to_string(),
            title: "Precision - Recall Curve".to_string(),
            points: vec![ThresholdPoint {
                threshold: 0.5,
                precision: 0.8,
                recall: 0.65,
            }],
            summary: None,
        };

        let json: Result<String, ReportError> = generate_curve_json(&report);
        let value: serde_json::Value = serde_json::from_str(&json.unwrap()).unwrap();
        assert_eq!(value["title"], "Precision - Recall Curve");
        assert_eq!(value["points"][0]["precision"], 0.8);
        assert!(value["summary"].is_null());
    }
}
