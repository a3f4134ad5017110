//! Thesis-compliance scoring: each aggregated metric is checked against a
//! config-driven target tuple (`Config.thesis`) rather than hard-coded
//! numbers, so operators can retune targets without a rebuild.

use mano_config::ThesisConfig;
use mano_wire::PerfMetrics;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComplianceReport {
    pub checks_passed: usize,
    pub checks_total: usize,
    pub compliance_pct: f64,
    pub sla_compliant: bool,
}

/// `per_site` holds one `PerfMetrics` per reporting agent, aligned
/// positionally with `thesis.throughput_targets_mbps` /
/// `thesis.rtt_targets_ms` by index — scenario 10 checks three throughput
/// samples against three targets and three RTT samples against three
/// targets, plus one deploy-time check against the aggregated metric.
pub fn score(per_site: &[PerfMetrics], aggregated: &PerfMetrics, thesis: &ThesisConfig) -> ComplianceReport {
    let mut checks_total = 0usize;
    let mut checks_passed = 0usize;

    for (sample, target) in per_site.iter().zip(thesis.throughput_targets_mbps.iter()) {
        checks_total += 1;
        if sample.throughput_mbps >= 0.9 * target {
            checks_passed += 1;
        }
    }

    for (sample, target) in per_site.iter().zip(thesis.rtt_targets_ms.iter()) {
        checks_total += 1;
        if sample.rtt_ms <= 1.1 * target {
            checks_passed += 1;
        }
    }

    checks_total += 1;
    if aggregated.deploy_time_ms <= thesis.deploy_target_ms {
        checks_passed += 1;
    }

    let compliance_pct = if checks_total == 0 { 0.0 } else { checks_passed as f64 / checks_total as f64 * 100.0 };
    ComplianceReport { checks_passed, checks_total, compliance_pct, sla_compliant: compliance_pct >= 80.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(throughput_mbps: f64, rtt_ms: f64) -> PerfMetrics {
        PerfMetrics { throughput_mbps, rtt_ms, deploy_time_ms: 0 }
    }

    #[test]
    fn scenario_ten_reaches_full_compliance() {
        let thesis = ThesisConfig::default();
        let per_site = vec![sample(5.0, 5.5), sample(3.0, 15.0), sample(4.7, 16.0)];
        let aggregated = PerfMetrics::aggregate(&per_site).unwrap_or(PerfMetrics { throughput_mbps: 0.0, rtt_ms: 0.0, deploy_time_ms: 400_000 });
        let aggregated = PerfMetrics { deploy_time_ms: 400_000, ..aggregated };

        let report = score(&per_site, &aggregated, &thesis);
        assert_eq!(report.checks_passed, 7);
        assert_eq!(report.checks_total, 7);
        assert!((report.compliance_pct - 100.0).abs() < 1e-9);
        assert!(report.sla_compliant);
    }

    #[test]
    fn failing_every_check_is_not_sla_compliant() {
        let thesis = ThesisConfig::default();
        let per_site = vec![sample(0.1, 100.0)];
        let aggregated = PerfMetrics { throughput_mbps: 0.1, rtt_ms: 100.0, deploy_time_ms: 1_000_000 };

        let report = score(&per_site, &aggregated, &thesis);
        assert_eq!(report.checks_passed, 0);
        assert!(!report.sla_compliant);
    }

    #[test]
    fn eighty_percent_threshold_is_inclusive() {
        let thesis = ThesisConfig { throughput_targets_mbps: vec![1.0; 4], rtt_targets_ms: vec![], deploy_target_ms: 0 };
        // 4 throughput checks + 1 deploy check = 5 total; 4 pass = 80%.
        let per_site = vec![sample(1.0, 0.0), sample(1.0, 0.0), sample(1.0, 0.0), sample(0.0, 0.0)];
        let aggregated = PerfMetrics { throughput_mbps: 0.0, rtt_ms: 0.0, deploy_time_ms: 1 };

        let report = score(&per_site, &aggregated, &thesis);
        assert_eq!(report.checks_total, 5);
        assert_eq!(report.checks_passed, 4);
        assert!(report.sla_compliant);
    }
}
