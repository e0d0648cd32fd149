use mleak::detector::{classify, LeakRisk};
use mleak::trend::{TrendMetrics, TrendState};
use std::time::Duration;

fn metrics(sample_count: usize, avg_growth_rate: f64, consistent_growth: bool) -> TrendMetrics {
    TrendMetrics {
        sample_count,
        avg_growth_rate,
        consistent_growth,
        stabilization_time: Duration::ZERO,
    }
}

fn unstable() -> TrendState {
    TrendState {
        growth_rate: 5.0,
        is_stable: false,
        stable_for: Duration::ZERO,
        last_stable_rss: 0.0,
    }
}

fn stable_for(secs: u64) -> TrendState {
    TrendState {
        growth_rate: 0.0,
        is_stable: true,
        stable_for: Duration::from_secs(secs),
        last_stable_rss: 0.0,
    }
}

#[test]
fn test_insufficient_samples_always_low() {
    let m = metrics(2, 500.0, true);
    assert_eq!(classify(&m, &unstable()), LeakRisk::Low);
    assert_eq!(classify(&metrics(0, 500.0, true), &unstable()), LeakRisk::Low);
}

#[test]
fn test_sustained_stability_overrides_growth() {
    let m = metrics(10, 50.0, true);
    assert_eq!(classify(&m, &stable_for(6)), LeakRisk::Low);
    // Exactly five seconds is not "more than" five
    assert_eq!(classify(&m, &stable_for(5)), LeakRisk::High);
}

#[test]
fn test_high_boundary_is_strict() {
    assert_eq!(classify(&metrics(5, 1.0, true), &unstable()), LeakRisk::Medium);
    assert_eq!(classify(&metrics(5, 1.01, true), &unstable()), LeakRisk::High);
}

#[test]
fn test_medium_boundary_is_strict() {
    assert_eq!(classify(&metrics(5, 0.2, true), &stable_for(0)), LeakRisk::Low);
    assert_eq!(classify(&metrics(5, 0.21, true), &stable_for(0)), LeakRisk::Medium);
}

#[test]
fn test_rapid_inconsistent_growth_is_medium() {
    assert_eq!(classify(&metrics(5, 0.6, false), &unstable()), LeakRisk::Medium);
    assert_eq!(classify(&metrics(5, 0.5, false), &unstable()), LeakRisk::Low);
    // Stable state does not take the rapid-growth path
    assert_eq!(classify(&metrics(5, 0.6, false), &stable_for(1)), LeakRisk::Low);
}

#[test]
fn test_flat_or_shrinking_is_low() {
    assert_eq!(classify(&metrics(5, 0.0, false), &unstable()), LeakRisk::Low);
    assert_eq!(classify(&metrics(5, -3.0, false), &unstable()), LeakRisk::Low);
    assert_eq!(classify(&metrics(5, 0.1, true), &unstable()), LeakRisk::Low);
}

#[test]
fn test_risk_labels_and_ordering() {
    assert_eq!(LeakRisk::Low.to_string(), "Low");
    assert_eq!(LeakRisk::Medium.as_str(), "Medium");
    assert_eq!(serde_json::to_string(&LeakRisk::High).unwrap(), "\"High\"");
    assert!(LeakRisk::Low < LeakRisk::Medium && LeakRisk::Medium < LeakRisk::High);
    assert!(!LeakRisk::Low.is_elevated());
    assert!(LeakRisk::High.is_elevated());
}
