use super::common::*;
use crate::matching::{JobMatcher, MatchBand};

#[test]
fn excellent_match_lists_every_clause_in_order() {
    let job = job(
        "job-10",
        &["React", "TypeScript"],
        &["Node.js", "AWS", "Docker"],
        3.0,
    );

    let matches = engine().find_matches(&[job], &resume());

    assert_eq!(
        matches[0].reason,
        "Excellent match • Perfect match - all 2 required skills present • 1 preferred skills • Experience requirement met (3+ years)"
    );
}

#[test]
fn partial_skill_coverage_reports_ratio() {
    let job = job(
        "job-9",
        &["React", "TypeScript", "Node.js", "Python"],
        &[],
        3.0,
    );

    let matches = engine().find_matches(&[job], &resume());

    assert_eq!(
        matches[0].reason,
        "Good match • Strong skill match (3/4 required skills) • Experience requirement met (3+ years)"
    );
}

#[test]
fn shortfall_reports_required_years() {
    let matches = engine().find_matches(&[threshold_job()], &resume());

    let reason = &matches[0].reason;
    assert!(reason.starts_with("Good match • Strong skill match (2/4 required skills)"));
    assert!(reason.contains("1 preferred skills"));
    assert!(reason.ends_with("Close to experience requirement (need 4 years)"));
}

#[test]
fn strong_band_and_fractional_years() {
    let job = job("job-strong", &["React", "Go"], &["Git", "Node.js"], 2.5);

    let matches = engine().find_matches(&[job], &resume());

    // 35 + 20 + 10
    assert_eq!(matches[0].score.total, 65.0);
    assert_eq!(
        matches[0].reason,
        "Strong match • Strong skill match (1/2 required skills) • 2 preferred skills • Experience requirement met (2.5+ years)"
    );
}

#[test]
fn band_boundaries() {
    assert_eq!(MatchBand::from_total(100.0), MatchBand::Excellent);
    assert_eq!(MatchBand::from_total(80.0), MatchBand::Excellent);
    assert_eq!(MatchBand::from_total(79.9), MatchBand::Strong);
    assert_eq!(MatchBand::from_total(65.0), MatchBand::Strong);
    assert_eq!(MatchBand::from_total(64.9), MatchBand::Good);
    assert_eq!(MatchBand::Good.to_string(), "Good match");
}
