//! Skip policy for suites that need the embedded cluster.
//!
//! Machines without network access cannot download PostgreSQL, so a failed
//! bootstrap skips the test with a `SKIP-TEST-CLUSTER` marker. CI sets
//! `REQUIRE_TEST_CLUSTER` so the same failure breaks the build instead.

/// Whether `REQUIRE_TEST_CLUSTER` is `1`, `true` or `yes` (any case).
pub fn cluster_required() -> bool {
    std::env::var("REQUIRE_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Turn a setup failure into a skip, or a panic when the cluster is required.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    assert!(
        !cluster_required(),
        "Test cluster setup failed: {reason}. Unset REQUIRE_TEST_CLUSTER to skip."
    );
    eprintln!("SKIP-TEST-CLUSTER: {reason}");
    None
}
