//! Throwaway PostgreSQL databases for the Diesel adapter suites.
//!
//! Each test database is cloned from a template that already carries the
//! migrations. The template name embeds a hash of `migrations/`, so editing a
//! migration provisions a fresh template. Set `SKIP_TEST_CLUSTER=1` to skip
//! the suites on hosts where the embedded cluster cannot start.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use pg_embedded_setup_unpriv::test_support::{hash_directory, shared_cluster_handle};
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use portal::outbound::persistence::run_migrations;
use tokio::runtime::Runtime;
use uuid::Uuid;

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn template_name() -> Result<String, String> {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let hash = hash_directory(dir).map_err(|err| format!("hash migrations: {err}"))?;
    let short = hash.get(..8).unwrap_or(&hash);
    Ok(format!("portal_template_{short}"))
}

fn ensure_template(cluster: &ClusterHandle, runtime: &Runtime) -> Result<String, String> {
    let name = template_name()?;
    let _guard = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(name.as_str())
        .map_err(|err| format!("template check: {err:?}"))?;
    if !exists {
        cluster
            .create_database(name.as_str())
            .map_err(|err| format!("create template: {err:?}"))?;
        let url = cluster.connection().database_url(&name);
        runtime
            .block_on(run_migrations(&url))
            .map_err(|err| format!("migrate template: {err}"))?;
    }
    Ok(name)
}

/// Provision a migrated database that is dropped with the returned guard.
pub fn migrated_database(runtime: &Runtime) -> Result<TemporaryDatabase, String> {
    let cluster = shared_cluster_handle().map_err(|err| format!("start cluster: {err:?}"))?;
    let template = ensure_template(cluster, runtime)?;
    cluster
        .temporary_database_from_template(
            format!("portal_test_{}", Uuid::new_v4().simple()),
            template.as_str(),
        )
        .map_err(|err| format!("clone template: {err:?}"))
}

fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip when `SKIP_TEST_CLUSTER` is truthy; fail loudly otherwise.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}
