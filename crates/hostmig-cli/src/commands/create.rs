use anyhow::Context;
use hostmig_core::MigrateConfig;
use hostmig_kube::{DryRun, Kubectl};
use hostmig_migrate::replay;
use hostmig_store::RecordReader;
use tracing::info;

pub fn create(config: &MigrateConfig, dry_run: bool) -> anyhow::Result<()> {
    info!(store = %config.store_path.display(), namespace = %config.target_namespace, dry_run, "starting create");
    let kubectl = Kubectl::new(&config.kubectl);
    let mut reader = RecordReader::open(&config.store_path).with_context(|| {
        format!("failed to open record store {}", config.store_path.display())
    })?;

    let summary = if dry_run {
        replay(DryRun::new(&kubectl), &mut reader, &config.target_namespace)
    } else {
        replay(&kubectl, &mut reader, &config.target_namespace)
    }
    .with_context(|| format!("create failed; {} record(s) were read from the store", reader.position()))?;

    let verb = if dry_run { "Validated" } else { "Applied" };
    println!(
        "✓ {verb} {} ProviderHost resource(s) in namespace {}",
        summary.applied, config.target_namespace
    );
    Ok(())
}
