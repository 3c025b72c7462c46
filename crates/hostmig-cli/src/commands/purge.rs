use anyhow::Context;
use hostmig_core::MigrateConfig;
use hostmig_kube::{DryRun, Kubectl};
use hostmig_store::RecordReader;
use tracing::info;

pub fn purge(config: &MigrateConfig, dry_run: bool) -> anyhow::Result<()> {
    info!(store = %config.store_path.display(), dry_run, "starting purge");
    let kubectl = Kubectl::new(&config.kubectl);
    let mut reader = RecordReader::open(&config.store_path).with_context(|| {
        format!("failed to open record store {}", config.store_path.display())
    })?;

    let summary = if dry_run {
        hostmig_migrate::purge(DryRun::new(&kubectl), &mut reader)
    } else {
        hostmig_migrate::purge(&kubectl, &mut reader)
    }
    .with_context(|| format!("purge failed; {} record(s) were read from the store", reader.position()))?;

    let verb = if dry_run { "Validated deletion of" } else { "Deleted" };
    println!(
        "✓ {verb} {} ingress(es), {} record(s) shared an already purged namespace",
        summary.deleted, summary.skipped
    );
    Ok(())
}
