use anyhow::Context;
use hostmig_core::MigrateConfig;
use hostmig_kube::Kubectl;
use hostmig_migrate::{BackupLog, Discovery};
use hostmig_store::RecordWriter;
use tracing::info;

pub fn backup(config: &MigrateConfig) -> anyhow::Result<()> {
    info!(store = %config.store_path.display(), backup = %config.backup_path.display(), "starting backup");
    let kubectl = Kubectl::new(&config.kubectl);

    let mut store = RecordWriter::create(&config.store_path).with_context(|| {
        format!("failed to create record store {}", config.store_path.display())
    })?;
    let mut backup = BackupLog::create(&config.backup_path).with_context(|| {
        format!("failed to create backup log {}", config.backup_path.display())
    })?;

    let summary = Discovery::new(&kubectl)?
        .run(&mut store, &mut backup)
        .context("backup failed; the record store holds only the records found so far")?;

    println!(
        "✓ Recorded {} host(s) from {} ingress(es) in {} namespace(s)",
        summary.records, summary.ingresses, summary.namespaces
    );
    println!("  Store:  {}", config.store_path.display());
    println!("  Backup: {}", config.backup_path.display());
    Ok(())
}
