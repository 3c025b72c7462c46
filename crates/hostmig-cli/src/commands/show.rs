//! `hostmig show`: inspect the record store between phases.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;
use hostmig_core::{MigrateConfig, RoutingRecord};
use hostmig_store::{RecordReader, digest_file};

struct Manifest {
    records: Vec<RoutingRecord>,
    sha256: String,
}

impl Manifest {
    fn load(path: &Path) -> anyhow::Result<Self> {
        let records = RecordReader::open(path)
            .with_context(|| format!("failed to open record store {}", path.display()))?
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("record store {} is damaged", path.display()))?;
        let sha256 = digest_file(path)?;
        Ok(Self { records, sha256 })
    }

    fn namespaces(&self) -> usize {
        self.records
            .iter()
            .map(|r| r.namespace.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    fn render_text(&self) -> String {
        let mut out = String::new();
        for r in &self.records {
            let _ = writeln!(
                out,
                "{}\t{}:{}\t{}\t{}/{}/{}/{}/{}",
                r.hostname, r.service_name, r.service_port, r.namespace, r.owner, r.dseq, r.gseq,
                r.oseq, r.provider
            );
        }
        let _ = writeln!(
            out,
            "{} record(s) in {} namespace(s), sha256 {}",
            self.records.len(),
            self.namespaces(),
            self.sha256
        );
        out
    }

    fn render_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(&serde_json::json!({
            "sha256": self.sha256,
            "namespaces": self.namespaces(),
            "records": self.records,
        }))?)
    }
}

pub fn show(config: &MigrateConfig, format: &str) -> anyhow::Result<()> {
    let manifest = Manifest::load(&config.store_path)?;
    match format {
        "json" => println!("{}", manifest.render_json()?),
        _ => print!("{}", manifest.render_text()),
    }
    Ok(())
}
