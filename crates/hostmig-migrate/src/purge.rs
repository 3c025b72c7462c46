//! Purge phase: delete the original ingresses once their hosts are migrated.

use std::collections::HashSet;
use std::io::Read;

use hostmig_kube::ClusterGateway;
use hostmig_store::RecordReader;
use tracing::{debug, info};

use crate::error::MigrateResult;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurgeSummary {
    pub deleted: usize,
    /// Records whose namespace was already handled earlier in the pass.
    pub skipped: usize,
}

/// Delete the ingress named after each record's service, at most once per
/// namespace. A resource that is already gone fails the pass like any
/// other gateway error.
pub fn purge<G: ClusterGateway, R: Read>(
    gateway: G,
    reader: &mut RecordReader<R>,
) -> MigrateResult<PurgeSummary> {
    let mut done: HashSet<String> = HashSet::new();
    let mut summary = PurgeSummary::default();

    while let Some(record) = reader.read_next()? {
        if done.contains(&record.namespace) {
            debug!(
                namespace = %record.namespace,
                hostname = %record.hostname,
                "namespace already purged"
            );
            summary.skipped += 1;
            continue;
        }

        gateway.delete("ingress", &record.service_name, &record.namespace)?;
        info!(
            namespace = %record.namespace,
            ingress = %record.service_name,
            "ingress deleted"
        );
        done.insert(record.namespace);
        summary.deleted += 1;
    }

    info!(
        deleted = summary.deleted,
        skipped = summary.skipped,
        "purge complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MigrateError;
    use crate::fake::FakeCluster;
    use hostmig_core::{LeaseId, RoutingRecord};
    use hostmig_store::RecordWriter;
    use std::io::Cursor;

    fn store(records: &[(&str, &str)]) -> Vec<u8> {
        let lease = LeaseId {
            provider: "p1".to_string(),
            owner: "o1".to_string(),
            dseq: 3,
            gseq: 1,
            oseq: 2,
        };
        let mut writer = RecordWriter::new(Vec::new());
        for (i, (namespace, service)) in records.iter().enumerate() {
            let hostname = format!("h{i}.example.com");
            writer
                .append(&RoutingRecord::new(&lease, hostname, *service, 80, *namespace))
                .unwrap();
        }
        writer.into_inner()
    }

    #[test]
    fn one_delete_per_namespace() {
        let cluster = FakeCluster::new();
        let bytes = store(&[("A", "foo"), ("A", "bar"), ("B", "baz")]);

        let summary = purge(&cluster, &mut RecordReader::new(Cursor::new(bytes))).unwrap();
        assert_eq!(summary, PurgeSummary { deleted: 2, skipped: 1 });

        let deletes = cluster.calls_with_verb("delete");
        assert_eq!(deletes.len(), 2);
        assert_eq!(deletes[0].args, vec!["ingress", "foo", "--namespace=A"]);
        assert_eq!(deletes[1].args, vec!["ingress", "baz", "--namespace=B"]);
    }

    #[test]
    fn non_adjacent_repeats_are_still_skipped() {
        let cluster = FakeCluster::new();
        let bytes = store(&[("A", "foo"), ("B", "bar"), ("A", "foo")]);

        let summary = purge(&cluster, &mut RecordReader::new(Cursor::new(bytes))).unwrap();
        assert_eq!(summary.deleted, 2);
        assert_eq!(summary.skipped, 1);
    }

    #[test]
    fn empty_store_deletes_nothing() {
        let cluster = FakeCluster::new();
        let summary = purge(&cluster, &mut RecordReader::new(Cursor::new(Vec::new()))).unwrap();
        assert_eq!(summary, PurgeSummary::default());
        assert!(cluster.calls.borrow().is_empty());
    }

    #[test]
    fn delete_failure_is_not_swallowed() {
        let cluster = FakeCluster::new().failing_on("--namespace=B");
        let bytes = store(&[("A", "foo"), ("B", "bar"), ("C", "baz")]);

        let err = purge(&cluster, &mut RecordReader::new(Cursor::new(bytes))).unwrap_err();
        assert!(matches!(err, MigrateError::Gateway(_)));
        assert_eq!(cluster.calls_with_verb("delete").len(), 2);
    }
}
