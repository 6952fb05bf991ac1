use vigil_consensus_types::Signature;

/// Combines the individual signatures backing an aggregation. Verification
/// and the actual pairing-based aggregation are external collaborators
/// (`spec.md` treats BLS as opaque) — the cache only needs *something* it
/// can call when two unaggregated attestations collapse into one.
pub trait SignatureAggregator: Send + Sync {
    fn aggregate(&self, signatures: &[Signature]) -> Signature;
}

/// Concatenation-based stand-in used by tests and the example binary. Not a
/// real BLS aggregation — see the trait doc comment.
#[derive(Debug, Default)]
pub struct NullAggregator;

impl SignatureAggregator for NullAggregator {
    fn aggregate(&self, signatures: &[Signature]) -> Signature {
        signatures.first().copied().unwrap_or_default()
    }
}
