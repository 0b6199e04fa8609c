//! Route selection over a directory snapshot.

use rand::Rng;
use veil_proto::v1::NodeEntry;

use crate::{OnionError, Result};

/// Select `hops` distinct entries from a directory snapshot, uniformly
/// at random, in forwarding order.
///
/// The caller supplies the RNG so selection is reproducible under a
/// seeded generator. The snapshot itself is never modified.
pub fn select_route<R: Rng + ?Sized>(
    entries: &[NodeEntry],
    hops: usize,
    rng: &mut R,
) -> Result<Vec<NodeEntry>> {
    if entries.len() < hops {
        return Err(OnionError::InsufficientNodes {
            need: hops,
            have: entries.len(),
        });
    }

    let picked = rand::seq::index::sample(rng, entries.len(), hops);
    let route: Vec<NodeEntry> = picked.iter().map(|i| entries[i].clone()).collect();

    tracing::debug!(
        hops,
        nodes = ?route.iter().map(|e| e.node_id).collect::<Vec<_>>(),
        "selected circuit route"
    );

    Ok(route)
}
