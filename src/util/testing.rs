//! Test support: one-time tracing setup shared by unit and integration tests.

use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::{Forest, Node, NodeKind};

static TEST_SETUP: Once = Once::new();

/// Install the test subscriber once per process. Honors `RUST_LOG`, default `debug`.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Build a forest from `(id, parent)` pairs, in canonical order.
///
/// Convenience for tests that only care about structure.
pub fn forest_from_pairs(pairs: &[(&str, Option<&str>)]) -> Forest {
    let records = pairs.iter().map(|(id, parent)| crate::domain::record::ItemRecord {
        id: id.to_string(),
        code: id.to_string(),
        description: String::new(),
        kind: NodeKind::Equipment,
        quantity: None,
        unit: String::new(),
        parent_id: parent.map(str::to_string),
    });
    crate::domain::build_forest(records)
}

/// Deep chain `0 -> 1 -> ... -> depth-1`, each node the only child of the previous.
pub fn deep_chain(depth: usize) -> Forest {
    let mut current: Option<Node> = None;
    for level in (0..depth).rev() {
        let mut node = Node::new(level.to_string(), NodeKind::Assembly);
        if let Some(child) = current.take() {
            node.children.push(child);
        }
        current = Some(node);
    }
    Forest::new(current.into_iter().collect())
}
