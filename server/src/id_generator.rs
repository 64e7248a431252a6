use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;

use crate::identifiers::ConnectionId;

const ADJECTIVES: &[&str] = &[
    "Swift", "Brave", "Clever", "Mighty", "Silent", "Golden", "Wild", "Noble",
];

const NOUNS: &[&str] = &[
    "Falcon", "Bear", "Tiger", "Wolf", "Eagle", "Fox", "Raven", "Lynx",
];

static CONNECTION_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Readable label for log lines; the counter keeps labels unique.
pub fn generate_connection_id() -> ConnectionId {
    let mut rng = rand::rng();
    let adjective = ADJECTIVES[rng.random_range(0..ADJECTIVES.len())];
    let noun = NOUNS[rng.random_range(0..NOUNS.len())];
    let number = CONNECTION_COUNTER.fetch_add(1, Ordering::Relaxed);
    ConnectionId::new(format!("{} {} #{}", adjective, noun, number))
}
