//! Record identifiers and order numbers.

use chrono::{DateTime, Utc};
use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generates a record id of the form `id_<unix-millis>_<9 base-36 chars>`.
pub fn generate_id() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..9)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();
    format!("id_{}_{}", Utc::now().timestamp_millis(), suffix)
}

/// Order number derived from the creation time.
pub fn order_number(at: DateTime<Utc>) -> String {
    format!("ORD{}", at.timestamp_millis())
}
