//! Central token issuance.
//!
//! Row identity always comes from `Uuid::new_v4`; the tokens here are
//! human-facing display keys. `order_key` is only unique per checkout
//! because the orders table enforces it (unique on mainkey/owner/side),
//! and `order_number` carries no uniqueness guarantee at all.

use rand::Rng;
use rand::distr::Alphanumeric;

/// 8-character mainkey shared by every fragment of one checkout.
pub fn order_key() -> String {
    let mut rng = rand::rng();
    (0..8).map(|_| rng.sample(Alphanumeric) as char).collect()
}

/// 6-character uppercase code shared by a compliment batch.
pub fn group_code() -> String {
    let mut rng = rand::rng();
    (0..6)
        .map(|_| rng.sample(Alphanumeric) as char)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Display-only order number shown in the kitchen view.
pub fn order_number() -> i32 {
    rand::rng().random_range(1..=500)
}
