// Subscription records and the static plan catalog. No payment is taken.

pub mod handlers;
pub mod plans;
