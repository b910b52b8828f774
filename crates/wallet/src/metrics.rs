use metrics::{counter, describe_counter};

const QUOTES: &str = "aa_wallet_quotes_total";
const USER_OPERATIONS_SENT: &str = "aa_wallet_user_operations_sent_total";
const SEND_FAILURES: &str = "aa_wallet_send_failures_total";

/// Registers descriptions of the wallet metrics with the installed recorder
pub fn describe_wallet_metrics() {
    describe_counter!(QUOTES, "Number of fee quotes computed");
    describe_counter!(USER_OPERATIONS_SENT, "Number of user operations accepted by the bundler");
    describe_counter!(SEND_FAILURES, "Number of failed sends, by error kind");
}

pub(crate) fn record_quote() {
    counter!(QUOTES).increment(1);
}

pub(crate) fn record_sent() {
    counter!(USER_OPERATIONS_SENT).increment(1);
}

pub(crate) fn record_send_failure(kind: &'static str) {
    counter!(SEND_FAILURES, "kind" => kind).increment(1);
}
