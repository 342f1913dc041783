use bedrock_transport::RetryConfig;
use proptest::prelude::*;
use std::time::Duration;

proptest! {
    #[test]
    fn backoff_is_monotonic_and_capped(
        factor in 0.0f64..10.0,
        cap in 0.0f64..120.0,
        attempt in 1u32..64,
    ) {
        let retry = RetryConfig { backoff_factor: factor, max_backoff: cap, ..RetryConfig::default() };
        let current = retry.backoff(attempt);

        prop_assert!(current <= Duration::from_secs_f64(cap));
        prop_assert!(retry.backoff(attempt - 1) <= current);
    }
}
