use std::time::Duration;
use std::thread;
use rand::Rng;
use log::info;

/// Picks a wait in `[delay, delay + band]` seconds. Negative inputs clamp to zero.
pub fn page_delay(delay: f64, band: f64) -> Duration {
    let low = delay.max(0.0);
    let high = low + band.max(0.0);
    let mut rng = rand::thread_rng();
    Duration::from_secs_f64(rng.gen_range(low..=high))
}

pub fn random_page_delay(delay: f64, band: f64) {
    let wait = page_delay(delay, band);
    if wait.is_zero() {
        return;
    }
    info!("Waiting for {:.1} seconds (Page Delay)...", wait.as_secs_f64());
    thread::sleep(wait);
}

/// Exponential backoff before retry number `attempt` (1-based).
pub fn retry_backoff(backoff_secs: f64, attempt: u32) {
    let secs = backoff_secs.max(0.0) * 2f64.powi(attempt.saturating_sub(1) as i32);
    if secs <= 0.0 {
        return;
    }
    info!("Retrying in {:.1} seconds (attempt {})...", secs, attempt);
    thread::sleep(Duration::from_secs_f64(secs));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_delay_stays_in_band() {
        for _ in 0..50 {
            let d = page_delay(2.0, 3.0).as_secs_f64();
            assert!((2.0..=5.0).contains(&d), "delay {} out of band", d);
        }
    }

    #[test]
    fn test_zero_delay_does_not_sleep() {
        assert!(page_delay(0.0, 0.0).is_zero());
        assert!(page_delay(-1.0, -1.0).is_zero());
    }
}
