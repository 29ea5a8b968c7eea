/// 残り時間を推定する（分単位）
pub fn estimate_remaining_time(processed: usize, total: usize, elapsed_seconds: f64) -> f64 {
    if processed == 0 || elapsed_seconds <= 0.0 || processed >= total {
        return 0.0;
    }

    let seconds_per_item = elapsed_seconds / processed as f64;
    let remaining_items = (total - processed) as f64;

    remaining_items * seconds_per_item / 60.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_processed_yet() {
        assert_eq!(estimate_remaining_time(0, 10, 5.0), 0.0);
        assert_eq!(estimate_remaining_time(3, 10, 0.0), 0.0);
    }

    #[test]
    fn finished_batch_has_no_remaining_time() {
        assert_eq!(estimate_remaining_time(10, 10, 60.0), 0.0);
    }

    #[test]
    fn linear_estimate() {
        // 1枚30秒、残り4枚 → 2分
        assert!((estimate_remaining_time(2, 6, 60.0) - 2.0).abs() < 1e-9);
    }
}
