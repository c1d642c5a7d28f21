//! Queueing metrics derived from a single input
//!
//! Little's Law gives the required concurrency; everything else is a ratio
//! against thread, queue or timeout capacity.

use crate::models::{SimulationInput, SimulationMetrics};

/// Weight of the utilization ratio in the saturation blend
const UTILIZATION_WEIGHT: f64 = 0.55;

/// Weight of queue pressure in the saturation blend
const QUEUE_PRESSURE_WEIGHT: f64 = 0.30;

/// Weight of timeout proximity in the saturation blend
const TIMEOUT_WEIGHT: f64 = 0.15;

/// Timeout proximity is capped at this value before blending
const TIMEOUT_PROXIMITY_CEILING: f64 = 2.0;

/// Clamp `value` into `[min, max]`
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    max.min(min.max(value))
}

/// Mean latency as a fraction of the timeout threshold
///
/// Falls back to `1` when the threshold is not positive.
pub fn timeout_proximity(input: &SimulationInput) -> f64 {
    if input.timeout_threshold_ms > 0.0 {
        input.average_latency_ms / input.timeout_threshold_ms
    } else {
        1.0
    }
}

/// Derive the five scalar metrics for `input`
pub fn calculate_metrics(input: &SimulationInput) -> SimulationMetrics {
    let latency_sec = input.average_latency_ms / 1000.0;
    let threads = input.thread_pool_size as f64;

    // L = lambda * W
    let concurrency_required = input.requests_per_second * latency_sec;

    let safe_thread_capacity = threads * (input.target_utilization_pct / 100.0);
    let utilization_ratio = if safe_thread_capacity > 0.0 {
        concurrency_required / safe_thread_capacity
    } else {
        1.0
    };

    let queue_depth_needed = (concurrency_required - threads).max(0.0);
    let queue_pressure = if input.queue_size > 0 {
        queue_depth_needed / input.queue_size as f64
    } else {
        queue_depth_needed
    };

    let throughput_limit = if latency_sec > 0.0 {
        threads / latency_sec
    } else {
        0.0
    };

    let saturation_probability = clamp(
        UTILIZATION_WEIGHT * utilization_ratio
            + QUEUE_PRESSURE_WEIGHT * queue_pressure
            + TIMEOUT_WEIGHT * clamp(timeout_proximity(input), 0.0, TIMEOUT_PROXIMITY_CEILING),
        0.0,
        1.0,
    );

    SimulationMetrics {
        concurrency_required,
        utilization_ratio,
        utilization_pct: utilization_ratio * 100.0,
        queue_pressure,
        throughput_limit,
        saturation_probability,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> SimulationInput {
        SimulationInput {
            requests_per_second: 100.0,
            average_latency_ms: 200.0,
            thread_pool_size: 40,
            queue_size: 500,
            cpu_cores: None,
            target_utilization_pct: 80.0,
            timeout_threshold_ms: 2000.0,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_littles_law_concurrency() {
        let metrics = calculate_metrics(&sample_input());

        assert!(approx(metrics.concurrency_required, 20.0));
        assert!(approx(metrics.throughput_limit, 200.0));
    }

    #[test]
    fn test_utilization_against_target_capacity() {
        let metrics = calculate_metrics(&sample_input());

        // 20 required over 40 * 0.8 = 32 safe threads
        assert!(approx(metrics.utilization_ratio, 0.625));
        assert!(approx(metrics.utilization_pct, 62.5));
    }

    #[test]
    fn test_no_queue_pressure_below_thread_count() {
        let metrics = calculate_metrics(&sample_input());
        assert_eq!(metrics.queue_pressure, 0.0);
    }

    #[test]
    fn test_queue_pressure_normalized_by_queue_size() {
        let input = SimulationInput {
            requests_per_second: 1000.0,
            queue_size: 400,
            ..sample_input()
        };
        let metrics = calculate_metrics(&input);

        // 200 in flight, 160 overflow across a 400 slot queue
        assert!(approx(metrics.queue_pressure, 0.4));
    }

    #[test]
    fn test_zero_queue_uses_raw_overflow() {
        let input = SimulationInput {
            requests_per_second: 1000.0,
            queue_size: 0,
            ..sample_input()
        };
        let metrics = calculate_metrics(&input);

        assert!(approx(metrics.queue_pressure, 160.0));
        assert_eq!(metrics.saturation_probability, 1.0);
    }

    #[test]
    fn test_saturation_blend() {
        let metrics = calculate_metrics(&sample_input());

        // 0.55 * 0.625 + 0.30 * 0 + 0.15 * 0.1
        assert!(approx(metrics.saturation_probability, 0.35875));
    }

    #[test]
    fn test_timeout_proximity_is_capped_in_blend() {
        let input = SimulationInput {
            requests_per_second: 1.0,
            average_latency_ms: 10_000.0,
            thread_pool_size: 100_000,
            timeout_threshold_ms: 100.0,
            ..sample_input()
        };
        let metrics = calculate_metrics(&input);

        assert!(approx(timeout_proximity(&input), 100.0));
        // utilization is negligible, timeout term contributes 0.15 * 2
        assert!(metrics.saturation_probability > 0.29);
        assert!(metrics.saturation_probability < 0.31);
    }

    #[test]
    fn test_degenerate_timeout_falls_back() {
        let input = SimulationInput {
            timeout_threshold_ms: 0.0,
            ..sample_input()
        };
        assert_eq!(timeout_proximity(&input), 1.0);
    }

    #[test]
    fn test_clamp_bounds() {
        assert_eq!(clamp(-0.5, 0.0, 1.0), 0.0);
        assert_eq!(clamp(0.4, 0.0, 1.0), 0.4);
        assert_eq!(clamp(7.0, 0.0, 2.0), 2.0);
    }
}
