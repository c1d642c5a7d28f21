//! Autoscaling advice from closed-form queueing approximations
//!
//! Wait time uses the M/M/1 formula `Wq = rho / (mu - lambda)`, which only
//! holds while `lambda < mu`. Capacity sizing treats the current thread pool
//! as the per-instance server count of an M/M/c system.

use crate::models::{AutoscalingAdvisor, SimulationInput, SimulationMetrics};

/// Thread count that puts current demand exactly at the target utilization
///
/// Shared by the advisor and the thread-pool recommendation text.
pub fn recommended_thread_pool_size(concurrency_required: f64, target_utilization_pct: f64) -> u64 {
    let target_ratio = target_utilization_pct / 100.0;
    let threads = (concurrency_required / target_ratio).ceil();
    if threads.is_finite() && threads > 1.0 {
        threads as u64
    } else {
        1
    }
}

pub fn build_autoscaling_advisor(
    input: &SimulationInput,
    metrics: &SimulationMetrics,
) -> AutoscalingAdvisor {
    let service_rate_rps = metrics.throughput_limit;
    let lambda = input.requests_per_second;

    let traffic_intensity = if service_rate_rps > 0.0 {
        lambda / service_rate_rps
    } else {
        1.0
    };

    // Unstable queue: callers must read None as "cannot estimate"
    let estimated_queue_wait_ms = if lambda < service_rate_rps && service_rate_rps > 0.0 {
        Some((traffic_intensity / (service_rate_rps - lambda)) * 1000.0)
    } else {
        None
    };

    let recommended_threads =
        recommended_thread_pool_size(metrics.concurrency_required, input.target_utilization_pct);

    let current_threads = u64::from(input.thread_pool_size.max(1));
    let estimated_min_instances = recommended_threads.div_ceil(current_threads).max(1);

    AutoscalingAdvisor {
        current_service_rate_rps: service_rate_rps,
        traffic_intensity,
        estimated_queue_wait_ms,
        recommended_thread_pool_size: recommended_threads,
        estimated_min_instances,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::calculate_metrics;

    fn input(rps: f64, latency_ms: f64, threads: u32, target_util: f64) -> SimulationInput {
        SimulationInput {
            requests_per_second: rps,
            average_latency_ms: latency_ms,
            thread_pool_size: threads,
            queue_size: 100,
            cpu_cores: None,
            target_utilization_pct: target_util,
            timeout_threshold_ms: 5000.0,
        }
    }

    fn advise(input: &SimulationInput) -> AutoscalingAdvisor {
        build_autoscaling_advisor(input, &calculate_metrics(input))
    }

    #[test]
    fn test_stable_queue_has_wait_estimate() {
        let advisor = advise(&input(100.0, 200.0, 40, 80.0));

        // mu = 200, rho = 0.5, Wq = 0.5 / 100 s
        assert!((advisor.current_service_rate_rps - 200.0).abs() < 1e-9);
        assert!((advisor.traffic_intensity - 0.5).abs() < 1e-9);
        let wait = advisor.estimated_queue_wait_ms.unwrap();
        assert!((wait - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_unstable_queue_has_no_wait_estimate() {
        // mu = 200 exactly equals lambda
        let saturated = advise(&input(200.0, 200.0, 40, 80.0));
        assert_eq!(saturated.estimated_queue_wait_ms, None);
        assert!((saturated.traffic_intensity - 1.0).abs() < 1e-9);

        let overloaded = advise(&input(800.0, 500.0, 100, 70.0));
        assert_eq!(overloaded.estimated_queue_wait_ms, None);
        assert!(overloaded.traffic_intensity > 1.0);
    }

    #[test]
    fn test_recommended_threads_target_utilization() {
        assert_eq!(recommended_thread_pool_size(20.0, 80.0), 25);
        assert_eq!(recommended_thread_pool_size(400.0, 70.0), 572);
        assert_eq!(recommended_thread_pool_size(0.001, 99.0), 1);
    }

    #[test]
    fn test_min_instances_rounds_up() {
        let advisor = advise(&input(800.0, 500.0, 100, 70.0));
        assert_eq!(advisor.recommended_thread_pool_size, 572);
        assert_eq!(advisor.estimated_min_instances, 6);

        let small = advise(&input(1.0, 10.0, 64, 50.0));
        assert_eq!(small.recommended_thread_pool_size, 1);
        assert_eq!(small.estimated_min_instances, 1);
    }
}
