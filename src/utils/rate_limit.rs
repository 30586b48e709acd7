use crate::error::{AppError, AppResult};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// 秒杀入口的限流资源名
pub const RES_SECKILL: &str = "seckill_api";

/// 固定阈值流控规则：统计窗口内直接计数，超过阈值直接拒绝
#[derive(Debug, Clone)]
pub struct FlowRule {
    pub threshold: u32,
    pub stat_interval: Duration,
}

impl FlowRule {
    pub fn per_second(threshold: u32) -> Self {
        Self {
            threshold,
            stat_interval: Duration::from_secs(1),
        }
    }
}

struct ResourceState {
    rule: FlowRule,
    window_start: Instant,
    admitted: u32,
    in_flight: u32,
}

/// 进程级限流器。entry() 在业务前调用，成功后拿到的 guard
/// 必须在业务结束时 exit()（或随 Drop 释放）。
pub struct RateLimiter {
    resources: Mutex<HashMap<String, ResourceState>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            resources: Mutex::new(HashMap::new()),
        }
    }

    pub fn load_rule(&self, resource: &str, rule: FlowRule) {
        let mut map = self.resources.lock().unwrap();
        map.insert(
            resource.to_string(),
            ResourceState {
                rule,
                window_start: Instant::now(),
                admitted: 0,
                in_flight: 0,
            },
        );
    }

    pub fn entry(&self, resource: &str) -> AppResult<EntryGuard<'_>> {
        self.entry_at(resource, Instant::now())
    }

    fn entry_at(&self, resource: &str, now: Instant) -> AppResult<EntryGuard<'_>> {
        let mut map = self.resources.lock().unwrap();
        let state = match map.get_mut(resource) {
            Some(s) => s,
            // 未配置规则的资源不限流
            None => {
                return Ok(EntryGuard {
                    limiter: self,
                    resource: None,
                })
            }
        };

        if now.duration_since(state.window_start) >= state.rule.stat_interval {
            state.window_start = now;
            state.admitted = 0;
        }

        if state.admitted >= state.rule.threshold {
            return Err(AppError::ResourceExhausted(
                "系统繁忙，请稍后再试".to_string(),
            ));
        }

        state.admitted += 1;
        state.in_flight += 1;
        Ok(EntryGuard {
            limiter: self,
            resource: Some(resource.to_string()),
        })
    }

    fn release(&self, resource: &str) {
        let mut map = self.resources.lock().unwrap();
        if let Some(state) = map.get_mut(resource) {
            state.in_flight = state.in_flight.saturating_sub(1);
        }
    }

    #[cfg(test)]
    fn in_flight(&self, resource: &str) -> u32 {
        let map = self.resources.lock().unwrap();
        map.get(resource).map(|s| s.in_flight).unwrap_or(0)
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

/// 成对释放的许可。exit() 与 Drop 等价，双重释放是安全的。
pub struct EntryGuard<'a> {
    limiter: &'a RateLimiter,
    resource: Option<String>,
}

impl EntryGuard<'_> {
    pub fn exit(mut self) {
        if let Some(resource) = self.resource.take() {
            self.limiter.release(&resource);
        }
    }
}

impl Drop for EntryGuard<'_> {
    fn drop(&mut self) {
        if let Some(resource) = self.resource.take() {
            self.limiter.release(&resource);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_enforced_within_window() {
        let limiter = RateLimiter::new();
        limiter.load_rule("res", FlowRule::per_second(5));

        let now = Instant::now();
        let mut admitted = 0;
        let mut guards = Vec::new();
        for _ in 0..50 {
            match limiter.entry_at("res", now) {
                Ok(g) => {
                    admitted += 1;
                    guards.push(g);
                }
                Err(AppError::ResourceExhausted(_)) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(admitted, 5);
    }

    #[test]
    fn test_window_rolls_over() {
        let limiter = RateLimiter::new();
        limiter.load_rule("res", FlowRule::per_second(2));

        let t0 = Instant::now();
        assert!(limiter.entry_at("res", t0).is_ok());
        assert!(limiter.entry_at("res", t0).is_ok());
        assert!(limiter.entry_at("res", t0).is_err());

        // 下一个统计窗口重新计数
        let t1 = t0 + Duration::from_millis(1001);
        assert!(limiter.entry_at("res", t1).is_ok());
    }

    #[test]
    fn test_exit_releases_in_flight() {
        let limiter = RateLimiter::new();
        limiter.load_rule("res", FlowRule::per_second(10));

        let g1 = limiter.entry("res").unwrap();
        let g2 = limiter.entry("res").unwrap();
        assert_eq!(limiter.in_flight("res"), 2);

        g1.exit();
        assert_eq!(limiter.in_flight("res"), 1);

        drop(g2);
        assert_eq!(limiter.in_flight("res"), 0);
    }

    #[test]
    fn test_unconfigured_resource_passes() {
        let limiter = RateLimiter::new();
        for _ in 0..100 {
            assert!(limiter.entry("unknown").is_ok());
        }
    }

    #[test]
    fn test_threshold_is_shared_across_threads() {
        use std::sync::atomic::{AtomicU32, Ordering};
        use std::sync::Arc;

        let limiter = Arc::new(RateLimiter::new());
        limiter.load_rule("res", FlowRule::per_second(8));
        let admitted = Arc::new(AtomicU32::new(0));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let limiter = limiter.clone();
                let admitted = admitted.clone();
                std::thread::spawn(move || {
                    if let Ok(g) = limiter.entry("res") {
                        admitted.fetch_add(1, Ordering::SeqCst);
                        g.exit();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert!(admitted.load(Ordering::SeqCst) <= 8);
    }
}
