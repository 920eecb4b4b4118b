//! Minimal metrics registry for the gateway.
//!
//! Counter and gauge types with dynamic labels backed by `DashMap`. Labels
//! are flattened into sorted key vectors to keep deterministic ordering.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use tailgate_core::Verdict;

type LabelKey = Vec<(String, String)>;

fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> LabelKey {
    let mut key: LabelKey = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn render_labels(key: &LabelKey) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        let counter = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Current value (0 if never incremented).
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} counter", name);
        for r in self.map.iter() {
            let val = r.value().load(Ordering::Relaxed);
            let _ = writeln!(out, "{}{{{}}} {}", name, render_labels(r.key()), val);
        }
    }
}

#[derive(Default)]
pub struct GaugeVec {
    map: DashMap<LabelKey, AtomicI64>,
}

impl GaugeVec {
    /// Overwrite the current value.
    pub fn set(&self, labels: &[(&str, &str)], v: i64) {
        let gauge = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicI64::new(0));
        gauge.store(v, Ordering::Relaxed);
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} gauge", name);
        for r in self.map.iter() {
            let key = r.key();
            let val = r.value().load(Ordering::Relaxed);
            if key.is_empty() {
                let _ = writeln!(out, "{} {}", name, val);
            } else {
                let _ = writeln!(out, "{}{{{}}} {}", name, render_labels(key), val);
            }
        }
    }
}

#[derive(Default)]
pub struct GatewayMetrics {
    pub policy_decisions: CounterVec,
    pub policy_reloads: CounterVec,
    pub policy_users: GaugeVec,
}

impl GatewayMetrics {
    pub fn record_decision(&self, resource: &str, verdict: Verdict) {
        self.policy_decisions
            .inc(&[("resource", resource), ("verdict", verdict.as_str())]);
    }

    pub fn record_reload(&self, ok: bool) {
        let result = if ok { "ok" } else { "error" };
        self.policy_reloads.inc(&[("result", result)]);
    }

    pub fn set_policy_users(&self, n: usize) {
        self.policy_users.set(&[], n as i64);
    }

    /// Render all registered metrics.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.policy_decisions
            .render("tailgate_policy_decisions_total", &mut out);
        self.policy_reloads
            .render("tailgate_policy_reloads_total", &mut out);
        self.policy_users.render("tailgate_policy_users", &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_sorted_labels() {
        let m = GatewayMetrics::default();
        m.record_decision("grafana", Verdict::Forbidden);
        m.record_decision("grafana", Verdict::Forbidden);
        m.set_policy_users(3);

        let out = m.render();
        assert!(out.contains(
            "tailgate_policy_decisions_total{resource=\"grafana\",verdict=\"forbidden\"} 2"
        ));
        assert!(out.contains("tailgate_policy_users 3"));
    }

    #[test]
    fn escapes_label_values() {
        let c = CounterVec::default();
        c.inc(&[("resource", "a\"b")]);
        let mut out = String::new();
        c.render("x", &mut out);
        assert!(out.contains("x{resource=\"a\\\"b\"} 1"));
    }
}
