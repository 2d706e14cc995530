//! Metric lookup over a single task's result map

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Filters tried before any other, in order
const PREFERRED_FILTERS: [&str; 2] = ["none", "flexible-extract"];

/// Raw metrics of one task
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskMetrics(Map<String, Value>);

/// The score chosen to represent a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryScore {
    /// Metric name from the preference list
    pub metric: String,
    /// Key the value was read from, `filter/metric` for nested maps
    pub key: String,
    /// Score in percent
    pub percent: f64,
}

impl TaskMetrics {
    /// Numeric value stored under `key`
    pub fn value(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    /// Value of `metric` regardless of how the producer spelled it.
    ///
    /// Lookup order: plain key, `metric,none`, `metric,flexible-extract`, any
    /// other `metric,<filter>` (smallest filter first), then nested
    /// `<filter>: {metric: value}` maps in the same filter order.
    pub fn metric(&self, metric: &str) -> Option<(String, f64)> {
        if let Some(v) = self.value(metric) {
            return Some((metric.to_string(), v));
        }

        for filter in self.filters_for(metric) {
            let key = format!("{},{}", metric, filter);
            if let Some(v) = self.value(&key) {
                return Some((key, v));
            }
        }

        for filter in self.nested_filters() {
            let nested = self.0.get(&filter).and_then(Value::as_object);
            if let Some(v) = nested.and_then(|m| m.get(metric)).and_then(Value::as_f64) {
                return Some((format!("{}/{}", filter, metric), v));
            }
        }

        None
    }

    /// First metric of `preference` present in the map, scaled to percent
    pub fn primary_score(&self, preference: &[String]) -> Option<PrimaryScore> {
        preference.iter().find_map(|metric| {
            self.metric(metric).map(|(key, value)| PrimaryScore {
                metric: metric.clone(),
                key,
                percent: value * 100.0,
            })
        })
    }

    /// Suffix filters present for `metric`, in lookup order
    fn filters_for(&self, metric: &str) -> Vec<String> {
        let present = self
            .0
            .keys()
            .filter_map(|k| k.split_once(','))
            .filter(|(name, _)| *name == metric)
            .map(|(_, filter)| filter.to_string());

        order_filters(present)
    }

    /// Keys holding nested metric maps, in lookup order
    fn nested_filters(&self) -> Vec<String> {
        let present = self
            .0
            .iter()
            .filter(|(_, v)| v.is_object())
            .map(|(k, _)| k.clone());

        order_filters(present)
    }
}

fn order_filters(present: impl Iterator<Item = String>) -> Vec<String> {
    let mut others: Vec<String> = Vec::new();
    let mut preferred: Vec<String> = Vec::new();

    for filter in present {
        if PREFERRED_FILTERS.contains(&filter.as_str()) {
            preferred.push(filter);
        } else {
            others.push(filter);
        }
    }

    preferred.sort_by_key(|f| PREFERRED_FILTERS.iter().position(|p| p == f));
    others.sort();
    preferred.extend(others);
    preferred
}
