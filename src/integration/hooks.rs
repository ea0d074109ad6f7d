//! In-process action/filter registry.
//!
//! Models a callback-driven host: extensions register emitters on named
//! actions and payload transforms on named filters. Providers are suppressed
//! by deregistering their action or by filtering their payload to empty.

use super::{BodyFilter, IntegrationPoint, Provider, RenderPipeline};
use crate::debug;
use rustc_hash::FxHashMap;
use serde_json::Value as JsonValue;
use std::borrow::Cow;

type Emitter = Box<dyn Fn() -> String + Send + Sync>;
type Transform = Box<dyn Fn(JsonValue) -> JsonValue + Send + Sync>;

struct Action {
    callback: String,
    priority: i32,
    seq: usize,
    emit: Emitter,
}

struct Filter {
    priority: i32,
    seq: usize,
    apply: Transform,
}

/// Named actions and filters, run in ascending priority then registration order.
#[derive(Default)]
pub struct HookRegistry {
    actions: FxHashMap<String, Vec<Action>>,
    filters: FxHashMap<String, Vec<Filter>>,
    body_filter: Option<BodyFilter>,
    seq: usize,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_seq(&mut self) -> usize {
        self.seq += 1;
        self.seq
    }

    /// Register `emit` as `callback` on `hook`.
    pub fn add_action<F>(&mut self, hook: &str, callback: &str, priority: i32, emit: F)
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        let seq = self.next_seq();
        let actions = self.actions.entry(hook.to_string()).or_default();
        actions.push(Action {
            callback: callback.to_string(),
            priority,
            seq,
            emit: Box::new(emit),
        });
        actions.sort_by_key(|a| (a.priority, a.seq));
    }

    /// Deregister `callback` from `hook` at `priority`.
    ///
    /// Returns `false` if no such registration exists.
    pub fn remove_action(&mut self, hook: &str, callback: &str, priority: i32) -> bool {
        let Some(actions) = self.actions.get_mut(hook) else {
            return false;
        };
        let before = actions.len();
        actions.retain(|a| !(a.callback == callback && a.priority == priority));
        before != actions.len()
    }

    /// Priority of `callback` on `hook`, if registered.
    pub fn action_priority(&self, hook: &str, callback: &str) -> Option<i32> {
        self.actions
            .get(hook)?
            .iter()
            .find(|a| a.callback == callback)
            .map(|a| a.priority)
    }

    /// Run every emitter on `hook` and concatenate their output.
    pub fn do_action(&self, hook: &str) -> String {
        self.actions
            .get(hook)
            .map(|actions| actions.iter().map(|a| (a.emit)()).collect())
            .unwrap_or_default()
    }

    /// Register a payload transform on `hook`.
    pub fn add_filter<F>(&mut self, hook: &str, priority: i32, apply: F)
    where
        F: Fn(JsonValue) -> JsonValue + Send + Sync + 'static,
    {
        let seq = self.next_seq();
        let filters = self.filters.entry(hook.to_string()).or_default();
        filters.push(Filter {
            priority,
            seq,
            apply: Box::new(apply),
        });
        filters.sort_by_key(|f| (f.priority, f.seq));
    }

    /// Pass `value` through every transform on `hook`.
    pub fn apply_filters(&self, hook: &str, value: JsonValue) -> JsonValue {
        match self.filters.get(hook) {
            Some(filters) => filters.iter().fold(value, |acc, f| (f.apply)(acc)),
            None => value,
        }
    }

    /// Emit a finished response body through the wrapped body filter.
    pub fn render<'a>(&self, body: &'a str) -> Cow<'a, str> {
        match &self.body_filter {
            Some(filter) => filter.apply(body),
            None => Cow::Borrowed(body),
        }
    }
}

impl RenderPipeline for HookRegistry {
    fn suppress_structured_data_provider(&mut self, provider: Provider) {
        match provider.point() {
            IntegrationPoint::Filter { hook } => {
                // Runs last so the payload stays empty whatever earlier filters did
                self.add_filter(hook, i32::MAX, |_| JsonValue::Array(Vec::new()));
            }
            IntegrationPoint::Action {
                hook,
                callback,
                priority,
            } => {
                if !self.remove_action(hook, callback, priority) {
                    debug!("integration"; "{provider} not registered on `{hook}`");
                }
            }
        }
    }

    fn wrap_response_body(&mut self, filter: BodyFilter) {
        self.body_filter = Some(filter);
    }
}
