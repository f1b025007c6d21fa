use std::collections::VecDeque;

use chrono::{DateTime, Local};

use crate::batch::{Batch, ClassifiedRecord, classify_batch};
use crate::classifier::ClassifierConfig;
use crate::config::{DEFAULT_REFRESH_MINUTES, clamp_refresh_minutes};
use crate::normalize::Normalized;

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    All,
    Matched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold {
    Attacks,
    Possession,
}

pub struct AppState {
    pub view: View,
    pub selected: usize,
    pub config: ClassifierConfig,
    pub refresh_minutes: u32,
    pub source_label: String,
    // Latest tick only; replaced wholesale on every tick.
    pub normalized: Normalized,
    pub batch: Batch,
    pub last_refresh: Option<DateTime<Local>>,
    pub last_warning: Option<String>,
    pub loading: bool,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ClassifierConfig::default(), DEFAULT_REFRESH_MINUTES)
    }
}

impl AppState {
    pub fn new(config: ClassifierConfig, refresh_minutes: u32) -> Self {
        Self {
            view: View::All,
            selected: 0,
            config,
            refresh_minutes: clamp_refresh_minutes(i64::from(refresh_minutes)),
            source_label: String::new(),
            normalized: Normalized::default(),
            batch: Batch::default(),
            last_refresh: None,
            last_warning: None,
            loading: true,
            logs: VecDeque::new(),
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    /// Re-runs the classifier over the current tick's records.
    pub fn reclassify(&mut self) {
        self.batch = classify_batch(&self.normalized.records, &self.config);
        self.clamp_selection();
    }

    pub fn visible_rows(&self) -> Vec<&ClassifiedRecord> {
        match self.view {
            View::All => self.batch.all().iter().collect(),
            View::Matched => self.batch.matched().collect(),
        }
    }

    pub fn toggle_view(&mut self) {
        self.view = match self.view {
            View::All => View::Matched,
            View::Matched => View::All,
        };
        self.selected = 0;
    }

    pub fn select_next(&mut self) {
        let total = self.visible_rows().len();
        if total > 0 {
            self.selected = (self.selected + 1).min(total - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        let total = self.visible_rows().len();
        if total == 0 {
            self.selected = 0;
        } else if self.selected >= total {
            self.selected = total - 1;
        }
    }

    pub fn adjust_threshold(&mut self, which: Threshold, step: i64) {
        let (label, value) = match which {
            Threshold::Attacks => ("attacks", &mut self.config.delta_attacks),
            Threshold::Possession => ("possession", &mut self.config.delta_possession),
        };
        *value = value.saturating_add(step);
        let msg = format!("[INFO] Delta {label} set to {value}");
        self.reclassify();
        self.push_log(msg);
    }

    pub fn toggle_strict(&mut self) {
        self.config.require_strict_dominance_b = !self.config.require_strict_dominance_b;
        self.reclassify();
        let msg = format!("[INFO] Dominance B mode: {}", self.config.mode_label());
        self.push_log(msg);
    }

    /// Moves the refresh interval by `step` minutes and returns the new value.
    pub fn adjust_refresh(&mut self, step: i64) -> u32 {
        self.refresh_minutes = clamp_refresh_minutes(i64::from(self.refresh_minutes) + step);
        self.refresh_minutes
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    Tick {
        normalized: Normalized,
        fetched_at: DateTime<Local>,
        warning: Option<String>,
    },
    Loading,
    Log(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderCommand {
    Refresh,
    SetInterval { minutes: u32 },
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::Tick {
            normalized,
            fetched_at,
            warning,
        } => {
            state.loading = false;
            state.last_refresh = Some(fetched_at);
            if let Some(warning) = warning.as_ref() {
                state.push_log(format!("[WARN] {warning}"));
            } else {
                state.push_log(format!(
                    "[INFO] Refreshed at {}: {}",
                    fetched_at.format("%H:%M:%S"),
                    normalized.summary()
                ));
                for skipped in &normalized.skipped {
                    state.push_log(format!(
                        "[WARN] Row {} rejected: {}",
                        skipped.index, skipped.reason
                    ));
                }
            }
            state.last_warning = warning;
            state.normalized = normalized;
            state.reclassify();
        }
        Delta::Loading => state.loading = true,
        Delta::Log(msg) => state.push_log(msg),
    }
}
