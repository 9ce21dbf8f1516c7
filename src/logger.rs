//! Debug-only, opt-in diagnostics (§10.1), in the same style already used by
//! this codebase's lexeme/production layers: an ordered [`Log`] level carried
//! into the engine at construction time, whose gated helpers wrap `println!`
//! behind `#[cfg(debug_assertions)]`. No external logging crate is used.

use std::fmt::{Display, Formatter};

/// Debug verbosity level. Ordered: `None < Default < Success < Result < Verbose`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Log<T> {
    None,
    Default(T),
    Success(T),
    Result(T),
    Verbose(T),
}

impl<T: Display> Display for Log<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Log::None => Ok(()),
            Log::Default(s) | Log::Success(s) | Log::Result(s) | Log::Verbose(s) => {
                write!(f, "{}", s)
            }
        }
    }
}

impl<T> Log<T> {
    pub fn order(&self) -> u8 {
        match self {
            Log::None => 0,
            Log::Default(_) => 1,
            Log::Success(_) => 2,
            Log::Result(_) => 3,
            Log::Verbose(_) => 4,
        }
    }
}

/// The engine's debug logger. Holds the configured level with a fixed label;
/// every logging call is a no-op in release builds.
#[derive(Clone, Copy)]
pub struct EngineLogger {
    level: Log<&'static str>,
}

impl EngineLogger {
    pub fn new(level: Log<&'static str>) -> Self {
        Self { level }
    }

    pub fn silent() -> Self {
        Self::new(Log::None)
    }

    #[cfg(debug_assertions)]
    fn enabled(&self, threshold: Log<()>) -> bool {
        self.level.order() >= threshold.order()
    }

    pub fn log_tables_built(&self, step_down_entries: usize, step_up_entries: usize) {
        #[cfg(debug_assertions)]
        if self.enabled(Log::Default(())) {
            println!(
                "[{}; GrammarTables]: step-down entries={}, step-up entries={}",
                self.level, step_down_entries, step_up_entries
            );
        }
    }

    pub fn log_direct_consume(&self, candidate_index: usize, node_label: &str) {
        #[cfg(debug_assertions)]
        if self.enabled(Log::Success(())) {
            println!(
                "[{}; DirectConsume]: candidate {} at {}",
                self.level, candidate_index, node_label
            );
        }
        #[cfg(not(debug_assertions))]
        let _ = (candidate_index, node_label);
    }

    pub fn log_step_down(&self, candidate_index: usize, stack_len: usize) {
        #[cfg(debug_assertions)]
        if self.enabled(Log::Success(())) {
            println!(
                "[{}; StepDown]: candidate {} grafted a {}-rule descent",
                self.level, candidate_index, stack_len
            );
        }
        #[cfg(not(debug_assertions))]
        let _ = (candidate_index, stack_len);
    }

    pub fn log_step_up(&self, candidate_index: usize) {
        #[cfg(debug_assertions)]
        if self.enabled(Log::Success(())) {
            println!("[{}; StepUp]: candidate {} wrapped", self.level, candidate_index);
        }
        #[cfg(not(debug_assertions))]
        let _ = candidate_index;
    }

    pub fn log_pruned(&self, candidate_index: usize, reason: &str) {
        #[cfg(debug_assertions)]
        if self.enabled(Log::Result(())) {
            println!(
                "[{}; Pruned]: candidate {} dropped ({})",
                self.level, candidate_index, reason
            );
        }
        #[cfg(not(debug_assertions))]
        let _ = (candidate_index, reason);
    }

    pub fn log_candidate_set(&self, token_index: usize, surviving: usize) {
        #[cfg(debug_assertions)]
        if self.enabled(Log::Verbose(())) {
            println!(
                "[{}; TokenProcessed]: after token {}, {} candidates survive",
                self.level, token_index, surviving
            );
        }
        #[cfg(not(debug_assertions))]
        let _ = (token_index, surviving);
    }
}
