//! Built-in power commands
//!
//! The vocabulary is closed: the registry is filled once and never extended
//! at runtime. Aggregates are finished in [`aggregate`], row-order dependent
//! lookups live in [`sequence`].

pub mod aggregate;
pub mod sequence;

use crate::ast::{AggregateKind, SequenceKind};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Global function registry (lazily initialized)
static FUNCTION_REGISTRY: OnceLock<FunctionRegistry> = OnceLock::new();

/// The built-in function registry
pub fn registry() -> &'static FunctionRegistry {
    FUNCTION_REGISTRY.get_or_init(FunctionRegistry::new)
}

/// What a built-in call turns into in the expression tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    /// `sum`, `avg`, `count`, `min`, `max`
    Aggregate(AggregateKind),
    /// `lag`, `lead`
    Sequence(SequenceKind),
    /// `if`
    Conditional,
    /// `delta`, `Δv`, `dv`
    ValueDelta,
}

/// Function definition
#[derive(Debug, Clone)]
pub struct FunctionDef {
    /// Function name as written in formulas
    pub name: &'static str,
    /// Minimum arguments
    pub min_args: usize,
    /// Maximum arguments
    pub max_args: usize,
    /// Expression node this call builds
    pub kind: FunctionKind,
}

impl FunctionDef {
    /// Human readable arity for error messages
    pub fn arity(&self) -> String {
        if self.min_args == self.max_args {
            self.min_args.to_string()
        } else {
            format!("{} to {}", self.min_args, self.max_args)
        }
    }
}

/// Function registry
#[derive(Debug)]
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionDef>,
}

impl FunctionRegistry {
    /// Create a new registry with all built-in functions
    pub fn new() -> Self {
        let mut registry = Self {
            functions: HashMap::new(),
        };

        registry.register_aggregate_functions();
        registry.register_sequence_functions();

        // IF: else branch defaults to null
        registry.register(FunctionDef {
            name: "if",
            min_args: 2,
            max_args: 3,
            kind: FunctionKind::Conditional,
        });

        registry
    }

    /// Look up a function by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(&name.to_lowercase())
    }

    /// Names of all registered functions, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.values().map(|def| def.name).collect();
        names.sort_unstable();
        names
    }

    fn register(&mut self, def: FunctionDef) {
        self.functions.insert(def.name.to_lowercase(), def);
    }

    fn register_aggregate_functions(&mut self) {
        for (name, kind) in [
            ("sum", AggregateKind::Sum),
            ("avg", AggregateKind::Avg),
            ("average", AggregateKind::Avg),
            ("count", AggregateKind::Count),
            ("min", AggregateKind::Min),
            ("max", AggregateKind::Max),
        ] {
            self.register(FunctionDef {
                name,
                min_args: 1,
                max_args: 1,
                kind: FunctionKind::Aggregate(kind),
            });
        }
    }

    fn register_sequence_functions(&mut self) {
        // LAG
        self.register(FunctionDef {
            name: "lag",
            min_args: 1,
            max_args: 1,
            kind: FunctionKind::Sequence(SequenceKind::Lag),
        });

        // LEAD
        self.register(FunctionDef {
            name: "lead",
            min_args: 1,
            max_args: 1,
            kind: FunctionKind::Sequence(SequenceKind::Lead),
        });

        // DELTA: value change since the previous row, also spelled Δv and dv
        for name in ["delta", "Δv", "dv"] {
            self.register(FunctionDef {
                name,
                min_args: 1,
                max_args: 1,
                kind: FunctionKind::ValueDelta,
            });
        }
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
