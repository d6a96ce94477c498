//! # tabcalc-formula
//!
//! Formula parser and evaluator for tabcalc derived columns.
//!
//! This crate provides:
//! - Definition parsing (`Name = Expression` → [`FormulaDefinition`])
//! - Expression parsing (text → [`Expression`] tree)
//! - The closed vocabulary of built-in operators (`sum`, `avg`, `count`,
//!   `min`, `max`, `if`, `lag`, `lead`, `delta`, `Δt`)
//! - Row-wise evaluation against an [`EvaluationContext`] that carries
//!   precomputed aggregates and the previous-row window
//!
//! ## Example
//!
//! ```rust
//! use tabcalc_core::Row;
//! use tabcalc_formula::{evaluate_field, parse, EvaluationContext, EvaluationOptions, RowView};
//!
//! let definition = parse("Total Cells = Cell Density × Volume").unwrap();
//! let expr = definition.expression().unwrap();
//!
//! let rows = vec![Row::new().with_field("Density", 2).with_field("Volume", 10)];
//! let mut ctx = EvaluationContext::new(EvaluationOptions::default());
//! ctx.prepare(&expr, &rows);
//!
//! let view = RowView::of(&rows, 0).unwrap();
//! let field = evaluate_field(&definition.name, &expr, &view, &ctx);
//! assert_eq!(field.value.as_number(), Some(20.0));
//! ```

pub mod ast;
pub mod context;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod parser;
pub mod references;

pub use ast::{AggregateKind, BinaryOperator, Expression, SequenceKind, UnaryOperator};
pub use context::{Aggregates, EvaluationContext, EvaluationOptions};
pub use error::{ExpressionError, ExpressionResult, ParseError, ParseResult};
pub use evaluator::{evaluate, evaluate_field, EvalResult, RowView, Value};
pub use parser::{parse, parse_expression, FormulaDefinition};
pub use references::ColumnReferences;
