//! Query building, compilation and execution types

pub mod arguments;
pub mod ast;
pub mod builder;
pub mod compiler;
pub mod expr;
pub mod options;
pub mod pagination;
pub mod printer;
pub mod query;
pub mod selection;
pub mod trace;

pub use arguments::{ArgumentValue, Arguments};
pub use ast::{FieldNode, QueryNode, SelectionSetNode};
pub use builder::QueryBuilder;
pub use compiler::QueryCompiler;
pub use expr::{Expr, FilterExpression};
pub use options::{Direction, QueryOptions};
pub use pagination::PaginatedResult;
pub use printer::GraphqlPrinter;
pub use query::Query;
pub use selection::SelectionBuilder;
pub use trace::{CallerInfo, QueryTrace};
