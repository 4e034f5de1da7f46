mod compile;
mod runtime;

use crate::{
    coerce::Coercer, config::CompilerConfig, predicate::PredicateCompiler,
    test_fixtures::order_schema,
};

pub(super) fn compiler() -> PredicateCompiler {
    PredicateCompiler::new(CompilerConfig::default(), Coercer::standard())
}

pub(super) fn compile(node: &crate::predicate::FilterNode) -> crate::predicate::FilterExpr {
    compiler().compile(node, &order_schema()).unwrap()
}
