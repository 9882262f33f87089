//! End-to-end constant propagation over small method bodies.

use silt_dataflow::{
    analyze_method, AnalysisConfig, AnalysisId, ConstantPropagation, ControlFlowGraph,
    LiveVariables, Value, WorklistSolver,
};
use silt_ir::{ArithmeticOp, Exp, MethodBody, Var};

#[test]
fn test_straight_line_addition_folds() {
    let a = Var::int("a");
    let b = Var::int("b");
    let c = Var::int("c");

    let mut builder = MethodBody::builder("sum");
    builder.assign(a.clone(), Exp::lit(1));
    builder.assign(b.clone(), Exp::lit(2));
    builder.assign(
        c.clone(),
        Exp::arithmetic(ArithmeticOp::Add, Exp::var(a.clone()), Exp::var(b.clone())),
    );
    builder.ret(Some(Exp::var(c.clone())));
    let cfg = ControlFlowGraph::build(builder.build().unwrap()).unwrap();

    let analysis = ConstantPropagation::new(AnalysisConfig::new(AnalysisId::CONSTANT_PROPAGATION));
    let result = WorklistSolver::solve(&analysis, &cfg);

    let out = result.out_fact(cfg.node_of(2)).unwrap();
    assert_eq!(out.get(&a), Value::Constant(1));
    assert_eq!(out.get(&b), Value::Constant(2));
    assert_eq!(out.get(&c), Value::Constant(3));
}

#[test]
fn test_division_by_zero_leaves_target_undefined() {
    let x = Var::int("x");

    let mut builder = MethodBody::builder("div_by_zero");
    builder.assign(
        x.clone(),
        Exp::arithmetic(ArithmeticOp::Div, Exp::lit(10), Exp::lit(0)),
    );
    builder.ret(None);
    let cfg = ControlFlowGraph::build(builder.build().unwrap()).unwrap();

    let analysis = ConstantPropagation::new(AnalysisConfig::new(AnalysisId::CONSTANT_PROPAGATION));
    let result = WorklistSolver::solve(&analysis, &cfg);

    let out = result.out_fact(cfg.node_of(0)).unwrap();
    assert_eq!(out.get(&x), Value::Undef);
}

#[test]
fn test_report_lists_constant_bindings() {
    let a = Var::int("a");
    let b = Var::int("b");

    let mut builder = MethodBody::builder("report");
    builder.assign(a.clone(), Exp::lit(4));
    builder.assign(
        b.clone(),
        Exp::arithmetic(ArithmeticOp::Mul, Exp::var(a.clone()), Exp::lit(10)),
    );
    builder.ret(Some(Exp::var(b.clone())));

    let report = analyze_method(builder.build().unwrap(), &LiveVariables::new()).unwrap();
    assert_eq!(report.method, "report");

    let at_second = report.constants.get(&1).unwrap();
    assert_eq!(at_second.get("a"), Some(&4));
    assert_eq!(at_second.get("b"), Some(&40));

    // the report serializes cleanly
    let json = report.to_json().unwrap();
    assert!(json.contains("\"method\": \"report\""));
}

#[test]
fn test_merge_of_distinct_constants_is_nac() {
    let p = Var::int("p");
    let y = Var::int("y");

    // 0: if (p == 0) goto 3
    // 1: y = 1
    // 2: goto 4
    // 3: y = 2
    // 4: return y
    let mut builder = MethodBody::builder("diamond");
    builder.param(p.clone());
    builder.branch_if(
        Exp::condition(silt_ir::ConditionOp::Eq, Exp::var(p.clone()), Exp::lit(0)),
        3,
    );
    builder.assign(y.clone(), Exp::lit(1));
    builder.goto(4);
    builder.assign(y.clone(), Exp::lit(2));
    builder.ret(Some(Exp::var(y.clone())));
    let cfg = ControlFlowGraph::build(builder.build().unwrap()).unwrap();

    let analysis = ConstantPropagation::new(AnalysisConfig::new(AnalysisId::CONSTANT_PROPAGATION));
    let result = WorklistSolver::solve(&analysis, &cfg);

    // both arms reach the merge with different constants for y
    let merge_in = result.in_fact(cfg.node_of(4)).unwrap();
    assert_eq!(merge_in.get(&y), Value::Nac);
    // the parameter is never statically known
    assert_eq!(merge_in.get(&p), Value::Nac);
}
