use pretty_assertions::assert_eq;

use tacgen::{
    compile, convert,
    il::{parse_tac, Reason},
    optimise, optimise_text, render, PipelineError,
};

fn lines(code: &str) -> Vec<&str> {
    code.lines().collect()
}

#[test]
fn scenario_a_constants_flow_through_assignments() {
    let tac = render(&convert("(main (= x 5) (= y x))").unwrap());
    assert_eq!(vec!["x = 5", "y = x"], lines(&tac));

    let optimised = optimise_text(&tac).unwrap();
    assert_eq!(vec!["x = 5", "y = 5"], lines(&optimised.code));

    let log = optimised.log.lines();
    assert_eq!(2, log.len());
    assert!(log.iter().all(|entry| entry.starts_with("Constant propagated")));
}

#[test]
fn scenario_b_always_true_branch_is_removed() {
    let optimised = optimise_text("ifFalse True goto L1").unwrap();
    assert_eq!("", optimised.code);
    assert_eq!(
        vec!["Dead code eliminated: 'ifFalse True' removed in instruction 1"],
        optimised.log.lines()
    );
}

#[test]
fn scenario_c_always_false_branch_becomes_goto() {
    let optimised = optimise_text("ifFalse False goto L1").unwrap();
    assert_eq!("goto L1", optimised.code);
    assert_eq!(
        vec!["Conditional jump simplified: 'ifFalse False' -> 'goto L1' in instruction 1"],
        optimised.log.lines()
    );
}

#[test]
fn scenario_d_unknown_condition_is_kept() {
    let compiled = compile("(main (if (<= x 1) 10 20))", true).unwrap();
    assert_eq!(
        vec![
            "t2 = x <= 1",
            "ifFalse t2 goto L1",
            "t1 = 10",
            "goto L2",
            "L1:",
            "t1 = 20",
            "L2:",
        ],
        lines(&compiled.code)
    );
    assert!(compiled.log.rewrites().next().is_none());
}

#[test]
fn conversion_is_deterministic_across_runs() {
    let source = "(main (Dc int i) (= s 0) \
        (for (stmt) (= i 0) (++ (< i 10) i) (stmt (= s (+ s (if (> i 4) i 0))))))";
    assert_eq!(
        render(&convert(source).unwrap()),
        render(&convert(source).unwrap())
    );
}

#[test]
fn emitted_code_reads_back_structurally_identical() {
    let source = "(main (= a (/ (- b 3) 2.5)) (= c (!= a false)) \
        (for (Dc int i) (= i 0) (++ (>= i 0) i) (stmt (= d (* c i)))))";
    let listing = convert(source).unwrap();
    let reparsed = parse_tac(&render(&listing)).unwrap();

    assert_eq!(listing.into_vec(), reparsed.into_vec());
}

#[test]
fn optimising_twice_changes_nothing_more() {
    let source = "(main (= a 3) (= b (* a 4)) (= c b) (= d (if (< c 20) e f)) (= g d))";
    let once = compile(source, true).unwrap();
    let twice = optimise_text(&once.code).unwrap();

    assert_eq!(once.code, twice.code);
    assert!(twice.log.rewrites().next().is_none());
}

#[test]
fn names_assigned_twice_are_not_propagated_between_assignments() {
    let compiled = compile("(main (= x 1) (= y (+ x 2)) (= x 3) (= z x))", true).unwrap();
    assert_eq!(
        vec!["x = 1", "t1 = x + 2", "y = t1", "x = 3", "z = x"],
        lines(&compiled.code)
    );
}

#[test]
fn straight_line_arithmetic_folds_completely() {
    let compiled = compile("(main (= a 6) (= b (- (* a 7) 2)) (= c (> b 39)))", true).unwrap();
    assert_eq!(
        vec!["a = 6", "t1 = 42", "t2 = 40", "b = 40", "t3 = True", "c = True"],
        lines(&compiled.code)
    );
}

#[test]
fn loops_survive_optimisation() {
    let compiled = compile(
        "(main (for (Dc int i) (= i 0) (++ (< i 3) i) (stmt (= s (+ s i)))))",
        true,
    )
    .unwrap();
    assert_eq!(
        vec![
            "i = 0",
            "L1:",
            "t1 = i < 3",
            "ifFalse t1 goto L2",
            "t2 = s + i",
            "s = t2",
            "t3 = i + 1",
            "i = t3",
            "goto L1",
            "L2:",
        ],
        lines(&compiled.code)
    );
}

#[test]
fn unoptimised_compile_has_no_log() {
    let compiled = compile("(main (= x 5) (= y x))", false).unwrap();
    assert_eq!(vec!["x = 5", "y = x"], lines(&compiled.code));
    assert!(compiled.log.is_empty());
}

#[test]
fn malformed_trees_abort_conversion() {
    match compile("(main (= x 5)", true) {
        Err(PipelineError::Convert(e)) => assert_eq!(&Reason::Unclosed, e.reason()),
        other => panic!("expected a conversion error, got {:?}", other),
    }
    match compile("(program (= x 5))", true) {
        Err(PipelineError::Convert(e)) => assert_eq!(&Reason::MissingMain, e.reason()),
        other => panic!("expected a conversion error, got {:?}", other),
    }
}

#[test]
fn unparseable_tac_names_the_line() {
    let error = optimise_text("x = 1\n\ncall f\ny = x").unwrap_err();
    assert_eq!(2, error.position().line_number());
    assert_eq!("call f", error.line());
}

#[test]
fn optimised_listing_keeps_tombstones_until_rendered() {
    let optimised = optimise(parse_tac("a = True\nifFalse a goto L1\nb = 1\nL1:").unwrap());
    assert_eq!(4, optimised.listing.len());
    assert_eq!("a = True\nb = 1\nL1:", render(&optimised.listing));
}

#[test]
fn labels_with_leading_zeros_are_rejected() {
    let error = optimise_text("goto L01\nL1:\nx = 1\nL01:\ny = 2").unwrap_err();
    assert_eq!(1, error.position().line_number());
    assert_eq!("goto L01", error.line());
}

#[test]
fn integers_beyond_i64_are_read_as_decimals() {
    let optimised = optimise_text("x = 99999999999999999999\ny = x").unwrap();
    assert_eq!(
        vec!["x = 100000000000000000000.0", "y = 100000000000000000000.0"],
        lines(&optimised.code)
    );

    let compiled = compile("(main (= x 99999999999999999999))", false).unwrap();
    assert_eq!("x = 100000000000000000000.0", compiled.code);
}

#[test]
fn compact_tac_is_accepted() {
    let error = optimise_text("x=5\nt1=x+1\nifFalse t1<=3 goto L1").unwrap_err();
    assert_eq!(3, error.position().line_number());

    let optimised = optimise_text("x=5\nt1=x+1\nt2=t1<=3").unwrap();
    assert_eq!(vec!["x = 5", "t1 = 6", "t2 = False"], lines(&optimised.code));
}

#[test]
fn deeply_nested_trees_are_rejected() {
    let tree = format!("(main (= x {}y{}))", "(+ 1 ".repeat(200_000), ")".repeat(200_000));
    match compile(&tree, true) {
        Err(PipelineError::Convert(e)) => assert_eq!(&Reason::TooDeep, e.reason()),
        other => panic!("expected a conversion error, got {:?}", other),
    }
}
