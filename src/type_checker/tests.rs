//! Unit tests for the type checker module.
//!
//! This module contains tests for:
//! - The compatibility, satisfaction and strictness relations on types
//! - Type normalization
//! - The expression evaluator and its constraint table
//! - The declaration and value passes and hole resolution

use super::{
    constraints::{Constraint, ConstraintTable},
    evaluator::TypeEvaluator,
    type_checker::{denoted_type, global_bindings, normalize_types, type_check, CheckState, TypeChecker},
    types::{Builtin, Type, BOOL, TYPES, UNIT},
};
use crate::{
    ast::statements::Definition,
    errors::diagnostics::DiagPhase,
    lexer::{lexer::tokenize, tokens::TokenKind},
    parser::parser::parse,
    unit::CompilationUnit,
    MK_TOKEN,
};

fn parse_source(source: &str) -> (Vec<Definition>, CompilationUnit) {
    let mut unit = CompilationUnit::from_code(source, "test.meow");
    let tokens = tokenize(&mut unit);
    let definitions = parse(&mut unit, tokens);
    assert!(unit.diagnostics().is_empty(), "{:?}", unit.diagnostics());
    (definitions, unit)
}

fn check(source: &str) -> (CompilationUnit, TypeChecker) {
    let (definitions, mut unit) = parse_source(source);
    let checker = type_check(&mut unit, &definitions);
    (unit, checker)
}

fn codes(unit: &CompilationUnit) -> Vec<u32> {
    unit.diagnostics().iter().map(|diagnostic| diagnostic.code).collect()
}

fn builtin(builtin: Builtin) -> Type {
    Type::Builtin(builtin)
}

fn hole(name: &str) -> Type {
    Type::Hole {
        name: name.to_string(),
        token: MK_TOKEN!(TokenKind::Keyword, "auto".to_string(), 1, 5),
    }
}

fn sample_types() -> Vec<Type> {
    vec![
        UNIT,
        BOOL,
        Type::Enum(7),
        builtin(Builtin::I32),
        builtin(Builtin::F64),
        Type::IntLiteral(-3),
        Type::CString,
        TYPES,
        Type::type_identifier(builtin(Builtin::U8)),
        Type::function(builtin(Builtin::I32), Type::IntLiteral(1)),
        Type::product(builtin(Builtin::I32), Type::CString),
        Type::sum(UNIT, builtin(Builtin::U64)),
        Type::polymorphic("T", TYPES, Type::function(Type::variable("T", TYPES), Type::variable("T", TYPES))),
        Type::variable("T", TYPES),
        hole("?0"),
        Type::Record {
            names: vec!["x".to_string(), "y".to_string()],
            fields: vec![builtin(Builtin::I32), builtin(Builtin::I32)],
        },
        Type::Variant {
            names: vec!["a".to_string()],
            fields: vec![builtin(Builtin::U8)],
        },
    ]
}

#[test]
fn test_compatible_is_reflexive() {
    for ty in sample_types() {
        assert!(ty.compatible(&ty), "{} should be compatible with itself", ty);
    }
}

#[test]
fn test_int_literal_bounds() {
    let u8_type = builtin(Builtin::U8);

    assert!(Type::IntLiteral(200).compatible(&u8_type));
    assert!(u8_type.compatible(&Type::IntLiteral(200)));
    assert!(!Type::IntLiteral(-1).compatible(&u8_type));
    assert!(!Type::IntLiteral(300).compatible(&u8_type));

    assert!(Type::IntLiteral(-128).compatible(&builtin(Builtin::I8)));
    assert!(!Type::IntLiteral(-129).compatible(&builtin(Builtin::I8)));
    assert!(Type::IntLiteral(i64::MAX).compatible(&builtin(Builtin::I64)));
    assert!(!Type::IntLiteral(-1).compatible(&builtin(Builtin::U64)));
    assert!(!Type::IntLiteral(1).compatible(&builtin(Builtin::F32)));
    assert!(Type::IntLiteral(1).compatible(&Type::IntLiteral(99)));
}

#[test]
fn test_compatible_structure() {
    let function = Type::function(builtin(Builtin::U8), builtin(Builtin::I32));

    assert!(function.compatible(&Type::function(Type::IntLiteral(4), Type::IntLiteral(-4))));
    assert!(!function.compatible(&Type::function(Type::CString, builtin(Builtin::I32))));
    assert!(!function.compatible(&Type::product(builtin(Builtin::U8), builtin(Builtin::I32))));
    assert!(!builtin(Builtin::I32).compatible(&builtin(Builtin::I64)));
    assert!(!UNIT.compatible(&BOOL));
}

#[test]
fn test_type_identifiers_live_in_the_universe() {
    let ty = Type::type_identifier(builtin(Builtin::I32));

    assert!(ty.compatible(&TYPES));
    assert!(TYPES.compatible(&ty));
    assert!(!builtin(Builtin::I32).compatible(&TYPES));
    assert!(ty.compatible(&Type::type_identifier(builtin(Builtin::I32))));
    assert!(!ty.compatible(&Type::type_identifier(builtin(Builtin::U8))));
}

#[test]
fn test_holes_are_compatible_with_everything() {
    for ty in sample_types() {
        assert!(hole("?1").compatible(&ty));
        assert!(ty.compatible(&hole("?1")));
    }
}

#[test]
fn test_records_compare_by_name_and_field() {
    let record = |names: &[&str], fields: Vec<Type>| Type::Record {
        names: names.iter().map(|name| name.to_string()).collect(),
        fields,
    };

    let point = record(&["x", "y"], vec![builtin(Builtin::I32), builtin(Builtin::I32)]);

    assert!(point.compatible(&record(&["x", "y"], vec![Type::IntLiteral(1), builtin(Builtin::I32)])));
    assert!(!point.compatible(&record(&["x", "z"], vec![builtin(Builtin::I32), builtin(Builtin::I32)])));
    assert!(!point.compatible(&record(&["x"], vec![builtin(Builtin::I32)])));
}

#[test]
fn test_satisfies() {
    assert!(Type::type_identifier(builtin(Builtin::I32)).satisfies(&TYPES));
    assert!(Type::variable("T", TYPES).satisfies(&TYPES));
    assert!(!Type::type_identifier(TYPES).satisfies(&TYPES));
    assert!(!Type::CString.satisfies(&TYPES));
    assert!(!builtin(Builtin::I32).satisfies(&TYPES));
    assert!(!Type::type_identifier(builtin(Builtin::I32)).satisfies(&BOOL));
    assert!(!Type::variable("T", Type::TypeUniverse(2)).satisfies(&TYPES));
}

#[test]
fn test_is_numeric() {
    assert!(builtin(Builtin::I16).is_numeric());
    assert!(Type::IntLiteral(-7).is_numeric());
    assert!(hole("?0").is_numeric());
    assert!(!Type::CString.is_numeric());
    assert!(!BOOL.is_numeric());
}

#[test]
fn test_stricter_types() {
    assert!(Type::IntLiteral(300).is_stricter_type(&Type::IntLiteral(5)));
    assert!(!Type::IntLiteral(5).is_stricter_type(&Type::IntLiteral(300)));
    assert!(builtin(Builtin::U16).is_stricter_type(&Type::IntLiteral(300)));
    assert!(!builtin(Builtin::U8).is_stricter_type(&Type::IntLiteral(300)));

    assert_eq!(Type::IntLiteral(5).get_stricter_type(&Type::IntLiteral(300)), Type::IntLiteral(300));
    assert_eq!(Type::IntLiteral(-5).get_stricter_type(&Type::IntLiteral(3)), Type::IntLiteral(-5));
    assert_eq!(Type::IntLiteral(5).get_stricter_type(&Type::IntLiteral(-3)), Type::IntLiteral(-5));
    assert_eq!(Type::IntLiteral(-2).get_stricter_type(&Type::IntLiteral(9)), Type::IntLiteral(-9));
    assert_eq!(
        builtin(Builtin::I32).get_stricter_type(&Type::IntLiteral(9)),
        builtin(Builtin::I32)
    );
    assert_eq!(
        Type::IntLiteral(9).get_stricter_type(&builtin(Builtin::I32)),
        builtin(Builtin::I32)
    );
}

#[test]
fn test_monomorphize() {
    let scheme = Type::function(
        Type::variable("T", TYPES),
        Type::sum(Type::variable("T", TYPES), Type::variable("U", TYPES)),
    );

    let instance = scheme.monomorphize("T", &builtin(Builtin::I32));

    assert_eq!(
        instance,
        Type::function(
            builtin(Builtin::I32),
            Type::sum(builtin(Builtin::I32), Type::variable("U", TYPES))
        )
    );
    assert_eq!(Type::CString.monomorphize("T", &builtin(Builtin::I32)), Type::CString);
}

#[test]
fn test_display() {
    assert_eq!(UNIT.to_string(), "unit");
    assert_eq!(BOOL.to_string(), "bool");
    assert_eq!(Type::Enum(3).to_string(), "3");
    assert_eq!(Type::IntLiteral(42).to_string(), "ConstInt[42]");
    assert_eq!(Type::CString.to_string(), "ConstString");
    assert_eq!(
        Type::function(builtin(Builtin::I32), builtin(Builtin::U8)).to_string(),
        "i32 -> u8"
    );
    assert_eq!(Type::type_identifier(builtin(Builtin::I32)).to_string(), "Val[i32]");
    assert_eq!(TYPES.to_string(), "Type 1");
    assert_eq!(
        Type::polymorphic("T", TYPES, Type::variable("T", TYPES)).to_string(),
        "'T : Type 1 => 'T : Type 1"
    );
    assert_eq!(hole("?2").to_string(), "Hole[?2]");
    assert_eq!(
        Type::Record {
            names: vec!["x".to_string(), "y".to_string()],
            fields: vec![builtin(Builtin::I32), builtin(Builtin::I32)],
        }
        .to_string(),
        "{(x: i32) * (y: i32)}"
    );
}

#[test]
fn test_builtin_names() {
    for builtin in Builtin::ALL {
        assert_eq!(Builtin::from_name(builtin.name()), Some(builtin));
    }
    assert_eq!(Builtin::from_name("string"), None);
}

#[test]
fn test_normalize_types() {
    let token = MK_TOKEN!(TokenKind::Identifier, "T".to_string(), 1, 2);

    let nested = Type::type_identifier(Type::function(
        Type::type_identifier(builtin(Builtin::I32)),
        Type::product(Type::IntLiteral(3), Type::type_identifier(Type::CString)),
    ));

    assert_eq!(
        normalize_types(nested, &token).map_err(|error| error.get_code()),
        Ok(Type::function(
            builtin(Builtin::I32),
            Type::product(Type::Enum(3), Type::CString)
        ))
    );

    let error = normalize_types(Type::IntLiteral(-5), &token).unwrap_err();
    assert_eq!(error.get_code(), 204);

    assert_eq!(
        normalize_types(Type::variable("T", TYPES), &token).map_err(|error| error.get_code()),
        Ok(Type::variable("T", TYPES))
    );
}

#[test]
fn test_denoted_type() {
    let token = MK_TOKEN!(TokenKind::Identifier, "x".to_string(), 1, 2);

    assert_eq!(
        denoted_type(Type::type_identifier(builtin(Builtin::U8)), &token).map_err(|error| error.get_code()),
        Ok(Some(builtin(Builtin::U8)))
    );
    assert_eq!(
        denoted_type(Type::IntLiteral(4), &token).map_err(|error| error.get_code()),
        Ok(Some(Type::Enum(4)))
    );
    assert_eq!(denoted_type(TYPES, &token).map_err(|error| error.get_code()), Ok(Some(TYPES)));
    assert_eq!(denoted_type(Type::IntLiteral(0), &token).map_err(|error| error.get_code()), Ok(None));
    assert_eq!(denoted_type(Type::CString, &token).map_err(|error| error.get_code()), Ok(None));
}

#[test]
fn test_constraint_table() {
    let mut table = ConstraintTable::new();
    assert!(table.is_empty());

    table.register_hole(hole("?0"));
    table.add_unification(&hole("?0"), &Type::IntLiteral(5));
    table.add_unification(&builtin(Builtin::I32), &hole("?0"));
    table.add_unification(&builtin(Builtin::I32), &Type::IntLiteral(5));
    table.add(hole("?1"), Constraint::Satisfaction(TYPES));

    assert_eq!(table.len(), 2);
    assert_eq!(
        table.get(&hole("?0")),
        Some(
            &[
                Constraint::Unification(Type::IntLiteral(5)),
                Constraint::Unification(builtin(Builtin::I32)),
            ][..]
        )
    );
    assert_eq!(table.get(&hole("?1")).map(<[Constraint]>::len), Some(1));
    assert_eq!(Constraint::Satisfaction(TYPES).to_string(), "Satisfy[Type 1]");
}

#[test]
fn test_evaluate_type_expressions() {
    let (definitions, _) = parse_source("let t : Type := i32 -> u8 * i32; let h : Type := auto;");
    let mut evaluator = TypeEvaluator::new();
    let bindings = global_bindings();

    let ty = evaluator.evaluate(&definitions[0].val, &bindings, None).unwrap();
    assert_eq!(
        ty,
        Type::type_identifier(Type::function(
            builtin(Builtin::I32),
            Type::product(builtin(Builtin::U8), builtin(Builtin::I32))
        ))
    );
    assert_eq!(evaluator.type_table().get(&definitions[0].val.id), Some(&ty));

    let ty = evaluator.evaluate(&definitions[1].val, &bindings, None).unwrap();
    assert!(matches!(&ty, Type::TypeIdentifier(inner) if matches!(&**inner, Type::Hole { name, .. } if name == "?0")));
    assert_eq!(evaluator.constraints().len(), 1);
}

#[test]
fn test_evaluate_values() {
    let (definitions, _) = parse_source(
        "let a : i32 := -7; let b : i32 := (1, \"s\", ()); let c : i32 := x |-> 3; let d : i32 := 1 < 2;",
    );
    let mut evaluator = TypeEvaluator::new();
    let bindings = global_bindings();

    let mut evaluate = |index: usize| evaluator.evaluate(&definitions[index].val, &bindings, None).unwrap();

    assert_eq!(evaluate(0), Type::IntLiteral(-7));
    assert_eq!(
        evaluate(1),
        Type::product(Type::product(Type::IntLiteral(1), Type::CString), UNIT)
    );
    assert_eq!(evaluate(2), Type::IntLiteral(3));
    assert_eq!(evaluate(3), BOOL);
}

#[test]
fn test_check_success() {
    let (unit, checker) = check("let x : i32 := 42; let y : i32 := x + 10; let f : i32 -> i32 := x |-> x * 2;");

    assert!(unit.diagnostics().is_empty(), "{:?}", unit.diagnostics());
    assert!(!unit.errored());
    assert!(!checker.errored());
    assert_eq!(checker.states(), &[CheckState::Consistent; 3]);
    assert_eq!(unit.infos(), &["Successfully typechecked test.meow".to_string()]);
    assert_eq!(checker.bindings().get("y"), Some(&builtin(Builtin::I32)));
}

#[test]
fn test_check_records_value_types() {
    let (definitions, mut unit) = parse_source("let x : i32 := 42;");
    let checker = type_check(&mut unit, &definitions);

    assert_eq!(checker.type_table().get(&definitions[0].val.id), Some(&Type::IntLiteral(42)));
}

#[test]
fn test_forward_reference() {
    let (unit, _) = check("let y : i32 := x + 1; let x : i32 := 2;");
    assert!(unit.diagnostics().is_empty(), "{:?}", unit.diagnostics());
}

#[test]
fn test_failed_declaration_is_skipped() {
    let (unit, checker) = check("let x : Foo := 1; let y : i32 := x;");

    assert_eq!(codes(&unit), vec![200, 200]);
    assert!(unit.diagnostics()[0].message.contains("Foo"));
    assert!(unit.diagnostics()[1].message.contains("'x'"));
    assert_eq!(checker.states(), &[CheckState::Inconsistent, CheckState::Inconsistent]);
    assert!(unit.infos().is_empty());
}

#[test]
fn test_declared_type_must_be_a_type() {
    let (unit, _) = check("let x : -5 := 1; let s : \"s\" := 1;");

    assert_eq!(codes(&unit), vec![204, 204]);
    assert!(unit.diagnostics()[0].message.contains("ought to be a type identifier"));

    let (unit, _) = check("let f : -5 -> i32 := x |-> 1;");
    assert_eq!(codes(&unit), vec![204]);
}

#[test]
fn test_type_formers() {
    let (unit, _) = check(
        "let Pair : Type := i32 * i32; let Either : Type := i32 + u8; let P : Type := record { x : i32; y : i32; };",
    );
    assert!(unit.diagnostics().is_empty(), "{:?}", unit.diagnostics());

    let (unit, _) = check("let P : Type := record { x : \"s\"; };");
    assert_eq!(codes(&unit), vec![204]);
}

#[test]
fn test_arithmetic_errors() {
    let (unit, _) = check("let s : i32 := 1 + \"a\";");
    assert_eq!(codes(&unit), vec![201]);
    assert!(unit.diagnostics()[0].message.contains("Cannot add values of non-numeric types"));

    let (unit, _) = check("let a : u8 := 1; let b : i32 := 2; let c : i32 := a - b;");
    assert_eq!(codes(&unit), vec![201]);
    assert!(unit.diagnostics()[0].message.contains("Cannot subtract values of different types"));

    let (unit, _) = check("let b : i32 := 1 = 2;");
    assert_eq!(codes(&unit), vec![201]);
    assert!(unit.diagnostics()[0].message.contains("Expected type"));

    let (unit, _) = check("let n : i32 := -\"s\";");
    assert_eq!(codes(&unit), vec![201]);
}

#[test]
fn test_lambdas() {
    let (unit, _) = check("let lt : i32 -> 2 := x |-> x < 10; let add : (i32, i32) -> i32 := (a, b) |-> a + b;");
    assert!(unit.diagnostics().is_empty(), "{:?}", unit.diagnostics());

    let (unit, _) = check("let x : i32 := y |-> y;");
    assert_eq!(codes(&unit), vec![201]);

    let (unit, _) = check("let f : i32 -> i32 := 1 |-> 2;");
    assert_eq!(codes(&unit), vec![202]);

    let (unit, _) = check("let f : i32 -> u8 := x |-> x;");
    assert_eq!(codes(&unit), vec![201]);
    assert!(unit.diagnostics()[0].message.contains("Expected function to return"));
}

#[test]
fn test_tuple_parameter_must_be_identifier() {
    let (unit, _) = check("let f : (i32, i32) -> i32 := (x, 42) |-> x + 10;");

    assert_eq!(codes(&unit), vec![203]);
    assert_eq!(unit.diagnostics()[0].token.as_ref().map(|token| token.data.as_str()), Some("42"));
}

#[test]
fn test_polymorphism() {
    let (unit, _) = check(
        "let id : T => T -> T := T |=> x |-> x; let n : i32 := id i32 5; let s : i32 + u8 := inl i32 u8 5;",
    );
    assert!(unit.diagnostics().is_empty(), "{:?}", unit.diagnostics());

    let (unit, _) = check("let id : T => T -> T := T |=> x |-> x; let result : i32 := id \"hello\" + 42;");
    assert_eq!(codes(&unit), vec![210]);

    let (unit, _) = check("let f : T => T -> T := 42 |=> x |-> x;");
    assert_eq!(codes(&unit), vec![211]);

    let (unit, _) = check("let x : i32 := T |=> T;");
    assert_eq!(codes(&unit), vec![201]);
}

#[test]
fn test_polymorphic_type_definition_updates_binding() {
    let (unit, checker) = check("let Const : T => Type := T |=> i32;");

    assert!(unit.diagnostics().is_empty(), "{:?}", unit.diagnostics());
    assert_eq!(checker.states(), &[CheckState::Consistent]);
    assert_eq!(checker.bindings().get("Const"), Some(&Type::polymorphic("T", TYPES, TYPES)));
}

#[test]
fn test_application_errors() {
    let (unit, _) = check("let x : i32 := 1; let y : i32 := x 2;");
    assert_eq!(codes(&unit), vec![201]);
    assert!(unit.diagnostics()[0].message.contains("is not a function"));

    let (unit, _) = check("let f : i32 -> i32 := x |-> x; let y : i32 := f \"s\";");
    assert_eq!(codes(&unit), vec![201]);
}

#[test]
fn test_cases() {
    let (unit, _) = check("let sign : i32 -> i32 := x |-> { -1 ; if x < 0 , 1 ; otherwise . };");
    assert!(unit.diagnostics().is_empty(), "{:?}", unit.diagnostics());

    let (unit, _) = check("let f : i32 -> i32 := x |-> { 1 ; if x , 2 ; otherwise . };");
    assert_eq!(codes(&unit), vec![230]);

    let (unit, _) = check("let f : i32 -> i32 := x |-> { \"s\" ; otherwise . };");
    assert_eq!(codes(&unit), vec![231]);

    let (unit, _) = check("let f : i32 -> i32 := x |-> x; let n : i32 := f { 1 ; otherwise . };");
    assert_eq!(codes(&unit), vec![201]);
}

#[test]
fn test_procedures() {
    let (unit, _) = check("let f : i32 -> i32 := x |-> [ y : i32 := 1; ] { y := x + y; print y; return y; };");
    assert!(unit.diagnostics().is_empty(), "{:?}", unit.diagnostics());

    let (unit, _) = check("let f : i32 -> i32 := x |-> [ y : i32 := \"s\"; ] { return x; };");
    assert_eq!(codes(&unit), vec![201]);

    let (unit, _) = check("let f : i32 -> i32 := x |-> [ y : i32; ] { y <- \"s\"; return x; };");
    assert_eq!(codes(&unit), vec![201]);

    let (unit, _) = check("let f : i32 -> i32 := x |-> [] { log x; return x; };");
    assert_eq!(codes(&unit), vec![200]);

    let (unit, _) = check("let g : i32 -> i32 := x |-> x; let f : i32 -> i32 := x |-> [] { g \"s\"; return x; };");
    assert_eq!(codes(&unit), vec![201]);
}

#[test]
fn test_procedure_returns() {
    let (unit, _) = check("let f: i32 -> i32 := x \\mt []{ return 42; return \"hello\"; };");
    assert_eq!(codes(&unit), vec![220]);

    let (unit, _) = check("let f: i32 -> i32 := x \\mt []{ return \"hello\"; };");
    assert_eq!(codes(&unit), vec![221]);
}

#[test]
fn test_hole_resolution() {
    let (unit, checker) = check("let h : auto := 5;");
    assert!(unit.diagnostics().is_empty(), "{:?}", unit.diagnostics());
    assert_eq!(checker.constraints().len(), 1);

    let (unit, _) = check("let f : i32 -> i32 := x |-> [ y : auto := 5; ] { y := \"s\"; return x; };");
    assert_eq!(codes(&unit), vec![202]);
    assert!(unit.diagnostics()[0].message.contains("are not unifiable"));
    assert_eq!(unit.diagnostics()[0].phase, DiagPhase::TypeChecker);

    let (unit, _) = check("let f : auto -> i32 := x |-> 1;");
    assert_eq!(codes(&unit), vec![202]);
    assert!(unit.diagnostics()[0].message.contains("no concrete types"));
    assert_eq!(unit.diagnostics()[0].token.as_ref().map(|token| token.data.as_str()), Some("auto"));
}
