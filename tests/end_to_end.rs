//! End-to-end scenarios run through the public API, covering the rendered
//! diagnostic text and symbol-table dump a driver would actually see.

use pascal_sema::ast::{
    CompoundStatement, ConstantKind, Expr, Function, Location, Program, Statement, VariableDecl,
    VariableRef,
};
use pascal_sema::{AnalyzerConfig, Analyzer};
use pretty_assertions::assert_eq;

fn loc(line: u32, column: u32) -> Location {
    Location { line, column }
}

fn int_const(n: i64, l: Location) -> Expr {
    Expr::Constant {
        value_type: ConstantKind::Integer,
        literal: n.to_string(),
        location: l,
    }
}

fn var_decl(name: &str, type_text: &str, l: Location) -> VariableDecl {
    VariableDecl {
        name: name.to_string(),
        type_text: type_text.to_string(),
        location: l,
        initializer: None,
    }
}

#[test]
fn no_errors_prints_fixed_banner() {
    let prog = Program {
        name: "p".to_string(),
        location: loc(1, 1),
        declarations: vec![var_decl("x", "integer", loc(1, 5))],
        functions: vec![],
        body: CompoundStatement {
            statements: vec![Statement::Print {
                expr: Expr::VariableRef(VariableRef {
                    name: "x".to_string(),
                    location: loc(2, 7),
                    subscripts: vec![],
                }),
            }],
        },
    };
    let result = Analyzer::new(AnalyzerConfig::default()).analyze(&prog);
    let source: Vec<String> = vec!["var x: integer;".to_string(), "print x;".to_string()];
    let rendered = result.diagnostics.render(&source);
    assert!(rendered.contains("There is no syntactic error and semantic error!"));
}

#[test]
fn undeclared_use_reports_exact_diagnostic_text() {
    let prog = Program {
        name: "p".to_string(),
        location: loc(1, 1),
        declarations: vec![],
        functions: vec![],
        body: CompoundStatement {
            statements: vec![Statement::Print {
                expr: Expr::VariableRef(VariableRef {
                    name: "x".to_string(),
                    location: loc(1, 7),
                    subscripts: vec![],
                }),
            }],
        },
    };
    let result = Analyzer::new(AnalyzerConfig::default()).analyze(&prog);
    let source: Vec<String> = vec!["print x;".to_string()];
    let rendered = result.diagnostics.render(&source);
    assert_eq!(
        rendered,
        "<Error> Found in line 1, column 7: use of undeclared symbol 'x'\n    print x;\n       ^\n"
    );
}

#[test]
fn array_dimension_error_propagates_without_a_second_diagnostic() {
    let prog = Program {
        name: "p".to_string(),
        location: loc(1, 1),
        declarations: vec![var_decl("a", "integer [0]", loc(1, 5))],
        functions: vec![],
        body: CompoundStatement {
            statements: vec![Statement::Assignment {
                location: loc(2, 1),
                target: VariableRef {
                    name: "a".to_string(),
                    location: loc(2, 1),
                    subscripts: vec![int_const(1, loc(2, 3))],
                },
                value: int_const(3, loc(2, 9)),
            }],
        },
    };
    let result = Analyzer::new(AnalyzerConfig::default()).analyze(&prog);
    assert_eq!(result.diagnostics.diagnostics().len(), 1);
    assert!(
        result.diagnostics.diagnostics()[0]
            .message
            .contains("not greater than 0")
    );
}

#[test]
fn assign_to_constant_points_at_the_lhs() {
    let mut decl = var_decl("PI", "real", loc(1, 5));
    decl.initializer = Some(Expr::Constant {
        value_type: ConstantKind::Real,
        literal: "3.14".to_string(),
        location: loc(1, 10),
    });
    let prog = Program {
        name: "p".to_string(),
        location: loc(1, 1),
        declarations: vec![decl],
        functions: vec![],
        body: CompoundStatement {
            statements: vec![Statement::Assignment {
                location: loc(2, 1),
                target: VariableRef {
                    name: "PI".to_string(),
                    location: loc(2, 1),
                    subscripts: vec![],
                },
                value: int_const(3, loc(2, 6)),
            }],
        },
    };
    let result = Analyzer::new(AnalyzerConfig::default()).analyze(&prog);
    let diag = &result.diagnostics.diagnostics()[0];
    assert_eq!(diag.location, loc(2, 1));
    assert_eq!(diag.message, "cannot assign to variable 'PI' which is a constant");
}

#[test]
fn function_call_with_wrong_arity_is_reported() {
    let func = Function {
        name: "f".to_string(),
        return_type: "void".to_string(),
        parameters: vec![],
        location: loc(1, 1),
        body: CompoundStatement { statements: vec![] },
    };
    let prog = Program {
        name: "p".to_string(),
        location: loc(1, 1),
        declarations: vec![],
        functions: vec![func],
        body: CompoundStatement {
            statements: vec![Statement::Print {
                expr: Expr::Call {
                    name: "f".to_string(),
                    location: loc(3, 1),
                    arguments: vec![int_const(1, loc(3, 3))],
                },
            }],
        },
    };
    let result = Analyzer::new(AnalyzerConfig::default()).analyze(&prog);
    assert!(
        result
            .diagnostics
            .diagnostics()
            .iter()
            .any(|d| d.message.contains("too few/much arguments"))
    );
}

#[test]
fn dump_is_disabled_when_configured_off() {
    let prog = Program {
        name: "p".to_string(),
        location: loc(1, 1),
        declarations: vec![var_decl("x", "integer", loc(1, 5))],
        functions: vec![],
        body: CompoundStatement { statements: vec![] },
    };
    let mut config = AnalyzerConfig::default();
    config.dump_symbol_tables = false;
    let result = Analyzer::new(config).analyze(&prog);
    assert!(result.symbol_table_dump.is_empty());
}

#[test]
fn ast_round_trips_through_json() {
    let prog = Program {
        name: "p".to_string(),
        location: loc(1, 1),
        declarations: vec![var_decl("x", "integer", loc(1, 5))],
        functions: vec![],
        body: CompoundStatement {
            statements: vec![Statement::Print {
                expr: Expr::VariableRef(VariableRef {
                    name: "x".to_string(),
                    location: loc(2, 7),
                    subscripts: vec![],
                }),
            }],
        },
    };
    let json = serde_json::to_string(&prog).expect("ast should serialize for round-trip test");
    let parsed: Program = serde_json::from_str(&json).unwrap();
    let result = Analyzer::new(AnalyzerConfig::default()).analyze(&parsed);
    assert!(result.diagnostics.is_empty());
}
