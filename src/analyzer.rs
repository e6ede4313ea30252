//! The semantic analysis engine
//!
//! A recursive-descent walk over the AST that threads four cooperating
//! stacks (scope, context, attribute, loop-variable registry) and a
//! diagnostic collector. Every expression visit pushes exactly one entry
//! onto the attribute stack; every statement visit leaves it unchanged.
//! Scopes are pushed before a construct's own name would be visible to
//! itself and popped once every name declared inside has been dumped.

use crate::ast::{CompoundStatement, ConstantKind, Expr, Function, Location, Program, Statement, VariableDecl, VariableRef};
use crate::attribute::AttributeStack;
use crate::config::AnalyzerConfig;
use crate::context::{Context, ContextStack};
use crate::diagnostics::DiagnosticCollector;
use crate::dump::render_scope;
use crate::loopvars::LoopVariableRegistry;
use crate::scope::ScopeStack;
use crate::symbol::{SymbolEntry, SymbolKind};
use crate::types::{DimResult, Primitive, ValueType};

/// Owns every stack the traversal needs and accumulates both diagnostics
/// and (optionally) a rendered symbol-table dump as it walks a program.
pub struct Analyzer {
    config: AnalyzerConfig,
    scopes: ScopeStack,
    contexts: ContextStack,
    attrs: AttributeStack,
    loop_vars: LoopVariableRegistry,
    diagnostics: DiagnosticCollector,
    dump: String,
}

/// Everything produced by analyzing one program.
pub struct AnalysisResult {
    pub diagnostics: DiagnosticCollector,
    pub symbol_table_dump: String,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Analyzer {
            config,
            scopes: ScopeStack::new(),
            contexts: ContextStack::new(),
            attrs: AttributeStack::new(),
            loop_vars: LoopVariableRegistry::new(),
            diagnostics: DiagnosticCollector::new(),
            dump: String::new(),
        }
    }

    pub fn analyze(mut self, program: &Program) -> AnalysisResult {
        self.visit_program(program);
        AnalysisResult {
            diagnostics: self.diagnostics,
            symbol_table_dump: self.dump,
        }
    }

    // -- shared helpers -----------------------------------------------

    fn level(&self) -> u32 {
        self.scopes.level()
    }

    fn propagate_error(&self, location: Location) -> SymbolEntry {
        SymbolEntry {
            name: String::new(),
            kind: SymbolKind::Propagate,
            level: self.level(),
            ty: String::new(),
            attribute: "error".to_string(),
            location,
        }
    }

    fn propagate(&self, location: Location, ty: String, attribute: String) -> SymbolEntry {
        SymbolEntry {
            name: String::new(),
            kind: SymbolKind::Propagate,
            level: self.level(),
            ty,
            attribute,
            location,
        }
    }

    /// Register `entry` in the innermost scope, first checking the
    /// loop-variable registry - a name active there is redeclared no
    /// matter how deeply nested the new declaration is.
    fn insert(&mut self, entry: SymbolEntry) -> bool {
        if self.loop_vars.contains(&entry.name) {
            self.diagnostics
                .push(entry.location, format!("symbol '{}' is redeclared", entry.name));
            return false;
        }
        if !self.scopes.insert_innermost(entry.clone()) {
            self.diagnostics
                .push(entry.location, format!("symbol '{}' is redeclared", entry.name));
            return false;
        }
        true
    }

    fn lookup(&mut self, name: &str, location: Location) -> Option<SymbolEntry> {
        match self.scopes.lookup(name) {
            Some(entry) => Some(entry.clone()),
            None => {
                self.diagnostics
                    .push(location, format!("use of undeclared symbol '{name}'"));
                None
            }
        }
    }

    fn pop_scope_with_dump(&mut self) {
        if let Some(scope) = self.scopes.pop() {
            if self.config.dump_symbol_tables {
                self.dump.push_str(&render_scope(&scope));
            }
        }
    }

    // -- declarations ---------------------------------------------------

    fn visit_program(&mut self, program: &Program) {
        self.scopes.push();
        self.contexts.push(Context::Program);

        let program_entry = SymbolEntry {
            name: program.name.clone(),
            kind: SymbolKind::Program,
            level: self.level(),
            ty: "void".to_string(),
            attribute: String::new(),
            location: program.location,
        };
        self.insert(program_entry);

        for decl in &program.declarations {
            self.visit_variable_decl(decl);
        }
        for func in &program.functions {
            self.visit_function(func);
        }
        self.visit_compound(&program.body);

        self.contexts.pop();
        self.pop_scope_with_dump();
    }

    fn classify_declaration(&self) -> SymbolKind {
        match self.contexts.innermost() {
            Some(Context::ForLoop) => SymbolKind::LoopVariable,
            Some(Context::Function { .. }) => SymbolKind::Parameter,
            _ => SymbolKind::Variable,
        }
    }

    fn visit_variable_decl(&mut self, decl: &VariableDecl) {
        let mut entry = SymbolEntry {
            name: decl.name.clone(),
            kind: SymbolKind::Variable,
            level: self.level(),
            ty: decl.type_text.clone(),
            attribute: String::new(),
            location: decl.location,
        };

        if let Some(init) = &decl.initializer {
            self.visit_expr(init);
        }

        let initializer_is_constant = self
            .attrs
            .peek()
            .map(|top| top.kind == SymbolKind::Propagate)
            .unwrap_or(false);
        if initializer_is_constant {
            let init_attr = self.attrs.pop();
            entry.kind = SymbolKind::Constant;
            entry.attribute = init_attr.attribute;
        } else {
            entry.kind = self.classify_declaration();
        }

        if let Some((_, dims)) = ValueType::parse_canonical(&decl.type_text) {
            for d in &dims {
                match d {
                    DimResult::Valid(_) => {}
                    DimResult::NonPositive(_) | DimResult::Unparsable => {
                        entry.attribute = "error".to_string();
                        self.diagnostics.push(
                            decl.location,
                            format!(
                                "'{}' declared as an array with an index that is not greater than 0",
                                decl.name
                            ),
                        );
                        break;
                    }
                }
            }
        }

        let for_registry = entry.clone();
        self.insert(entry);
        if for_registry.kind == SymbolKind::LoopVariable {
            self.loop_vars.push(for_registry);
        }
    }

    fn visit_function(&mut self, func: &Function) {
        let param_types = func
            .parameters
            .iter()
            .map(|p| p.type_text.clone())
            .collect::<Vec<_>>()
            .join(", ");
        let entry = SymbolEntry {
            name: func.name.clone(),
            kind: SymbolKind::Function,
            level: self.level(),
            ty: func.return_type.clone(),
            attribute: param_types,
            location: func.location,
        };
        self.insert(entry);

        self.scopes.push();
        self.contexts.push(Context::Function {
            return_type: func.return_type.clone(),
        });

        for param in &func.parameters {
            self.visit_variable_decl(param);
        }
        self.visit_compound(&func.body);

        self.contexts.pop();
        self.pop_scope_with_dump();
    }

    // -- statements -----------------------------------------------------

    fn visit_compound(&mut self, compound: &CompoundStatement) {
        let add_scope = !matches!(self.contexts.innermost(), Some(Context::Function { .. }));
        if add_scope {
            self.scopes.push();
        }
        self.contexts.push(Context::CompoundStatement);

        for stmt in &compound.statements {
            self.visit_statement(stmt);
        }

        self.contexts.pop();
        if add_scope {
            self.pop_scope_with_dump();
        }
    }

    fn visit_statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Print { expr } => self.visit_print(expr),
            Statement::Read { target } => self.visit_read(target),
            Statement::Assignment { location, target, value } => {
                self.visit_variable_ref(target);
                self.visit_expr(value);
                self.check_assignment(*location);
            }
            Statement::If { condition, then_branch, else_branch } => {
                self.visit_if(condition, then_branch, else_branch.as_ref())
            }
            Statement::While { condition, body } => self.visit_while(condition, body),
            Statement::For {
                location,
                loop_var,
                lower_assign,
                upper_bound,
                body,
            } => self.visit_for(*location, loop_var, lower_assign, upper_bound, body),
            Statement::Return { location, expr } => self.visit_return(*location, expr),
            Statement::Compound(compound) => self.visit_compound(compound),
        }
    }

    fn visit_print(&mut self, expr: &Expr) {
        self.visit_expr(expr);
        let value = self.attrs.pop();
        if value.is_error() {
            return;
        }
        if !is_scalar_type(&value.ty) {
            self.diagnostics
                .push(value.location, "expression of print statement must be scalar type");
        }
    }

    fn visit_read(&mut self, target: &VariableRef) {
        self.visit_variable_ref(target);
        let reference = self.attrs.pop();
        if reference.is_error() {
            return;
        }
        if !is_scalar_type(&reference.ty) {
            self.diagnostics.push(
                reference.location,
                "variable reference of read statement must be scalar type",
            );
        } else if matches!(reference.kind, SymbolKind::Constant | SymbolKind::LoopVariable) {
            self.diagnostics.push(
                reference.location,
                "variable reference of read statement cannot be a constant or loop variable",
            );
        }
    }

    /// Shared by plain assignment statements and a `for` loop's
    /// initializing lower-bound assignment. Pops the RHS then the LHS off
    /// the attribute stack (they were pushed in that order since the
    /// target was visited first). A poisoned LHS, or the first LHS rule
    /// that fires, stops all further checking - the RHS type-compatibility
    /// comparison and the for-loop lower-bound capture only run once the
    /// LHS has cleanly passed every rule, mirroring the reference analyzer.
    fn check_assignment(&mut self, assign_location: Location) {
        let rhs = self.attrs.pop();
        let lhs = self.attrs.pop();

        if lhs.is_error() {
            return;
        }

        if !is_scalar_type(&lhs.ty) {
            self.diagnostics
                .push(lhs.location, "array assignment is not allowed");
            return;
        } else if lhs.kind == SymbolKind::Constant {
            self.diagnostics.push(
                lhs.location,
                format!("cannot assign to variable '{}' which is a constant", lhs.name),
            );
            return;
        } else if lhs.kind == SymbolKind::LoopVariable
            && !matches!(self.contexts.innermost(), Some(Context::ForLoop))
        {
            self.diagnostics.push(
                lhs.location,
                "the value of loop variable cannot be modified inside the loop body",
            );
            return;
        }

        if rhs.is_error() {
            return;
        }

        if !is_scalar_type(&rhs.ty) {
            self.diagnostics
                .push(rhs.location, "array assignment is not allowed");
        } else if lhs.ty != rhs.ty && !(lhs.ty == "real" && rhs.ty == "integer") {
            self.diagnostics.push(
                assign_location,
                format!("assigning to '{}' from incompatible type '{}'", lhs.ty, rhs.ty),
            );
        }

        if matches!(self.contexts.innermost(), Some(Context::ForLoop)) {
            self.loop_vars.set_top_attribute(rhs.attribute.clone());
        }
    }

    fn visit_if(
        &mut self,
        condition: &Expr,
        then_branch: &CompoundStatement,
        else_branch: Option<&CompoundStatement>,
    ) {
        self.visit_expr(condition);
        self.visit_compound(then_branch);
        if let Some(else_branch) = else_branch {
            self.visit_compound(else_branch);
        }
        let cond = self.attrs.pop();
        if cond.is_error() {
            return;
        }
        if cond.ty != "boolean" {
            self.diagnostics
                .push(cond.location, "the expression of condition must be boolean type");
        }
    }

    /// Aligned with `If`: a propagated error in the condition is silently
    /// swallowed rather than re-reported.
    fn visit_while(&mut self, condition: &Expr, body: &CompoundStatement) {
        self.visit_expr(condition);
        self.visit_compound(body);
        let cond = self.attrs.pop();
        if cond.is_error() {
            return;
        }
        if cond.ty != "boolean" {
            self.diagnostics
                .push(cond.location, "the expression of condition must be boolean type");
        }
    }

    fn visit_for(
        &mut self,
        location: Location,
        loop_var: &VariableDecl,
        lower_assign: &Expr,
        upper_bound: &Expr,
        body: &CompoundStatement,
    ) {
        self.scopes.push();
        self.contexts.push(Context::ForLoop);

        self.visit_variable_decl(loop_var);

        let loop_var_ref = VariableRef {
            name: loop_var.name.clone(),
            location: loop_var.location,
            subscripts: Vec::new(),
        };
        self.visit_variable_ref(&loop_var_ref);
        self.visit_expr(lower_assign);
        self.check_assignment(loop_var.location);

        self.visit_expr(upper_bound);

        self.visit_compound(body);

        let lower_entry = self.loop_vars.pop();
        let upper_entry = self.attrs.pop();

        if let (Ok(lower), Ok(upper)) = (
            lower_entry.attribute.parse::<i64>(),
            upper_entry.attribute.parse::<i64>(),
        ) {
            if lower > upper {
                self.diagnostics.push(
                    location,
                    "the lower bound and upper bound of iteration count must be in the incremental order",
                );
            }
        }

        self.contexts.pop();
        self.pop_scope_with_dump();
    }

    fn visit_return(&mut self, location: Location, expr: &Expr) {
        self.visit_expr(expr);
        let value = self.attrs.pop();

        let Some(return_type) = self.contexts.innermost_value_returning_function() else {
            self.diagnostics
                .push(location, "program/procedure should not return a value");
            return;
        };
        let return_type = return_type.to_string();

        if value.is_error() {
            return;
        }
        if value.ty != return_type && !(return_type == "real" && value.ty == "integer") {
            self.diagnostics.push(
                value.location,
                format!("return '{}' from a function with return type '{}'", value.ty, return_type),
            );
        }
    }

    // -- expressions ------------------------------------------------------

    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Constant { value_type, literal, location } => {
                let prim = match value_type {
                    ConstantKind::Integer => Primitive::Integer,
                    ConstantKind::Real => Primitive::Real,
                    ConstantKind::Boolean => Primitive::Boolean,
                    ConstantKind::String => Primitive::String,
                };
                let entry = self.propagate(*location, prim.as_str().to_string(), literal.clone());
                self.attrs.push(entry);
            }
            Expr::VariableRef(vref) => self.visit_variable_ref(vref),
            Expr::Binary { op, location, left, right } => self.visit_binary(op, *location, left, right),
            Expr::Unary { op, location, operand } => self.visit_unary(op, *location, operand),
            Expr::Call { name, location, arguments } => self.visit_call(name, *location, arguments),
        }
    }

    fn visit_variable_ref(&mut self, vref: &VariableRef) {
        let rank_requested = vref.subscripts.len();
        for subscript in &vref.subscripts {
            self.visit_expr(subscript);
        }

        let resolved = self.lookup(&vref.name, vref.location);
        let Some(mut entry) = resolved else {
            for _ in 0..rank_requested {
                self.attrs.pop();
            }
            let err = self.propagate_error(vref.location);
            self.attrs.push(err);
            return;
        };

        if !entry.kind.is_variable_like() {
            self.diagnostics
                .push(vref.location, format!("use of non-variable symbol '{}'", vref.name));
            entry.attribute = "error".to_string();
        }

        if entry.is_error() {
            for _ in 0..rank_requested {
                self.attrs.pop();
            }
            entry.location = vref.location;
            self.attrs.push(entry);
            return;
        }

        let declared = ValueType::from_canonical(&entry.ty);
        let declared_rank = declared.rank();

        let mut index_entries = Vec::with_capacity(rank_requested);
        for _ in 0..rank_requested {
            index_entries.push(self.attrs.pop());
        }
        let mut bad_index_location = None;
        for index in &index_entries {
            if index.ty != "integer" {
                bad_index_location = Some(index.location);
            }
        }
        if let Some(bad_location) = bad_index_location {
            self.diagnostics
                .push(bad_location, "index of array reference must be an integer");
            entry.attribute = "error".to_string();
            entry.location = vref.location;
            self.attrs.push(entry);
            return;
        }

        if rank_requested > declared_rank {
            self.diagnostics
                .push(vref.location, format!("there is an over array subscript on '{}'", vref.name));
            entry.attribute = "error".to_string();
            entry.location = vref.location;
            self.attrs.push(entry);
            return;
        }

        entry.ty = declared.with_leading_dims_dropped(rank_requested).canonical();
        entry.location = vref.location;
        entry.level = self.level();
        self.attrs.push(entry);
    }

    fn visit_binary(&mut self, op: &str, location: Location, left: &Expr, right: &Expr) {
        self.visit_expr(left);
        self.visit_expr(right);
        let right_entry = self.attrs.pop();
        let left_entry = self.attrs.pop();

        if left_entry.is_error() || right_entry.is_error() {
            let err = self.propagate_error(location);
            self.attrs.push(err);
            return;
        }

        match binary_result_type(op, &left_entry.ty, &right_entry.ty) {
            Some(ty) => {
                let ok = self.propagate(location, ty, String::new());
                self.attrs.push(ok);
            }
            None => {
                self.diagnostics.push(
                    location,
                    format!(
                        "invalid operands to binary operator '{op}' ('{}' and '{}')",
                        left_entry.ty, right_entry.ty
                    ),
                );
                let err = self.propagate_error(location);
                self.attrs.push(err);
            }
        }
    }

    fn visit_unary(&mut self, op: &str, location: Location, operand: &Expr) {
        self.visit_expr(operand);
        let operand_entry = self.attrs.pop();

        if operand_entry.is_error() {
            let err = self.propagate_error(location);
            self.attrs.push(err);
            return;
        }

        match unary_result_type(op, &operand_entry.ty) {
            Some(ty) => {
                let ok = self.propagate(location, ty, String::new());
                self.attrs.push(ok);
            }
            None => {
                self.diagnostics.push(
                    location,
                    format!("invalid operand to unary operator '{op}' ('{}')", operand_entry.ty),
                );
                let err = self.propagate_error(location);
                self.attrs.push(err);
            }
        }
    }

    fn visit_call(&mut self, name: &str, location: Location, arguments: &[Expr]) {
        for arg in arguments {
            self.visit_expr(arg);
        }
        let narg = arguments.len();

        let resolved = self.lookup(name, location);
        let Some(entry) = resolved else {
            for _ in 0..narg {
                self.attrs.pop();
            }
            let err = self.propagate_error(location);
            self.attrs.push(err);
            return;
        };

        if entry.kind != SymbolKind::Function {
            self.diagnostics
                .push(location, format!("call of non-function symbol '{name}'"));
            for _ in 0..narg {
                self.attrs.pop();
            }
            let err = self.propagate_error(location);
            self.attrs.push(err);
            return;
        }

        let param_types: Vec<&str> = if entry.attribute.is_empty() {
            Vec::new()
        } else {
            entry.attribute.split(", ").collect()
        };

        if narg != param_types.len() {
            self.diagnostics
                .push(location, format!("too few/much arguments provided for function '{name}'"));
            for _ in 0..narg {
                self.attrs.pop();
            }
            let err = self.propagate_error(location);
            self.attrs.push(err);
            return;
        }

        let mut arg_entries = Vec::with_capacity(narg);
        for _ in 0..narg {
            arg_entries.push(self.attrs.pop());
        }
        arg_entries.reverse();

        let mut has_error = false;
        for (arg, param_ty) in arg_entries.iter().zip(param_types.iter()) {
            let compatible = arg.ty == *param_ty || (*param_ty == "real" && arg.ty == "integer");
            if !compatible {
                self.diagnostics.push(
                    arg.location,
                    format!("incompatible type passing '{}' to parameter of type '{param_ty}'", arg.ty),
                );
                has_error = true;
                break;
            }
        }

        let attribute = if has_error { "error".to_string() } else { String::new() };
        let result = self.propagate(location, entry.ty.clone(), attribute);
        self.attrs.push(result);
    }
}

/// A canonical type text denotes a scalar value (not an array, not `void`)
/// iff it parses back to a non-array `ValueType` whose scalar is one of the
/// four value-bearing primitives - the type model is the single source of
/// truth for this predicate.
fn is_scalar_type(ty: &str) -> bool {
    let value = ValueType::from_canonical(ty);
    !value.is_array() && value.scalar.is_scalar_value()
}

fn binary_result_type(op: &str, left: &str, right: &str) -> Option<String> {
    let numeric = |l: &str, r: &str| matches!((l, r), ("integer", "integer"));
    let arithmetic = |l: &str, r: &str| {
        matches!(
            (l, r),
            ("integer", "integer") | ("integer", "real") | ("real", "integer") | ("real", "real")
        )
    };
    match op {
        "+" | "-" | "*" | "/" => {
            if numeric(left, right) {
                Some("integer".to_string())
            } else if arithmetic(left, right) {
                Some("real".to_string())
            } else if op == "+" && left == "string" && right == "string" {
                Some("string".to_string())
            } else {
                None
            }
        }
        "mod" => numeric(left, right).then(|| "integer".to_string()),
        "and" | "or" => (left == "boolean" && right == "boolean").then(|| "boolean".to_string()),
        "<" | "<=" | "=" | "<>" | ">=" | ">" => arithmetic(left, right).then(|| "boolean".to_string()),
        _ => None,
    }
}

fn unary_result_type(op: &str, operand: &str) -> Option<String> {
    match op {
        "neg" => matches!(operand, "integer" | "real").then(|| operand.to_string()),
        "not" => (operand == "boolean").then(|| "boolean".to_string()),
        _ => None,
    }
}
