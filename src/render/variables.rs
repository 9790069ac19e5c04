//! Context variables a template reads in conditions and loops.
//!
//! Tera fails on an undefined variable inside `{{ }}` but renders one inside
//! `{% if %}` as false. Scanning the parsed template for the names used in
//! `if` conditions and `for` containers lets the engine reject both the same
//! way, for builtin and custom templates alike.

use indexmap::IndexSet;
use tera::ast::{Expr, ExprVal, Node};

/// Top-level context names read by `if` conditions and `for` containers.
///
/// Loop variables, `set` names, and names guarded by an `is defined` style
/// test or passed through the `default` filter are left out.
pub fn condition_variables(nodes: &[Node]) -> IndexSet<String> {
    let mut scan = Scan::default();
    scan.nodes(nodes);
    scan.found
        .into_iter()
        .filter(|name| !scan.guarded.contains(name))
        .collect()
}

#[derive(Default)]
struct Scan {
    locals: Vec<String>,
    guarded: IndexSet<String>,
    found: IndexSet<String>,
}

impl Scan {
    fn nodes(&mut self, nodes: &[Node]) {
        for node in nodes {
            self.node(node);
        }
    }

    fn node(&mut self, node: &Node) {
        match node {
            Node::If(branches, _) => {
                for (_, condition, body) in &branches.conditions {
                    self.expr(condition);
                    self.nodes(body);
                }
                if let Some((_, body)) = &branches.otherwise {
                    self.nodes(body);
                }
            }
            Node::Forloop(_, forloop, _) => {
                self.expr(&forloop.container);

                let depth = self.locals.len();
                self.locals.push("loop".to_string());
                self.locals.push(forloop.value.clone());
                if let Some(key) = &forloop.key {
                    self.locals.push(key.clone());
                }
                self.nodes(&forloop.body);
                self.locals.truncate(depth);

                if let Some(body) = &forloop.empty_body {
                    self.nodes(body);
                }
            }
            Node::Set(_, set) => self.locals.push(set.key.clone()),
            Node::Block(_, block, _) => self.nodes(&block.body),
            Node::FilterSection(_, section, _) => self.nodes(&section.body),
            _ => {}
        }
    }

    fn expr(&mut self, expr: &Expr) {
        if expr.filters.iter().any(|filter| filter.name == "default") {
            return;
        }
        self.value(&expr.val);
    }

    fn value(&mut self, value: &ExprVal) {
        match value {
            ExprVal::Ident(ident) => {
                let name = root(ident);
                if !name.is_empty()
                    && !name.starts_with("__tera")
                    && !self.locals.iter().any(|local| local == name)
                {
                    self.found.insert(name.to_string());
                }
            }
            ExprVal::Test(test) => {
                self.guarded.insert(root(&test.ident).to_string());
            }
            ExprVal::Math(math) => {
                self.expr(&math.lhs);
                self.expr(&math.rhs);
            }
            ExprVal::Logic(logic) => {
                self.expr(&logic.lhs);
                self.expr(&logic.rhs);
            }
            ExprVal::In(within) => {
                self.expr(&within.lhs);
                self.expr(&within.rhs);
            }
            ExprVal::Array(items) => {
                for item in items {
                    self.expr(item);
                }
            }
            ExprVal::StringConcat(concat) => {
                for part in &concat.values {
                    self.value(part);
                }
            }
            ExprVal::FunctionCall(call) => {
                for arg in call.args.values() {
                    self.expr(arg);
                }
            }
            _ => {}
        }
    }
}

/// `field` for `field.name` or `items[0]`
fn root(ident: &str) -> &str {
    ident.split(['.', '[']).next().unwrap_or(ident)
}
