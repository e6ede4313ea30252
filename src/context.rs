//! Context stack
//!
//! Tracks enclosing declarations/constructs so declarations can be
//! reclassified (parameter vs. variable vs. loop variable) and statements
//! validated (assignment to a loop variable, return legality) without
//! threading an explicit parameter through every recursive call.

/// One enclosing construct. Functions additionally carry their return
/// type, since `return` legality and type-compatibility both need it.
#[derive(Debug, Clone)]
pub enum Context {
    Program,
    Function { return_type: String },
    CompoundStatement,
    ForLoop,
}

#[derive(Debug, Default)]
pub struct ContextStack {
    stack: Vec<Context>,
}

impl ContextStack {
    pub fn new() -> Self {
        ContextStack::default()
    }

    pub fn push(&mut self, ctx: Context) {
        self.stack.push(ctx);
    }

    pub fn pop(&mut self) {
        self.stack.pop();
    }

    pub fn innermost(&self) -> Option<&Context> {
        self.stack.last()
    }

    /// The innermost enclosing function context whose return type is not
    /// `void`, used by `return` legality checking.
    pub fn innermost_value_returning_function(&self) -> Option<&str> {
        self.stack.iter().rev().find_map(|c| match c {
            Context::Function { return_type } if return_type != "void" => {
                Some(return_type.as_str())
            }
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn innermost_reflects_last_push() {
        let mut stack = ContextStack::new();
        stack.push(Context::Program);
        stack.push(Context::ForLoop);
        assert!(matches!(stack.innermost(), Some(Context::ForLoop)));
        stack.pop();
        assert!(matches!(stack.innermost(), Some(Context::Program)));
    }

    #[test]
    fn finds_nearest_value_returning_function_skipping_void_ones() {
        let mut stack = ContextStack::new();
        stack.push(Context::Function {
            return_type: "integer".to_string(),
        });
        stack.push(Context::CompoundStatement);
        stack.push(Context::Function {
            return_type: "void".to_string(),
        });
        stack.push(Context::CompoundStatement);

        assert_eq!(stack.innermost_value_returning_function(), Some("integer"));
    }

    #[test]
    fn no_value_returning_function_returns_none() {
        let mut stack = ContextStack::new();
        stack.push(Context::Program);
        stack.push(Context::Function {
            return_type: "void".to_string(),
        });
        assert_eq!(stack.innermost_value_returning_function(), None);
    }
}
