use super::{Primary, SymExpr};

/// An iterator that traverses the tree of expressions in left-to-right post-order (i.e.
/// children before their parent).
///
/// This iterator is created by [`SymExpr::post_order_iter`].
pub struct ExprIter<'a> {
    /// Pending nodes, paired with whether their children were already pushed.
    stack: Vec<(&'a SymExpr, bool)>,
}

impl<'a> ExprIter<'a> {
    /// Creates a new iterator rooted at `expr`.
    pub fn new(expr: &'a SymExpr) -> Self {
        Self { stack: vec![(expr, false)] }
    }

    /// Pushes the children of `expr` so that the leftmost one is popped first.
    fn push_children(&mut self, expr: &'a SymExpr) {
        match expr {
            SymExpr::Primary(Primary::Call(_, args)) => {
                self.stack.extend(args.iter().rev().map(|arg| (arg, false)));
            },
            SymExpr::Primary(_) => {},
            SymExpr::Add(children) | SymExpr::Mul(children) => {
                self.stack.extend(children.iter().rev().map(|child| (child, false)));
            },
            SymExpr::Exp(base, exp) => {
                self.stack.push((exp, false));
                self.stack.push((base, false));
            },
        }
    }
}

impl<'a> Iterator for ExprIter<'a> {
    type Item = &'a SymExpr;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (expr, expanded) = self.stack.pop()?;
            if expanded || matches!(expr, SymExpr::Primary(Primary::Integer(_) | Primary::Symbol(_))) {
                return Some(expr);
            }

            self.stack.push((expr, true));
            self.push_children(expr);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn visits_children_first() {
        // x^2 + 3
        let expr = SymExpr::symbol("x").pow(SymExpr::int(2)) + SymExpr::int(3);
        let visited = expr.post_order_iter().map(|e| e.to_string()).collect::<Vec<_>>();
        assert_eq!(visited, vec!["x", "2", "x^2", "3", "x^2 + 3"]);
    }

    #[test]
    fn visits_call_arguments() {
        // sin(2 * x)
        let expr = SymExpr::call("sin", vec![SymExpr::int(2) * SymExpr::symbol("x")]);
        let visited = expr.post_order_iter().map(|e| e.to_string()).collect::<Vec<_>>();
        assert_eq!(visited, vec!["2", "x", "2 * x", "sin(2 * x)"]);
    }
}
