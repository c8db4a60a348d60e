use crate::ast::Comparator;

/// Abstract Syntax Tree node representing a parsed JMESPath expression.
///
/// Nodes are immutable once the parser has built them. Projection nodes
/// ([`Node::ArrayProjection`], [`Node::ObjectProjection`], [`Node::Filter`])
/// carry an optional right-hand continuation that is applied to each element
/// rather than to the collection as a whole.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    // References
    /// Current node (`@`)
    Current,

    /// Root document (`$`)
    Root,

    /// Variable bound by `let` (`$name`)
    VariableRef(String),

    // Access
    /// Field lookup on the current value
    ///
    /// # Examples
    /// ```text
    /// foo
    /// "with space"
    /// ```
    Identifier(String),

    /// Array element on the current value; negative indices count from the end
    ///
    /// # Example
    /// ```text
    /// [0]
    /// [-1]
    /// ```
    Index(i64),

    /// Array slice on the current value
    ///
    /// Only ever appears as the left side of an [`Node::ArrayProjection`].
    Slice(Slice),

    /// Evaluates `right` with the result of `left` as the current value
    ///
    /// # Example
    /// ```text
    /// foo.bar
    /// foo[0]
    /// ```
    Subexpression { left: Box<Node>, right: Box<Node> },

    /// Removes one level of array nesting from the result of the inner node
    Flatten(Box<Node>),

    // Projections
    /// Applies `right` to each element of the array produced by `left`
    ///
    /// # Examples
    /// ```text
    /// foo[*].bar
    /// foo[1:3].bar
    /// foo[].bar
    /// ```
    ArrayProjection {
        left: Box<Node>,
        right: Option<Box<Node>>,
    },

    /// Applies `right` to each value of the object produced by `left`
    ///
    /// # Example
    /// ```text
    /// foo.*.bar
    /// ```
    ObjectProjection {
        left: Box<Node>,
        right: Option<Box<Node>>,
    },

    /// Keeps the elements for which `condition` is truthy, then applies `right`
    ///
    /// # Example
    /// ```text
    /// foo[?age > `30`].name
    /// ```
    Filter {
        left: Box<Node>,
        condition: Box<Node>,
        right: Option<Box<Node>>,
    },

    // Operators
    /// `left | right`; the right side sees a plain, non-projected value
    Pipe { left: Box<Node>, right: Box<Node> },

    /// `left || right`
    Or { left: Box<Node>, right: Box<Node> },

    /// `left && right`
    And { left: Box<Node>, right: Box<Node> },

    /// `!expr`
    Not(Box<Node>),

    /// `left <op> right`
    Comparison {
        op: Comparator,
        left: Box<Node>,
        right: Box<Node>,
    },

    // Constructors
    /// `[a, b, ...]`
    MultiSelectList(Vec<Node>),

    /// `{key: a, ...}`, in declared key order
    MultiSelectHash(Vec<KeyValue>),

    /// Function call; names are resolved at evaluation time
    ///
    /// # Example
    /// ```text
    /// sort_by(people, &age)
    /// ```
    FunctionCall { name: String, args: Vec<Node> },

    /// Unevaluated expression passed to a function (`&expr`)
    ExpressionRef(Box<Node>),

    // Literals
    /// JSON text from a backtick literal, parsed by the value model
    Literal(String),

    /// Raw string literal, already unescaped
    RawString(String),

    /// `let $a = e1, $b = e2 in body`
    Let {
        bindings: Vec<Binding>,
        body: Box<Node>,
    },
}

/// Slice bounds as written; `None` means "use the default for this step".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Slice {
    pub start: Option<i64>,
    pub stop: Option<i64>,
    pub step: Option<i64>,
}

/// One entry of a multi-select hash.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyValue {
    pub key: String,
    pub value: Node,
}

/// One `$name = expr` binding of a `let` expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: String,
    pub value: Node,
}

impl Node {
    /// Whether subsequent `.`, `[` and `[?` fragments extend this node's
    /// right-hand side instead of applying to its result.
    pub fn is_projection(&self) -> bool {
        matches!(
            self,
            Node::ArrayProjection { .. } | Node::ObjectProjection { .. } | Node::Filter { .. }
        )
    }

    pub(crate) fn subexpression(left: Node, right: Node) -> Node {
        Node::Subexpression {
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}
