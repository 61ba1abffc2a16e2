//! Syntax tree arena.
//!
//! Nodes live in a single `Vec` and refer to each other through `NodeId`
//! indices. Children are created before their parents; parent links are
//! fixed up when the composite node is added. The node shapes the analyzers
//! care about are modeled as one tagged variant (`NodeKind`) and consumers
//! dispatch by pattern match.

use smallvec::SmallVec;

use mysqlint_common::{Diagnostic, LineMap, LineRange, Span};

/// Index of a node in the tree arena. `NodeId::NONE` is the absent-node
/// sentinel (e.g. a record field without a default value).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[must_use]
    pub const fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// Literal token classification for `BasicLiteral` nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LiteralKind {
    Int,
    Decimal,
    Str,
    Bool,
    Template,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Minus,
    Plus,
    Not,
}

impl UnaryOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Minus => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "!",
        }
    }
}

/// Tagged variant over every node shape in the supported grammar.
#[derive(Clone, Debug)]
pub enum NodeKind {
    // Module structure
    ModulePart {
        imports: Vec<NodeId>,
        members: Vec<NodeId>,
    },
    ImportDecl {
        org: String,
        module: String,
        prefix: Option<String>,
    },
    TypeDefinition {
        name: String,
        descriptor: NodeId,
    },
    FunctionDef {
        name: String,
        body: Vec<NodeId>,
    },

    // Type descriptors
    RecordTypeDesc {
        fields: SmallVec<[NodeId; 8]>,
    },
    RecordField {
        type_desc: NodeId,
        name: String,
        default_value: NodeId,
    },
    UnionTypeDesc {
        members: SmallVec<[NodeId; 2]>,
    },
    OptionalTypeDesc {
        inner: NodeId,
    },
    /// A named type with type arguments (`stream<Row, error?>`); the
    /// arguments are not tracked, only the head name.
    ParameterizedTypeDesc {
        name: String,
    },

    // Statements
    VariableDecl {
        type_desc: NodeId,
        name: String,
        initializer: NodeId,
    },
    WildcardAssign {
        value: NodeId,
    },
    ExprStatement {
        expr: NodeId,
    },

    // Expressions
    SimpleNameRef {
        name: String,
    },
    QualifiedNameRef {
        prefix: String,
        name: String,
    },
    BasicLiteral {
        literal: LiteralKind,
        text: String,
    },
    UnaryExpr {
        op: UnaryOp,
        operand: NodeId,
    },
    MappingConstructor {
        fields: SmallVec<[NodeId; 8]>,
    },
    SpecificField {
        name: String,
        value: NodeId,
    },
    SpreadField {
        value: NodeId,
    },
    ImplicitNew {
        args: SmallVec<[NodeId; 8]>,
    },
    ExplicitNew {
        type_ref: NodeId,
        args: SmallVec<[NodeId; 8]>,
    },
    PositionalArg {
        expr: NodeId,
    },
    NamedArg {
        name: String,
        expr: NodeId,
    },
    RemoteCall {
        target: NodeId,
        method: String,
        args: SmallVec<[NodeId; 4]>,
    },
    FunctionCall {
        callee: NodeId,
        args: SmallVec<[NodeId; 8]>,
    },
    FieldAccess {
        base: NodeId,
        field: String,
    },
    CheckExpr {
        inner: NodeId,
    },
}

impl NodeKind {
    /// Children in syntax order, skipping absent slots.
    pub(crate) fn children(&self) -> SmallVec<[NodeId; 8]> {
        let mut out: SmallVec<[NodeId; 8]> = SmallVec::new();
        let mut push = |id: NodeId| {
            if id.is_some() {
                out.push(id);
            }
        };
        match self {
            NodeKind::ModulePart { imports, members } => {
                imports.iter().copied().for_each(&mut push);
                members.iter().copied().for_each(&mut push);
            }
            NodeKind::TypeDefinition { descriptor, .. } => push(*descriptor),
            NodeKind::FunctionDef { body, .. } => body.iter().copied().for_each(&mut push),
            NodeKind::RecordTypeDesc { fields } => fields.iter().copied().for_each(&mut push),
            NodeKind::RecordField {
                type_desc,
                default_value,
                ..
            } => {
                push(*type_desc);
                push(*default_value);
            }
            NodeKind::UnionTypeDesc { members } => members.iter().copied().for_each(&mut push),
            NodeKind::OptionalTypeDesc { inner } => push(*inner),
            NodeKind::VariableDecl {
                type_desc,
                initializer,
                ..
            } => {
                push(*type_desc);
                push(*initializer);
            }
            NodeKind::WildcardAssign { value } => push(*value),
            NodeKind::ExprStatement { expr } => push(*expr),
            NodeKind::UnaryExpr { operand, .. } => push(*operand),
            NodeKind::MappingConstructor { fields } => fields.iter().copied().for_each(&mut push),
            NodeKind::SpecificField { value, .. } => push(*value),
            NodeKind::SpreadField { value } => push(*value),
            NodeKind::ImplicitNew { args } => args.iter().copied().for_each(&mut push),
            NodeKind::ExplicitNew { type_ref, args } => {
                push(*type_ref);
                args.iter().copied().for_each(&mut push);
            }
            NodeKind::PositionalArg { expr } => push(*expr),
            NodeKind::NamedArg { expr, .. } => push(*expr),
            NodeKind::RemoteCall { target, args, .. } => {
                push(*target);
                args.iter().copied().for_each(&mut push);
            }
            NodeKind::FunctionCall { callee, args } => {
                push(*callee);
                args.iter().copied().for_each(&mut push);
            }
            NodeKind::FieldAccess { base, .. } => push(*base),
            NodeKind::CheckExpr { inner } => push(*inner),
            NodeKind::ImportDecl { .. }
            | NodeKind::ParameterizedTypeDesc { .. }
            | NodeKind::SimpleNameRef { .. }
            | NodeKind::QualifiedNameRef { .. }
            | NodeKind::BasicLiteral { .. } => {}
        }
        out
    }
}

/// A node: shape, source span, and parent link.
#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub parent: NodeId,
}

/// The per-file syntax tree: node arena, source text, line map, and the
/// diagnostics produced while parsing.
#[derive(Debug)]
pub struct SyntaxTree {
    file_name: String,
    source: String,
    line_map: LineMap,
    nodes: Vec<Node>,
    root: NodeId,
    diagnostics: Vec<Diagnostic>,
}

impl SyntaxTree {
    #[must_use]
    pub fn new(file_name: impl Into<String>, source: impl Into<String>) -> Self {
        let source = source.into();
        let line_map = LineMap::new(&source);
        Self {
            file_name: file_name.into(),
            source,
            line_map,
            nodes: Vec::new(),
            root: NodeId::NONE,
            diagnostics: Vec::new(),
        }
    }

    /// Add a node, wiring parent links of its children to the new node.
    pub fn add_node(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        for child in kind.children() {
            if let Some(node) = self.nodes.get_mut(child.0 as usize) {
                node.parent = id;
            }
        }
        self.nodes.push(Node {
            kind,
            span,
            parent: NodeId::NONE,
        });
        id
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_none() {
            None
        } else {
            self.nodes.get(id.0 as usize)
        }
    }

    #[must_use]
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.get(id).map(|node| &node.kind)
    }

    #[must_use]
    pub fn span(&self, id: NodeId) -> Span {
        self.get(id).map(|node| node.span).unwrap_or_default()
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> NodeId {
        self.get(id).map_or(NodeId::NONE, |node| node.parent)
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = root;
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn text(&self, span: Span) -> &str {
        &self.source[span.start as usize..span.end as usize]
    }

    #[must_use]
    pub fn line_map(&self) -> &LineMap {
        &self.line_map
    }

    #[must_use]
    pub fn line_range(&self, id: NodeId) -> LineRange {
        self.line_map.line_range(self.span(id))
    }

    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Diagnostics produced while parsing this tree.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Preorder (source-order) walk from the root.
    #[must_use]
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = Vec::new();
        if self.root.is_some() {
            stack.push(self.root);
        }
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(node) = self.get(id) {
                let children = node.kind.children();
                for &child in children.iter().rev() {
                    stack.push(child);
                }
            }
        }
        out
    }

    /// Arguments of a construction expression, in source order.
    #[must_use]
    pub fn constructor_args(&self, id: NodeId) -> Option<&[NodeId]> {
        match self.kind(id)? {
            NodeKind::ImplicitNew { args } | NodeKind::ExplicitNew { args, .. } => Some(args),
            _ => None,
        }
    }

    /// Fields of a mapping constructor, in source order.
    #[must_use]
    pub fn mapping_fields(&self, id: NodeId) -> Option<&[NodeId]> {
        match self.kind(id)? {
            NodeKind::MappingConstructor { fields } => Some(fields),
            _ => None,
        }
    }
}
