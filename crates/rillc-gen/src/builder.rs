//! Textual IR building blocks.
//!
//! [`FunctionBuilder`] accumulates labelled basic blocks and renders one
//! `define` when finished. Every identifier is quoted (`@"main"`,
//! `%"addtmp"`, `br label %"while_cond"`), so any name the front end
//! produces is valid IR text, and name requests that collide within a
//! function get dotted numeric suffixes (`addtmp`, `addtmp.1`,
//! `addtmp.2`, …). Block labels share the same per-function namespace as
//! value names.

use rillc_util::FxHashMap;

/// A value in the textual IR: an integer constant or a named register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Const(i64),
    Reg(String),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Const(value) => write!(f, "{}", value),
            Value::Reg(name) => write!(f, "%\"{}\"", name),
        }
    }
}

/// Handle to a basic block within one [`FunctionBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockId(usize);

/// Per-function name dispenser with dotted-suffix collision handling.
struct NameUniquifier {
    /// Maps a base name to the highest suffix handed out for it
    used: FxHashMap<String, u32>,
}

impl NameUniquifier {
    fn new() -> Self {
        Self {
            used: FxHashMap::default(),
        }
    }

    /// Returns `hint` if unused, otherwise `hint.N` for the lowest free N.
    fn uniquify(&mut self, hint: &str) -> String {
        if !self.used.contains_key(hint) {
            self.used.insert(hint.to_string(), 0);
            return hint.to_string();
        }
        let mut n = self.used[hint];
        loop {
            n += 1;
            let candidate = format!("{}.{}", hint, n);
            if !self.used.contains_key(&candidate) {
                self.used.insert(hint.to_string(), n);
                self.used.insert(candidate.clone(), 0);
                return candidate;
            }
        }
    }
}

struct BasicBlock {
    label: String,
    instrs: Vec<String>,
    terminated: bool,
}

/// Builds the textual body of one function definition.
///
/// Instructions are appended to the block the builder is positioned at;
/// exactly one terminator may be written per block, and the rendering
/// step asserts that every block received one.
pub struct FunctionBuilder {
    name: String,
    params: Vec<String>,
    blocks: Vec<BasicBlock>,
    current: usize,
    names: NameUniquifier,
}

impl FunctionBuilder {
    /// Starts a function; parameter names claim their registers first, so
    /// later allocas with the same hint get suffixed.
    pub fn new(name: &str, params: &[&str]) -> Self {
        let mut names = NameUniquifier::new();
        let params = params.iter().map(|p| names.uniquify(p)).collect();
        Self {
            name: name.to_string(),
            params,
            blocks: Vec::new(),
            current: 0,
            names,
        }
    }

    /// The register values of the function's parameters.
    pub fn param_values(&self) -> Vec<Value> {
        self.params.iter().cloned().map(Value::Reg).collect()
    }

    /// Appends a basic block, uniquifying the label hint.
    pub fn append_block(&mut self, hint: &str) -> BlockId {
        let label = self.names.uniquify(hint);
        self.blocks.push(BasicBlock {
            label,
            instrs: Vec::new(),
            terminated: false,
        });
        BlockId(self.blocks.len() - 1)
    }

    /// Moves the insertion point to the end of `block`.
    pub fn position_at_end(&mut self, block: BlockId) {
        self.current = block.0;
    }

    /// True if the current block already has its terminator.
    pub fn is_terminated(&self) -> bool {
        self.blocks[self.current].terminated
    }

    fn push(&mut self, instr: String) {
        let block = &mut self.blocks[self.current];
        debug_assert!(!block.terminated, "instruction after terminator");
        block.instrs.push(instr);
    }

    fn fresh(&mut self, hint: &str) -> String {
        self.names.uniquify(hint)
    }

    // =========================================================================
    // INSTRUCTIONS
    // =========================================================================

    /// `%"slot" = alloca i64`
    pub fn alloca(&mut self, hint: &str) -> Value {
        let name = self.fresh(hint);
        self.push(format!("%\"{}\" = alloca i64", name));
        Value::Reg(name)
    }

    /// `store i64 value, i64* slot`
    pub fn store(&mut self, value: &Value, slot: &Value) {
        self.push(format!("store i64 {}, i64* {}", value, slot));
    }

    /// `%"name" = load i64, i64* slot`
    pub fn load(&mut self, slot: &Value, hint: &str) -> Value {
        let name = self.fresh(hint);
        self.push(format!("%\"{}\" = load i64, i64* {}", name, slot));
        Value::Reg(name)
    }

    /// `%"name" = <opcode> i64 lhs, rhs` for add/sub/mul/sdiv/and/or
    pub fn binary(&mut self, opcode: &str, lhs: &Value, rhs: &Value, hint: &str) -> Value {
        let name = self.fresh(hint);
        self.push(format!("%\"{}\" = {} i64 {}, {}", name, opcode, lhs, rhs));
        Value::Reg(name)
    }

    /// `%"name" = icmp <cond> i64 lhs, rhs` - yields an i1
    pub fn icmp(&mut self, cond: &str, lhs: &Value, rhs: &Value, hint: &str) -> Value {
        let name = self.fresh(hint);
        self.push(format!("%\"{}\" = icmp {} i64 {}, {}", name, cond, lhs, rhs));
        Value::Reg(name)
    }

    /// `%"name" = zext i1 value to i64`
    pub fn zext(&mut self, value: &Value, hint: &str) -> Value {
        let name = self.fresh(hint);
        self.push(format!("%\"{}\" = zext i1 {} to i64", name, value));
        Value::Reg(name)
    }

    /// `%"name" = call i64 @"callee"(i64 a, i64 b, …)`
    pub fn call(&mut self, callee: &str, args: &[Value], hint: &str) -> Value {
        let name = self.fresh(hint);
        let rendered: Vec<String> = args.iter().map(|a| format!("i64 {}", a)).collect();
        self.push(format!(
            "%\"{}\" = call i64 @\"{}\"({})",
            name,
            callee,
            rendered.join(", ")
        ));
        Value::Reg(name)
    }

    // =========================================================================
    // TERMINATORS
    // =========================================================================

    /// `ret i64 value` - terminates the current block.
    pub fn ret(&mut self, value: &Value) {
        self.push(format!("ret i64 {}", value));
        self.blocks[self.current].terminated = true;
    }

    /// `br label %"target"` - terminates the current block.
    pub fn branch(&mut self, target: BlockId) {
        let label = self.blocks[target.0].label.clone();
        self.push(format!("br label %\"{}\"", label));
        self.blocks[self.current].terminated = true;
    }

    /// `br i1 cond, label %"then", label %"else"` - terminates the block.
    pub fn cond_branch(&mut self, cond: &Value, then_block: BlockId, else_block: BlockId) {
        let then_label = self.blocks[then_block.0].label.clone();
        let else_label = self.blocks[else_block.0].label.clone();
        self.push(format!(
            "br i1 {}, label %\"{}\", label %\"{}\"",
            cond, then_label, else_label
        ));
        self.blocks[self.current].terminated = true;
    }

    /// Renders the finished `define`.
    ///
    /// Every block must have been terminated; the code generator
    /// guarantees this by appending the implicit `ret i64 0` before
    /// calling here.
    pub fn finish(self) -> String {
        debug_assert!(
            self.blocks.iter().all(|b| b.terminated),
            "finish() with unterminated block"
        );

        let params: Vec<String> = self
            .params
            .iter()
            .map(|p| format!("i64 %\"{}\"", p))
            .collect();

        let mut out = format!("define i64 @\"{}\"({}) {{\n", self.name, params.join(", "));
        for block in &self.blocks {
            out.push_str(&block.label);
            out.push_str(":\n");
            for instr in &block.instrs {
                out.push_str("  ");
                out.push_str(instr);
                out.push('\n');
            }
        }
        out.push_str("}\n");
        out
    }
}
