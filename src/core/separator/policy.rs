//! Per-command argument policies.
//!
//! A policy says which bracket groups may follow a command head and whether
//! each group holds prose (`Analyze`) or syntax (`Ignore`). Lookup is total:
//! commands missing from the table get the table's fallback policy.

use fxhash::FxHashMap;
use lazy_static::lazy_static;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bracket {
    /// `{ }`
    Brace,
    /// `[ ]`
    Square,
    /// `( )`
    Paren,
}

impl Bracket {
    pub fn open(self) -> char {
        match self {
            Bracket::Brace => '{',
            Bracket::Square => '[',
            Bracket::Paren => '(',
        }
    }

    pub fn close(self) -> char {
        match self {
            Bracket::Brace => '}',
            Bracket::Square => ']',
            Bracket::Paren => ')',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotRole {
    Ignore,
    Analyze,
}

/// One optional argument position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArgSlot {
    role: SlotRole,
    bracket: Bracket,
}

impl ArgSlot {
    /// A `{}` argument whose interior is prose. Only brace groups can be
    /// analyzed, since nested parsing closes on `}`.
    pub const fn analyze() -> Self {
        ArgSlot {
            role: SlotRole::Analyze,
            bracket: Bracket::Brace,
        }
    }

    pub const fn ignore(bracket: Bracket) -> Self {
        ArgSlot {
            role: SlotRole::Ignore,
            bracket,
        }
    }

    pub fn role(&self) -> SlotRole {
        self.role
    }

    pub fn bracket(&self) -> Bracket {
        self.bracket
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentPolicy {
    slots: Vec<ArgSlot>,
    /// Swallow further `{...}` groups glued to the consumed run
    absorb_trailing_groups: bool,
}

impl Default for ArgumentPolicy {
    /// First `{}` is prose, nothing else expected
    fn default() -> Self {
        Self::new(vec![ArgSlot::analyze()])
    }
}

impl ArgumentPolicy {
    pub fn new(slots: Vec<ArgSlot>) -> Self {
        Self {
            slots,
            absorb_trailing_groups: false,
        }
    }

    /// No arguments at all
    pub fn bare() -> Self {
        Self::new(Vec::new())
    }

    /// Optional `[options]`, `(label)` and `{content}`, all syntax, plus any
    /// adjacent trailing brace groups
    pub fn opaque() -> Self {
        Self {
            slots: vec![
                ArgSlot::ignore(Bracket::Square),
                ArgSlot::ignore(Bracket::Paren),
                ArgSlot::ignore(Bracket::Brace),
            ],
            absorb_trailing_groups: true,
        }
    }

    pub fn slots(&self) -> &[ArgSlot] {
        &self.slots
    }

    pub fn absorbs_trailing_groups(&self) -> bool {
        self.absorb_trailing_groups
    }
}

/// Command name → policy, total through the fallback
#[derive(Debug, Clone)]
pub struct PolicyTable {
    entries: FxHashMap<String, ArgumentPolicy>,
    fallback: ArgumentPolicy,
}

/// Prose wrappers whose first `{}` is read as text
const CONTENT_COMMANDS: &[&str] = &[
    "textbf",
    "textit",
    "textsl",
    "textsc",
    "texttt",
    "textup",
    "textmd",
    "textrm",
    "emph",
    "underline",
    "hl",
    "comadreja",
    "footnote",
    "notaparaelautor",
];

impl PolicyTable {
    pub fn new(fallback: ArgumentPolicy) -> Self {
        Self {
            entries: FxHashMap::default(),
            fallback,
        }
    }

    /// The built-in table used by the review pipeline
    pub fn builtin() -> Self {
        let mut table = Self::new(ArgumentPolicy::opaque());

        // \comment{text}{note}
        table.register(
            "comment",
            ArgumentPolicy::new(vec![ArgSlot::analyze(), ArgSlot::ignore(Bracket::Brace)]),
        );
        // \textcolor[model]{color}{text}
        let colored = ArgumentPolicy::new(vec![
            ArgSlot::ignore(Bracket::Square),
            ArgSlot::ignore(Bracket::Brace),
            ArgSlot::analyze(),
        ]);
        table.register("textcolor", colored.clone());
        table.register("colorbox", colored);

        for name in CONTENT_COMMANDS {
            table.register(*name, ArgumentPolicy::default());
        }

        let environment_marker = ArgumentPolicy::new(vec![ArgSlot::ignore(Bracket::Brace)]);
        table.register("begin", environment_marker.clone());
        table.register("end", environment_marker);

        // \\[2pt]
        table.register("\\", ArgumentPolicy::new(vec![ArgSlot::ignore(Bracket::Square)]));
        table
    }

    pub fn register(&mut self, name: impl Into<String>, policy: ArgumentPolicy) {
        self.entries.insert(name.into(), policy);
    }

    pub fn fallback(&self) -> &ArgumentPolicy {
        &self.fallback
    }

    /// Policy for `name` (without backslash or star)
    pub fn resolve(&self, name: &str) -> &ArgumentPolicy {
        if let Some(policy) = self.entries.get(name) {
            return policy;
        }
        if is_control_symbol(name) {
            return &CONTROL_SYMBOL_POLICY;
        }
        &self.fallback
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn is_control_symbol(name: &str) -> bool {
    let mut chars = name.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if !c.is_ascii_alphabetic() && c != '@')
}

lazy_static! {
    static ref CONTROL_SYMBOL_POLICY: ArgumentPolicy = ArgumentPolicy::bare();

    /// Shared built-in table
    pub static ref DEFAULT_POLICY_TABLE: PolicyTable = PolicyTable::builtin();
}
