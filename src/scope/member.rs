//! Symbols stored in a scope.

use std::fmt;

/// One parameter of an overload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Parameter {
    pub name: Option<String>,
    /// Accepts any number of trailing arguments.
    pub vararg: bool,
}

impl Parameter {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            vararg: false,
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn vararg() -> Self {
        Self {
            name: None,
            vararg: true,
        }
    }
}

/// A callable signature.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Overload {
    pub parameters: Vec<Parameter>,
}

impl Overload {
    pub fn new(parameters: Vec<Parameter>) -> Self {
        Self { parameters }
    }

    /// An overload of `n` anonymous fixed parameters.
    pub fn arity(n: usize) -> Self {
        Self::new(vec![Parameter::anonymous(); n])
    }

    /// `fixed` anonymous parameters followed by a vararg.
    pub fn variadic(fixed: usize) -> Self {
        let mut parameters = vec![Parameter::anonymous(); fixed];
        parameters.push(Parameter::vararg());
        Self::new(parameters)
    }

    pub fn is_vararg(&self) -> bool {
        self.parameters.iter().any(|p| p.vararg)
    }

    /// Number of parameters that are not varargs.
    pub fn fixed_count(&self) -> usize {
        self.parameters.iter().filter(|p| !p.vararg).count()
    }

    /// Whether a call with `size` arguments matches this overload.
    pub fn is_applicable(&self, size: usize) -> bool {
        if self.is_vararg() {
            size >= self.fixed_count()
        } else {
            size == self.parameters.len()
        }
    }
}

impl fmt::Display for Overload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_vararg() {
            write!(f, "{}+", self.fixed_count())
        } else {
            write!(f, "{}", self.parameters.len())
        }
    }
}

/// A symbol bound in a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeMember {
    Variable {
        name: String,
    },
    Constant {
        name: String,
    },
    Function {
        name: String,
        overloads: Vec<Overload>,
        /// Provided by a library rather than declared in the program.
        library: bool,
    },
    Struct {
        name: String,
        constructor: Overload,
    },
}

impl ScopeMember {
    /// Name as emitted in generated code.
    pub fn name(&self) -> &str {
        match self {
            ScopeMember::Variable { name }
            | ScopeMember::Constant { name }
            | ScopeMember::Function { name, .. }
            | ScopeMember::Struct { name, .. } => name,
        }
    }

    /// Short description of the member kind, for messages.
    pub fn describe(&self) -> &'static str {
        match self {
            ScopeMember::Variable { .. } => "variable",
            ScopeMember::Constant { .. } => "constant",
            ScopeMember::Function { .. } => "function",
            ScopeMember::Struct { .. } => "struct",
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, ScopeMember::Function { .. })
    }

    pub fn is_struct(&self) -> bool {
        matches!(self, ScopeMember::Struct { .. })
    }

    /// Overloads a call is checked against: a function's overloads or a
    /// struct's constructor. Empty for variables and constants.
    pub fn overloads(&self) -> &[Overload] {
        match self {
            ScopeMember::Function { overloads, .. } => overloads,
            ScopeMember::Struct { constructor, .. } => std::slice::from_ref(constructor),
            _ => &[],
        }
    }

    /// Whether any overload accepts `size` arguments.
    pub fn is_applicable(&self, size: usize) -> bool {
        self.overloads().iter().any(|o| o.is_applicable(size))
    }

    /// Comma-separated accepted argument counts, e.g. `1, 3` or `1+`.
    pub fn expected_arities(&self) -> String {
        self.overloads()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
