//! minits_diagnostics: Diagnostic records produced by the checker.
//!
//! Diagnostics are plain data. The checker appends them to a sink and keeps
//! going; formatting and output are the sink's business.

use minits_core::text::{LineMap, TextSpan};
use std::fmt;

/// Diagnostic category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Error => write!(f, "error"),
            DiagnosticCategory::Suggestion => write!(f, "suggestion"),
        }
    }
}

/// What went wrong, independent of message wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// The source type is not assignable to the target type.
    IncompatibleAssignment,
    /// A required member of the target is absent from the source.
    MissingRequiredMember,
    /// Tuple length mismatch.
    ExcessDiscriminant,
    /// Member access on a value that may still be `undefined` or `null`.
    UseBeforeNarrowing,
    /// Member access on a name the type does not have.
    UnknownMember,
    /// A fresh object literal names a property the target does not declare.
    ExcessProperty,
    /// Write to a readonly property.
    ReadonlyAssignment,
    /// Wrong number of call arguments.
    ArgumentCountMismatch,
    /// A required parameter follows an optional one.
    RequiredAfterOptional,
    /// An identifier or type name does not resolve.
    CannotFindName,
    /// Call on a value that has no call signature.
    NotCallable,
    /// A parameter has no type and no contextual type.
    ImplicitAny,
    /// A type refers to itself while it is being resolved.
    CircularReference,
}

/// A message template: code, category, kind and text with `{0}`-style holes.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub kind: DiagnosticKind,
    pub message: &'static str,
}

/// A realized diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message_text: String,
    /// Where in the source the problem is, if the node had a span.
    pub span: Option<TextSpan>,
    /// Elaborations, outermost first.
    pub related_information: Vec<Diagnostic>,
}

impl Diagnostic {
    pub fn new(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            kind: message.kind,
            code: message.code,
            category: message.category,
            message_text: format_message(message.message, args),
            span: None,
            related_information: Vec::new(),
        }
    }

    pub fn with_span(span: TextSpan, message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            span: Some(span),
            ..Self::new(message, args)
        }
    }

    pub fn with_related(mut self, related: Diagnostic) -> Self {
        self.related_information.push(related);
        self
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }

    /// The message followed by every elaboration, one per line, indented.
    pub fn message_chain(&self) -> String {
        let mut out = self.message_text.clone();
        let mut depth = 1;
        let mut stack: Vec<&Diagnostic> = self.related_information.iter().collect();
        while !stack.is_empty() {
            let next = stack.remove(0);
            out.push('\n');
            out.push_str(&"  ".repeat(depth));
            out.push_str(&next.message_text);
            depth += 1;
            stack.extend(next.related_information.iter());
        }
        out
    }

    /// Render as `file(line,column): error TS0000: message`, with 1-based
    /// positions, followed by the elaboration chain.
    pub fn render(&self, file_name: &str, lines: &LineMap) -> String {
        let location = match self.span {
            Some(span) => {
                let at = lines.line_and_column_of(span.start);
                format!("{}({},{})", file_name, at.line + 1, at.column + 1)
            }
            None => file_name.to_string(),
        };
        let chain = self.message_chain();
        format!("{}: {} TS{}: {}", location, self.category, self.code, chain)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(span) = self.span {
            write!(f, "({}): ", span.start)?;
        }
        write!(f, "{} TS{}: {}", self.category, self.code, self.message_text)
    }
}

/// Replace `{0}`, `{1}`, ... in a template with the given arguments.
///
/// The template is scanned once, so braces inside an argument are copied
/// as they are. A hole without a matching argument is kept.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let hole = after
            .find('}')
            .and_then(|close| Some((after[..close].parse::<usize>().ok()?, close)));
        match hole.and_then(|(index, close)| Some((args.get(index)?, close))) {
            Some((arg, close)) => {
                result.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                result.push('{');
                rest = after;
            }
        }
    }
    result.push_str(rest);
    result
}

/// Receiver of the ordered diagnostic stream.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Diagnostics accumulated during one checking pass, in report order.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    /// Number of diagnostics of the given kind.
    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn extend(&mut self, other: DiagnosticCollection) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Forward everything to another sink, preserving order.
    pub fn drain_into(&mut self, sink: &mut dyn DiagnosticSink) {
        for diagnostic in self.diagnostics.drain(..) {
            sink.report(diagnostic);
        }
    }

    /// Sort by source position; diagnostics without a span go first.
    pub fn sort(&mut self) {
        self.diagnostics
            .sort_by_key(|d| d.span.map(|s| s.start as i64).unwrap_or(-1));
    }
}

impl DiagnosticSink for DiagnosticCollection {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.add(diagnostic);
    }
}

// ============================================================================
// Diagnostic messages, numbered after the source language's compiler codes
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Error, $kind:ident, $msg:expr) => {
            DiagnosticMessage {
                code: $code,
                category: DiagnosticCategory::Error,
                kind: DiagnosticKind::$kind,
                message: $msg,
            }
        };
    }

    // ========================================================================
    // Declarations (1000-1999)
    // ========================================================================
    pub const A_REQUIRED_PARAMETER_CANNOT_FOLLOW_AN_OPTIONAL_PARAMETER: DiagnosticMessage = diag!(1016, Error, RequiredAfterOptional, "A required parameter cannot follow an optional parameter.");

    // ========================================================================
    // Semantic errors (2000-2999)
    // ========================================================================
    pub const CANNOT_FIND_NAME_0: DiagnosticMessage = diag!(2304, Error, CannotFindName, "Cannot find name '{0}'.");
    pub const TYPE_0_IS_NOT_ASSIGNABLE_TO_TYPE_1: DiagnosticMessage = diag!(2322, Error, IncompatibleAssignment, "Type '{0}' is not assignable to type '{1}'.");
    pub const PROPERTY_0_DOES_NOT_EXIST_ON_TYPE_1: DiagnosticMessage = diag!(2339, Error, UnknownMember, "Property '{0}' does not exist on type '{1}'.");
    pub const ARGUMENT_OF_TYPE_0_IS_NOT_ASSIGNABLE_TO_PARAMETER_OF_TYPE_1: DiagnosticMessage = diag!(2345, Error, IncompatibleAssignment, "Argument of type '{0}' is not assignable to parameter of type '{1}'.");
    pub const THIS_EXPRESSION_IS_NOT_CALLABLE: DiagnosticMessage = diag!(2349, Error, NotCallable, "This expression is not callable. Type '{0}' has no call signatures.");
    pub const THIS_EXPRESSION_IS_NOT_CONSTRUCTABLE: DiagnosticMessage = diag!(2351, Error, NotCallable, "This expression is not constructable. Type '{0}' has no construct signatures.");
    pub const OBJECT_LITERAL_MAY_ONLY_SPECIFY_KNOWN_PROPERTIES: DiagnosticMessage = diag!(2353, Error, ExcessProperty, "Object literal may only specify known properties, and '{0}' does not exist in type '{1}'.");
    pub const TYPE_0_RECURSIVELY_REFERENCES_ITSELF_AS_A_BASE_TYPE: DiagnosticMessage = diag!(2310, Error, CircularReference, "Type '{0}' recursively references itself as a base type.");
    pub const TYPE_ALIAS_0_CIRCULARLY_REFERENCES_ITSELF: DiagnosticMessage = diag!(2456, Error, CircularReference, "Type alias '{0}' circularly references itself.");
    pub const TUPLE_TYPE_0_OF_LENGTH_1_HAS_NO_ELEMENT_AT_INDEX_2: DiagnosticMessage = diag!(2493, Error, UnknownMember, "Tuple type '{0}' of length '{1}' has no element at index '{2}'.");
    pub const CANNOT_ASSIGN_TO_0_BECAUSE_IT_IS_A_READ_ONLY_PROPERTY: DiagnosticMessage = diag!(2540, Error, ReadonlyAssignment, "Cannot assign to '{0}' because it is a read-only property.");
    pub const CANNOT_ASSIGN_TO_0_BECAUSE_IT_IS_A_CONSTANT: DiagnosticMessage = diag!(2588, Error, ReadonlyAssignment, "Cannot assign to '{0}' because it is a constant.");
    pub const EXPECTED_0_ARGUMENTS_BUT_GOT_1: DiagnosticMessage = diag!(2554, Error, ArgumentCountMismatch, "Expected {0} arguments, but got {1}.");
    pub const EXPECTED_0_1_ARGUMENTS_BUT_GOT_2: DiagnosticMessage = diag!(2554, Error, ArgumentCountMismatch, "Expected {0}-{1} arguments, but got {2}.");
    pub const EXPECTED_AT_LEAST_0_ARGUMENTS_BUT_GOT_1: DiagnosticMessage = diag!(2555, Error, ArgumentCountMismatch, "Expected at least {0} arguments, but got {1}.");
    pub const PROPERTY_0_IS_MISSING_IN_TYPE_1_BUT_REQUIRED_IN_TYPE_2: DiagnosticMessage = diag!(2741, Error, MissingRequiredMember, "Property '{0}' is missing in type '{1}' but required in type '{2}'.");
    pub const SOURCE_HAS_0_ELEMENTS_BUT_TARGET_ALLOWS_ONLY_1: DiagnosticMessage = diag!(2322, Error, ExcessDiscriminant, "Type '{0}' is not assignable to type '{1}'. Source has {2} element(s) but target allows only {3}.");
    pub const SOURCE_HAS_0_ELEMENTS_BUT_TARGET_REQUIRES_1: DiagnosticMessage = diag!(2322, Error, ExcessDiscriminant, "Type '{0}' is not assignable to type '{1}'. Source has {2} element(s) but target requires {3}.");
    pub const SUBSEQUENT_PROPERTY_DECLARATIONS_MUST_HAVE_THE_SAME_TYPE: DiagnosticMessage = diag!(2717, Error, IncompatibleAssignment, "Subsequent property declarations must have the same type. Property '{0}' must be of type '{1}', but here has type '{2}'.");

    // ========================================================================
    // Elaborations attached as related information
    // ========================================================================
    pub const TYPES_OF_PROPERTY_0_ARE_INCOMPATIBLE: DiagnosticMessage = diag!(2326, Error, IncompatibleAssignment, "Types of property '{0}' are incompatible.");
    pub const TYPES_OF_PARAMETERS_0_AND_1_ARE_INCOMPATIBLE: DiagnosticMessage = diag!(2328, Error, IncompatibleAssignment, "Types of parameters '{0}' and '{1}' are incompatible.");
    pub const TYPE_AT_POSITION_0_IS_INCOMPATIBLE: DiagnosticMessage = diag!(2626, Error, IncompatibleAssignment, "Type at position {0} in source is not compatible with type at position {0} in target.");
    pub const RETURN_TYPES_ARE_INCOMPATIBLE: DiagnosticMessage = diag!(2322, Error, IncompatibleAssignment, "Return type '{0}' is not assignable to '{1}'.");
    pub const TARGET_REQUIRES_0_ELEMENTS_BUT_SOURCE_MAY_HAVE_FEWER: DiagnosticMessage = diag!(2322, Error, IncompatibleAssignment, "Target requires {0} element(s) but source may have fewer.");
    pub const TARGET_SIGNATURE_PROVIDES_TOO_FEW_ARGUMENTS: DiagnosticMessage = diag!(2322, Error, IncompatibleAssignment, "Target signature provides too few arguments. Expected {0} or more, but got {1}.");

    // ========================================================================
    // Null checks and implicit any (7000+, 18000+)
    // ========================================================================
    pub const PARAMETER_0_IMPLICITLY_HAS_AN_ANY_TYPE: DiagnosticMessage = diag!(7006, Error, ImplicitAny, "Parameter '{0}' implicitly has an 'any' type.");
    pub const _0_IS_POSSIBLY_UNDEFINED: DiagnosticMessage = diag!(18048, Error, UseBeforeNarrowing, "'{0}' is possibly 'undefined'.");
    pub const _0_IS_POSSIBLY_NULL: DiagnosticMessage = diag!(18047, Error, UseBeforeNarrowing, "'{0}' is possibly 'null'.");
    pub const _0_IS_POSSIBLY_NULL_OR_UNDEFINED: DiagnosticMessage = diag!(18049, Error, UseBeforeNarrowing, "'{0}' is possibly 'null' or 'undefined'.");
    pub const OBJECT_IS_POSSIBLY_NULL: DiagnosticMessage = diag!(2531, Error, UseBeforeNarrowing, "Object is possibly 'null'.");
    pub const OBJECT_IS_POSSIBLY_UNDEFINED: DiagnosticMessage = diag!(2532, Error, UseBeforeNarrowing, "Object is possibly 'undefined'.");
    pub const OBJECT_IS_POSSIBLY_NULL_OR_UNDEFINED: DiagnosticMessage = diag!(2533, Error, UseBeforeNarrowing, "Object is possibly 'null' or 'undefined'.");
}
