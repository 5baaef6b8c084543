//! Static completion catalogs
//!
//! This module holds the reference data the classifier draws from: the
//! statement keywords, operators, filters, functions, tests and loop
//! variables of the Pebble template language. Catalogs are built once,
//! deduplicated by name, and never mutated afterwards.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::error::{PebbleError, Result};

/// Identifies one of the six built-in catalogs
///
/// The declaration order is the fixed priority order in which catalogs are
/// concatenated into a candidate set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CatalogKind {
    /// Statement keywords (`if`, `for`, `endblock`, ...)
    Keywords,
    /// Logical, arithmetic, comparison and ternary operators
    Operators,
    /// Filters applied after a pipe
    Filters,
    /// Callable helper functions
    Functions,
    /// Tests usable after `is`
    Tests,
    /// Properties of the `loop` variable
    LoopVariables,
}

/// How a candidate should be presented by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Keyword,
    Operator,
    Function,
    Property,
}

impl CatalogKind {
    /// All catalogs in priority order
    pub const ALL: [CatalogKind; 6] = [
        CatalogKind::Keywords,
        CatalogKind::Operators,
        CatalogKind::Filters,
        CatalogKind::Functions,
        CatalogKind::Tests,
        CatalogKind::LoopVariables,
    ];

    /// Stable identifier used on the command line and in JSON output
    pub fn name(&self) -> &'static str {
        match self {
            CatalogKind::Keywords => "keywords",
            CatalogKind::Operators => "operators",
            CatalogKind::Filters => "filters",
            CatalogKind::Functions => "functions",
            CatalogKind::Tests => "tests",
            CatalogKind::LoopVariables => "loop-variables",
        }
    }

    /// Presentation kind for entries of this catalog
    pub fn item_kind(&self) -> ItemKind {
        match self {
            CatalogKind::Keywords | CatalogKind::Tests => ItemKind::Keyword,
            CatalogKind::Operators => ItemKind::Operator,
            CatalogKind::Filters | CatalogKind::Functions => ItemKind::Function,
            CatalogKind::LoopVariables => ItemKind::Property,
        }
    }

    /// Noun used in generated documentation, if entries carry any
    pub fn documentation_label(&self) -> Option<&'static str> {
        match self {
            CatalogKind::Filters => Some("filter"),
            CatalogKind::Functions => Some("function"),
            CatalogKind::Tests => Some("test"),
            _ => None,
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CatalogKind {
    type Err = PebbleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "keywords" | "keyword" => Ok(CatalogKind::Keywords),
            "operators" | "operator" => Ok(CatalogKind::Operators),
            "filters" | "filter" => Ok(CatalogKind::Filters),
            "functions" | "function" => Ok(CatalogKind::Functions),
            "tests" | "test" => Ok(CatalogKind::Tests),
            "loop" | "loop-variables" | "loop_variables" | "loopvariables" => {
                Ok(CatalogKind::LoopVariables)
            }
            other => Err(PebbleError::Usage(format!(
                "Unknown catalog '{other}'. Expected one of: {}",
                CatalogKind::ALL.map(|k| k.name()).join(", ")
            ))),
        }
    }
}

/// A single completion entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Text shown in the completion list
    pub name: Cow<'static, str>,

    /// Short human-readable description
    pub detail: Cow<'static, str>,

    /// Insertion template with `${n:default}` tab-stops and a final `$0`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert_template: Option<Cow<'static, str>>,
}

impl CatalogEntry {
    /// Entry without an insertion template, usable in constant tables
    pub const fn plain(name: &'static str, detail: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            detail: Cow::Borrowed(detail),
            insert_template: None,
        }
    }

    /// Entry with an insertion template, usable in constant tables
    pub const fn snippet(name: &'static str, detail: &'static str, template: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            detail: Cow::Borrowed(detail),
            insert_template: Some(Cow::Borrowed(template)),
        }
    }

    /// Entry built at runtime, e.g. from configuration
    pub fn new(name: impl Into<Cow<'static, str>>, detail: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            detail: detail.into(),
            insert_template: None,
        }
    }

    /// Attach an insertion template
    pub fn with_template(mut self, template: impl Into<Cow<'static, str>>) -> Self {
        self.insert_template = Some(template.into());
        self
    }
}

/// An immutable, name-unique list of entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    kind: CatalogKind,
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build a catalog, dropping any entry whose name was already seen
    ///
    /// The first occurrence wins, so the order of the source table is kept.
    pub fn new<I>(kind: CatalogKind, entries: I) -> Self
    where
        I: IntoIterator<Item = CatalogEntry>,
    {
        let mut seen = HashSet::new();
        let entries = entries
            .into_iter()
            .filter(|entry| seen.insert(entry.name.clone()))
            .collect();

        Self { kind, entries }
    }

    pub fn kind(&self) -> CatalogKind {
        self.kind
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find an entry by exact name
    pub fn lookup(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Iterate over entry names in catalog order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_ref())
    }
}

/// Get one of the built-in catalogs
pub fn catalog(kind: CatalogKind) -> &'static Catalog {
    match kind {
        CatalogKind::Keywords => &KEYWORDS,
        CatalogKind::Operators => &OPERATORS,
        CatalogKind::Filters => &FILTERS,
        CatalogKind::Functions => &FUNCTIONS,
        CatalogKind::Tests => &TESTS,
        CatalogKind::LoopVariables => &LOOP_VARIABLES,
    }
}

static KEYWORDS: LazyLock<Catalog> =
    LazyLock::new(|| Catalog::new(CatalogKind::Keywords, KEYWORD_ENTRIES.iter().cloned()));
static OPERATORS: LazyLock<Catalog> =
    LazyLock::new(|| Catalog::new(CatalogKind::Operators, OPERATOR_ENTRIES.iter().cloned()));
static FILTERS: LazyLock<Catalog> =
    LazyLock::new(|| Catalog::new(CatalogKind::Filters, FILTER_ENTRIES.iter().cloned()));
static FUNCTIONS: LazyLock<Catalog> =
    LazyLock::new(|| Catalog::new(CatalogKind::Functions, FUNCTION_ENTRIES.iter().cloned()));
static TESTS: LazyLock<Catalog> =
    LazyLock::new(|| Catalog::new(CatalogKind::Tests, TEST_ENTRIES.iter().cloned()));
static LOOP_VARIABLES: LazyLock<Catalog> = LazyLock::new(|| {
    Catalog::new(CatalogKind::LoopVariables, LOOP_VARIABLE_ENTRIES.iter().cloned())
});

const KEYWORD_ENTRIES: &[CatalogEntry] = &[
    CatalogEntry::snippet(
        "if",
        "Conditional statement",
        "if ${1:condition}\n\t$0\n{% endif %}",
    ),
    CatalogEntry::plain("else", "Else clause"),
    CatalogEntry::snippet("elseif", "Else if clause", "elseif ${1:condition}"),
    CatalogEntry::plain("endif", "End if statement"),
    CatalogEntry::snippet(
        "for",
        "For loop",
        "for ${1:item} in ${2:items}\n\t$0\n{% endfor %}",
    ),
    CatalogEntry::plain("endfor", "End for loop"),
    CatalogEntry::plain("in", "In operator (for loops)"),
    CatalogEntry::snippet(
        "block",
        "Define a block",
        "block ${1:name}\n\t$0\n{% endblock %}",
    ),
    CatalogEntry::plain("endblock", "End block"),
    CatalogEntry::snippet(
        "extends",
        "Extend parent template",
        "extends \"${1:parent.html}\"",
    ),
    CatalogEntry::snippet(
        "include",
        "Include another template",
        "include \"${1:template.html}\"",
    ),
    CatalogEntry::snippet("import", "Import macros", "import \"${1:macros.html}\""),
    CatalogEntry::snippet(
        "from",
        "Import specific macros",
        "from \"${1:macros.html}\" import ${2:macroName}",
    ),
    CatalogEntry::snippet(
        "macro",
        "Define a macro",
        "macro ${1:name}(${2:args})\n\t$0\n{% endmacro %}",
    ),
    CatalogEntry::plain("endmacro", "End macro"),
    CatalogEntry::snippet("set", "Set a variable", "set ${1:varName} = ${2:value}"),
    CatalogEntry::snippet(
        "filter",
        "Apply filter to block",
        "filter ${1:filterName}\n\t$0\n{% endfilter %}",
    ),
    CatalogEntry::plain("endfilter", "End filter block"),
    CatalogEntry::snippet(
        "autoescape",
        "Enable autoescaping",
        "autoescape \"${1:html}\"\n\t$0\n{% endautoescape %}",
    ),
    CatalogEntry::plain("endautoescape", "End autoescape"),
    CatalogEntry::snippet(
        "verbatim",
        "Verbatim block (no processing)",
        "verbatim\n\t$0\n{% endverbatim %}",
    ),
    CatalogEntry::plain("endverbatim", "End verbatim"),
    CatalogEntry::snippet(
        "cache",
        "Cache block",
        "cache ${1:cacheName}\n\t$0\n{% endcache %}",
    ),
    CatalogEntry::plain("endcache", "End cache"),
    CatalogEntry::snippet(
        "parallel",
        "Parallel execution",
        "parallel\n\t$0\n{% endparallel %}",
    ),
    CatalogEntry::plain("endparallel", "End parallel"),
    CatalogEntry::snippet(
        "embed",
        "Embed template with overrides",
        "embed \"${1:template.html}\"\n\t$0\n{% endembed %}",
    ),
    CatalogEntry::plain("endembed", "End embed"),
    CatalogEntry::plain("flush", "Flush output buffer"),
];

const OPERATOR_ENTRIES: &[CatalogEntry] = &[
    // logical
    CatalogEntry::plain("and", "Logical operator"),
    CatalogEntry::plain("or", "Logical operator"),
    CatalogEntry::plain("not", "Logical operator"),
    CatalogEntry::plain("is", "Logical operator"),
    CatalogEntry::plain("as", "Logical operator"),
    CatalogEntry::plain("contains", "Logical operator"),
    CatalogEntry::plain("equals", "Logical operator"),
    // arithmetic
    CatalogEntry::plain("+", "Addition"),
    CatalogEntry::plain("-", "Subtraction"),
    CatalogEntry::plain("*", "Multiplication"),
    CatalogEntry::plain("/", "Division"),
    CatalogEntry::plain("%", "Modulus"),
    // comparison
    CatalogEntry::plain("==", "Equality comparison"),
    CatalogEntry::plain("!=", "Inequality comparison"),
    CatalogEntry::plain("<", "Less than"),
    CatalogEntry::plain(">", "Greater than"),
    CatalogEntry::plain("<=", "Less than or equal"),
    CatalogEntry::plain(">=", "Greater than or equal"),
    // ternary
    CatalogEntry::plain("?", "Ternary operator (condition)"),
    CatalogEntry::plain(":", "Ternary operator (else)"),
];

const FILTER_ENTRIES: &[CatalogEntry] = &[
    CatalogEntry::snippet(
        "abbreviate",
        "Abbreviate string to length",
        "abbreviate(${1:length})",
    ),
    CatalogEntry::plain("abs", "Absolute value"),
    CatalogEntry::plain("capitalize", "Capitalize first letter"),
    CatalogEntry::snippet("date", "Format date", "date(\"${1:yyyy-MM-dd}\")"),
    CatalogEntry::snippet(
        "default",
        "Default value if null",
        "default(\"${1:defaultValue}\")",
    ),
    CatalogEntry::snippet("escape", "Escape HTML", "escape(strategy=\"${1:html}\")"),
    CatalogEntry::plain("first", "Get first element"),
    CatalogEntry::snippet("join", "Join array elements", "join(\"${1:,}\")"),
    CatalogEntry::plain("last", "Get last element"),
    CatalogEntry::plain("length", "Get length"),
    CatalogEntry::plain("lower", "Convert to lowercase"),
    CatalogEntry::plain("merge", "Merge arrays/maps"),
    CatalogEntry::snippet(
        "numberformat",
        "Format number",
        "numberformat(\"${1:#,##0.00}\")",
    ),
    CatalogEntry::plain("raw", "Output raw (no escaping)"),
    CatalogEntry::snippet(
        "replace",
        "Replace text",
        "replace({\"${1:search}\": \"${2:replace}\"})",
    ),
    CatalogEntry::plain("reverse", "Reverse array or string"),
    CatalogEntry::plain("rsort", "Reverse sort"),
    CatalogEntry::snippet(
        "slice",
        "Extract slice",
        "slice(${1:start}, ${2:length})",
    ),
    CatalogEntry::plain("sort", "Sort array"),
    CatalogEntry::snippet("split", "Split string", "split(\"${1:,}\")"),
    CatalogEntry::plain("title", "Convert to title case"),
    CatalogEntry::plain("trim", "Remove whitespace"),
    CatalogEntry::plain("upper", "Convert to uppercase"),
    CatalogEntry::plain("urlencode", "URL encode string"),
    CatalogEntry::plain("base64decode", "Decode base64 string"),
    CatalogEntry::plain("base64encode", "Encode string to base64"),
    CatalogEntry::plain("sha256", "Generate SHA256 hash"),
];

const FUNCTION_ENTRIES: &[CatalogEntry] = &[
    CatalogEntry::snippet("block", "Reference parent block", "block(\"${1:blockName}\")"),
    CatalogEntry::snippet(
        "i18n",
        "Internationalization/translation",
        "i18n(\"${1:key}\")",
    ),
    CatalogEntry::snippet("max", "Maximum value", "max(${1:value1}, ${2:value2})"),
    CatalogEntry::snippet("min", "Minimum value", "min(${1:value1}, ${2:value2})"),
    CatalogEntry::snippet("parent", "Reference parent block content", "parent()"),
    CatalogEntry::snippet(
        "range",
        "Generate range of numbers",
        "range(${1:start}, ${2:end})",
    ),
];

const TEST_ENTRIES: &[CatalogEntry] = &[
    CatalogEntry::plain("empty", "Test if empty"),
    CatalogEntry::plain("even", "Test if even number"),
    CatalogEntry::plain("odd", "Test if odd number"),
    CatalogEntry::plain("null", "Test if null"),
    CatalogEntry::plain("map", "Test if map/object"),
    CatalogEntry::plain("iterable", "Test if iterable"),
];

const LOOP_VARIABLE_ENTRIES: &[CatalogEntry] = &[
    CatalogEntry::plain("index", "Zero-based index"),
    CatalogEntry::plain("length", "Total number of items"),
    CatalogEntry::plain("first", "True if first iteration"),
    CatalogEntry::plain("last", "True if last iteration"),
    CatalogEntry::plain("revindex", "Iterations from the end"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_sizes() {
        assert_eq!(catalog(CatalogKind::Keywords).len(), 29);
        assert_eq!(catalog(CatalogKind::Operators).len(), 20);
        assert_eq!(catalog(CatalogKind::Filters).len(), 27);
        assert_eq!(catalog(CatalogKind::Functions).len(), 6);
        assert_eq!(catalog(CatalogKind::Tests).len(), 6);
        assert_eq!(catalog(CatalogKind::LoopVariables).len(), 5);
    }

    #[test]
    fn test_every_catalog_has_unique_names() {
        for kind in CatalogKind::ALL {
            let catalog = catalog(kind);
            let mut seen = HashSet::new();
            for name in catalog.names() {
                assert!(seen.insert(name), "duplicate '{name}' in {kind}");
            }
        }
    }

    #[test]
    fn test_constructor_drops_duplicates_keeping_first() {
        let catalog = Catalog::new(
            CatalogKind::Filters,
            [
                CatalogEntry::plain("sha256", "first"),
                CatalogEntry::plain("upper", "Convert to uppercase"),
                CatalogEntry::plain("sha256", "second"),
                CatalogEntry::plain("sha256", "third"),
            ],
        );

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["sha256", "upper"]);
        assert_eq!(catalog.lookup("sha256").unwrap().detail, "first");
    }

    #[test]
    fn test_filter_catalog_contains_hash_and_base64_once() {
        let filters = catalog(CatalogKind::Filters);
        for name in ["base64decode", "base64encode", "sha256"] {
            assert_eq!(filters.names().filter(|n| *n == name).count(), 1);
        }
    }

    #[test]
    fn test_operator_groups() {
        let names: Vec<&str> = catalog(CatalogKind::Operators).names().collect();
        assert_eq!(
            &names[..7],
            &["and", "or", "not", "is", "as", "contains", "equals"]
        );
        assert_eq!(&names[7..12], &["+", "-", "*", "/", "%"]);
        assert_eq!(&names[12..18], &["==", "!=", "<", ">", "<=", ">="]);
        assert_eq!(&names[18..], &["?", ":"]);
    }

    #[test]
    fn test_lookup_returns_template() {
        let keywords = catalog(CatalogKind::Keywords);
        let entry = keywords.lookup("for").unwrap();
        assert_eq!(
            entry.insert_template.as_deref(),
            Some("for ${1:item} in ${2:items}\n\t$0\n{% endfor %}")
        );
        assert!(keywords.lookup("endfor").unwrap().insert_template.is_none());
        assert!(keywords.lookup("while").is_none());
    }

    #[test]
    fn test_catalog_kind_from_str() {
        assert_eq!("filters".parse::<CatalogKind>().unwrap(), CatalogKind::Filters);
        assert_eq!("Tests".parse::<CatalogKind>().unwrap(), CatalogKind::Tests);
        assert_eq!(
            "loop".parse::<CatalogKind>().unwrap(),
            CatalogKind::LoopVariables
        );
        assert_eq!(
            "loop-variables".parse::<CatalogKind>().unwrap(),
            CatalogKind::LoopVariables
        );
        assert!("widgets".parse::<CatalogKind>().is_err());
    }

    #[test]
    fn test_item_kinds() {
        assert_eq!(CatalogKind::Keywords.item_kind(), ItemKind::Keyword);
        assert_eq!(CatalogKind::Operators.item_kind(), ItemKind::Operator);
        assert_eq!(CatalogKind::Filters.item_kind(), ItemKind::Function);
        assert_eq!(CatalogKind::Tests.item_kind(), ItemKind::Keyword);
        assert_eq!(CatalogKind::LoopVariables.item_kind(), ItemKind::Property);
    }
}
