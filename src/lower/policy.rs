//! Strategies that distinguish the three lowering flavours.

/// Regex used by the runtime policy to check that a value looks numeric
/// before comparing it.
pub const NUMERIC_PATTERN: &str = r"^-?\d+(\.\d+)?$";

/// What to do with `*` in `is null`, `is empty`, `is valid` and
/// `is invalid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WildcardStrategy {
    /// Fail with a wildcard error.
    Reject,
    /// `* is empty` becomes `hasEmpty(*)` and `* is invalid` becomes
    /// `hasInvalid(*)`; other checks fail.
    Sentinel,
    /// One call per field of the type dictionary, in dictionary order,
    /// combined with `||` (`&&` for `is valid`).
    Expand,
}

/// When `contains` gets its third, case-sensitive, argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseFlag {
    /// Only for `containsIgnoreCase`, as `false`.
    WhenInsensitive,
    /// Always, `true` for `contains` and `false` for `containsIgnoreCase`.
    Always,
}

/// Knobs of the lowering pass.
///
/// The three presets match the targets in use; fields are public so that
/// callers can mix them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoweringPolicy {
    pub wildcard: WildcardStrategy,
    pub case_flag: CaseFlag,
    /// Prefix ordering comparisons with a `matches(field, NUMERIC_PATTERN)`
    /// check.
    pub numeric_guard: bool,
}

impl LoweringPolicy {
    /// Direct translation, no wildcard support.
    pub fn generic() -> Self {
        LoweringPolicy {
            wildcard: WildcardStrategy::Reject,
            case_flag: CaseFlag::WhenInsensitive,
            numeric_guard: false,
        }
    }

    /// For evaluation by a data store that knows every field of a record.
    pub fn storage() -> Self {
        LoweringPolicy {
            wildcard: WildcardStrategy::Sentinel,
            ..Self::generic()
        }
    }

    /// For the runtime interpreter, which compares untyped values
    /// lexically and whose `contains` ignores case unless told otherwise.
    pub fn runtime() -> Self {
        LoweringPolicy {
            wildcard: WildcardStrategy::Expand,
            case_flag: CaseFlag::Always,
            numeric_guard: true,
        }
    }

    /// Looks a preset up by name (`generic`, `storage`, `runtime`).
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "generic" => Some(Self::generic()),
            "storage" => Some(Self::storage()),
            "runtime" => Some(Self::runtime()),
            _ => None,
        }
    }
}

impl Default for LoweringPolicy {
    fn default() -> Self {
        Self::generic()
    }
}
