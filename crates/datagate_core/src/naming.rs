//! Type-name to table-name convention.
//!
//! # Responsibility
//! - Map a model's declared type name to the table it is stored in.
//!
//! # Invariants
//! - The mapping is pure: the same input always yields the same table name.
//! - Namespace qualifiers (`::` or `\`) never reach the table name.
//! - Every uppercase letter starts a new `_`-separated segment.

use once_cell::sync::Lazy;
use regex::Regex;

static UPPERCASE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z]").expect("valid uppercase regex"));

/// Converts a PascalCase type name into its snake_case table name.
///
/// `app::model::UserAccount` and `App\Model\UserAccount` both map to
/// `user_account`. Runs of capitals are split letter by letter, so
/// `HTTPLog` maps to `h_t_t_p_log`.
pub fn model_to_table(type_name: &str) -> String {
    let short_name = strip_namespace(type_name);
    let underscored = UPPERCASE_RE.replace_all(short_name, "_${0}");
    let lowered = underscored.to_lowercase();

    match lowered.strip_prefix('_') {
        Some(rest) => rest.to_string(),
        None => lowered,
    }
}

fn strip_namespace(type_name: &str) -> &str {
    type_name
        .rsplit(|c: char| c == ':' || c == '\\')
        .next()
        .unwrap_or(type_name)
}
