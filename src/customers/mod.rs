//! Customer-list normalization.
//!
//! Callers send customers as free text: a single name, a comma-separated
//! list, optionally wrapped in parentheses, with `"`-quoted names allowed to
//! contain commas. Normalization turns that into a [`CustomerSet`] whose
//! entries are bound as SQL parameters by the query composer.
//!
//! Sales reports additionally expand two aliases before parsing:
//! - `AFT` also covers `AICHI FORGE`
//! - `COMMON SPEC` is the member list stored in `COMMON_SPEC_CONFIG`

use std::collections::HashSet;
use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::storage::ConfigStore;


/// Alias covering both AFT customer names.
pub const ALIAS_AFT: &str = "AFT";
/// What [`ALIAS_AFT`] expands to.
pub const ALIAS_AFT_EXPANSION: &str = "AFT,AICHI FORGE";
/// Sentinel group expanded from the common-spec configuration table.
pub const ALIAS_COMMON_SPEC: &str = "COMMON SPEC";

/// Errors that can occur while normalizing a customer list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CustomerError {
    #[error("customer list is blank")]
    Blank,
}

/// Result type for normalization.
pub type Result<T> = std::result::Result<T, CustomerError>;

/// Non-empty, ordered list of customer names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerSet(Vec<String>);

impl CustomerSet {
    /// Names in input order.
    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn into_names(self) -> Vec<String> {
        self.0
    }
}

/// SQL tuple literal form, e.g. `('AFT', 'AICHI FORGE')`.
impl fmt::Display for CustomerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, name) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "'{}'", name.replace('\'', "''"))?;
        }
        f.write_str(")")
    }
}

/// Parse a raw customer list.
///
/// The outer whitespace and one surrounding pair of parentheses are removed,
/// the remainder is split as a CSV record, and each name is trimmed. Empty
/// names are dropped; if nothing is left the input is [`CustomerError::Blank`].
pub fn normalize(raw: &str) -> Result<CustomerSet> {
    let inner = strip_parens(raw.trim());
    let names: Vec<String> = split_record(inner)
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();

    if names.is_empty() {
        return Err(CustomerError::Blank);
    }
    Ok(CustomerSet(names))
}

/// Rewrite customer aliases into an explicit list.
///
/// Matches the raw value exactly; anything that is not an alias is returned
/// unchanged. Common-spec members are de-duplicated in store order and
/// CSV-quoted when needed so that [`normalize`] reads each back as one name.
pub async fn expand_alias(
    raw: &str,
    store: &dyn ConfigStore,
) -> crate::storage::Result<String> {
    match raw {
        ALIAS_AFT => Ok(ALIAS_AFT_EXPANSION.to_string()),
        ALIAS_COMMON_SPEC => {
            let members = store.common_spec_customers().await?;
            let mut seen = HashSet::new();
            let expanded = members
                .into_iter()
                .filter(|name| seen.insert(name.clone()))
                .map(|name| quote_field(&name))
                .collect::<Vec<_>>()
                .join(",");
            debug!(customers = %expanded, "Expanded common-spec customers");
            Ok(expanded)
        }
        other => Ok(other.to_string()),
    }
}

/// Remove exactly one `(` … `)` pair.
fn strip_parens(input: &str) -> &str {
    if input.starts_with('(') && input.ends_with(')') {
        let rest = &input[1..];
        rest.strip_suffix(')').unwrap_or(rest)
    } else {
        input
    }
}

/// Quote a name for a CSV record if it contains a delimiter or quote.
fn quote_field(name: &str) -> String {
    if name.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", name.replace('"', "\"\""))
    } else {
        name.to_string()
    }
}

#[derive(Clone, Copy)]
enum FieldState {
    Start,
    Unquoted,
    Quoted,
    QuoteInQuoted,
}

/// Split the first CSV record of `input`.
///
/// `,` delimits, `"` quotes, `""` inside quotes is a literal quote, and spaces
/// at the start of a field are skipped. An unquoted line break ends the record.
fn split_record(input: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut state = FieldState::Start;

    for ch in input.chars() {
        state = match (state, ch) {
            (FieldState::Start, ' ') => FieldState::Start,
            (FieldState::Start, '"') => FieldState::Quoted,
            (FieldState::Quoted, '"') => FieldState::QuoteInQuoted,
            (FieldState::Quoted, _) => {
                field.push(ch);
                FieldState::Quoted
            }
            (FieldState::QuoteInQuoted, '"') => {
                field.push('"');
                FieldState::Quoted
            }
            (_, ',') => {
                fields.push(std::mem::take(&mut field));
                FieldState::Start
            }
            (_, '\n' | '\r') => break,
            // text after a closing quote is kept, like an unquoted field
            (_, _) => {
                field.push(ch);
                FieldState::Unquoted
            }
        };
    }

    fields.push(field);
    fields
}
