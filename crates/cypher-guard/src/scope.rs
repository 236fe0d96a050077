//! Variable scope tracking across `WITH` projections.
//!
//! A `WITH` clause carries a reduced set of names forward; later clauses may
//! only reference what survives it. Generated queries routinely get this
//! wrong in two ways, and this module fixes both lexically:
//!
//! - [`sanitize`] drops bare references to names that were never defined
//!   ("phantom" variables) from projection item lists.
//! - [`repair`] re-adds names the final `RETURN` reads but the last
//!   projection dropped.
//!
//! Everything here is a best-effort heuristic over [`crate::lexer`] tokens,
//! not a parser. The orchestrator only depends on [`projection_clauses`],
//! [`consumed_names`], [`defined_names`] and [`binding_names`] plus the two
//! entry points.

use crate::changes::ChangeLog;
use crate::lexer::{tokenize, Lexeme};
use crate::variables::is_reserved;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Keywords that end a projection item list
const CLAUSE_KEYWORDS: &[&str] = &[
    "WHERE", "ORDER", "SKIP", "LIMIT", "MATCH", "OPTIONAL", "UNWIND", "RETURN", "WITH", "CALL",
    "UNION",
];

/// Clauses that can bind new names between a projection and the final RETURN
const BINDING_CLAUSES: &[&str] = &["MATCH", "OPTIONAL", "UNWIND", "CALL"];

/// Words after which `(` opens a pattern rather than a call's arguments
const PATTERN_LEADS: &[&str] = &["MATCH", "MERGE", "CREATE", "WHERE", "AND", "OR", "NOT", "XOR"];

/// What may follow a pattern variable: `(a)`, `(a:L)`, `(a {..})`, `[r*2]`
const PATTERN_VAR_FOLLOW: &[u8] = b":)]{*";

/// A top-level `WITH` clause located in a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionClause {
    /// Byte offset of the `WITH` keyword
    pub keyword_start: usize,
    /// Byte span of the item list (after an optional `DISTINCT`)
    pub items_start: usize,
    pub items_end: usize,
}

impl ProjectionClause {
    /// The raw item list text, whitespace included
    pub fn items<'q>(&self, query: &'q str) -> &'q str {
        &query[self.items_start..self.items_end]
    }
}

/// Names defined at one point of a single query walk.
///
/// Created fresh for every call; never shared.
#[derive(Debug, Clone, Default)]
pub struct ScopeState {
    defined: BTreeSet<String>,
}

impl ScopeState {
    /// Scope established by the text before the first projection
    fn initial(prefix: &str) -> Self {
        Self {
            defined: binding_names(prefix),
        }
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.defined.contains(name)
    }

    /// Names introduced by clauses between projections (MATCH, UNWIND, ...)
    fn enter_segment(&mut self, segment: &str) {
        self.defined.extend(binding_names(segment));
    }

    /// Pass through a projection that kept `items`
    fn project(&mut self, items: &[&str]) {
        let mut projected = BTreeSet::new();
        let mut wildcard = false;

        for item in items {
            if *item == "*" {
                wildcard = true;
                continue;
            }
            projected.extend(defined_names(item));
            projected.extend(binding_names(item));
        }

        if wildcard {
            self.defined.extend(projected);
        } else {
            self.defined = projected;
        }
    }
}

fn is_clause_boundary(lexemes: &[Lexeme<'_>], idx: usize) -> bool {
    let lexeme = &lexemes[idx];
    if !lexeme.is_top_level() {
        return false;
    }
    let Some(word) = lexeme.word() else {
        return false;
    };
    if !CLAUSE_KEYWORDS.iter().any(|kw| kw.eq_ignore_ascii_case(word)) {
        return false;
    }
    // `n.limit`, `:Order`, `$skip` are names, not keywords
    !idx.checked_sub(1)
        .map(|p| &lexemes[p])
        .is_some_and(|prev| prev.is_punct(b'.') || prev.is_punct(b':') || prev.is_punct(b'$'))
}

/// Locate every top-level `WITH` projection in `query`.
///
/// `STARTS WITH` / `ENDS WITH` string predicates and `WITH` inside
/// subqueries are not projections of the outer query and are skipped.
pub fn projection_clauses(query: &str) -> Vec<ProjectionClause> {
    let lexemes = tokenize(query);
    let mut clauses = Vec::new();

    for (i, lexeme) in lexemes.iter().enumerate() {
        if !lexeme.is_top_level() || !lexeme.is_keyword("WITH") {
            continue;
        }
        if i > 0 && (lexemes[i - 1].is_keyword("STARTS") || lexemes[i - 1].is_keyword("ENDS")) {
            continue;
        }

        let mut items_start = lexeme.end;
        let mut next = i + 1;
        if lexemes.get(next).is_some_and(|l| l.is_keyword("DISTINCT")) {
            items_start = lexemes[next].end;
            next += 1;
        }

        let items_end = (next..lexemes.len())
            .find(|&j| is_clause_boundary(&lexemes, j))
            .map(|j| lexemes[j].start)
            .unwrap_or(query.len());

        clauses.push(ProjectionClause {
            keyword_start: lexeme.start,
            items_start,
            items_end,
        });
    }

    clauses
}

/// Whether `query` contains any top-level projection clause
pub fn has_projection(query: &str) -> bool {
    !projection_clauses(query).is_empty()
}

/// Split an item list on top-level commas, trimming each item
pub fn split_items(list: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut start = 0;

    for lexeme in tokenize(list) {
        if lexeme.is_top_level() && lexeme.is_punct(b',') {
            items.push(list[start..lexeme.start].trim());
            start = lexeme.end;
        }
    }
    items.push(list[start..].trim());
    items.retain(|item| !item.is_empty());
    items
}

/// Whether the word at `idx` is the head of a (possibly namespaced) call
fn is_call_head(lexemes: &[Lexeme<'_>], idx: usize) -> bool {
    let mut j = idx + 1;
    loop {
        match lexemes.get(j) {
            Some(l) if l.is_punct(b'(') => return true,
            Some(l) if l.is_punct(b'.') && lexemes.get(j + 1).and_then(|w| w.word()).is_some() => {
                j += 2;
            }
            _ => return false,
        }
    }
}

/// Names a fragment reads, in order of first use.
///
/// Excludes reserved words, property keys, labels and relationship types,
/// parameters, function names, map keys, anything inside string literals,
/// and `AS` aliases together with later uses of them (`ORDER BY total`).
pub fn consumed_names(fragment: &str) -> Vec<String> {
    let lexemes = tokenize(fragment);
    let mut names: Vec<String> = Vec::new();
    let mut aliases: BTreeSet<&str> = BTreeSet::new();

    for (i, lexeme) in lexemes.iter().enumerate() {
        let Some(word) = lexeme.word() else {
            continue;
        };
        if is_reserved(word) || aliases.contains(word) {
            continue;
        }

        let prev = i.checked_sub(1).map(|p| &lexemes[p]);
        let next = lexemes.get(i + 1);

        if let Some(prev) = prev {
            if prev.is_keyword("AS") {
                aliases.insert(word);
                continue;
            }
            if prev.is_punct(b'.') || prev.is_punct(b'$') {
                continue;
            }
            // label or type, unless it's a map value
            if prev.is_punct(b':') && lexeme.enclosing != Some(b'{') {
                continue;
            }
        }
        if next.is_some_and(|n| n.is_punct(b':')) && lexeme.enclosing == Some(b'{') {
            continue;
        }
        if is_call_head(&lexemes, i) {
            continue;
        }

        if !names.iter().any(|n| n == word) {
            names.push(word.to_string());
        }
    }

    names
}

/// Whether the bracket at `idx` opens a node or relationship pattern
fn opens_pattern(lexemes: &[Lexeme<'_>], idx: usize) -> bool {
    let open = &lexemes[idx];
    if !(open.is_punct(b'(') || open.is_punct(b'[')) || open.enclosing == Some(b'{') {
        return false;
    }
    match idx.checked_sub(1).map(|p| &lexemes[p]) {
        None => true,
        Some(prev) => match prev.word() {
            Some(word) => PATTERN_LEADS.iter().any(|kw| kw.eq_ignore_ascii_case(word)),
            None => !prev.is_punct(b'.'),
        },
    }
}

/// Names a fragment binds for the clauses after it.
///
/// Pattern variables (`(a)`, `[r:TYPE]`, `p = (..)`), `AS` aliases and
/// `YIELD` outputs. Names that are only read, property keys, labels and map
/// keys are not bindings.
pub fn binding_names(fragment: &str) -> BTreeSet<String> {
    let lexemes = tokenize(fragment);
    let mut names = BTreeSet::new();
    let mut in_yield = false;

    for (i, lexeme) in lexemes.iter().enumerate() {
        if lexeme.is_top_level() && lexeme.is_keyword("YIELD") {
            in_yield = true;
            continue;
        }
        if is_clause_boundary(&lexemes, i) {
            in_yield = false;
        }

        let Some(word) = lexeme.word() else {
            continue;
        };
        if is_reserved(word) {
            continue;
        }

        let prev = i.checked_sub(1).map(|p| &lexemes[p]);
        let next = lexemes.get(i + 1);

        let aliased = prev.is_some_and(|p| p.is_keyword("AS"));
        let yielded = in_yield
            && lexeme.is_top_level()
            && !prev.is_some_and(|p| p.is_punct(b'.'))
            && !next.is_some_and(|n| n.is_keyword("AS"));
        let pattern_var = i > 0
            && opens_pattern(&lexemes, i - 1)
            && next.is_some_and(|n| PATTERN_VAR_FOLLOW.iter().any(|&b| n.is_punct(b)));
        let path_var = next.is_some_and(|n| n.is_punct(b'='))
            && lexemes.get(i + 2).is_some_and(|l| l.is_punct(b'('))
            && prev.is_some_and(|p| {
                p.is_punct(b',') || p.is_keyword("MATCH") || p.is_keyword("MERGE")
            });

        if aliased || yielded || pattern_var || path_var {
            names.insert(word.to_string());
        }
    }

    names
}

/// Alias bound by a single item (`expr AS alias`), or the item itself if it
/// is a bare identifier.
fn item_binding(item: &str) -> Option<String> {
    let lexemes = tokenize(item);

    let alias = lexemes
        .iter()
        .enumerate()
        .rev()
        .find(|(_, l)| l.is_top_level() && l.is_keyword("AS"))
        .and_then(|(i, _)| lexemes.get(i + 1))
        .and_then(|l| l.word());
    if let Some(alias) = alias {
        return Some(alias.to_string());
    }

    match lexemes.as_slice() {
        [single] => single
            .word()
            .filter(|w| !is_reserved(w))
            .map(str::to_string),
        _ => None,
    }
}

/// Names a projection item list binds for the clauses after it.
///
/// `*` binds nothing by itself; callers check [`has_wildcard`].
pub fn defined_names(items: &str) -> BTreeSet<String> {
    split_items(items)
        .into_iter()
        .filter(|item| *item != "*")
        .filter_map(item_binding)
        .collect()
}

/// Whether an item list contains the `*` pass-through
pub fn has_wildcard(items: &str) -> bool {
    split_items(items).contains(&"*")
}

/// Items that compute something rather than name a variable
fn is_expression(item: &str) -> bool {
    tokenize(item).iter().any(|l| {
        l.is_punct(b'(')
            || l.is_punct(b'{')
            || l.is_punct(b'[')
            || l.is_punct(b'=')
            || l.is_keyword("CASE")
    })
}

/// Rebuild an item list keeping its surrounding whitespace
fn rebuild_items(raw: &str, items: &[&str]) -> String {
    let leading = &raw[..raw.len() - raw.trim_start().len()];
    let trailing = &raw[raw.trim_end().len()..];
    format!("{}{}{}", leading, items.join(", "), trailing)
}

/// Drop phantom references from every projection clause.
pub fn sanitize(query: &str, changes: &mut ChangeLog) -> String {
    let clauses = projection_clauses(query);
    let Some(first) = clauses.first() else {
        return query.to_string();
    };

    let mut scope = ScopeState::initial(&query[..first.keyword_start]);
    let mut out = String::with_capacity(query.len());
    let mut cursor = 0;
    let mut segment_start = first.keyword_start;

    for clause in &clauses {
        scope.enter_segment(&query[segment_start..clause.keyword_start]);

        let raw = clause.items(query);
        let items = split_items(raw);
        let mut kept = Vec::with_capacity(items.len());
        let mut phantoms: Vec<String> = Vec::new();

        for item in &items {
            if *item == "*" || is_expression(item) {
                kept.push(*item);
                continue;
            }
            let undefined: Vec<String> = consumed_names(item)
                .into_iter()
                .filter(|name| !scope.is_defined(name))
                .collect();
            if undefined.is_empty() {
                kept.push(*item);
            } else {
                phantoms.extend(undefined);
            }
        }

        if !phantoms.is_empty() && kept.is_empty() {
            warn!(
                "Every item of WITH clause references undefined names ({}), leaving it intact",
                phantoms.join(", ")
            );
            kept = items.clone();
            phantoms.clear();
        }

        if !phantoms.is_empty() {
            out.push_str(&query[cursor..clause.items_start]);
            out.push_str(&rebuild_items(raw, &kept));
            cursor = clause.items_end;

            for name in &phantoms {
                info!("Removed undefined variable {} from WITH clause", name);
                changes.record(format!("Removed undefined variable `{}` from WITH clause", name));
            }
        }

        scope.project(&kept);
        segment_start = clause.items_end;
    }

    out.push_str(&query[cursor..]);
    out
}

/// Byte offset of the first clause in `fragment` that can bind names
fn first_binding_clause(fragment: &str) -> Option<usize> {
    let lexemes = tokenize(fragment);
    (0..lexemes.len())
        .find(|&i| {
            is_clause_boundary(&lexemes, i)
                && BINDING_CLAUSES.iter().any(|kw| lexemes[i].is_keyword(kw))
        })
        .map(|i| lexemes[i].start)
}

/// Byte offset of the last top-level `RETURN` keyword
fn final_return(query: &str) -> Option<usize> {
    tokenize(query)
        .iter()
        .rev()
        .find(|l| l.is_top_level() && l.is_keyword("RETURN"))
        .map(|l| l.start)
}

/// Re-add names the final `RETURN` needs to the last projection clause.
///
/// Only names that were in scope before that projection are restored;
/// anything else would be a phantom.
pub fn repair(query: &str, changes: &mut ChangeLog) -> String {
    let clauses = projection_clauses(query);
    let Some((last, earlier)) = clauses.split_last() else {
        return query.to_string();
    };
    let Some(return_start) = final_return(query) else {
        return query.to_string();
    };
    if return_start < last.items_end {
        return query.to_string();
    }

    // A RETURN between the projection and the final one (UNION) means the
    // projection does not feed the final output.
    if final_return(&query[last.items_end..return_start]).is_some() {
        debug!("Final RETURN belongs to a later query part, skipping scope repair");
        return query.to_string();
    }

    let items = last.items(query);
    if has_wildcard(items) {
        return query.to_string();
    }

    let first_start = clauses[0].keyword_start;
    let mut available = ScopeState::initial(&query[..first_start]);
    let mut segment_start = first_start;
    for clause in earlier {
        available.enter_segment(&query[segment_start..clause.keyword_start]);
        available.project(&split_items(clause.items(query)));
        segment_start = clause.items_end;
    }
    available.enter_segment(&query[segment_start..last.keyword_start]);

    // The projection's own WHERE/ORDER BY only reads names; later MATCH,
    // UNWIND or CALL clauses may bind new ones.
    let mut defined = defined_names(items);
    let tail = &query[last.items_end..return_start];
    if let Some(start) = first_binding_clause(tail) {
        defined.extend(binding_names(&tail[start..]));
    }

    let missing: Vec<String> = consumed_names(&query[return_start..])
        .into_iter()
        .filter(|name| !defined.contains(name) && available.is_defined(name))
        .collect();
    if missing.is_empty() {
        return query.to_string();
    }

    let insert_at = last.items_start + items.trim_end().len();
    let mut out = String::with_capacity(query.len() + missing.len() * 8);
    out.push_str(&query[..insert_at]);
    out.push_str(", ");
    out.push_str(&missing.join(", "));
    out.push_str(&query[insert_at..]);

    for name in &missing {
        info!("Re-added {} to WITH clause for RETURN", name);
        changes.record(format!("Re-added `{}` to WITH clause for RETURN", name));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    // =========================================================================
    // Clause detection
    // =========================================================================

    #[test]
    fn test_projection_items_span() {
        let query = "MATCH (a) WITH a, b WHERE a.x > 1 RETURN a";
        let clauses = projection_clauses(query);
        assert_eq!(clauses.len(), 1);
        assert_eq!(clauses[0].items(query).trim(), "a, b");
    }

    #[test]
    fn test_distinct_excluded_from_items() {
        let query = "MATCH (a) WITH DISTINCT a ORDER BY a.name RETURN a";
        let clauses = projection_clauses(query);
        assert_eq!(clauses[0].items(query).trim(), "a");
    }

    #[test]
    fn test_string_predicates_are_not_projections() {
        let query = "MATCH (n) WHERE n.name STARTS WITH 'A' OR n.name ends with 'z' RETURN n";
        assert!(!has_projection(query));
    }

    #[test]
    fn test_subquery_with_is_not_top_level() {
        let query = "MATCH (a) RETURN COUNT { MATCH (a)-->(b) WITH b RETURN b } AS c";
        assert!(projection_clauses(query).is_empty());
    }

    #[test]
    fn test_property_named_like_keyword_does_not_end_items() {
        let query = "MATCH (a) WITH a.limit AS lim, a RETURN lim";
        let clauses = projection_clauses(query);
        assert_eq!(clauses[0].items(query).trim(), "a.limit AS lim, a");
    }

    #[test]
    fn test_nested_braces_do_not_end_items() {
        let query = "MATCH (a) WITH a, COUNT { MATCH (a)-->() } AS deg RETURN a, deg";
        let clauses = projection_clauses(query);
        assert_eq!(
            clauses[0].items(query).trim(),
            "a, COUNT { MATCH (a)-->() } AS deg"
        );
    }

    #[test]
    fn test_split_items_top_level_only() {
        assert_eq!(
            split_items(" coalesce(a, b) AS x, c , "),
            vec!["coalesce(a, b) AS x", "c"]
        );
    }

    // =========================================================================
    // Names
    // =========================================================================

    #[test]
    fn test_consumed_names_skips_non_variables() {
        let names = consumed_names(
            "RETURN a.name, count(b) AS total, $limit, { key: c }, toUpper(d.title) ORDER BY total",
        );
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_consumed_names_in_patterns() {
        let names = consumed_names("RETURN COUNT { (a)-[r:KNOWS]->(:Person {name: x}) }");
        assert_eq!(names, vec!["a", "r", "x"]);
    }

    #[test]
    fn test_consumed_names_namespaced_call() {
        let names = consumed_names("RETURN apoc.coll.toSet(x)");
        assert_eq!(names, vec!["x"]);
    }

    #[test]
    fn test_consumed_names_ignores_strings() {
        assert_eq!(consumed_names("RETURN 'ghost' AS g, n"), vec!["n"]);
    }

    #[test]
    fn test_binding_names_patterns_only() {
        assert_eq!(
            binding_names("MATCH (p:Person {name: 'Tom'})-[r:KNOWS*1..2]->(f) WHERE f.age > p.age "),
            set(&["f", "p", "r"])
        );
    }

    #[test]
    fn test_binding_names_aliases_yield_and_paths() {
        assert_eq!(
            binding_names("UNWIND $ids AS id MATCH path = (a)-->(b) "),
            set(&["a", "b", "id", "path"])
        );
        assert_eq!(
            binding_names("CALL db.labels() YIELD label, nodeCount AS total "),
            set(&["label", "total"])
        );
    }

    #[test]
    fn test_binding_names_skip_calls_and_subqueries() {
        assert!(binding_names("WHERE count(x) > 1 AND exists { MATCH (y) } ").is_empty());
        assert!(binding_names("WHERE size(names) > 0 AND coalesce(a, b) IS NOT NULL").is_empty());
    }

    #[test]
    fn test_defined_names() {
        assert_eq!(
            defined_names("a, b.name AS bn, count(*) AS total, c.x"),
            set(&["a", "bn", "total"])
        );
        assert!(defined_names("*").is_empty());
        assert!(has_wildcard("*, a"));
    }

    // =========================================================================
    // Sanitize
    // =========================================================================

    #[test]
    fn test_sanitize_drops_phantom() {
        let mut changes = ChangeLog::new();
        let out = sanitize("MATCH (a:Person) WITH a, phantom RETURN a", &mut changes);
        assert_eq!(out, "MATCH (a:Person) WITH a RETURN a");
        assert!(changes.mentions("`phantom`"));
    }

    #[test]
    fn test_sanitize_keeps_expressions_and_valid_refs() {
        let mut changes = ChangeLog::new();
        let query = "MATCH (a)-->(b) WITH a, b.name AS bn, count(x) AS c RETURN a, bn, c";
        let out = sanitize(query, &mut changes);
        assert_eq!(out, query);
        assert!(changes.is_empty());
    }

    #[test]
    fn test_sanitize_drops_phantom_property_reference() {
        let mut changes = ChangeLog::new();
        let out = sanitize(
            "MATCH (a) WITH a, ghost.name AS gn RETURN a",
            &mut changes,
        );
        assert_eq!(out, "MATCH (a) WITH a RETURN a");
        assert!(changes.mentions("`ghost`"));
    }

    #[test]
    fn test_sanitize_scope_narrows_after_projection() {
        let mut changes = ChangeLog::new();
        let out = sanitize("MATCH (a)-->(b) WITH a WITH a, b RETURN a", &mut changes);
        assert_eq!(out, "MATCH (a)-->(b) WITH a WITH a RETURN a");
        assert_eq!(changes.len(), 1);
    }

    #[test]
    fn test_sanitize_segment_introduces_names() {
        let mut changes = ChangeLog::new();
        let query = "MATCH (a) WITH a MATCH (a)-->(b) WITH a, b RETURN b";
        assert_eq!(sanitize(query, &mut changes), query);
        assert!(changes.is_empty());
    }

    #[test]
    fn test_sanitize_alias_defines_name() {
        let mut changes = ChangeLog::new();
        let query = "MATCH (a) WITH a.name AS name WITH name RETURN name";
        assert_eq!(sanitize(query, &mut changes), query);
    }

    #[test]
    fn test_sanitize_wildcard_keeps_scope() {
        let mut changes = ChangeLog::new();
        let query = "MATCH (a)-->(b) WITH * WITH a, b RETURN a";
        assert_eq!(sanitize(query, &mut changes), query);
    }

    #[test]
    fn test_sanitize_all_phantom_clause_left_intact() {
        let mut changes = ChangeLog::new();
        let query = "MATCH (a) WITH ghost RETURN a";
        assert_eq!(sanitize(query, &mut changes), query);
        assert!(changes.is_empty());
    }

    #[test]
    fn test_sanitize_drops_phantom_named_like_map_key() {
        let mut changes = ChangeLog::new();
        let out = sanitize("MATCH (p:Person {name: 'Tom'}) WITH p, name RETURN p", &mut changes);
        assert_eq!(out, "MATCH (p:Person {name: 'Tom'}) WITH p RETURN p");
        assert!(changes.mentions("`name`"));
    }

    #[test]
    fn test_sanitize_drops_phantom_named_like_label() {
        let mut changes = ChangeLog::new();
        let out = sanitize("MATCH (a:Person) WITH a, Person RETURN a", &mut changes);
        assert_eq!(out, "MATCH (a:Person) WITH a RETURN a");
        assert!(changes.mentions("`Person`"));
    }

    #[test]
    fn test_sanitize_drops_phantom_named_like_property() {
        let mut changes = ChangeLog::new();
        let out = sanitize(
            "MATCH (m:Movie) WHERE m.title CONTAINS 'x' WITH m, title RETURN m",
            &mut changes,
        );
        assert_eq!(out, "MATCH (m:Movie) WHERE m.title CONTAINS 'x' WITH m RETURN m");
    }

    #[test]
    fn test_sanitize_projection_keeps_only_projected_names() {
        let mut changes = ChangeLog::new();
        let out = sanitize("MATCH (a) WITH a.name AS n WITH n, a RETURN n", &mut changes);
        assert_eq!(out, "MATCH (a) WITH a.name AS n WITH n RETURN n");
        assert!(changes.mentions("`a`"));
    }

    #[test]
    fn test_sanitize_without_projection_is_identity() {
        let mut changes = ChangeLog::new();
        assert_eq!(sanitize("MATCH (n) RETURN n", &mut changes), "MATCH (n) RETURN n");
    }

    // =========================================================================
    // Repair
    // =========================================================================

    #[test]
    fn test_repair_readds_dropped_variable() {
        let mut changes = ChangeLog::new();
        let out = repair(
            "MATCH (a)-[:KNOWS]->(b) WITH a RETURN a.name, b.name",
            &mut changes,
        );
        assert_eq!(out, "MATCH (a)-[:KNOWS]->(b) WITH a, b RETURN a.name, b.name");
        assert!(changes.mentions("`b`"));
    }

    #[test]
    fn test_repair_preserves_trailing_clauses() {
        let mut changes = ChangeLog::new();
        let out = repair(
            "MATCH (a)-->(b)\nWITH a\nWHERE a.age > 30\nRETURN b",
            &mut changes,
        );
        assert_eq!(out, "MATCH (a)-->(b)\nWITH a, b\nWHERE a.age > 30\nRETURN b");
    }

    #[test]
    fn test_repair_readds_variable_read_by_projection_where() {
        let mut changes = ChangeLog::new();
        let out = repair(
            "MATCH (a)-->(b) WITH a WHERE b.age > 30 RETURN b.name",
            &mut changes,
        );
        assert_eq!(out, "MATCH (a)-->(b) WITH a, b WHERE b.age > 30 RETURN b.name");
        assert!(changes.mentions("`b`"));
    }

    #[test]
    fn test_repair_property_key_is_not_a_definition() {
        let mut changes = ChangeLog::new();
        let out = repair(
            "MATCH (p)-[:LIVES_IN]->(city) WITH p WHERE p.city IS NOT NULL RETURN city.name",
            &mut changes,
        );
        assert_eq!(
            out,
            "MATCH (p)-[:LIVES_IN]->(city) WITH p, city WHERE p.city IS NOT NULL RETURN city.name"
        );
    }

    #[test]
    fn test_repair_later_unwind_binds() {
        let mut changes = ChangeLog::new();
        let query = "MATCH (a)-->(b) WITH a, collect(b) AS bs UNWIND bs AS b RETURN a, b";
        assert_eq!(repair(query, &mut changes), query);
        assert!(changes.is_empty());
    }

    #[test]
    fn test_repair_ignores_aliases_and_later_matches() {
        let mut changes = ChangeLog::new();
        let query = "MATCH (a) WITH a, count(*) AS n MATCH (a)-->(c) RETURN c, n ORDER BY n";
        assert_eq!(repair(query, &mut changes), query);
        assert!(changes.is_empty());
    }

    #[test]
    fn test_repair_never_introduces_phantoms() {
        let mut changes = ChangeLog::new();
        let query = "MATCH (a) WITH a RETURN a, ghost";
        assert_eq!(repair(query, &mut changes), query);
    }

    #[test]
    fn test_repair_respects_earlier_narrowing() {
        let mut changes = ChangeLog::new();
        let query = "MATCH (a)-->(b) WITH a WITH a RETURN b";
        assert_eq!(repair(query, &mut changes), query);
    }

    #[test]
    fn test_repair_targets_last_projection() {
        let mut changes = ChangeLog::new();
        let out = repair("MATCH (a)-->(b) WITH a, b WITH a RETURN b", &mut changes);
        assert_eq!(out, "MATCH (a)-->(b) WITH a, b WITH a, b RETURN b");
    }

    #[test]
    fn test_repair_skips_wildcard() {
        let mut changes = ChangeLog::new();
        let query = "MATCH (a)-->(b) WITH * RETURN b";
        assert_eq!(repair(query, &mut changes), query);
    }

    #[test]
    fn test_repair_skips_union_parts() {
        let mut changes = ChangeLog::new();
        let query = "MATCH (a)-->(b) WITH a RETURN a UNION MATCH (b) RETURN b AS a";
        assert_eq!(repair(query, &mut changes), query);
    }
}
