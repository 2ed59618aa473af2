//! Ordered route table: path → match, target → path.
//!
//! # Design
//!
//! - Each declaration is compiled once when it is added.
//! - Lookup walks declarations in registration order; the first whose
//!   pattern matches wins. `/item/{id}` registered before `/item/special`
//!   therefore shadows it, and callers must order specific routes first.
//! - Reversal picks the first declaration with the exact (page, action,
//!   stack) triple whose placeholders can carry the supplied parameters.
//!
//! Paths handled here never include the router base; the
//! [`Router`](crate::Router) strips and re-adds it.

use crate::error::RouterError;
use crate::params::{ParamValue, RouteParams};
use crate::pattern::{compile, CompiledPattern, Delimiters, ParamRule, Segment};
use crate::route::{RouteDeclaration, RouteMatch, RouteTarget};
use crate::slug::slugify;
use crate::{info_log, trace_log};
use std::rc::Rc;

/// A declaration together with its compiled pattern.
#[derive(Debug, Clone)]
pub struct CompiledRoute {
    declaration: Rc<RouteDeclaration>,
    pattern: CompiledPattern,
}

impl CompiledRoute {
    pub fn declaration(&self) -> &Rc<RouteDeclaration> {
        &self.declaration
    }

    pub fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }

    /// Match a base-stripped path, extracting placeholder values.
    pub fn match_path(&self, path: &str) -> Option<RouteMatch> {
        let captures = self.pattern.captures(path)?;
        let params = captures.into_iter().collect::<RouteParams>();
        Some(RouteMatch::new(
            Rc::clone(&self.declaration),
            path.to_string(),
            params,
        ))
    }

    /// Rebuild a base-less path for `params`, or `None` if they don't fit.
    pub fn build_path(&self, params: &RouteParams) -> Option<String> {
        // Every supplied key must be a placeholder of this route.
        if let Some(unknown) = params.keys().find(|key| !self.pattern.has_placeholder(key)) {
            trace_log!(
                "Route '{}' has no placeholder '{}'",
                self.declaration.template(),
                unknown
            );
            return None;
        }

        let placeholders = self.pattern.placeholders();
        let mut path = String::new();
        for segment in self.pattern.segments() {
            match segment {
                Segment::Literal(text) => path.push_str(text),
                Segment::Param(index) => {
                    let placeholder = &placeholders[*index];
                    let value = params.get(&placeholder.name)?;
                    let encoded = encode_param(value, placeholder.rule);
                    if !placeholder.rule.accepts(&encoded) {
                        trace_log!(
                            "Value '{}' does not fit placeholder '{}' of '{}'",
                            encoded,
                            placeholder.name,
                            self.declaration.template()
                        );
                        return None;
                    }
                    path.push_str(&encoded);
                }
            }
        }

        if !path.starts_with('/') {
            path.insert(0, '/');
        }
        Some(path)
    }
}

fn encode_param(value: &ParamValue, rule: ParamRule) -> String {
    match (value, rule) {
        (ParamValue::Number(n), _) => n.to_string(),
        (ParamValue::Text(text), ParamRule::Slug) => slugify(text),
        (ParamValue::Text(text), ParamRule::Number | ParamRule::Any) => text.clone(),
    }
}

/// Registration-ordered collection of compiled routes.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<CompiledRoute>,
    delimiters: Delimiters,
}

impl RouteTable {
    /// Create an empty table using `{` / `}` placeholders.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table with custom placeholder delimiters.
    pub fn with_delimiters(delimiters: Delimiters) -> Self {
        Self {
            routes: Vec::new(),
            delimiters,
        }
    }

    /// Validate, compile and append a declaration.
    pub fn add(&mut self, declaration: RouteDeclaration) -> Result<(), RouterError> {
        if declaration.page_name().is_empty() {
            return Err(RouterError::EmptyPageName {
                template: declaration.template().to_string(),
            });
        }

        let pattern = compile(declaration.template(), &self.delimiters)?;
        info_log!(
            "Registered route '{}' → {}.{} on '{}'",
            declaration.template(),
            declaration.page_name(),
            declaration.action_name(),
            declaration.stack_name()
        );
        self.routes.push(CompiledRoute {
            declaration: Rc::new(declaration),
            pattern,
        });
        Ok(())
    }

    /// Add several declarations, stopping at the first invalid one.
    pub fn extend<I>(&mut self, declarations: I) -> Result<(), RouterError>
    where
        I: IntoIterator<Item = RouteDeclaration>,
    {
        declarations
            .into_iter()
            .try_for_each(|declaration| self.add(declaration))
    }

    /// First route matching `path` (base-stripped, leading slash).
    pub fn find(&self, path: &str) -> Option<RouteMatch> {
        let found = self.routes.iter().find_map(|route| route.match_path(path));
        trace_log!(
            "Path '{}' {} among {} routes",
            path,
            if found.is_some() { "matched" } else { "unmatched" },
            self.routes.len()
        );
        found
    }

    /// Base-less path for `target`, or `None` when no declaration fits.
    pub fn build(&self, target: &RouteTarget) -> Option<String> {
        self.routes
            .iter()
            .filter(|route| {
                route
                    .declaration
                    .targets(&target.page, &target.action, &target.stack)
            })
            .find_map(|route| route.build_path(&target.params))
    }

    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledRoute> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(routes: Vec<RouteDeclaration>) -> RouteTable {
        let mut table = RouteTable::new();
        table.extend(routes).unwrap();
        table
    }

    #[test]
    fn test_empty_page_is_rejected() {
        let mut table = RouteTable::new();
        let err = table.add(RouteDeclaration::new("/x", "")).unwrap_err();
        assert_eq!(
            err,
            RouterError::EmptyPageName {
                template: "/x".into()
            }
        );
        assert!(table.is_empty());
    }

    #[test]
    fn test_find_extracts_params() {
        let table = table(vec![
            RouteDeclaration::new("/", "Home"),
            RouteDeclaration::new("/gallery/{page}", "Gallery"),
        ]);

        let found = table.find("/gallery/2").unwrap();
        assert_eq!(found.page, "Gallery");
        assert_eq!(found.action, "index");
        assert_eq!(found.stack, "main");
        assert_eq!(found.params.get_str("page"), Some("2"));
        assert_eq!(found.path, "/gallery/2");
    }

    #[test]
    fn test_first_declaration_wins() {
        let table = table(vec![
            RouteDeclaration::new("/item/{id}", "Item"),
            RouteDeclaration::new("/item/special", "Special"),
        ]);

        let found = table.find("/item/special").unwrap();
        assert_eq!(found.page, "Item");
        assert_eq!(found.declaration().template(), "/item/{id}");
        assert_eq!(found.params.get_str("id"), Some("special"));
    }

    #[test]
    fn test_find_none_when_unmatched() {
        let table = table(vec![RouteDeclaration::new("/about", "About")]);
        assert!(table.find("/contact").is_none());
        assert!(table.find("/about/us").is_none());
    }

    #[test]
    fn test_build_slugifies_text() {
        let table = table(vec![RouteDeclaration::new("/article/{title}.html", "Article")]);
        let target = RouteTarget::new("Article").param("title", "Crème Brûlée Recipe");
        assert_eq!(
            table.build(&target).as_deref(),
            Some("/article/creme-brulee-recipe.html")
        );
    }

    #[test]
    fn test_build_skips_candidates_that_cannot_carry_params() {
        let table = table(vec![
            RouteDeclaration::new("/list", "Products").action("list"),
            RouteDeclaration::new("/list/{page:number}", "Products").action("list"),
        ]);

        let first = RouteTarget::new("Products").action("list");
        assert_eq!(table.build(&first).as_deref(), Some("/list"));

        let paged = first.clone().param("page", 3);
        assert_eq!(table.build(&paged).as_deref(), Some("/list/3"));

        let bad = first.param("page", "three");
        assert_eq!(table.build(&bad), None);
    }

    #[test]
    fn test_build_rejects_unknown_and_missing_params() {
        let table = table(vec![
            RouteDeclaration::new("/", "Home"),
            RouteDeclaration::new("/user/{name}", "User"),
        ]);

        assert_eq!(table.build(&RouteTarget::new("Home").param("bogus", 1)), None);
        assert_eq!(table.build(&RouteTarget::new("User")), None);
        assert_eq!(table.build(&RouteTarget::new("Nobody")), None);
    }

    #[test]
    fn test_build_keeps_template_trailing_slash() {
        let table = table(vec![RouteDeclaration::new("/news/", "News")]);
        assert_eq!(table.build(&RouteTarget::new("News")).as_deref(), Some("/news/"));
        assert!(table.find("/news").is_some());
    }

    #[test]
    fn test_empty_template_builds_root() {
        let table = table(vec![RouteDeclaration::new("", "Home")]);
        assert_eq!(table.build(&RouteTarget::new("Home")).as_deref(), Some("/"));
        assert!(table.find("/").is_some());
    }
}
