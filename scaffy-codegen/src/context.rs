//! Model naming context
//!
//! Every naming variant of a logical model, derived once from the supplied
//! model name and shared by the type map, block synthesis, templates and
//! path building.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::{ValidationError, ValidationErrorKind};
use crate::field::is_reserved_word;
use crate::inflect::{
    pluralize, singularize, split_words, to_camel_case, to_kebab_case, to_pascal_case,
    to_snake_case,
};

static MODEL_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").unwrap());

/// One name in four cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameForms {
    pub pascal: String,
    pub camel: String,
    pub snake: String,
    pub kebab: String,
}

impl NameForms {
    fn of(s: &str) -> Self {
        Self {
            pascal: to_pascal_case(s),
            camel: to_camel_case(s),
            snake: to_snake_case(s),
            kebab: to_kebab_case(s),
        }
    }
}

/// Naming bundle for one model.
///
/// All variants are pure functions of the singular form: `post`, `posts`
/// and `Post` produce equal contexts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelContext {
    pub singular: NameForms,
    pub plural: NameForms,
    /// SQL table name: snake_case plural.
    pub table_name: String,
}

impl ModelContext {
    /// Validate `name` and derive its context.
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        if !MODEL_NAME.is_match(name) {
            return Err(ValidationError::new(
                ValidationErrorKind::InvalidModelName,
                name,
                "model names must start with a letter and contain only letters, digits, '_' or '-'",
            ));
        }

        let ctx = Self::derive(name);
        if is_reserved_word(&ctx.singular.snake) || is_reserved_word(&ctx.table_name) {
            return Err(ValidationError::new(
                ValidationErrorKind::ReservedModelName,
                name,
                format!(
                    "'{}' collides with a reserved SQL word",
                    ctx.singular.snake
                ),
            ));
        }
        Ok(ctx)
    }

    /// Derive the context without validating `name`.
    ///
    /// Used for reference targets, which are free-form.
    pub fn derive(name: &str) -> Self {
        let mut words = split_words(name);
        let Some(last) = words.pop() else {
            return Self {
                singular: NameForms::of(""),
                plural: NameForms::of(""),
                table_name: String::new(),
            };
        };

        let singular_last = singularize(&last);
        let plural_last = pluralize(&singular_last);

        let singular = join_words(&words, &singular_last);
        let plural = join_words(&words, &plural_last);

        let plural = NameForms::of(&plural);
        Self {
            singular: NameForms::of(&singular),
            table_name: plural.snake.clone(),
            plural,
        }
    }

    /// Identifier of the exported table constant in the schema file.
    pub fn table_const(&self) -> &str {
        &self.plural.camel
    }

    /// URL segment for generated routes.
    pub fn route_segment(&self) -> &str {
        &self.plural.kebab
    }
}

fn join_words(prefix: &[String], last: &str) -> String {
    let mut all: Vec<&str> = prefix.iter().map(String::as_str).collect();
    all.push(last);
    all.join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_all_forms() {
        let ctx = ModelContext::new("BlogPost").unwrap();
        assert_eq!(ctx.singular.pascal, "BlogPost");
        assert_eq!(ctx.singular.camel, "blogPost");
        assert_eq!(ctx.singular.snake, "blog_post");
        assert_eq!(ctx.singular.kebab, "blog-post");
        assert_eq!(ctx.plural.pascal, "BlogPosts");
        assert_eq!(ctx.plural.camel, "blogPosts");
        assert_eq!(ctx.plural.snake, "blog_posts");
        assert_eq!(ctx.plural.kebab, "blog-posts");
        assert_eq!(ctx.table_name, "blog_posts");
        assert_eq!(ctx.table_const(), "blogPosts");
        assert_eq!(ctx.route_segment(), "blog-posts");
    }

    #[test]
    fn plural_and_singular_inputs_agree() {
        let a = ModelContext::new("post").unwrap();
        let b = ModelContext::new("posts").unwrap();
        let c = ModelContext::new("Post").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn derive_is_deterministic() {
        assert_eq!(ModelContext::derive("blog-post"), ModelContext::derive("blog-post"));
        assert_eq!(ModelContext::derive("blog-post"), ModelContext::derive("blog_posts"));
    }

    #[test]
    fn irregular_plural_table() {
        assert_eq!(ModelContext::new("person").unwrap().table_name, "people");
        assert_eq!(ModelContext::new("category").unwrap().table_name, "categories");
    }

    #[test]
    fn singular_names_ending_in_as() {
        let ctx = ModelContext::new("alias").unwrap();
        assert_eq!(ctx.singular.snake, "alias");
        assert_eq!(ctx.singular.pascal, "Alias");
        assert_eq!(ctx.table_name, "aliases");
        assert_eq!(ModelContext::new("canvases").unwrap(), ModelContext::new("canvas").unwrap());
    }

    #[test]
    fn rejects_invalid_names() {
        let e = ModelContext::new("1post").unwrap_err();
        assert_eq!(e.kind, ValidationErrorKind::InvalidModelName);
        assert_eq!(
            ModelContext::new("blog post").unwrap_err().kind,
            ValidationErrorKind::InvalidModelName
        );
    }

    #[test]
    fn rejects_reserved_names() {
        assert_eq!(
            ModelContext::new("order").unwrap_err().kind,
            ValidationErrorKind::ReservedModelName
        );
        assert_eq!(
            ModelContext::new("Orders").unwrap_err().kind,
            ValidationErrorKind::ReservedModelName
        );
        assert!(ModelContext::new("user").is_ok());
    }

    #[test]
    fn derive_of_empty_name() {
        assert_eq!(ModelContext::derive("").table_name, "");
    }
}
