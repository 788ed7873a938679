//! String-case transformer
//!
//! Word splitting, case conversion and English singular/plural inflection
//! used by every naming variant the generator emits. All functions are pure.

// ── Inflection tables ─────────────────────────────────────────────────────────

/// `(singular, plural)` pairs that do not follow the suffix rules.
const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("tooth", "teeth"),
    ("foot", "feet"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("ox", "oxen"),
    ("leaf", "leaves"),
    ("knife", "knives"),
    ("life", "lives"),
    ("wife", "wives"),
    ("half", "halves"),
    ("wolf", "wolves"),
    ("shelf", "shelves"),
    ("thief", "thieves"),
    ("loaf", "loaves"),
    ("calf", "calves"),
    ("movie", "movies"),
    ("cookie", "cookies"),
    ("hero", "heroes"),
    ("potato", "potatoes"),
    ("tomato", "tomatoes"),
    ("echo", "echoes"),
    ("quiz", "quizzes"),
    ("criterion", "criteria"),
    ("analysis", "analyses"),
    ("basis", "bases"),
    ("crisis", "crises"),
    ("diagnosis", "diagnoses"),
    ("thesis", "theses"),
    ("alias", "aliases"),
    ("atlas", "atlases"),
    ("canvas", "canvases"),
    ("bias", "biases"),
    ("gas", "gases"),
];

/// Words with identical singular and plural forms.
const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "deer",
    "news",
    "data",
    "metadata",
    "feedback",
    "software",
    "hardware",
];

// ── Inflection ────────────────────────────────────────────────────────────────

/// Pluralize a single English word.
///
/// Capitalisation of the first letter is preserved.
///
/// # Examples
/// ```
/// # use scaffy_codegen::inflect::pluralize;
/// assert_eq!(pluralize("post"), "posts");
/// assert_eq!(pluralize("Category"), "Categories");
/// assert_eq!(pluralize("status"), "statuses");
/// assert_eq!(pluralize("person"), "people");
/// ```
pub fn pluralize(word: &str) -> String {
    inflect_preserving_case(word, pluralize_lower)
}

/// Singularize a single English word.
///
/// # Examples
/// ```
/// # use scaffy_codegen::inflect::singularize;
/// assert_eq!(singularize("posts"), "post");
/// assert_eq!(singularize("categories"), "category");
/// assert_eq!(singularize("statuses"), "status");
/// assert_eq!(singularize("status"), "status");
/// ```
pub fn singularize(word: &str) -> String {
    inflect_preserving_case(word, singularize_lower)
}

fn inflect_preserving_case(word: &str, f: fn(&str) -> String) -> String {
    let lower = word.to_lowercase();
    let out = f(&lower);
    if word.chars().next().is_some_and(char::is_uppercase) {
        capitalize(&out)
    } else {
        out
    }
}

fn pluralize_lower(word: &str) -> String {
    if word.is_empty() || UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(s, _)| *s == word) {
        return (*plural).to_string();
    }
    if IRREGULAR.iter().any(|(_, p)| *p == word) {
        return word.to_string();
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|s| word.ends_with(s)) {
        return format!("{word}es");
    }
    if let Some(stem) = word.strip_suffix('y') {
        if stem.chars().last().is_some_and(|c| !is_vowel(c)) {
            return format!("{stem}ies");
        }
    }
    format!("{word}s")
}

fn singularize_lower(word: &str) -> String {
    if word.is_empty() || UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    if let Some((singular, _)) = IRREGULAR.iter().find(|(_, p)| *p == word) {
        return (*singular).to_string();
    }
    if IRREGULAR.iter().any(|(s, _)| *s == word) {
        return word.to_string();
    }
    if word.len() > 3 {
        if let Some(stem) = word.strip_suffix("ies") {
            return format!("{stem}y");
        }
    }
    if ["sses", "shes", "ches", "xes", "zes"]
        .iter()
        .any(|s| word.ends_with(s))
    {
        return word[..word.len() - 2].to_string();
    }
    if let Some(stem) = word.strip_suffix("uses") {
        // causes → cause, statuses → status
        return if stem.chars().last().is_some_and(is_vowel) {
            format!("{stem}use")
        } else {
            format!("{stem}us")
        };
    }
    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return word.to_string();
    }
    match word.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => word.to_string(),
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

// ── Case conversion ──────────────────────────────────────────────────────────

/// Split an identifier into words on `_`, `-`, whitespace and case humps.
///
/// Acronym runs stay together: `HTTPServer` → `["HTTP", "Server"]`.
pub fn split_words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Convert to `snake_case`.
///
/// # Examples
/// ```
/// # use scaffy_codegen::inflect::to_snake_case;
/// assert_eq!(to_snake_case("BlogPost"), "blog_post");
/// assert_eq!(to_snake_case("authorId"), "author_id");
/// assert_eq!(to_snake_case("blog-post"), "blog_post");
/// ```
pub fn to_snake_case(s: &str) -> String {
    join_lower(s, "_")
}

/// Convert to `kebab-case`.
pub fn to_kebab_case(s: &str) -> String {
    join_lower(s, "-")
}

/// Convert to `PascalCase`.
///
/// # Examples
/// ```
/// # use scaffy_codegen::inflect::to_pascal_case;
/// assert_eq!(to_pascal_case("blog_post"), "BlogPost");
/// assert_eq!(to_pascal_case("blog-post"), "BlogPost");
/// assert_eq!(to_pascal_case("blogPost"), "BlogPost");
/// ```
pub fn to_pascal_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| capitalize(&w.to_lowercase()))
        .collect()
}

/// Convert to `camelCase`.
pub fn to_camel_case(s: &str) -> String {
    let pascal = to_pascal_case(s);
    let mut chars = pascal.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
    }
}

fn join_lower(s: &str, sep: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(sep)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plural_regular_suffixes() {
        assert_eq!(pluralize("post"), "posts");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("match"), "matches");
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("day"), "days");
    }

    #[test]
    fn plural_irregular_and_uncountable() {
        assert_eq!(pluralize("person"), "people");
        assert_eq!(pluralize("child"), "children");
        assert_eq!(pluralize("sheep"), "sheep");
        assert_eq!(pluralize("people"), "people");
    }

    #[test]
    fn singular_reverses_plural() {
        for word in ["post", "box", "category", "person", "status", "address", "movie"] {
            assert_eq!(singularize(&pluralize(word)), word, "round trip for {word}");
        }
    }

    #[test]
    fn singular_of_singular_is_stable() {
        assert_eq!(singularize("user"), "user");
        assert_eq!(singularize("address"), "address");
        assert_eq!(singularize("analysis"), "analysis");
        assert_eq!(singularize("news"), "news");
    }

    #[test]
    fn words_ending_in_as_keep_their_s() {
        for word in ["alias", "atlas", "canvas", "bias", "gas"] {
            assert_eq!(singularize(word), word);
            assert_eq!(singularize(&pluralize(word)), word, "round trip for {word}");
        }
        assert_eq!(pluralize("alias"), "aliases");
        assert_eq!(singularize("ideas"), "idea");
    }

    #[test]
    fn singular_uses_suffix() {
        assert_eq!(singularize("causes"), "cause");
        assert_eq!(singularize("buses"), "bus");
    }

    #[test]
    fn case_preserved() {
        assert_eq!(pluralize("Person"), "People");
        assert_eq!(singularize("Categories"), "Category");
    }

    #[test]
    fn split_words_handles_humps_and_separators() {
        assert_eq!(split_words("blogPost"), vec!["blog", "Post"]);
        assert_eq!(split_words("HTTPServer"), vec!["HTTP", "Server"]);
        assert_eq!(split_words("blog_post-item"), vec!["blog", "post", "item"]);
        assert_eq!(split_words("user2Fa"), vec!["user2", "Fa"]);
    }

    #[test]
    fn case_conversions() {
        assert_eq!(to_snake_case("BlogPost"), "blog_post");
        assert_eq!(to_kebab_case("BlogPost"), "blog-post");
        assert_eq!(to_camel_case("blog_post"), "blogPost");
        assert_eq!(to_pascal_case("HTTPServer"), "HttpServer");
        assert_eq!(to_camel_case(""), "");
    }
}
