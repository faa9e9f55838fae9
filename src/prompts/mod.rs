//! Prompt templates for each operation.
//!
//! Templates are loaded from the `.txt` files next to this module at compile
//! time using `include_str!`, so they can be edited without dealing with Rust
//! string syntax. Placeholders look like `{{NAME}}`.

/// Number of recipe ideas requested per call
pub const RECIPE_IDEA_COUNT: usize = 3;

pub const RECIPE_IDEAS_PROMPT: &str = include_str!("recipe_ideas.txt");
pub const SUBSTITUTES_PROMPT: &str = include_str!("substitutes.txt");
pub const WINE_PAIRING_PROMPT: &str = include_str!("wine_pairing.txt");

/// Prompt asking for recipe ideas built from `ingredients`
pub fn recipe_ideas_prompt(ingredients: &str) -> String {
    let count = RECIPE_IDEA_COUNT.to_string();
    fill(
        RECIPE_IDEAS_PROMPT,
        &[("COUNT", count.as_str()), ("INGREDIENTS", ingredients.trim())],
    )
}

/// Prompt asking for substitutes of a single ingredient
pub fn substitutes_prompt(ingredient: &str) -> String {
    fill(SUBSTITUTES_PROMPT, &[("INGREDIENT", ingredient.trim())])
}

/// Prompt asking for a red and a white wine for a dish
pub fn wine_pairing_prompt(recipe_name: &str, ingredients: &[String]) -> String {
    let ingredients = ingredients.join(", ");
    fill(
        WINE_PAIRING_PROMPT,
        &[
            ("RECIPE", recipe_name.trim()),
            ("INGREDIENTS", ingredients.as_str()),
        ],
    )
}

/// Single pass substitution: values are never rescanned for placeholders.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template.trim_end();

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let key = &after[..end];
        match values.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}
