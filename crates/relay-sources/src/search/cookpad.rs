//! Cookpad (Indonesia) recipe search.
//!
//! The listing page gives ids and titles; detail pages are fetched
//! concurrently and read from their `ld+json` Recipe block.

use futures::future::join_all;
use scraper::Html;
use serde::Serialize;
use serde_json::Value;
use tracing::{instrument, warn};

use crate::client::HttpClient;
use crate::error::{Result, SourceError};
use crate::html;
use crate::validate;

pub const DEFAULT_LIMIT: usize = 5;

#[derive(Debug, Clone, Default, Serialize)]
pub struct RecipeStep {
    pub text: String,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub url: String,
    pub thumb: Option<String>,
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servings: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ingredients: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<RecipeStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_published: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<String>,
    /// Set when the detail page could not be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipeResults {
    pub query: String,
    pub count: usize,
    pub recipes: Vec<Recipe>,
}

#[derive(Debug, Clone)]
pub struct Cookpad {
    http: HttpClient,
    base: String,
}

impl Cookpad {
    pub fn new(http: HttpClient, base: impl Into<String>) -> Self {
        Self {
            http,
            base: base.into(),
        }
    }

    #[instrument(skip_all, fields(service = "cookpad"))]
    pub async fn search(&self, query: &str, limit: Option<usize>) -> Result<RecipeResults> {
        let query = validate::non_empty(query, "q")?;
        let limit = limit.unwrap_or(DEFAULT_LIMIT).max(1);

        let request = self.http.get(format!(
            "{}/id/cari/{}",
            self.base,
            urlencoding::encode(query)
        ));
        let page = self.http.text(request).await?;
        let listing = parse_listing(&page, &self.base, limit)?;

        if listing.is_empty() {
            return Err(SourceError::not_found(format!("No recipes found for '{}'", query)));
        }

        let recipes = join_all(listing.into_iter().map(|recipe| self.with_detail(recipe))).await;

        Ok(RecipeResults {
            query: query.to_string(),
            count: recipes.len(),
            recipes,
        })
    }

    async fn with_detail(&self, mut recipe: Recipe) -> Recipe {
        let detail = match self.http.text(self.http.get(&recipe.url)).await {
            Ok(page) => parse_detail(&page),
            Err(e) => Err(e),
        };

        match detail {
            Ok(detail) => merge(&mut recipe, detail),
            Err(e) => {
                warn!(recipe = %recipe.id, error = %e, "Recipe detail unavailable");
                recipe.error = Some(e.to_string());
            },
        }
        recipe
    }
}

fn parse_listing(page: &str, base: &str, limit: usize) -> Result<Vec<Recipe>> {
    let doc = Html::parse_document(page);
    let item = html::selector(r#"li[id^="recipe_"]"#)?;
    let title = html::selector("a.block-link__main")?;
    let thumb = html::selector(r#"picture img[fetchpriority="auto"]"#)?;
    let author = html::selector(".flex.items-center.mt-auto span.text-cookpad-gray-600")?;

    Ok(doc
        .select(&item)
        .take(limit)
        .filter_map(|li| {
            let id = li.value().id()?.trim_start_matches("recipe_").to_string();
            Some(Recipe {
                url: format!("{}/id/resep/{}", base, id),
                title: html::first_text(li, &title).unwrap_or_default(),
                thumb: html::first_attr(li, &thumb, "src"),
                author: html::first_text(li, &author),
                id,
                ..Recipe::default()
            })
        })
        .collect())
}

/// Finds the `@type: Recipe` object among the page's ld+json blocks.
fn parse_detail(page: &str) -> Result<Recipe> {
    let doc = Html::parse_document(page);
    let scripts = html::selector(r#"script[type="application/ld+json"]"#)?;
    let prep = html::selector(r#"div[id*="cooking_time_recipe_"] span.mise-icon-text"#)?;

    let recipe = doc
        .select(&scripts)
        .filter_map(|el| serde_json::from_str::<Value>(&el.text().collect::<String>()).ok())
        .flat_map(|json| match json {
            Value::Array(items) => items,
            other => vec![other],
        })
        .find(|json| json["@type"] == "Recipe")
        .ok_or_else(|| SourceError::parse("Recipe detail not found"))?;

    let steps = recipe["recipeInstructions"]
        .as_array()
        .map(|steps| {
            steps
                .iter()
                .map(|s| RecipeStep {
                    text: s["text"].as_str().unwrap_or_default().trim().to_string(),
                    images: strings(&s["image"]),
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(Recipe {
        title: text(&recipe["name"]).unwrap_or_default(),
        author: text(&recipe["author"]["name"]),
        description: text(&recipe["description"]),
        image_url: strings(&recipe["image"]).into_iter().next(),
        servings: text(&recipe["recipeYield"]),
        prep_time: html::doc_text(&doc, &prep),
        ingredients: strings(&recipe["recipeIngredient"]),
        steps,
        date_published: text(&recipe["datePublished"]),
        date_modified: text(&recipe["dateModified"]),
        ..Recipe::default()
    })
}

fn merge(recipe: &mut Recipe, detail: Recipe) {
    if !detail.title.is_empty() {
        recipe.title = detail.title;
    }
    if detail.author.is_some() {
        recipe.author = detail.author;
    }
    recipe.description = detail.description;
    recipe.image_url = detail.image_url;
    recipe.servings = detail.servings;
    recipe.prep_time = detail.prep_time;
    recipe.ingredients = detail.ingredients;
    recipe.steps = detail.steps;
    recipe.date_published = detail.date_published;
    recipe.date_modified = detail.date_modified;
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A string or an array of strings.
fn strings(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}
