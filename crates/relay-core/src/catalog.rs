//! Static endpoint catalog.
//!
//! Each route module declares its endpoints as `const` [`EndpointInfo`]
//! values. The server publishes the grouped catalog on `/settings` so
//! clients can discover what is available.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// Endpoint grouping shown to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Downloader,
    Search,
    Random,
    Tools,
    Ai,
}

impl Category {
    /// Human readable group name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Downloader => "Downloader",
            Self::Search => "Search",
            Self::Random => "Random",
            Self::Tools => "Tools",
            Self::Ai => "AI",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

/// A documented request parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParamInfo {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

impl ParamInfo {
    pub const fn required(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            required: true,
            description,
        }
    }

    pub const fn optional(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            required: false,
            description,
        }
    }
}

/// Description of one registered endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EndpointInfo {
    pub name: &'static str,
    pub path: &'static str,
    pub category: Category,
    pub methods: &'static [HttpMethod],
    pub description: &'static str,
    pub params: &'static [ParamInfo],
}

/// Methods used by nearly every integration.
pub const GET_POST: &[HttpMethod] = &[HttpMethod::Get, HttpMethod::Post];

impl EndpointInfo {
    /// Path with an empty query template for every parameter,
    /// e.g. `/search/youtube?query=&limit=`.
    pub fn example_path(&self) -> String {
        if self.params.is_empty() {
            return self.path.to_string();
        }
        let query: Vec<String> = self.params.iter().map(|p| format!("{}=", p.name)).collect();
        format!("{}?{}", self.path, query.join("&"))
    }

    /// Names of the required parameters.
    pub fn required_params(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.params.iter().filter(|p| p.required).map(|p| p.name)
    }
}

/// Groups endpoints by category, keeping first-seen order.
pub fn group_by_category<'a, I>(endpoints: I) -> IndexMap<Category, Vec<&'a EndpointInfo>>
where
    I: IntoIterator<Item = &'a EndpointInfo>,
{
    let mut groups: IndexMap<Category, Vec<&'a EndpointInfo>> = IndexMap::new();
    for endpoint in endpoints {
        groups.entry(endpoint.category).or_default().push(endpoint);
    }
    groups
}
