use chrono::{DateTime, Utc};
use mongodb::bson::{oid::ObjectId, Bson, Document};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;

use crate::utils::{AppError, UploadKind, Validate};

/// Identity and timestamps shared by every stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMeta {
    #[serde(rename = "_id")]
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecordMeta {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new().to_hex(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Same identity, `updatedAt` moved to now.
    pub fn touched(&self) -> Self {
        Self {
            id: self.id.clone(),
            created_at: self.created_at,
            updated_at: Utc::now().max(self.updated_at),
        }
    }
}

impl Default for RecordMeta {
    fn default() -> Self {
        Self::new()
    }
}

/// A record type stored in its own collection.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: &'static str;
    /// Human name used in messages ("Product not found").
    const LABEL: &'static str;
    /// Fields the list endpoint accepts as equality filters.
    const FILTERS: &'static [&'static str] = &[];
    /// Set for resources created from multipart forms with an attachment.
    const UPLOAD: Option<UploadKind> = None;

    fn meta(&self) -> &RecordMeta;

    fn search_text(&self) -> Option<&str> {
        None
    }

    fn attachment(&self) -> Option<&str> {
        None
    }

    fn set_attachment(&mut self, _path: String) {}
}

/// A resource clients create and fully replace through a request body.
pub trait Editable: Resource {
    type Input: DeserializeOwned + Validate + 'static;

    fn from_input(input: Self::Input, meta: RecordMeta) -> Self;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Parsed list parameters: `sort`, `search` and the resource's equality filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub sort: SortOrder,
    pub search: Option<String>,
    pub filters: Document,
}

impl ListQuery {
    pub fn from_params<T: Resource>(params: &HashMap<String, String>) -> Result<Self, AppError> {
        let sort = match params.get("sort").map(|s| s.trim().to_ascii_lowercase()) {
            None => SortOrder::Desc,
            Some(s) if s.is_empty() || s == "desc" => SortOrder::Desc,
            Some(s) if s == "asc" => SortOrder::Asc,
            Some(other) => {
                return Err(AppError::InvalidRequest(format!(
                    "sort must be 'asc' or 'desc', got '{}'",
                    other
                )))
            }
        };

        let search = params
            .get("search")
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let mut filters = Document::new();
        for field in T::FILTERS {
            if let Some(value) = params.get(*field).filter(|v| !v.is_empty()) {
                filters.insert(*field, Bson::String(value.clone()));
            }
        }

        Ok(Self { sort, search, filters })
    }

    /// Applies search and ordering to records already narrowed by `filters`.
    pub fn apply<T: Resource>(&self, mut records: Vec<T>) -> Vec<T> {
        if let Some(term) = &self.search {
            records.retain(|r| {
                r.search_text()
                    .map(|text| text.to_lowercase().contains(term.as_str()))
                    .unwrap_or(true)
            });
        }

        records.sort_by(|a, b| {
            let ordering = a.meta().created_at.cmp(&b.meta().created_at);
            match self.sort {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        records
    }
}

/// Generates a text-valued enum whose serialized form is the given label.
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            /// Case-insensitive lookup by label.
            pub fn parse(value: &str) -> Option<Self> {
                let value = value.trim();
                Self::ALL.iter().copied().find(|v| v.as_str().eq_ignore_ascii_case(value))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::ALL[0]
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// A `string_enum!` for workflow states, where an omitted value means the first state.
macro_rules! status_enum {
    ($(#[$meta:meta])* $name:ident { $($body:tt)* }) => {
        $crate::models::resource::string_enum! { $(#[$meta])* $name { $($body)* } }

        impl $name {
            /// Empty input means the first variant.
            pub fn parse_or_default(value: &str) -> Option<Self> {
                if value.trim().is_empty() {
                    Some(Self::default())
                } else {
                    Self::parse(value)
                }
            }
        }
    };
}

pub(crate) use status_enum;
pub(crate) use string_enum;
