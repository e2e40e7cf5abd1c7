//! Firestore REST documents.
//!
//! The REST API wraps every field in a type tag (`{"integerValue": "4"}`).
//! [`decode_document`] strips those tags so the rest of the crate sees the
//! same plain JSON the web client sees.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::{Map, Number, Value};
use tracing::{debug, info};

use crate::fetch::{HttpClient, fetch_bytes};
use crate::store::DocumentStore;

/// Returns `true` for a REST-shaped document (`name` plus `fields`).
pub fn is_typed_document(doc: &Value) -> bool {
    doc.get("name").is_some_and(Value::is_string)
        && (doc.get("fields").is_some_and(Value::is_object) || doc.get("createTime").is_some())
}

/// Converts a REST document into a plain object.
///
/// The document id (last segment of `name`) is added as `id` unless a field
/// already uses that key.
pub fn decode_document(doc: &Value) -> Value {
    let mut object = decode_fields(doc.get("fields"));

    if let Some(id) = doc
        .get("name")
        .and_then(Value::as_str)
        .and_then(|name| name.rsplit('/').next())
        .filter(|id| !id.is_empty())
    {
        object
            .entry("id")
            .or_insert_with(|| Value::String(id.to_string()));
    }

    Value::Object(object)
}

fn decode_fields(fields: Option<&Value>) -> Map<String, Value> {
    fields
        .and_then(Value::as_object)
        .map(|fields| {
            fields
                .iter()
                .map(|(key, value)| (key.clone(), decode_value(value)))
                .collect()
        })
        .unwrap_or_default()
}

/// Decodes one type-tagged value. Unknown or malformed tags become `null`.
pub fn decode_value(value: &Value) -> Value {
    let Some((kind, inner)) = value.as_object().and_then(|m| m.iter().next()) else {
        return Value::Null;
    };

    match kind.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" => inner.as_bool().map(Value::Bool).unwrap_or(Value::Null),
        "integerValue" => match inner {
            Value::String(s) => s.parse::<i64>().map(Value::from).unwrap_or(Value::Null),
            Value::Number(n) => Value::Number(n.clone()),
            _ => Value::Null,
        },
        // NaN and Infinity arrive as strings and have no JSON number form
        "doubleValue" => inner
            .as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        "stringValue" | "timestampValue" | "bytesValue" | "referenceValue" => inner
            .as_str()
            .map(|s| Value::String(s.to_string()))
            .unwrap_or(Value::Null),
        "geoPointValue" => inner.clone(),
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        "mapValue" => Value::Object(decode_fields(inner.get("fields"))),
        _ => Value::Null,
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListPage {
    #[serde(default)]
    documents: Vec<Value>,
    next_page_token: Option<String>,
}

/// Parses one page of a `documents.list` response into plain documents and
/// the token for the next page.
pub fn parse_list_page(bytes: &[u8]) -> Result<(Vec<Value>, Option<String>)> {
    let page: ListPage = serde_json::from_slice(bytes).context("invalid list response")?;
    let documents = page.documents.iter().map(decode_document).collect();
    let token = page.next_page_token.filter(|t| !t.is_empty());
    Ok((documents, token))
}

/// Reads collections from the hosted document store over REST.
pub struct FirestoreStore<C> {
    client: C,
    base_url: String,
    project_id: String,
    page_size: usize,
}

impl<C: HttpClient> FirestoreStore<C> {
    pub fn new(client: C, base_url: &str, project_id: &str, page_size: usize) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
            page_size: page_size.max(1),
        }
    }

    pub fn collection_url(&self, collection: &str, page_token: Option<&str>) -> Result<Url> {
        let raw = format!(
            "{}/projects/{}/databases/(default)/documents/{}",
            self.base_url, self.project_id, collection
        );
        let mut url = Url::parse(&raw).with_context(|| format!("invalid store URL '{raw}'"))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("pageSize", &self.page_size.to_string());
            if let Some(token) = page_token {
                query.append_pair("pageToken", token);
            }
        }
        Ok(url)
    }
}

/// Drives a paginated listing. `fetch_page` gets the token for the page to
/// fetch (`None` for the first) and returns the raw response body.
///
/// Stops once a page comes back without a token. Fails if the same token is
/// handed out twice in a row. Returns the documents and the page count.
async fn collect_pages<F, Fut>(collection: &str, mut fetch_page: F) -> Result<(Vec<Value>, usize)>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Vec<u8>>>,
{
    let mut documents = Vec::new();
    let mut token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let bytes = fetch_page(token.clone()).await?;
        let (page, next) = parse_list_page(&bytes)?;
        pages += 1;
        debug!(page = pages, documents = page.len(), "Fetched page");
        documents.extend(page);

        match next {
            Some(next) if token.as_deref() == Some(next.as_str()) => {
                bail!("store returned the same page token twice for '{collection}'")
            }
            Some(next) => token = Some(next),
            None => break,
        }
    }

    Ok((documents, pages))
}

#[async_trait]
impl<C: HttpClient> DocumentStore for FirestoreStore<C> {
    #[tracing::instrument(skip(self))]
    async fn list(&self, collection: &str) -> Result<Vec<Value>> {
        let (documents, pages) = collect_pages(collection, |token| {
            let url = self.collection_url(collection, token.as_deref());
            async move {
                let url = url?;
                fetch_bytes(&self.client, url.as_str())
                    .await
                    .with_context(|| format!("failed to list collection '{collection}'"))
            }
        })
        .await?;

        info!(
            collection,
            project = %self.project_id,
            pages,
            documents = documents.len(),
            "Collection listed"
        );
        Ok(documents)
    }
}
