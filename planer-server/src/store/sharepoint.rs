//! SharePoint REST implementation of [`ListStore`].

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, header};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{ListQuery, ListStore, Row, StoreError, StoreResult};
use crate::token::TokenProvider;

const ODATA_JSON: &str = "application/json;odata=nometadata";

/// One page of a list read.
#[derive(Debug, Default, Deserialize)]
struct Page {
    #[serde(default)]
    value: Vec<Row>,
    #[serde(rename = "odata.nextLink", default)]
    next_link: Option<String>,
}

pub struct SharePointStore {
    http: reqwest::Client,
    /// `https://{site}{site_path}/_api`
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
    page_size: u32,
}

impl SharePointStore {
    pub fn new(
        http: reqwest::Client,
        base_url: String,
        tokens: Arc<dyn TokenProvider>,
        page_size: u32,
    ) -> Self {
        SharePointStore {
            http,
            base_url,
            tokens,
            page_size,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn authorized(&self, builder: RequestBuilder) -> StoreResult<RequestBuilder> {
        let token = self.tokens.valid_token().await?;
        Ok(builder
            .bearer_auth(token)
            .header(header::ACCEPT, ODATA_JSON))
    }

    async fn send(
        &self,
        method: &'static str,
        path: &str,
        builder: RequestBuilder,
    ) -> StoreResult<Response> {
        debug!(method, path, "SharePoint request");
        let response = self.authorized(builder).await?.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Upstream {
                method,
                path: path.to_string(),
                status,
                body,
            });
        }

        Ok(response)
    }

    async fn get_page(&self, path: String) -> StoreResult<Page> {
        let response = self.send("GET", &path, self.http.get(self.url(&path))).await?;
        response
            .json()
            .await
            .map_err(|e| StoreError::Decode(format!("GET {path}: {e}")))
    }

    fn write(&self, path: &str, body: Option<&Row>) -> RequestBuilder {
        let builder = self.http.post(self.url(path));
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, ODATA_JSON)
                .body(Value::Object(body.clone()).to_string()),
            None => builder,
        }
    }
}

fn items_path(list: &str) -> String {
    format!("web/lists/getbytitle('{}')/items", list)
}

fn item_path(list: &str, id: u64) -> String {
    format!("{}({})", items_path(list), id)
}

/// First page of a list read: `$top`, then the optional query parts.
fn read_path(list: &str, query: &ListQuery, page_size: u32) -> String {
    let mut path = format!("{}?$top={}", items_path(list), page_size);

    if let Some(select) = query.select {
        path.push_str(&format!("&$select={}", select));
    }
    if let Some(filter) = &query.filter {
        let encoded: String = url::form_urlencoded::byte_serialize(filter.to_odata().as_bytes())
            .collect::<String>()
            .replace('+', "%20");
        path.push_str(&format!("&$filter={}", encoded));
    }
    if let Some(order_by) = query.order_by {
        path.push_str(&format!("&$orderby={}", order_by));
    }

    path
}

/// The part of an `odata.nextLink` after `/_api/`.
fn next_path(link: &str) -> Option<String> {
    link.split_once("/_api/").map(|(_, rest)| rest.to_string())
}

/// Follow `odata.nextLink` until the last page, concatenating rows.
async fn collect_pages<F, Fut>(first: String, mut fetch: F) -> StoreResult<Vec<Row>>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = StoreResult<Page>>,
{
    let mut rows = Vec::new();
    let mut next = Some(first);

    while let Some(path) = next {
        let page = fetch(path).await?;
        rows.extend(page.value);
        next = page.next_link.as_deref().and_then(next_path);
    }

    Ok(rows)
}

#[async_trait]
impl ListStore for SharePointStore {
    async fn get_all(&self, list: &str, query: &ListQuery) -> StoreResult<Vec<Row>> {
        let first = read_path(list, query, self.page_size);
        let rows = collect_pages(first, |path| self.get_page(path)).await?;
        debug!(list, rows = rows.len(), "List read");
        Ok(rows)
    }

    async fn create(&self, list: &str, row: Row) -> StoreResult<Row> {
        let path = items_path(list);
        let response = self.send("POST", &path, self.write(&path, Some(&row))).await?;

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Row::new());
        }
        serde_json::from_str(&text).map_err(|e| StoreError::Decode(format!("POST {path}: {e}")))
    }

    async fn merge(&self, list: &str, id: u64, patch: Row) -> StoreResult<()> {
        let path = item_path(list, id);
        let builder = self
            .write(&path, Some(&patch))
            .header(header::IF_MATCH, "*")
            .header("X-HTTP-Method", "MERGE");
        self.send("MERGE", &path, builder).await?;
        Ok(())
    }

    async fn delete(&self, list: &str, id: u64) -> StoreResult<()> {
        let path = item_path(list, id);
        let builder = self
            .write(&path, None)
            .header(header::IF_MATCH, "*")
            .header("X-HTTP-Method", "DELETE");
        self.send("DELETE", &path, builder).await?;
        Ok(())
    }

    async fn list_titles(&self) -> StoreResult<Vec<String>> {
        let page = self.get_page("web/lists?$select=Title&$top=50".to_string()).await?;
        Ok(page
            .value
            .iter()
            .filter_map(|row| row.get("Title").and_then(Value::as_str))
            .map(str::to_string)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Filter;
    use crate::token::StaticToken;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_read_path() {
        let query = ListQuery::new("Id,Title,PersNr")
            .filter(Filter::eq("Aktiv", true))
            .order_by("Gruppe,Title");
        assert_eq!(
            read_path("Mitarbeiter", &query, 1000),
            "web/lists/getbytitle('Mitarbeiter')/items?$top=1000&$select=Id,Title,PersNr\
             &$filter=Aktiv%20eq%201&$orderby=Gruppe,Title"
        );

        let bare = read_path("Zuweisungen", &ListQuery::default(), 50);
        assert_eq!(bare, "web/lists/getbytitle('Zuweisungen')/items?$top=50");
    }

    #[test]
    fn test_filter_quotes_are_encoded() {
        let query = ListQuery::default().filter(Filter::eq("Title", "1-2026-03-10"));
        assert!(read_path("Abwesenheiten", &query, 1000).ends_with("&$filter=Title%20eq%20%271-2026-03-10%27"));
    }

    #[test]
    fn test_next_path() {
        assert_eq!(
            next_path("https://x.sharepoint.com/sites/a/_api/web/lists/getbytitle('M')/items?$skiptoken=Paged%3dTRUE"),
            Some("web/lists/getbytitle('M')/items?$skiptoken=Paged%3dTRUE".to_string())
        );
        assert_eq!(next_path("garbage"), None);
    }

    #[test]
    fn test_item_path() {
        assert_eq!(item_path("Gantt chart", 7), "web/lists/getbytitle('Gantt chart')/items(7)");
    }

    #[tokio::test]
    async fn test_requests_carry_token_and_odata_accept() {
        let store = SharePointStore::new(
            reqwest::Client::new(),
            "https://contoso.sharepoint.com/sites/a/_api".into(),
            Arc::new(StaticToken("secret".into())),
            1000,
        );
        let url = store.url("web/lists");
        assert_eq!(url, "https://contoso.sharepoint.com/sites/a/_api/web/lists");

        let request = store
            .authorized(store.http.get(url))
            .await
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.headers()[header::AUTHORIZATION], "Bearer secret");
        assert_eq!(request.headers()[header::ACCEPT], ODATA_JSON);
    }

    #[tokio::test]
    async fn test_collect_pages_follows_next_link() {
        let mut pages: HashMap<String, Page> = HashMap::new();
        pages.insert(
            "first".into(),
            serde_json::from_value(json!({
                "value": [{ "Id": 1 }, { "Id": 2 }],
                "odata.nextLink": "https://x/sites/a/_api/second"
            }))
            .unwrap(),
        );
        pages.insert(
            "second".into(),
            serde_json::from_value(json!({ "value": [{ "Id": 3 }] })).unwrap(),
        );

        let mut requested = Vec::new();
        let rows = collect_pages("first".to_string(), |path| {
            requested.push(path.clone());
            let page = pages.remove(&path).unwrap_or_default();
            async move { Ok(page) }
        })
        .await
        .unwrap();

        let ids: Vec<i64> = rows.iter().map(|r| r["Id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(requested, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_collect_pages_propagates_errors() {
        let result = collect_pages("first".to_string(), |path| async move {
            Err::<Page, _>(StoreError::Upstream {
                method: "GET",
                path,
                status: 403,
                body: "Access denied".into(),
            })
        })
        .await;

        assert_eq!(
            result.unwrap_err().to_string(),
            "SP GET first: 403 Access denied"
        );
    }
}
