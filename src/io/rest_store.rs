use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};

use crate::io::store::{ListQuery, StoreError, TodoStore};
use crate::model::{NewTodo, Todo, TodoPatch};

/// Todo store backed by a PostgREST-style HTTP API (e.g. a Supabase table).
///
/// Rows are addressed with `?id=eq.<id>` filters; the anon key goes in the
/// `apikey` header and the user's token, when present, as a bearer token.
pub struct RestStore {
    client: Client,
    endpoint: String,
    api_key: String,
    access_token: Option<String>,
}

impl RestStore {
    pub fn new(
        base_url: &str,
        table: &str,
        api_key: &str,
        access_token: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(RestStore {
            client,
            endpoint: table_endpoint(base_url, table),
            api_key: api_key.to_string(),
            access_token: access_token.map(str::to_string),
        })
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.api_key);
        req.header("apikey", &self.api_key).bearer_auth(bearer)
    }
}

/// `<base>/rest/v1/<table>`, tolerating a trailing slash on the base URL
pub fn table_endpoint(base_url: &str, table: &str) -> String {
    format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), table)
}

/// Query string for a list request
pub fn list_params(query: ListQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("select", "*".to_string()),
        ("order", "created_at.desc".to_string()),
    ];
    if !query.include_archived {
        params.push(("is_archived", "eq.false".to_string()));
    }
    params
}

/// Row filter selecting a single id
pub fn id_filter(id: &str) -> Vec<(&'static str, String)> {
    vec![("id", format!("eq.{}", id))]
}

impl TodoStore for RestStore {
    fn list(&self, query: ListQuery) -> Result<Vec<Todo>, StoreError> {
        let response = self
            .authorize(self.client.get(&self.endpoint))
            .query(&list_params(query))
            .send()?
            .error_for_status()?;
        let todos: Vec<Todo> = response.json()?;
        tracing::debug!(count = todos.len(), ?query, "fetched todos");
        Ok(todos)
    }

    fn insert(&self, todo: &NewTodo) -> Result<Todo, StoreError> {
        let response = self
            .authorize(self.client.post(&self.endpoint))
            .header("Prefer", "return=representation")
            .json(todo)
            .send()?
            .error_for_status()?;
        let rows: Vec<Todo> = response.json()?;
        let created = rows.into_iter().next().ok_or(StoreError::EmptyResponse)?;
        tracing::info!(id = %created.id, "inserted todo");
        Ok(created)
    }

    fn update(&self, id: &str, patch: &TodoPatch) -> Result<(), StoreError> {
        self.authorize(self.client.patch(&self.endpoint))
            .query(&id_filter(id))
            .json(patch)
            .send()?
            .error_for_status()?;
        tracing::info!(id, "updated todo");
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.authorize(self.client.delete(&self.endpoint))
            .query(&id_filter(id))
            .send()?
            .error_for_status()?;
        tracing::info!(id, "deleted todo");
        Ok(())
    }
}
