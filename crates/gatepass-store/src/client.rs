// Record store HTTP client
//
// Wraps `reqwest::Client` with store-specific URL construction and error
// translation. All methods are table-generic: callers pick the table name
// and the row type, this module handles filters, preference headers, and
// the store's error envelope.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Raw HTTP client for the record store's table API.
///
/// Rows are addressed as `/rest/v1/{table}` with `{field}=eq.{value}`
/// filter parameters. Inserts ask for `return=representation` so the
/// store-assigned columns (id, created_at) come back to the caller.
pub struct StoreClient {
    http: reqwest::Client,
    base_url: Url,
}

/// Error envelope returned by the store on non-2xx responses.
#[derive(Debug, serde::Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    code: Option<String>,
}

impl StoreClient {
    /// Create a new store client from a `TransportConfig`.
    ///
    /// `base_url` is the project root (e.g. `https://abc.example-db.co`);
    /// the `/rest/v1` prefix is appended per request.
    pub fn new(
        base_url: Url,
        api_key: &secrecy::SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client(api_key)?;
        Ok(Self { http, base_url })
    }

    /// Create a store client with a pre-built `reqwest::Client`.
    ///
    /// Use this in tests or when the caller already configured headers.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The store base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build the REST URL for a table: `{base}/rest/v1/{table}`
    pub(crate) fn table_url(&self, table: &str) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(["rest", "v1", table]);
        Ok(url)
    }

    // ── Row operations ───────────────────────────────────────────────

    /// Insert a row and return the stored representation.
    pub async fn insert<T: DeserializeOwned>(
        &self,
        table: &str,
        row: &impl Serialize,
    ) -> Result<T, Error> {
        let url = self.table_url(table)?;
        debug!(%url, table, "POST insert");

        let resp = self
            .http
            .post(url)
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await
            .map_err(Error::Transport)?;

        let mut rows: Vec<T> = self.parse_rows(resp).await?;
        if rows.is_empty() {
            return Err(Error::EmptyInsert {
                table: table.into(),
            });
        }
        Ok(rows.swap_remove(0))
    }

    /// Fetch the single row where `{field} = {value}`.
    pub async fn select_one<T: DeserializeOwned>(
        &self,
        table: &str,
        field: &str,
        value: &str,
    ) -> Result<T, Error> {
        let mut url = self.table_url(table)?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair(field, &format!("eq.{value}"))
            .append_pair("limit", "1");
        debug!(%url, table, field, "GET select_one");

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;

        let mut rows: Vec<T> = self.parse_rows(resp).await?;
        if rows.is_empty() {
            return Err(Error::RowNotFound {
                table: table.into(),
                filter: format!("{field}=eq.{value}"),
            });
        }
        Ok(rows.swap_remove(0))
    }

    /// Fetch all rows where `{field} = {value}`, optionally ordered.
    ///
    /// `order` follows the store's syntax, e.g. `"scheduled_date.desc"`.
    pub async fn select_list<T: DeserializeOwned>(
        &self,
        table: &str,
        field: &str,
        value: &str,
        order: Option<&str>,
    ) -> Result<Vec<T>, Error> {
        let mut url = self.table_url(table)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("select", "*")
                .append_pair(field, &format!("eq.{value}"));
            if let Some(order) = order {
                pairs.append_pair("order", order);
            }
        }
        debug!(%url, table, field, "GET select_list");

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        self.parse_rows(resp).await
    }

    /// Delete the row with the given primary id. Idempotent: deleting an
    /// absent row is not an error at this layer.
    pub async fn delete(&self, table: &str, id: &str) -> Result<(), Error> {
        let mut url = self.table_url(table)?;
        url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));
        debug!(%url, table, id, "DELETE");

        let resp = self
            .http
            .delete(url)
            .header("Prefer", "return=minimal")
            .send()
            .await
            .map_err(Error::Transport)?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(self.error_from_response(resp).await)
        }
    }

    // ── Response handling ────────────────────────────────────────────

    /// Parse a 2xx response body as a row array, or translate the store's
    /// error envelope into an [`Error`].
    async fn parse_rows<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<Vec<T>, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(self.error_from_response(resp).await);
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    async fn error_from_response(&self, resp: reqwest::Response) -> Error {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let parsed: Option<ApiErrorBody> = serde_json::from_str(&body).ok();

        let (message, code) = match parsed {
            Some(envelope) => (
                envelope.message.unwrap_or_else(|| body.clone()),
                envelope.code,
            ),
            None => (body, None),
        };

        Error::Api {
            message,
            code,
            status,
        }
    }
}
