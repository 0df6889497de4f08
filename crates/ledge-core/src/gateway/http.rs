//! HTTP gateway implementation
//!
//! Speaks the legacy server's dialect: form-encoded mutations, JSON
//! reads, a session cookie established by login, and 302 responses that
//! mean "accepted" rather than "go elsewhere". Redirects are therefore
//! never followed.

use async_trait::async_trait;
use reqwest::{redirect, Client, Response, StatusCode};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{BalanceSnapshot, Entry, EntryFilter, NewTransfer, RemoteEntry};

use super::types::{BalancesResponse, CollectionResponse, CreatedResponse};
use super::RemoteGateway;

/// Gateway over the legacy JSON/form HTTP API.
///
/// The client keeps the login session cookie in its cookie store and
/// attaches it to every later request. Construct once per server URL and
/// log in before use; the reconciler assumes an authenticated gateway.
#[derive(Clone)]
pub struct HttpGateway {
    http_client: Client,
    base_url: String,
}

impl HttpGateway {
    /// Create a gateway for the server at `base_url`.
    ///
    /// A trailing slash on the URL is stripped, matching how the server
    /// address is entered by hand in a config file.
    pub fn new(base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .cookie_store(true)
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The normalized server URL this gateway talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Accept 2xx and the legacy 302 success signal; anything else is a
    /// rejection carrying the status code.
    fn accepted(response: &Response) -> Result<()> {
        let status = response.status();
        if status.is_success() || status == StatusCode::FOUND {
            Ok(())
        } else {
            Err(Error::Rejected(status.as_u16()))
        }
    }

    fn entry_form(entry: &Entry) -> [(&'static str, String); 6] {
        [
            ("data_ocorrencia", entry.occurred_on.to_string()),
            ("descricao", entry.description.clone()),
            ("valor", entry.amount.to_string()),
            ("categoria", entry.category.clone()),
            ("conta", entry.account.clone()),
            // legacy flag: entries entered through clients are consolidated
            ("consolidado", "on".to_string()),
        ]
    }
}

/// Pull the numeric id out of a Location header like `/movimentacoes/41`.
fn id_from_location(location: &str) -> Option<i64> {
    let path = location.split(['?', '#']).next()?;
    path.rsplit('/').find(|s| !s.is_empty())?.parse().ok()
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn login(&self, email: &str, password: &str) -> Result<()> {
        let response = self
            .http_client
            .post(format!("{}/login", self.base_url))
            .form(&[("email", email), ("password", password)])
            .send()
            .await?;

        Self::accepted(&response)?;
        debug!("logged in as {}", email);
        Ok(())
    }

    async fn create_entry(&self, entry: &Entry) -> Result<i64> {
        let response = self
            .http_client
            .post(format!("{}/movimentacoes", self.base_url))
            .form(&Self::entry_form(entry))
            .send()
            .await?;

        Self::accepted(&response)?;

        // The legacy server answers 302 with the created resource in the
        // Location header; newer servers answer 200 with a JSON id.
        if response.status() == StatusCode::FOUND {
            response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .and_then(id_from_location)
                .ok_or_else(|| {
                    Error::InvalidData("create accepted but no id in Location header".to_string())
                })
        } else {
            let body = response.text().await?;
            let created: CreatedResponse = serde_json::from_str(&body)?;
            Ok(created.id)
        }
    }

    async fn update_entry(&self, remote_id: i64, entry: &Entry) -> Result<()> {
        let response = self
            .http_client
            .post(format!("{}/movimentacoes/update/{}", self.base_url, remote_id))
            .form(&Self::entry_form(entry))
            .send()
            .await?;

        Self::accepted(&response)
    }

    async fn delete_entry(&self, remote_id: i64) -> Result<()> {
        let response = self
            .http_client
            .delete(format!("{}/movimentacoes/{}", self.base_url, remote_id))
            .send()
            .await?;

        Self::accepted(&response)
    }

    async fn list_entries(&self, filter: &EntryFilter) -> Result<Vec<RemoteEntry>> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(ref search) = filter.search {
            query.push(("search_descricao", search.clone()));
        }
        if let Some(from) = filter.from {
            query.push(("start_date", from.to_string()));
        }
        if let Some(to) = filter.to {
            query.push(("end_date", to.to_string()));
        }
        if let Some(ref category) = filter.category {
            query.push(("category", category.clone()));
        }
        if let Some(ref account) = filter.account {
            query.push(("account", account.clone()));
        }

        let response = self
            .http_client
            .get(format!("{}/api/movimentacoes", self.base_url))
            .query(&query)
            .send()
            .await?;

        Self::accepted(&response)?;

        let collection: CollectionResponse = response.json().await?;
        debug!("pulled {} entries from server", collection.entries.len());
        Ok(collection.entries.into_iter().map(Into::into).collect())
    }

    async fn fetch_balances(&self) -> Result<BalanceSnapshot> {
        let response = self
            .http_client
            .get(format!("{}/api/saldos", self.base_url))
            .send()
            .await?;

        Self::accepted(&response)?;

        let balances: BalancesResponse = response.json().await?;
        Ok(balances.into())
    }

    async fn create_transfer(&self, transfer: &NewTransfer) -> Result<()> {
        let response = self
            .http_client
            .post(format!("{}/movimentacoes/transferencia", self.base_url))
            .form(&[
                ("data_ocorrencia", transfer.occurred_on.to_string()),
                ("descricao", transfer.description.clone()),
                ("valor", transfer.amount.to_string()),
                ("conta_origem", transfer.from_account.clone()),
                ("conta_destino", transfer.to_account.clone()),
            ])
            .send()
            .await?;

        Self::accepted(&response)
    }
}
