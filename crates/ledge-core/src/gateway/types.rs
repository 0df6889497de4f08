//! Wire DTOs for the sync server's API
//!
//! The server predates this client and speaks Portuguese field names;
//! the serde renames keep that contract at the edge so the rest of the
//! crate stays in domain terms.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::{AccountBalance, BalanceSnapshot, RemoteEntry};

/// One entry as returned by `GET /api/movimentacoes`.
#[derive(Debug, Deserialize)]
pub(crate) struct EntryDto {
    pub id: i64,
    #[serde(rename = "data_ocorrencia")]
    pub occurred_on: NaiveDate,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "valor")]
    pub amount: f64,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "conta")]
    pub account: String,
}

impl From<EntryDto> for RemoteEntry {
    fn from(dto: EntryDto) -> Self {
        RemoteEntry {
            remote_id: dto.id,
            occurred_on: dto.occurred_on,
            description: dto.description,
            amount: dto.amount,
            category: dto.category,
            account: dto.account,
        }
    }
}

/// Envelope of the collection endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct CollectionResponse {
    #[serde(rename = "movimentacoes")]
    pub entries: Vec<EntryDto>,
}

/// One account's balance in the `GET /api/saldos` response.
#[derive(Debug, Deserialize)]
pub(crate) struct AccountBalanceDto {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "saldo_atual")]
    pub balance: f64,
}

/// Envelope of the balances endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct BalancesResponse {
    #[serde(rename = "saldoGeral")]
    pub overall: f64,
    #[serde(rename = "saldosContas")]
    pub accounts: Vec<AccountBalanceDto>,
}

impl From<BalancesResponse> for BalanceSnapshot {
    fn from(dto: BalancesResponse) -> Self {
        BalanceSnapshot {
            overall: dto.overall,
            accounts: dto
                .accounts
                .into_iter()
                .map(|a| AccountBalance {
                    name: a.name,
                    balance: a.balance,
                })
                .collect(),
        }
    }
}

/// Body of a modern create response (the legacy server answers 302 with
/// a Location header instead).
#[derive(Debug, Deserialize)]
pub(crate) struct CreatedResponse {
    pub id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_collection_response() {
        let body = r#"{
            "movimentacoes": [
                {
                    "id": 7,
                    "data_ocorrencia": "2025-06-10",
                    "descricao": "Street market",
                    "valor": -52.4,
                    "categoria": "Food",
                    "conta": "Checking"
                }
            ]
        }"#;

        let parsed: CollectionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.entries.len(), 1);

        let entry: RemoteEntry = parsed.entries.into_iter().next().unwrap().into();
        assert_eq!(entry.remote_id, 7);
        assert_eq!(entry.occurred_on.to_string(), "2025-06-10");
        assert_eq!(entry.amount, -52.4);
        assert_eq!(entry.account, "Checking");
    }

    #[test]
    fn parses_balances_response() {
        let body = r#"{
            "saldoGeral": 1200.5,
            "saldosContas": [
                {"nome": "Checking", "saldo_atual": 900.5},
                {"nome": "Savings", "saldo_atual": 300.0}
            ]
        }"#;

        let parsed: BalancesResponse = serde_json::from_str(body).unwrap();
        let snapshot: BalanceSnapshot = parsed.into();
        assert_eq!(snapshot.overall, 1200.5);
        assert_eq!(snapshot.accounts.len(), 2);
        assert_eq!(snapshot.accounts[0].name, "Checking");
    }

    #[test]
    fn parses_created_response() {
        let parsed: CreatedResponse = serde_json::from_str(r#"{"id": 41}"#).unwrap();
        assert_eq!(parsed.id, 41);
    }
}
