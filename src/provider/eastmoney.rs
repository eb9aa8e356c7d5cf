use std::time::Duration;

use futures::FutureExt;
use itertools::Itertools;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, REFERER, USER_AGENT},
    Client,
};
use serde_json::Value as Json;

use super::{Provider, ProviderError, ProviderResult, RateLimiter};
use crate::data::{
    fields::{FIELD_NORTH_DATE, FIELD_VALUE, KLINE_FIELDS, SPOT_FIELD_CODES},
    Market, Row, Snapshot, Value,
};

const CLIST_URL: &str = "https://push2.eastmoney.com/api/qt/clist/get";
const KLINE_URL: &str = "https://push2his.eastmoney.com/api/qt/stock/kline/get";
const NORTH_URL: &str = "https://push2his.eastmoney.com/api/qt/kamt.kline/get";
const UT: &str = "fa5fd1943c7b386f172d6893dbfba10b";
const MAX_RETRIES: u32 = 2;
const RETRY_BACKOFF: Duration = Duration::from_millis(300);

const INDEX_FS: &str = "m:1+s:2,m:0+t:5";
const PAGE_SIZE: usize = 100;
const MAX_PAGES: usize = 100;

/// Eastmoney push2 / push2his JSON endpoints
pub struct EastmoneyProvider {
    client: Client,
    limiter: RateLimiter,
}

impl EastmoneyProvider {
    pub fn new() -> Result<Self, ProviderError> {
        Ok(Self {
            client: create_client()?,
            limiter: RateLimiter::new(5, 10)
                .with_max_retries(MAX_RETRIES)
                .with_backoff(RETRY_BACKOFF),
        })
    }

    async fn get_json(
        &self,
        name: &str,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Json, ProviderError> {
        let client = &self.client;
        self.limiter
            .execute(name, move || async move {
                let resp = client.get(url).query(query).send().await?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(ProviderError::BadStatus(status.as_u16()));
                }
                let body = resp.text().await?;
                Ok(serde_json::from_str(&body)?)
            })
            .await
    }

    /// Walk every page of a list query
    async fn clist(&self, name: &str, fs: &str) -> Result<Snapshot, ProviderError> {
        let fields = SPOT_FIELD_CODES
            .iter()
            .map(|(code, _)| *code)
            .join(",");
        let mut rows = Vec::new();

        for page in 1..=MAX_PAGES {
            let query = [
                ("pn", page.to_string()),
                ("pz", PAGE_SIZE.to_string()),
                ("po", "1".to_string()),
                ("np", "1".to_string()),
                ("ut", UT.to_string()),
                ("fltt", "2".to_string()),
                ("invt", "2".to_string()),
                ("fid", "f12".to_string()),
                ("fs", fs.to_string()),
                ("fields", fields.clone()),
            ];
            let json = self.get_json(name, CLIST_URL, &query).await?;

            let (total, page_rows) = match parse_clist(&json) {
                // past the last page the payload has no data
                Err(ProviderError::MissingData) if page > 1 => break,
                result => result?,
            };
            let fetched = page_rows.len();
            rows.extend(page_rows);

            tracing::trace!(name, page, fetched, total, "列表分页");
            if fetched == 0 || rows.len() >= total {
                break;
            }
        }

        Ok(Snapshot::new(rows))
    }
}

impl Provider for EastmoneyProvider {
    fn index_spot(&self) -> ProviderResult<'_> {
        self.clist("index_spot", INDEX_FS).boxed()
    }

    fn stock_spot(&self, market: Market) -> ProviderResult<'_> {
        async move { self.clist("stock_spot", market_fs(market)).await }.boxed()
    }

    fn north_flow(&self, market: Market) -> ProviderResult<'_> {
        async move {
            let query = [
                ("fields1", "f1,f3,f5".to_string()),
                ("fields2", "f51,f52".to_string()),
                ("klt", "101".to_string()),
                ("lmt", "500".to_string()),
                ("ut", UT.to_string()),
            ];
            let json = self.get_json("north_flow", NORTH_URL, &query).await?;
            parse_north(&json, market)
        }
        .boxed()
    }

    fn history<'a>(&'a self, code: &'a str, start: &'a str, end: &'a str) -> ProviderResult<'a> {
        async move {
            let query = [
                ("secid", secid(code)),
                ("ut", UT.to_string()),
                ("fields1", "f1,f2,f3,f4,f5,f6".to_string()),
                ("fields2", "f51,f52,f53,f54,f55,f56,f57".to_string()),
                ("klt", "101".to_string()),
                ("fqt", "1".to_string()),
                ("beg", start.to_string()),
                ("end", end.to_string()),
            ];
            let json = self.get_json("history", KLINE_URL, &query).await?;
            parse_kline(&json)
        }
        .boxed()
    }
}

fn create_client() -> Result<Client, ProviderError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        ),
    );
    headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
    headers.insert(REFERER, HeaderValue::from_static("https://quote.eastmoney.com"));

    Ok(Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(10))
        .build()?)
}

fn market_fs(market: Market) -> &'static str {
    match market {
        Market::SH => "m:1+t:2,m:1+t:23",
        Market::SZ => "m:0+t:6,m:0+t:80",
    }
}

/// `1.600519` for Shanghai listings, `0.000858` otherwise
fn secid(code: &str) -> String {
    let code = code.trim();
    match Market::of_code(code) {
        Market::SH => format!("1.{code}"),
        Market::SZ => format!("0.{code}"),
    }
}

fn data_of(json: &Json) -> Result<&Json, ProviderError> {
    json.get("data")
        .filter(|d| !d.is_null())
        .ok_or(ProviderError::MissingData)
}

fn to_value(json: &Json) -> Value {
    match json {
        Json::Number(n) => n.as_f64().map_or_else(|| Value::from(n.to_string()), Value::from),
        Json::String(s) => Value::from(s.as_str()),
        other => Value::from(other.to_string()),
    }
}

fn parse_number(text: &str) -> Value {
    text.trim()
        .parse::<f64>()
        .map_or_else(|_| Value::from(text), Value::from)
}

/// Total row count and the rows of one list page
fn parse_clist(json: &Json) -> Result<(usize, Vec<Row>), ProviderError> {
    let data = data_of(json)?;
    let total = data
        .get("total")
        .and_then(Json::as_u64)
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);

    // `diff` is an array with np=1 and an index-keyed object otherwise
    let items: Vec<&Json> = match data.get("diff") {
        Some(Json::Array(items)) => items.iter().collect(),
        Some(Json::Object(items)) => items.values().collect(),
        _ => vec![],
    };

    let rows = items
        .into_iter()
        .map(|item| {
            SPOT_FIELD_CODES
                .iter()
                .filter_map(|(code, field)| Some(((*field).to_string(), to_value(item.get(*code)?))))
                .collect()
        })
        .collect();

    Ok((total, rows))
}

fn parse_north(json: &Json, market: Market) -> Result<Snapshot, ProviderError> {
    let key = match market {
        Market::SH => "hk2sh",
        Market::SZ => "hk2sz",
    };
    let lines = data_of(json)?
        .get(key)
        .and_then(Json::as_array)
        .ok_or(ProviderError::MissingData)?;

    Ok(lines
        .iter()
        .filter_map(Json::as_str)
        .filter_map(|line| line.split_once(','))
        .map(|(date, value)| {
            Row::from([
                (FIELD_NORTH_DATE.to_string(), Value::from(date)),
                (FIELD_VALUE.to_string(), parse_number(value)),
            ])
        })
        .collect())
}

fn parse_kline(json: &Json) -> Result<Snapshot, ProviderError> {
    let lines = data_of(json)?
        .get("klines")
        .and_then(Json::as_array)
        .ok_or(ProviderError::MissingData)?;

    Ok(lines
        .iter()
        .filter_map(Json::as_str)
        .map(|line| {
            KLINE_FIELDS
                .iter()
                .zip(line.split(','))
                .enumerate()
                .map(|(i, (field, raw))| {
                    let value = if i == 0 { Value::from(raw) } else { parse_number(raw) };
                    ((*field).to_string(), value)
                })
                .collect()
        })
        .collect())
}
