use anyhow::Result;
use maix_httpd_parser::query::SCRATCH_LEN;
use maix_httpd_parser::{Reply, CMD_KEY};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Check {
    pub name: String,
    pub query: Option<String>,
}

impl Check {
    pub fn new(name: &str, query: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            query: query.map(str::to_string),
        }
    }

    pub fn cmd(value: &str) -> Self {
        Self::new(value, Some(&format!("{}={}", CMD_KEY, value)))
    }

    /// The query as the device receives it. The url parser percent-encodes
    /// characters such as `"` and space, and the device never decodes them.
    pub fn wire_query(&self, base: &str) -> Result<Option<String>> {
        let url = Url::parse(&self.url(base))?;
        Ok(url.query().filter(|q| !q.is_empty()).map(str::to_string))
    }

    /// The body the device should send. No query means no body.
    pub fn expected(&self, base: &str) -> Result<String> {
        Ok(match self.wire_query(base)? {
            Some(q) => Reply::from_query(&q).body(),
            None => String::new(),
        })
    }

    pub fn url(&self, base: &str) -> String {
        let base = base.trim_end_matches('/');
        match &self.query {
            Some(q) => format!("{}/?{}", base, q),
            None => format!("{}/", base),
        }
    }
}

pub fn suite() -> Vec<Check> {
    vec![
        Check::new("hello", Some("cmd=hello")),
        Check::new("version", Some("cmd=v")),
        Check::new("invalid cmd", Some("cmd=xyz")),
        Check::new("empty cmd", Some("cmd=")),
        Check::new("quoted cmd", Some("cmd=\"x")),
        Check::new("unknown param", Some("foo=bar")),
        Check::new(
            "oversized cmd",
            Some(&format!("cmd={}", "x".repeat(SCRATCH_LEN))),
        ),
        Check::new("no query", None),
    ]
}

/// Every field a device reply may carry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceReply {
    pub msg: Option<String>,
    pub version: Option<String>,
    pub err: Option<String>,
    pub cmd: Option<String>,
}

#[derive(Debug)]
pub struct Outcome {
    pub status: u16,
    pub content_type: Option<String>,
    pub expected: String,
    pub body: String,
}

impl Outcome {
    pub fn passed(&self) -> bool {
        if self.status != 200 || self.body != self.expected {
            return false;
        }
        if self.expected.is_empty() {
            return true;
        }
        let json = self
            .content_type
            .as_deref()
            .map(|ct| ct.starts_with("application/json"))
            .unwrap_or(false);
        json && self.reply().is_some()
    }

    pub fn reply(&self) -> Option<DeviceReply> {
        serde_json::from_str(&self.body).ok()
    }
}

pub async fn run_check(client: &Client, base: &str, check: &Check) -> Result<Outcome> {
    let url = check.url(base);
    let expected = check.expected(base)?;
    log::debug!("GET {}", url);
    let res = client.get(&url).send().await?;
    let status = res.status().as_u16();
    let content_type = res
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = res.text().await?;
    Ok(Outcome {
        status,
        content_type,
        expected,
        body,
    })
}
