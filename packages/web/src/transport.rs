use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use ui::ContactTransport;

/// Posts the contact form URL-encoded through the browser's fetch.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

#[async_trait(?Send)]
impl ContactTransport for HttpTransport {
    async fn post_form(&self, action: &str, fields: &[(String, String)]) -> Result<()> {
        let response = self
            .client
            .post(action)
            .header(ACCEPT, "application/json")
            .form(fields)
            .send()
            .await
            .with_context(|| format!("POST {action}"))?;

        let status = response.status();
        if !status.is_success() {
            bail!("POST {action}: HTTP {status}");
        }
        tracing::debug!("transport.post_form: {status}");
        Ok(())
    }
}
