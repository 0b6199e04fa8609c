//! Directory registration at startup.

use anyhow::Result;
use tracing::info;

use veil_proto::v1::RegisterNodeRequest;

/// Announce this relay's public key to the directory.
///
/// Single attempt: a conflict or unreachable directory is a startup
/// error surfaced to the caller, not retried.
pub async fn register_with_directory(
    client: &reqwest::Client,
    directory_url: &str,
    node_id: u32,
    pub_key: String,
) -> Result<()> {
    let url = format!("{}/registerNode", directory_url.trim_end_matches('/'));
    let resp = client
        .post(&url)
        .json(&RegisterNodeRequest { node_id, pub_key })
        .send()
        .await?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("directory rejected registration ({status}): {body}");
    }

    info!(node_id, directory_url, "registered with directory");
    Ok(())
}
