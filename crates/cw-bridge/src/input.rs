//! Message text sources for `send`

use std::path::Path;

use anyhow::Context;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Where the message text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSource<'a> {
    Literal(&'a str),
    File(&'a Path),
    Stdin,
}

/// Read the text from its source and trim it. `None` when nothing usable.
pub async fn resolve_text(source: Option<TextSource<'_>>) -> anyhow::Result<Option<String>> {
    let text = match source {
        None => return Ok(None),
        Some(TextSource::Literal(text)) => text.to_string(),
        Some(TextSource::File(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read message file {}", path.display()))?,
        Some(TextSource::Stdin) => read_all(tokio::io::stdin())
            .await
            .context("failed to read message from stdin")?,
    };

    let text = text.trim();
    Ok((!text.is_empty()).then(|| text.to_string()))
}

async fn read_all<R: AsyncRead + Unpin>(mut reader: R) -> std::io::Result<String> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf).await?;
    Ok(buf)
}
