use reqwest::{header, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{ClientError, Result};

fn authorize(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.header(header::COOKIE, format!("token={}", token)),
        None => request,
    }
}

async fn send<T: DeserializeOwned>(request: RequestBuilder, token: Option<&str>) -> Result<T> {
    let response = authorize(request, token).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::Status { status, body });
    }

    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

pub async fn get<T: DeserializeOwned, Q: Serialize + ?Sized>(
    client: &reqwest::Client,
    url: &str,
    query: &Q,
    token: Option<&str>,
) -> Result<T> {
    send(client.get(url).query(query), token).await
}

pub async fn post_form<T: DeserializeOwned, B: Serialize + ?Sized>(
    client: &reqwest::Client,
    url: &str,
    body: &B,
    token: Option<&str>,
) -> Result<T> {
    send(client.post(url).form(body), token).await
}
