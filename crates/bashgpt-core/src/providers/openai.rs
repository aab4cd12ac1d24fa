use super::provider::{LlmProvider, Message};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

pub struct OpenAiProvider {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiProvider {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

fn build_messages(messages: &[Message]) -> Vec<Value> {
    messages
        .iter()
        .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
        .collect()
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(&self, messages: &[Message], temperature: f64) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": build_messages(messages),
            "temperature": temperature,
        });

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        debug!(model = %self.model, messages = messages.len(), temperature, "completion request");
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body_text = resp.text().await.unwrap_or_default();
            anyhow::bail!("status {status}: {body_text}");
        }
        let data: Value = resp.json().await?;

        data["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("completion response has no message content: {data}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::{BodyExt, Full};
    use hyper::body::Bytes;
    use hyper::server::conn::http1;
    use hyper::service::service_fn;
    use hyper::{Request, Response, StatusCode};
    use hyper_util::rt::TokioIo;
    use std::convert::Infallible;
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serves one request, replying with `status` and `reply`, and hands the
    /// received request body back through the returned channel.
    async fn serve_once(
        status: StatusCode,
        reply: &'static str,
    ) -> (SocketAddr, oneshot::Receiver<(String, Value)>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();
        let tx = std::sync::Mutex::new(Some(tx));

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let tx = std::sync::Arc::new(tx);
            let handler = move |req: Request<hyper::body::Incoming>| {
                let tx = tx.clone();
                async move {
                    let auth = req
                        .headers()
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    let bytes = req.into_body().collect().await.unwrap().to_bytes();
                    let body: Value = serde_json::from_slice(&bytes).unwrap();
                    if let Some(tx) = tx.lock().unwrap().take() {
                        let _ = tx.send((auth, body));
                    }
                    let mut resp = Response::new(Full::new(Bytes::from(reply)));
                    *resp.status_mut() = status;
                    Ok::<_, Infallible>(resp)
                }
            };
            http1::Builder::new()
                .serve_connection(TokioIo::new(stream), service_fn(handler))
                .await
                .ok();
        });

        (addr, rx)
    }

    #[tokio::test]
    async fn sends_history_and_temperature_and_returns_reply() {
        let (addr, rx) = serve_once(
            StatusCode::OK,
            r#"{"choices":[{"message":{"role":"assistant","content":"hello there"}}]}"#,
        )
        .await;
        let provider = OpenAiProvider::new(format!("http://{addr}/v1/"), "sk-test", "gpt-test");
        let history = vec![Message::system("You are a helpful assistant."), Message::user("hi")];

        let reply = provider.complete(&history, 0.25).await.unwrap();
        assert_eq!(reply, "hello there");

        let (auth, body) = rx.await.unwrap();
        assert_eq!(auth, "Bearer sk-test");
        assert_eq!(body["model"], "gpt-test");
        assert_eq!(body["temperature"], 0.25);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
    }

    #[tokio::test]
    async fn decimal_temperature_is_sent_unchanged() {
        let (addr, rx) = serve_once(
            StatusCode::OK,
            r#"{"choices":[{"message":{"content":"ok"}}]}"#,
        )
        .await;
        let provider = OpenAiProvider::new(format!("http://{addr}"), "sk-test", "gpt-test");

        provider.complete(&[Message::user("hi")], 0.9).await.unwrap();

        let (_, body) = rx.await.unwrap();
        assert_eq!(body["temperature"], 0.9);
        assert_eq!(body["temperature"].to_string(), "0.9");
    }

    #[tokio::test]
    async fn error_status_is_surfaced() {
        let (addr, _rx) = serve_once(StatusCode::TOO_MANY_REQUESTS, "quota exceeded").await;
        let provider = OpenAiProvider::new(format!("http://{addr}"), "sk-test", "gpt-test");

        let err = provider.complete(&[Message::user("hi")], 0.5).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("429"), "got: {msg}");
        assert!(msg.contains("quota exceeded"), "got: {msg}");
    }

    #[tokio::test]
    async fn missing_content_is_an_error() {
        let (addr, _rx) = serve_once(StatusCode::OK, r#"{"choices":[]}"#).await;
        let provider = OpenAiProvider::new(format!("http://{addr}"), "sk-test", "gpt-test");

        let err = provider.complete(&[Message::user("hi")], 0.5).await.unwrap_err();
        assert!(err.to_string().contains("no message content"));
    }
}
