use std::path::Path;

use anyhow::Result;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, info, warn};

use super::errors::SmsError;
use crate::config::Config;
use crate::models::{SendSmsBatchResponse, SendSmsPayload, SendSmsResponse};

// SMS API endpoints
const SEND_SMS_ENDPOINT: &str = "/send-sms";
const SEND_SMS_BATCH_ENDPOINT: &str = "/send-sms-batch";

/// Thin client for the external SMS API
#[derive(Debug, Clone)]
pub struct SmsClient {
    client: Client,
    base_url: String,
}

impl SmsClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.http_client()?, config.api_base_url.clone()))
    }

    /// Send one message
    pub async fn send_sms(&self, payload: &SendSmsPayload) -> Result<SendSmsResponse, SmsError> {
        let url = format!("{}{}", self.base_url, SEND_SMS_ENDPOINT);
        info!("Sending SMS from {} to {}", payload.from, payload.to);

        let response = self.client.post(&url).json(payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("send-sms answered {}", status);
            return Err(SmsError::RequestFailed {
                status: status.as_u16(),
                message: "Failed to send SMS".to_string(),
            });
        }

        let reply: SendSmsResponse = response.json().await?;
        debug!("send-sms reply: success={} message={}", reply.success, reply.message);
        Ok(reply)
    }

    /// Upload a CSV of recipients as one campaign
    pub async fn send_sms_batch(&self, file: &Path) -> Result<SendSmsBatchResponse, SmsError> {
        let url = format!("{}{}", self.base_url, SEND_SMS_BATCH_ENDPOINT);

        let content = tokio::fs::read(file).await.map_err(|source| SmsError::ReadFile {
            path: file.to_path_buf(),
            source,
        })?;
        let file_name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.csv".to_string());

        info!("Uploading batch {} ({} bytes)", file_name, content.len());

        let part = Part::bytes(content)
            .file_name(file_name)
            .mime_str("text/csv")?;
        let form = Form::new().part("file", part);

        let response = self.client.post(&url).multipart(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("send-sms-batch answered {}", status);
            return Err(SmsError::RequestFailed {
                status: status.as_u16(),
                message: "Failed to send SMS batch".to_string(),
            });
        }

        let reply: SendSmsBatchResponse = response.json().await?;
        info!(
            "Batch accepted: status={} batches={} messages={}",
            reply.status, reply.total_batches, reply.total_messages
        );
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{body_json, header_regex, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn payload() -> SendSmsPayload {
        SendSmsPayload {
            to: "+1234567890".to_string(),
            from: "Biz".to_string(),
            message: "Hi".to_string(),
        }
    }

    #[tokio::test]
    async fn test_send_sms_posts_json() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/send-sms"))
            .and(body_json(serde_json::json!({
                "to": "+1234567890",
                "from": "Biz",
                "message": "Hi"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"success":true,"message":"queued"}"#),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = SmsClient::new(Client::new(), format!("{}/", mock_server.uri()));
        let reply = client.send_sms(&payload()).await.unwrap();
        assert!(reply.success);
        assert_eq!(reply.message, "queued");
    }

    #[tokio::test]
    async fn test_send_sms_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/send-sms"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&mock_server)
            .await;

        let client = SmsClient::new(Client::new(), mock_server.uri());
        let err = client.send_sms(&payload()).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to send SMS");
        assert!(matches!(err, SmsError::RequestFailed { status: 502, .. }));
    }

    #[tokio::test]
    async fn test_send_batch_uploads_multipart() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/send-sms-batch"))
            .and(header_regex("content-type", "^multipart/form-data"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"status":"accepted","total_batches":1,"total_messages":2}"#,
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("recipients.csv");
        std::fs::write(
            &file,
            "phone,name,message\n+1234567890,John,Hello John!\n+1234567891,Jane,Hello Jane!\n",
        )
        .unwrap();

        let client = SmsClient::new(Client::new(), mock_server.uri());
        let reply = client.send_sms_batch(&file).await.unwrap();
        assert_eq!(reply.total_batches, 1);
        assert_eq!(reply.total_messages, 2);
    }

    #[tokio::test]
    async fn test_send_batch_missing_file() {
        let client = SmsClient::new(Client::new(), "http://127.0.0.1:9");
        let err = client
            .send_sms_batch(Path::new("/definitely/not/here.csv"))
            .await
            .unwrap_err();
        assert!(matches!(err, SmsError::ReadFile { .. }));
    }
}
