use async_trait::async_trait;
use tokio::sync::Mutex;

/// A visitor message for the portfolio owner.
#[derive(Clone, Debug)]
pub struct ContactMessage {
    pub sender_name: String,
    pub sender_email: String,
    pub body: String,
}

/// Contract of the outbound mail relay.
///
/// Sends are fire-and-forget: the outcome is surfaced to the caller once and
/// never retried.
#[async_trait]
pub trait MailRelay: Send + Sync {
    async fn send(&self, recipient: &str, message: &ContactMessage) -> anyhow::Result<()>;
}

#[derive(Clone, Debug)]
pub struct SentMail {
    pub recipient: String,
    pub message: ContactMessage,
}

/// In-memory relay recording every send.
#[derive(Debug, Default)]
pub struct MemoryMail {
    sent: Mutex<Vec<SentMail>>,
}

impl MemoryMail {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl MailRelay for MemoryMail {
    async fn send(&self, recipient: &str, message: &ContactMessage) -> anyhow::Result<()> {
        self.sent.lock().await.push(SentMail {
            recipient: recipient.to_string(),
            message: message.clone(),
        });
        Ok(())
    }
}
