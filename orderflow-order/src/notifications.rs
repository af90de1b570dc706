use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};
use orderflow_core::{Channel, CoreError, CoreResult, NotificationService, Notifier, NotifierRegistry};
use orderflow_shared::Masked;

/// Resolves the notifier for a channel and sends through it
pub struct RegistryNotificationService {
    registry: Arc<NotifierRegistry>,
}

impl RegistryNotificationService {
    pub fn new(registry: Arc<NotifierRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl NotificationService for RegistryNotificationService {
    async fn send_notification(
        &self,
        channel: &Channel,
        recipient: &str,
        message: &str,
    ) -> CoreResult<()> {
        let notifier = self.registry.create(channel)?;
        debug!(%channel, recipient = %Masked(recipient), "Resolved notifier");
        notifier.notify(recipient, message).await
    }
}

pub struct EmailNotifier;

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(&self, recipient: &str, message: &str) -> CoreResult<()> {
        if !recipient.contains('@') {
            return Err(CoreError::NotificationFailure(format!(
                "not an email address: {}",
                Masked(recipient)
            )));
        }
        info!(channel = "email", to = %Masked(recipient), body = message, "Email sent");
        Ok(())
    }
}

pub struct SmsNotifier;

#[async_trait]
impl Notifier for SmsNotifier {
    async fn notify(&self, recipient: &str, message: &str) -> CoreResult<()> {
        if recipient.is_empty() {
            return Err(CoreError::NotificationFailure(
                "no phone number to text".to_string(),
            ));
        }
        info!(channel = "sms", to = %Masked(recipient), body = message, "SMS sent");
        Ok(())
    }
}

/// Channels with a built-in notifier
pub const BUILTIN_CHANNELS: [Channel; 2] = [Channel::Email, Channel::Sms];

fn builtin_factory(channel: &Channel) -> Option<fn() -> Box<dyn Notifier>> {
    let factory: fn() -> Box<dyn Notifier> = match channel {
        Channel::Email => || Box::new(EmailNotifier),
        Channel::Sms => || Box::new(SmsNotifier),
        Channel::Custom(_) => return None,
    };
    Some(factory)
}

/// Register the built-in notifier for `channel`.
/// Custom channels have no built-in and fail with `UnregisteredCapability`.
pub fn register_builtin(registry: &mut NotifierRegistry, channel: &Channel) -> CoreResult<()> {
    let factory = builtin_factory(channel).ok_or_else(|| CoreError::UnregisteredCapability {
        kind: registry.kind(),
        tag: channel.to_string(),
    })?;
    registry.register(channel.clone(), factory);
    Ok(())
}

pub fn new_registry() -> NotifierRegistry {
    NotifierRegistry::new("notifier")
}

pub fn builtin_registry() -> NotifierRegistry {
    let mut registry = new_registry();
    for channel in &BUILTIN_CHANNELS {
        if let Some(factory) = builtin_factory(channel) {
            registry.register(channel.clone(), factory);
        }
    }
    registry
}

pub fn registry_for(channels: &[Channel]) -> CoreResult<NotifierRegistry> {
    let mut registry = new_registry();
    for channel in channels {
        register_builtin(&mut registry, channel)?;
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    type Sent = Arc<Mutex<Vec<(String, String, String)>>>;

    struct Recording {
        channel: &'static str,
        sent: Sent,
    }

    #[async_trait]
    impl Notifier for Recording {
        async fn notify(&self, recipient: &str, message: &str) -> CoreResult<()> {
            self.sent.lock().unwrap().push((
                self.channel.to_string(),
                recipient.to_string(),
                message.to_string(),
            ));
            Ok(())
        }
    }

    fn recording_service() -> (RegistryNotificationService, Sent) {
        let sent: Sent = Arc::new(Mutex::new(Vec::new()));
        let mut registry = new_registry();
        let email_sink = sent.clone();
        let sms_sink = sent.clone();
        registry
            .register(Channel::Email, move || {
                Box::new(Recording { channel: "email", sent: email_sink.clone() })
            })
            .register(Channel::Sms, move || {
                Box::new(Recording { channel: "sms", sent: sms_sink.clone() })
            });
        (RegistryNotificationService::new(Arc::new(registry)), sent)
    }

    #[tokio::test]
    async fn test_service_routes_by_derived_channel() {
        let (service, sent) = recording_service();

        for recipient in ["a@b.com", "+15551234567", ""] {
            let channel = Channel::for_recipient(recipient);
            service.send_notification(&channel, recipient, "hi").await.unwrap();
        }

        let channels: Vec<String> = sent.lock().unwrap().iter().map(|(c, _, _)| c.clone()).collect();
        assert_eq!(channels, vec!["email", "sms", "sms"]);
    }

    #[tokio::test]
    async fn test_service_fails_for_unregistered_channel() {
        let (service, sent) = recording_service();
        let result = service
            .send_notification(&Channel::Custom("push".into()), "device-1", "hi")
            .await;

        assert!(matches!(result, Err(CoreError::UnregisteredCapability { .. })));
        assert!(sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_builtin_notifiers() {
        let service = RegistryNotificationService::new(Arc::new(builtin_registry()));

        assert!(service.send_notification(&Channel::Email, "bob@example.com", "Hi Bob!").await.is_ok());
        assert!(service.send_notification(&Channel::Sms, "+1234567890", "Hi Bob!").await.is_ok());

        let bad_email = service.send_notification(&Channel::Email, "+1234567890", "Hi").await;
        assert!(matches!(bad_email, Err(CoreError::NotificationFailure(_))));
        let empty_sms = service.send_notification(&Channel::Sms, "", "Hi").await;
        assert!(matches!(empty_sms, Err(CoreError::NotificationFailure(_))));
    }

    #[test]
    fn test_registry_for_channels() {
        let registry = registry_for(&[Channel::Sms]).unwrap();
        assert_eq!(registry.tags(), vec![Channel::Sms]);
        assert_eq!(registry_for(&BUILTIN_CHANNELS).unwrap().tags(), builtin_registry().tags());
        assert_eq!(builtin_registry().tags(), BUILTIN_CHANNELS.to_vec());
        assert!(registry_for(&[Channel::Custom("push".into())]).is_err());
    }
}
