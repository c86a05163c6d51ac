use attestation_scheduler_domain::NotificationResult;

/// Collapses the two ways a gateway can report a failed delivery into one.
/// Returns the failure reason, or `None` if the notification was delivered.
pub fn delivery_error(result: anyhow::Result<NotificationResult>) -> Option<String> {
    match result {
        Ok(res) if res.success => None,
        Ok(res) => Some(
            res.error
                .unwrap_or_else(|| "Notification gateway reported failure".into()),
        ),
        Err(e) => Some(format!("{:?}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_failure_forms_are_failures() {
        assert_eq!(delivery_error(Ok(NotificationResult::sent())), None);
        assert_eq!(
            delivery_error(Ok(NotificationResult::failed("bounced"))),
            Some("bounced".into())
        );
        assert_eq!(
            delivery_error(Ok(NotificationResult {
                success: false,
                error: None
            })),
            Some("Notification gateway reported failure".into())
        );
        assert!(delivery_error(Err(anyhow::anyhow!("timeout"))).is_some());
    }
}
