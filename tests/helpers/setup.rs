use attestation_scheduler_infra::{AttestationContext, InMemoryNotificationGateway, StaticTimeSys};
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

pub struct TestApp {
    pub ctx: AttestationContext,
    pub notifications: Arc<InMemoryNotificationGateway>,
    pub sys: Arc<StaticTimeSys>,
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 6, 0, 0).unwrap()
}

// In-memory stores, a recording notification gateway and a clock the test controls
pub fn spawn_app() -> TestApp {
    let mut ctx = AttestationContext::create_inmemory();
    let notifications = Arc::new(InMemoryNotificationGateway::new());
    let sys = Arc::new(StaticTimeSys::new(start_time()));
    ctx.services.notifications = notifications.clone();
    ctx.sys = sys.clone();

    TestApp {
        ctx,
        notifications,
        sys,
    }
}
