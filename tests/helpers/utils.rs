use super::setup::{start_time, TestApp};
use attestation_scheduler_domain::{
    Asset, AttestationRecord, Campaign, PendingInvite, User, ID,
};
use chrono::Duration;

pub async fn create_campaign(app: &TestApp, started_days_ago: i64) -> Campaign {
    let campaign = Campaign::new(
        "Hardware attestation",
        start_time() - Duration::days(started_days_ago),
    );
    app.ctx
        .repos
        .campaigns
        .insert(&campaign)
        .await
        .expect("To insert campaign");
    campaign
}

pub async fn save_campaign(app: &TestApp, campaign: &Campaign) {
    app.ctx
        .repos
        .campaigns
        .save(campaign)
        .await
        .expect("To save campaign");
}

pub async fn get_campaign(app: &TestApp, campaign_id: &ID) -> Campaign {
    app.ctx
        .repos
        .campaigns
        .find(campaign_id)
        .await
        .unwrap()
        .expect("To find campaign")
}

pub async fn create_participant(
    app: &TestApp,
    campaign: &Campaign,
    email: &str,
    manager_email: Option<&str>,
) -> AttestationRecord {
    let mut user = User::new(email);
    user.manager_email = manager_email.map(String::from);
    app.ctx
        .repos
        .users
        .insert(&user)
        .await
        .expect("To insert user");

    let record = AttestationRecord::new(campaign.id, user.id);
    app.ctx
        .repos
        .attestation_records
        .insert(&record)
        .await
        .expect("To insert attestation record");
    record
}

pub async fn get_record(app: &TestApp, record_id: &ID) -> AttestationRecord {
    app.ctx
        .repos
        .attestation_records
        .find(record_id)
        .await
        .unwrap()
        .expect("To find attestation record")
}

pub async fn create_invite(app: &TestApp, campaign: &Campaign, email: &str) -> PendingInvite {
    let invite = PendingInvite::new(campaign.id, email, "invite-token");
    app.ctx
        .repos
        .pending_invites
        .insert(&invite)
        .await
        .expect("To insert pending invite");
    invite
}

pub async fn save_invite(app: &TestApp, invite: &PendingInvite) {
    app.ctx
        .repos
        .pending_invites
        .save(invite)
        .await
        .expect("To save pending invite");
}

pub async fn create_asset(app: &TestApp, owner_email: &str, manager_email: Option<&str>) {
    let mut asset = Asset::new("Dell XPS 13", owner_email);
    asset.manager_email = manager_email.map(String::from);
    app.ctx
        .repos
        .assets
        .insert(&asset)
        .await
        .expect("To insert asset");
}
