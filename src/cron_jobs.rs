use std::time::Duration;

use log::{error, info};
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::modules::models::admin::AdminToken;
use crate::modules::models::general::establish_connection;

/// delete every admin token that is past its expiry
pub async fn purge_expired_tokens() {
    let conn = &mut establish_connection();

    match AdminToken::purge_expired(conn) {
        Ok(0) => {}
        Ok(purged) => {
            info!(target:"cron_jobs:purge_expired_tokens", "purged {} expired admin tokens", purged);
        }
        Err(error) => {
            error!(target:"cron_jobs:purge_expired_tokens", "failed purging expired tokens: (error: {})", error);
        }
    }
}

pub async fn register_cron_jobs() {
    let scheduler = JobScheduler::new().await.unwrap();

    // run every hour
    let j = Job::new_repeated_async(Duration::from_secs(3600), |_uuid, _l| {
        Box::pin(async {
            purge_expired_tokens().await;
        })
    })
    .unwrap();
    scheduler.add(j).await.unwrap();
    scheduler.start().await.unwrap();
}
