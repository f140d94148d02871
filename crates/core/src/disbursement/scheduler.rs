//! Monthly scheduler loop.

use std::future::Future;

use tracing::{error, info};

use super::next_cycle_start;
use crate::service::{FinanceRepository, FinanceService};

/// Runs a disbursement cycle at 00:00 UTC on the 1st of every month until
/// `shutdown` resolves.
///
/// With `run_on_startup` one cycle runs immediately; periods that were
/// already paid are skipped, so a catch-up run is safe.
pub async fn run_scheduler<R, F>(service: FinanceService<R>, run_on_startup: bool, shutdown: F)
where
    R: FinanceRepository,
    F: Future<Output = ()> + Send,
{
    tokio::pin!(shutdown);

    if run_on_startup {
        run_cycle(&service).await;
    }

    loop {
        let now = service.now();
        let next = next_cycle_start(now);
        let wait = (next - now).to_std().unwrap_or_default();
        info!(next_run = %next, "Disbursement scheduler waiting");

        tokio::select! {
            biased;
            () = &mut shutdown => {
                info!("Disbursement scheduler stopped");
                break;
            }
            () = tokio::time::sleep(wait) => {
                run_cycle(&service).await;
            }
        }
    }
}

async fn run_cycle<R: FinanceRepository>(service: &FinanceService<R>) {
    if let Err(e) = service.run_disbursement_cycle().await {
        error!(error = %e, "Disbursement cycle could not run");
    }
}
