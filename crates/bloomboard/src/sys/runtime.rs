use crate::events::{AppEvent, BlurJob};
use async_channel::{Receiver, Sender};
use bloom::blur::Backdrop;
use std::thread;
use tokio::runtime::Runtime;

/// Runs blur jobs on a tokio thread and posts the results back to the UI.
pub fn start_background_services(jobs: Receiver<BlurJob>, tx: Sender<AppEvent>) {
    thread::spawn(move || {
        let rt = match Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("Failed to create Tokio runtime, blur disabled: {}", e);
                // hand snapshots back untouched so nodes still expand
                while let Ok(job) = jobs.recv_blocking() {
                    let event = AppEvent::BlurReady {
                        node: job.node,
                        backdrop: job.backdrop,
                    };
                    if tx.send_blocking(event).is_err() {
                        break;
                    }
                }
                return;
            }
        };

        rt.block_on(async {
            while let Ok(job) = jobs.recv().await {
                let tx = tx.clone();
                tokio::spawn(async move {
                    if let Err(e) = run_blur(job, tx).await {
                        log::error!("Blur job failed: {}", e);
                    }
                });
            }
            log::debug!("blur job channel closed, stopping background services");
        });
    });
}

async fn run_blur(job: BlurJob, tx: Sender<AppEvent>) -> anyhow::Result<()> {
    let BlurJob {
        node,
        radius,
        backdrop,
    } = job;
    let backdrop = run_filter(backdrop, move |b| b.blurred(radius)).await;
    log::debug!(
        "blurred {}x{} backdrop for node {node} (radius {radius})",
        backdrop.width,
        backdrop.height
    );
    tx.send(AppEvent::BlurReady { node, backdrop }).await?;
    Ok(())
}

/// Filters on the blocking pool. A failed worker yields an empty backdrop so
/// the waiting node still attaches its overlay.
async fn run_filter<F>(backdrop: Backdrop, filter: F) -> Backdrop
where
    F: FnOnce(Backdrop) -> Backdrop + Send + 'static,
{
    let (width, height) = (backdrop.width, backdrop.height);
    match tokio::task::spawn_blocking(move || filter(backdrop)).await {
        Ok(filtered) => filtered,
        Err(e) => {
            log::error!("Blur worker failed on {width}x{height} backdrop, expanding without it: {e}");
            Backdrop::new(0, 0, Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(node: usize) -> BlurJob {
        BlurJob {
            node,
            radius: 2.0,
            backdrop: Backdrop::new(3, 3, vec![90; 36]),
        }
    }

    #[tokio::test]
    async fn finished_blur_is_posted_back() {
        let (tx, rx) = async_channel::bounded(1);
        run_blur(job(4), tx).await.unwrap();

        let AppEvent::BlurReady { node, backdrop } = rx.recv().await.unwrap();
        assert_eq!(node, 4);
        assert_eq!((backdrop.width, backdrop.height), (3, 3));
    }

    #[tokio::test]
    async fn failed_worker_still_delivers_a_backdrop() {
        let backdrop = run_filter(job(0).backdrop, |_| panic!("filter blew up")).await;
        assert_eq!((backdrop.width, backdrop.height), (0, 0));
        assert!(backdrop.pixels.is_empty());
    }

    #[tokio::test]
    async fn closed_ui_channel_is_an_error() {
        let (tx, rx) = async_channel::bounded(1);
        drop(rx);
        assert!(run_blur(job(1), tx).await.is_err());
    }
}
