use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use papyrus::application::ports::RasterizerError;
use papyrus::infrastructure::rasterizer::{check_page_limit, run_cancellable};
use tokio::sync::oneshot;

#[test]
fn given_page_count_within_limit_when_checking_then_accepts() {
    assert!(check_page_limit(0, 500).is_ok());
    assert!(check_page_limit(500, 500).is_ok());
}

#[test]
fn given_page_count_over_limit_when_checking_then_reports_count_and_limit() {
    let result = check_page_limit(600, 500);

    assert!(matches!(
        result,
        Err(RasterizerError::TooManyPages {
            count: 600,
            max: 500
        })
    ));
}

#[tokio::test]
async fn given_blocking_work_when_it_completes_then_returns_its_result() {
    let result = run_cancellable(|cancelled: &AtomicBool| {
        assert!(!cancelled.load(Ordering::Relaxed));
        Ok(vec![vec![1u8], vec![2u8]])
    })
    .await;

    assert_eq!(result.unwrap(), vec![vec![1u8], vec![2u8]]);
}

#[tokio::test]
async fn given_caller_times_out_when_work_is_running_then_work_sees_cancellation() {
    let (observed_tx, observed_rx) = oneshot::channel();

    let outcome = tokio::time::timeout(
        Duration::from_millis(50),
        run_cancellable(move |cancelled: &AtomicBool| {
            for _ in 0..500 {
                if cancelled.load(Ordering::Relaxed) {
                    let _ = observed_tx.send(true);
                    return Err::<(), _>(RasterizerError::Cancelled);
                }
                std::thread::sleep(Duration::from_millis(10));
            }
            let _ = observed_tx.send(false);
            Ok(())
        }),
    )
    .await;
    assert!(outcome.is_err(), "caller should have timed out");

    let observed = tokio::time::timeout(Duration::from_secs(5), observed_rx)
        .await
        .expect("blocking work did not stop")
        .unwrap();
    assert!(observed, "cancellation flag was never raised");
}
