use crate::alerts::{self, Origin};
use crate::collectors::Sampler;
use crate::config::{Config, ErrorPolicy, Target};
use crate::error::RunError;
use crate::models::usage::UsageSample;
use crate::util::notify::Notifier;
use tracing::{error, info, warn};

const SEPARATOR: &str = "------------------------------------------------------------";

/// Outcome of one pass over every configured target.
#[derive(Debug, Default)]
pub struct RunReport {
    pub sampled:     usize,
    pub alerts_sent: usize,
    /// Per-target failures recorded under `on_error = "continue"`.
    pub failures:    Vec<RunError>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Sample every target in order and publish an alert for each one over threshold.
///
/// Under [`ErrorPolicy::Abort`] the first failure is returned immediately and
/// later targets are never touched. Under [`ErrorPolicy::Continue`] failures
/// are collected in the report.
pub async fn run(
    cfg: &Config,
    sampler: &dyn Sampler,
    notifier: &dyn Notifier,
    origin: &Origin,
) -> Result<RunReport, RunError> {
    let mut report = RunReport::default();

    for target in &cfg.targets {
        info!(">> Evaluating disk usage for - {} ({})", target.label, target.path.display());

        let outcome = check_target(cfg.threshold, target, sampler, notifier, origin).await;
        info!("{}", SEPARATOR);

        match outcome {
            Ok(sent) => {
                report.sampled += 1;
                if sent { report.alerts_sent += 1; }
            }
            Err(e) => match cfg.on_error {
                ErrorPolicy::Abort => return Err(e),
                ErrorPolicy::Continue => {
                    if matches!(e, RunError::Notification { .. }) { report.sampled += 1; }
                    error!(">> {} (continuing with remaining targets)", e);
                    report.failures.push(e);
                }
            },
        }
    }

    Ok(report)
}

/// Returns whether an alert was published for this target.
async fn check_target(
    threshold: u8,
    target: &Target,
    sampler: &dyn Sampler,
    notifier: &dyn Notifier,
    origin: &Origin,
) -> Result<bool, RunError> {
    let used_pct = sampler.sample(&target.path).map_err(|source| RunError::Sampling {
        label: target.label.clone(),
        source,
    })?;
    let sample = UsageSample::new(target, used_pct);

    let Some(alert) = alerts::evaluate(&sample, threshold, origin) else {
        info!(">> Disk usage at {}%, within the {}% threshold. No need to worry!", used_pct, threshold);
        return Ok(false);
    };

    warn!(">> WARNING: disk usage at {}%, above the {}% threshold!", used_pct, threshold);
    notifier
        .publish(&alert.message())
        .await
        .map_err(|source| RunError::Notification { label: target.label.clone(), source })?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SamplerKind;
    use crate::error::{NotificationError, SamplingError};
    use async_trait::async_trait;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    /// Returns canned percentages per path; paths mapped to `None` fail to parse.
    struct ScriptedSampler {
        values: HashMap<PathBuf, Option<u8>>,
        calls:  RefCell<Vec<PathBuf>>,
    }

    impl ScriptedSampler {
        fn new(values: &[(&str, Option<u8>)]) -> Self {
            Self {
                values: values.iter().map(|(p, v)| (PathBuf::from(p), *v)).collect(),
                calls:  RefCell::new(Vec::new()),
            }
        }
    }

    impl Sampler for ScriptedSampler {
        fn sample(&self, path: &Path) -> Result<u8, SamplingError> {
            self.calls.borrow_mut().push(path.to_path_buf());
            match self.values.get(path) {
                Some(Some(v)) => Ok(*v),
                _ => Err(SamplingError::Unparsable { output: "Use%\n garbage\n".into() }),
            }
        }
    }

    /// Records published messages; the first `fail_first` publishes are rejected.
    #[derive(Default)]
    struct RecordingNotifier {
        sent:       Mutex<Vec<String>>,
        attempts:   Mutex<usize>,
        fail_first: usize,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn publish(&self, message: &str) -> Result<(), NotificationError> {
            let attempt = {
                let mut n = self.attempts.lock().unwrap();
                *n += 1;
                *n
            };
            if attempt <= self.fail_first {
                return Err(NotificationError::Publish {
                    topic:  "t".into(),
                    reason: "AuthorizationError".into(),
                });
            }
            self.sent.lock().unwrap().push(message.to_string());
            Ok(())
        }
    }

    impl RecordingNotifier {
        fn messages(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }
    }

    fn config(targets: &[(&str, &str)], on_error: ErrorPolicy) -> Config {
        Config {
            threshold: 80,
            topic:     "arn:aws:sns:ap-southeast-2:000000000000:disk".into(),
            region:    "ap-southeast-2".into(),
            on_error,
            sampler:   SamplerKind::Df,
            targets:   targets.iter().map(|(l, p)| Target::new(*l, *p)).collect(),
        }
    }

    fn origin() -> Origin {
        Origin { host: "host".into(), checked_at: "now".into() }
    }

    #[tokio::test]
    async fn root_ok_data_full_sends_one_alert() {
        let cfg = config(&[("ROOT", "/"), ("DATA", "/mnt/data")], ErrorPolicy::Abort);
        let sampler = ScriptedSampler::new(&[("/", Some(45)), ("/mnt/data", Some(91))]);
        let notifier = RecordingNotifier::default();

        let report = run(&cfg, &sampler, &notifier, &origin()).await.unwrap();

        assert!(report.is_success());
        assert_eq!(report.sampled, 2);
        assert_eq!(report.alerts_sent, 1);
        let sent = notifier.messages();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("DATA"));
        assert!(sent[0].contains("91"));
    }

    #[tokio::test]
    async fn notification_count_matches_targets_over_threshold() {
        let cfg = config(
            &[("A", "/a"), ("B", "/b"), ("C", "/c"), ("D", "/d"), ("E", "/e")],
            ErrorPolicy::Abort,
        );
        let sampler = ScriptedSampler::new(&[
            ("/a", Some(80)),
            ("/b", Some(81)),
            ("/c", Some(0)),
            ("/d", Some(100)),
            ("/e", Some(79)),
        ]);
        let notifier = RecordingNotifier::default();

        let report = run(&cfg, &sampler, &notifier, &origin()).await.unwrap();

        assert_eq!(report.alerts_sent, 2);
        let sent = notifier.messages();
        assert_eq!(sent.len(), 2);
        assert!(sent[0].contains("drive B"));
        assert!(sent[1].contains("drive D"));
    }

    #[tokio::test]
    async fn at_or_below_threshold_sends_nothing() {
        let cfg = config(&[("ROOT", "/")], ErrorPolicy::Abort);
        let sampler = ScriptedSampler::new(&[("/", Some(80))]);
        let notifier = RecordingNotifier::default();

        let report = run(&cfg, &sampler, &notifier, &origin()).await.unwrap();

        assert_eq!(report.alerts_sent, 0);
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn sampling_failure_aborts_before_later_targets() {
        let cfg = config(&[("A", "/a"), ("BAD", "/bad"), ("C", "/c")], ErrorPolicy::Abort);
        let sampler = ScriptedSampler::new(&[("/a", Some(10)), ("/bad", None), ("/c", Some(99))]);
        let notifier = RecordingNotifier::default();

        let err = run(&cfg, &sampler, &notifier, &origin()).await.unwrap_err();

        assert!(matches!(err, RunError::Sampling { .. }));
        assert_eq!(err.label(), "BAD");
        assert_eq!(*sampler.calls.borrow(), vec![PathBuf::from("/a"), PathBuf::from("/bad")]);
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn notification_failure_aborts_run() {
        let cfg = config(&[("A", "/a"), ("B", "/b")], ErrorPolicy::Abort);
        let sampler = ScriptedSampler::new(&[("/a", Some(95)), ("/b", Some(95))]);
        let notifier = RecordingNotifier { fail_first: usize::MAX, ..Default::default() };

        let err = run(&cfg, &sampler, &notifier, &origin()).await.unwrap_err();

        assert!(matches!(err, RunError::Notification { .. }));
        assert_eq!(sampler.calls.borrow().len(), 1);
    }

    #[tokio::test]
    async fn continue_policy_processes_remaining_targets() {
        let cfg = config(&[("A", "/a"), ("BAD", "/bad"), ("C", "/c")], ErrorPolicy::Continue);
        let sampler = ScriptedSampler::new(&[("/a", Some(10)), ("/bad", None), ("/c", Some(99))]);
        let notifier = RecordingNotifier::default();

        let report = run(&cfg, &sampler, &notifier, &origin()).await.unwrap();

        assert!(!report.is_success());
        assert_eq!(report.sampled, 2);
        assert_eq!(report.alerts_sent, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].label(), "BAD");
        assert!(notifier.messages()[0].contains("drive C"));
    }

    #[tokio::test]
    async fn continue_policy_survives_failed_publish() {
        let cfg = config(&[("A", "/a"), ("B", "/b")], ErrorPolicy::Continue);
        let sampler = ScriptedSampler::new(&[("/a", Some(95)), ("/b", Some(90))]);
        let notifier = RecordingNotifier { fail_first: 1, ..Default::default() };

        let report = run(&cfg, &sampler, &notifier, &origin()).await.unwrap();

        assert!(!report.is_success());
        assert_eq!(report.sampled, 2);
        assert_eq!(report.alerts_sent, 1);
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(report.failures[0], RunError::Notification { .. }));
        assert_eq!(report.failures[0].label(), "A");
        let sent = notifier.messages();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("drive B"));
    }
}
