use std::io::Write;
use std::sync::Mutex;

use tracing::{error, info, warn};

use super::{DetectionEvent, EventEnvelope};

/// Receives detection events.
///
/// Handed to the detector and the batch filter so that detection stays a
/// function of (page, config) with logging as an explicit side effect.
/// Recording never fails the caller.
pub trait EventRecorder: Send + Sync {
    fn record(&self, event: DetectionEvent);
}

/// Recorder that forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRecorder;

impl TracingRecorder {
    pub fn new() -> Self {
        Self
    }
}

impl EventRecorder for TracingRecorder {
    fn record(&self, event: DetectionEvent) {
        match event {
            DetectionEvent::RunStarted {
                run_id,
                entries,
                amount,
                action,
            } => {
                info!(%run_id, entries, amount, action = action.as_str(), "Run started");
            }
            DetectionEvent::DetectionStarted { link } => {
                info!(%link, "Detecting promotion status");
            }
            DetectionEvent::PromotionDetected {
                link,
                family,
                promotion,
                is_hr,
            } => {
                info!(%link, %family, %promotion, is_hr, "Promotion detected");
            }
            DetectionEvent::UnsupportedLabel {
                link,
                family,
                raw_label,
            } => {
                warn!(%link, %family, %raw_label, "Unsupported promotion label");
            }
            DetectionEvent::AnchorMissing { link, family } => {
                warn!(%link, %family, "Promotion anchor not found, page template may have changed");
            }
            DetectionEvent::ValidityFailed { link, reason, body } => {
                error!(%link, %reason, "Detail page rejected by validity check, response is logged");
                info!(%link, %body, "Detail page body");
            }
            DetectionEvent::FetchFailed {
                link,
                error,
                status,
            } => {
                error!(%link, %error, ?status, "Failed to fetch detail page, check connection");
            }
            DetectionEvent::EntryVerdict {
                title,
                link,
                accepted,
                reason,
            } => {
                info!(%title, ?link, accepted, %reason, "Entry verdict");
            }
            DetectionEvent::RunFinished {
                run_id,
                accepted,
                rejected,
                capped,
                failed,
            } => {
                info!(%run_id, accepted, rejected, capped, failed, "Run finished");
            }
        }
    }
}

/// Recorder that writes one JSON envelope per line.
pub struct JsonLinesRecorder<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesRecorder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> EventRecorder for JsonLinesRecorder<W> {
    fn record(&self, event: DetectionEvent) {
        let envelope = EventEnvelope::now(event);
        let line = match serde_json::to_string(&envelope) {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Failed to serialize event: {}", e);
                return;
            }
        };

        let mut writer = match self.writer.lock() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
            tracing::error!("Failed to write event: {}", e);
        }
    }
}

/// Forwards every event to each inner recorder in order.
#[derive(Default)]
pub struct FanoutRecorder {
    recorders: Vec<Box<dyn EventRecorder>>,
}

impl FanoutRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, recorder: impl EventRecorder + 'static) -> Self {
        self.recorders.push(Box::new(recorder));
        self
    }

    pub fn len(&self) -> usize {
        self.recorders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recorders.is_empty()
    }
}

impl EventRecorder for FanoutRecorder {
    fn record(&self, event: DetectionEvent) {
        for recorder in &self.recorders {
            recorder.record(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryRecorder;

    #[test]
    fn test_json_lines_recorder_writes_one_line_per_event() {
        let recorder = JsonLinesRecorder::new(Vec::new());
        recorder.record(DetectionEvent::DetectionStarted {
            link: "https://bt.byr.cn/details.php?id=1".to_string(),
        });
        recorder.record(DetectionEvent::EntryVerdict {
            title: "Some.Show.S01".to_string(),
            link: None,
            accepted: false,
            reason: "entry has no link".to_string(),
        });

        let output = String::from_utf8(recorder.into_inner()).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["type"], "detection_started");
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["type"], "entry_verdict");
        assert!(second.get("link").is_none());
    }

    #[test]
    fn test_fanout_recorder() {
        let first = MemoryRecorder::new();
        let second = MemoryRecorder::new();
        let fanout = FanoutRecorder::new()
            .with(first.clone())
            .with(second.clone());
        assert_eq!(fanout.len(), 2);

        fanout.record(DetectionEvent::DetectionStarted {
            link: "l".to_string(),
        });

        assert_eq!(first.events().len(), 1);
        assert_eq!(second.events().len(), 1);
    }

    fn one_of_each() -> Vec<DetectionEvent> {
        use crate::config::FilterAction;
        use crate::promotion::{DetectedPromotion, PageValidity, Promotion, SiteFamily};

        let link = || "https://ourbits.club/details.php?id=1".to_string();
        vec![
            DetectionEvent::RunStarted {
                run_id: "run".to_string(),
                entries: 1,
                amount: 10,
                action: FilterAction::Accept,
            },
            DetectionEvent::DetectionStarted { link: link() },
            DetectionEvent::PromotionDetected {
                link: link(),
                family: SiteFamily::Ourbits,
                promotion: DetectedPromotion::Known(Promotion::Free),
                is_hr: true,
            },
            DetectionEvent::UnsupportedLabel {
                link: link(),
                family: SiteFamily::Ourbits,
                raw_label: "Free 24h".to_string(),
            },
            DetectionEvent::AnchorMissing {
                link: link(),
                family: SiteFamily::Ourbits,
            },
            DetectionEvent::ValidityFailed {
                link: link(),
                reason: PageValidity::SessionExpired,
                body: "<html>login</html>".to_string(),
            },
            DetectionEvent::FetchFailed {
                link: link(),
                error: "timeout".to_string(),
                status: None,
            },
            DetectionEvent::EntryVerdict {
                title: "Some.Album.2018.FLAC".to_string(),
                link: Some(link()),
                accepted: false,
                reason: "promotion [free] not matched: torrent is H&R".to_string(),
            },
            DetectionEvent::RunFinished {
                run_id: "run".to_string(),
                accepted: 0,
                rejected: 1,
                capped: 0,
                failed: 0,
            },
        ]
    }

    #[test]
    fn test_tracing_recorder_accepts_every_event() {
        let memory = MemoryRecorder::new();
        let fanout = FanoutRecorder::new()
            .with(TracingRecorder::new())
            .with(memory.clone());
        for event in one_of_each() {
            fanout.record(event);
        }

        assert_eq!(
            memory.kinds(),
            vec![
                "run_started",
                "detection_started",
                "promotion_detected",
                "unsupported_label",
                "anchor_missing",
                "validity_failed",
                "fetch_failed",
                "entry_verdict",
                "run_finished",
            ]
        );
    }
}
