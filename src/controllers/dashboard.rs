use std::sync::Arc;

use crate::api::BookingApi;
use crate::models::StatusCount;
use crate::services::notify::Notifier;

pub const LOAD_FAILED: &str = "Failed to load booking statistics";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileColor {
    pub background: &'static str,
    pub text: &'static str,
}

pub const PALETTE: [TileColor; 4] = [
    TileColor { background: "#E0E7FF", text: "#3730A3" },
    TileColor { background: "#FFEDD5", text: "#C2410C" },
    TileColor { background: "#CCFBF1", text: "#115E59" },
    TileColor { background: "#FBCFE8", text: "#9D174D" },
];

/// Colour for the tile at `index`; wraps around the palette.
pub fn color_for(index: usize) -> TileColor {
    PALETTE[index % PALETTE.len()]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub label: String,
    pub count: StatusCount,
    pub color: TileColor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardState {
    Loading,
    Loaded(Vec<Tile>),
    Failed(String),
}

pub struct DashboardController {
    api: Arc<dyn BookingApi>,
    notifier: Arc<dyn Notifier>,
    state: DashboardState,
}

impl DashboardController {
    pub fn new(api: Arc<dyn BookingApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            state: DashboardState::Loading,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// One tile per status the server reports, in its order. Keys outside
    /// the known statuses are shown as sent.
    pub async fn load(&mut self) -> &DashboardState {
        self.state = match self.api.status_summary().await {
            Ok(summary) => DashboardState::Loaded(
                summary
                    .0
                    .into_iter()
                    .enumerate()
                    .map(|(i, (label, count))| Tile {
                        label,
                        count,
                        color: color_for(i),
                    })
                    .collect(),
            ),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load status summary");
                self.notifier.error(LOAD_FAILED);
                DashboardState::Failed(e.to_string())
            }
        };
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::testing::{server_error, MockApi};
    use crate::models::{StatusCount, StatusSummary};
    use crate::services::notify::{Level, RecordingNotifier};

    #[test]
    fn test_color_wraps() {
        assert_eq!(color_for(0), PALETTE[0]);
        assert_eq!(color_for(3), PALETTE[3]);
        assert_eq!(color_for(4), PALETTE[0]);
        assert_eq!(color_for(9), PALETTE[1]);
    }

    #[tokio::test]
    async fn test_tiles_follow_server_keys() {
        let api = Arc::new(MockApi::default());
        *api.summary.lock().unwrap() = StatusSummary(vec![
            ("pending".to_string(), StatusCount::Count(4)),
            ("confirmed".to_string(), StatusCount::Count(2)),
            ("cancelled".to_string(), StatusCount::Raw("null".to_string())),
            ("no_show".to_string(), StatusCount::Count(3)),
            ("waitlist".to_string(), StatusCount::Count(5)),
        ]);
        let mut dashboard = DashboardController::new(api, Arc::new(RecordingNotifier::new()));
        assert_eq!(dashboard.state(), &DashboardState::Loading);

        let DashboardState::Loaded(tiles) = dashboard.load().await else {
            panic!("dashboard did not load");
        };
        let labels: Vec<&str> = tiles.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["pending", "confirmed", "cancelled", "no_show", "waitlist"]);
        assert_eq!(tiles[2].count, StatusCount::Raw("null".to_string()));
        assert_eq!(tiles[3].count, StatusCount::Count(3));
        assert_eq!(tiles[4].color, PALETTE[0]);
    }

    #[tokio::test]
    async fn test_failure_notifies() {
        let api = Arc::new(MockApi::default());
        api.fail_next(server_error(None));
        let notifier = Arc::new(RecordingNotifier::new());
        let mut dashboard = DashboardController::new(api, notifier.clone());

        assert!(matches!(dashboard.load().await, DashboardState::Failed(_)));
        assert_eq!(notifier.take(), vec![(Level::Error, LOAD_FAILED.to_string())]);
    }
}
