//! Authoritative-or-estimated tide fusion.
//!
//! The official table is only tried when the target instant, translated onto
//! the reference station's clock, falls on the same calendar day as the query
//! (the JCG page only ever carries today). Everything else is answered by the
//! lunar model, and that branch cannot fail.

use crate::matcher::best_match;
use crate::stations::{resolve_source, ReferenceStation};
use crate::tide_data::TideTableSource;
use crate::{fallback, TideState};
use chrono::{DateTime, Duration, FixedOffset, Timelike};
use tracing::{debug, warn};

/// Produces one [`TideState`] per target instant.
pub struct TideFusionEngine<S> {
    source: S,
}

impl<S: TideTableSource> TideFusionEngine<S> {
    pub fn new(source: S) -> Self {
        TideFusionEngine { source }
    }

    /// Fuse the tide for `target` as seen from `query` (usually "now").
    pub async fn fuse(
        &self,
        target: DateTime<FixedOffset>,
        query: DateTime<FixedOffset>,
        station: &ReferenceStation,
    ) -> TideState {
        let translated = translate(target, station);

        match self.authoritative(translated, query, station).await {
            Some(state) => state,
            None => fallback::estimate_at(translated.naive_local()),
        }
    }

    async fn authoritative(
        &self,
        translated: DateTime<FixedOffset>,
        query: DateTime<FixedOffset>,
        station: &ReferenceStation,
    ) -> Option<TideState> {
        if translated.date_naive() != query.date_naive() {
            debug!(station = station.id, %translated, "outside today's table, estimating");
            return None;
        }

        let Some(url) = resolve_source(station) else {
            debug!(station = station.id, "no official table, estimating");
            return None;
        };

        let table = self.source.fetch(url).await?;
        match best_match(&table, translated.hour(), translated.minute()) {
            Ok(row) => Some(TideState::Authoritative {
                speed_knots: row.speed_knots.max(0.0),
                is_rising: is_rising_label(&row.direction_label, station.rising_tokens),
                direction_label: row.direction_label,
            }),
            Err(error) => {
                warn!(station = station.id, %error, "current table unusable, estimating");
                None
            }
        }
    }
}

/// Shift `target` onto the reference station's clock.
pub fn translate(
    target: DateTime<FixedOffset>,
    station: &ReferenceStation,
) -> DateTime<FixedOffset> {
    target - Duration::minutes(station.time_offset_minutes)
}

/// Flood/ebb from a table direction label; unknown labels are ebb.
pub fn is_rising_label(label: &str, rising_tokens: &[&str]) -> bool {
    let lowered = label.to_lowercase();
    rising_tokens.iter().any(|token| lowered.contains(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::TideTable;
    use crate::stations::{station_by_id, STATIONS, STRAIT_RISING_TOKENS};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Records every URL asked for and answers with a fixed table.
    struct SpySource {
        table: Option<TideTable>,
        calls: AtomicUsize,
        urls: Mutex<Vec<String>>,
    }

    impl SpySource {
        fn new(table: Option<TideTable>) -> Arc<Self> {
            Arc::new(SpySource {
                table,
                calls: AtomicUsize::new(0),
                urls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TideTableSource for SpySource {
        async fn fetch(&self, url: &str) -> Option<TideTable> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.urls.lock().unwrap().push(url.to_string());
            self.table.clone()
        }
    }

    fn jst(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(9 * 3600)
            .unwrap()
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
    }

    fn akashi_table() -> TideTable {
        let rows = [
            ["6", "00", "西流", "4.2"],
            ["9", "30", "転流", "0.0"],
            ["12", "45", "東流", "6.6"],
            ["bad", "row", "", ""],
        ];
        TideTable {
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    #[tokio::test]
    async fn same_day_uses_official_table() {
        let spy = SpySource::new(Some(akashi_table()));
        let engine = TideFusionEngine::new(spy.clone());
        let now = jst(2026, 10, 16, 6, 10);

        let state = engine.fuse(now, now, &STATIONS[0]).await;
        assert!(state.is_authoritative());
        assert!(state.is_rising());
        assert!((state.factor() - 0.7).abs() < 1e-9);
        assert_eq!(spy.calls(), 1);
    }

    #[tokio::test]
    async fn strong_ebb_factor_is_capped() {
        let spy = SpySource::new(Some(akashi_table()));
        let engine = TideFusionEngine::new(spy);
        let now = jst(2026, 10, 16, 8, 0);
        let target = jst(2026, 10, 16, 13, 0);

        let state = engine.fuse(target, now, &STATIONS[0]).await;
        assert!(!state.is_rising());
        assert_eq!(state.factor(), 1.0);
        assert_eq!(state.speed_knots(), 6.6);
    }

    #[tokio::test]
    async fn next_day_never_fetches() {
        let spy = SpySource::new(Some(akashi_table()));
        let engine = TideFusionEngine::new(spy.clone());
        let now = jst(2026, 10, 16, 22, 30);
        let target = jst(2026, 10, 17, 1, 30);

        let state = engine.fuse(target, now, &STATIONS[0]).await;
        assert!(!state.is_authoritative());
        assert_eq!(spy.calls(), 0);
    }

    #[tokio::test]
    async fn fetch_failure_falls_back() {
        let spy = SpySource::new(None);
        let engine = TideFusionEngine::new(spy.clone());
        let now = jst(2026, 10, 16, 10, 0);

        let state = engine.fuse(now, now, &STATIONS[1]).await;
        assert!(!state.is_authoritative());
        assert!((0.0..=1.0).contains(&state.factor()));
        assert_eq!(spy.calls(), 1);
    }

    #[tokio::test]
    async fn unusable_table_falls_back() {
        let junk = TideTable {
            rows: vec![vec!["時".into(), "分".into()]],
        };
        let engine = TideFusionEngine::new(SpySource::new(Some(junk)));
        let now = jst(2026, 10, 16, 10, 0);
        assert!(!engine.fuse(now, now, &STATIONS[2]).await.is_authoritative());
    }

    #[tokio::test]
    async fn secondary_station_is_shifted_onto_reference_table() {
        let spy = SpySource::new(Some(akashi_table()));
        let engine = TideFusionEngine::new(spy.clone());
        let iwaya = station_by_id("iwaya").unwrap();
        // 9:50 at Iwaya is 9:35 on the Akashi clock: the slack row
        let now = jst(2026, 10, 16, 9, 50);

        let state = engine.fuse(now, now, iwaya).await;
        assert!(state.is_authoritative());
        assert_eq!(state.speed_knots(), 0.0);
        assert!(state.is_slack());
        assert_eq!(
            spy.urls.lock().unwrap().as_slice(),
            [STATIONS[0].source_url.unwrap().to_string()]
        );
    }

    #[tokio::test]
    async fn offset_crossing_midnight_leaves_todays_window() {
        let spy = SpySource::new(Some(akashi_table()));
        let engine = TideFusionEngine::new(spy.clone());
        let iwaya = station_by_id("iwaya").unwrap();
        // 00:05 at Iwaya is still yesterday on the Akashi clock
        let now = jst(2026, 10, 17, 0, 5);

        let state = engine.fuse(now, now, iwaya).await;
        assert!(!state.is_authoritative());
        assert_eq!(spy.calls(), 0);
    }

    #[tokio::test]
    async fn fusion_is_idempotent() {
        for table in [Some(akashi_table()), None] {
            let engine = TideFusionEngine::new(SpySource::new(table));
            let now = jst(2026, 10, 16, 11, 20);
            let target = jst(2026, 10, 16, 14, 20);
            let a = engine.fuse(target, now, &STATIONS[0]).await;
            let b = engine.fuse(target, now, &STATIONS[0]).await;
            assert_eq!(a, b);
        }
    }

    #[test]
    fn direction_labels_classify_flood_and_ebb() {
        let tokens = STRAIT_RISING_TOKENS;
        assert!(is_rising_label("西流", tokens));
        assert!(is_rising_label("北西流", tokens));
        assert!(is_rising_label("North-going", tokens));
        assert!(!is_rising_label("東流", tokens));
        assert!(!is_rising_label("南流", tokens));
        assert!(!is_rising_label("転流", tokens));
        assert!(!is_rising_label("", tokens));
        assert!(!is_rising_label("西流", &[]));
    }
}
