use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use channel_reconciler::config::Config;
use channel_reconciler::errors::{ProbeError, ProbeResult};
use channel_reconciler::models::{AddressFamily, RawEntry};
use channel_reconciler::pipeline::ReconcilePipeline;
use channel_reconciler::pipeline::stages::{GroupBy, MergePolicy};
use channel_reconciler::services::LivenessProbe;
use channel_reconciler::taxonomy::{Category, Province, Theme};

/// Addresses containing `dead` answer 500, `v6` are IPv6-only, the rest IPv4
#[derive(Default)]
struct ScriptedProbe {
    calls: Mutex<Vec<String>>,
}

impl ScriptedProbe {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LivenessProbe for ScriptedProbe {
    async fn probe(&self, address: &str) -> ProbeResult<AddressFamily> {
        self.calls.lock().unwrap().push(address.to_string());
        if address.contains("dead") {
            Err(ProbeError::Status { status: 500 })
        } else if address.contains("v6") {
            Ok(AddressFamily::Ipv6Only)
        } else {
            Ok(AddressFamily::Ipv4)
        }
    }
}

fn pipeline(config: &Config) -> (ReconcilePipeline, Arc<ScriptedProbe>) {
    let probe = Arc::new(ScriptedProbe::default());
    (ReconcilePipeline::from_config(config, probe.clone()), probe)
}

#[tokio::test]
async fn trusted_entry_wins_and_outranked_entry_is_not_probed() {
    let (pipeline, probe) = pipeline(&Config::default());
    let output = pipeline
        .run(vec![
            RawEntry::new("CCTV-1", "http://a.example/x", 0, true),
            RawEntry::new("中央一套", "http://a.example/x?token=123", 1, false),
        ])
        .await;

    assert_eq!(output.entries.len(), 1);
    let entry = &output.entries[0];
    assert_eq!(entry.display_name, "CCTV-1");
    assert_eq!(entry.address, "http://a.example/x");
    assert_eq!(entry.category, Category::NationalNetwork);
    assert!(probe.calls().is_empty());
    assert_eq!(output.stats.duplicates_dropped, 1);
}

#[tokio::test]
async fn trusted_alias_collapses_onto_untrusted_canonical_name() {
    let (pipeline, probe) = pipeline(&Config::default());
    let output = pipeline
        .run(vec![
            RawEntry::new("CCTV1综合", "http://a.example/x?token=123", 0, true),
            RawEntry::new("CCTV-1", "http://a.example/x", 1, false),
        ])
        .await;

    assert_eq!(output.entries.len(), 1);
    let entry = &output.entries[0];
    assert_eq!(entry.display_name, "CCTV-1");
    assert_eq!(entry.address, "http://a.example/x?token=123");
    assert_eq!(entry.category, Category::NationalNetwork);
    assert_eq!(entry.source_priority, 0);
    assert!(probe.calls().is_empty());
}

#[tokio::test]
async fn foreign_channel_is_dropped_before_probing() {
    let (pipeline, probe) = pipeline(&Config::default());
    let output = pipeline
        .run(vec![
            RawEntry::new("BBC World News", "http://bbc.example/live.m3u8", 1, false),
            RawEntry::new("湖南卫视", "http://hn.example/live.m3u8", 1, false),
        ])
        .await;

    assert_eq!(output.entries.len(), 1);
    assert_eq!(output.entries[0].display_name, "湖南卫视");
    assert_eq!(probe.calls(), vec!["http://hn.example/live.m3u8".to_string()]);
    assert_eq!(output.stats.foreign_dropped, 1);
}

#[tokio::test]
async fn dead_untrusted_is_dropped_but_dead_trusted_survives() {
    let (pipeline, probe) = pipeline(&Config::default());
    let output = pipeline
        .run(vec![
            RawEntry::new("星光影视", "http://dead.example/movie.m3u8", 1, false),
            RawEntry::new("西充综合", "http://dead.example/xichong.m3u8", 0, true),
        ])
        .await;

    assert_eq!(output.entries.len(), 1);
    assert_eq!(output.entries[0].display_name, "西充综合");
    assert_eq!(
        output.entries[0].category,
        Category::Province(Province::Sichuan)
    );
    assert_eq!(probe.calls().len(), 1);
    assert_eq!(output.stats.unreachable_dropped, 1);
}

#[tokio::test]
async fn national_channels_are_ordered_numerically() {
    let (pipeline, _) = pipeline(&Config::default());
    let output = pipeline
        .run(vec![
            RawEntry::new("CCTV-unknown", "http://s.example/u", 1, false),
            RawEntry::new("中央十三套", "http://s.example/13", 1, false),
            RawEntry::new("CCTV2", "http://s.example/2", 1, false),
            RawEntry::new("央视综合", "http://s.example/1", 1, false),
        ])
        .await;

    let names: Vec<_> = output
        .entries
        .iter()
        .map(|e| e.display_name.as_str())
        .collect();
    assert_eq!(names, vec!["CCTV-1", "CCTV-2", "CCTV-13", "CCTV-unknown"]);
}

#[tokio::test]
async fn full_run_orders_tiers_categories_and_trailing_events() {
    let (pipeline, _) = pipeline(&Config::default());
    let output = pipeline
        .run(vec![
            RawEntry::new("2024春晚", "http://s.example/gala", 0, true),
            RawEntry::new("Random Channel", "http://s.example/random", 1, false),
            RawEntry::new("湖南卫视", "http://s.example/hunan", 1, false),
            RawEntry::new("CCTV-5+体育赛事", "http://s.example/5plus", 1, false),
            RawEntry::new("西充综合", "http://s.example/xichong", 0, true),
            RawEntry::new("broken", "not a url", 1, false),
            RawEntry::new("rtmp stream", "rtmp://s.example/live", 1, false),
        ])
        .await;

    let summary: Vec<_> = output
        .entries
        .iter()
        .map(|e| (e.display_name.as_str(), e.category))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("西充综合", Category::Province(Province::Sichuan)),
            ("CCTV-5+", Category::NationalNetwork),
            ("湖南卫视", Category::ProvincialNetwork),
            ("Random Channel", Category::Other),
            ("2024春晚", Category::Theme(Theme::Event)),
        ]
    );
    assert_eq!(output.stats.raw_entries, 7);
    assert_eq!(output.stats.invalid_addresses, 2);
    assert_eq!(output.stats.emitted, 5);
}

#[tokio::test]
async fn ipv4_copy_beats_ipv6_copy_when_grouping_by_name() {
    let mut config = Config::default();
    config.probe.require_ipv4 = false;
    config.reconcile = MergePolicy::new(GroupBy::DisplayName);
    let (pipeline, probe) = pipeline(&config);

    let output = pipeline
        .run(vec![
            RawEntry::new("湖南卫视", "http://v6.example/hunan", 1, false),
            RawEntry::new("湖南卫视", "http://v4.example/hunan", 1, false),
        ])
        .await;

    assert_eq!(probe.calls().len(), 2);
    assert_eq!(output.entries.len(), 1);
    assert_eq!(output.entries[0].address, "http://v4.example/hunan");
}

#[tokio::test]
async fn disabled_probing_keeps_everything_unchecked() {
    let mut config = Config::default();
    config.probe.enabled = false;
    let (pipeline, probe) = pipeline(&config);

    let output = pipeline
        .run(vec![RawEntry::new(
            "星光影视",
            "http://dead.example/movie.m3u8",
            1,
            false,
        )])
        .await;

    assert!(probe.calls().is_empty());
    assert_eq!(output.entries.len(), 1);
    assert_eq!(output.stats.liveness.skipped, 1);
}

#[tokio::test]
async fn empty_input_yields_empty_playlist() {
    let (pipeline, _) = pipeline(&Config::default());
    let output = pipeline.run(Vec::new()).await;
    assert!(output.entries.is_empty());
    assert_eq!(output.stats.emitted, 0);
}
