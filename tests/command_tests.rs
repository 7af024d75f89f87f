use ns_trace_analyzer::aggregator::FlowKey;
use ns_trace_analyzer::analysis::{AnalysisStore, SequentialIdGenerator};
use ns_trace_analyzer::chart::ChartConfig;
use ns_trace_analyzer::commands::{
    execute_analyze, execute_chart, validate_args, validate_report_file, AnalyzeArgs, ChartArgs,
};
use ns_trace_analyzer::output::read_report;
use std::fs;
use std::path::PathBuf;

const TRACE: &str = "\
+ 0.1 0 1 cbr 210 ------- 2 0.0 1.0 0 0
- 0.1 0 1 cbr 210 ------- 2 0.0 1.0 0 0
r 0.2 0 1 cbr 210 ------- 2 0.0 1.0 0 0
+ 0.3 0 1 cbr 210 ------- 2 0.0 1.0 1 1
- 0.3 0 1 cbr 210 ------- 2 0.0 1.0 1 1
r 0.45 0 1 cbr 210 ------- 2 0.0 1.0 1 1
r 0.5 1 0 tcp 40 ------- 1 1.0 0.0 3 2
";

fn write_trace(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("sim.tr");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_analyze_writes_report_and_charts() {
    let dir = tempfile::tempdir().unwrap();
    let trace = write_trace(&dir, TRACE);
    let output_json = dir.path().join("out/analysis.json");
    let charts_dir = dir.path().join("charts");

    let args = AnalyzeArgs {
        trace,
        output_json: output_json.clone(),
        charts_dir: Some(charts_dir.clone()),
        ..Default::default()
    };
    validate_args(&args).unwrap();

    let mut store = AnalysisStore::with_generator(SequentialIdGenerator::new());
    let id = execute_analyze(args, &mut store).unwrap();

    assert_eq!(id.as_str(), "100000");
    assert!(store.get(&id).is_some());

    let report = read_report(&output_json).unwrap();
    assert_eq!(report.analysis_id, "100000");
    assert_eq!(report.source, "sim.tr");
    assert_eq!(report.record_count, 7);
    assert_eq!(report.stats.received_packets, 3);
    assert_eq!(report.flows.len(), 2);

    assert!(charts_dir.join("0_1_cbr.svg").exists());
    assert!(charts_dir.join("1_0_tcp.svg").exists());

    validate_report_file(&output_json).unwrap();
}

#[test]
fn test_analyze_rejects_malformed_trace() {
    let dir = tempfile::tempdir().unwrap();
    let trace = write_trace(&dir, "r 0.2 0 1 cbr 210 ------- 2 0.0 1.0 seven 0\n");
    let output_json = dir.path().join("analysis.json");

    let args = AnalyzeArgs {
        trace,
        output_json: output_json.clone(),
        ..Default::default()
    };

    let mut store = AnalysisStore::with_generator(SequentialIdGenerator::new());
    let err = execute_analyze(args, &mut store).unwrap_err();

    assert!(format!("{:#}", err).contains("sequence_num"));
    assert!(store.is_empty());
    assert!(!output_json.exists());
}

#[test]
fn test_chart_command() {
    let dir = tempfile::tempdir().unwrap();
    let trace = write_trace(&dir, TRACE);
    let output_svg = dir.path().join("jitter.svg");

    execute_chart(ChartArgs {
        trace,
        flow: FlowKey::new(0, 1, "cbr"),
        output_svg: output_svg.clone(),
        chart_config: ChartConfig::new().with_zoom(true),
    })
    .unwrap();

    let svg = fs::read_to_string(output_svg).unwrap();
    assert!(svg.contains("Jitter 0:1:cbr"));
}

#[test]
fn test_chart_unknown_flow() {
    let dir = tempfile::tempdir().unwrap();
    let trace = write_trace(&dir, TRACE);

    let err = execute_chart(ChartArgs {
        trace,
        flow: FlowKey::new(5, 6, "udp"),
        output_svg: dir.path().join("jitter.svg"),
        chart_config: ChartConfig::default(),
    })
    .unwrap_err();

    assert!(err.to_string().contains("5:6:udp"));
}

#[test]
fn test_validate_args_empty_trace() {
    assert!(validate_args(&AnalyzeArgs::default()).is_err());
}

#[test]
fn test_validate_args_max_flows_zero() {
    let args = AnalyzeArgs {
        trace: PathBuf::from("sim.tr"),
        max_flows: 0,
        ..Default::default()
    };
    assert!(validate_args(&args).is_err());
}
