//! Focused unit tests covering plan configuration, input loading and the
//! describe output.

use super::helpers::{SMALL_TOPOLOGY, Workspace, write_utf8};
use super::*;
use camino::Utf8PathBuf;
use crate::describe::{DescribeArgs, DescribeReport, run_describe_with};
use crate::plan::{
    DeliveryRequest, PlanArgs, PlanConfig, config_from_layers_for_test, execute_plan,
    load_deliveries,
};
use courier_core::{DispatchError, NodeId, TopologyError};
use rstest::rstest;

fn plan_config(deliveries_path: Utf8PathBuf) -> PlanConfig {
    PlanConfig {
        deliveries_path,
        topology: None,
        depot: None,
        deliver: 0,
    }
}

#[rstest]
fn converting_plan_without_deliveries_errors() {
    let args = PlanArgs {
        deliveries_path: None,
        ..PlanArgs::default()
    };

    let err = PlanConfig::try_from(args).expect_err("missing deliveries should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_DELIVERIES);
            assert_eq!(env, ENV_DELIVERIES);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
#[case(None, None, None, 0)]
#[case(Some("SM_NOVA"), Some(2), Some(NodeId::from("SM_NOVA")), 2)]
fn plan_config_applies_defaults(
    #[case] depot: Option<&str>,
    #[case] deliver: Option<usize>,
    #[case] expected_depot: Option<NodeId>,
    #[case] expected_deliver: usize,
) {
    let args = PlanArgs {
        deliveries_path: Some(Utf8PathBuf::from("deliveries.json")),
        topology: None,
        depot: depot.map(str::to_owned),
        deliver,
    };
    let config = PlanConfig::try_from(args).expect("config should build");
    assert_eq!(config.depot, expected_depot);
    assert_eq!(config.deliver, expected_deliver);
    assert_eq!(config.topology, None);
}

#[rstest]
fn load_deliveries_accepts_both_shapes() {
    let workspace = Workspace::new();
    let path = workspace.path("deliveries.json");
    write_utf8(
        &path,
        br#"[
            { "customer": "Ana", "destination": "SM_NOVA" },
            { "customer": "Bia", "district": "SJ", "street": "Flores" }
        ]"#,
    );

    let requests = load_deliveries(&path).expect("deliveries should decode");
    assert_eq!(
        requests,
        vec![
            DeliveryRequest::Node {
                customer: "Ana".to_owned(),
                destination: NodeId::from("SM_NOVA"),
            },
            DeliveryRequest::Address {
                customer: "Bia".to_owned(),
                district: "SJ".to_owned(),
                street: "Flores".to_owned(),
            },
        ]
    );
}

#[rstest]
fn load_deliveries_rejects_invalid_json() {
    let workspace = Workspace::new();
    let path = workspace.path("deliveries.json");
    write_utf8(&path, b"{ not valid json");

    let err = load_deliveries(&path).expect_err("invalid json should error");
    match err {
        CliError::ParseDeliveries { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected ParseDeliveries, found {other:?}"),
    }
}

#[rstest]
fn load_deliveries_reports_missing_file() {
    let workspace = Workspace::new();
    let path = workspace.path("absent.json");

    let err = load_deliveries(&path).expect_err("missing file should error");
    match err {
        CliError::OpenInput {
            field,
            path: reported,
            ..
        } => {
            assert_eq!(field, ARG_DELIVERIES);
            assert_eq!(reported, path);
        }
        other => panic!("expected OpenInput, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "deliveries_path": 42 }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_file(json!({ "deliver": 1, "depot": "SJ_SOL" }), None);
    composer.push_environment(json!({
        "deliveries_path": "from-env.json",
        "depot": "SM_NOVA",
    }));
    composer.push_cli(json!({ "deliver": 3 }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.deliveries_path, Utf8PathBuf::from("from-env.json"));
    assert_eq!(config.depot, Some(NodeId::from("SM_NOVA")));
    assert_eq!(config.deliver, 3);
}

#[rstest]
fn plan_replays_deliveries_over_sample_city() {
    let workspace = Workspace::new();
    let path = workspace.path("deliveries.json");
    write_utf8(
        &path,
        br#"[
            { "customer": "Ana", "destination": "SM_NOVA" },
            { "customer": "Bia", "district": "sj", "street": "flores" }
        ]"#,
    );
    let mut config = plan_config(path);
    config.deliver = 1;

    let report = execute_plan(&config).expect("plan should succeed");
    assert_eq!(report.depot, NodeId::from("CENTRO_CENTRAL"));

    let sequences: Vec<u64> = report.submissions.iter().map(|s| s.sequence.get()).collect();
    assert_eq!(sequences, vec![1, 2]);
    let second = report.submissions.get(1).expect("two submissions");
    assert_eq!(second.route.total_distance(), 9.0);

    let delivered: Vec<&str> = report.delivered.iter().map(|r| r.customer.as_str()).collect();
    assert_eq!(delivered, vec!["Ana"]);
    let pending: Vec<&str> = report.pending.iter().map(|r| r.customer.as_str()).collect();
    assert_eq!(pending, vec!["Bia"]);

    assert_eq!(
        report.route.stops,
        vec![
            NodeId::from("CENTRO_CENTRAL"),
            NodeId::from("SJ_SOL"),
            NodeId::from("SJ_FLORES"),
        ]
    );
    assert_eq!(
        report.route.labels,
        vec![
            "Centro - Rua Central (Depósito)",
            "SJ - Rua Sol",
            "SJ - Rua das Flores"
        ]
    );
    assert_eq!(report.route.total_distance, 7.0);
    assert!(report.route.unreachable.is_empty());
}

#[rstest]
fn plan_reports_rejected_delivery_position() {
    let workspace = Workspace::new();
    let path = workspace.path("deliveries.json");
    write_utf8(
        &path,
        br#"[
            { "customer": "Ana", "destination": "SM_NOVA" },
            { "customer": "Bia", "destination": "NOWHERE" }
        ]"#,
    );

    let err = execute_plan(&plan_config(path)).expect_err("unknown destination");
    match err {
        CliError::Dispatch {
            index,
            customer,
            source,
        } => {
            assert_eq!(index, 2);
            assert_eq!(customer, "Bia");
            assert!(matches!(*source, DispatchError::UnknownDestination { .. }));
        }
        other => panic!("expected Dispatch, found {other:?}"),
    }
}

#[rstest]
fn plan_uses_topology_file_and_depot_override() {
    let workspace = Workspace::new();
    let topology = workspace.path("topology.json");
    write_utf8(&topology, SMALL_TOPOLOGY.as_bytes());
    let deliveries = workspace.path("deliveries.json");
    write_utf8(
        &deliveries,
        br#"[
            { "customer": "Ana", "destination": "ISLAND" },
            { "customer": "Bia", "destination": "HUB" }
        ]"#,
    );

    let config = PlanConfig {
        deliveries_path: deliveries,
        topology: Some(topology),
        depot: Some(NodeId::from("EDGE")),
        deliver: 0,
    };
    let report = execute_plan(&config).expect("plan should succeed");
    assert_eq!(report.depot, NodeId::from("EDGE"));
    assert_eq!(
        report.route.stops,
        vec![NodeId::from("EDGE"), NodeId::from("HUB")]
    );
    assert_eq!(report.route.total_distance, 4.0);
    assert_eq!(report.route.unreachable, vec![NodeId::from("ISLAND")]);
}

#[rstest]
fn plan_rejects_unknown_depot_override() {
    let workspace = Workspace::new();
    let deliveries = workspace.path("deliveries.json");
    write_utf8(&deliveries, b"[]");

    let mut config = plan_config(deliveries);
    config.depot = Some(NodeId::from("NOWHERE"));
    let err = execute_plan(&config).expect_err("unknown depot");
    match err {
        CliError::Topology(source) => {
            assert!(matches!(*source, TopologyError::UnknownDepot { .. }));
        }
        other => panic!("expected Topology, found {other:?}"),
    }
}

#[rstest]
fn describe_prints_topology_file() {
    let workspace = Workspace::new();
    let topology = workspace.path("topology.json");
    write_utf8(&topology, SMALL_TOPOLOGY.as_bytes());

    let mut stdout = Vec::new();
    run_describe_with(
        DescribeArgs {
            topology: Some(topology),
        },
        &mut stdout,
    )
    .expect("describe should succeed");

    let report: DescribeReport =
        serde_json::from_slice(&stdout).expect("output should be a describe report");
    assert_eq!(report.depot, NodeId::from("HUB"));
    assert_eq!(report.nodes.len(), 3);
    assert_eq!(report.edges.len(), 2);
    let district = report.districts.first().expect("one district");
    assert_eq!(district.name, "Town");
    assert_eq!(district.streets, vec!["Edge"]);
}
