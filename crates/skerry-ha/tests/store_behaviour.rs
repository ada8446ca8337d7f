//! Coordinator tests against a live cluster store.
//!
//! These run against a real PostgreSQL instance and are ignored by default.
//! Point `SKERRY_TEST_STORE` at a scratch database to run them:
//!
//! ```text
//! SKERRY_TEST_STORE=host=localhost user=postgres password=postgres dbname=skerry_test \
//!     cargo test -p skerry-ha -- --ignored
//! ```

use postgres::{Client, NoTls};

use skerry_config::StoreConfig;
use skerry_ha::{COMMAND_STATUS_CREATED, HaCoordinator, ReplicationRequest, VolumeTarget};

const SCHEMA: &str = include_str!("schema.sql");

fn test_store() -> Option<(StoreConfig, Client)> {
    let spec = std::env::var("SKERRY_TEST_STORE").ok()?;
    let client = Client::connect(&spec, NoTls).ok()?;
    let pg: postgres::Config = spec.parse().ok()?;
    let config = StoreConfig {
        host: pg.get_hosts().first().map(|host| match host {
            postgres::config::Host::Tcp(name) => name.clone(),
            #[cfg(unix)]
            postgres::config::Host::Unix(path) => path.display().to_string(),
        })?,
        port: pg.get_ports().first().copied().unwrap_or(5432),
        user: pg.get_user()?.to_owned(),
        password: String::from_utf8(pg.get_password()?.to_vec()).ok()?,
        dbname: pg.get_dbname()?.to_owned(),
        rpc_port: 50055,
    };
    Some((config, client))
}

fn prepare(client: &mut Client) {
    client.batch_execute(SCHEMA).expect("apply schema");
    client
        .batch_execute("TRUNCATE node; TRUNCATE volume; TRUNCATE replication; TRUNCATE command;")
        .expect("reset tables");
}

#[test]
#[ignore = "requires a PostgreSQL cluster store (set SKERRY_TEST_STORE)"]
fn empty_node_table_lists_no_nodes() {
    let (config, mut client) = test_store().expect("SKERRY_TEST_STORE must point at a store");
    prepare(&mut client);

    let coordinator = HaCoordinator::new(config);
    let nodes = coordinator.list_nodes().expect("list");
    assert!(nodes.is_empty());
}

#[test]
#[ignore = "requires a PostgreSQL cluster store (set SKERRY_TEST_STORE)"]
fn resolves_registered_node_address() {
    let (config, mut client) = test_store().expect("SKERRY_TEST_STORE must point at a store");
    prepare(&mut client);
    client
        .execute(
            "INSERT INTO node (name, ip, lastseen) VALUES ($1, $2, $3)",
            &[&"node-A", &"10.0.0.5", &"2026-08-07T12:00:00Z"],
        )
        .expect("seed node");

    let coordinator = HaCoordinator::new(config);
    let address = coordinator.resolve_node_address("node-A").expect("resolve");
    assert_eq!(address, "10.0.0.5:50055");
}

#[test]
#[ignore = "requires a PostgreSQL cluster store (set SKERRY_TEST_STORE)"]
fn replication_start_writes_paired_command_rows() {
    let (config, mut client) = test_store().expect("SKERRY_TEST_STORE must point at a store");
    prepare(&mut client);

    let coordinator = HaCoordinator::new(config);
    let request = ReplicationRequest {
        primary: VolumeTarget {
            node: "node-a".to_owned(),
            array: "array0".to_owned(),
            volume: "vol01".to_owned(),
            wal_volume: "vol01-wal".to_owned(),
        },
        secondary: VolumeTarget {
            node: "node-b".to_owned(),
            array: "array1".to_owned(),
            volume: "vol01r".to_owned(),
            wal_volume: "vol01r-wal".to_owned(),
        },
    };
    let receipt = coordinator
        .start_replication(&request, "2026-08-07T12:00:00Z")
        .expect("dispatch");
    assert_eq!(receipt.primary.node_name, "node-a");

    let rows = client
        .query(
            "SELECT node_name, status FROM command ORDER BY node_name",
            &[],
        )
        .expect("audit command table");
    let audited: Vec<(String, String)> = rows
        .iter()
        .map(|row| (row.get("node_name"), row.get("status")))
        .collect();
    assert_eq!(
        audited,
        vec![
            ("node-a".to_owned(), COMMAND_STATUS_CREATED.to_owned()),
            ("node-b".to_owned(), COMMAND_STATUS_CREATED.to_owned()),
        ]
    );
}
