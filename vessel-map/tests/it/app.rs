use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, duplex};
use vessel_map::{settings::MapSettings, sink::JsonLinesSink, startup::App};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

use crate::helper::{point, route_body, searoutes_client, vessel_body};

fn map_settings() -> MapSettings {
    MapSettings {
        access_token: "token".into(),
        style: "mapbox://styles/mapbox/light-v9?optimize=true".into(),
        zoom: 1.0,
        track_resize: true,
    }
}

#[tokio::test]
async fn test_host_messages_drive_map_commands() {
    let searoutes = MockServer::start().await;
    let route = route_body([5.0, 60.0], [20.0, 10.0]);
    Mock::given(method("GET"))
        .and(path("/vs/vessel-positions"))
        .and(query_param("imos", "9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vessel_body(9, 5.0, 60.0)))
        .mount(&searoutes)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/route"))
        .respond_with(ResponseTemplate::new(200).set_body_json(route.clone()))
        .expect(1)
        .mount(&searoutes)
        .await;

    let (renderer, map_output) = duplex(64 * 1024);
    let (mut host, host_input) = duplex(64 * 1024);

    let client = searoutes_client(&searoutes);
    let sink = JsonLinesSink::init(renderer, &map_settings()).await.unwrap();
    let app = App::build_with(client.clone(), client, Arc::new(sink), 10);
    let app = tokio::spawn(app.run_with(host_input));

    host.write_all(
        concat!(
            r#"{"type":"update","imo":9,"latitude":10.0,"longitude":20.0}"#,
            "\n",
            "this is not a host message\n",
            r#"{"type":"map_ready"}"#,
            "\n",
        )
        .as_bytes(),
    )
    .await
    .unwrap();

    let mut lines = BufReader::new(map_output).lines();
    let mut commands = Vec::new();
    loop {
        let line = lines.next_line().await.unwrap().unwrap();
        let command: Value = serde_json::from_str(&line).unwrap();
        let done = command["op"] == "set_data" && command["name"] == "route";
        commands.push(command);
        if done {
            break;
        }
    }

    drop(host);
    app.await.unwrap().unwrap();

    assert_eq!(commands[0]["op"], "init");
    assert_eq!(commands[0]["accessToken"], "token");

    let ops = |op: &str| commands.iter().filter(|c| c["op"] == op).count();
    assert_eq!(ops("add_source"), 3);
    assert_eq!(ops("add_layer"), 3);

    let first_data = commands.iter().position(|c| c["op"] == "set_data").unwrap();
    assert!(
        commands[..first_data]
            .iter()
            .skip(1)
            .all(|c| c["op"] == "add_source" || c["op"] == "add_layer")
    );

    let data = |name: &str| {
        commands
            .iter()
            .find(|c| c["op"] == "set_data" && c["name"] == name)
            .map(|c| c["data"].clone())
            .unwrap()
    };
    assert_eq!(data("destination"), point(20.0, 10.0));
    assert_eq!(data("vessel"), point(5.0, 60.0));
    assert_eq!(data("route"), route);
}
