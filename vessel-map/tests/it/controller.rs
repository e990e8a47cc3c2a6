use std::time::Duration;

use serde_json::json;
use vessel_map_core::{ChangeBatch, Imo, Overlay, ResolvedVessel};
use wiremock::ResponseTemplate;

use crate::helper::*;

#[tokio::test]
async fn test_displays_before_map_load_are_flushed_after_registration() {
    test(|mut helper| async move {
        helper.set_destination(10.0, 20.0).await;
        helper.assert_no_more_calls().await;

        helper.load_map().await;

        assert_eq!(
            helper.next_set_data().await,
            (Overlay::Destination, point(20.0, 10.0))
        );
        helper.assert_no_more_calls().await;
    })
    .await;
}

#[tokio::test]
async fn test_only_latest_display_per_overlay_is_flushed_on_map_load() {
    test(|mut helper| async move {
        for i in 0..50 {
            helper.set_destination(10.0, f64::from(i)).await;
        }
        helper.wait_for_state(|s| s.destination.longitude == Some(49.0)).await;

        helper.load_map().await;

        assert_eq!(
            helper.next_set_data().await,
            (Overlay::Destination, point(49.0, 10.0))
        );
        helper.assert_no_more_calls().await;
    })
    .await;
}

#[tokio::test]
async fn test_map_load_registers_empty_sources_and_layers() {
    test(|mut helper| async move {
        helper.signal_ready();
        let mut registrations = Vec::new();
        for _ in 0..6 {
            registrations.push(helper.next_call().await);
        }

        let empty = json!({
            "type": "geojson",
            "data": { "type": "FeatureCollection", "features": [] }
        });
        assert_eq!(
            registrations,
            vec![
                SinkCall::AddSource(Overlay::Destination, empty.clone()),
                SinkCall::AddLayer(Overlay::Destination),
                SinkCall::AddSource(Overlay::Vessel, empty.clone()),
                SinkCall::AddLayer(Overlay::Vessel),
                SinkCall::AddSource(Overlay::Route, empty),
                SinkCall::AddLayer(Overlay::Route),
            ]
        );
    })
    .await;
}

#[tokio::test]
async fn test_single_coordinate_updates_do_not_move_destination() {
    test(|mut helper| async move {
        helper.load_map().await;

        helper
            .update(ChangeBatch::new().latitude(Some(10.0)))
            .await;
        helper
            .update(ChangeBatch::new().longitude(Some(20.0)))
            .await;
        helper.assert_no_more_calls().await;

        helper.set_destination(10.0, 20.0).await;
        assert_eq!(
            helper.next_set_data().await,
            (Overlay::Destination, point(20.0, 10.0))
        );
    })
    .await;
}

#[tokio::test]
async fn test_repeated_destination_pushes_identical_geometry() {
    test(|mut helper| async move {
        helper.load_map().await;

        helper.set_destination(10.0, 20.0).await;
        let first = helper.next_set_data().await;
        helper.set_destination(10.0, 20.0).await;
        let second = helper.next_set_data().await;

        assert_eq!(first, (Overlay::Destination, point(20.0, 10.0)));
        assert_eq!(first, second);
    })
    .await;
}

#[tokio::test]
async fn test_route_is_requested_once_vessel_resolves_after_destination() {
    test(|mut helper| async move {
        helper
            .mock_vessel(
                123,
                vessel_body(123, 10.0, 50.0),
                Some(Duration::from_millis(200)),
            )
            .await;
        let route = route_body([10.0, 50.0], [12.0, 52.0]);
        helper
            .mock_route(
                coordinates(10.0, 50.0),
                coordinates(12.0, 52.0),
                ResponseTemplate::new(200).set_body_json(route.clone()),
                1,
            )
            .await;
        helper.load_map().await;

        helper.set_imo(123).await;
        helper.set_destination(52.0, 12.0).await;

        assert_eq!(
            helper.next_set_data().await,
            (Overlay::Destination, point(12.0, 52.0))
        );
        assert_eq!(
            helper.next_set_data().await,
            (Overlay::Vessel, point(10.0, 50.0))
        );
        assert_eq!(helper.next_set_data().await, (Overlay::Route, route));
        helper.assert_no_more_calls().await;
        assert_eq!(helper.route_requests().await, 1);
    })
    .await;
}

#[tokio::test]
async fn test_destination_and_route_in_one_batch() {
    test(|mut helper| async move {
        helper
            .mock_vessel(1, vessel_body(1, 0.0, 0.0), None)
            .await;
        let route = route_body([0.0, 0.0], [20.0, 10.0]);
        helper
            .mock_route(
                coordinates(0.0, 0.0),
                coordinates(20.0, 10.0),
                ResponseTemplate::new(200).set_body_json(route.clone()),
                1,
            )
            .await;
        helper.load_map().await;

        helper.set_imo(1).await;
        assert_eq!(
            helper.next_set_data().await,
            (Overlay::Vessel, point(0.0, 0.0))
        );

        helper
            .update(
                ChangeBatch::new()
                    .latitude(Some(10.0))
                    .longitude(Some(20.0)),
            )
            .await;

        assert_eq!(
            helper.next_set_data().await,
            (Overlay::Destination, point(20.0, 10.0))
        );
        assert_eq!(helper.next_set_data().await, (Overlay::Route, route));
    })
    .await;
}

#[tokio::test]
async fn test_stale_vessel_does_not_get_a_route() {
    test(|mut helper| async move {
        helper
            .mock_vessel(123, vessel_body(123, 10.0, 50.0), None)
            .await;
        helper
            .mock_vessel(456, json!({ "vessels": [] }), None)
            .await;
        helper
            .mock_route(
                coordinates(10.0, 50.0),
                coordinates(20.0, 10.0),
                ResponseTemplate::new(200).set_body_json(json!({})),
                0,
            )
            .await;
        helper.load_map().await;

        helper.set_imo(123).await;
        assert_eq!(
            helper.next_set_data().await,
            (Overlay::Vessel, point(10.0, 50.0))
        );

        helper.set_imo(456).await;
        helper.set_destination(10.0, 20.0).await;

        assert_eq!(
            helper.next_set_data().await,
            (Overlay::Destination, point(20.0, 10.0))
        );
        helper.assert_no_more_calls().await;

        let state = helper.wait_for_state(|s| s.imo == Some(Imo::new(456))).await;
        assert_eq!(
            state.vessel,
            Some(ResolvedVessel {
                imo: Imo::new(123),
                name: "VESSEL 123".into(),
                coordinates: coordinates(10.0, 50.0),
            })
        );
        assert_eq!(helper.route_requests().await, 0);
    })
    .await;
}

#[tokio::test]
async fn test_empty_vessel_list_changes_nothing() {
    test(|mut helper| async move {
        helper
            .mock_vessel(7, json!({ "vessels": [] }), None)
            .await;
        helper.load_map().await;

        helper.set_imo(7).await;
        helper.assert_no_more_calls().await;

        let state = helper.wait_for_state(|s| s.imo.is_some()).await;
        assert_eq!(state.vessel, None);
        assert_eq!(helper.handle.status().borrow().vessel, None);
    })
    .await;
}

#[tokio::test]
async fn test_non_numeric_vessel_position_is_ignored() {
    test(|mut helper| async move {
        helper
            .mock_vessel(
                7,
                json!({
                    "vessels": [{
                        "aisStatic": { "imo": 7, "name": "NOWHERE" },
                        "aisPosition": { "lon": "unknown", "lat": null }
                    }]
                }),
                None,
            )
            .await;
        helper.load_map().await;

        helper.set_imo(7).await;
        helper.assert_no_more_calls().await;
    })
    .await;
}

#[tokio::test]
async fn test_slow_response_for_superseded_imo_is_never_displayed() {
    test(|mut helper| async move {
        helper
            .mock_vessel(
                123,
                vessel_body(123, 1.0, 1.0),
                Some(Duration::from_millis(500)),
            )
            .await;
        helper
            .mock_vessel(456, vessel_body(456, 2.0, 2.0), None)
            .await;
        helper.load_map().await;

        helper.set_imo(123).await;
        helper.set_imo(456).await;

        assert_eq!(
            helper.next_set_data().await,
            (Overlay::Vessel, point(2.0, 2.0))
        );

        tokio::time::sleep(Duration::from_millis(500)).await;
        helper.assert_no_more_calls().await;
        let state = helper.wait_for_state(|s| s.vessel.is_some()).await;
        assert_eq!(state.vessel.unwrap().imo, Imo::new(456));
    })
    .await;
}

#[tokio::test]
async fn test_cleared_imo_discards_in_flight_lookup() {
    test(|mut helper| async move {
        helper
            .mock_vessel(
                123,
                vessel_body(123, 1.0, 1.0),
                Some(Duration::from_millis(200)),
            )
            .await;
        helper.load_map().await;

        helper.set_imo(123).await;
        helper.update(ChangeBatch::new().imo(None)).await;

        tokio::time::sleep(Duration::from_millis(200)).await;
        helper.assert_no_more_calls().await;
    })
    .await;
}

#[tokio::test]
async fn test_failing_vessel_lookup_is_reported_and_cleared() {
    test(|mut helper| async move {
        helper.mock_vessel_failure(1, 500).await;
        helper
            .mock_vessel(2, vessel_body(2, 3.0, 4.0), None)
            .await;
        helper.load_map().await;

        helper.set_imo(1).await;
        let status = helper.wait_for_status(|s| s.vessel.is_some()).await;
        assert!(status.vessel.unwrap().contains("500"));
        assert_eq!(status.route, None);

        helper.set_imo(2).await;
        assert_eq!(
            helper.next_set_data().await,
            (Overlay::Vessel, point(3.0, 4.0))
        );
        helper.wait_for_status(|s| s.vessel.is_none()).await;
    })
    .await;
}

#[tokio::test]
async fn test_malformed_route_response_is_reported() {
    test(|mut helper| async move {
        helper
            .mock_vessel(1, vessel_body(1, 0.0, 0.0), None)
            .await;
        helper
            .mock_route(
                coordinates(0.0, 0.0),
                coordinates(1.0, 1.0),
                ResponseTemplate::new(200).set_body_string("not json"),
                1,
            )
            .await;
        helper.load_map().await;

        helper.set_imo(1).await;
        helper.next_set_data().await;
        helper.set_destination(1.0, 1.0).await;
        helper.next_set_data().await;

        let status = helper.wait_for_status(|s| s.route.is_some()).await;
        assert!(status.route.unwrap().contains("not json"));
        helper.assert_no_more_calls().await;
    })
    .await;
}
