use roadroute_lib::{
    brazil_capitals, plan_route, route, Error, Location, LocationId, RoadNetwork, RouteRequest,
};

fn network(names: &[&str], roads: &[(&str, &str, f64)]) -> RoadNetwork {
    let mut builder = RoadNetwork::builder();
    for name in names {
        builder.add_location(Location::new(*name)).expect("unique name");
    }
    for (from, to, weight) in roads {
        builder
            .add_bidirectional_connection(from, to, *weight)
            .expect("valid road");
    }
    builder.build()
}

fn step_names(network: &RoadNetwork, steps: &[LocationId]) -> Vec<String> {
    steps
        .iter()
        .map(|id| network.location_name(*id).expect("known id").to_string())
        .collect()
}

/// Sum the road lengths along `steps`, or `None` if two consecutive steps are
/// not directly connected.
fn path_length(network: &RoadNetwork, steps: &[LocationId]) -> Option<f64> {
    steps.windows(2).try_fold(0.0, |total, pair| {
        network
            .neighbours(pair[0])
            .iter()
            .filter(|edge| edge.target == pair[1])
            .map(|edge| edge.distance)
            .min_by(f64::total_cmp)
            .map(|leg| total + leg)
    })
}

#[test]
fn direct_road_is_used_when_no_shorter_alternative_exists() {
    let network = network(
        &["São Paulo", "Rio de Janeiro", "Curitiba"],
        &[("São Paulo", "Curitiba", 410.0), ("São Paulo", "Rio de Janeiro", 430.0)],
    );

    let plan = route(&network, "São Paulo", "Curitiba").expect("route exists");
    assert_eq!(
        step_names(&network, &plan.steps),
        vec!["São Paulo", "Curitiba"]
    );
    assert_eq!(plan.distance(), Some(410.0));
}

#[test]
fn cheaper_two_hop_path_beats_direct_road() {
    let network = network(
        &["São Paulo", "Rio de Janeiro", "Curitiba"],
        &[
            ("São Paulo", "Rio de Janeiro", 100.0),
            ("Rio de Janeiro", "Curitiba", 100.0),
            ("São Paulo", "Curitiba", 500.0),
        ],
    );

    let plan = route(&network, "São Paulo", "Curitiba").expect("route exists");
    assert_eq!(
        step_names(&network, &plan.steps),
        vec!["São Paulo", "Rio de Janeiro", "Curitiba"]
    );
    assert_eq!(plan.distance(), Some(200.0));
    assert_eq!(plan.hop_count(), 2);
}

#[test]
fn disconnected_components_have_no_path() {
    let network = network(
        &["São Paulo", "Curitiba", "Manaus", "Boa Vista"],
        &[("São Paulo", "Curitiba", 338.0), ("Manaus", "Boa Vista", 662.0)],
    );

    let plan = route(&network, "São Paulo", "Boa Vista").expect("valid query");
    assert!(!plan.has_path());
    assert!(plan.steps.is_empty());
    assert_eq!(plan.distance(), None);
}

#[test]
fn isolated_origin_has_no_path() {
    let network = network(&["A", "B", "Lonely"], &[("A", "B", 1.0)]);
    let plan = route(&network, "Lonely", "A").expect("valid query");
    assert!(!plan.has_path());
}

#[test]
fn same_origin_and_destination_is_a_zero_distance_route() {
    let network = brazil_capitals().expect("capitals load");
    for location in network.locations() {
        let plan = route(&network, &location.name, &location.name).expect("known location");
        assert_eq!(step_names(&network, &plan.steps), vec![location.name.clone()]);
        assert_eq!(plan.distance(), Some(0.0));
        assert!(plan.has_path());
        assert!(plan.legs().is_empty());
    }
}

#[test]
fn unknown_origin_is_rejected() {
    let network = brazil_capitals().expect("capitals load");
    let err = route(&network, "Gotham", "Curitiba").expect_err("unknown origin");
    assert!(matches!(err, Error::UnknownLocation { ref name, .. } if name == "Gotham"));
}

#[test]
fn unknown_destination_offers_suggestions() {
    let network = brazil_capitals().expect("capitals load");
    let request = RouteRequest::new("São Paulo", "Florianopolis");
    let err = plan_route(&network, &request).expect_err("unknown destination");
    let message = err.to_string();
    assert!(message.contains("unknown location: Florianopolis"));
    assert!(message.contains("Florianópolis"));
}

#[test]
fn capitals_known_routes() {
    let network = brazil_capitals().expect("capitals load");

    let plan = route(&network, "São Paulo", "Porto Alegre").unwrap();
    assert_eq!(
        step_names(&network, &plan.steps),
        vec!["São Paulo", "Curitiba", "Florianópolis", "Porto Alegre"]
    );
    assert_eq!(plan.distance(), Some(963.0));

    let plan = route(&network, "Rio de Janeiro", "Brasília").unwrap();
    assert_eq!(
        step_names(&network, &plan.steps),
        vec!["Rio de Janeiro", "Belo Horizonte", "Brasília"]
    );
    assert_eq!(plan.distance(), Some(965.0));
}

#[test]
fn distances_match_sum_of_legs_and_are_symmetric() {
    let network = brazil_capitals().expect("capitals load");
    let names: Vec<String> = network.locations().map(|l| l.name.clone()).collect();

    for a in &names {
        for b in &names {
            let forward = route(&network, a, b).unwrap();
            let backward = route(&network, b, a).unwrap();
            assert!(forward.has_path(), "{a} -> {b} should be reachable");
            assert_eq!(forward.distance(), backward.distance(), "{a} <-> {b}");

            let total = forward.distance().unwrap();
            assert_eq!(path_length(&network, &forward.steps), Some(total));

            let mut reversed = forward.steps.clone();
            reversed.reverse();
            assert_eq!(path_length(&network, &reversed), Some(total));
        }
    }
}

#[test]
fn triangle_inequality_holds() {
    let network = brazil_capitals().expect("capitals load");
    let names: Vec<String> = network.locations().map(|l| l.name.clone()).collect();
    let distance = |a: &str, b: &str| route(&network, a, b).unwrap().distance().unwrap();

    for a in names.iter().step_by(3) {
        for b in names.iter().step_by(2) {
            for c in &names {
                assert!(
                    distance(a, c) <= distance(a, b) + distance(b, c),
                    "{a} -> {c} via {b}"
                );
            }
        }
    }
}

#[test]
fn repeated_queries_are_identical() {
    let network = brazil_capitals().expect("capitals load");
    let first = route(&network, "Boa Vista", "Porto Alegre").unwrap();
    for _ in 0..10 {
        assert_eq!(route(&network, "Boa Vista", "Porto Alegre").unwrap(), first);
    }
}

#[test]
fn shared_network_serves_concurrent_queries() {
    let network = brazil_capitals().expect("capitals load");
    let expected = route(&network, "Macapá", "Florianópolis").unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let network = network.clone();
            std::thread::spawn(move || route(&network, "Macapá", "Florianópolis").unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().expect("thread completes"), expected);
    }
}
