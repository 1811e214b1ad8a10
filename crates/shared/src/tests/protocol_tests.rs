use super::*;
use serde_json::json;

#[test]
fn solve_params_use_solver_field_names() {
    let params = SolveParams {
        end: Some(LatLng::new(13.75, 100.49)),
        ..SolveParams::default()
    };

    let value = serde_json::to_value(&params).expect("serialize params");
    assert_eq!(
        value,
        json!({
            "num_days": 2,
            "daily_time_budget": 600,
            "total_budget": 100.0,
            "start_time": 540,
            "hotel_lat": 13.7563,
            "hotel_lng": 100.5018,
            "end_lat": 13.75,
            "end_lng": 100.49,
        })
    );
}

#[test]
fn absent_end_coordinate_is_omitted_from_the_wire() {
    let value = serde_json::to_value(SolveParams::default()).expect("serialize params");
    let object = value.as_object().expect("object");
    assert!(!object.contains_key("end_lat"));
    assert!(!object.contains_key("end_lng"));
}

#[test]
fn rejects_half_an_end_coordinate() {
    let raw = json!({
        "num_days": 1,
        "daily_time_budget": 300,
        "total_budget": 50.0,
        "start_time": 480,
        "hotel_lat": 1.0,
        "hotel_lng": 2.0,
        "end_lat": 3.0,
    });

    let err = serde_json::from_value::<SolveParams>(raw).expect_err("unpaired end");
    assert!(err.to_string().contains("end_lat and end_lng"));
}

#[test]
fn solve_request_wraps_builtin_dataset() {
    let request = SolveRequest {
        algorithm: Algorithm::SimulatedAnnealing,
        dataset: DatasetRef::builtin("medium"),
        params: SolveParams::default(),
    };

    let value = serde_json::to_value(&request).expect("serialize request");
    assert_eq!(value["algorithm"], "simulated_annealing");
    assert_eq!(value["dataset"], json!({"type": "builtin", "name": "medium"}));
    assert_eq!(value["params"]["hotel_lat"], 13.7563);
}

#[test]
fn itinerary_without_convergence_trace_decodes() {
    let raw = json!({
        "days": [
            {
                "day": 1,
                "visits": [{
                    "attraction_id": 7,
                    "attraction_name": "Grand Palace",
                    "arrival_time": 560,
                    "departure_time": 650,
                    "fee": 15.0,
                    "preference": 0.9,
                    "category": "Landmark"
                }],
                "total_travel_time": 20,
                "total_cost": 15.0,
                "total_satisfaction": 0.9
            },
            {
                "day": 2,
                "visits": [],
                "total_travel_time": 0,
                "total_cost": 0.0,
                "total_satisfaction": 0.0
            }
        ],
        "total_satisfaction": 0.9,
        "total_cost": 15.0,
        "total_attractions": 1,
        "algorithm_used": "greedy",
        "computation_ms": 3
    });

    let itinerary: Itinerary = serde_json::from_value(raw).expect("decode itinerary");
    assert!(itinerary.convergence().is_empty());
    assert_eq!(itinerary.algorithm(), Some(Algorithm::Greedy));
    assert!(itinerary.has_contiguous_days());
    let visit = itinerary
        .days
        .first()
        .and_then(|day| day.visits.first())
        .expect("first visit");
    assert_eq!(visit.attraction_id, AttractionId(7));
    assert_eq!(visit.location(), None);
}

#[test]
fn visit_location_requires_both_halves() {
    let mut visit = Visit {
        attraction_id: AttractionId(1),
        attraction_name: "Lumphini Park".to_string(),
        arrival_time: 600,
        departure_time: 660,
        fee: 0.0,
        preference: 0.5,
        category: "Park".to_string(),
        lat: Some(13.73),
        lng: None,
    };
    assert_eq!(visit.location(), None);

    visit.lng = Some(100.54);
    assert_eq!(visit.location(), Some(LatLng::new(13.73, 100.54)));
}

#[test]
fn experiment_request_uses_plain_dataset_name() {
    let request = ExperimentRequest {
        dataset: "large".to_string(),
        n_runs: 10,
        params: SolveParams::default(),
    };
    let value = serde_json::to_value(&request).expect("serialize request");
    assert_eq!(value["dataset"], "large");
    assert_eq!(value["n_runs"], 10);
}
