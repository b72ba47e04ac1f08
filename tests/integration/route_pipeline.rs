//! End-to-end route runs through the orchestrator and presentation
//! adapter, backed by the in-memory mock provider.

use std::sync::Arc;
use tokio_test::assert_ok;

use route_forecast::engine::RouteOrchestrator;
use route_forecast::presentation::{build_chart, build_map, Axis, TraceKind};
use route_forecast::types::{FailureStage, Horizon, Parameter, RouteRequest, RunOutcome, Signal};

use crate::mock_provider::MockProvider;

fn orchestrator(provider: &Arc<MockProvider>) -> RouteOrchestrator {
    RouteOrchestrator::new(provider.clone(), provider.clone(), 4)
}

#[tokio::test]
async fn two_cities_three_days_all_succeed() {
    let provider = Arc::new(MockProvider::new());
    let req = RouteRequest::new("Москва", "Екатеринбург").with_days(Horizon::Three);
    assert_ok!(req.validate());

    let result = orchestrator(&provider).run(&req).await;

    assert_eq!(result.outcome(), RunOutcome::Success);
    assert_eq!(result.signal(), Signal { success: true, error: false });
    for city in ["Москва", "Екатеринбург"] {
        let forecast = result.forecast(city).unwrap();
        assert_eq!(forecast.dates(), vec!["2024-05-01", "2024-05-02", "2024-05-03"]);
        assert_eq!(forecast.wind_speeds().len(), 3);
        assert_eq!(forecast.precipitation_probs(), vec![Some(10), Some(20), Some(30)]);
    }
    assert!(provider.fetch_calls().iter().all(|(_, days)| *days == 3));

    let chart = build_chart(&result);
    assert_eq!(chart.traces.len(), 6);
    assert_eq!(chart.traces[0].name, "Москва Температура (°C)");
    assert_eq!(chart.traces[1].kind, TraceKind::Bar);
    assert_eq!(chart.traces[2].axis, Axis::Secondary);

    let map = assert_ok!(build_map(&result));
    assert_eq!(map.route.lat.len(), 2);
    assert_eq!(map.markers.len(), 2);
}

#[tokio::test]
async fn failed_forecast_excludes_city_but_keeps_route_line() {
    let provider = Arc::new(MockProvider::new());
    provider.fail_forecast("Москва", 500);

    let req = RouteRequest::new("Москва", "Новосибирск").with_days(Horizon::One);
    let result = orchestrator(&provider).run(&req).await;

    assert_eq!(result.outcome(), RunOutcome::PartialSuccess);
    assert!(result.signal().error);
    assert!(result.forecast("Москва").is_none());
    assert_eq!(result.failures[0].city, "Москва");
    assert_eq!(result.failures[0].stage, FailureStage::Forecast);

    let chart = build_chart(&result);
    assert!(chart.traces.iter().all(|t| t.city == "Новосибирск"));

    let map = build_map(&result).unwrap();
    assert_eq!(map.route.lat.len(), 2);
    assert_eq!(map.markers.len(), 1);
    assert_eq!(map.markers[0].city, "Новосибирск");
}

#[tokio::test]
async fn single_unresolvable_city_is_total_failure() {
    let provider = Arc::new(MockProvider::with_cities(&[("Москва", "294021")]));
    let req = RouteRequest::new("Новосибирск", "Новосибирск");

    let result = orchestrator(&provider).run(&req).await;

    assert_eq!(result.outcome(), RunOutcome::TotalFailure);
    assert!(result.signal().error);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].stage, FailureStage::Location);
    assert!(provider.fetch_calls().is_empty());
    assert!(build_chart(&result).traces.is_empty());
}

#[tokio::test]
async fn provider_outage_fails_every_city_in_route_order() {
    let provider = Arc::new(MockProvider::new());
    provider.set_error("connection refused");

    let req = RouteRequest::new("Москва", "Новосибирск")
        .with_intermediates(["Нижний Новгород", "Екатеринбург"]);
    let result = orchestrator(&provider).run(&req).await;

    assert_eq!(result.outcome(), RunOutcome::TotalFailure);
    assert_eq!(
        result.failed_cities(),
        vec!["Москва", "Нижний Новгород", "Екатеринбург", "Новосибирск"]
    );
    assert!(result.failures.iter().all(|f| f.detail.contains("connection refused")));
}

#[tokio::test]
async fn repeated_city_is_fetched_once() {
    let provider = Arc::new(MockProvider::new());
    let req = RouteRequest::new("Москва", "Москва")
        .with_intermediates(["Санкт-Петербург"])
        .with_days(Horizon::One);

    let result = orchestrator(&provider).run(&req).await;

    assert_eq!(provider.fetch_calls().len(), 2);
    assert_eq!(provider.fetched_keys().len(), 2);
    assert_eq!(result.forecasts.len(), 2);

    let map = build_map(&result).unwrap();
    assert_eq!(map.route.lat.len(), 3);
    assert_eq!(map.markers.len(), 2);
    assert_eq!(build_chart(&result).traces.len(), 6);
}

#[tokio::test]
async fn parameter_selection_limits_chart_not_data() {
    let provider = Arc::new(MockProvider::new());
    let req = RouteRequest::new("Москва", "Екатеринбург")
        .with_days(Horizon::Five)
        .with_parameters(vec![Parameter::Precipitation]);

    let result = orchestrator(&provider).run(&req).await;
    assert_eq!(result.forecast("Москва").unwrap().temperatures().len(), 5);

    let chart = build_chart(&result);
    assert_eq!(chart.traces.len(), 2);
    assert!(chart
        .traces
        .iter()
        .all(|t| t.parameter == Parameter::Precipitation && t.axis == Axis::Secondary));
}

#[tokio::test]
async fn map_hover_shows_first_day() {
    let provider = Arc::new(MockProvider::with_cities(&[
        ("Москва", "294021"),
        ("Нижний Новгород", "294199"),
    ]));
    let req = RouteRequest::new("Москва", "Нижний Новгород").with_days(Horizon::Three);

    let result = orchestrator(&provider).run(&req).await;
    let map = build_map(&result).unwrap();

    // Key 294021 digit sum is 18.
    assert_eq!(
        map.markers[0].hover_text,
        "Москва<br>Температура: 18°C<br>Ветер: 10 м/с<br>Осадки: 10%"
    );
}
