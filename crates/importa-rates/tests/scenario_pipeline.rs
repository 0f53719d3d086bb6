//! End-to-end pipeline over a real (in-memory) store: seed a workspace,
//! resolve rates through the sync service, run a full scenario, and
//! round-trip the resulting history through persistence.

use importa_core::projection::{best_markup_for_currency, build_history_entry, calculate_scenario};
use importa_core::types::Product;
use importa_core::Currency;
use importa_rates::{RateClient, RateService};
use importa_store::{Store, StoreConfig};

#[tokio::test]
async fn scenario_pipeline_over_in_memory_store() {
    let store = Store::new(StoreConfig::in_memory()).await.unwrap();
    let workspace = store.workspace();

    // Seed a one-product catalog.
    let mut ws = workspace.load().await.unwrap();
    ws.clear_products();
    let mut towel = Product::new("Towel", 3.8, 200, Currency::USD);
    towel.shipping_per_unit = Some(0.1);
    ws.add_product(towel);
    workspace.save(&ws).await.unwrap();

    // Unroutable endpoint: the service degrades to the bundled defaults.
    let rate_service = RateService::with_client(
        store.rate_cache(),
        RateClient::with_endpoint("http://127.0.0.1:1/latest/"),
    );
    let rates = rate_service.rates(false).await;

    let mut ws = workspace.load().await.unwrap();
    let scenario = calculate_scenario(
        &ws.products,
        &ws.assumptions,
        &ws.effective_markups(),
        &ws.retail_currencies,
        &rates,
    );
    // 3.8 USD x 200 at the bundled INR rate lands at 371.01/unit.
    assert_eq!(scenario.total_investment, 74202.0);
    assert_eq!(scenario.costs[0].total_per_unit_base, 371.01);

    // Margin grows with markup, so the steepest built-in wins.
    let best = best_markup_for_currency(&scenario.summaries, Currency::INR).unwrap();
    assert_eq!(best.markup_id, "markup-300");

    // Record the run and reload it through the store.
    for cost in &scenario.costs {
        ws.record_history(build_history_entry(cost, None));
    }
    workspace.save(&ws).await.unwrap();

    let reloaded = workspace.load().await.unwrap();
    assert_eq!(reloaded.history.len(), 1);
    assert_eq!(reloaded.history[0].landed_cost_per_unit, 371.01);
    assert_eq!(reloaded.history[0].landed_cost_currency, Currency::INR);
}
