//! Charts Page
//!
//! Loads the history once and switches between bar, doughnut and trend
//! charts without refetching.

use leptos::*;

use chemviz::api::ApiGateway;
use chemviz::dashboard::{ChartKind, ChartsDisplay, ChartsView};

use crate::api::log_failure;
use crate::components::{Chart, EmptyState, ErrorState, Loading, SummaryCards};
use crate::state::global::GlobalState;

#[component]
pub fn ChartsPage() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let charts = create_rw_signal(ChartsView::new());

    let load = move || {
        charts.update(ChartsView::begin_load);
        spawn_local(async move {
            let api = state.gateway();
            let session = state.current_session();
            let result = api.list_history(session.as_ref()).await;
            if let Err(e) = &result {
                log_failure("Failed to load history", e);
            }
            charts.update(|c| c.finish_load(result));
        });
    };

    // Fetch on mount
    load();

    view! {
        <div class="space-y-6">
            // Chart type selector
            <div class="flex space-x-2">
                {ChartKind::ALL.into_iter().map(|kind| view! {
                    <button
                        on:click=move |_| charts.update(|c| c.select_kind(kind))
                        class=move || {
                            let base = "px-4 py-2 rounded-lg text-sm font-medium transition-colors";
                            if charts.with(ChartsView::kind) == kind {
                                format!("{} bg-primary-600 text-white", base)
                            } else {
                                format!("{} bg-gray-700 text-gray-400 hover:bg-gray-600", base)
                            }
                        }
                    >
                        {kind.label()}
                    </button>
                }).collect_view()}
            </div>

            {move || charts.with(|c| match c.display() {
                ChartsDisplay::Loading => view! { <Loading /> }.into_view(),
                ChartsDisplay::Failed(message) => view! {
                    <ErrorState message=message.to_string() on_retry=load />
                }.into_view(),
                ChartsDisplay::Empty => view! {
                    <EmptyState icon="📈" hint="Upload a CSV file to see charts" />
                }.into_view(),
                ChartsDisplay::Ready { kind, chart, latest } => view! {
                    <div class="space-y-6">
                        <section class="bg-gray-800 rounded-xl p-6 border border-gray-700">
                            <h2 class="text-xl font-semibold mb-4">{kind.title()}</h2>
                            <Chart kind=kind chart=chart />
                        </section>

                        <section class="space-y-3">
                            <h3 class="text-lg font-semibold">"Latest Dataset Summary"</h3>
                            <SummaryCards summary=latest.clone() />
                        </section>
                    </div>
                }.into_view(),
            })}
        </div>
    }
}
